pub mod plugins;
pub mod utils;

pub use utils::config::{
    CheckOutcome, CheckStatus, Impact, Rule, RuleCategory, RuleConfig, RuleDisplay, TechnicalCheck,
};
pub use utils::page_plugin::SeoPlugin;
pub use utils::registry::PluginRegistry;
