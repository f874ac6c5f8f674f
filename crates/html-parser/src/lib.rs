pub mod link_parser;
pub mod page_parser;
pub mod signals;
pub mod text;

pub use page_parser::{extract_signals, PageParser};
pub use signals::{
    internal_link_ratio, HeadingSignals, ImageSignals, LinkSignals, MetaSignals, SecuritySignals,
    SignalBundle, TextSignals, SIGNAL_BUNDLE_VERSION,
};
