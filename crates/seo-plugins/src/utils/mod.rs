pub mod config;
pub mod page_plugin;
pub mod registry;
