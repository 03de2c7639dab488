pub mod config;
pub mod conversation;
pub mod document;

pub use config::Config;
pub use conversation::*;
pub use document::*;
