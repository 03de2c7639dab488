pub mod chunker;
pub mod document;
pub mod error;
pub mod loader;
pub mod web;

pub use error::LoadError;
pub use loader::load;
