pub mod answerer;
pub mod provider;
pub mod providers;

pub use answerer::Answerer;
pub use provider::{GenerationError, LlmProvider, Message, Role};
pub use providers::create_provider;
