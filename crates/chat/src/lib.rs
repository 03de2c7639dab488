//! Conversational document QA: one engine per session, holding the vector
//! index, the transcript, and the guarded turn state machine.

pub mod engine;
pub mod error;
pub mod providers;
pub mod session;

pub use engine::{ChatEngine, IngestReport};
pub use error::{ProcessError, QueryError};
pub use providers::{ConfiguredProviders, ProviderFactory};
pub use session::{Phase, RejectReason, SessionState, SubmitGuards, SubmitOutcome};
