//! Per-session conversation state machine.
//!
//! One session owns one optional vector index and one append-only
//! transcript. A question moves the session from `Idle` through a guarded
//! submit into `Generating`; completing the answer (or failing to) always
//! returns it to `Idle`. At most one question is ever in flight.

use tracing::{debug, warn};
use uuid::Uuid;

use docsage_core::Turn;
use docsage_index::VectorIndex;

use crate::error::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready for input.
    Idle,
    /// Guards are being evaluated for a submitted question.
    AwaitingSubmit,
    /// A user turn is awaiting its answer.
    Generating,
}

/// Caller-supplied facts the submit guards check. The machine itself cannot
/// see credentials or an unprocessed file picker, so the host reports them.
#[derive(Debug, Clone, Copy)]
pub struct SubmitGuards {
    pub credential_present: bool,
    pub sources_pending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A previous question is still being answered.
    Busy,
    /// Input was empty or whitespace.
    EmptyInput,
    /// The provider needs a credential and none was given.
    MissingCredential,
    /// Sources are staged but have not been processed yet.
    SourcesPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(RejectReason),
}

pub struct SessionState {
    session_id: Uuid,
    index: Option<VectorIndex>,
    documents_ready: bool,
    conversation: Vec<Turn>,
    input_buffer: String,
    phase: Phase,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            index: None,
            documents_ready: false,
            conversation: Vec::new(),
            input_buffer: String::new(),
            phase: Phase::Idle,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn index(&self) -> Option<&VectorIndex> {
        self.index.as_ref()
    }

    pub fn documents_ready(&self) -> bool {
        self.documents_ready
    }

    pub fn conversation(&self) -> &[Turn] {
        &self.conversation
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn awaiting_answer(&self) -> bool {
        self.phase == Phase::Generating
    }

    /// Install a freshly built index, replacing any previous one. The index
    /// and the ready flag flip together; a failed build never gets here.
    pub fn install_index(&mut self, index: VectorIndex) {
        debug!(session_id = %self.session_id, chunks = index.len(), "index installed");
        self.index = Some(index);
        self.documents_ready = true;
    }

    /// Try to accept a question. Guards run in a fixed order: single-flight
    /// first, then input, credential, and staged-source checks. On rejection
    /// the input buffer keeps the text and the phase returns to idle; on
    /// acceptance the question becomes a user turn and the session starts
    /// generating.
    pub fn submit(&mut self, input: &str, guards: SubmitGuards) -> SubmitOutcome {
        if self.phase != Phase::Idle {
            warn!(session_id = %self.session_id, "submit rejected: answer in flight");
            return SubmitOutcome::Rejected(RejectReason::Busy);
        }

        self.phase = Phase::AwaitingSubmit;
        self.input_buffer = input.to_string();

        if self.input_buffer.trim().is_empty() {
            self.phase = Phase::Idle;
            return SubmitOutcome::Rejected(RejectReason::EmptyInput);
        }
        if !guards.credential_present {
            self.phase = Phase::Idle;
            return SubmitOutcome::Rejected(RejectReason::MissingCredential);
        }
        if guards.sources_pending {
            self.phase = Phase::Idle;
            return SubmitOutcome::Rejected(RejectReason::SourcesPending);
        }

        let question = std::mem::take(&mut self.input_buffer);
        self.conversation.push(Turn::user(question));
        self.phase = Phase::Generating;
        SubmitOutcome::Accepted
    }

    /// The question currently awaiting an answer, if any. This doubles as
    /// the idempotency check for hosts that re-drive the machine: once the
    /// answer lands this returns `None` and a second drive does nothing.
    pub fn pending_query(&self) -> Option<&str> {
        if self.phase != Phase::Generating {
            return None;
        }
        match self.conversation.last() {
            Some(turn) if turn.is_user() => Some(&turn.text),
            _ => None,
        }
    }

    /// Finish the in-flight turn with exactly one assistant entry: the
    /// answer, or a readable rendering of the failure. Either way the
    /// session is idle afterwards.
    pub fn complete(&mut self, result: Result<String, QueryError>) {
        if self.phase != Phase::Generating {
            warn!(session_id = %self.session_id, "complete ignored: no answer in flight");
            return;
        }

        let text = match result {
            Ok(answer) => answer,
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "query failed");
                format!("Error: {e}")
            }
        };
        self.conversation.push(Turn::assistant(text));
        self.phase = Phase::Idle;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
