//! Mutation lifecycle: `Idle -> Submitting -> {Succeeded, Failed}`.
//!
//! Each submission is issued a ticket. A response is only applied if its
//! ticket is still the one in flight; responses that arrive after the user
//! moved on (dialog closed, another submit) are reported as stale and
//! dropped without side effects.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockroom_core::{DomainError, DomainResult};

/// What the user asked the backend to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum MutationIntent<Id> {
    Create,
    Update(Id),
    Delete(Id),
}

impl<Id> MutationIntent<Id> {
    pub fn target(&self) -> Option<&Id> {
        match self {
            MutationIntent::Create => None,
            MutationIntent::Update(id) | MutationIntent::Delete(id) => Some(id),
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            MutationIntent::Create => "create",
            MutationIntent::Update(_) => "update",
            MutationIntent::Delete(_) => "delete",
        }
    }
}

/// Handle for one in-flight submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTicket<Id> {
    pub id: Uuid,
    pub intent: MutationIntent<Id>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationPhase<Id> {
    Idle,
    Submitting(MutationTicket<Id>),
    Succeeded(MutationIntent<Id>),
    Failed {
        intent: MutationIntent<Id>,
        message: String,
    },
}

/// Result of handing a response back to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<Id> {
    /// The response matched the in-flight ticket and was recorded.
    Applied(MutationIntent<Id>),
    /// The ticket was superseded or cancelled; the response was ignored.
    Stale,
}

#[derive(Debug, Clone)]
pub struct MutationTracker<Id> {
    phase: MutationPhase<Id>,
}

impl<Id> Default for MutationTracker<Id> {
    fn default() -> Self {
        Self {
            phase: MutationPhase::Idle,
        }
    }
}

impl<Id: Clone + PartialEq + core::fmt::Debug> MutationTracker<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &MutationPhase<Id> {
        &self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, MutationPhase::Submitting(_))
    }

    /// Last failure message, for inline display in the still-open dialog.
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            MutationPhase::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Start a submission. Only one submission may be in flight per screen.
    pub fn begin(&mut self, intent: MutationIntent<Id>) -> DomainResult<MutationTicket<Id>> {
        if let MutationPhase::Submitting(current) = &self.phase {
            return Err(DomainError::conflict(format!(
                "a {} is already in progress",
                current.intent.verb()
            )));
        }
        let ticket = MutationTicket {
            id: Uuid::now_v7(),
            intent,
        };
        tracing::debug!(ticket = %ticket.id, verb = ticket.intent.verb(), "mutation submitting");
        self.phase = MutationPhase::Submitting(ticket.clone());
        Ok(ticket)
    }

    /// Record the outcome of a submission.
    pub fn complete(
        &mut self,
        ticket: &MutationTicket<Id>,
        outcome: Result<(), String>,
    ) -> Completion<Id> {
        match &self.phase {
            MutationPhase::Submitting(current) if current.id == ticket.id => {}
            _ => {
                tracing::debug!(ticket = %ticket.id, "ignoring stale mutation response");
                return Completion::Stale;
            }
        }
        let intent = ticket.intent.clone();
        self.phase = match outcome {
            Ok(()) => MutationPhase::Succeeded(intent.clone()),
            Err(message) => MutationPhase::Failed {
                intent: intent.clone(),
                message,
            },
        };
        Completion::Applied(intent)
    }

    /// Abandon the in-flight submission (dialog closed mid-submit).
    pub fn cancel(&mut self) {
        self.phase = MutationPhase::Idle;
    }

    pub fn reset(&mut self) {
        self.phase = MutationPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_path() {
        let mut t = MutationTracker::new();
        let ticket = t.begin(MutationIntent::Update(3)).unwrap();
        assert!(t.is_pending());
        assert_eq!(t.complete(&ticket, Ok(())), Completion::Applied(MutationIntent::Update(3)));
        assert_eq!(t.phase(), &MutationPhase::Succeeded(MutationIntent::Update(3)));
    }

    #[test]
    fn failure_keeps_message() {
        let mut t: MutationTracker<i64> = MutationTracker::new();
        let ticket = t.begin(MutationIntent::Create).unwrap();
        t.complete(&ticket, Err("SKU already exists".into()));
        assert_eq!(t.error(), Some("SKU already exists"));
        assert!(!t.is_pending());
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut t = MutationTracker::new();
        t.begin(MutationIntent::Delete(1)).unwrap();
        assert!(t.begin(MutationIntent::Delete(1)).is_err());
    }

    #[test]
    fn late_response_after_cancel_is_stale() {
        let mut t = MutationTracker::new();
        let ticket = t.begin(MutationIntent::Update(8)).unwrap();
        t.cancel();
        assert_eq!(t.complete(&ticket, Ok(())), Completion::Stale);
        assert_eq!(t.phase(), &MutationPhase::Idle);
    }

    #[test]
    fn superseded_ticket_is_stale() {
        let mut t = MutationTracker::new();
        let first = t.begin(MutationIntent::Update(8)).unwrap();
        t.cancel();
        let second = t.begin(MutationIntent::Update(9)).unwrap();
        assert_eq!(t.complete(&first, Err("boom".into())), Completion::Stale);
        assert!(t.is_pending());
        assert_eq!(t.complete(&second, Ok(())), Completion::Applied(MutationIntent::Update(9)));
    }
}
