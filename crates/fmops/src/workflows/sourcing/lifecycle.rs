//! Transition guards for the RFQ state machine.
//!
//! Only `send` and `award` advance the status as a side effect of an
//! operation; `receiving_quotes` and `evaluating` are informational labels an
//! operator may set (the scoring run also sets `evaluating`). Every guard
//! returns a typed error so callers can surface the precise precondition that
//! failed.

use super::domain::RfqStatus;

/// An RFQ may not be sent to fewer suppliers than this.
pub const MIN_INVITED_SUPPLIERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("rfq is {status}; the operation requires a draft")]
    NotDraft { status: RfqStatus },
    #[error("rfq is {status} and no longer accepts changes")]
    Closed { status: RfqStatus },
    #[error("rfq cannot move from {from} to {to}")]
    InvalidTransition { from: RfqStatus, to: RfqStatus },
    #[error("at least {required} suppliers must be invited before sending, found {invited}")]
    TooFewSuppliers { invited: usize, required: usize },
    #[error("rfq is already awarded")]
    AlreadyAwarded,
    #[error("quotes are not accepted while the rfq is {status}")]
    QuotesNotOpen { status: RfqStatus },
    #[error("benchmarking requires a sent rfq, current status is {status}")]
    NotReadyForEvaluation { status: RfqStatus },
    #[error("only draft or cancelled rfqs can be deleted, status is {status}")]
    DeleteForbidden { status: RfqStatus },
}

/// Invitation mutations and RFQ edits are draft-only.
pub(crate) fn ensure_draft(status: RfqStatus) -> Result<(), LifecycleError> {
    match status {
        RfqStatus::Draft => Ok(()),
        other if other.is_terminal() => Err(LifecycleError::Closed { status: other }),
        other => Err(LifecycleError::NotDraft { status: other }),
    }
}

pub(crate) fn ensure_can_send(status: RfqStatus, invited: usize) -> Result<(), LifecycleError> {
    ensure_draft(status)?;
    if invited < MIN_INVITED_SUPPLIERS {
        return Err(LifecycleError::TooFewSuppliers {
            invited,
            required: MIN_INVITED_SUPPLIERS,
        });
    }
    Ok(())
}

/// Quote submission and supplier responses are valid between `sent` and the
/// terminal decision. The intermediate labels do not close the window.
pub(crate) fn ensure_quotes_open(status: RfqStatus) -> Result<(), LifecycleError> {
    match status {
        RfqStatus::Sent | RfqStatus::ReceivingQuotes | RfqStatus::Evaluating => Ok(()),
        RfqStatus::Draft => Err(LifecycleError::QuotesNotOpen { status }),
        other => Err(LifecycleError::Closed { status: other }),
    }
}

/// Benchmarking shares the quote window and is idempotent while `evaluating`.
pub(crate) fn ensure_can_evaluate(status: RfqStatus) -> Result<(), LifecycleError> {
    match status {
        RfqStatus::Sent | RfqStatus::ReceivingQuotes | RfqStatus::Evaluating => Ok(()),
        RfqStatus::Draft => Err(LifecycleError::NotReadyForEvaluation { status }),
        other => Err(LifecycleError::Closed { status: other }),
    }
}

pub(crate) fn ensure_can_award(status: RfqStatus) -> Result<(), LifecycleError> {
    match status {
        RfqStatus::Awarded => Err(LifecycleError::AlreadyAwarded),
        RfqStatus::Cancelled => Err(LifecycleError::Closed { status }),
        _ => Ok(()),
    }
}

pub(crate) fn ensure_can_cancel(status: RfqStatus) -> Result<(), LifecycleError> {
    if status.is_terminal() {
        return Err(LifecycleError::Closed { status });
    }
    Ok(())
}

/// Caller-settable informational moves: forward only, between `sent` and
/// `evaluating`. Everything else goes through a gated operation.
pub(crate) fn ensure_stage_change(from: RfqStatus, to: RfqStatus) -> Result<(), LifecycleError> {
    match (from, to) {
        (RfqStatus::Sent, RfqStatus::ReceivingQuotes)
        | (RfqStatus::Sent, RfqStatus::Evaluating)
        | (RfqStatus::ReceivingQuotes, RfqStatus::Evaluating) => Ok(()),
        _ => Err(LifecycleError::InvalidTransition { from, to }),
    }
}

pub(crate) fn ensure_can_delete(status: RfqStatus) -> Result<(), LifecycleError> {
    match status {
        RfqStatus::Draft | RfqStatus::Cancelled => Ok(()),
        other => Err(LifecycleError::DeleteForbidden { status: other }),
    }
}
