use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    EvaluationWeights, InvitationId, InvitationStatus, Quote, QuoteId, QuoteStatus,
    QuoteSubmission, Rfq, RfqDraft, RfqId, RfqOverview, RfqStatus, SupplierId, SupplierInvitation,
};
use super::lifecycle::{self, LifecycleError};
use super::repository::{
    DirectoryError, RepositoryError, SourcingRepository, SupplierDirectory,
};
use super::scoring::{self, ScoringError};

/// Coarse classification used by transport adapters to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    InsufficientData,
    Conflict,
    Unavailable,
}

/// Error raised by the sourcing service.
#[derive(Debug, thiserror::Error)]
pub enum SourcingError {
    #[error("rfq {0} not found")]
    RfqNotFound(RfqId),
    #[error("invitation {0} not found")]
    InvitationNotFound(InvitationId),
    #[error("supplier {0} is not registered")]
    UnknownSupplier(SupplierId),
    #[error("supplier {supplier} has no quote on rfq {rfq}")]
    QuoteNotFound { rfq: RfqId, supplier: SupplierId },
    #[error("rfq title must not be empty")]
    EmptyTitle,
    #[error("supplier {0} is already invited")]
    DuplicateInvitation(SupplierId),
    #[error("supplier {0} already submitted a quote; revise it instead")]
    DuplicateQuote(SupplierId),
    #[error("supplier {0} was not invited to this rfq")]
    NotInvited(SupplierId),
    #[error("quote price must be positive, got {0}")]
    NonPositivePrice(f64),
    #[error("{name} score must be between 0 and 100, got {value}")]
    ScoreOutOfRange { name: &'static str, value: u8 },
    #[error("invitation is already {status} and cannot be declined")]
    InvitationClosed { status: InvitationStatus },
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl SourcingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SourcingError::RfqNotFound(_)
            | SourcingError::InvitationNotFound(_)
            | SourcingError::UnknownSupplier(_)
            | SourcingError::QuoteNotFound { .. } => ErrorKind::NotFound,
            SourcingError::EmptyTitle
            | SourcingError::DuplicateInvitation(_)
            | SourcingError::DuplicateQuote(_)
            | SourcingError::NotInvited(_)
            | SourcingError::NonPositivePrice(_)
            | SourcingError::ScoreOutOfRange { .. }
            | SourcingError::InvitationClosed { .. } => ErrorKind::Validation,
            SourcingError::Lifecycle(LifecycleError::AlreadyAwarded) => ErrorKind::Conflict,
            SourcingError::Lifecycle(_) => ErrorKind::Validation,
            SourcingError::Scoring(ScoringError::InsufficientQuotes { .. }) => {
                ErrorKind::InsufficientData
            }
            SourcingError::Scoring(ScoringError::ZeroWeightSum) => ErrorKind::Validation,
            SourcingError::Repository(RepositoryError::Conflict)
            | SourcingError::Repository(RepositoryError::StaleWrite) => ErrorKind::Conflict,
            SourcingError::Repository(RepositoryError::NotFound) => ErrorKind::NotFound,
            SourcingError::Repository(RepositoryError::Unavailable(_))
            | SourcingError::Directory(_) => ErrorKind::Unavailable,
        }
    }
}

/// Facade composing the lifecycle guards, the benchmark engine, and the
/// repository. Stateless between calls; concurrency control is the
/// repository's contract.
pub struct SourcingService<R, D> {
    repository: Arc<R>,
    directory: Arc<D>,
    default_weights: EvaluationWeights,
}

impl<R, D> SourcingService<R, D>
where
    R: SourcingRepository + 'static,
    D: SupplierDirectory + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>) -> Self {
        Self {
            repository,
            directory,
            default_weights: EvaluationWeights::default(),
        }
    }

    /// Override the weights applied to drafts that do not bring their own.
    pub fn with_default_weights(mut self, weights: EvaluationWeights) -> Self {
        self.default_weights = weights;
        self
    }

    fn require_rfq(&self, id: &RfqId) -> Result<Rfq, SourcingError> {
        self.repository
            .fetch_rfq(id)?
            .ok_or_else(|| SourcingError::RfqNotFound(id.clone()))
    }

    fn require_invitation(&self, id: &InvitationId) -> Result<SupplierInvitation, SourcingError> {
        self.repository
            .fetch_invitation(id)?
            .ok_or_else(|| SourcingError::InvitationNotFound(id.clone()))
    }

    /// Create a new RFQ in `draft` with a repository-issued number.
    pub fn create_rfq(&self, draft: RfqDraft) -> Result<Rfq, SourcingError> {
        if draft.title.trim().is_empty() {
            return Err(SourcingError::EmptyTitle);
        }

        let sequence = self.repository.next_rfq_sequence()?;
        let now = Utc::now();
        let rfq = Rfq {
            id: RfqId(format!("rfq-{sequence:06}")),
            number: format!("RFQ-{sequence:06}"),
            title: draft.title,
            description: draft.description,
            customer_ref: draft.customer_ref,
            site_ref: draft.site_ref,
            category_ref: draft.category_ref,
            status: RfqStatus::Draft,
            weights: draft.weights.unwrap_or(self.default_weights),
            deadline: draft.deadline,
            sent_at: None,
            closed_at: None,
            awarded_supplier: None,
            award_reason: None,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert_rfq(rfq)?;
        info!(rfq = %stored.id, number = %stored.number, "rfq created");
        Ok(stored)
    }

    /// Invite a registered supplier to bid. Draft-only; one invitation per
    /// (rfq, supplier) pair.
    pub fn invite_supplier(
        &self,
        rfq_id: &RfqId,
        supplier_id: &SupplierId,
    ) -> Result<SupplierInvitation, SourcingError> {
        let rfq = self.require_rfq(rfq_id)?;
        lifecycle::ensure_draft(rfq.status)?;

        if self.directory.lookup(supplier_id)?.is_none() {
            return Err(SourcingError::UnknownSupplier(supplier_id.clone()));
        }
        if self
            .repository
            .invitation_for_supplier(rfq_id, supplier_id)?
            .is_some()
        {
            return Err(SourcingError::DuplicateInvitation(supplier_id.clone()));
        }

        let invitation = SupplierInvitation {
            id: InvitationId(format!("inv-{}-{}", rfq_id.0, supplier_id.0)),
            rfq_id: rfq_id.clone(),
            supplier_id: supplier_id.clone(),
            status: InvitationStatus::Pending,
            invited_at: Utc::now(),
            viewed_at: None,
            responded_at: None,
            decline_reason: None,
        };

        Ok(self.repository.insert_invitation(invitation)?)
    }

    /// Withdraw an invitation. Only possible while the RFQ is a draft.
    pub fn remove_invitation(&self, invitation_id: &InvitationId) -> Result<(), SourcingError> {
        let invitation = self.require_invitation(invitation_id)?;
        let rfq = self.require_rfq(&invitation.rfq_id)?;
        lifecycle::ensure_draft(rfq.status)?;
        self.repository.delete_invitation(invitation_id)?;
        Ok(())
    }

    /// Send the RFQ to its invited suppliers. Requires a draft with at least
    /// the minimum invitation count; stamps `sent_at`.
    pub fn send(&self, rfq_id: &RfqId) -> Result<Rfq, SourcingError> {
        let mut rfq = self.require_rfq(rfq_id)?;
        let invited = self.repository.invitations_for(rfq_id)?.len();
        lifecycle::ensure_can_send(rfq.status, invited)?;

        let now = Utc::now();
        rfq.status = RfqStatus::Sent;
        rfq.sent_at = Some(now);
        rfq.updated_at = now;
        self.repository.update_rfq(rfq.clone())?;

        info!(rfq = %rfq.id, invited, "rfq sent to suppliers");
        Ok(rfq)
    }

    /// Move the RFQ to an informational stage (`receiving_quotes` or
    /// `evaluating`). Gated transitions cannot be taken this way.
    pub fn update_stage(&self, rfq_id: &RfqId, target: RfqStatus) -> Result<Rfq, SourcingError> {
        let mut rfq = self.require_rfq(rfq_id)?;
        lifecycle::ensure_stage_change(rfq.status, target)?;

        rfq.status = target;
        rfq.updated_at = Utc::now();
        self.repository.update_rfq(rfq.clone())?;
        Ok(rfq)
    }

    /// Record that the supplier opened the invitation. Idempotent on the
    /// timestamp; the status only moves forward from `pending`.
    pub fn mark_invitation_viewed(
        &self,
        invitation_id: &InvitationId,
    ) -> Result<SupplierInvitation, SourcingError> {
        let mut invitation = self.require_invitation(invitation_id)?;
        let rfq = self.require_rfq(&invitation.rfq_id)?;
        lifecycle::ensure_quotes_open(rfq.status)?;

        if invitation.viewed_at.is_none() {
            invitation.viewed_at = Some(Utc::now());
            if invitation.status == InvitationStatus::Pending {
                invitation.status = InvitationStatus::Viewed;
            }
            self.repository.update_invitation(invitation.clone())?;
        }

        Ok(invitation)
    }

    /// Supplier declines to bid. Not possible once a quote is in.
    pub fn decline_invitation(
        &self,
        invitation_id: &InvitationId,
        reason: Option<String>,
    ) -> Result<SupplierInvitation, SourcingError> {
        let mut invitation = self.require_invitation(invitation_id)?;
        let rfq = self.require_rfq(&invitation.rfq_id)?;
        lifecycle::ensure_quotes_open(rfq.status)?;

        if matches!(
            invitation.status,
            InvitationStatus::Quoted | InvitationStatus::Declined
        ) {
            return Err(SourcingError::InvitationClosed {
                status: invitation.status,
            });
        }

        invitation.status = InvitationStatus::Declined;
        invitation.responded_at = Some(Utc::now());
        invitation.decline_reason = reason;
        self.repository.update_invitation(invitation.clone())?;
        Ok(invitation)
    }

    fn validate_submission(&self, submission: &QuoteSubmission) -> Result<(), SourcingError> {
        if !submission.total_price.is_finite() || submission.total_price <= 0.0 {
            return Err(SourcingError::NonPositivePrice(submission.total_price));
        }
        for (name, value) in [
            ("quality", submission.quality_score),
            ("compliance", submission.compliance_score),
            ("esg", submission.esg_score),
        ] {
            if let Some(value) = value {
                if value > 100 {
                    return Err(SourcingError::ScoreOutOfRange { name, value });
                }
            }
        }
        Ok(())
    }

    /// Accept a supplier's bid. One quote per (rfq, supplier); a second
    /// submission is rejected and must go through [`Self::revise_quote`].
    pub fn submit_quote(
        &self,
        rfq_id: &RfqId,
        submission: QuoteSubmission,
    ) -> Result<Quote, SourcingError> {
        let rfq = self.require_rfq(rfq_id)?;
        lifecycle::ensure_quotes_open(rfq.status)?;
        self.validate_submission(&submission)?;

        let mut invitation = self
            .repository
            .invitation_for_supplier(rfq_id, &submission.supplier_id)?
            .ok_or_else(|| SourcingError::NotInvited(submission.supplier_id.clone()))?;
        if self
            .repository
            .quote_for_supplier(rfq_id, &submission.supplier_id)?
            .is_some()
        {
            return Err(SourcingError::DuplicateQuote(submission.supplier_id.clone()));
        }

        let sequence = self.repository.next_quote_sequence()?;
        let now = Utc::now();
        let quote = Quote {
            id: QuoteId(format!("quo-{sequence:06}")),
            number: format!("Q-{sequence:06}"),
            rfq_id: rfq_id.clone(),
            supplier_id: submission.supplier_id.clone(),
            total_price: submission.total_price,
            currency: submission.currency,
            delivery_days: submission.delivery_days,
            validity_days: submission.validity_days,
            quality_score: submission.quality_score,
            compliance_score: submission.compliance_score,
            esg_score: submission.esg_score,
            benchmark_score: None,
            price_rank: None,
            overall_rank: None,
            status: QuoteStatus::Submitted,
            submitted_at: now,
            evaluated_at: None,
        };
        let stored = self.repository.insert_quote(quote)?;

        invitation.status = InvitationStatus::Quoted;
        invitation.responded_at = Some(now);
        self.repository.update_invitation(invitation)?;

        info!(rfq = %rfq_id, supplier = %stored.supplier_id, quote = %stored.number, "quote submitted");
        Ok(stored)
    }

    /// Replace the commercial attributes of an existing bid. Clears the
    /// computed benchmark and ranks; a revised bid counts as newly submitted
    /// for tie-break purposes.
    pub fn revise_quote(
        &self,
        rfq_id: &RfqId,
        submission: QuoteSubmission,
    ) -> Result<Quote, SourcingError> {
        let rfq = self.require_rfq(rfq_id)?;
        lifecycle::ensure_quotes_open(rfq.status)?;
        self.validate_submission(&submission)?;

        let mut quote = self
            .repository
            .quote_for_supplier(rfq_id, &submission.supplier_id)?
            .ok_or_else(|| SourcingError::QuoteNotFound {
                rfq: rfq_id.clone(),
                supplier: submission.supplier_id.clone(),
            })?;

        quote.total_price = submission.total_price;
        quote.currency = submission.currency;
        quote.delivery_days = submission.delivery_days;
        quote.validity_days = submission.validity_days;
        quote.quality_score = submission.quality_score;
        quote.compliance_score = submission.compliance_score;
        quote.esg_score = submission.esg_score;
        quote.benchmark_score = None;
        quote.price_rank = None;
        quote.overall_rank = None;
        quote.evaluated_at = None;
        quote.submitted_at = Utc::now();

        self.repository.update_quote(quote.clone())?;
        Ok(quote)
    }

    /// Run the benchmark engine over every quote on the RFQ and persist the
    /// scores and ranks as one set-based write. Idempotent: rerunning
    /// recomputes the same assignments. Moves the RFQ to `evaluating`.
    pub fn calculate_benchmarks(&self, rfq_id: &RfqId) -> Result<Vec<Quote>, SourcingError> {
        let mut rfq = self.require_rfq(rfq_id)?;
        lifecycle::ensure_can_evaluate(rfq.status)?;

        let mut quotes = self.repository.quotes_for(rfq_id)?;
        let scores = scoring::benchmark_quotes(&rfq.weights, &quotes)?;
        let ranks = scoring::assign_ranks(&quotes, &scores);

        let now = Utc::now();
        for ((quote, score), rank) in quotes.iter_mut().zip(&scores).zip(&ranks) {
            quote.benchmark_score = Some(scoring::round2(score.benchmark));
            quote.overall_rank = Some(rank.overall_rank);
            quote.price_rank = Some(rank.price_rank);
            quote.evaluated_at = Some(now);
        }

        rfq.status = RfqStatus::Evaluating;
        rfq.updated_at = now;
        self.repository.commit_evaluation(rfq, quotes.clone())?;

        quotes.sort_by_key(|quote| quote.overall_rank);
        info!(rfq = %rfq_id, quotes = quotes.len(), "benchmarks calculated");
        Ok(quotes)
    }

    /// Commit the irreversible award decision: the winner's quote is
    /// accepted, every other quote rejected, and the RFQ closed in one write.
    pub fn award(
        &self,
        rfq_id: &RfqId,
        supplier_id: &SupplierId,
        reason: String,
    ) -> Result<Rfq, SourcingError> {
        let mut rfq = self.require_rfq(rfq_id)?;
        lifecycle::ensure_can_award(rfq.status)?;

        let mut quotes = self.repository.quotes_for(rfq_id)?;
        if !quotes
            .iter()
            .any(|quote| quote.supplier_id == *supplier_id)
        {
            return Err(SourcingError::QuoteNotFound {
                rfq: rfq_id.clone(),
                supplier: supplier_id.clone(),
            });
        }

        let now = Utc::now();
        for quote in &mut quotes {
            quote.status = if quote.supplier_id == *supplier_id {
                QuoteStatus::Accepted
            } else {
                QuoteStatus::Rejected
            };
        }
        rfq.status = RfqStatus::Awarded;
        rfq.awarded_supplier = Some(supplier_id.clone());
        rfq.award_reason = Some(reason);
        rfq.closed_at = Some(now);
        rfq.updated_at = now;

        self.repository.commit_award(rfq.clone(), quotes)?;
        info!(rfq = %rfq.id, supplier = %supplier_id, "rfq awarded");
        Ok(rfq)
    }

    /// Cancel from any non-terminal state; stamps `closed_at`.
    pub fn cancel(&self, rfq_id: &RfqId) -> Result<Rfq, SourcingError> {
        let mut rfq = self.require_rfq(rfq_id)?;
        lifecycle::ensure_can_cancel(rfq.status)?;

        let now = Utc::now();
        rfq.status = RfqStatus::Cancelled;
        rfq.closed_at = Some(now);
        rfq.updated_at = now;
        self.repository.update_rfq(rfq.clone())?;

        info!(rfq = %rfq.id, "rfq cancelled");
        Ok(rfq)
    }

    /// Cascade delete of a draft or cancelled RFQ with everything it owns.
    pub fn delete_rfq(&self, rfq_id: &RfqId) -> Result<(), SourcingError> {
        let rfq = self.require_rfq(rfq_id)?;
        lifecycle::ensure_can_delete(rfq.status)?;
        self.repository.delete_rfq(rfq_id)?;
        Ok(())
    }

    pub fn rfq_overview(&self, rfq_id: &RfqId) -> Result<RfqOverview, SourcingError> {
        let rfq = self.require_rfq(rfq_id)?;
        let invitations = self.repository.invitations_for(rfq_id)?;
        let quotes = self.repository.quotes_ranked(rfq_id)?;
        Ok(RfqOverview {
            rfq,
            invitations,
            quotes,
        })
    }

    pub fn list_rfqs(&self) -> Result<Vec<Rfq>, SourcingError> {
        Ok(self.repository.list_rfqs()?)
    }

    pub fn invitations(&self, rfq_id: &RfqId) -> Result<Vec<SupplierInvitation>, SourcingError> {
        self.require_rfq(rfq_id)?;
        Ok(self.repository.invitations_for(rfq_id)?)
    }

    pub fn quotes(&self, rfq_id: &RfqId) -> Result<Vec<Quote>, SourcingError> {
        self.require_rfq(rfq_id)?;
        Ok(self.repository.quotes_ranked(rfq_id)?)
    }
}
