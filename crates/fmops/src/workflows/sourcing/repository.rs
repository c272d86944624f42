use serde::{Deserialize, Serialize};

use super::domain::{InvitationId, Quote, Rfq, RfqId, SupplierId, SupplierInvitation};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("concurrent update detected")]
    StaleWrite,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Persistence boundary for RFQs, invitations, and quotes.
///
/// Contract (the engine depends on all three):
/// - mutations against the same RFQ id are serialized (single writer per
///   RFQ), so read-modify-write operations never interleave;
/// - (rfq, supplier) is unique for invitations and for quotes; a violating
///   insert fails with [`RepositoryError::Conflict`];
/// - `commit_evaluation` and `commit_award` are all-or-nothing: on any
///   failure no touched record may be left modified;
/// - both commits re-check the stored RFQ before writing and fail with
///   [`RepositoryError::StaleWrite`] when its status no longer permits the
///   operation (a terminal row for either commit, or a draft for an
///   evaluation), so a caller racing another writer cannot overwrite the
///   outcome that landed first.
pub trait SourcingRepository: Send + Sync {
    /// Monotonic counter backing human-readable RFQ numbers.
    fn next_rfq_sequence(&self) -> Result<u64, RepositoryError>;
    /// Monotonic counter backing human-readable quote numbers.
    fn next_quote_sequence(&self) -> Result<u64, RepositoryError>;

    fn insert_rfq(&self, rfq: Rfq) -> Result<Rfq, RepositoryError>;
    fn update_rfq(&self, rfq: Rfq) -> Result<(), RepositoryError>;
    fn fetch_rfq(&self, id: &RfqId) -> Result<Option<Rfq>, RepositoryError>;
    fn list_rfqs(&self) -> Result<Vec<Rfq>, RepositoryError>;
    /// Cascade delete: removes the RFQ with its invitations and quotes.
    fn delete_rfq(&self, id: &RfqId) -> Result<(), RepositoryError>;

    fn insert_invitation(
        &self,
        invitation: SupplierInvitation,
    ) -> Result<SupplierInvitation, RepositoryError>;
    fn update_invitation(&self, invitation: SupplierInvitation) -> Result<(), RepositoryError>;
    fn fetch_invitation(
        &self,
        id: &InvitationId,
    ) -> Result<Option<SupplierInvitation>, RepositoryError>;
    fn invitation_for_supplier(
        &self,
        rfq: &RfqId,
        supplier: &SupplierId,
    ) -> Result<Option<SupplierInvitation>, RepositoryError>;
    fn invitations_for(&self, rfq: &RfqId) -> Result<Vec<SupplierInvitation>, RepositoryError>;
    fn delete_invitation(&self, id: &InvitationId) -> Result<(), RepositoryError>;

    fn insert_quote(&self, quote: Quote) -> Result<Quote, RepositoryError>;
    fn update_quote(&self, quote: Quote) -> Result<(), RepositoryError>;
    fn quote_for_supplier(
        &self,
        rfq: &RfqId,
        supplier: &SupplierId,
    ) -> Result<Option<Quote>, RepositoryError>;
    /// Quotes in submission order.
    fn quotes_for(&self, rfq: &RfqId) -> Result<Vec<Quote>, RepositoryError>;
    /// Quotes ordered by overall rank; unevaluated quotes follow in
    /// submission order.
    fn quotes_ranked(&self, rfq: &RfqId) -> Result<Vec<Quote>, RepositoryError>;

    /// Set-based write of one scoring run: the RFQ row and every quote's
    /// benchmark/rank fields land together or not at all. Fails with
    /// [`RepositoryError::StaleWrite`] if the stored RFQ has left the
    /// quoting window since the caller read it.
    fn commit_evaluation(&self, rfq: Rfq, quotes: Vec<Quote>) -> Result<(), RepositoryError>;
    /// The award transaction: winner accepted, losers rejected, RFQ closed,
    /// all in one write. A partially awarded RFQ must never be observable,
    /// and a commit built from a snapshot of an RFQ that has since been
    /// awarded or cancelled fails with [`RepositoryError::StaleWrite`].
    fn commit_award(&self, rfq: Rfq, quotes: Vec<Quote>) -> Result<(), RepositoryError>;
}

/// Read-only row from the supplier master-data registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierProfile {
    pub id: SupplierId,
    pub name: String,
    pub qualifications: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("supplier registry unavailable: {0}")]
    Unavailable(String),
}

/// Lookup into the supplier registry. The sourcing core never mutates it.
pub trait SupplierDirectory: Send + Sync {
    fn lookup(&self, id: &SupplierId) -> Result<Option<SupplierProfile>, DirectoryError>;
}
