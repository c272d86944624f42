//! Supplier sourcing: RFQ lifecycle, quote benchmarking, and the award
//! transaction.
//!
//! The module is organized the way the workflow runs: `lifecycle` gates every
//! mutation, `scoring` turns a quote set into comparable benchmark scores and
//! ranks, `service` orchestrates both against the `repository` contract, and
//! `router` is the thin HTTP adapter on top.

pub mod domain;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    EvaluationWeights, InvitationId, InvitationStatus, Quote, QuoteId, QuoteStatus,
    QuoteSubmission, Rfq, RfqDraft, RfqId, RfqOverview, RfqStatus, SupplierId, SupplierInvitation,
};
pub use lifecycle::{LifecycleError, MIN_INVITED_SUPPLIERS};
pub use repository::{
    DirectoryError, RepositoryError, SourcingRepository, SupplierDirectory, SupplierProfile,
};
pub use router::sourcing_router;
pub use scoring::{
    assign_ranks, benchmark_quotes, round2, RankAssignment, ScoreBreakdown, ScoringError,
    MIN_QUOTES_FOR_BENCHMARK,
};
pub use service::{ErrorKind, SourcingError, SourcingService};
