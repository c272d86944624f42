use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for sourcing events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RfqId(pub String);

/// Weak reference into the supplier master-data registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupplierId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvitationId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

impl fmt::Display for RfqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for InvitationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Finite lifecycle of a sourcing event. `Awarded` and `Cancelled` are
/// terminal; nothing attached to the RFQ may change afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RfqStatus {
    Draft,
    Sent,
    ReceivingQuotes,
    Evaluating,
    Awarded,
    Cancelled,
}

impl RfqStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RfqStatus::Draft => "draft",
            RfqStatus::Sent => "sent",
            RfqStatus::ReceivingQuotes => "receiving_quotes",
            RfqStatus::Evaluating => "evaluating",
            RfqStatus::Awarded => "awarded",
            RfqStatus::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, RfqStatus::Awarded | RfqStatus::Cancelled)
    }
}

impl fmt::Display for RfqStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four evaluation weights. Plain integers by design: the benchmark is
/// normalized by the actual sum, not by an assumed 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationWeights {
    pub price: u32,
    pub quality: u32,
    pub delivery: u32,
    pub compliance: u32,
}

impl EvaluationWeights {
    /// Summed in `u64`: the four weights arrive unconstrained, so a `u32`
    /// sum could overflow.
    pub const fn total(&self) -> u64 {
        self.price as u64 + self.quality as u64 + self.delivery as u64 + self.compliance as u64
    }
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self {
            price: 40,
            quality: 30,
            delivery: 15,
            compliance: 15,
        }
    }
}

/// A sourcing event for a category of service or work. Owns its invitations
/// and quotes; customer/site/category are opaque references for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rfq {
    pub id: RfqId,
    pub number: String,
    pub title: String,
    pub description: Option<String>,
    pub customer_ref: Option<String>,
    pub site_ref: Option<String>,
    pub category_ref: Option<String>,
    pub status: RfqStatus,
    pub weights: EvaluationWeights,
    pub deadline: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub awarded_supplier: Option<SupplierId>,
    pub award_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Viewed,
    Responded,
    Declined,
    Quoted,
}

impl InvitationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Viewed => "viewed",
            InvitationStatus::Responded => "responded",
            InvitationStatus::Declined => "declined",
            InvitationStatus::Quoted => "quoted",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One supplier asked to bid on one RFQ. At most one per (RFQ, supplier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierInvitation {
    pub id: InvitationId,
    pub rfq_id: RfqId,
    pub supplier_id: SupplierId,
    pub status: InvitationStatus,
    pub invited_at: DateTime<Utc>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
    pub decline_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Submitted,
    Accepted,
    Rejected,
}

impl QuoteStatus {
    pub const fn label(self) -> &'static str {
        match self {
            QuoteStatus::Submitted => "submitted",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One supplier's bid. Benchmark and ranks stay `None` until the scoring
/// engine has run; every run overwrites them wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub number: String,
    pub rfq_id: RfqId,
    pub supplier_id: SupplierId,
    pub total_price: f64,
    pub currency: String,
    pub delivery_days: Option<u32>,
    pub validity_days: Option<u32>,
    pub quality_score: Option<u8>,
    pub compliance_score: Option<u8>,
    pub esg_score: Option<u8>,
    pub benchmark_score: Option<f64>,
    pub price_rank: Option<u32>,
    pub overall_rank: Option<u32>,
    pub status: QuoteStatus,
    pub submitted_at: DateTime<Utc>,
    pub evaluated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a new RFQ in `draft`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfqDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub customer_ref: Option<String>,
    #[serde(default)]
    pub site_ref: Option<String>,
    #[serde(default)]
    pub category_ref: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub weights: Option<EvaluationWeights>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Payload for submitting or revising a bid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSubmission {
    pub supplier_id: SupplierId,
    pub total_price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub delivery_days: Option<u32>,
    #[serde(default)]
    pub validity_days: Option<u32>,
    #[serde(default)]
    pub quality_score: Option<u8>,
    #[serde(default)]
    pub compliance_score: Option<u8>,
    #[serde(default)]
    pub esg_score: Option<u8>,
}

/// Read model: the RFQ with its invitations and rank-ordered quotes.
#[derive(Debug, Clone, Serialize)]
pub struct RfqOverview {
    pub rfq: Rfq,
    pub invitations: Vec<SupplierInvitation>,
    pub quotes: Vec<Quote>,
}
