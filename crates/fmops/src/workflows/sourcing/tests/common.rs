use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::sourcing::domain::{
    EvaluationWeights, InvitationId, Quote, QuoteId, QuoteStatus, QuoteSubmission, Rfq, RfqDraft,
    RfqId, RfqStatus, SupplierId, SupplierInvitation,
};
use crate::workflows::sourcing::repository::{
    DirectoryError, RepositoryError, SourcingRepository, SupplierDirectory, SupplierProfile,
};
use crate::workflows::sourcing::service::SourcingService;
use crate::workflows::sourcing::sourcing_router;

#[derive(Default)]
struct Store {
    rfqs: HashMap<RfqId, Rfq>,
    invitations: HashMap<InvitationId, SupplierInvitation>,
    quotes: HashMap<QuoteId, Quote>,
}

/// Single-mutex store: the lock serializes every mutation, which satisfies
/// the per-RFQ single-writer contract. Fault flags let tests simulate an
/// outage or a mid-award crash; `fetch_rendezvous` lets two callers be
/// held between their read and their commit to provoke a stale write.
#[derive(Default)]
pub(super) struct MemoryRepository {
    store: Mutex<Store>,
    rfq_seq: AtomicU64,
    quote_seq: AtomicU64,
    pub(super) offline: AtomicBool,
    pub(super) fail_next_award: AtomicBool,
    pub(super) fetch_rendezvous: Mutex<Option<Arc<Barrier>>>,
}

impl MemoryRepository {
    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Store>, RepositoryError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }
        Ok(self.store.lock().expect("store mutex poisoned"))
    }

    pub(super) fn raw_rfq(&self, id: &RfqId) -> Option<Rfq> {
        self.store
            .lock()
            .expect("store mutex poisoned")
            .rfqs
            .get(id)
            .cloned()
    }

    pub(super) fn raw_quotes(&self, rfq: &RfqId) -> Vec<Quote> {
        let store = self.store.lock().expect("store mutex poisoned");
        let mut quotes: Vec<Quote> = store
            .quotes
            .values()
            .filter(|quote| quote.rfq_id == *rfq)
            .cloned()
            .collect();
        quotes.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        quotes
    }
}

impl SourcingRepository for MemoryRepository {
    fn next_rfq_sequence(&self) -> Result<u64, RepositoryError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }
        Ok(self.rfq_seq.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn next_quote_sequence(&self) -> Result<u64, RepositoryError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }
        Ok(self.quote_seq.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn insert_rfq(&self, rfq: Rfq) -> Result<Rfq, RepositoryError> {
        let mut store = self.guard()?;
        if store.rfqs.contains_key(&rfq.id) {
            return Err(RepositoryError::Conflict);
        }
        store.rfqs.insert(rfq.id.clone(), rfq.clone());
        Ok(rfq)
    }

    fn update_rfq(&self, rfq: Rfq) -> Result<(), RepositoryError> {
        let mut store = self.guard()?;
        if !store.rfqs.contains_key(&rfq.id) {
            return Err(RepositoryError::NotFound);
        }
        store.rfqs.insert(rfq.id.clone(), rfq);
        Ok(())
    }

    fn fetch_rfq(&self, id: &RfqId) -> Result<Option<Rfq>, RepositoryError> {
        let rfq = self.guard()?.rfqs.get(id).cloned();
        let rendezvous = self
            .fetch_rendezvous
            .lock()
            .expect("rendezvous mutex poisoned")
            .clone();
        if let Some(barrier) = rendezvous {
            barrier.wait();
        }
        Ok(rfq)
    }

    fn list_rfqs(&self) -> Result<Vec<Rfq>, RepositoryError> {
        let store = self.guard()?;
        let mut rfqs: Vec<Rfq> = store.rfqs.values().cloned().collect();
        rfqs.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(rfqs)
    }

    fn delete_rfq(&self, id: &RfqId) -> Result<(), RepositoryError> {
        let mut store = self.guard()?;
        if store.rfqs.remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        store.invitations.retain(|_, invitation| invitation.rfq_id != *id);
        store.quotes.retain(|_, quote| quote.rfq_id != *id);
        Ok(())
    }

    fn insert_invitation(
        &self,
        invitation: SupplierInvitation,
    ) -> Result<SupplierInvitation, RepositoryError> {
        let mut store = self.guard()?;
        let duplicate = store.invitations.values().any(|existing| {
            existing.rfq_id == invitation.rfq_id && existing.supplier_id == invitation.supplier_id
        });
        if duplicate || store.invitations.contains_key(&invitation.id) {
            return Err(RepositoryError::Conflict);
        }
        store
            .invitations
            .insert(invitation.id.clone(), invitation.clone());
        Ok(invitation)
    }

    fn update_invitation(&self, invitation: SupplierInvitation) -> Result<(), RepositoryError> {
        let mut store = self.guard()?;
        if !store.invitations.contains_key(&invitation.id) {
            return Err(RepositoryError::NotFound);
        }
        store.invitations.insert(invitation.id.clone(), invitation);
        Ok(())
    }

    fn fetch_invitation(
        &self,
        id: &InvitationId,
    ) -> Result<Option<SupplierInvitation>, RepositoryError> {
        Ok(self.guard()?.invitations.get(id).cloned())
    }

    fn invitation_for_supplier(
        &self,
        rfq: &RfqId,
        supplier: &SupplierId,
    ) -> Result<Option<SupplierInvitation>, RepositoryError> {
        Ok(self
            .guard()?
            .invitations
            .values()
            .find(|invitation| invitation.rfq_id == *rfq && invitation.supplier_id == *supplier)
            .cloned())
    }

    fn invitations_for(&self, rfq: &RfqId) -> Result<Vec<SupplierInvitation>, RepositoryError> {
        let store = self.guard()?;
        let mut invitations: Vec<SupplierInvitation> = store
            .invitations
            .values()
            .filter(|invitation| invitation.rfq_id == *rfq)
            .cloned()
            .collect();
        invitations.sort_by(|a, b| {
            a.invited_at
                .cmp(&b.invited_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(invitations)
    }

    fn delete_invitation(&self, id: &InvitationId) -> Result<(), RepositoryError> {
        let mut store = self.guard()?;
        store
            .invitations
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn insert_quote(&self, quote: Quote) -> Result<Quote, RepositoryError> {
        let mut store = self.guard()?;
        let duplicate = store
            .quotes
            .values()
            .any(|existing| existing.rfq_id == quote.rfq_id && existing.supplier_id == quote.supplier_id);
        if duplicate || store.quotes.contains_key(&quote.id) {
            return Err(RepositoryError::Conflict);
        }
        store.quotes.insert(quote.id.clone(), quote.clone());
        Ok(quote)
    }

    fn update_quote(&self, quote: Quote) -> Result<(), RepositoryError> {
        let mut store = self.guard()?;
        if !store.quotes.contains_key(&quote.id) {
            return Err(RepositoryError::NotFound);
        }
        store.quotes.insert(quote.id.clone(), quote);
        Ok(())
    }

    fn quote_for_supplier(
        &self,
        rfq: &RfqId,
        supplier: &SupplierId,
    ) -> Result<Option<Quote>, RepositoryError> {
        Ok(self
            .guard()?
            .quotes
            .values()
            .find(|quote| quote.rfq_id == *rfq && quote.supplier_id == *supplier)
            .cloned())
    }

    fn quotes_for(&self, rfq: &RfqId) -> Result<Vec<Quote>, RepositoryError> {
        let store = self.guard()?;
        let mut quotes: Vec<Quote> = store
            .quotes
            .values()
            .filter(|quote| quote.rfq_id == *rfq)
            .cloned()
            .collect();
        quotes.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(quotes)
    }

    fn quotes_ranked(&self, rfq: &RfqId) -> Result<Vec<Quote>, RepositoryError> {
        let mut quotes = self.quotes_for(rfq)?;
        quotes.sort_by(|a, b| match (a.overall_rank, b.overall_rank) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.submitted_at.cmp(&b.submitted_at),
        });
        Ok(quotes)
    }

    fn commit_evaluation(&self, rfq: Rfq, quotes: Vec<Quote>) -> Result<(), RepositoryError> {
        let mut store = self.guard()?;
        let stored = store.rfqs.get(&rfq.id).ok_or(RepositoryError::NotFound)?;
        if stored.status.is_terminal() || stored.status == RfqStatus::Draft {
            return Err(RepositoryError::StaleWrite);
        }
        if quotes.iter().any(|quote| !store.quotes.contains_key(&quote.id)) {
            return Err(RepositoryError::StaleWrite);
        }
        store.rfqs.insert(rfq.id.clone(), rfq);
        for quote in quotes {
            store.quotes.insert(quote.id.clone(), quote);
        }
        Ok(())
    }

    fn commit_award(&self, rfq: Rfq, quotes: Vec<Quote>) -> Result<(), RepositoryError> {
        if self.fail_next_award.swap(false, Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable(
                "simulated fault before award commit".to_string(),
            ));
        }
        let mut store = self.guard()?;
        let stored = store.rfqs.get(&rfq.id).ok_or(RepositoryError::NotFound)?;
        if stored.status.is_terminal() {
            return Err(RepositoryError::StaleWrite);
        }
        if quotes.iter().any(|quote| !store.quotes.contains_key(&quote.id)) {
            return Err(RepositoryError::StaleWrite);
        }
        store.rfqs.insert(rfq.id.clone(), rfq);
        for quote in quotes {
            store.quotes.insert(quote.id.clone(), quote);
        }
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryDirectory {
    suppliers: HashMap<SupplierId, SupplierProfile>,
}

impl MemoryDirectory {
    pub(super) fn seeded() -> Self {
        let mut suppliers = HashMap::new();
        for (id, name) in [
            ("sup-alpha", "Alpha Facility Care GmbH"),
            ("sup-beta", "Beta Building Services"),
            ("sup-gamma", "Gamma Technical Maintenance"),
            ("sup-delta", "Delta Cleaning Group"),
        ] {
            let supplier_id = SupplierId(id.to_string());
            suppliers.insert(
                supplier_id.clone(),
                SupplierProfile {
                    id: supplier_id,
                    name: name.to_string(),
                    qualifications: vec!["ISO 9001".to_string()],
                },
            );
        }
        Self { suppliers }
    }
}

impl SupplierDirectory for MemoryDirectory {
    fn lookup(&self, id: &SupplierId) -> Result<Option<SupplierProfile>, DirectoryError> {
        Ok(self.suppliers.get(id).cloned())
    }
}

pub(super) fn build_service() -> (
    SourcingService<MemoryRepository, MemoryDirectory>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let directory = Arc::new(MemoryDirectory::seeded());
    let service = SourcingService::new(repository.clone(), directory);
    (service, repository)
}

pub(super) fn supplier(id: &str) -> SupplierId {
    SupplierId(id.to_string())
}

pub(super) fn draft() -> RfqDraft {
    RfqDraft {
        title: "HVAC maintenance, Hamburg campus".to_string(),
        description: Some("Quarterly maintenance of rooftop units".to_string()),
        customer_ref: Some("cust-204".to_string()),
        site_ref: Some("site-hh-01".to_string()),
        category_ref: Some("cat-hvac".to_string()),
        deadline: None,
        weights: None,
    }
}

pub(super) fn submission(supplier_id: &str, total_price: f64) -> QuoteSubmission {
    QuoteSubmission {
        supplier_id: supplier(supplier_id),
        total_price,
        currency: "EUR".to_string(),
        delivery_days: Some(14),
        validity_days: Some(30),
        quality_score: Some(70),
        compliance_score: Some(70),
        esg_score: Some(70),
    }
}

/// The worked three-quote scenario: weights 40/30/15/15 and quotes
/// A (100k, q80, 10d, c70/e70), B (90k, q60, 20d, c60/e60),
/// C (120k, q90, 5d, c90/e90). Expected order B, A, C.
pub(super) fn scenario_submissions() -> [QuoteSubmission; 3] {
    [
        QuoteSubmission {
            supplier_id: supplier("sup-alpha"),
            total_price: 100_000.0,
            currency: "EUR".to_string(),
            delivery_days: Some(10),
            validity_days: Some(30),
            quality_score: Some(80),
            compliance_score: Some(70),
            esg_score: Some(70),
        },
        QuoteSubmission {
            supplier_id: supplier("sup-beta"),
            total_price: 90_000.0,
            currency: "EUR".to_string(),
            delivery_days: Some(20),
            validity_days: Some(30),
            quality_score: Some(60),
            compliance_score: Some(60),
            esg_score: Some(60),
        },
        QuoteSubmission {
            supplier_id: supplier("sup-gamma"),
            total_price: 120_000.0,
            currency: "EUR".to_string(),
            delivery_days: Some(5),
            validity_days: Some(30),
            quality_score: Some(90),
            compliance_score: Some(90),
            esg_score: Some(90),
        },
    ]
}

/// Create, invite three suppliers, and send. Returns the sent RFQ.
pub(super) fn sent_rfq(
    service: &SourcingService<MemoryRepository, MemoryDirectory>,
) -> Rfq {
    let rfq = service.create_rfq(draft()).expect("rfq created");
    for id in ["sup-alpha", "sup-beta", "sup-gamma"] {
        service
            .invite_supplier(&rfq.id, &supplier(id))
            .expect("supplier invited");
    }
    service.send(&rfq.id).expect("rfq sent")
}

/// Sent RFQ with the scenario quotes already submitted.
pub(super) fn rfq_with_scenario_quotes(
    service: &SourcingService<MemoryRepository, MemoryDirectory>,
) -> Rfq {
    let rfq = sent_rfq(service);
    for submission in scenario_submissions() {
        service
            .submit_quote(&rfq.id, submission)
            .expect("quote submitted");
    }
    rfq
}

/// Bare quote fixture for pure scoring tests, bypassing the service.
pub(super) fn quote_fixture(id: &str, total_price: f64, minute: u32) -> Quote {
    Quote {
        id: QuoteId(format!("quo-{id}")),
        number: format!("Q-{id}"),
        rfq_id: RfqId("rfq-000001".to_string()),
        supplier_id: SupplierId(format!("sup-{id}")),
        total_price,
        currency: "EUR".to_string(),
        delivery_days: None,
        validity_days: None,
        quality_score: None,
        compliance_score: None,
        esg_score: None,
        benchmark_score: None,
        price_rank: None,
        overall_rank: None,
        status: QuoteStatus::Submitted,
        submitted_at: Utc
            .with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
            .single()
            .expect("valid timestamp")
            + Duration::minutes(i64::from(minute)),
        evaluated_at: None,
    }
}

pub(super) fn weights(price: u32, quality: u32, delivery: u32, compliance: u32) -> EvaluationWeights {
    EvaluationWeights {
        price,
        quality,
        delivery,
        compliance,
    }
}

pub(super) fn sourcing_router_with_service(
    service: SourcingService<MemoryRepository, MemoryDirectory>,
) -> axum::Router {
    sourcing_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
