use fmops::workflows::sourcing::{
    DirectoryError, InvitationId, Quote, QuoteId, RepositoryError, Rfq, RfqId, RfqStatus,
    SourcingRepository, SupplierDirectory, SupplierId, SupplierInvitation, SupplierProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct SourcingStore {
    rfqs: HashMap<RfqId, Rfq>,
    invitations: HashMap<InvitationId, SupplierInvitation>,
    quotes: HashMap<QuoteId, Quote>,
}

/// Single-process store backing the service. One mutex serializes every
/// write, which is what makes the evaluation and award commits atomic.
#[derive(Default)]
pub(crate) struct InMemorySourcingRepository {
    store: Mutex<SourcingStore>,
    rfq_seq: AtomicU64,
    quote_seq: AtomicU64,
}

impl InMemorySourcingRepository {
    fn guard(&self) -> MutexGuard<'_, SourcingStore> {
        self.store.lock().expect("repository mutex poisoned")
    }
}

impl SourcingRepository for InMemorySourcingRepository {
    fn next_rfq_sequence(&self) -> Result<u64, RepositoryError> {
        Ok(self.rfq_seq.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn next_quote_sequence(&self) -> Result<u64, RepositoryError> {
        Ok(self.quote_seq.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn insert_rfq(&self, rfq: Rfq) -> Result<Rfq, RepositoryError> {
        let mut store = self.guard();
        if store.rfqs.contains_key(&rfq.id) {
            return Err(RepositoryError::Conflict);
        }
        store.rfqs.insert(rfq.id.clone(), rfq.clone());
        Ok(rfq)
    }

    fn update_rfq(&self, rfq: Rfq) -> Result<(), RepositoryError> {
        let mut store = self.guard();
        if !store.rfqs.contains_key(&rfq.id) {
            return Err(RepositoryError::NotFound);
        }
        store.rfqs.insert(rfq.id.clone(), rfq);
        Ok(())
    }

    fn fetch_rfq(&self, id: &RfqId) -> Result<Option<Rfq>, RepositoryError> {
        Ok(self.guard().rfqs.get(id).cloned())
    }

    fn list_rfqs(&self) -> Result<Vec<Rfq>, RepositoryError> {
        let store = self.guard();
        let mut rfqs: Vec<Rfq> = store.rfqs.values().cloned().collect();
        rfqs.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(rfqs)
    }

    fn delete_rfq(&self, id: &RfqId) -> Result<(), RepositoryError> {
        let mut store = self.guard();
        if store.rfqs.remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        store
            .invitations
            .retain(|_, invitation| invitation.rfq_id != *id);
        store.quotes.retain(|_, quote| quote.rfq_id != *id);
        Ok(())
    }

    fn insert_invitation(
        &self,
        invitation: SupplierInvitation,
    ) -> Result<SupplierInvitation, RepositoryError> {
        let mut store = self.guard();
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
        let mut store = self.guard();
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
        Ok(self.guard().invitations.get(id).cloned())
    }

    fn invitation_for_supplier(
        &self,
        rfq: &RfqId,
        supplier: &SupplierId,
    ) -> Result<Option<SupplierInvitation>, RepositoryError> {
        Ok(self
            .guard()
            .invitations
            .values()
            .find(|invitation| invitation.rfq_id == *rfq && invitation.supplier_id == *supplier)
            .cloned())
    }

    fn invitations_for(&self, rfq: &RfqId) -> Result<Vec<SupplierInvitation>, RepositoryError> {
        let store = self.guard();
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
        self.guard()
            .invitations
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn insert_quote(&self, quote: Quote) -> Result<Quote, RepositoryError> {
        let mut store = self.guard();
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
        let mut store = self.guard();
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
            .guard()
            .quotes
            .values()
            .find(|quote| quote.rfq_id == *rfq && quote.supplier_id == *supplier)
            .cloned())
    }

    fn quotes_for(&self, rfq: &RfqId) -> Result<Vec<Quote>, RepositoryError> {
        let store = self.guard();
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
        let mut store = self.guard();
        let stored = store.rfqs.get(&rfq.id).ok_or(RepositoryError::NotFound)?;
        // The caller computed against a quoting-window snapshot; reject the
        // write if the stored row has since left that window.
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
        let mut store = self.guard();
        let stored = store.rfqs.get(&rfq.id).ok_or(RepositoryError::NotFound)?;
        // A concurrent award or cancellation wins; this snapshot is stale.
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

/// Fixed supplier master data. A registry integration would replace this
/// with a lookup against the procurement backend.
pub(crate) struct StaticSupplierDirectory {
    suppliers: HashMap<SupplierId, SupplierProfile>,
}

impl StaticSupplierDirectory {
    pub(crate) fn seeded() -> Self {
        let mut suppliers = HashMap::new();
        for (id, name, qualifications) in [
            (
                "sup-nordklima",
                "NordKlima Gebäudetechnik GmbH",
                vec!["ISO 9001", "VDMA HVAC"],
            ),
            (
                "sup-hanse",
                "Hanse Facility Services AG",
                vec!["ISO 9001", "ISO 14001"],
            ),
            (
                "sup-meridian",
                "Meridian Cleaning & Care",
                vec!["ISO 9001"],
            ),
            (
                "sup-stadtwerk",
                "Stadtwerk Technik Service",
                vec!["ISO 9001", "SCC**"],
            ),
        ] {
            let supplier_id = SupplierId(id.to_string());
            suppliers.insert(
                supplier_id.clone(),
                SupplierProfile {
                    id: supplier_id,
                    name: name.to_string(),
                    qualifications: qualifications.into_iter().map(str::to_string).collect(),
                },
            );
        }
        Self { suppliers }
    }
}

impl SupplierDirectory for StaticSupplierDirectory {
    fn lookup(&self, id: &SupplierId) -> Result<Option<SupplierProfile>, DirectoryError> {
        Ok(self.suppliers.get(id).cloned())
    }
}
