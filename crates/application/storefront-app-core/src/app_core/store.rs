use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use storefront_core::{FilterSet, Product};

use crate::domain::{RefreshId, ViewState};

use super::{events::DomainEvent, reducer::reduce};

#[derive(Clone, Default)]
pub struct AppStore {
    inner: Arc<Mutex<ViewState>>,
}

impl AppStore {
    pub fn new(state: ViewState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    // A panic mid-reduce leaves the previous state behind, which is still valid.
    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ViewState {
        self.lock().clone()
    }

    pub fn apply(&self, ev: DomainEvent) {
        let mut guard = self.lock();
        let next = reduce(guard.clone(), ev);
        *guard = next;
    }

    pub fn filters(&self) -> FilterSet {
        self.lock().filters.clone()
    }

    pub fn visible(&self) -> Vec<Product> {
        self.lock().visible.clone()
    }

    pub fn active_refresh(&self) -> Option<RefreshId> {
        self.lock().active_refresh
    }

    pub(crate) fn has_catalog_or_pending(&self) -> bool {
        let guard = self.lock();
        guard.origin.is_some() || guard.refresh_in_flight
    }
}
