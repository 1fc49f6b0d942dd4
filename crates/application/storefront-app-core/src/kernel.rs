use std::sync::Arc;

use storefront_core::{generate_fallback, normalize, FilterSet, Product};
use storefront_infra::{CatalogError, CatalogSource};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::app_core::{AppCommand, AppStore, DomainEvent};
use crate::domain::{CatalogOrigin, RefreshId, StoreSettings, ViewState};

/// The view coordinator. Filter edits are applied synchronously in
/// `dispatch`; catalog fetches run as background tasks whose completions are
/// applied by `tick`, `next_change` or `run`.
pub struct AppKernel<C> {
    pub store: AppStore,
    source: Arc<C>,
    settings: StoreSettings,

    tx: mpsc::Sender<DomainEvent>,
    rx: mpsc::Receiver<DomainEvent>,
    cmd_tx: mpsc::Sender<AppCommand>,
    cmd_rx: mpsc::Receiver<AppCommand>,
}

impl<C> AppKernel<C>
where
    C: CatalogSource,
{
    pub fn new(store: AppStore, source: C, settings: StoreSettings) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        Self {
            store,
            source: Arc::new(source),
            settings,
            tx,
            rx,
            cmd_tx,
            cmd_rx,
        }
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn dispatch(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::LoadCatalog => {
                if !self.store.has_catalog_or_pending() {
                    self.start_refresh();
                }
            }
            AppCommand::RefreshCatalog => self.start_refresh(),

            AppCommand::SetFilters(filters) => self.replace_filters(filters),
            AppCommand::ToggleFacetValue { facet, value } => {
                let next = self.store.filters().toggle(facet, &value);
                self.replace_filters(next);
            }
            AppCommand::ClearFacet(facet) => {
                let next = self.store.filters().clear(facet);
                self.replace_filters(next);
            }
            AppCommand::SetAvailability(on) => {
                let next = self.store.filters().with_availability(on);
                self.replace_filters(next);
            }
            AppCommand::SetCustomizable(on) => {
                let next = self.store.filters().with_customizable(on);
                self.replace_filters(next);
            }
            AppCommand::ResetFilters => self.replace_filters(FilterSet::default()),
        }
    }

    fn replace_filters(&mut self, filters: FilterSet) {
        self.store.apply(DomainEvent::FiltersReplaced(filters));
    }

    fn start_refresh(&mut self) {
        let refresh_id: RefreshId = uuid::Uuid::new_v4();
        self.store.apply(DomainEvent::RefreshStarted { refresh_id });

        let tx = self.tx.clone();
        let source = self.source.clone();
        let settings = self.settings.clone();
        let spawn_res = crate::async_runtime::spawn(async move {
            let (products, origin) = fetch_or_fallback(source.as_ref(), &settings).await;
            let _ = tx
                .send(DomainEvent::CatalogInstalled {
                    refresh_id,
                    products,
                    origin,
                })
                .await;
        });

        if let Err(e) = spawn_res {
            warn!("failed to start catalog refresh: {e}");
            self.store.apply(DomainEvent::CatalogInstalled {
                refresh_id,
                products: generate_fallback(self.settings.fallback_count),
                origin: CatalogOrigin::Fallback {
                    reason: format!("refresh worker unavailable: {e}"),
                },
            });
        }
    }

    fn accept(&mut self, ev: DomainEvent) -> bool {
        if let DomainEvent::CatalogInstalled { refresh_id, .. } = &ev {
            if self.store.active_refresh() != Some(*refresh_id) {
                debug!("discarding stale catalog from refresh {refresh_id}");
                return false;
            }
        }
        self.store.apply(ev);
        true
    }

    /// Apply every refresh that has already completed. Returns true if the
    /// view changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        while let Ok(ev) = self.rx.try_recv() {
            changed |= self.accept(ev);
        }
        changed
    }

    /// Wait for the next refresh completion that is not stale and apply it.
    pub async fn next_change(&mut self) {
        while let Some(ev) = self.rx.recv().await {
            if self.accept(ev) {
                return;
            }
        }
    }

    pub fn sender(&self) -> mpsc::Sender<DomainEvent> {
        self.tx.clone()
    }

    /// Handle for submitting commands to a running `run` loop from elsewhere.
    pub fn commands(&self) -> mpsc::Sender<AppCommand> {
        self.cmd_tx.clone()
    }

    /// Event loop for the lifetime of a mounted view: loads the catalog
    /// immediately, refreshes on the configured interval, applies queued
    /// commands, and calls `on_change` after every state change.
    pub async fn run<F>(&mut self, cancel: CancellationToken, mut on_change: F)
    where
        F: FnMut(&ViewState),
    {
        let mut ticker = tokio::time::interval(self.settings.refresh_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.dispatch(AppCommand::RefreshCatalog);
                }
                Some(cmd) = self.cmd_rx.recv() => {
                    let is_refresh = matches!(
                        cmd,
                        AppCommand::LoadCatalog | AppCommand::RefreshCatalog
                    );
                    self.dispatch(cmd);
                    if !is_refresh {
                        on_change(&self.store.state());
                    }
                }
                Some(ev) = self.rx.recv() => {
                    if self.accept(ev) {
                        on_change(&self.store.state());
                    }
                }
            }
        }
    }
}

/// One refresh cycle: fetch within the bounded wait, normalize, or fall back
/// to the synthetic catalog. Never fails.
pub async fn fetch_or_fallback<C>(
    source: &C,
    settings: &StoreSettings,
) -> (Vec<Product>, CatalogOrigin)
where
    C: CatalogSource + ?Sized,
{
    let limit = settings.limit();
    let timeout = settings.fetch_timeout();

    let res = match tokio::time::timeout(timeout, source.fetch_catalog(limit, timeout)).await {
        Ok(res) => res,
        Err(_) => Err(CatalogError::Timeout(timeout)),
    };

    match res {
        Ok(records) => (normalize(records), CatalogOrigin::Source),
        Err(e) => {
            warn!("catalog unavailable ({:?}), using fallback: {e}", e.kind());
            (
                generate_fallback(settings.fallback_count),
                CatalogOrigin::Fallback {
                    reason: e.to_string(),
                },
            )
        }
    }
}
