use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use storefront_app_core::app_core::{AppCommand, AppStore, DomainEvent};
use storefront_app_core::kernel::AppKernel;
use storefront_app_core::{CatalogOrigin, StoreSettings, ViewStatus};
use storefront_core::{Facet, FilterSet, ProductId, RawRecord};
use storefront_infra::{CatalogError, CatalogSource};
use tokio::sync::Notify;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

const WAIT: Duration = Duration::from_secs(5);

fn records(first_id: u64, count: usize) -> Vec<RawRecord> {
    (0..count)
        .map(|i| RawRecord {
            id: ProductId::Num(first_id + i as u64),
            title: format!("Item {i}"),
            price: 5.0 + i as f64,
            image: format!("https://img.test/{i}.png"),
            category: "clothing".into(),
        })
        .collect()
}

fn ids(products: &[storefront_core::Product]) -> Vec<ProductId> {
    products.iter().map(|p| p.id.clone()).collect()
}

fn quick_settings() -> StoreSettings {
    StoreSettings {
        fetch_timeout_ms: 200,
        refresh_interval_secs: 3600,
        ..StoreSettings::default()
    }
}

struct StaticSource(Vec<RawRecord>);

#[async_trait::async_trait]
impl CatalogSource for StaticSource {
    async fn fetch_catalog(
        &self,
        _limit: usize,
        _timeout: Duration,
    ) -> Result<Vec<RawRecord>, CatalogError> {
        Ok(self.0.clone())
    }
}

struct FailingSource;

#[async_trait::async_trait]
impl CatalogSource for FailingSource {
    async fn fetch_catalog(
        &self,
        _limit: usize,
        _timeout: Duration,
    ) -> Result<Vec<RawRecord>, CatalogError> {
        Err(CatalogError::Request("connection refused".into()))
    }
}

struct HangingSource;

#[async_trait::async_trait]
impl CatalogSource for HangingSource {
    async fn fetch_catalog(
        &self,
        _limit: usize,
        _timeout: Duration,
    ) -> Result<Vec<RawRecord>, CatalogError> {
        std::future::pending().await
    }
}

/// Holds every fetch until the gate is opened.
struct GatedSource {
    gate: Arc<Notify>,
    records: Vec<RawRecord>,
}

#[async_trait::async_trait]
impl CatalogSource for GatedSource {
    async fn fetch_catalog(
        &self,
        _limit: usize,
        _timeout: Duration,
    ) -> Result<Vec<RawRecord>, CatalogError> {
        self.gate.notified().await;
        Ok(self.records.clone())
    }
}

/// First call blocks on the gate and returns ids from 100; later calls answer
/// immediately with ids from 200.
struct SlowThenFastSource {
    calls: Arc<AtomicUsize>,
    gate: Arc<Notify>,
}

#[async_trait::async_trait]
impl CatalogSource for SlowThenFastSource {
    async fn fetch_catalog(
        &self,
        _limit: usize,
        _timeout: Duration,
    ) -> Result<Vec<RawRecord>, CatalogError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.gate.notified().await;
            Ok(records(100, 4))
        } else {
            Ok(records(200, 4))
        }
    }
}

#[tokio::test]
async fn failing_source_installs_fallback() {
    let store = AppStore::default();
    let mut kernel = AppKernel::new(store.clone(), FailingSource, quick_settings());

    kernel.dispatch(AppCommand::LoadCatalog);
    assert_eq!(store.state().status, ViewStatus::Loading);
    timeout(WAIT, kernel.next_change()).await.unwrap();

    let state = store.state();
    assert_eq!(state.status, ViewStatus::Ready);
    assert!(state.is_fallback());
    assert_eq!(state.catalog.len(), 12);
    assert_eq!(state.catalog[0].title, "Fallback Product 1");
    assert_eq!(state.visible.len(), 12);
}

#[tokio::test]
async fn hanging_source_times_out_into_fallback() {
    let store = AppStore::default();
    let settings = StoreSettings {
        fetch_timeout_ms: 50,
        ..quick_settings()
    };
    let mut kernel = AppKernel::new(store.clone(), HangingSource, settings);

    kernel.dispatch(AppCommand::LoadCatalog);
    timeout(WAIT, kernel.next_change()).await.unwrap();

    match store.state().origin {
        Some(CatalogOrigin::Fallback { reason }) => assert!(reason.contains("exceeded")),
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[tokio::test]
async fn toggling_during_fetch_applies_on_arrival() {
    let gate = Arc::new(Notify::new());
    let store = AppStore::default();
    let source = GatedSource {
        gate: gate.clone(),
        records: records(100, 12),
    };
    let mut kernel = AppKernel::new(store.clone(), source, quick_settings());

    kernel.dispatch(AppCommand::LoadCatalog);
    kernel.dispatch(AppCommand::ToggleFacetValue {
        facet: Facet::Fabric,
        value: "Cotton".into(),
    });

    let pending = store.state();
    assert_eq!(pending.status, ViewStatus::Loading);
    assert!(pending.visible.is_empty());
    assert!(pending.filters.is_selected(Facet::Fabric, "Cotton"));

    gate.notify_one();
    timeout(WAIT, kernel.next_change()).await.unwrap();

    let state = store.state();
    assert_eq!(state.status, ViewStatus::Ready);
    assert_eq!(
        ids(&state.visible),
        vec![ProductId::Num(100), ProductId::Num(104), ProductId::Num(108)]
    );
}

#[tokio::test]
async fn refresh_keeps_current_filters() {
    let store = AppStore::default();
    let mut kernel = AppKernel::new(store.clone(), StaticSource(records(1, 12)), quick_settings());

    kernel.dispatch(AppCommand::LoadCatalog);
    timeout(WAIT, kernel.next_change()).await.unwrap();

    kernel.dispatch(AppCommand::SetAvailability(true));
    assert_eq!(store.visible().len(), 10);

    kernel.dispatch(AppCommand::RefreshCatalog);
    timeout(WAIT, kernel.next_change()).await.unwrap();

    let state = store.state();
    assert!(state.filters.availability());
    assert_eq!(state.visible.len(), 10);
    assert!(state.visible.iter().all(|p| p.in_stock()));
}

#[tokio::test]
async fn load_is_a_no_op_once_a_catalog_exists() {
    let store = AppStore::default();
    let mut kernel = AppKernel::new(store.clone(), StaticSource(records(1, 3)), quick_settings());

    kernel.dispatch(AppCommand::LoadCatalog);
    let first = store.active_refresh();
    kernel.dispatch(AppCommand::LoadCatalog);
    assert_eq!(store.active_refresh(), first);

    timeout(WAIT, kernel.next_change()).await.unwrap();
    kernel.dispatch(AppCommand::LoadCatalog);
    assert_eq!(store.active_refresh(), first);
}

#[tokio::test]
async fn superseded_refresh_is_discarded() {
    let gate = Arc::new(Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let store = AppStore::default();
    let source = SlowThenFastSource {
        calls: calls.clone(),
        gate: gate.clone(),
    };
    let mut kernel = AppKernel::new(store.clone(), source, quick_settings());

    kernel.dispatch(AppCommand::RefreshCatalog);
    // Make sure the first fetch is the one parked on the gate.
    timeout(WAIT, async {
        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
    kernel.dispatch(AppCommand::RefreshCatalog);
    timeout(WAIT, kernel.next_change()).await.unwrap();
    assert_eq!(store.visible()[0].id, ProductId::Num(200));

    // Let the older fetch finish; its result must not replace the newer one.
    gate.notify_one();
    assert!(
        timeout(Duration::from_millis(200), kernel.next_change())
            .await
            .is_err()
    );
    assert_eq!(store.visible()[0].id, ProductId::Num(200));
    assert!(!store.state().refresh_in_flight);
}

#[tokio::test]
async fn stale_events_are_ignored_in_tick() {
    let store = AppStore::default();
    let mut kernel = AppKernel::new(store.clone(), StaticSource(vec![]), quick_settings());

    kernel.dispatch(AppCommand::SetFilters(
        FilterSet::default().select(Facet::Pattern, "Floral"),
    ));
    let before = store.state();

    kernel
        .sender()
        .send(DomainEvent::CatalogInstalled {
            refresh_id: uuid::Uuid::new_v4(),
            products: storefront_core::generate_fallback(5),
            origin: CatalogOrigin::Source,
        })
        .await
        .unwrap();

    assert!(!kernel.tick());

    let after = store.state();
    assert_eq!(after.status, ViewStatus::Loading);
    assert!(after.catalog.is_empty());
    assert_eq!(after.filters, before.filters);
}

#[tokio::test]
async fn empty_source_response_is_not_a_fallback() {
    let store = AppStore::default();
    let mut kernel = AppKernel::new(store.clone(), StaticSource(vec![]), quick_settings());

    kernel.dispatch(AppCommand::LoadCatalog);
    timeout(WAIT, kernel.next_change()).await.unwrap();

    let state = store.state();
    assert_eq!(state.status, ViewStatus::Ready);
    assert_eq!(state.origin, Some(CatalogOrigin::Source));
    assert!(state.visible.is_empty());
}

#[tokio::test]
async fn run_loop_loads_and_applies_commands() {
    let store = AppStore::default();
    let mut kernel = AppKernel::new(store.clone(), StaticSource(records(1, 12)), quick_settings());
    let commands = kernel.commands();
    let cancel = CancellationToken::new();
    let (seen_tx, mut seen_rx) = tokio::sync::mpsc::unbounded_channel();

    let loop_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        kernel
            .run(loop_cancel, |state| {
                let _ = seen_tx.send((state.status, state.visible.len()));
            })
            .await;
    });

    let first = timeout(WAIT, seen_rx.recv()).await.unwrap().unwrap();
    assert_eq!(first, (ViewStatus::Ready, 12));

    commands
        .send(AppCommand::ToggleFacetValue {
            facet: Facet::Fabric,
            value: "Wool".into(),
        })
        .await
        .unwrap();
    let second = timeout(WAIT, seen_rx.recv()).await.unwrap().unwrap();
    assert_eq!(second, (ViewStatus::Ready, 3));

    cancel.cancel();
    timeout(WAIT, handle).await.unwrap().unwrap();
    assert_eq!(store.visible().len(), 3);
}
