use crate::{catalog_source, CliSort, FilterArgs, GlobalOpts};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use storefront_app_core::app_core::{AppCommand, AppStore};
use storefront_app_core::kernel::{fetch_or_fallback, AppKernel};
use storefront_app_core::{
    catalog_vm, CatalogOrigin, CatalogVm, ProductCardVm, SessionPort, StoreSettings, Wishlist,
};
use storefront_core::{facet_counts, Facet, Product};
use tokio_util::sync::CancellationToken;

fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Fetch once, falling back to the synthetic catalog.
pub async fn load_catalog(settings: &StoreSettings) -> Result<(Vec<Product>, CatalogOrigin)> {
    let source = catalog_source(settings)?;
    let pb = spinner("Fetching catalog...");
    let loaded = fetch_or_fallback(&source, settings).await;
    pb.finish_and_clear();
    Ok(loaded)
}

fn print_card(card: &ProductCardVm) {
    let fav = if card.is_favorite { "*" } else { " " };
    println!(
        " {fav} {:>4}  {:<40}  {}",
        card.id,
        truncate(&card.title, 40),
        card.price_label
    );
    if !card.badges.is_empty() {
        println!("         {}", card.badges.join(" | "));
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}

fn print_vm(vm: &CatalogVm) {
    println!(":: {} ({})", vm.status_label, vm.sort_label);
    if let Some(origin) = &vm.origin_label {
        println!("   {origin}");
    }
    if !vm.active_filters.is_empty() {
        println!("   Filters: {}", vm.active_filters.join("; "));
    }
    for card in &vm.cards {
        print_card(card);
    }
}

pub async fn cmd_products(
    global: &GlobalOpts,
    filters: &FilterArgs,
    sort: CliSort,
    json: bool,
) -> Result<CatalogVm> {
    let persistence = global.persistence();
    let settings = global.settings(&persistence)?;
    let user = persistence.current_user().context("Failed to read session")?;
    let wishlist = Wishlist::load(&persistence)?;

    let source = catalog_source(&settings)?;
    let store = AppStore::default();
    let mut kernel = AppKernel::new(store.clone(), source, settings);
    kernel.dispatch(AppCommand::SetFilters(filters.to_filter_set()));
    kernel.dispatch(AppCommand::LoadCatalog);

    let pb = spinner("Fetching catalog...");
    kernel.next_change().await;
    pb.finish_and_clear();

    let state = store.state();
    let vm = catalog_vm(&state, sort.into(), user.as_ref(), &wishlist);
    if json {
        println!("{}", serde_json::to_string_pretty(&state.visible)?);
    } else {
        print_vm(&vm);
    }
    Ok(vm)
}

pub type FacetCounts = Vec<(Facet, Vec<(&'static str, usize)>)>;

pub async fn cmd_facets(global: &GlobalOpts) -> Result<FacetCounts> {
    let persistence = global.persistence();
    let settings = global.settings(&persistence)?;
    let (products, origin) = load_catalog(&settings).await?;

    if origin != CatalogOrigin::Source {
        println!(":: Source unavailable, counting the offline catalog");
    }
    let counts: Vec<_> = Facet::ALL
        .into_iter()
        .map(|facet| (facet, facet_counts(&products, facet)))
        .collect();

    for (facet, values) in &counts {
        println!("{} (--{})", facet.label(), facet.name());
        for (value, n) in values {
            println!("   {value:<20} {n}");
        }
    }
    let in_stock = products.iter().filter(|p| p.in_stock()).count();
    let customizable = products.iter().filter(|p| p.facets.customizable).count();
    println!("AVAILABILITY (--in-stock)\n   {:<20} {in_stock}", "In stock");
    println!("CUSTOMIZABLE (--customizable)\n   {:<20} {customizable}", "Yes");

    Ok(counts)
}

/// Run the coordinator until Ctrl-C, printing a summary whenever the visible
/// set changes.
pub async fn cmd_watch(global: &GlobalOpts, filters: &FilterArgs, sort: CliSort) -> Result<()> {
    let persistence = global.persistence();
    let settings = global.settings(&persistence)?;
    let user = persistence.current_user().context("Failed to read session")?;
    let wishlist = Wishlist::load(&persistence)?;

    let source = catalog_source(&settings)?;
    println!(
        ":: Watching {} (refresh every {:?}, Ctrl-C to stop)",
        settings.catalog_url,
        settings.refresh_interval()
    );

    let mut kernel = AppKernel::new(AppStore::default(), source, settings);
    kernel.dispatch(AppCommand::SetFilters(filters.to_filter_set()));

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    kernel
        .run(cancel, |state| {
            let vm = catalog_vm(state, sort.into(), user.as_ref(), &wishlist);
            let stamp = state
                .installed_at
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "--:--:--".into());
            println!("\n[{stamp}]");
            print_vm(&vm);
        })
        .await;

    println!(":: Stopped.");
    Ok(())
}
