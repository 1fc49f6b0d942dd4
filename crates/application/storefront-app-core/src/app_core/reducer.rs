use chrono::Utc;
use storefront_core::filter;
use tracing::{debug, info};

use crate::domain::{CatalogOrigin, ViewState, ViewStatus};

use super::events::DomainEvent;

/// Both catalog installs and filter replacements recompute `visible` against
/// whatever the other input holds at this moment, never a captured copy.
pub fn reduce(mut state: ViewState, ev: DomainEvent) -> ViewState {
    match ev {
        DomainEvent::RefreshStarted { refresh_id } => {
            state.active_refresh = Some(refresh_id);
            state.refresh_in_flight = true;
        }

        DomainEvent::CatalogInstalled {
            refresh_id,
            products,
            origin,
        } => {
            match &origin {
                CatalogOrigin::Source => info!("installed {} products from source", products.len()),
                CatalogOrigin::Fallback { .. } => {
                    info!("installed {} fallback products", products.len())
                }
            }
            state.catalog = products.into();
            state.visible = filter::apply(&state.catalog, &state.filters);
            state.origin = Some(origin);
            state.installed_at = Some(Utc::now());
            state.status = ViewStatus::Ready;
            if state.active_refresh == Some(refresh_id) {
                state.refresh_in_flight = false;
            }
        }

        DomainEvent::FiltersReplaced(filters) => {
            state.filters = filters;
            state.visible = filter::apply(&state.catalog, &state.filters);
            debug!(
                "filters replaced: {} of {} visible",
                state.visible.len(),
                state.catalog.len()
            );
        }
    }
    state
}
