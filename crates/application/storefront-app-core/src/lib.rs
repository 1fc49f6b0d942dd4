pub mod app_core;
mod async_runtime;
pub mod domain;
pub mod kernel;
pub mod persistence;
pub mod ports;
pub mod session;
pub mod viewmodel;
pub mod wishlist;

pub use app_core::*;
pub use domain::{
    CatalogOrigin, RefreshId, StoreSettings, User, ViewState, ViewStatus, WishlistItem,
};
pub use kernel::{fetch_or_fallback, AppKernel};
pub use ports::*;
pub use viewmodel::*;
pub use wishlist::{Wishlist, WishlistError};
