pub mod catalog;
pub mod net;

// Re-exports for convenience
pub use catalog::{
    decode_records, CatalogError, CatalogErrorKind, CatalogSource, HttpCatalogSource,
};
pub use net::default_http_client;
