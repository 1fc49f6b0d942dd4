use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::time::Duration;
use storefront_core::ProductId;
use storefront_infra::{CatalogErrorKind, CatalogSource, HttpCatalogSource};

const PRODUCTS_JSON: &str = r#"[
  {"id": 1, "title": "Backpack", "price": 109.95, "image": "https://img/1.jpg", "category": "men's clothing"},
  {"id": 2, "title": "Slim Fit T-Shirt", "price": 22.3, "image": "https://img/2.jpg", "category": "men's clothing"},
  {"id": 3, "title": "Cotton Jacket", "price": 55.99, "image": "https://img/3.jpg", "category": "men's clothing"}
]"#;

async fn start_server(app: Router) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

fn source(addr: SocketAddr) -> HttpCatalogSource {
    HttpCatalogSource::new(reqwest::Client::new(), format!("http://{addr}/products"))
}

#[tokio::test]
async fn fetches_records_in_source_order() {
    let app = Router::new().route("/products", get(|| async { PRODUCTS_JSON }));
    let (addr, _server) = start_server(app).await;

    let records = source(addr)
        .fetch_catalog(12, Duration::from_secs(5))
        .await
        .unwrap();

    let ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![ProductId::Num(1), ProductId::Num(2), ProductId::Num(3)]);
    assert_eq!(records[2].title, "Cotton Jacket");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let app = Router::new().route(
        "/products",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down").into_response() }),
    );
    let (addr, _server) = start_server(app).await;

    let err = source(addr)
        .fetch_catalog(12, Duration::from_secs(5))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), CatalogErrorKind::Status);
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn slow_server_times_out() {
    let app = Router::new().route(
        "/products",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            PRODUCTS_JSON
        }),
    );
    let (addr, _server) = start_server(app).await;

    let err = source(addr)
        .fetch_catalog(12, Duration::from_millis(100))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), CatalogErrorKind::Timeout);
}

#[tokio::test]
async fn html_body_is_decode_error() {
    let app = Router::new().route("/products", get(|| async { "<html>maintenance</html>" }));
    let (addr, _server) = start_server(app).await;

    let err = source(addr)
        .fetch_catalog(12, Duration::from_secs(5))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), CatalogErrorKind::Decode);
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = source(addr)
        .fetch_catalog(12, Duration::from_secs(2))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), CatalogErrorKind::Network);
}
