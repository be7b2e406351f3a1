use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use spam_sieve::app::router::main_router;
use spam_sieve::app::state::AppState;
use spam_sieve::pipeline::ClassificationPipeline;
use spam_sieve::test_support::{
    MockStore, StubClassifier, fixed_embedding_stage, fixed_lexical_stage,
};
use tokio::time::sleep;

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Healthcheck succeeds against the real service router
#[tokio::test]
async fn test_healthcheck_succeeds_when_server_running() {
    let port = free_port();

    let server = tokio::spawn(async move {
        let store = Arc::new(MockStore::new());
        let pipeline = Arc::new(ClassificationPipeline::new(
            fixed_embedding_stage(StubClassifier::probability(0.1)),
            fixed_lexical_stage(StubClassifier::probability(0.1)),
            store.clone(),
        ));
        let app = main_router(AppState::new(pipeline, store));
        let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}"))
            .await
            .unwrap();
        axum::serve(listener, app).await.unwrap();
    });

    sleep(Duration::from_millis(100)).await;

    let result = spam_sieve::healthcheck_with_port(port).await;
    assert!(
        result.is_ok(),
        "Healthcheck should succeed when server is running"
    );

    server.abort();
}

#[tokio::test]
async fn test_healthcheck_fails_when_server_not_running() {
    let port = free_port();

    let result = spam_sieve::healthcheck_with_port(port).await;
    assert!(
        result.is_err(),
        "Healthcheck should fail when server is not running"
    );
}

#[tokio::test]
async fn test_healthcheck_fails_on_non_success_status() {
    let port = free_port();

    let server = tokio::spawn(async move {
        let app = axum::Router::new().route(
            "/v1/health",
            axum::routing::get(|| async {
                (axum::http::StatusCode::SERVICE_UNAVAILABLE, "Unhealthy")
            }),
        );
        let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}"))
            .await
            .unwrap();
        axum::serve(listener, app).await.unwrap();
    });

    sleep(Duration::from_millis(100)).await;

    let result = spam_sieve::healthcheck_with_port(port).await;
    assert!(
        matches!(
            result,
            Err(spam_sieve::healthcheck::HealthcheckError::Status(status)) if status.as_u16() == 503
        ),
        "Healthcheck should fail on non-2xx status"
    );

    server.abort();
}
