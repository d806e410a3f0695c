use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::auth;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.public_dir);

    Router::new()
        .merge(auth::router())
        .route("/health", get(|| async { "ok" }))
        .fallback_service(assets)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    let request_id = uuid::Uuid::new_v4();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        %request_id,
                        status = tracing::field::Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            info!("shutting down");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AppConfig, StoreBackend};
    use crate::storage::{JsonFileStore, UserStore};

    async fn app_with_assets(dir: &tempfile::TempDir) -> Router {
        let public_dir = dir.path().join("public");
        std::fs::create_dir_all(&public_dir).unwrap();
        std::fs::write(public_dir.join("index.html"), "<h1>hello</h1>").unwrap();

        let users_file = dir.path().join("users.json");
        let store = Arc::new(JsonFileStore::open(&users_file).await) as Arc<dyn UserStore>;
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            users_file,
            public_dir,
            backend: StoreBackend::Json,
            database_url: "sqlite::memory:".into(),
        });
        build_app(AppState::from_parts(config, store))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_assets(&dir).await;
        assert_eq!(get(app, "/health").await, (StatusCode::OK, "ok".to_string()));
    }

    #[tokio::test]
    async fn serves_public_assets() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_assets(&dir).await;

        let (status, body) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("hello"));

        let (status, _) = get(app, "/missing.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn signup_route_is_mounted() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_assets(&dir).await;
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email":"a@example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
