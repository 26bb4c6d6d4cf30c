//! HTTP front end for the fetcher: `POST /api/fetch-sitemap`.

use crate::fetch::{parse_target, SitemapFetcher};
use anyhow::{Context, Result};
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue, Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const FETCH_ROUTE: &str = "/api/fetch-sitemap";
pub const HEALTH_ROUTE: &str = "/api/health";

/// Proxy request body.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub url: Option<serde_json::Value>,
}

/// Proxy response envelope, shared with [`crate::loader::ProxyClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchResponse {
    pub fn ok(data: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

type Reply = (StatusCode, Json<FetchResponse>);

fn reply(status: StatusCode, body: FetchResponse) -> Reply {
    (status, Json(body))
}

/// Build the router with CORS and security headers on every response.
pub fn router(fetcher: Arc<SitemapFetcher>) -> Router {
    let fetch_route = post(fetch_sitemap)
        .options(preflight)
        .fallback(method_not_allowed);

    Router::new()
        .route(FETCH_ROUTE, fetch_route)
        .route(HEALTH_ROUTE, get(health))
        .with_state(fetcher)
        .layer(static_header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .layer(static_header(header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
        .layer(static_header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .layer(static_header(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(static_header(header::X_FRAME_OPTIONS, "DENY"))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                id = %uuid::Uuid::new_v4(),
                method = %req.method(),
                path = %req.uri().path(),
            )
        }))
}

fn static_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

async fn fetch_sitemap(State(fetcher): State<Arc<SitemapFetcher>>, body: Bytes) -> Reply {
    // A missing or malformed body is treated the same as a missing URL.
    let request: FetchRequest = serde_json::from_slice(&body).unwrap_or_default();
    let url = match request.url {
        Some(serde_json::Value::String(url)) if !url.is_empty() => url,
        _ => return reply(StatusCode::BAD_REQUEST, FetchResponse::err("URL is required")),
    };

    if let Err(e) = parse_target(&url) {
        return reply(StatusCode::BAD_REQUEST, FetchResponse::err(e.to_string()));
    }

    match fetcher.fetch(&url).await {
        Ok(data) => {
            info!(%url, bytes = data.len(), "sitemap fetched");
            reply(StatusCode::OK, FetchResponse::ok(data))
        }
        Err(e) => {
            warn!(%url, kind = e.kind(), error = %e, "sitemap fetch failed");
            reply(StatusCode::INTERNAL_SERVER_ERROR, FetchResponse::err(e.to_string()))
        }
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> Reply {
    reply(
        StatusCode::METHOD_NOT_ALLOWED,
        FetchResponse::err("Method not allowed"),
    )
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Bind `addr` and serve until ctrl-c.
pub async fn serve(addr: SocketAddr, fetcher: Arc<SitemapFetcher>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr().context("failed to read bound address")?;
    info!(%local, "proxy listening");

    axum::serve(listener, router(fetcher))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("received shutdown signal");
        })
        .await
        .context("server error")
}
