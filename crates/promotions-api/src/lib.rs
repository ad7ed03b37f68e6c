//! JSON REST API for promotions.
//!
//! Exposes an axum [`Router`] backed by any
//! [`promotions_core::store::PromotionStore`]. Binding, TLS, and process
//! setup are handled by the `server` binary.

pub mod error;
pub mod promotions;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{Method, StatusCode, Uri},
  response::{Html, Response},
  routing::{get, put},
};
use promotions_core::store::{PromotionStore, TitleMatch};
use serde::Deserialize;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use error::ApiError;

const INDEX_HTML: &str = include_str!("../static/index.html");

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  /// Prefix for `Location` headers; empty yields relative URLs.
  pub base_url:    String,
  pub store_path:  PathBuf,
  pub title_match: TitleMatch,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PromotionStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full route table for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PromotionStore + Clone + 'static,
{
  Router::new()
    .route("/", get(index))
    .route(
      "/promotions",
      get(promotions::list::<S>).post(promotions::create::<S>),
    )
    .route(
      "/promotions/{id}",
      get(promotions::get_one::<S>)
        .put(promotions::update::<S>)
        .delete(promotions::delete_one::<S>),
    )
    .route("/promotions/{id}/activate", put(promotions::activate::<S>))
    .route("/promotions/{id}/deactivate", put(promotions::deactivate::<S>))
    .fallback(not_found)
    .method_not_allowed_fallback(method_not_allowed)
    .layer(CatchPanicLayer::custom(error::handle_panic))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `GET /` — static landing page.
async fn index() -> Html<&'static str> { Html(INDEX_HTML) }

async fn not_found(uri: Uri) -> ApiError {
  ApiError::NotFound(format!("{} was not found on this server", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> Response {
  error::envelope(
    StatusCode::METHOD_NOT_ALLOWED,
    format!("{method} is not allowed on {}", uri.path()),
  )
}

// ─── Integration tests ────────────────────────────────────────────────────────
