//! JSON REST API for the Folketing person registry.
//!
//! Exposes an axum [`Router`] backed by any [`PersonStore`], with request
//! tracing, permissive CORS, a health check, a JSON 404 fallback and panic
//! isolation already layered on. TLS and process concerns are the caller's
//! responsibility.
//!
//! ```rust,ignore
//! let state = AppState::new(Arc::new(store), Environment::Production);
//! axum::serve(listener, folketing_api::router(state)).await?;
//! ```

pub mod error;
pub mod persons;

use std::{any::Any, sync::Arc};

use axum::{
  Json, Router,
  http::{Method, StatusCode, Uri},
  response::{IntoResponse, Response},
  routing::get,
};
use chrono::Utc;
use folketing_core::{PersonGateway, PersonStore};
use serde::Deserialize;
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;

// ─── Environment ──────────────────────────────────────────────────────────────

/// Runtime mode. Production hides internal error detail from clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
  #[default]
  Development,
  Production,
}

impl Environment {
  pub fn is_production(self) -> bool { self == Environment::Production }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub gateway:     PersonGateway<S>,
  pub environment: Environment,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { gateway: self.gateway.clone(), environment: self.environment }
  }
}

impl<S> AppState<S>
where
  S: PersonStore,
  folketing_core::Error: From<S::Error>,
{
  pub fn new(store: Arc<S>, environment: Environment) -> Self {
    Self { gateway: PersonGateway::new(store), environment }
  }
}

impl<S> AppState<S> {
  /// Convert a gateway error for this environment.
  pub fn reject(&self, err: folketing_core::Error) -> ApiError {
    ApiError::from_core(err, self.environment)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PersonStore + 'static,
  folketing_core::Error: From<S::Error>,
{
  let environment = state.environment;

  Router::new()
    .route("/api/persons",                    get(persons::list::<S>).post(persons::create::<S>))
    .route("/api/persons/",                   get(persons::list::<S>).post(persons::create::<S>))
    .route("/api/persons/position/{position}", get(persons::by_position::<S>))
    .route("/api/persons/party/{party}",       get(persons::by_party::<S>))
    .route(
      "/api/persons/{id}",
      get(persons::get_one::<S>)
        .put(persons::update::<S>)
        .delete(persons::delete::<S>),
    )
    .route("/health", get(health))
    .fallback(not_found)
    .layer(CatchPanicLayer::custom(move |payload: Box<dyn Any + Send + 'static>| {
      panic_response(payload, environment)
    }))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Ambient routes ───────────────────────────────────────────────────────────

/// `GET /health`
async fn health() -> impl IntoResponse {
  Json(json!({ "status": "ok", "timestamp": Utc::now() }))
}

async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
  (
    StatusCode::NOT_FOUND,
    Json(json!({
      "success": false,
      "error":   "Not Found",
      "message": format!("Cannot {method} {uri}"),
    })),
  )
}

fn panic_response(payload: Box<dyn Any + Send + 'static>, environment: Environment) -> Response {
  let detail = if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_owned()
  } else {
    "handler panicked".to_owned()
  };
  tracing::error!(%detail, "handler panicked");
  ApiError::internal(detail, environment).into_response()
}

// ─── Integration tests ────────────────────────────────────────────────────────
