//! Handlers for `/api/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/persons` | Newest first |
//! | `GET`    | `/api/persons/position/{position}` | 400 on unknown position |
//! | `GET`    | `/api/persons/party/{party}` | Substring match; 404 if empty |
//! | `GET`    | `/api/persons/{id}` | 400 on malformed id, 404 if absent |
//! | `POST`   | `/api/persons` | Body: [`PersonInput`]; returns 201 |
//! | `PUT`    | `/api/persons/{id}` | Body: partial [`PersonInput`] |
//! | `DELETE` | `/api/persons/{id}` | Returns `{"success":true,"data":{}}` |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use folketing_core::{Person, PersonInput, PersonStore};
use serde::Serialize;
use serde_json::json;

use crate::{AppState, error::ApiError};

// ─── Envelopes ────────────────────────────────────────────────────────────────

/// `{"success":true,"count":n,"data":[...]}`
#[derive(Debug, Serialize)]
pub struct Listing {
  pub success: bool,
  pub count:   usize,
  pub data:    Vec<Person>,
}

impl From<Vec<Person>> for Listing {
  fn from(data: Vec<Person>) -> Self {
    Self { success: true, count: data.len(), data }
  }
}

/// `{"success":true,"data":{...}}`
#[derive(Debug, Serialize)]
pub struct Single {
  pub success: bool,
  pub data:    Person,
}

impl From<Person> for Single {
  fn from(data: Person) -> Self { Self { success: true, data } }
}

/// Turn a body rejection (bad JSON, wrong content type, wrong field type)
/// into a 400 with the same envelope as every other error.
fn body(body: Result<Json<PersonInput>, JsonRejection>) -> Result<PersonInput, ApiError> {
  body
    .map(|Json(input)| input)
    .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/persons`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Listing>, ApiError>
where
  S: PersonStore + 'static,
  folketing_core::Error: From<S::Error>,
{
  let persons = state.gateway.list().await.map_err(|e| state.reject(e))?;
  Ok(Json(persons.into()))
}

/// `GET /api/persons/position/{position}`
pub async fn by_position<S>(
  State(state): State<AppState<S>>,
  Path(position): Path<String>,
) -> Result<Json<Listing>, ApiError>
where
  S: PersonStore + 'static,
  folketing_core::Error: From<S::Error>,
{
  let persons = state
    .gateway
    .list_by_position(&position)
    .await
    .map_err(|e| state.reject(e))?;
  Ok(Json(persons.into()))
}

/// `GET /api/persons/party/{party}`
pub async fn by_party<S>(
  State(state): State<AppState<S>>,
  Path(party): Path<String>,
) -> Result<Json<Listing>, ApiError>
where
  S: PersonStore + 'static,
  folketing_core::Error: From<S::Error>,
{
  let persons = state
    .gateway
    .list_by_party(&party)
    .await
    .map_err(|e| state.reject(e))?;
  Ok(Json(persons.into()))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /api/persons/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Single>, ApiError>
where
  S: PersonStore + 'static,
  folketing_core::Error: From<S::Error>,
{
  let person = state.gateway.get(&id).await.map_err(|e| state.reject(e))?;
  Ok(Json(person.into()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /api/persons`: returns 201 + the stored [`Person`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  input: Result<Json<PersonInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore + 'static,
  folketing_core::Error: From<S::Error>,
{
  let input = body(input)?;
  let person = state.gateway.create(&input).await.map_err(|e| state.reject(e))?;
  Ok((StatusCode::CREATED, Json(Single::from(person))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /api/persons/{id}`: only supplied fields are changed.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  input: Result<Json<PersonInput>, JsonRejection>,
) -> Result<Json<Single>, ApiError>
where
  S: PersonStore + 'static,
  folketing_core::Error: From<S::Error>,
{
  let input = body(input)?;
  let person = state
    .gateway
    .update(&id, &input)
    .await
    .map_err(|e| state.reject(e))?;
  Ok(Json(person.into()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /api/persons/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore + 'static,
  folketing_core::Error: From<S::Error>,
{
  state.gateway.delete(&id).await.map_err(|e| state.reject(e))?;
  Ok(Json(json!({ "success": true, "data": {} })))
}
