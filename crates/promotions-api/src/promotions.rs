//! Handlers for `/promotions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/promotions` | One of `?promotion_type`, `?active`, `?title`, `?end_date` |
//! | `POST`   | `/promotions` | `Content-Type: application/json`; returns 201 + `Location` |
//! | `GET`    | `/promotions/{id}` | 404 if not found |
//! | `PUT`    | `/promotions/{id}` | Full-record replace |
//! | `DELETE` | `/promotions/{id}` | Always 204 |
//! | `PUT`    | `/promotions/{id}/activate` | Sets `active = true` |
//! | `PUT`    | `/promotions/{id}/deactivate` | Sets `active = false` |

use axum::{
  Json,
  body::Bytes,
  extract::{Path, Query, State, rejection::QueryRejection},
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use promotions_core::{
  promotion::{NewPromotion, Promotion, parse_flag, parse_timestamp},
  store::{PromotionFilter, PromotionStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

const JSON_MEDIA_TYPE: &str = "application/json";

// ─── List ─────────────────────────────────────────────────────────────────────

/// Query parameters for `GET /promotions`. Only one is honored; see
/// [`ListParams::into_filter`].
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub title:          Option<String>,
  pub promotion_type: Option<String>,
  /// Any common boolean encoding, e.g. `true`, `1`, `yes`.
  pub active:         Option<String>,
  pub end_date:       Option<String>,
}

impl ListParams {
  /// Pick the single honored filter, in priority order `promotion_type`,
  /// `active`, `title`, `end_date`. Empty values count as absent.
  pub fn into_filter(self) -> Result<PromotionFilter, ApiError> {
    let present = |v: Option<String>| v.filter(|s| !s.is_empty());

    let filter = if let Some(t) = present(self.promotion_type) {
      PromotionFilter::PromotionType(t)
    } else if let Some(a) = present(self.active) {
      PromotionFilter::Active(parse_flag(&a)?)
    } else if let Some(t) = present(self.title) {
      PromotionFilter::Title(t)
    } else if let Some(d) = present(self.end_date) {
      PromotionFilter::EndDate(parse_timestamp(&d)?)
    } else {
      PromotionFilter::All
    };
    Ok(filter)
  }
}

/// `GET /promotions[?promotion_type=..|?active=..|?title=..|?end_date=..]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Promotion>>, ApiError>
where
  S: PromotionStore + Clone + 'static,
{
  tracing::info!("request for promotion list");
  let Query(params) =
    query.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
  let filter = params.into_filter()?;
  tracing::debug!(?filter, "listing promotions");

  let promotions = state
    .store
    .list(filter)
    .await
    .map_err(ApiError::internal)?;
  Ok(Json(promotions))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /promotions/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<Promotion>, ApiError>
where
  S: PromotionStore + Clone + 'static,
{
  tracing::info!(id = %raw_id, "request for promotion");
  let promotion = find_existing(&state, &raw_id).await?;
  Ok(Json(promotion))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /promotions` — returns 201, the stored promotion, and a `Location`
/// header pointing at it.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: PromotionStore + Clone + 'static,
{
  tracing::info!("request to create a promotion");
  require_json(&headers)?;

  let input = NewPromotion::from_json(&body)?;
  let promotion = state
    .store
    .create(input)
    .await
    .map_err(ApiError::internal)?;

  let location = format!(
    "{}/promotions/{}",
    state.config.base_url.trim_end_matches('/'),
    promotion.id
  );
  tracing::info!(id = %promotion.id, "promotion created");
  Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(promotion)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /promotions/{id}` — replace every field of an existing promotion.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
  body: Bytes,
) -> Result<Json<Promotion>, ApiError>
where
  S: PromotionStore + Clone + 'static,
{
  tracing::info!(id = %raw_id, "request to update promotion");
  let mut promotion = find_existing(&state, &raw_id).await?;

  tracing::debug!(payload = %String::from_utf8_lossy(&body), "update payload");
  promotion.apply(NewPromotion::from_json(&body)?);

  let updated = save(&state, promotion).await?;
  tracing::info!(id = %updated.id, "promotion updated");
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /promotions/{id}` — 204 whether or not the promotion existed.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: PromotionStore + Clone + 'static,
{
  tracing::info!(id = %raw_id, "request to delete promotion");
  if let Ok(id) = Uuid::parse_str(&raw_id) {
    state.store.delete(id).await.map_err(ApiError::internal)?;
    tracing::info!(%id, "promotion delete complete");
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Activate / deactivate ────────────────────────────────────────────────────

/// `PUT /promotions/{id}/activate`
pub async fn activate<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<Promotion>, ApiError>
where
  S: PromotionStore + Clone + 'static,
{
  tracing::info!(id = %raw_id, "request to activate promotion");
  set_active(&state, &raw_id, true).await.map(Json)
}

/// `PUT /promotions/{id}/deactivate`
pub async fn deactivate<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<Promotion>, ApiError>
where
  S: PromotionStore + Clone + 'static,
{
  tracing::info!(id = %raw_id, "request to deactivate promotion");
  set_active(&state, &raw_id, false).await.map(Json)
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

async fn set_active<S>(
  state: &AppState<S>,
  raw_id: &str,
  active: bool,
) -> Result<Promotion, ApiError>
where
  S: PromotionStore + Clone + 'static,
{
  let mut promotion = find_existing(state, raw_id).await?;
  promotion.active = active;
  let updated = save(state, promotion).await?;
  tracing::info!(id = %updated.id, active, "promotion updated");
  Ok(updated)
}

/// Look up `raw_id`, treating ids that are not UUIDs as absent.
async fn find_existing<S>(
  state: &AppState<S>,
  raw_id: &str,
) -> Result<Promotion, ApiError>
where
  S: PromotionStore + Clone + 'static,
{
  let not_found =
    || ApiError::NotFound(format!("Promotion with id '{raw_id}' was not found."));

  let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
  state
    .store
    .find(id)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(not_found)
}

/// Write back a promotion; a row deleted since it was read is reported as 404.
async fn save<S>(
  state: &AppState<S>,
  promotion: Promotion,
) -> Result<Promotion, ApiError>
where
  S: PromotionStore + Clone + 'static,
{
  let id = promotion.id;
  state
    .store
    .update(promotion)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("Promotion with id '{id}' was not found."))
    })
}

/// Reject requests whose media type is not `application/json`.
fn require_json(headers: &HeaderMap) -> Result<(), ApiError> {
  let content_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok());

  let is_json = content_type
    .and_then(|ct| ct.split(';').next())
    .is_some_and(|media| media.trim().eq_ignore_ascii_case(JSON_MEDIA_TYPE));

  if is_json {
    Ok(())
  } else {
    tracing::error!(content_type = ?content_type, "invalid content type");
    Err(ApiError::UnsupportedMediaType(format!(
      "Content-Type must be {JSON_MEDIA_TYPE}"
    )))
  }
}
