//! The `PromotionStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `promotions-store-sqlite`). The HTTP layer depends on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::promotion::{NewPromotion, Promotion};

// ─── Query types ─────────────────────────────────────────────────────────────

/// A single predicate for [`PromotionStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PromotionFilter {
  #[default]
  All,
  PromotionType(String),
  Active(bool),
  Title(String),
  EndDate(DateTime<Utc>),
}

/// How [`PromotionStore::find_by_title`] compares titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleMatch {
  /// Exact match, ignoring ASCII case.
  #[default]
  CaseInsensitive,
  /// Byte-for-byte exact match.
  Exact,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a promotion store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PromotionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new promotion under a freshly assigned id.
  fn create(
    &self,
    input: NewPromotion,
  ) -> impl Future<Output = Result<Promotion, Self::Error>> + Send + '_;

  /// Replace the stored row whose id matches `promotion.id`.
  ///
  /// Returns `None`, and writes nothing, if no such row exists.
  fn update(
    &self,
    promotion: Promotion,
  ) -> impl Future<Output = Result<Option<Promotion>, Self::Error>> + Send + '_;

  /// Remove a promotion. Deleting an id that is not stored is a no-op.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a promotion by id. Returns `None` if not found.
  fn find(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Promotion>, Self::Error>> + Send + '_;

  /// Every stored promotion. Ordering is not part of the contract.
  fn all(
    &self,
  ) -> impl Future<Output = Result<Vec<Promotion>, Self::Error>> + Send + '_;

  /// Promotions whose title matches `title` under the store's [`TitleMatch`].
  fn find_by_title(
    &self,
    title: String,
  ) -> impl Future<Output = Result<Vec<Promotion>, Self::Error>> + Send + '_;

  fn find_by_promotion_type(
    &self,
    promotion_type: String,
  ) -> impl Future<Output = Result<Vec<Promotion>, Self::Error>> + Send + '_;

  fn find_by_active(
    &self,
    active: bool,
  ) -> impl Future<Output = Result<Vec<Promotion>, Self::Error>> + Send + '_;

  fn find_by_end_date(
    &self,
    end_date: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Promotion>, Self::Error>> + Send + '_;

  /// Dispatch `filter` to the matching finder.
  fn list(
    &self,
    filter: PromotionFilter,
  ) -> impl Future<Output = Result<Vec<Promotion>, Self::Error>> + Send + '_ {
    async move {
      match filter {
        PromotionFilter::All => self.all().await,
        PromotionFilter::PromotionType(t) => self.find_by_promotion_type(t).await,
        PromotionFilter::Active(a) => self.find_by_active(a).await,
        PromotionFilter::Title(t) => self.find_by_title(t).await,
        PromotionFilter::EndDate(d) => self.find_by_end_date(d).await,
      }
    }
  }
}
