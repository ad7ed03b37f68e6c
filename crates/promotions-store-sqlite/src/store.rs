//! [`SqliteStore`] — the SQLite implementation of [`PromotionStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;

use promotions_core::{
  promotion::{NewPromotion, Promotion},
  store::{PromotionStore, TitleMatch},
};

use crate::{
  Result,
  encode::{PROMOTION_COLUMNS, RawPromotion, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A promotion store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:        tokio_rusqlite::Connection,
  title_match: TitleMatch,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, title_match: TitleMatch::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, title_match: TitleMatch::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Set how [`PromotionStore::find_by_title`] compares titles.
  pub fn with_title_match(mut self, title_match: TitleMatch) -> Self {
    self.title_match = title_match;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT` over the promotions table with an optional `WHERE` clause.
  async fn select(
    &self,
    where_clause: &'static str,
    params: Vec<Value>,
  ) -> Result<Vec<Promotion>> {
    let sql = format!(
      "SELECT {PROMOTION_COLUMNS} FROM promotions {where_clause} ORDER BY rowid"
    );

    let raws: Vec<RawPromotion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawPromotion::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPromotion::into_promotion).collect()
  }
}

// ─── PromotionStore impl ─────────────────────────────────────────────────────

impl PromotionStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create(&self, input: NewPromotion) -> Result<Promotion> {
    let promotion = Promotion {
      id:             Uuid::new_v4(),
      title:          input.title,
      promotion_type: input.promotion_type,
      start_date:     input.start_date,
      end_date:       input.end_date,
      active:         input.active,
    };

    let id_str         = encode_uuid(promotion.id);
    let title          = promotion.title.clone();
    let promotion_type = promotion.promotion_type.clone();
    let start_str      = encode_dt(promotion.start_date);
    let end_str        = encode_dt(promotion.end_date);
    let active         = promotion.active;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO promotions (id, title, promotion_type, start_date, end_date, active)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, title, promotion_type, start_str, end_str, active],
        )?;
        Ok(())
      })
      .await?;

    Ok(promotion)
  }

  async fn update(&self, promotion: Promotion) -> Result<Option<Promotion>> {
    let id_str         = encode_uuid(promotion.id);
    let title          = promotion.title.clone();
    let promotion_type = promotion.promotion_type.clone();
    let start_str      = encode_dt(promotion.start_date);
    let end_str        = encode_dt(promotion.end_date);
    let active         = promotion.active;

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE promotions
           SET title = ?2, promotion_type = ?3, start_date = ?4, end_date = ?5, active = ?6
           WHERE id = ?1",
          rusqlite::params![id_str, title, promotion_type, start_str, end_str, active],
        )?)
      })
      .await?;

    Ok((changed > 0).then_some(promotion))
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM promotions WHERE id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find(&self, id: Uuid) -> Result<Option<Promotion>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPromotion> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PROMOTION_COLUMNS} FROM promotions WHERE id = ?1"),
            rusqlite::params![id_str],
            RawPromotion::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPromotion::into_promotion).transpose()
  }

  async fn all(&self) -> Result<Vec<Promotion>> {
    self.select("", Vec::new()).await
  }

  async fn find_by_title(&self, title: String) -> Result<Vec<Promotion>> {
    let clause = match self.title_match {
      TitleMatch::CaseInsensitive => "WHERE title = ?1 COLLATE NOCASE",
      TitleMatch::Exact => "WHERE title = ?1",
    };
    self.select(clause, vec![Value::Text(title)]).await
  }

  async fn find_by_promotion_type(
    &self,
    promotion_type: String,
  ) -> Result<Vec<Promotion>> {
    self
      .select("WHERE promotion_type = ?1", vec![Value::Text(promotion_type)])
      .await
  }

  async fn find_by_active(&self, active: bool) -> Result<Vec<Promotion>> {
    self
      .select("WHERE active = ?1", vec![Value::Integer(i64::from(active))])
      .await
  }

  async fn find_by_end_date(
    &self,
    end_date: DateTime<Utc>,
  ) -> Result<Vec<Promotion>> {
    self
      .select("WHERE end_date = ?1", vec![Value::Text(encode_dt(end_date))])
      .await
  }
}
