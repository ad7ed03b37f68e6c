//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a `Z` suffix, so equal
//! instants always encode to equal strings. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use promotions_core::promotion::Promotion;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawPromotion::from_row`].
pub const PROMOTION_COLUMNS: &str =
  "id, title, promotion_type, start_date, end_date, active";

/// Raw values read directly from a `promotions` row.
pub struct RawPromotion {
  pub id:             String,
  pub title:          String,
  pub promotion_type: String,
  pub start_date:     String,
  pub end_date:       String,
  pub active:         bool,
}

impl RawPromotion {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      title:          row.get(1)?,
      promotion_type: row.get(2)?,
      start_date:     row.get(3)?,
      end_date:       row.get(4)?,
      active:         row.get(5)?,
    })
  }

  pub fn into_promotion(self) -> Result<Promotion> {
    Ok(Promotion {
      id:             decode_uuid(&self.id)?,
      title:          self.title,
      promotion_type: self.promotion_type,
      start_date:     decode_dt(&self.start_date)?,
      end_date:       decode_dt(&self.end_date)?,
      active:         self.active,
    })
  }
}
