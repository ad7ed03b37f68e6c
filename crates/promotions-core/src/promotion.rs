//! The Promotion entity and its boundary decode.
//!
//! Request bodies arrive as loosely-shaped JSON. [`PromotionPayload`] captures
//! every field as optional so that presence is checked explicitly and reported
//! by name, before anything reaches the store.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Promotion ───────────────────────────────────────────────────────────────

/// A stored promotion. Every field is populated once persisted.
///
/// Deserializing runs the same title and date-order checks as
/// [`PromotionPayload::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PromotionRecord")]
pub struct Promotion {
  /// Server-assigned; never changes after creation.
  pub id:             Uuid,
  pub title:          String,
  /// Free-text category, e.g. "BOGO" or "percent-off".
  pub promotion_type: String,
  pub start_date:     DateTime<Utc>,
  pub end_date:       DateTime<Utc>,
  pub active:         bool,
}

impl Promotion {
  /// Replace every mutable field with the values from `input`. `id` is kept.
  pub fn apply(&mut self, input: NewPromotion) {
    let NewPromotion { title, promotion_type, start_date, end_date, active } =
      input;
    self.title = title;
    self.promotion_type = promotion_type;
    self.start_date = start_date;
    self.end_date = end_date;
    self.active = active;
  }
}

/// Unchecked wire form of [`Promotion`].
#[derive(Deserialize)]
struct PromotionRecord {
  id:             Uuid,
  title:          String,
  promotion_type: String,
  start_date:     DateTime<Utc>,
  end_date:       DateTime<Utc>,
  active:         bool,
}

impl TryFrom<PromotionRecord> for Promotion {
  type Error = Error;

  fn try_from(r: PromotionRecord) -> Result<Self> {
    check_invariants(&r.title, r.start_date, r.end_date)?;
    Ok(Promotion {
      id:             r.id,
      title:          r.title,
      promotion_type: r.promotion_type,
      start_date:     r.start_date,
      end_date:       r.end_date,
      active:         r.active,
    })
  }
}

// ─── NewPromotion ────────────────────────────────────────────────────────────

/// Input to [`crate::store::PromotionStore::create`].
/// `id` is always assigned by the store; it is not accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPromotion {
  pub title:          String,
  pub promotion_type: String,
  pub start_date:     DateTime<Utc>,
  pub end_date:       DateTime<Utc>,
  pub active:         bool,
}

impl NewPromotion {
  /// Decode and validate a JSON request body.
  pub fn from_json(body: &[u8]) -> Result<Self> {
    let payload: PromotionPayload = serde_json::from_slice(body).map_err(|e| {
      Error::validation(format!("invalid promotion payload: {e}"))
    })?;
    payload.validate()
  }
}

// ─── Payload ─────────────────────────────────────────────────────────────────

/// The wire shape of a create/update body. Unknown keys (including `id`) are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromotionPayload {
  pub title:          Option<String>,
  pub promotion_type: Option<String>,
  pub start_date:     Option<String>,
  pub end_date:       Option<String>,
  pub active:         Option<bool>,
}

impl PromotionPayload {
  /// Check that every field is present and well-formed.
  pub fn validate(self) -> Result<NewPromotion> {
    let title = required(self.title, "title")?;
    let promotion_type = required(self.promotion_type, "promotion_type")?;
    let start_date = timestamp_field(self.start_date, "start_date")?;
    let end_date = timestamp_field(self.end_date, "end_date")?;
    let active = required(self.active, "active")?;
    check_invariants(&title, start_date, end_date)?;

    Ok(NewPromotion { title, promotion_type, start_date, end_date, active })
  }
}

fn check_invariants(
  title: &str,
  start_date: DateTime<Utc>,
  end_date: DateTime<Utc>,
) -> Result<()> {
  if title.trim().is_empty() {
    return Err(Error::validation("title must not be empty"));
  }
  if end_date < start_date {
    return Err(Error::validation(
      "end_date must not be earlier than start_date",
    ));
  }
  Ok(())
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
  value.ok_or_else(|| {
    Error::validation(format!("missing required field: {field}"))
  })
}

fn timestamp_field(value: Option<String>, field: &str) -> Result<DateTime<Utc>> {
  let raw = required(value, field)?;
  parse_timestamp(&raw)
    .map_err(|_| Error::validation(format!("invalid {field}: {raw:?}")))
}

// ─── Scalar parsing ──────────────────────────────────────────────────────────

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with an offset, a naive date-time (taken as UTC, `T` or
/// space separated), or a bare date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
      return Ok(naive.and_utc());
    }
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
    .ok_or_else(|| Error::validation(format!("invalid timestamp: {s:?}")))
}

/// Parse the common string encodings of a boolean, case-insensitively.
pub fn parse_flag(s: &str) -> Result<bool> {
  match s.trim().to_ascii_lowercase().as_str() {
    "true" | "t" | "yes" | "y" | "1" | "on" => Ok(true),
    "false" | "f" | "no" | "n" | "0" | "off" => Ok(false),
    _ => Err(Error::validation(format!("invalid boolean: {s:?}"))),
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  fn summer_sale() -> serde_json::Value {
    json!({
      "title":          "Summer Sale",
      "promotion_type": "BOGO",
      "start_date":     "2024-06-01T00:00:00Z",
      "end_date":       "2024-06-30T00:00:00Z",
      "active":         true,
    })
  }

  fn decode(value: &serde_json::Value) -> Result<NewPromotion> {
    NewPromotion::from_json(value.to_string().as_bytes())
  }

  fn validation_message(value: &serde_json::Value) -> String {
    match decode(value) {
      Err(Error::Validation(msg)) => msg,
      Ok(p) => panic!("expected validation error, got {p:?}"),
    }
  }

  #[test]
  fn decodes_complete_payload() {
    let p = decode(&summer_sale()).unwrap();
    assert_eq!(p.title, "Summer Sale");
    assert_eq!(p.promotion_type, "BOGO");
    assert_eq!(p.start_date, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    assert_eq!(p.end_date, Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap());
    assert!(p.active);
  }

  #[test]
  fn ignores_client_supplied_id() {
    let mut body = summer_sale();
    body["id"] = json!("not-a-real-id");
    assert!(decode(&body).is_ok());
  }

  #[test]
  fn rejects_each_missing_field() {
    for field in ["title", "promotion_type", "start_date", "end_date", "active"] {
      let mut body = summer_sale();
      body.as_object_mut().unwrap().remove(field);
      let msg = validation_message(&body);
      assert!(msg.contains(field), "{field}: {msg}");
    }
  }

  #[test]
  fn null_counts_as_missing() {
    let mut body = summer_sale();
    body["title"] = serde_json::Value::Null;
    assert!(validation_message(&body).contains("title"));
  }

  #[test]
  fn rejects_non_boolean_active() {
    let mut body = summer_sale();
    body["active"] = json!("yes");
    validation_message(&body);
  }

  #[test]
  fn rejects_unparseable_date() {
    let mut body = summer_sale();
    body["end_date"] = json!("next tuesday");
    assert!(validation_message(&body).contains("end_date"));
  }

  #[test]
  fn rejects_blank_title() {
    let mut body = summer_sale();
    body["title"] = json!("   ");
    assert!(validation_message(&body).contains("title"));
  }

  #[test]
  fn rejects_end_before_start() {
    let mut body = summer_sale();
    body["start_date"] = json!("2024-07-01T00:00:00Z");
    validation_message(&body);
  }

  #[test]
  fn rejects_non_object_body() {
    validation_message(&json!([1, 2, 3]));
    assert!(matches!(
      NewPromotion::from_json(b"not json"),
      Err(Error::Validation(_))
    ));
  }

  #[test]
  fn timestamp_encodings() {
    let midnight = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    assert_eq!(parse_timestamp("2024-06-01T00:00:00Z").unwrap(), midnight);
    assert_eq!(parse_timestamp("2024-06-01T02:00:00+02:00").unwrap(), midnight);
    assert_eq!(parse_timestamp("2024-06-01T00:00:00").unwrap(), midnight);
    assert_eq!(parse_timestamp("2024-06-01 00:00:00.000").unwrap(), midnight);
    assert_eq!(parse_timestamp("2024-06-01").unwrap(), midnight);
    assert!(parse_timestamp("June 1st").is_err());
  }

  #[test]
  fn flag_encodings() {
    for s in ["true", "True", "1", "yes", "on"] {
      assert!(parse_flag(s).unwrap(), "{s}");
    }
    for s in ["false", "FALSE", "0", "no", "off"] {
      assert!(!parse_flag(s).unwrap(), "{s}");
    }
    assert!(parse_flag("maybe").is_err());
  }

  #[test]
  fn apply_keeps_id() {
    let id = Uuid::new_v4();
    let mut promotion = Promotion {
      id,
      title: "Old".into(),
      promotion_type: "percent-off".into(),
      start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
      end_date: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
      active: false,
    };
    let input = decode(&summer_sale()).unwrap();
    promotion.apply(input.clone());
    assert_eq!(promotion.id, id);
    assert_eq!(promotion.title, input.title);
    assert_eq!(promotion.end_date, input.end_date);
    assert!(promotion.active);
  }

  #[test]
  fn promotion_deserialize_enforces_invariants() {
    let mut stored = summer_sale();
    stored["id"] = json!(Uuid::new_v4().to_string());
    let ok: Promotion = serde_json::from_value(stored.clone()).unwrap();
    assert_eq!(ok.title, "Summer Sale");

    let mut backwards = stored.clone();
    backwards["start_date"] = json!("2024-07-01T00:00:00Z");
    let err = serde_json::from_value::<Promotion>(backwards).unwrap_err();
    assert!(err.to_string().contains("end_date"), "{err}");

    let mut blank = stored;
    blank["title"] = json!("");
    assert!(serde_json::from_value::<Promotion>(blank).is_err());
  }
}
