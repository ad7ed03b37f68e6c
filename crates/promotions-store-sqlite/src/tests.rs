//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, TimeZone, Utc};
use promotions_core::{
  promotion::NewPromotion,
  store::{PromotionFilter, PromotionStore, TitleMatch},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn day(m: u32, d: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, m, d, 0, 0, 0).unwrap()
}

fn promo(title: &str, kind: &str, end: DateTime<Utc>, active: bool) -> NewPromotion {
  NewPromotion {
    title: title.into(),
    promotion_type: kind.into(),
    start_date: day(1, 1),
    end_date: end,
    active,
  }
}

fn summer_sale() -> NewPromotion {
  promo("Summer Sale", "BOGO", day(6, 30), true)
}

// ─── Create / find ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find() {
  let s = store().await;

  let created = s.create(summer_sale()).await.unwrap();
  assert_eq!(created.title, "Summer Sale");

  let fetched = s.find(created.id).await.unwrap();
  assert_eq!(fetched, Some(created));
}

#[tokio::test]
async fn create_assigns_distinct_ids() {
  let s = store().await;
  let a = s.create(summer_sale()).await.unwrap();
  let b = s.create(summer_sale()).await.unwrap();
  assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn find_missing_returns_none() {
  let s = store().await;
  let result = s.find(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn all_returns_every_promotion() {
  let s = store().await;
  s.create(summer_sale()).await.unwrap();
  s.create(promo("Winter Sale", "percent-off", day(12, 31), false))
    .await
    .unwrap();
  s.create(promo("Spring Sale", "BOGO", day(4, 30), true))
    .await
    .unwrap();

  let all = s.all().await.unwrap();
  assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn schema_init_is_idempotent() {
  let path = std::env::temp_dir().join(format!("promotions-{}.db", Uuid::new_v4()));

  let first = SqliteStore::open(&path).await.unwrap();
  let created = first.create(summer_sale()).await.unwrap();
  drop(first);

  let second = SqliteStore::open(&path).await.unwrap();
  assert_eq!(second.find(created.id).await.unwrap(), Some(created));

  drop(second);
  let _ = std::fs::remove_file(&path);
}

// ─── Update / delete ─────────────────────────────────────────────────────────

#[tokio::test]
async fn update_replaces_all_fields() {
  let s = store().await;
  let mut p = s.create(summer_sale()).await.unwrap();

  p.apply(promo("Summer Blowout", "percent-off", day(7, 15), false));
  let updated = s.update(p.clone()).await.unwrap();
  assert_eq!(updated.as_ref(), Some(&p));

  let fetched = s.find(p.id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "Summer Blowout");
  assert_eq!(fetched.promotion_type, "percent-off");
  assert_eq!(fetched.end_date, day(7, 15));
  assert!(!fetched.active);
}

#[tokio::test]
async fn update_missing_writes_nothing() {
  let s = store().await;
  let mut ghost = s.create(summer_sale()).await.unwrap();
  s.delete(ghost.id).await.unwrap();

  ghost.title = "Ghost".into();
  assert!(s.update(ghost.clone()).await.unwrap().is_none());
  assert!(s.find(ghost.id).await.unwrap().is_none());
  assert!(s.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_is_idempotent() {
  let s = store().await;
  let p = s.create(summer_sale()).await.unwrap();

  s.delete(p.id).await.unwrap();
  s.delete(p.id).await.unwrap();
  s.delete(Uuid::new_v4()).await.unwrap();

  assert!(s.find(p.id).await.unwrap().is_none());
}

// ─── Finders ─────────────────────────────────────────────────────────────────

async fn seeded() -> SqliteStore {
  let s = store().await;
  s.create(summer_sale()).await.unwrap();
  s.create(promo("Winter Sale", "percent-off", day(12, 31), false))
    .await
    .unwrap();
  s.create(promo("Spring Sale", "BOGO", day(4, 30), false))
    .await
    .unwrap();
  s
}

#[tokio::test]
async fn find_by_promotion_type_is_exact() {
  let s = seeded().await;
  let bogo = s.find_by_promotion_type("BOGO".into()).await.unwrap();
  assert_eq!(bogo.len(), 2);
  assert!(bogo.iter().all(|p| p.promotion_type == "BOGO"));

  assert!(s.find_by_promotion_type("bogo".into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn find_by_active_partitions() {
  let s = seeded().await;
  let active = s.find_by_active(true).await.unwrap();
  let inactive = s.find_by_active(false).await.unwrap();

  assert_eq!(active.len(), 1);
  assert_eq!(active[0].title, "Summer Sale");
  assert_eq!(inactive.len(), 2);
  assert!(inactive.iter().all(|p| !p.active));
}

#[tokio::test]
async fn find_by_title_ignores_case_by_default() {
  let s = seeded().await;
  let hits = s.find_by_title("summer sale".into()).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].title, "Summer Sale");

  // Exact match, not substring.
  assert!(s.find_by_title("Summer".into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn find_by_title_exact_mode() {
  let s = seeded().await.with_title_match(TitleMatch::Exact);
  assert!(s.find_by_title("summer sale".into()).await.unwrap().is_empty());
  assert_eq!(s.find_by_title("Summer Sale".into()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn find_by_end_date_matches_instant() {
  let s = seeded().await;
  let hits = s.find_by_end_date(day(12, 31)).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].title, "Winter Sale");

  assert!(s.find_by_end_date(day(1, 1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_dispatches_filter() {
  let s = seeded().await;
  assert_eq!(s.list(PromotionFilter::All).await.unwrap().len(), 3);
  assert_eq!(
    s.list(PromotionFilter::PromotionType("percent-off".into()))
      .await
      .unwrap()
      .len(),
    1
  );
  assert_eq!(s.list(PromotionFilter::Active(false)).await.unwrap().len(), 2);
  assert_eq!(
    s.list(PromotionFilter::Title("WINTER SALE".into()))
      .await
      .unwrap()
      .len(),
    1
  );
  assert_eq!(
    s.list(PromotionFilter::EndDate(day(4, 30))).await.unwrap().len(),
    1
  );
}
