//! Shared helpers for integration tests.
#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

use squarefeet::db::{DbPool, establish_connection_pool};
use squarefeet::domain::listing::{ListingDetails, ListingDraft, ListingType};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite database in a temporary directory with all migrations applied.
/// Removed when dropped.
pub struct TestDb {
    pool: DbPool,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"), 4)
            .expect("create pool");

        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

/// Fixed timestamps so ordering by creation time is deterministic.
pub fn minutes_after_epoch(minutes: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        + Duration::minutes(minutes)
}

pub fn draft(name: &str) -> ListingDraft {
    ListingDraft {
        name: name.to_string(),
        description: "Integration test listing".to_string(),
        address: "10 Test Street".to_string(),
        listing_type: ListingType::Rent,
        bedrooms: 2,
        bathrooms: 1,
        kitchens: 1,
        regular_price: 1000,
        discount_price: 0,
        offer: false,
        parking: false,
        furnished: false,
        image_urls: vec!["https://cdn.example.com/listing.png".to_string()],
    }
}

pub fn details(draft: ListingDraft) -> ListingDetails {
    ListingDetails::try_new(draft).expect("valid listing details")
}
