//! Live integration tests for leadsync-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/leadsync-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{TimeZone, Utc};
use leadsync_core::Properties;
use leadsync_db::{
    find_lead_by_email, get_lead_by_hubspot_id, insert_lead, insert_meeting,
    list_meetings_for_lead, run_migrations, LeadMirror, NewLead, NewMeeting, PgLeadMirror,
    StoreError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn lead_props(email: &str) -> Properties {
    [
        ("email", email),
        ("firstname", "Ada"),
        ("lastname", "Lovelace"),
        ("phone", "555-0100"),
        ("lifecyclestage", "lead"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect()
}

fn new_lead(hubspot_id: &str, email: &str) -> NewLead {
    NewLead::from_properties(hubspot_id, &lead_props(email))
        .unwrap_or_else(|e| panic!("new_lead failed for {hubspot_id}: {e}"))
}

fn new_meeting(hubspot_id: &str, lead_id: &str) -> NewMeeting {
    NewMeeting {
        hubspot_id: hubspot_id.to_owned(),
        lead_id: lead_id.to_owned(),
        title: Some("Intro call".to_owned()),
        start_time: Utc.with_ymd_and_hms(2026, 3, 1, 15, 0, 0).single(),
        end_time: Utc.with_ymd_and_hms(2026, 3, 1, 15, 30, 0).single(),
    }
}

// ---------------------------------------------------------------------------
// Section 1: Leads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_lead_round_trips_columns(pool: sqlx::PgPool) {
    let row = insert_lead(&pool, &new_lead("42", "ada@example.com"))
        .await
        .expect("insert_lead failed");

    assert!(row.id > 0);
    assert_eq!(row.hubspot_id, "42");
    assert_eq!(row.email, "ada@example.com");
    assert_eq!(row.firstname.as_deref(), Some("Ada"));
    assert_eq!(row.lastname.as_deref(), Some("Lovelace"));
    assert_eq!(row.phone.as_deref(), Some("555-0100"));

    let found = find_lead_by_email(&pool, "ada@example.com")
        .await
        .expect("find_lead_by_email failed")
        .expect("lead should exist");
    assert_eq!(found, row);

    let by_id = get_lead_by_hubspot_id(&pool, "42")
        .await
        .expect("get_lead_by_hubspot_id failed");
    assert_eq!(by_id, Some(row));
}

#[sqlx::test(migrations = "../../migrations")]
async fn find_lead_by_email_is_exact_match(pool: sqlx::PgPool) {
    insert_lead(&pool, &new_lead("42", "ada@example.com"))
        .await
        .unwrap();

    let found = find_lead_by_email(&pool, "ADA@example.com").await.unwrap();
    assert!(found.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn find_lead_by_email_returns_earliest(pool: sqlx::PgPool) {
    insert_lead(&pool, &new_lead("1", "dup@example.com"))
        .await
        .unwrap();
    insert_lead(&pool, &new_lead("2", "dup@example.com"))
        .await
        .unwrap();

    let found = find_lead_by_email(&pool, "dup@example.com")
        .await
        .unwrap()
        .expect("lead should exist");
    assert_eq!(found.hubspot_id, "1");
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_hubspot_id_is_conflict(pool: sqlx::PgPool) {
    insert_lead(&pool, &new_lead("42", "a@example.com"))
        .await
        .unwrap();

    let err = insert_lead(&pool, &new_lead("42", "b@example.com"))
        .await
        .expect_err("second insert should fail");
    assert!(matches!(err, StoreError::Conflict(_)), "{err:?}");
}

// ---------------------------------------------------------------------------
// Section 2: Meetings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_meeting_for_mirrored_lead(pool: sqlx::PgPool) {
    insert_lead(&pool, &new_lead("42", "a@example.com"))
        .await
        .unwrap();

    let id = insert_meeting(&pool, &new_meeting("m-1", "42"))
        .await
        .expect("insert_meeting failed");
    assert!(id > 0);

    let meetings = list_meetings_for_lead(&pool, "42").await.unwrap();
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0].id, id);
    assert_eq!(meetings[0].title.as_deref(), Some("Intro call"));
    assert_eq!(
        meetings[0].start_time,
        Utc.with_ymd_and_hms(2026, 3, 1, 15, 0, 0).single()
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_meeting_for_unknown_lead_is_fk_violation(pool: sqlx::PgPool) {
    let err = insert_meeting(&pool, &new_meeting("m-1", "missing"))
        .await
        .expect_err("insert should fail");
    assert!(matches!(err, StoreError::ForeignKeyViolation(_)), "{err:?}");

    let meetings = list_meetings_for_lead(&pool, "missing").await.unwrap();
    assert!(meetings.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_meeting_is_conflict(pool: sqlx::PgPool) {
    insert_lead(&pool, &new_lead("42", "a@example.com"))
        .await
        .unwrap();
    insert_meeting(&pool, &new_meeting("m-1", "42")).await.unwrap();

    let err = insert_meeting(&pool, &new_meeting("m-1", "42"))
        .await
        .expect_err("duplicate meeting should fail");
    assert!(matches!(err, StoreError::Conflict(_)), "{err:?}");
}

// ---------------------------------------------------------------------------
// Section 3: Mirror + migrations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn pg_mirror_inserts_and_finds(pool: sqlx::PgPool) {
    let mirror = PgLeadMirror::new(pool);
    mirror.ping().await.expect("ping failed");

    let row = mirror
        .insert_lead("42", &lead_props("ada@example.com"))
        .await
        .expect("insert failed");
    let found = mirror
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .expect("lead should exist");
    assert_eq!(found.id, row.id);

    let err = mirror
        .insert_lead("43", &Properties::new())
        .await
        .expect_err("missing email should fail");
    assert!(matches!(err, StoreError::MissingField("email")));
}

#[sqlx::test(migrations = "../../migrations")]
async fn run_migrations_is_idempotent(pool: sqlx::PgPool) {
    let applied = run_migrations(&pool).await.expect("migrations failed");
    assert_eq!(applied, 0);
}
