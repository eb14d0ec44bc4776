//! Query-layer tests against sea-orm's `MockDatabase`.
//!
//! Run with: `cargo test --test db_test`
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use localfreelance_backend::db::{clients, quotes as quote_db};
use localfreelance_backend::models::client_bookmarks;
use localfreelance_backend::models::quotes::{self, CreateQuote, QuoteStatus};

fn quote(work_id: Uuid, freelancer_id: Uuid) -> quotes::Model {
    let now = Utc::now();
    quotes::Model {
        id: Uuid::new_v4(),
        work_id,
        freelancer_id,
        proposed_rate: 45.0,
        estimated_duration: 6,
        cover_letter: "I shoot weddings every weekend.".to_string(),
        status: QuoteStatus::Pending,
        email_sent: false,
        email_sent_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn create_quote(work_id: Uuid) -> CreateQuote {
    CreateQuote {
        work_id,
        proposed_rate: 45.0,
        estimated_duration: 6,
        cover_letter: "I shoot weddings every weekend.".to_string(),
        send_email: None,
    }
}

#[tokio::test]
async fn test_bookmark_toggles_on_then_off() {
    let client_id = Uuid::new_v4();
    let freelancer_id = Uuid::new_v4();
    let bookmark = client_bookmarks::Model {
        client_id,
        freelancer_id,
        created_at: Utc::now(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // first toggle: lookup finds nothing, insert returns the row
        .append_query_results([Vec::<client_bookmarks::Model>::new()])
        .append_query_results([vec![bookmark.clone()]])
        // second toggle: lookup finds the row, which is deleted
        .append_query_results([vec![bookmark.clone()]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    assert!(clients::toggle_bookmark(&db, client_id, freelancer_id).await.unwrap());
    assert!(!clients::toggle_bookmark(&db, client_id, freelancer_id).await.unwrap());
}

#[tokio::test]
async fn test_second_quote_for_same_work_is_refused() {
    let work_id = Uuid::new_v4();
    let freelancer_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![quote(work_id, freelancer_id)]])
        .into_connection();

    let inserted = quote_db::insert_quote_once(&db, freelancer_id, create_quote(work_id))
        .await
        .unwrap();
    assert!(inserted.is_none());
}

#[tokio::test]
async fn test_first_quote_is_pending_without_email() {
    let work_id = Uuid::new_v4();
    let freelancer_id = Uuid::new_v4();
    let stored = quote(work_id, freelancer_id);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<quotes::Model>::new()])
        .append_query_results([vec![stored.clone()]])
        .into_connection();

    let inserted = quote_db::insert_quote_once(&db, freelancer_id, create_quote(work_id))
        .await
        .unwrap()
        .expect("first quote should be stored");

    assert_eq!(inserted.status, QuoteStatus::Pending);
    assert!(!inserted.email_sent);
    assert_eq!(inserted.work_id, work_id);
}
