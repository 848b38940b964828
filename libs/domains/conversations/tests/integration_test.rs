//! Integration tests for the conversations domain
//!
//! These use real PostgreSQL via testcontainers (Docker required, so they are
//! ignored by default):
//! - Generated ids come back from the insert
//! - The IN filter returns exactly the requested rows
//! - A full insert/query round trip through the service

mod common;

use common::{InMemoryIndex, KeywordEmbedder, RecordingChat};
use domain_conversations::*;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn new_conversation(builder: &TestDataBuilder, topic: &str) -> NewConversation {
    let (request, response) = builder.exchange(topic);
    NewConversation { request, response }
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_insert_generates_sequential_ids() {
    let db = TestDatabase::new().await;
    let repo = PgConversationRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("sequential_ids");

    let first = assert_some(
        repo.insert(new_conversation(&builder, "first")).await.unwrap(),
        "first insert should return a row",
    );
    let second = assert_some(
        repo.insert(new_conversation(&builder, "second")).await.unwrap(),
        "second insert should return a row",
    );

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(second.request, builder.exchange("second").0);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_find_by_ids_returns_only_requested_rows() {
    let db = TestDatabase::new().await;
    let repo = PgConversationRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("find_by_ids");

    let mut ids = Vec::new();
    for topic in ["a", "b", "c"] {
        let row = repo.insert(new_conversation(&builder, topic)).await.unwrap().unwrap();
        ids.push(row.id);
    }

    let rows = repo.find_by_ids(&[ids[0], ids[2], 999]).await.unwrap();
    let found: Vec<_> = rows.iter().map(|r| r.id).collect();
    assert_eq!(found, vec![ids[0], ids[2]]);

    assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_text_with_quotes_round_trips() {
    let db = TestDatabase::new().await;
    let repo = PgConversationRepository::new(db.connection());

    let input = NewConversation {
        request: "Robert'); DROP TABLE conversations;--".to_string(),
        response: "Poliçe kapsamı 'genişletilmiş' değildir.".to_string(),
    };
    let row = repo.insert(input.clone()).await.unwrap().unwrap();

    let rows = repo.find_by_ids(&[row.id]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].request, input.request);
    assert_eq!(rows[0].response, input.response);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_round_trip_through_service() {
    let db = TestDatabase::new().await;
    let chat = Arc::new(RecordingChat::new("answer"));
    let service = RagService::new(
        Arc::new(PgConversationRepository::new(db.connection())),
        Arc::new(KeywordEmbedder::default()),
        Arc::new(InMemoryIndex::default()),
        chat.clone(),
        RetrievalConfig::default(),
    );

    let inserted = service
        .insert(NewConversation {
            request: "What is covered under liability insurance?".to_string(),
            response: "Damage you cause to others.".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(inserted.inserted.ids, vec![inserted.id.to_string()]);

    service
        .ask("What is covered under liability insurance?")
        .await
        .unwrap();

    let prompt = assert_some(chat.last_prompt(), "chat model should be called");
    assert_contains(&prompt[0].content, "What is covered under liability insurance?", "context");
    assert_contains(&prompt[0].content, "Damage you cause to others.", "context");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_orphan_row_survives_embedding_failure() {
    let db = TestDatabase::new().await;
    let embedder = Arc::new(KeywordEmbedder::default());
    embedder.fail.store(true, Ordering::SeqCst);
    let index = Arc::new(InMemoryIndex::default());

    let service = RagService::new(
        Arc::new(PgConversationRepository::new(db.connection())),
        embedder,
        index.clone(),
        Arc::new(RecordingChat::new("unused")),
        RetrievalConfig::default(),
    );

    let err = service
        .insert(NewConversation {
            request: "q".to_string(),
            response: "a".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.is_upstream());

    let repo = PgConversationRepository::new(db.connection());
    assert_eq!(repo.find_by_ids(&[1]).await.unwrap().len(), 1);
    assert!(index.ids().is_empty());
}
