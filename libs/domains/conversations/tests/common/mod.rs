//! In-memory collaborators for driving the router without external services.

#![allow(dead_code)]

use async_trait::async_trait;
use domain_conversations::{
    ChatMessage, ChatModel, Conversation, ConversationError, ConversationRepository,
    ConversationResult, ErrorContract, NewConversation, RagService, RetrievalConfig,
};
use domain_vector::{
    EmbeddingProvider, EmbeddingProviderType, EmbeddingResult, UpsertResult, VectorError,
    VectorIndex, VectorMatch, VectorRecord, VectorResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct InMemoryRepository {
    rows: Mutex<Vec<Conversation>>,
    /// Behave as if the insert returned no row
    pub drop_inserts: AtomicBool,
}

impl InMemoryRepository {
    pub fn rows(&self) -> Vec<Conversation> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryRepository {
    async fn insert(&self, input: NewConversation) -> ConversationResult<Option<Conversation>> {
        if self.drop_inserts.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let mut rows = self.rows.lock().unwrap();
        let row = Conversation {
            id: rows.len() as i64 + 1,
            request: input.request,
            response: input.response,
        };
        rows.push(row.clone());
        Ok(Some(row))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> ConversationResult<Vec<Conversation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| ids.contains(&row.id))
            .cloned()
            .collect())
    }
}

const KEYWORDS: [&str; 4] = ["liability", "kasko", "health", "travel"];

/// One dimension per keyword plus a small constant, so texts sharing
/// keywords score close to 1.0 and unrelated texts close to 0.0
#[derive(Default)]
pub struct KeywordEmbedder {
    /// `embed_batch` yields no vectors
    pub return_nothing: AtomicBool,
    /// Every call fails
    pub fail: AtomicBool,
}

impl KeywordEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut values: Vec<f32> = KEYWORDS
            .iter()
            .map(|k| if lower.contains(k) { 1.0 } else { 0.0 })
            .collect();
        values.push(0.1);
        values
    }

    fn check(&self) -> VectorResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(VectorError::Embedding("HTTP 503 Service Unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::Cloudflare
    }

    async fn embed(&self, text: &str) -> VectorResult<EmbeddingResult> {
        self.check()?;
        Ok(EmbeddingResult::new(Self::vector(text)))
    }

    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<EmbeddingResult>> {
        self.check()?;
        if self.return_nothing.load(Ordering::SeqCst) {
            return Ok(vec![]);
        }
        Ok(texts
            .iter()
            .map(|t| EmbeddingResult::new(Self::vector(t)))
            .collect())
    }
}

/// Brute-force cosine similarity index
#[derive(Default)]
pub struct InMemoryIndex {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
}

impl InMemoryIndex {
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.vectors.lock().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (norm(a) * norm(b))
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn query(&self, vector: Vec<f32>, top_k: u32) -> VectorResult<Vec<VectorMatch>> {
        let mut matches: Vec<VectorMatch> = self
            .vectors
            .lock()
            .unwrap()
            .iter()
            .map(|(id, values)| VectorMatch {
                id: id.clone(),
                score: cosine(&vector, values),
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k as usize);
        Ok(matches)
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> VectorResult<UpsertResult> {
        let mut vectors = self.vectors.lock().unwrap();
        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        for record in records {
            vectors.insert(record.id, record.values);
        }
        Ok(UpsertResult {
            count: ids.len(),
            ids,
            mutation_id: None,
        })
    }
}

/// Records every prompt and answers with a fixed string
pub struct RecordingChat {
    pub answer: String,
    pub fail: AtomicBool,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl RecordingChat {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            fail: AtomicBool::new(false),
            prompts: Mutex::new(vec![]),
        }
    }

    pub fn last_prompt(&self) -> Option<Vec<ChatMessage>> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatModel for RecordingChat {
    async fn complete(&self, messages: Vec<ChatMessage>) -> ConversationResult<String> {
        self.prompts.lock().unwrap().push(messages);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ConversationError::Chat("HTTP 500 Internal Server Error".to_string()));
        }
        Ok(self.answer.clone())
    }
}

/// Handles on every fake, plus the router built over them
pub struct TestApp {
    pub repository: Arc<InMemoryRepository>,
    pub embedder: Arc<KeywordEmbedder>,
    pub index: Arc<InMemoryIndex>,
    pub chat: Arc<RecordingChat>,
    pub router: axum::Router,
}

impl TestApp {
    pub fn new(contract: ErrorContract) -> Self {
        let repository = Arc::new(InMemoryRepository::default());
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = Arc::new(InMemoryIndex::default());
        let chat = Arc::new(RecordingChat::new("Model answer"));

        let service = RagService::new(
            repository.clone(),
            embedder.clone(),
            index.clone(),
            chat.clone(),
            RetrievalConfig::default(),
        );

        Self {
            router: domain_conversations::router(service, contract),
            repository,
            embedder,
            index,
            chat,
        }
    }
}
