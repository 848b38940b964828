use domain_vector::{EmbeddingProvider, VectorIndex, VectorMatch, VectorRecord};
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::chat::ChatModel;
use crate::error::{ConversationError, ConversationResult};
use crate::models::{Conversation, InsertResponse, NewConversation};
use crate::prompt::{RetrievalConfig, build_context, build_messages};
use crate::repository::ConversationRepository;

/// Query and insert orchestration over the four collaborators
#[derive(Clone)]
pub struct RagService {
    repository: Arc<dyn ConversationRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    chat: Arc<dyn ChatModel>,
    config: RetrievalConfig,
}

impl RagService {
    pub fn new(
        repository: Arc<dyn ConversationRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        chat: Arc<dyn ChatModel>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            repository,
            embedder,
            index,
            chat,
            config,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Answer `question`, grounding the model on similar stored exchanges
    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn ask(&self, question: &str) -> ConversationResult<String> {
        let context = build_context(&self.retrieve(question).await?);
        let messages = build_messages(&context, &self.config.system_prompt, question);

        self.chat.complete(messages).await
    }

    /// Stored exchanges relevant to `question`, best match first
    pub async fn retrieve(&self, question: &str) -> ConversationResult<Vec<Conversation>> {
        let embedding = self
            .embedder
            .embed(question)
            .await
            .map_err(ConversationError::embedding)?;

        let matches = self
            .index
            .query(embedding.values, self.config.top_k)
            .await
            .map_err(ConversationError::index)?;

        let ids = relevant_ids(&matches, self.config.similarity_cutoff);
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut rows = self.repository.find_by_ids(&ids).await?;
        rows.sort_by_key(|row| ids.iter().position(|id| *id == row.id));
        Ok(rows)
    }

    /// Store a question/answer pair and index its question.
    ///
    /// The row is written before the vector. If embedding or upsert fails the
    /// row stays without a vector and its id is logged.
    #[instrument(skip(self, input), fields(request_len = input.request.len()))]
    pub async fn insert(&self, input: NewConversation) -> ConversationResult<InsertResponse> {
        let row = self
            .repository
            .insert(input)
            .await?
            .ok_or(ConversationError::HistoryNotCreated)?;

        let values = match self.embedder.embed_batch(&[row.request.clone()]).await {
            Ok(results) => results.into_iter().next().map(|r| r.values),
            Err(e) => {
                warn!(conversation_id = row.id, error = %e, "Conversation stored without vector");
                return Err(ConversationError::embedding(e));
            }
        };

        let Some(values) = values.filter(|v| !v.is_empty()) else {
            warn!(conversation_id = row.id, "Embedding service returned no vector");
            return Err(ConversationError::EmbeddingMissing { id: row.id });
        };

        let inserted = self
            .index
            .upsert(vec![VectorRecord::new(row.id.to_string(), values)])
            .await
            .map_err(|e| {
                warn!(conversation_id = row.id, error = %e, "Conversation stored without vector");
                ConversationError::index(e)
            })?;

        tracing::info!(conversation_id = row.id, "Indexed conversation");

        Ok(InsertResponse {
            id: row.id,
            request: row.request,
            inserted,
        })
    }
}

/// Integer ids of matches scoring strictly above `cutoff`, in rank order
fn relevant_ids(matches: &[VectorMatch], cutoff: f32) -> Vec<i64> {
    let mut ids = Vec::new();
    for m in matches.iter().filter(|m| m.score > cutoff) {
        match m.id.parse::<i64>() {
            Ok(id) if !ids.contains(&id) => ids.push(id),
            Ok(_) => {}
            Err(_) => warn!(vector_id = %m.id, "Ignoring match with non-integer id"),
        }
    }
    ids
}
