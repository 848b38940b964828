use async_trait::async_trait;

use crate::error::ConversationResult;
use crate::models::{Conversation, NewConversation};

/// Repository trait for conversation persistence
///
/// Rows are only ever inserted and read back by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Insert a row, returning it with its generated id.
    /// `None` means the store did not hand the row back.
    async fn insert(&self, input: NewConversation) -> ConversationResult<Option<Conversation>>;

    /// Fetch the rows whose id is in `ids` with a single query
    async fn find_by_ids(&self, ids: &[i64]) -> ConversationResult<Vec<Conversation>>;
}
