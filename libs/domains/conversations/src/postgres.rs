use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    entity,
    error::ConversationResult,
    models::{Conversation, NewConversation},
    repository::ConversationRepository,
};

pub struct PgConversationRepository {
    db: DatabaseConnection,
}

impl PgConversationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `SELECT ... WHERE id IN ($1, ..)`, values bound as parameters
pub(crate) fn select_by_ids(ids: &[i64]) -> sea_orm::Select<entity::Entity> {
    entity::Entity::find()
        .filter(entity::Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(entity::Column::Id)
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    async fn insert(&self, input: NewConversation) -> ConversationResult<Option<Conversation>> {
        let active_model: entity::ActiveModel = input.into();

        match entity::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
        {
            Ok(model) => {
                tracing::info!(conversation_id = model.id, "Created conversation");
                Ok(Some(model.into()))
            }
            Err(DbErr::RecordNotInserted | DbErr::RecordNotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_ids(&self, ids: &[i64]) -> ConversationResult<Vec<Conversation>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let models = select_by_ids(ids).all(&self.db).await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
