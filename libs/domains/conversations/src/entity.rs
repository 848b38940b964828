use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{Conversation, NewConversation};

/// Sea-ORM Entity for the conversations table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub request: String,
    #[sea_orm(column_type = "Text")]
    pub response: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Conversation {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            request: model.request,
            response: model.response,
        }
    }
}

// The id is generated by the database
impl From<NewConversation> for ActiveModel {
    fn from(input: NewConversation) -> Self {
        ActiveModel {
            id: NotSet,
            request: Set(input.request),
            response: Set(input.response),
        }
    }
}
