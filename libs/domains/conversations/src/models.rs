use domain_vector::UpsertResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A stored question/answer pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Conversation {
    /// Generated by the database
    #[schema(example = 1)]
    pub id: i64,
    /// The question as the user asked it
    pub request: String,
    /// The answer previously given
    pub response: String,
}

/// Validated input for a new conversation row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversation {
    pub request: String,
    pub response: String,
}

/// Body of `POST /insert`. Both fields are required and must be non-empty.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct InsertRequest {
    #[schema(example = "What is covered under liability insurance?")]
    pub request: Option<String>,
    #[schema(example = "Liability insurance covers damage you cause to others.")]
    pub response: Option<String>,
}

impl InsertRequest {
    /// Parse a raw body. Only a JSON object carries fields; arrays and other
    /// scalars parse to an empty request, `null` is an error.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Null => Err(serde::de::Error::custom("request body is null")),
            value @ Value::Object(_) => serde_json::from_value(value),
            _ => Ok(Self::default()),
        }
    }

    /// `None` when either field is missing or empty
    pub fn into_new(self) -> Option<NewConversation> {
        match (self.request, self.response) {
            (Some(request), Some(response)) if !request.is_empty() && !response.is_empty() => {
                Some(NewConversation { request, response })
            }
            _ => None,
        }
    }
}

/// Reply of `POST /insert`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InsertResponse {
    pub id: i64,
    /// Echo of the stored request text
    pub request: String,
    /// Result reported by the vector index upsert
    pub inserted: UpsertResult,
}
