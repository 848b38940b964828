use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Distance metric for similarity calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Euclidean,
    DotProduct,
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclidean" | "euclid" => Ok(Self::Euclidean),
            "dot" | "dotproduct" => Ok(Self::DotProduct),
            other => Err(format!("unknown distance metric '{}'", other)),
        }
    }
}

/// Embedding provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    #[default]
    Cloudflare,
    OpenAI,
}

impl fmt::Display for EmbeddingProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cloudflare => write!(f, "cloudflare"),
            Self::OpenAI => write!(f, "openai"),
        }
    }
}

impl FromStr for EmbeddingProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cloudflare" => Ok(Self::Cloudflare),
            "openai" => Ok(Self::OpenAI),
            other => Err(format!(
                "unknown provider '{}', expected 'cloudflare' or 'openai'",
                other
            )),
        }
    }
}

/// Embedding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmbeddingResult {
    pub values: Vec<f32>,
    pub dimension: u32,
    /// Zero when the provider does not report usage
    pub tokens_used: u32,
}

impl EmbeddingResult {
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            dimension: values.len() as u32,
            values,
            tokens_used: 0,
        }
    }
}

/// One nearest-neighbour hit, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
}

/// A vector to store under a string id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
}

impl VectorRecord {
    pub fn new(id: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }
}

/// Acknowledgement returned by the index for an upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertResult {
    pub count: usize,
    pub ids: Vec<String>,
    /// Backend operation handle (Vectorize mutation id, Qdrant operation id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutation_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_parse() {
        assert_eq!(
            "OpenAI".parse::<EmbeddingProviderType>().unwrap(),
            EmbeddingProviderType::OpenAI
        );
        assert_eq!(
            "cloudflare".parse::<EmbeddingProviderType>().unwrap(),
            EmbeddingProviderType::Cloudflare
        );
        assert!("vertex".parse::<EmbeddingProviderType>().is_err());
    }

    #[test]
    fn test_distance_parse() {
        assert_eq!("dot".parse::<DistanceMetric>().unwrap(), DistanceMetric::DotProduct);
        assert!("manhattan".parse::<DistanceMetric>().is_err());
    }

    #[test]
    fn test_upsert_result_json_shape() {
        let result = UpsertResult {
            count: 1,
            ids: vec!["42".to_string()],
            mutation_id: Some("m-1".to_string()),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["ids"][0], "42");
        assert_eq!(json["mutationId"], "m-1");

        let without = UpsertResult {
            mutation_id: None,
            ..result
        };
        assert!(serde_json::to_value(&without).unwrap().get("mutationId").is_none());
    }

    #[test]
    fn test_embedding_result_dimension() {
        let result = EmbeddingResult::new(vec![0.0; 768]);
        assert_eq!(result.dimension, 768);
        assert_eq!(result.tokens_used, 0);
    }
}
