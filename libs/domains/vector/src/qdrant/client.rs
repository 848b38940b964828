use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use core_config::upstream::UpstreamConfig;
use database::common::{RetryConfig, retry_with_backoff_if};
use qdrant_client::qdrant::{
    self, CreateCollectionBuilder, Distance, PointId, PointStruct, ScoredPoint,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Qdrant, QdrantError};
use tracing::{info, instrument, warn};

use super::QdrantConfig;
use crate::error::{VectorError, VectorResult};
use crate::http::retry_config;
use crate::index::VectorIndex;
use crate::models::{DistanceMetric, UpsertResult, VectorMatch, VectorRecord};

// gRPC status codes worth retrying
const GRPC_DEADLINE_EXCEEDED: i32 = 4;
const GRPC_RESOURCE_EXHAUSTED: i32 = 8;
const GRPC_UNAVAILABLE: i32 = 14;

/// Qdrant-backed [`VectorIndex`] over a single collection
pub struct QdrantIndex {
    client: Qdrant,
    config: QdrantConfig,
    retry: RetryConfig,
}

impl QdrantIndex {
    pub fn new(config: QdrantConfig, upstream: &UpstreamConfig) -> VectorResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key.clone() {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| VectorError::Index(format!("Failed to build Qdrant client: {}", e)))?;

        Ok(Self {
            client,
            config,
            retry: retry_config(upstream),
        })
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    /// Create the collection when it does not exist yet
    pub async fn ensure_collection(&self) -> VectorResult<()> {
        if self.client.collection_exists(&self.config.collection).await? {
            return Ok(());
        }

        info!(
            collection = %self.config.collection,
            dimension = self.config.dimension,
            "Creating Qdrant collection"
        );

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.config.collection).vectors_config(
                    VectorParamsBuilder::new(
                        self.config.dimension,
                        to_qdrant_distance(self.config.distance),
                    ),
                ),
            )
            .await?;

        Ok(())
    }
}

fn to_qdrant_distance(metric: DistanceMetric) -> Distance {
    match metric {
        DistanceMetric::Cosine => Distance::Cosine,
        DistanceMetric::Euclidean => Distance::Euclid,
        DistanceMetric::DotProduct => Distance::Dot,
    }
}

fn is_transient(err: &QdrantError) -> bool {
    match err {
        QdrantError::ResponseError { status } => matches!(
            status.code() as i32,
            GRPC_DEADLINE_EXCEEDED | GRPC_RESOURCE_EXHAUSTED | GRPC_UNAVAILABLE
        ),
        _ => false,
    }
}

/// Numeric ids become numeric points; anything else is sent as a UUID string
fn to_point_id(id: &str) -> PointId {
    match id.parse::<u64>() {
        Ok(num) => PointId::from(num),
        Err(_) => PointId::from(id.to_string()),
    }
}

fn point_id_to_string(point_id: &PointId) -> Option<String> {
    match &point_id.point_id_options {
        Some(qdrant::point_id::PointIdOptions::Num(num)) => Some(num.to_string()),
        Some(qdrant::point_id::PointIdOptions::Uuid(uuid)) => Some(uuid.clone()),
        None => None,
    }
}

fn to_matches(points: Vec<ScoredPoint>) -> Vec<VectorMatch> {
    points
        .into_iter()
        .filter_map(|point| match point.id.as_ref().and_then(point_id_to_string) {
            Some(id) => Some(VectorMatch {
                id,
                score: point.score,
            }),
            None => {
                warn!(score = point.score, "Skipping Qdrant point without id");
                None
            }
        })
        .collect()
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    #[instrument(skip(self, vector), fields(collection = %self.config.collection, dimension = vector.len()))]
    async fn query(&self, vector: Vec<f32>, top_k: u32) -> VectorResult<Vec<VectorMatch>> {
        let response = retry_with_backoff_if(
            || {
                self.client.search_points(SearchPointsBuilder::new(
                    &self.config.collection,
                    vector.clone(),
                    u64::from(top_k),
                ))
            },
            self.retry.clone(),
            is_transient,
        )
        .await?;

        Ok(to_matches(response.result))
    }

    #[instrument(skip(self, records), fields(collection = %self.config.collection, count = records.len()))]
    async fn upsert(&self, records: Vec<VectorRecord>) -> VectorResult<UpsertResult> {
        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();

        let points: Vec<PointStruct> = records
            .into_iter()
            .map(|r| {
                PointStruct::new(
                    to_point_id(&r.id),
                    r.values,
                    HashMap::<String, QdrantValue>::new(),
                )
            })
            .collect();

        let response = retry_with_backoff_if(
            || {
                self.client.upsert_points(
                    UpsertPointsBuilder::new(&self.config.collection, points.clone()).wait(true),
                )
            },
            self.retry.clone(),
            is_transient,
        )
        .await?;

        Ok(UpsertResult {
            count: ids.len(),
            ids,
            mutation_id: response
                .result
                .and_then(|r| r.operation_id)
                .map(|op| op.to_string()),
        })
    }
}
