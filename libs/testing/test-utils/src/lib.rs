//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with the workspace migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic test data
//! - `assertions`: assertion helpers
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let (request, response) = builder.exchange("claims");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Seeded builder so each test gets stable, distinct data
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_insert_conversation");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A request/response pair tagged with the seed
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let (request, response) = TestDataBuilder::new(7).exchange("claims");
    /// assert_eq!(request, "test-question-7-claims");
    /// ```
    pub fn exchange(&self, topic: &str) -> (String, String) {
        (
            format!("test-question-{}-{}", self.seed, topic),
            format!("test-answer-{}-{}", self.seed, topic),
        )
    }

    /// A deterministic embedding of `dimension` values in `[0, 1)`
    pub fn vector(&self, dimension: usize) -> Vec<f32> {
        (0..dimension)
            .map(|i| ((self.seed.wrapping_add(i as u64) % 1000) as f32) / 1000.0)
            .collect()
    }
}

pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that `haystack` contains `needle`, printing both on failure
    pub fn assert_contains(haystack: &str, needle: &str, context: &str) {
        assert!(
            haystack.contains(needle),
            "{}: expected {:?} to contain {:?}",
            context,
            haystack,
            needle
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.exchange("a"), builder2.exchange("a"));
        assert_eq!(builder1.vector(8), builder2.vector(8));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.exchange("a"), builder2.exchange("a"));
    }

    #[test]
    fn test_vector_dimension() {
        let vector = TestDataBuilder::new(3).vector(768);
        assert_eq!(vector.len(), 768);
        assert!(vector.iter().all(|v| (0.0..1.0).contains(v)));
    }
}
