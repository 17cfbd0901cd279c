use super::types::CollectorResult;

/// A source of raw statistics.
///
/// The pipeline is generic over this trait so that the real
/// `unbound-control` invocation can be swapped for a canned producer in tests.
#[async_trait::async_trait]
pub trait DataProducer: Send + Sync {
    /// The raw data this producer returns.
    type Output: Send + Sync + 'static;

    /// Runs the collection once.
    ///
    /// Failures to obtain any data at all are reported as `CollectorError`;
    /// partial data is returned as `Ok` and left to the caller to judge.
    async fn produce(&self) -> CollectorResult<Self::Output>;
}
