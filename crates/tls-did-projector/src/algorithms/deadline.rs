//! # Bounded Ledger Reads

use crate::domain::DidError;
use std::future::Future;
use std::time::Duration;

/// Await `fut`, mapping an elapsed `limit` to `QueryTimeout`.
pub async fn with_deadline<T, F>(limit: Duration, query: &'static str, fut: F) -> Result<T, DidError>
where
    F: Future<Output = Result<T, DidError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(DidError::QueryTimeout {
            query,
            timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
