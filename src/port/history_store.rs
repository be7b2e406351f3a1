//! Append-only log of classification requests.

use crate::domain::{EmailRecord, NewEmailRecord};
use crate::error::StoreError;
use std::future::Future;
use std::pin::Pin;

/// Storage for past classifications.
///
/// Implementations include `SqliteStore` for production and `MockStore` for tests.
pub trait HistoryStore: Send + Sync {
    /// Append one record and return its id.
    fn append(
        &self,
        record: NewEmailRecord,
    ) -> Pin<Box<dyn Future<Output = Result<i64, StoreError>> + Send + '_>>;

    /// Every stored record in storage order.
    fn all_records(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EmailRecord>, StoreError>> + Send + '_>>;
}
