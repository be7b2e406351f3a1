//! Read side of the spam keyword list.

use crate::domain::SpamKeyword;
use crate::error::StoreError;
use std::future::Future;
use std::pin::Pin;

/// Supplies the keyword list consulted on every classification.
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
pub trait KeywordSource: Send + Sync {
    fn all_keywords(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SpamKeyword>, StoreError>> + Send + '_>>;
}
