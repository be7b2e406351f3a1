use spam_sieve::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    spam_sieve::app::run().await
}
