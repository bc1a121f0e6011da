// Repository trait for environment history access
use crate::domain::environment::{Attribute, Reading};
use async_trait::async_trait;

#[async_trait]
pub trait EnvironmentRepository: Send + Sync {
    /// Fetch the most recent `last_n` readings of `attribute`, oldest first.
    ///
    /// Implementations swallow transport and decoding failures: they log them and
    /// return an empty list so a bad cycle is simply skipped.
    async fn fetch(&self, attribute: Attribute, last_n: u32) -> Vec<Reading>;
}
