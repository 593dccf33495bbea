//! Storage for messages and subscribers

mod postgres;

pub use postgres::PgFeedbackRepository;

use crate::error::Result;
use crate::models::{EmailSubscriber, SavedMessage, UserMessage};
use async_trait::async_trait;

/// Message and subscriber persistence
///
/// Lookups return `Ok(None)` for a missing id; only storage failures are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Insert a message and subscribe its sender in one transaction.
    ///
    /// An already subscribed email is left untouched.
    async fn save_message(&self, name: &str, email: &str, message: &str) -> Result<SavedMessage>;

    /// Subscribe an email, failing with `Conflict` when it is already present.
    async fn save_subscriber(&self, email: &str) -> Result<EmailSubscriber>;

    /// All messages, newest first
    async fn list_messages(&self) -> Result<Vec<UserMessage>>;

    async fn get_message(&self, id: i32) -> Result<Option<UserMessage>>;

    /// All subscribers, newest first
    async fn list_subscribers(&self) -> Result<Vec<EmailSubscriber>>;

    async fn get_subscriber(&self, id: i32) -> Result<Option<EmailSubscriber>>;

    async fn ping(&self) -> Result<()>;
}
