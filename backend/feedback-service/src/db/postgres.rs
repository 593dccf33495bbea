use super::FeedbackRepository;
use crate::error::{FeedbackError, Result};
use crate::models::{EmailSubscriber, SavedMessage, UserMessage};
use async_trait::async_trait;
use sqlx::PgPool;

pub const DUPLICATE_SUBSCRIBER: &str = "subscriber already exists";

/// Postgres-backed [`FeedbackRepository`]
#[derive(Clone)]
pub struct PgFeedbackRepository {
    pool: PgPool,
}

impl PgFeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepository for PgFeedbackRepository {
    async fn save_message(&self, name: &str, email: &str, message: &str) -> Result<SavedMessage> {
        let mut tx = self.pool.begin().await?;

        let saved = sqlx::query_as::<_, UserMessage>(
            r#"
            INSERT INTO user_messages (name, email, message)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, message, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(message)
        .fetch_one(&mut *tx)
        .await?;

        let subscribed = sqlx::query(
            r#"
            INSERT INTO email_subscribers (email)
            VALUES ($1)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(email)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let new_subscriber = subscribed.rows_affected() > 0;
        tracing::info!(
            message_id = saved.id,
            new_subscriber = new_subscriber,
            "User message saved"
        );

        Ok(SavedMessage {
            message: saved,
            new_subscriber,
        })
    }

    async fn save_subscriber(&self, email: &str) -> Result<EmailSubscriber> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM email_subscribers WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        if exists {
            return Err(FeedbackError::Conflict(DUPLICATE_SUBSCRIBER.to_string()));
        }

        // A concurrent insert between the check and here surfaces as no row
        let subscriber = sqlx::query_as::<_, EmailSubscriber>(
            r#"
            INSERT INTO email_subscribers (email)
            VALUES ($1)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, subscribed_at
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| FeedbackError::Conflict(DUPLICATE_SUBSCRIBER.to_string()))?;

        tracing::info!(subscriber_id = subscriber.id, "Email subscriber saved");

        Ok(subscriber)
    }

    async fn list_messages(&self) -> Result<Vec<UserMessage>> {
        let messages = sqlx::query_as::<_, UserMessage>(
            r#"
            SELECT id, name, email, message, created_at
            FROM user_messages
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn get_message(&self, id: i32) -> Result<Option<UserMessage>> {
        let message = sqlx::query_as::<_, UserMessage>(
            r#"
            SELECT id, name, email, message, created_at
            FROM user_messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    async fn list_subscribers(&self) -> Result<Vec<EmailSubscriber>> {
        let subscribers = sqlx::query_as::<_, EmailSubscriber>(
            r#"
            SELECT id, email, subscribed_at
            FROM email_subscribers
            ORDER BY subscribed_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subscribers)
    }

    async fn get_subscriber(&self, id: i32) -> Result<Option<EmailSubscriber>> {
        let subscriber = sqlx::query_as::<_, EmailSubscriber>(
            r#"
            SELECT id, email, subscribed_at
            FROM email_subscribers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscriber)
    }

    async fn ping(&self) -> Result<()> {
        db_pool::ping(&self.pool).await?;
        Ok(())
    }
}
