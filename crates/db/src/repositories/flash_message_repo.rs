//! Repository for the `flash_messages` table.

use roster_core::types::DbId;
use sqlx::PgPool;

use crate::models::flash_message::FlashMessage;

const COLUMNS: &str = "id, user_id, level, message, created_at";

pub struct FlashMessageRepo;

impl FlashMessageRepo {
    /// Queue a message for the user's next page view.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        level: &str,
        message: &str,
    ) -> Result<FlashMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO flash_messages (user_id, level, message)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FlashMessage>(&query)
            .bind(user_id)
            .bind(level)
            .bind(message)
            .fetch_one(pool)
            .await
    }

    /// Return and consume all pending messages for a user, oldest first.
    pub async fn take_pending(pool: &PgPool, user_id: DbId) -> Result<Vec<FlashMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE flash_messages SET consumed_at = NOW()
             WHERE user_id = $1 AND consumed_at IS NULL
             RETURNING {COLUMNS}"
        );
        let mut messages = sqlx::query_as::<_, FlashMessage>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        messages.sort_by_key(|m| m.id);
        Ok(messages)
    }
}
