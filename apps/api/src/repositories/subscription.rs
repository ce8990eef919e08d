//! Subscription edge repository
//!
//! Edges live in subscribers_on_authors with a composite primary key on
//! (subscriber_id, author_id).

use sqlx::PgPool;
use uuid::Uuid;

use super::utils::SUBSCRIPTION_COLUMNS;
use crate::models::Subscription;

/// Repository for subscription edges
#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new SubscriptionRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Edges whose subscriber is one of `subscriber_ids`
    pub async fn find_by_subscriber_ids(
        &self,
        subscriber_ids: &[Uuid],
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM subscribers_on_authors WHERE subscriber_id = ANY($1)",
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query_as::<_, Subscription>(&sql)
            .bind(subscriber_ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Edges whose author is one of `author_ids`
    pub async fn find_by_author_ids(
        &self,
        author_ids: &[Uuid],
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM subscribers_on_authors WHERE author_id = ANY($1)",
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query_as::<_, Subscription>(&sql)
            .bind(author_ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Every edge in the table
    pub async fn find_all(&self) -> Result<Vec<Subscription>, sqlx::Error> {
        let sql = format!("SELECT {} FROM subscribers_on_authors", SUBSCRIPTION_COLUMNS);
        sqlx::query_as::<_, Subscription>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    /// Insert an edge
    pub async fn create(&self, edge: Subscription) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO subscribers_on_authors (subscriber_id, author_id) VALUES ($1, $2)")
            .bind(edge.subscriber_id)
            .bind(edge.author_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete an edge, returning whether a row was removed
    pub async fn delete(&self, edge: Subscription) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM subscribers_on_authors WHERE subscriber_id = $1 AND author_id = $2",
        )
        .bind(edge.subscriber_id)
        .bind(edge.author_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
