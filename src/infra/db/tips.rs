use async_trait::async_trait;

use crate::{
    application::repos::{CreateTipParams, RepoError, TipsRepo, UpdateTipParams},
    domain::entities::TipRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct TipRow {
    id: i64,
    message: String,
}

impl From<TipRow> for TipRecord {
    fn from(row: TipRow) -> Self {
        Self {
            id: row.id,
            message: row.message,
        }
    }
}

#[async_trait]
impl TipsRepo for PostgresRepositories {
    async fn find_random(&self) -> Result<Option<TipRecord>, RepoError> {
        // Storage-native sampling; the service never shuffles rows itself.
        let row = sqlx::query_as::<_, TipRow>(
            "SELECT id, message FROM tips ORDER BY random() LIMIT 1",
        )
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(TipRecord::from))
    }

    async fn list_all(&self) -> Result<Vec<TipRecord>, RepoError> {
        let rows = sqlx::query_as::<_, TipRow>("SELECT id, message FROM tips")
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(TipRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TipRecord>, RepoError> {
        let row = sqlx::query_as::<_, TipRow>("SELECT id, message FROM tips WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(TipRecord::from))
    }

    async fn insert(&self, params: CreateTipParams) -> Result<TipRecord, RepoError> {
        let row = sqlx::query_as::<_, TipRow>(
            "INSERT INTO tips (message) VALUES ($1) RETURNING id, message",
        )
        .bind(params.message)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(TipRecord::from(row))
    }

    async fn update(&self, params: UpdateTipParams) -> Result<TipRecord, RepoError> {
        let row = sqlx::query_as::<_, TipRow>(
            "UPDATE tips SET message = $2 WHERE id = $1 RETURNING id, message",
        )
        .bind(params.id)
        .bind(params.message)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(TipRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM tips WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
