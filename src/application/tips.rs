//! Tip CRUD and random sampling over the durable store.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{CreateTipParams, RepoError, TipsRepo, UpdateTipParams};
use crate::cache::TipCache;
use crate::domain::entities::TipRecord;

#[derive(Debug, Error)]
pub enum TipError {
    #[error("tip not found")]
    NotFound,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for TipError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => TipError::NotFound,
            other => TipError::Repo(other),
        }
    }
}

/// Orchestrates tip reads and writes.
///
/// Reads go through [`TipCache`]; every write path evicts the affected
/// cache entries before the call returns, so a caller that observed the
/// write acknowledged never reads a pre-write cached value for that key.
#[derive(Clone)]
pub struct TipService {
    repo: Arc<dyn TipsRepo>,
    cache: Arc<TipCache>,
}

impl TipService {
    pub fn new(repo: Arc<dyn TipsRepo>, cache: Arc<TipCache>) -> Self {
        Self { repo, cache }
    }

    /// Sample one tip at random via the store's native sampling.
    ///
    /// Logs the sampled id and message; the cron worker relies on that log
    /// line as its only observable effect.
    pub async fn find_random_tip(&self) -> Result<TipRecord, TipError> {
        let tip = self.repo.find_random().await?.ok_or(TipError::NotFound)?;
        info!(id = tip.id, message = %tip.message, "Sampled tip");
        Ok(tip)
    }

    pub async fn get_all_tips(&self) -> Result<Vec<TipRecord>, TipError> {
        if let Some(tips) = self.cache.get_all() {
            return Ok(tips);
        }
        let tips = self.repo.list_all().await?;
        self.cache.set_all(tips.clone());
        Ok(tips)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<TipRecord, TipError> {
        if let Some(tip) = self.cache.get(id) {
            return Ok(tip);
        }
        let tip = self.repo.find_by_id(id).await?.ok_or(TipError::NotFound)?;
        self.cache.set(tip.clone());
        Ok(tip)
    }

    /// Store a new tip; identity always comes from the store.
    pub async fn insert(&self, params: CreateTipParams) -> Result<TipRecord, TipError> {
        let tip = self.repo.insert(params).await?;
        self.cache.invalidate(tip.id);
        self.cache.invalidate_all();
        Ok(tip)
    }

    /// Full replace of an existing tip.
    ///
    /// Existence is resolved against the store before the write, so an
    /// update to a missing id fails with [`TipError::NotFound`] and never
    /// creates a record.
    pub async fn update(&self, params: UpdateTipParams) -> Result<TipRecord, TipError> {
        if self.repo.find_by_id(params.id).await?.is_none() {
            return Err(TipError::NotFound);
        }
        let tip = self.repo.update(params).await?;
        self.cache.invalidate(tip.id);
        self.cache.invalidate_all();
        Ok(tip)
    }

    pub async fn delete(&self, id: i64) -> Result<(), TipError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(TipError::NotFound);
        }
        self.repo.delete(id).await?;
        self.cache.invalidate(id);
        self.cache.invalidate_all();
        Ok(())
    }
}
