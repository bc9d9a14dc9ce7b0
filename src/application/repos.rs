//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{DraftRecord, TipRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("store timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateTipParams {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct UpdateTipParams {
    pub id: i64,
    pub message: String,
}

/// Typed access to durable tip records.
#[async_trait]
pub trait TipsRepo: Send + Sync {
    /// Sample one row uniformly at random at the storage layer.
    async fn find_random(&self) -> Result<Option<TipRecord>, RepoError>;

    /// All tips in store-native order.
    async fn list_all(&self) -> Result<Vec<TipRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<TipRecord>, RepoError>;

    async fn insert(&self, params: CreateTipParams) -> Result<TipRecord, RepoError>;

    /// Full replace of an existing row; `NotFound` when the id is absent.
    async fn update(&self, params: UpdateTipParams) -> Result<TipRecord, RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct UpsertDraftParams {
    pub id: Option<i64>,
    pub message: String,
    pub session_id: Uuid,
}

/// Typed access to ephemeral draft records in the fast store.
#[async_trait]
pub trait DraftsRepo: Send + Sync {
    /// Write a draft, allocating a fresh identity when `id` is absent.
    async fn upsert(&self, params: UpsertDraftParams) -> Result<DraftRecord, RepoError>;

    async fn list_all(&self) -> Result<Vec<DraftRecord>, RepoError>;
}
