//! Session-scoped draft tips over the fast store.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{DraftsRepo, RepoError, UpsertDraftParams};
use crate::cache::DraftCache;
use crate::domain::entities::DraftRecord;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Orchestrates draft upsert and list-by-session.
///
/// The cache holds the full draft collection in a single slot, so the
/// post-cache session filter is always correct; upserts drop the slot
/// before returning.
#[derive(Clone)]
pub struct DraftService {
    repo: Arc<dyn DraftsRepo>,
    cache: Arc<DraftCache>,
}

impl DraftService {
    pub fn new(repo: Arc<dyn DraftsRepo>, cache: Arc<DraftCache>) -> Self {
        Self { repo, cache }
    }

    /// Unconditional write-through; a missing id allocates a fresh one in
    /// the store.
    pub async fn upsert(&self, params: UpsertDraftParams) -> Result<DraftRecord, DraftError> {
        let draft = self.repo.upsert(params).await?;
        self.cache.invalidate();
        Ok(draft)
    }

    /// All drafts belonging to `session_id`, filtered after the cache
    /// boundary.
    pub async fn get_all(&self, session_id: Uuid) -> Result<Vec<DraftRecord>, DraftError> {
        let drafts = match self.cache.get_all() {
            Some(drafts) => drafts,
            None => {
                let drafts = self.repo.list_all().await?;
                self.cache.set_all(drafts.clone());
                drafts
            }
        };

        Ok(drafts
            .into_iter()
            .filter(|draft| draft.session_id == session_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryDraftsRepo {
        rows: Mutex<Vec<DraftRecord>>,
        next_id: Mutex<i64>,
    }

    #[async_trait]
    impl DraftsRepo for MemoryDraftsRepo {
        async fn upsert(&self, params: UpsertDraftParams) -> Result<DraftRecord, RepoError> {
            let id = match params.id {
                Some(id) => id,
                None => {
                    let mut next_id = self.next_id.lock().unwrap();
                    *next_id += 1;
                    *next_id
                }
            };
            let draft = DraftRecord {
                id,
                message: params.message,
                session_id: params.session_id,
            };
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|row| row.id == id) {
                Some(row) => *row = draft.clone(),
                None => rows.push(draft.clone()),
            }
            Ok(draft)
        }

        async fn list_all(&self) -> Result<Vec<DraftRecord>, RepoError> {
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    fn service() -> DraftService {
        DraftService::new(
            Arc::new(MemoryDraftsRepo::default()),
            Arc::new(DraftCache::new()),
        )
    }

    #[tokio::test]
    async fn upsert_allocates_identity_when_missing() {
        let service = service();
        let session = Uuid::new_v4();

        let draft = service
            .upsert(UpsertDraftParams {
                id: None,
                message: "unsaved thought".into(),
                session_id: session,
            })
            .await
            .expect("upsert succeeds");

        assert_eq!(draft.id, 1);
        assert_eq!(draft.session_id, session);
    }

    #[tokio::test]
    async fn upsert_overwrites_an_existing_draft() {
        let service = service();
        let session = Uuid::new_v4();

        let draft = service
            .upsert(UpsertDraftParams {
                id: None,
                message: "first".into(),
                session_id: session,
            })
            .await
            .unwrap();

        service
            .upsert(UpsertDraftParams {
                id: Some(draft.id),
                message: "second".into(),
                session_id: session,
            })
            .await
            .unwrap();

        let drafts = service.get_all(session).await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].message, "second");
    }

    #[tokio::test]
    async fn get_all_never_leaks_other_sessions() {
        let service = service();
        let mine = Uuid::new_v4();
        let theirs = Uuid::new_v4();

        for (session, message) in [(mine, "a"), (theirs, "b"), (mine, "c")] {
            service
                .upsert(UpsertDraftParams {
                    id: None,
                    message: message.into(),
                    session_id: session,
                })
                .await
                .unwrap();
        }

        let drafts = service.get_all(mine).await.unwrap();
        assert_eq!(drafts.len(), 2);
        assert!(drafts.iter().all(|draft| draft.session_id == mine));
    }

    #[tokio::test]
    async fn upsert_evicts_the_cached_collection() {
        let service = service();
        let session = Uuid::new_v4();

        // Prime the cache with the empty collection.
        assert!(service.get_all(session).await.unwrap().is_empty());

        service
            .upsert(UpsertDraftParams {
                id: None,
                message: "fresh".into(),
                session_id: session,
            })
            .await
            .unwrap();

        let drafts = service.get_all(session).await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].message, "fresh");
    }
}
