//! Redis-backed draft store.
//!
//! Each draft lives in a hash at `draft:{id}`; identities come from the
//! `draft:seq` counter and the `draft:ids` set indexes live records so
//! listing never scans the keyspace.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use uuid::Uuid;

use crate::{
    application::repos::{DraftsRepo, RepoError, UpsertDraftParams},
    domain::entities::DraftRecord,
};

const SEQ_KEY: &str = "draft:seq";
const IDS_KEY: &str = "draft:ids";

#[derive(Clone)]
pub struct RedisDrafts {
    manager: ConnectionManager,
}

impl RedisDrafts {
    pub async fn connect(url: &str) -> Result<Self, redis::RedisError> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(500));

        let client = Client::open(url)?;
        let manager = client.get_connection_manager_with_config(config).await?;

        Ok(Self { manager })
    }
}

fn draft_key(id: i64) -> String {
    format!("draft:{id}")
}

fn map_redis_error(err: redis::RedisError) -> RepoError {
    if err.is_timeout() {
        RepoError::Timeout
    } else {
        RepoError::from_persistence(err)
    }
}

fn parse_draft(id: i64, fields: &HashMap<String, String>) -> Result<DraftRecord, RepoError> {
    let message = fields
        .get("message")
        .cloned()
        .ok_or_else(|| RepoError::from_persistence(format!("draft {id} has no message field")))?;
    let session_id = fields
        .get("session_id")
        .ok_or_else(|| RepoError::from_persistence(format!("draft {id} has no session_id field")))?;
    let session_id = Uuid::parse_str(session_id).map_err(|err| {
        RepoError::from_persistence(format!("draft {id} has a malformed session_id: {err}"))
    })?;

    Ok(DraftRecord {
        id,
        message,
        session_id,
    })
}

#[async_trait]
impl DraftsRepo for RedisDrafts {
    async fn upsert(&self, params: UpsertDraftParams) -> Result<DraftRecord, RepoError> {
        let mut con = self.manager.clone();

        let id = match params.id {
            Some(id) => id,
            None => {
                let id: i64 = con.incr(SEQ_KEY, 1).await.map_err(map_redis_error)?;
                id
            }
        };

        let session = params.session_id.to_string();
        let _: () = redis::pipe()
            .atomic()
            .hset_multiple(
                draft_key(id),
                &[
                    ("message", params.message.as_str()),
                    ("session_id", session.as_str()),
                ],
            )
            .ignore()
            .sadd(IDS_KEY, id)
            .ignore()
            .query_async(&mut con)
            .await
            .map_err(map_redis_error)?;

        Ok(DraftRecord {
            id,
            message: params.message,
            session_id: params.session_id,
        })
    }

    async fn list_all(&self) -> Result<Vec<DraftRecord>, RepoError> {
        let mut con = self.manager.clone();

        let mut ids: Vec<i64> = con.smembers(IDS_KEY).await.map_err(map_redis_error)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        ids.sort_unstable();

        let mut pipe = redis::pipe();
        for id in &ids {
            pipe.hgetall(draft_key(*id));
        }
        let rows: Vec<HashMap<String, String>> =
            pipe.query_async(&mut con).await.map_err(map_redis_error)?;

        let mut drafts = Vec::with_capacity(rows.len());
        for (id, fields) in ids.into_iter().zip(rows) {
            if fields.is_empty() {
                // Index entry outlived its hash; skip it rather than fail
                // the whole listing.
                continue;
            }
            drafts.push(parse_draft(id, &fields)?);
        }

        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(message: &str, session_id: &str) -> HashMap<String, String> {
        HashMap::from([
            ("message".to_string(), message.to_string()),
            ("session_id".to_string(), session_id.to_string()),
        ])
    }

    #[test]
    fn parse_draft_roundtrips_fields() {
        let session = Uuid::new_v4();
        let draft =
            parse_draft(7, &fields("unsaved", &session.to_string())).expect("well-formed hash");

        assert_eq!(draft.id, 7);
        assert_eq!(draft.message, "unsaved");
        assert_eq!(draft.session_id, session);
    }

    #[test]
    fn parse_draft_rejects_missing_fields() {
        let mut incomplete = fields("unsaved", &Uuid::new_v4().to_string());
        incomplete.remove("session_id");

        assert!(parse_draft(7, &incomplete).is_err());
    }

    #[test]
    fn parse_draft_rejects_malformed_session_id() {
        assert!(parse_draft(7, &fields("unsaved", "not-a-uuid")).is_err());
    }
}
