//! Cron job that samples a random tip on a fixed cadence.

use std::str::FromStr;
use std::sync::Arc;

use apalis::prelude::*;
use apalis_cron::Schedule;

use crate::application::tips::TipService;

/// Marker struct for the cron-triggered sampling job.
/// Must implement `From<chrono::DateTime<chrono::Utc>>` for apalis-cron compatibility.
#[derive(Default, Debug, Clone)]
pub struct SampleTipJob;

impl From<chrono::DateTime<chrono::Utc>> for SampleTipJob {
    fn from(_: chrono::DateTime<chrono::Utc>) -> Self {
        Self
    }
}

/// Context for the sampling job worker.
#[derive(Clone)]
pub struct SampleTipContext {
    pub tips: Arc<TipService>,
}

/// Process one tick: sample a tip and log it.
///
/// A failed tick (empty table, store unavailable) is reported and swallowed
/// so the schedule survives to the next tick.
pub async fn process_sample_tip_job(
    _job: SampleTipJob,
    ctx: Data<SampleTipContext>,
) -> Result<(), apalis::prelude::Error> {
    if let Err(err) = ctx.tips.find_random_tip().await {
        tracing::warn!(error = %err, "Tip sampling tick failed");
    }
    Ok(())
}

/// Create the sampling schedule from the configured cadence in seconds.
///
/// The cadence is validated at configuration load to divide a minute
/// evenly, so `*/N` fires with a uniform period.
pub fn sample_tip_schedule(cadence_seconds: u64) -> Schedule {
    Schedule::from_str(&format!("*/{cadence_seconds} * * * * *"))
        .expect("Invalid cron expression for sample_tip")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::application::repos::{CreateTipParams, RepoError, TipsRepo, UpdateTipParams};
    use crate::cache::{CacheConfig, TipCache};
    use crate::domain::entities::TipRecord;

    #[test]
    fn schedule_parses_correctly() {
        let schedule = sample_tip_schedule(3);
        let upcoming: Vec<_> = schedule.upcoming(chrono::Utc).take(3).collect();
        assert_eq!(upcoming.len(), 3);
    }

    struct EmptyTipsRepo;

    #[async_trait]
    impl TipsRepo for EmptyTipsRepo {
        async fn find_random(&self) -> Result<Option<TipRecord>, RepoError> {
            Ok(None)
        }

        async fn list_all(&self) -> Result<Vec<TipRecord>, RepoError> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, _id: i64) -> Result<Option<TipRecord>, RepoError> {
            Ok(None)
        }

        async fn insert(&self, _params: CreateTipParams) -> Result<TipRecord, RepoError> {
            unreachable!("not used in these tests")
        }

        async fn update(&self, _params: UpdateTipParams) -> Result<TipRecord, RepoError> {
            unreachable!("not used in these tests")
        }

        async fn delete(&self, _id: i64) -> Result<(), RepoError> {
            unreachable!("not used in these tests")
        }
    }

    #[tokio::test]
    async fn tick_against_an_empty_store_is_swallowed() {
        let tips = Arc::new(TipService::new(
            Arc::new(EmptyTipsRepo),
            Arc::new(TipCache::new(&CacheConfig::default())),
        ));
        let ctx = SampleTipContext { tips };

        process_sample_tip_job(SampleTipJob, Data::new(ctx.clone()))
            .await
            .expect("failed tick must not surface");

        // The schedule must survive a failed tick; a second tick also runs.
        process_sample_tip_job(SampleTipJob, Data::new(ctx))
            .await
            .expect("subsequent tick still runs");
    }
}
