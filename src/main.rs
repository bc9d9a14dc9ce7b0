use std::{process, sync::Arc};

use apalis::{
    layers::WorkerBuilderExt,
    prelude::{Monitor, WorkerBuilder, WorkerFactoryFn},
};
use apalis_cron::CronStream;
use consiglio::{
    application::{
        drafts::DraftService,
        error::AppError,
        jobs::{SampleTipContext, process_sample_tip_job, sample_tip_schedule},
        repos::{DraftsRepo, TipsRepo},
        tips::TipService,
    },
    cache::{CacheConfig, DraftCache, TipCache},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        kv::RedisDrafts,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    run_serve(settings).await
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let drafts_store = RedisDrafts::connect(&settings.redis.url)
        .await
        .map_err(|err| AppError::from(InfraError::key_value(err.to_string())))?;

    let cache_config = CacheConfig::from(&settings.cache);
    let tip_cache = Arc::new(TipCache::new(&cache_config));
    let draft_cache = Arc::new(DraftCache::new());

    let tips_repo: Arc<dyn TipsRepo> = repositories.clone();
    let drafts_repo: Arc<dyn DraftsRepo> = Arc::new(drafts_store);

    let tips = Arc::new(TipService::new(tips_repo, tip_cache));
    let drafts = Arc::new(DraftService::new(drafts_repo, draft_cache));

    let monitor_handle = spawn_sampling_monitor(tips.clone(), &settings.scheduler);

    let state = ApiState {
        tips,
        drafts,
        db: repositories,
    };

    let result = serve_http(&settings, state).await;

    monitor_handle.abort();
    let _ = monitor_handle.await;

    result
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn spawn_sampling_monitor(
    tips: Arc<TipService>,
    scheduler: &config::SchedulerSettings,
) -> tokio::task::JoinHandle<()> {
    let context = SampleTipContext { tips };
    let schedule = sample_tip_schedule(scheduler.cadence_seconds);

    let worker = WorkerBuilder::new("sample-tip-worker")
        .data(context)
        .backend(CronStream::new(schedule))
        .build_fn(process_sample_tip_job);

    let monitor = Monitor::new().register(worker);

    tokio::spawn(async move {
        if let Err(err) = monitor.run().await {
            error!(error = %err, "sampling monitor stopped");
        }
    })
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "consiglio::http",
        addr = %settings.server.public_addr,
        "Listening"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
