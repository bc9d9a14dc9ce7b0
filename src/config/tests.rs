use super::*;

fn defaults() -> Settings {
    Settings::from_raw(RawSettings::default()).expect("defaults resolve")
}

#[test]
fn defaults_resolve() {
    let settings = defaults();

    assert_eq!(settings.server.public_addr.port(), 3000);
    assert!(settings.server.public_addr.ip().is_loopback());
    assert!(settings.database.url.is_none());
    assert_eq!(settings.database.max_connections.get(), 8);
    assert_eq!(settings.redis.url, "redis://127.0.0.1:6379");
    assert_eq!(settings.cache.tip_limit, 256);
    assert_eq!(settings.scheduler.cadence_seconds, 3);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn serve_overrides_take_precedence() {
    let mut raw = RawSettings::default();
    raw.apply_serve_overrides(&ServeOverrides {
        server_host: Some("0.0.0.0".to_string()),
        public_port: Some(8080),
        log_json: Some(true),
        database_url: Some("postgres://db/consiglio".to_string()),
        scheduler_cadence_seconds: Some(10),
        ..ServeOverrides::default()
    });

    let settings = Settings::from_raw(raw).expect("overridden settings resolve");

    assert_eq!(settings.server.public_addr.to_string(), "0.0.0.0:8080");
    assert!(matches!(settings.logging.format, LogFormat::Json));
    assert_eq!(
        settings.database.url.as_deref(),
        Some("postgres://db/consiglio")
    );
    assert_eq!(settings.scheduler.cadence_seconds, 10);
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.public_port = Some(0);

    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, .. }) => assert_eq!(key, "server.public_port"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn blank_database_url_collapses_to_none() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());

    let settings = Settings::from_raw(raw).expect("settings resolve");
    assert!(settings.database.url.is_none());
}

#[test]
fn cadence_must_divide_a_minute() {
    for cadence in [0, 7, 60, 61] {
        let mut raw = RawSettings::default();
        raw.scheduler.cadence_seconds = Some(cadence);

        match Settings::from_raw(raw) {
            Err(LoadError::Invalid { key, .. }) => {
                assert_eq!(key, "scheduler.cadence_seconds");
            }
            other => panic!("cadence {cadence} unexpectedly resolved: {other:?}"),
        }
    }

    for cadence in [1, 3, 15, 30] {
        let mut raw = RawSettings::default();
        raw.scheduler.cadence_seconds = Some(cadence);
        assert!(Settings::from_raw(raw).is_ok(), "cadence {cadence} resolves");
    }
}

#[test]
fn zero_cache_limit_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.tip_limit = Some(0);

    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, .. }) => assert_eq!(key, "cache.tip_limit"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());

    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, .. }) => assert_eq!(key, "logging.level"),
        other => panic!("unexpected result: {other:?}"),
    }
}
