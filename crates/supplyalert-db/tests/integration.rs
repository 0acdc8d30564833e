//! Offline unit tests for supplyalert-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use supplyalert_core::{AppConfig, Environment, OutputMode, RiskProfile};
use supplyalert_db::{NewRoute, PoolConfig, RouteRow, STATUS_ANALYZED};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        api_key_hash_salt: "salt".to_string(),
        search_api_key: "tvly".to_string(),
        search_base_url: "https://api.tavily.com".to_string(),
        model_api_key: "google".to_string(),
        model_base_url: "https://generativelanguage.googleapis.com".to_string(),
        model_name: "gemini-1.5-flash".to_string(),
        model_temperature: 0.7,
        model_max_output_tokens: 1000,
        output_mode: OutputMode::Delimited,
        risk_profile: RiskProfile::General,
        upstream_timeout_secs: 60,
        history_limit: 50,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`RouteRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn route_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = RouteRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        user_id: "user-hash".to_string(),
        origin: "Shanghai".to_string(),
        destination: "Le Havre".to_string(),
        cargo: Some("electronics".to_string()),
        ai_report: "Calm.\n\nVERDICT: go".to_string(),
        risk_score: 12_i16,
        status: STATUS_ANALYZED.to_string(),
        created_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.risk_score, 12);
    assert_eq!(row.status, "Analyzed");
    assert_eq!(row.cargo.as_deref(), Some("electronics"));
}

#[test]
fn new_route_borrows_caller_strings() {
    let report = String::from("Storm.\n\nVERDICT: wait");
    let route = NewRoute {
        user_id: "u",
        origin: "Busan",
        destination: "Long Beach",
        cargo: None,
        ai_report: &report,
        risk_score: 75,
        status: STATUS_ANALYZED,
    };
    assert_eq!(route.ai_report, "Storm.\n\nVERDICT: wait");
    assert!(route.cargo.is_none());
}
