mod common;

use common::mock_backend::{MockBackend, MockResponse};
use evcharge_client::api::endpoints::{GetDashboardData, GetUser, GetUsers};
use evcharge_client::api::{
    ApiError, ApiRequest, DashboardArgs, DashboardPeriod, Endpoint, UsersArgs,
};
use evcharge_client::cache::QueryStatus;
use evcharge_client::config::{ApiConfig, Config};
use evcharge_client::transport::{HttpTransport, Transport};
use evcharge_client::EvChargingApi;
use serde_json::json;

fn transport_for(base_url: &str) -> HttpTransport {
    HttpTransport::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 2,
        connect_timeout_seconds: 1,
    })
    .unwrap()
}

#[tokio::test]
async fn get_unwraps_envelope_and_sends_params() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::ok(json!({"totalStations": 7})))
        .await;
    let transport = transport_for(&backend.base_url());

    let request = ApiRequest::get("/dashboard").param("period", Some("day"));
    let data = transport
        .execute(request, Some("tok123".to_string()))
        .await
        .unwrap();
    assert_eq!(data, json!({"totalStations": 7}));

    let captured = backend.captured_requests().await;
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].method, "GET");
    assert_eq!(captured[0].path, "/api/dashboard");
    assert_eq!(captured[0].query.as_deref(), Some("period=day"));
    assert_eq!(captured[0].header("authorization"), Some("Bearer tok123"));
}

#[tokio::test]
async fn anonymous_requests_have_no_authorization_header() {
    let backend = MockBackend::start().await;
    backend.enqueue_response(MockResponse::ok(json!(null))).await;
    let transport = transport_for(&backend.base_url());

    transport
        .execute(ApiRequest::get("/dashboard/stats"), None)
        .await
        .unwrap();

    let captured = backend.captured_requests().await;
    assert!(captured[0].header("authorization").is_none());
}

#[tokio::test]
async fn user_id_cannot_rewrite_path_or_query() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::ok(json!({"id": "x", "email": "x@y.z", "name": "X"})))
        .await;
    let transport = transport_for(&backend.base_url());

    transport
        .execute(GetUser::request(&"u1/delete?force=1".to_string()), None)
        .await
        .unwrap();

    let captured = backend.captured_requests().await;
    assert_eq!(captured[0].path, "/api/users/u1%2Fdelete%3Fforce=1");
    assert!(captured[0].query.is_none());
}

#[tokio::test]
async fn non_2xx_becomes_server_error_with_payload() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error(500, "Database unavailable"))
        .await;
    let transport = transport_for(&backend.base_url());

    let err = transport
        .execute(ApiRequest::get("/dashboard"), None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Server {
            status: 500,
            payload: json!({"success": false, "message": "Database unavailable"})
        }
    );
}

#[tokio::test]
async fn non_envelope_body_is_validation_error() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::raw(200, r#"{"totalStations": 7}"#))
        .await;
    let transport = transport_for(&backend.base_url());

    let err = transport
        .execute(ApiRequest::get("/dashboard"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    // Bind and drop to get a port nobody listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let transport = transport_for(&format!("http://127.0.0.1:{}/api", port));

    let err = transport
        .execute(ApiRequest::get("/dashboard"), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "network_error");
}

#[tokio::test]
async fn slow_backend_times_out_as_network_error() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::ok(json!(null)).with_delay(3_000))
        .await;
    let transport = transport_for(&backend.base_url());

    let err = transport
        .execute(ApiRequest::get("/dashboard"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
}

#[tokio::test]
async fn login_and_query_end_to_end() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::ok(json!({
            "user": {"id": "u1", "email": "a@b.com", "name": "A", "role": "admin"},
            "token": "tok123"
        })))
        .await;
    backend
        .enqueue_response(MockResponse::ok(json!({
            "period": "month",
            "stats": {"totalStations": 40, "totalRevenue": 1250.5}
        })))
        .await;
    backend
        .enqueue_response(MockResponse::ok(json!({
            "users": [{"id": "u1", "email": "a@b.com", "name": "A"}],
            "total": 1,
            "page": 1,
            "limit": 20
        })))
        .await;

    let mut config = Config::default();
    config.api.base_url = backend.base_url();
    let api = EvChargingApi::connect(&config).unwrap();

    let user = api.login("a@b.com", "secret").await.unwrap();
    assert_eq!(user.role.as_deref(), Some("admin"));

    let dashboard = api
        .query::<GetDashboardData>(DashboardArgs::period(DashboardPeriod::Month))
        .unwrap();
    let result = dashboard.resolved().await;
    assert_eq!(result.status, QueryStatus::Success);
    let data = result.data.unwrap();
    assert_eq!(data.period, Some(DashboardPeriod::Month));
    assert_eq!(data.stats.total_stations, 40);

    let users = api
        .query::<GetUsers>(UsersArgs {
            page: Some(1),
            ..Default::default()
        })
        .unwrap();
    let result = users.resolved().await;
    assert_eq!(result.data.map(|l| l.total), Some(1));

    let captured = backend.captured_requests().await;
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[0].method, "POST");
    assert_eq!(captured[0].path, "/api/auth/login");
    assert_eq!(
        captured[0].json(),
        json!({"email": "a@b.com", "password": "secret"})
    );
    assert_eq!(captured[1].path, "/api/dashboard");
    assert_eq!(captured[1].query.as_deref(), Some("period=month"));
    assert_eq!(captured[1].header("authorization"), Some("Bearer tok123"));
    assert_eq!(captured[2].path, "/api/users");
    assert_eq!(captured[2].query.as_deref(), Some("page=1"));
}
