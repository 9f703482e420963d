/// Integration tests with a mocked scoring API
/// Tests the scoring client and the full dashboard workflow without hitting the deployed API
use credit_risk_dashboard::dashboard::{build_view, DashboardQuery, Section};
use credit_risk_dashboard::errors::AppError;
use credit_risk_dashboard::gauge::{Decision, RiskBand};
use credit_risk_dashboard::models::{ApplicantId, Feature};
use credit_risk_dashboard::reference::ReferenceTable;
use credit_risk_dashboard::scoring_client::ScoringClient;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create a client pointing at the mock server
fn create_test_client(server: &MockServer) -> ScoringClient {
    ScoringClient::new(server.uri()).unwrap()
}

fn reference() -> ReferenceTable {
    ReferenceTable::from_ids([100002, 100003])
}

fn run_query(id: &str, feature: Option<&str>) -> DashboardQuery {
    DashboardQuery {
        sk_id_curr: Some(id.to_string()),
        feature: feature.map(str::to_string),
        run: Some("1".to_string()),
    }
}

async fn mount_profile(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_distribution(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/distribution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_predict_sends_identifier_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(serde_json::json!({"SK_ID_CURR": 100002})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"probability": 12.5})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let response = client.predict(ApplicantId(100002)).await.unwrap();

    assert_eq!(response.probability, 12.5);
}

#[tokio::test]
async fn test_predict_non_200_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Client not found"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.predict(ApplicantId(100002)).await.unwrap_err();

    assert_eq!(
        err,
        AppError::UpstreamStatus {
            endpoint: "/predict",
            status: 404
        }
    );
}

#[tokio::test]
async fn test_other_success_codes_are_not_accepted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.info(ApplicantId(100002)).await.unwrap_err();

    assert!(matches!(err, AppError::UpstreamStatus { status: 201, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.predict(ApplicantId(100002)).await.unwrap_err();

    assert!(matches!(err, AppError::Decode(_)));
}

#[tokio::test]
async fn test_distribution_sends_feature_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/distribution"))
        .and(body_json(
            serde_json::json!({"SK_ID_CURR": 100003, "feature": "DAYS_BIRTH"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "client_value": -12005,
            "distribution": [-9461, -16765, -19046, -12005]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let response = client
        .distribution(ApplicantId(100003), Feature::DaysBirth)
        .await
        .unwrap();

    assert_eq!(response.client_value, Some(-12005.0));
    assert_eq!(response.distribution.len(), 4);
}

#[tokio::test]
async fn test_unreachable_api_is_transport_error() {
    let client = ScoringClient::new("http://127.0.0.1:1".to_string()).unwrap();
    let err = client.predict(ApplicantId(100002)).await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
}

#[tokio::test]
async fn test_high_risk_applicant_is_refused() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"probability": 65})),
        )
        .mount(&mock_server)
        .await;
    mount_profile(&mock_server, serde_json::json!({"Date_Naissance": 2})).await;
    mount_distribution(
        &mock_server,
        serde_json::json!({"client_value": 0.3, "distribution": [0.1, 0.2, 0.3]}),
    )
    .await;

    let client = create_test_client(&mock_server);
    let view = build_view(&reference(), &client, &run_query("100002", None)).await;

    let prediction = view.prediction.ready().expect("prediction rendered");
    assert_eq!(prediction.gauge.band, RiskBand::High);
    assert_eq!(prediction.gauge.number_color(), "red");
    assert_eq!(prediction.decision, Decision::NotGranted);
    assert_eq!(prediction.decision.color(), "red");
}

#[tokio::test]
async fn test_missing_income_renders_placeholder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"probability": 20.0})),
        )
        .mount(&mock_server)
        .await;
    mount_profile(
        &mock_server,
        serde_json::json!({
            "Date_Naissance": 25569,
            "Emploi_Depuis": 36526,
            "NAME_FAMILY_STATUS_Married": 1,
            "NAME_EDUCATION_TYPE_Highereducation": 0
        }),
    )
    .await;
    mount_distribution(
        &mock_server,
        serde_json::json!({"client_value": 0.3, "distribution": []}),
    )
    .await;

    let client = create_test_client(&mock_server);
    let view = build_view(&reference(), &client, &run_query("100002", None)).await;

    let profile = view.profile.ready().expect("profile rendered");
    assert_eq!(profile.get("Revenu par Personne"), Some("Non disponible"));
    assert_eq!(profile.get("Date de Naissance"), Some("01/01/1970"));
    assert_eq!(profile.get("Emploi Depuis"), Some("01/01/2000"));
    assert!(view.profile.error().is_none());
}

#[tokio::test]
async fn test_empty_population_still_draws_marker() {
    let mock_server = MockServer::start().await;

    mount_distribution(
        &mock_server,
        serde_json::json!({"client_value": 0.42, "distribution": []}),
    )
    .await;

    let client = create_test_client(&mock_server);
    let query = DashboardQuery {
        sk_id_curr: Some("100003".to_string()),
        feature: Some("EXT_SOURCE_3".to_string()),
        run: None,
    };
    let view = build_view(&reference(), &client, &query).await;

    assert_eq!(view.prediction, Section::NotRequested);
    let chart = view.distribution.ready().expect("chart rendered");
    assert_eq!(chart.feature, Feature::ExtSource3);
    assert!(chart.histogram.is_empty());
    assert_eq!(chart.client_value, Some(0.42));
    let svg = chart.to_svg().unwrap().to_lowercase();
    assert!(!svg.contains("#636efa"));
    assert!(svg.contains(r##"stroke="#ff0000""##));
}

#[tokio::test]
async fn test_null_population_values_are_dropped() {
    let mock_server = MockServer::start().await;

    mount_distribution(
        &mock_server,
        serde_json::json!({"client_value": 0.5, "distribution": [0.1, null, 0.9]}),
    )
    .await;

    let client = create_test_client(&mock_server);
    let query = DashboardQuery {
        sk_id_curr: Some("100002".to_string()),
        feature: Some("EXT_SOURCE_1".to_string()),
        run: None,
    };
    let view = build_view(&reference(), &client, &query).await;

    assert!(view.distribution.error().is_none());
    let chart = view.distribution.ready().expect("chart rendered");
    assert_eq!(chart.feature, Feature::ExtSource1);
    assert_eq!(chart.histogram.total(), 2);
    assert_eq!(chart.client_value, Some(0.5));
}

#[tokio::test]
async fn test_null_client_value_draws_population_only() {
    let mock_server = MockServer::start().await;

    mount_distribution(
        &mock_server,
        serde_json::json!({"client_value": null, "distribution": [0.1, 0.2, 0.9]}),
    )
    .await;

    let client = create_test_client(&mock_server);
    let query = DashboardQuery {
        sk_id_curr: Some("100002".to_string()),
        feature: Some("EXT_SOURCE_1".to_string()),
        run: None,
    };
    let view = build_view(&reference(), &client, &query).await;

    let chart = view.distribution.ready().expect("chart rendered");
    assert_eq!(chart.client_value, None);
    assert_eq!(chart.histogram.total(), 3);
    let svg = chart.to_svg().unwrap().to_lowercase();
    assert!(svg.contains("#636efa"));
    assert!(!svg.contains("#ff0000"));
}

#[tokio::test]
async fn test_failed_prediction_does_not_stop_other_steps() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_profile(&mock_server, serde_json::json!({"INCOME_PER_PERSON": 67500.0})).await;
    Mock::given(method("POST"))
        .and(path("/distribution"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let view = build_view(&reference(), &client, &run_query("100002", Some("AMT_ANNUITY"))).await;

    assert_eq!(
        view.prediction.error(),
        Some("Erreur lors de l'appel à l'API: 500")
    );
    assert_eq!(
        view.profile.ready().and_then(|p| p.get("Revenu par Personne")),
        Some("67500.0")
    );
    assert_eq!(
        view.distribution.error(),
        Some("Erreur lors de l'appel à l'API pour la distribution: 503")
    );
}

#[tokio::test]
async fn test_info_failure_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"probability": 40})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;
    mount_distribution(
        &mock_server,
        serde_json::json!({"client_value": 1.0, "distribution": [1.0]}),
    )
    .await;

    let client = create_test_client(&mock_server);
    let view = build_view(&reference(), &client, &run_query("100002", None)).await;

    let prediction = view.prediction.ready().expect("prediction rendered");
    assert_eq!(prediction.gauge.band, RiskBand::Medium);
    assert_eq!(prediction.decision, Decision::Granted);
    assert_eq!(
        view.profile.error(),
        Some("Erreur lors de l'appel à l'API pour les informations personnelles: 502")
    );
}

#[tokio::test]
async fn test_invalid_identifier_makes_no_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    for raw in ["", "abc", "999999"] {
        let view = build_view(&reference(), &client, &run_query(raw, None)).await;
        assert_eq!(
            view.prediction.error(),
            Some("Veuillez entrer un SK_ID_CURR valide.")
        );
        assert_eq!(view.profile, Section::NotRequested);
        assert_eq!(
            view.distribution.error(),
            Some("Veuillez entrer un SK_ID_CURR valide.")
        );
    }
}
