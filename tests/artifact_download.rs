// Artifact fetching and loading tests

use rent_predictor::config::ArtifactSettings;
use rent_predictor::core::RentPredictor;
use rent_predictor::models::RentInput;
use rent_predictor::services::{load_artifacts, ArtifactError, ArtifactFetcher};
use std::time::Duration;

const FEATURES: &str = r#"["bedrooms", "bathrooms", "floor_area", "lat", "lng", "price", "region_Lagos"]"#;
const SCALER: &str = r#"{"mean": [0, 0, 0, 0, 0, 0], "scale": [1, 1, 1, 1, 1, 1]}"#;
const MODEL: &str = r#"{"kind": "linear", "coefficients": [10, 5, 1, 0, 0, 100], "intercept": 50}"#;

fn fetcher() -> ArtifactFetcher {
    ArtifactFetcher::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_downloads_missing_artifact() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/model.json")
        .with_status(200)
        .with_body(MODEL)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("model.json");
    let url = format!("{}/model.json", server.url());

    fetcher().ensure(&path, Some(&url)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(std::fs::read_to_string(&path).unwrap(), MODEL);
}

#[tokio::test]
async fn test_existing_artifact_not_downloaded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/model.json")
        .with_status(200)
        .with_body(MODEL)
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, "local copy").unwrap();
    let url = format!("{}/model.json", server.url());

    fetcher().ensure(&path, Some(&url)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "local copy");
}

#[tokio::test]
async fn test_large_artifact_streamed_intact() {
    let body: Vec<u8> = (0..2 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/model.bin")
        .with_status(200)
        .with_body(body.clone())
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    let url = format!("{}/model.bin", server.url());

    fetcher().ensure(&path, Some(&url)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(std::fs::read(&path).unwrap(), body);
    assert!(!path.with_extension("part").exists());
}

#[tokio::test]
async fn test_download_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/model.json")
        .with_status(404)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let url = format!("{}/model.json", server.url());

    let err = fetcher().ensure(&path, Some(&url)).await.unwrap_err();

    assert!(matches!(err, ArtifactError::DownloadStatus { status: 404, .. }));
    assert!(!path.exists());
    assert!(!path.with_extension("part").exists());
}

#[tokio::test]
async fn test_missing_without_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scaler.json");

    let err = fetcher().ensure(&path, None).await.unwrap_err();
    assert!(matches!(err, ArtifactError::Missing(_)));
}

#[tokio::test]
async fn test_fetch_load_and_predict() {
    let mut server = mockito::Server::new_async().await;
    let _model = server
        .mock("GET", "/model.json")
        .with_body(MODEL)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("feature_names.json"), FEATURES).unwrap();
    std::fs::write(dir.path().join("scaler.json"), SCALER).unwrap();

    let settings = ArtifactSettings {
        model_path: dir.path().join("model.json"),
        scaler_path: dir.path().join("scaler.json"),
        feature_names_path: dir.path().join("feature_names.json"),
        model_url: Some(format!("{}/model.json", server.url())),
        ..ArtifactSettings::default()
    };

    fetcher().ensure_all(&settings).await.unwrap();
    let artifacts = load_artifacts(&settings).unwrap();
    assert_eq!(artifacts.schema.len(), 6);

    let predictor = RentPredictor::new(artifacts.schema, artifacts.scaler, artifacts.model);
    let input: RentInput = serde_json::from_value(serde_json::json!({
        "bedrooms": 2, "bathrooms": 1, "floor_area": 100,
        "lat": 0, "lng": 0,
        "category": "home", "condition": "new",
        "is_furnished": "No", "parking_space": "No",
        "amenities": "none", "region": "Lagos", "locality": "Ikeja"
    }))
    .unwrap();

    // 50 + 20 + 5 + 100 + 100
    assert_eq!(predictor.predict(&input).unwrap(), 275.0);
}
