//! HTTP tests for the web front-end, served on an ephemeral port.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use glaucolens_adapters::AssetStore;
use glaucolens_cli::server::{build_router, AppState};
use glaucolens_core::ScoreModel;
use glaucolens_test_support::{FailingScoreModel, MockScoreModel, SyntheticImageBuilder};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tempfile::TempDir;
use tokio::net::TcpListener;

const ASSET_NAMES: [&str; 5] = [
    "glaucoma-web.jpeg",
    "Normal.jpeg",
    "Mild.jpeg",
    "Medium.jpeg",
    "Severe.jpeg",
];

struct TestApp {
    base: String,
    client: reqwest::Client,
    _assets: TempDir,
}

impl TestApp {
    async fn spawn(model: Arc<dyn ScoreModel>) -> Self {
        Self::spawn_with_limit(model, 1024 * 1024).await
    }

    async fn spawn_with_limit(model: Arc<dyn ScoreModel>, max_upload_bytes: usize) -> Self {
        let assets = tempfile::tempdir().unwrap();
        for name in ASSET_NAMES {
            std::fs::write(assets.path().join(name), name.as_bytes()).unwrap();
        }

        let state = AppState::new(model, AssetStore::new(assets.path()))
            .with_max_upload_bytes(max_upload_bytes);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            _assets: assets,
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, String) {
        let resp = self
            .client
            .get(format!("{}{path}", self.base))
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.text().await.unwrap())
    }

    async fn upload(&self, form: Form) -> (StatusCode, String) {
        let resp = self
            .client
            .post(format!("{}/detection", self.base))
            .multipart(form)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.text().await.unwrap())
    }
}

fn file_form(name: &str, bytes: Vec<u8>) -> Form {
    Form::new().part("file", Part::bytes(bytes).file_name(name.to_string()))
}

fn fundus_png() -> Vec<u8> {
    SyntheticImageBuilder::png_bytes(&SyntheticImageBuilder::fundus(200, 150).image)
}

#[tokio::test]
async fn test_healthz() {
    let app = TestApp::spawn(MockScoreModel::healthy()).await;
    let (status, body) = app.get("/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_home_page_layout() {
    let app = TestApp::spawn(MockScoreModel::healthy()).await;
    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("GLAUCOLens"));
    assert!(body.contains("See the World Clearly, Detect Glaucoma Early"));
    assert!(body.contains("© 2024 GLAUCOLens. All Rights Reserved."));
    assert!(body.contains("/assets/glaucoma-web.jpeg"));
    assert!(body.contains("<option value=\"home\" selected>"));
}

#[tokio::test]
async fn test_unknown_page_falls_back_to_home() {
    let app = TestApp::spawn(MockScoreModel::healthy()).await;
    let (status, body) = app.get("/?page=admin").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("About GLAUCOLens"));
}

#[tokio::test]
async fn test_simulator_stage_boundaries() {
    let app = TestApp::spawn(MockScoreModel::healthy()).await;
    for (severity, asset, caption) in [
        (0, "Normal.jpeg", "Normal Vision"),
        (24, "Normal.jpeg", "Normal Vision"),
        (25, "Mild.jpeg", "Early Glaucoma"),
        (49, "Mild.jpeg", "Early Glaucoma"),
        (50, "Medium.jpeg", "Advanced Glaucoma"),
        (74, "Medium.jpeg", "Advanced Glaucoma"),
        (75, "Severe.jpeg", "Severe Glaucoma"),
        (100, "Severe.jpeg", "Severe Glaucoma"),
    ] {
        let (status, body) = app
            .get(&format!("/?page=simulator&severity={severity}"))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(
            body.contains(&format!("/assets/{asset}")),
            "severity {severity} should show {asset}"
        );
        assert!(body.contains(caption));
    }
}

#[tokio::test]
async fn test_simulator_default_severity() {
    let app = TestApp::spawn(MockScoreModel::healthy()).await;
    let (_, body) = app.get("/?page=simulator").await;
    assert!(body.contains("value=\"25\""));
    assert!(body.contains("/assets/Mild.jpeg"));
}

#[tokio::test]
async fn test_learn_risk_tiers() {
    let app = TestApp::spawn(MockScoreModel::healthy()).await;

    let (_, high) = app
        .get("/?page=learn&check=1&age=65&family_history=yes&diabetes=no&high_bp=no")
        .await;
    assert!(high.contains("High Risk: You should consult an eye specialist immediately."));

    let (_, low) = app.get("/?page=learn&check=1&age=30").await;
    assert!(low.contains("Low Risk: Keep up with routine eye check-ups."));

    let (_, moderate) = app.get("/?page=learn&check=1&age=65&diabetes=yes").await;
    assert!(moderate.contains("Moderate Risk: Consider scheduling an eye check-up soon."));
}

#[tokio::test]
async fn test_learn_without_check_shows_no_result() {
    let app = TestApp::spawn(MockScoreModel::healthy()).await;
    let (status, body) = app.get("/?page=learn&age=65&family_history=yes").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Are You at Risk?"));
    assert!(!body.contains("data-risk-tier"));
}

#[tokio::test]
async fn test_detection_prompt_before_upload() {
    let model = MockScoreModel::healthy();
    let app = TestApp::spawn(model.clone()).await;
    let (status, body) = app.get("/?page=detection").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Please upload an image to proceed."));
    assert!(body.contains("enctype=\"multipart/form-data\""));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_upload_healthy() {
    let model = MockScoreModel::healthy();
    let app = TestApp::spawn(model.clone()).await;
    let (status, body) = app.upload(file_form("fundus.png", fundus_png())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Image uploaded successfully!"));
    assert!(body.contains("Prediction: Your eye is healthy!"));
    assert!(body.contains("<img src=\"data:image/png;base64,"));
    assert!(body.contains("Uploaded Fundus Image"));

    let inputs = model.inputs();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].shape(), [1, 100, 100, 3]);
    assert!(inputs[0].as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
}

#[tokio::test]
async fn test_upload_extreme_aspect_ratio() {
    let model = MockScoreModel::healthy();
    let app = TestApp::spawn(model.clone()).await;
    let thin = SyntheticImageBuilder::png_bytes(&image::DynamicImage::new_rgb8(1, 60_000));
    assert!(thin.len() < 1024 * 1024);

    let (status, body) = app.upload(file_form("thin.png", thin)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("data-verdict=\"healthy\""));
    assert_eq!(model.inputs()[0].shape(), [1, 100, 100, 3]);
}

#[tokio::test]
async fn test_upload_suspected_jpeg() {
    let app = TestApp::spawn(MockScoreModel::suspected()).await;
    let jpeg = SyntheticImageBuilder::jpeg_bytes(&SyntheticImageBuilder::fundus(120, 120).image);
    let (status, body) = app.upload(file_form("fundus.JPG", jpeg)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(
        "Prediction: You are affected by Glaucoma. Please consult an ophthalmologist as soon as possible."
    ));
}

#[tokio::test]
async fn test_upload_exact_threshold_is_suspected() {
    let app = TestApp::spawn(MockScoreModel::new(0.5)).await;
    let (_, body) = app.upload(file_form("fundus.png", fundus_png())).await;
    assert!(body.contains("data-verdict=\"glaucoma_suspected\""));
}

#[tokio::test]
async fn test_upload_wrong_extension_is_rejected() {
    let model = MockScoreModel::healthy();
    let app = TestApp::spawn(model.clone()).await;
    let (status, body) = app
        .upload(file_form("notes.txt", b"hello".to_vec()))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("unsupported image"));
    assert!(!body.contains("Prediction:"));
    assert!(!body.contains("Uploaded Fundus Image"));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_upload_undecodable_image_is_rejected() {
    let app = TestApp::spawn(MockScoreModel::healthy()).await;
    let (status, body) = app
        .upload(file_form("fake.png", b"definitely not a png".to_vec()))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("unsupported image"));

    // The server keeps serving after a rejected upload.
    let (status, _) = app.get("/healthz").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_form_without_file_shows_prompt() {
    let app = TestApp::spawn(MockScoreModel::healthy()).await;
    let form = Form::new().text("note", "no file here");
    let (status, body) = app.upload(form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Please upload an image to proceed."));
}

#[tokio::test]
async fn test_model_failure_is_server_error() {
    let app = TestApp::spawn(Arc::new(FailingScoreModel)).await;
    let (status, body) = app.upload(file_form("fundus.png", fundus_png())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("inference failed"));
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let app = TestApp::spawn_with_limit(MockScoreModel::healthy(), 1024).await;
    let (status, _) = app
        .upload(file_form("big.png", vec![0u8; 8 * 1024]))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_assets_served() {
    let app = TestApp::spawn(MockScoreModel::healthy()).await;
    let resp = app
        .client
        .get(format!("{}/assets/Severe.jpeg", app.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(reqwest::header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap(),
        "image/jpeg"
    );
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"Severe.jpeg");
}

#[tokio::test]
async fn test_unknown_asset_is_not_found() {
    let app = TestApp::spawn(MockScoreModel::healthy()).await;
    let (status, _) = app.get("/assets/secrets.toml").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
