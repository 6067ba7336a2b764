//! HTTP handlers.

use std::io::Cursor;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use glaucolens_adapters::decode_upload;
use glaucolens_core::domain::DEFAULT_AGE;
use glaucolens_core::inference::fit_to_input;
use glaucolens_core::modules::{DEFAULT_SEVERITY, MAX_SEVERITY};
use glaucolens_core::{assess_risk, DetectionOutcome, Page, RiskInputs, UploadedImage};
use image::{DynamicImage, ImageFormat};
use serde::Deserialize;
use tracing::{debug, error, warn};

use super::{views, AppState};

/// Multipart field carrying the fundus image.
const UPLOAD_FIELD: &str = "file";

/// Widget values carried in the query string.
///
/// Everything is read as text so a malformed value falls back to the widget
/// default instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    page: Option<String>,
    severity: Option<String>,
    age: Option<String>,
    family_history: Option<String>,
    diabetes: Option<String>,
    high_bp: Option<String>,
    check: Option<String>,
}

impl PageQuery {
    fn severity(&self) -> u32 {
        self.severity
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .map_or(DEFAULT_SEVERITY, |s| s.min(MAX_SEVERITY))
    }

    fn risk_inputs(&self) -> RiskInputs {
        let age = self
            .age
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_AGE);
        RiskInputs::new(
            age,
            is_yes(self.family_history.as_deref()),
            is_yes(self.diabetes.as_deref()),
            is_yes(self.high_bp.as_deref()),
        )
    }

    fn risk_checked(&self) -> bool {
        is_yes(self.check.as_deref())
    }
}

fn is_yes(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "yes" | "true" | "on" | "1"
        )
    })
}

pub(crate) async fn page_handler(Query(query): Query<PageQuery>) -> Html<String> {
    let page = Page::from_slug(query.page.as_deref());
    debug!(page = page.slug(), "render page");

    let body = match page {
        Page::Home => views::home(),
        Page::VisionSimulator => views::simulator(query.severity()),
        Page::Detection => views::detection(&DetectionOutcome::NoUploadYet, None),
        Page::Learn => {
            let inputs = query.risk_inputs();
            let assessment = query.risk_checked().then(|| assess_risk(&inputs));
            views::learn(&inputs, assessment.as_ref())
        }
    };

    Html(views::layout(page, &body))
}

pub(crate) async fn detection_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(e) => {
            warn!("Upload failed: {}", e.body_text());
            let outcome = DetectionOutcome::Rejected {
                message: format!("Upload failed: {}", e.body_text()),
            };
            return render_detection(e.status(), &outcome, None);
        }
    };

    let adapter = state.adapter.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let decoded = upload.as_ref().map(decode_upload);
        let preview = match &decoded {
            Some(Ok(image)) => encode_preview(image),
            _ => None,
        };
        adapter.evaluate(decoded).map(|outcome| (outcome, preview))
    })
    .await;

    let (status, outcome, preview) = match joined {
        Ok(Ok((outcome, preview))) => (status_for(&outcome), outcome, preview),
        Ok(Err(e)) => {
            error!("Classification failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                DetectionOutcome::Rejected {
                    message: e.to_string(),
                },
                None,
            )
        }
        Err(e) => {
            error!("Classification task failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                DetectionOutcome::Rejected {
                    message: "Analysis failed unexpectedly. Please try again.".to_string(),
                },
                None,
            )
        }
    };

    render_detection(status, &outcome, preview.as_deref())
}

/// PNG of the image as the classifier sees it, for echoing back to the user.
fn encode_preview(image: &DynamicImage) -> Option<Vec<u8>> {
    let fitted = fit_to_input(image).ok()?;
    let mut buf = Cursor::new(Vec::new());
    match DynamicImage::ImageRgb8(fitted.to_rgb8()).write_to(&mut buf, ImageFormat::Png) {
        Ok(()) => Some(buf.into_inner()),
        Err(e) => {
            warn!("Failed to encode upload preview: {e}");
            None
        }
    }
}

/// Pulls the upload out of the form. An empty file input counts as no upload.
async fn read_upload(mut multipart: Multipart) -> Result<Option<UploadedImage>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        if file_name.is_empty() && bytes.is_empty() {
            return Ok(None);
        }
        debug!("Received upload {file_name:?} ({} bytes)", bytes.len());
        return Ok(Some(UploadedImage::new(file_name, bytes.to_vec())));
    }
    Ok(None)
}

const fn status_for(outcome: &DetectionOutcome) -> StatusCode {
    match outcome {
        DetectionOutcome::NoUploadYet | DetectionOutcome::Classified { .. } => StatusCode::OK,
        DetectionOutcome::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn render_detection(
    status: StatusCode,
    outcome: &DetectionOutcome,
    preview_png: Option<&[u8]>,
) -> Response {
    let body = views::detection(outcome, preview_png);
    (status, Html(views::layout(Page::Detection, &body))).into_response()
}

pub(crate) async fn asset_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    let store = state.assets.clone();
    let joined = tokio::task::spawn_blocking(move || store.read(&name)).await;

    match joined {
        Ok(Ok(Some(asset))) => {
            ([(header::CONTENT_TYPE, asset.content_type)], asset.bytes).into_response()
        }
        Ok(Ok(None)) => (StatusCode::NOT_FOUND, "asset not found").into_response(),
        Ok(Err(e)) => {
            error!("{e:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to read asset").into_response()
        }
        Err(e) => {
            error!("Asset task failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to read asset").into_response()
        }
    }
}

pub(crate) async fn healthz_handler() -> &'static str {
    "ok"
}
