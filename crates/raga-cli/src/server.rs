//! HTTP analysis service
//!
//! - `POST /analyze` - multipart upload: `audio_file` (required), `tonic_hz` (optional)
//! - `POST /catalogue/reload` - re-read the catalogue file
//! - `GET /health`

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use raga_core::{Analyzer, CatalogueStore, RagaError, Tonic};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared, read-only service state
pub struct AppState {
    pub analyzer: Analyzer,
    pub catalogue: CatalogueStore,
    pub catalogue_path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    ragas: usize,
}

#[derive(Debug, Serialize)]
struct ReloadResponse {
    status: &'static str,
    ragas: usize,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: error.into() })).into_response()
}

/// An uploaded recording
struct Upload {
    filename: String,
    data: Vec<u8>,
}

/// Interpret the optional `tonic_hz` form field. An empty value counts as
/// absent.
pub fn parse_tonic_field(value: Option<&str>) -> Result<Option<Tonic>, RagaError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => Tonic::parse(v).map(Some),
    }
}

/// Spool the upload to a temp file that keeps the original extension, so
/// the decoder can pick the format
fn spool(upload: &Upload) -> std::io::Result<tempfile::NamedTempFile> {
    let suffix = std::path::Path::new(&upload.filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let mut file = tempfile::Builder::new()
        .prefix("raga-upload-")
        .suffix(&suffix)
        .tempfile()?;
    file.write_all(&upload.data)?;
    file.flush()?;
    Ok(file)
}

/// POST /analyze
async fn analyze(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut upload: Option<Upload> = None;
    let mut tonic_field: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                log::warn!("Malformed multipart request: {}", e);
                return error_response(StatusCode::BAD_REQUEST, format!("Malformed upload: {}", e));
            }
        };

        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "audio_file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        upload = Some(Upload {
                            filename,
                            data: bytes.to_vec(),
                        })
                    }
                    Err(e) => {
                        log::warn!("Failed to read audio_file: {}", e);
                        return error_response(StatusCode::BAD_REQUEST, "Failed to read audio_file");
                    }
                }
            }
            "tonic_hz" => match field.text().await {
                Ok(text) => tonic_field = Some(text),
                Err(e) => {
                    log::warn!("Failed to read tonic_hz: {}", e);
                    return error_response(StatusCode::BAD_REQUEST, "Failed to read tonic_hz");
                }
            },
            _ => {}
        }
    }

    let upload = match upload {
        Some(upload) => upload,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "No 'audio_file' part in the request. Use -F 'audio_file=@...' in curl.",
            )
        }
    };
    if upload.filename.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No selected file");
    }

    let tonic = match parse_tonic_field(tonic_field.as_deref()) {
        Ok(tonic) => tonic,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    log::info!(
        "Analyzing upload {} ({} bytes, tonic {})",
        upload.filename,
        upload.data.len(),
        tonic.map_or_else(|| "from median pitch".to_string(), |t| t.to_string())
    );

    let result = tokio::task::spawn_blocking(move || {
        let file = spool(&upload).map_err(|e| RagaError::Decode(e.to_string()))?;
        let catalogue = state.catalogue.snapshot();
        // file is removed when dropped at the end of this closure
        state
            .analyzer
            .analyze_file(file.path(), tonic, &catalogue)
            .map(|analysis| analysis.into_report(false))
    })
    .await;

    match result {
        Ok(Ok(report)) => Json(report).into_response(),
        Ok(Err(e)) if e.is_client_error() => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Ok(Err(e)) => {
            log::warn!("Analysis failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Analysis failed: {}", e),
            )
        }
        Err(e) => {
            log::error!("Analysis task panicked: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Analysis failed: internal error")
        }
    }
}

/// POST /catalogue/reload
async fn reload_catalogue(State(state): State<Arc<AppState>>) -> Response {
    let path = state.catalogue_path.clone();
    let worker = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || worker.catalogue.reload(&path)).await;

    match result {
        Ok(Ok(ragas)) => {
            log::info!("Catalogue reloaded: {} ragas", ragas);
            Json(ReloadResponse {
                status: "reloaded",
                ragas,
            })
            .into_response()
        }
        Ok(Err(e)) => {
            log::warn!("Catalogue reload failed, keeping previous: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                RagaError::from(e).to_string(),
            )
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        ragas: state.catalogue.snapshot().len(),
    })
}

pub fn make_app(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let analyze_route = Router::new()
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .merge(analyze_route)
        .route("/catalogue/reload", post(reload_catalogue))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run_server(
    state: Arc<AppState>,
    host: &str,
    port: u16,
    max_upload_bytes: usize,
) -> anyhow::Result<()> {
    let app = make_app(state, max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    log::info!("Listening on {}", listener.local_addr()?);
    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use raga_core::{AnalysisConfig, Catalogue};
    use tower::ServiceExt;

    const BOUNDARY: &str = "raga-test-boundary";

    fn state(catalogue_json: &str) -> Arc<AppState> {
        Arc::new(AppState {
            analyzer: Analyzer::new(AnalysisConfig::default()).unwrap(),
            catalogue: CatalogueStore::new(Catalogue::from_json_str(catalogue_json).unwrap()),
            catalogue_path: PathBuf::from("does/not/exist.json"),
        })
    }

    fn sine_wav(freq: f32, seconds: f32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            let n = (22050.0 * seconds) as usize;
            for i in 0..n {
                let t = i as f32 / 22050.0;
                let s = 0.5 * (2.0 * std::f32::consts::PI * freq * t).sin();
                writer.write_sample((s * 32767.0) as i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn multipart_body(file: Option<(&str, &[u8])>, tonic: Option<&str>) -> Body {
        let mut body = Vec::new();
        if let Some(tonic) = tonic {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"tonic_hz\"\r\n\r\n{}\r\n",
                    BOUNDARY, tonic
                )
                .as_bytes(),
            );
        }
        if let Some((filename, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"audio_file\"; \
                     filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    BOUNDARY, filename
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        Body::from(body)
    }

    async fn post_analyze(app: Router, body: Body) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(body)
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_parse_tonic_field() {
        assert_eq!(parse_tonic_field(None).unwrap(), None);
        assert_eq!(parse_tonic_field(Some("  ")).unwrap(), None);
        assert_eq!(parse_tonic_field(Some("220.5")).unwrap().unwrap().hz(), 220.5);
        assert!(matches!(
            parse_tonic_field(Some("sa")),
            Err(RagaError::InvalidTonicFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file_part() {
        let app = make_app(state("{}"), 1 << 20);
        let (status, json) = post_analyze(app, multipart_body(None, Some("220"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("audio_file"));
    }

    #[tokio::test]
    async fn test_empty_filename() {
        let app = make_app(state("{}"), 1 << 20);
        let (status, json) = post_analyze(app, multipart_body(Some(("", b"x")), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No selected file");
    }

    #[tokio::test]
    async fn test_invalid_tonic_rejected() {
        let app = make_app(state("{}"), 1 << 20);
        let wav = sine_wav(220.0, 0.5);
        let (status, json) =
            post_analyze(app, multipart_body(Some(("a.wav", &wav)), Some("abc"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("tonic_hz"));
    }

    #[tokio::test]
    async fn test_unreadable_tonic_part_rejected() {
        let app = make_app(state("{}"), 1 << 20);
        let wav = sine_wav(220.0, 0.5);

        // audio part complete, tonic part cut off before its closing boundary
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"audio_file\"; \
                 filename=\"a.wav\"\r\n\r\n",
                BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(&wav);
        body.extend_from_slice(
            format!(
                "\r\n--{}\r\nContent-Disposition: form-data; name=\"tonic_hz\"\r\n\r\n146.8",
                BOUNDARY
            )
            .as_bytes(),
        );

        let (status, json) = post_analyze(app, Body::from(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Failed to read tonic_hz");
    }

    #[tokio::test]
    async fn test_undecodable_upload_is_server_error() {
        let app = make_app(state("{}"), 1 << 20);
        let (status, json) =
            post_analyze(app, multipart_body(Some(("a.wav", b"not audio")), None)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().starts_with("Analysis failed"));
    }

    #[tokio::test]
    async fn test_analyze_tone() {
        let app = make_app(state(r#"{ "SaOnly": [0], "SaPa": [0, 7] }"#), 1 << 22);
        let wav = sine_wav(220.0, 1.0);
        let (status, json) =
            post_analyze(app, multipart_body(Some(("tone.wav", &wav)), Some("220"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert_eq!(json["tonic_hz_used"], "220.00");
        assert_eq!(json["swara_indices_present"], serde_json::json!([0]));
        assert_eq!(json["matched_ragas"][0]["raga"], "SaOnly");
        assert_eq!(json["matched_ragas"][0]["score"], 0);
        assert_eq!(json["matched_ragas"][1]["missing_notes_count"], 1);
    }

    #[tokio::test]
    async fn test_health_and_failed_reload() {
        let shared = state(r#"{ "A": [0] }"#);
        let app = make_app(Arc::clone(&shared), 1 << 20);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/catalogue/reload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // previous snapshot kept
        assert_eq!(shared.catalogue.snapshot().len(), 1);
    }
}
