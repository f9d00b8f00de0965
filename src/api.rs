use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, DefaultBodyLimit, FromRef, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analyze::{anon_hash, Analyzer, Lexicon};
use crate::auth::{AuthError, AuthUser, TokenIssuer, UserStore};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::history::{HistoryRecord, HistoryStore};
use crate::metrics::Metrics;
use crate::ocr::{DocumentKind, TesseractExtractor, TextExtractor};

pub const NO_FILE_UPLOADED: &str = "No file uploaded";

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub extractor: Arc<dyn TextExtractor>,
    pub users: Arc<UserStore>,
    pub history: Arc<HistoryStore>,
    pub tokens: Arc<TokenIssuer>,
    pub config: Arc<AppConfig>,
    metrics: Metrics,
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.tokens)
    }
}

impl AppState {
    /// Production wiring: Tesseract OCR and JSON-file stores from `[storage]`.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let extractor = Arc::new(TesseractExtractor::with_config(config.ocr.clone()));
        let users = UserStore::open(&config.storage.users_file).with_context(|| {
            format!("opening user store {}", config.storage.users_file.display())
        })?;
        let history = HistoryStore::open(&config.storage.history_file, config.storage.history_cap)
            .with_context(|| {
                format!("opening history {}", config.storage.history_file.display())
            })?;
        Self::assemble(config, extractor, users, history)
    }

    /// Stores kept in memory, extractor supplied by the caller. Uploads still
    /// land in `config.storage.upload_dir`.
    pub fn in_memory(config: AppConfig, extractor: Arc<dyn TextExtractor>) -> anyhow::Result<Self> {
        let history = HistoryStore::in_memory(config.storage.history_cap);
        Self::assemble(config, extractor, UserStore::in_memory(), history)
    }

    fn assemble(
        config: AppConfig,
        extractor: Arc<dyn TextExtractor>,
        users: UserStore,
        history: HistoryStore,
    ) -> anyhow::Result<Self> {
        let lexicon = Lexicon::from_config(&config.lexicon)?;
        let analyzer = Analyzer::new(Arc::new(lexicon), config.analysis);
        let tokens = TokenIssuer::new(&config.auth.secret_key, config.auth.token_ttl_hours);
        let metrics = Metrics::init().context("installing Prometheus recorder")?;
        Ok(Self {
            analyzer: Arc::new(analyzer),
            extractor,
            users: Arc::new(users),
            history: Arc::new(history),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
            metrics,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.storage.max_upload_bytes;
    let metrics = state.metrics.router::<AppState>();

    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "OK" }))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/analyze", post(analyze_upload))
        .route("/history", get(history))
        .merge(metrics)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Backend OK, OCR Ready" }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Credentials {
    email: String,
    password: String,
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    token: String,
    name: String,
}

async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(body) = payload?;
    let email = body.email.trim().to_string();
    let users = Arc::clone(&state.users);
    let subject = email.clone();
    // argon2 hashing runs on the blocking pool.
    let name = blocking(move || users.register(&subject, &body.password, body.name.as_deref()))
        .await??;
    Ok(Json(TokenResponse {
        token: state.tokens.issue(&email),
        name,
    }))
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(body) = payload?;
    let email = body.email.trim().to_string();
    let users = Arc::clone(&state.users);
    let subject = email.clone();
    let name = match blocking(move || users.verify(&subject, &body.password)).await? {
        Ok(name) => name,
        Err(e @ AuthError::InvalidCredentials) => {
            warn!(target: "auth", user = %anon_hash(&email), "login rejected");
            counter!("auth_failures_total", "reason" => "login").increment(1);
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    info!(target: "auth", user = %anon_hash(&email), "login ok");
    Ok(Json(TokenResponse {
        token: state.tokens.issue(&email),
        name,
    }))
}

async fn analyze_upload(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<HistoryRecord>, ApiError> {
    let started = Instant::now();
    let (filename, data) = read_upload(&mut multipart).await?;
    let kind = DocumentKind::from_filename(&filename)?;

    let id = Uuid::new_v4();
    let upload_dir = &state.config.storage.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| ApiError::internal(format!("creating upload dir: {e}")))?;
    let path = upload_dir.join(format!("{id}_{filename}"));
    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| ApiError::internal(format!("saving upload: {e}")))?;

    let text = match state.extractor.extract_text(&path, kind).await {
        Ok(text) => text,
        Err(e) => {
            counter!("ocr_failures_total").increment(1);
            warn!(target: "ocr", %id, backend = state.extractor.name(), error = %e, "extraction failed");
            return Err(e.into());
        }
    };

    let analyzer = Arc::clone(&state.analyzer);
    let (text, result) = blocking(move || {
        let result = analyzer.analyze(&text);
        (text, result)
    })
    .await?;

    let record = HistoryRecord::new(id, filename, &text, result);
    state.history.append(&user.email, record.clone())?;

    counter!("documents_analyzed_total").increment(1);
    counter!("document_tone_total", "tone" => record.tone.as_str()).increment(1);
    histogram!("analysis_duration_ms").record(started.elapsed().as_secs_f64() * 1000.0);
    info!(
        target: "api",
        user = %anon_hash(&user.email),
        %id,
        bytes = data.len(),
        tone = %record.tone,
        "upload analyzed"
    );
    Ok(Json(record))
}

async fn history(State(state): State<AppState>, user: AuthUser) -> Json<Vec<HistoryRecord>> {
    Json(state.history.read(&user.email))
}

/// First multipart field named `file` that carries a usable filename.
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let Some(filename) = field.file_name().and_then(upload_basename) else {
            return Err(ApiError::bad_request(NO_FILE_UPLOADED));
        };
        let data = field.bytes().await?;
        return Ok((filename, data));
    }
    Err(ApiError::bad_request(NO_FILE_UPLOADED))
}

/// Last path component of a client-supplied filename, or `None` if nothing usable is left.
fn upload_basename(raw: &str) -> Option<String> {
    let name = raw.rsplit(|c| c == '/' || c == '\\').next()?.trim();
    match name {
        "" | "." | ".." => None,
        n => Some(n.to_string()),
    }
}

async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("worker task failed: {e}")))
}
