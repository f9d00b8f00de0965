use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

const DURATION_BUCKETS_MS: &[f64] = &[1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1_000.0, 5_000.0, 30_000.0];

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder once per process and describe the
    /// analyzer's series. Later calls reuse the same handle.
    pub fn init() -> Result<Self, BuildError> {
        let handle = HANDLE.get_or_try_init(|| {
            let handle = PrometheusBuilder::new()
                .set_buckets_for_metric(
                    Matcher::Full("analysis_duration_ms".to_string()),
                    DURATION_BUCKETS_MS,
                )?
                .install_recorder()?;
            describe();
            Ok::<_, BuildError>(handle)
        })?;
        Ok(Self {
            handle: handle.clone(),
        })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!("documents_analyzed_total", "Uploads that produced an analysis");
    describe_counter!("document_tone_total", "Analysed documents by detected tone");
    describe_counter!("ocr_failures_total", "Uploads whose text extraction failed");
    describe_counter!("auth_failures_total", "Rejected bearer tokens and logins");
    describe_histogram!(
        "analysis_duration_ms",
        Unit::Milliseconds,
        "Extraction plus analysis time per upload"
    );
}
