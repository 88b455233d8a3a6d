use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use clap_serde_derive::ClapSerde;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::bail_worker;
use crate::config::Config;
use crate::error::WorkerResult;
use crate::serverless::job::{Job, JobResult};
use crate::telemetry::init_telemetry;

/// The user-defined callback invoked once per job.
pub type Handler = Arc<dyn Fn(Job) -> Result<String> + Send + Sync>;

/// Fallback job payload probed in the working directory when no explicit
/// test input is configured.
const TEST_INPUT_FILE: &str = "test_input.json";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env, default_value = "PodWorker.toml")]
    config_file: String,

    /// Run a single job from this JSON file and exit instead of serving
    #[arg(short, long, env)]
    test_input: Option<String>,

    /// Configuration options
    #[command(flatten)]
    pub opt_config: <Config as ClapSerde>::Opt,
}

#[derive(Clone)]
struct AppState {
    handler: Handler,
}

/// Registers the handler with the runner. Reads the worker configuration,
/// then either runs a one-shot job from a file or serves jobs over HTTP
/// until interrupted.
pub async fn start<H>(handler: H) -> Result<()>
where
    H: Fn(Job) -> Result<String> + Send + Sync + 'static,
{
    let args = Args::parse();
    init_telemetry();

    let config = match Config::from_toml(&args.config_file) {
        Ok(conf) => conf.merge(args.opt_config),
        Err(err) => {
            if args.config_file == "PodWorker.toml" {
                Config::default().merge(args.opt_config)
            } else {
                anyhow::bail!(
                    "Failed to read configuration file {} with error: {}",
                    args.config_file,
                    err
                );
            }
        }
    };

    let handler: Handler = Arc::new(handler);

    let test_input = args.test_input.or_else(|| {
        Path::new(TEST_INPUT_FILE)
            .exists()
            .then(|| TEST_INPUT_FILE.to_string())
    });
    if let Some(path) = test_input {
        return run_test_job(&handler, Path::new(&path));
    }

    let router = build_router(handler);
    let listener = TcpListener::bind(format!("{}:{}", config.address, config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    info!(
        "Supported features: avx: {}, neon: {}, simd128: {}, f16c: {}",
        candle_core::utils::with_avx(),
        candle_core::utils::with_neon(),
        candle_core::utils::with_simd128(),
        candle_core::utils::with_f16c()
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Parses one job from `path`, runs the handler, and prints the result.
/// A handler failure is reported in the printed result, not as a process
/// error.
fn run_test_job(handler: &Handler, path: &Path) -> Result<()> {
    info!("Running test input from {}", path.display());
    let job: Job = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let id = job.id.clone();

    let result = match handler(job) {
        Ok(output) => JobResult::completed(id, output),
        Err(err) => JobResult::failed(id, format!("{err:#}")),
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// The worker's HTTP surface: one job route and a liveness probe.
pub fn build_router(handler: Handler) -> Router {
    Router::new()
        .route("/run", post(handle_run))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { handler })
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down..."),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

#[axum_macros::debug_handler]
async fn handle_run(
    State(state): State<AppState>,
    Json(job): Json<Job>,
) -> WorkerResult<(StatusCode, Json<JobResult>)> {
    if job.input.is_null() {
        bail_worker!(StatusCode::BAD_REQUEST, "Job input must not be null");
    }

    let id = job.id.clone();
    let output = (state.handler)(job)?;
    Ok((StatusCode::OK, Json(JobResult::completed(id, output))))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[axum_macros::debug_handler]
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use anyhow::bail;

    use super::{run_test_job, Handler};
    use crate::serverless::job::Job;

    fn echo_handler() -> Handler {
        Arc::new(|job: Job| match job.input.get("text") {
            Some(text) => Ok(text.as_str().unwrap_or_default().to_string()),
            None => bail!("Missing required input field 'text'"),
        })
    }

    #[test]
    fn test_job_runs_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"input": {{"text": "hi"}}}}"#).unwrap();

        run_test_job(&echo_handler(), file.path()).unwrap();
    }

    #[test]
    fn test_job_reports_handler_failure_without_failing_the_process() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"input": {{}}}}"#).unwrap();

        run_test_job(&echo_handler(), file.path()).unwrap();
    }

    #[test]
    fn malformed_test_input_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(run_test_job(&echo_handler(), file.path()).is_err());
    }
}
