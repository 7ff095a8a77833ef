use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::core::{
    EXPORT_FILE_NAME, ScheduleCharts, ScheduleError, ScheduleInputs, ScheduleSummary, YearRecord,
    build_charts, compute_schedule_with_limit, summarize, to_csv_string,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const DEFAULT_PRINCIPAL_OWING: f64 = 300_000.0;
const DEFAULT_PERIOD_PAYMENT: f64 = 2_000.0;
const DEFAULT_ANNUAL_EXTRA_PAYMENT: f64 = 10_000.0;
const DEFAULT_ANNUAL_RATE_PERCENT: f64 = 5.0;

type AppState = Arc<ServerConfig>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SchedulePayload {
    #[serde(alias = "currentYear")]
    starting_year: Option<i32>,
    #[serde(alias = "mortgageOwing")]
    principal_owing: Option<f64>,
    #[serde(alias = "fortnightlyPayment")]
    period_payment: Option<f64>,
    #[serde(alias = "annualLumpSum")]
    annual_extra_payment: Option<f64>,
    #[serde(alias = "interestRate")]
    annual_rate_percent: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleResponse {
    inputs: ScheduleInputs,
    years: Vec<YearRecord>,
    summary: ScheduleSummary,
    charts: ScheduleCharts,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
}

pub fn build_router(config: ServerConfig) -> Router {
    let state: AppState = Arc::new(config);

    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/defaults", get(defaults_handler))
        .route(
            "/api/schedule",
            get(schedule_get_handler).post(schedule_post_handler),
        )
        .route(
            "/api/schedule.csv",
            get(csv_get_handler).post(csv_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let app = build_router(config);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "mortgage schedule API listening");
    tracing::info!("Local access: http://127.0.0.1:{}/", addr.port());
    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "not-found", "Not found")
}

async fn defaults_handler() -> Response {
    json_response(StatusCode::OK, default_inputs())
}

async fn schedule_get_handler(
    State(config): State<AppState>,
    payload: Result<Query<SchedulePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => schedule_handler_impl(&config, payload),
        Err(rejection) => bad_request(rejection.body_text()),
    }
}

async fn schedule_post_handler(
    State(config): State<AppState>,
    payload: Result<Json<SchedulePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => schedule_handler_impl(&config, payload),
        Err(rejection) => bad_request(rejection.body_text()),
    }
}

async fn csv_get_handler(
    State(config): State<AppState>,
    payload: Result<Query<SchedulePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => csv_handler_impl(&config, payload),
        Err(rejection) => bad_request(rejection.body_text()),
    }
}

async fn csv_post_handler(
    State(config): State<AppState>,
    payload: Result<Json<SchedulePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => csv_handler_impl(&config, payload),
        Err(rejection) => bad_request(rejection.body_text()),
    }
}

fn schedule_handler_impl(config: &ServerConfig, payload: SchedulePayload) -> Response {
    let inputs = inputs_from_payload(payload);
    let years = match run_schedule(config, &inputs) {
        Ok(years) => years,
        Err(err) => return schedule_error_response(&err),
    };

    let response = ScheduleResponse {
        inputs,
        summary: summarize(&years),
        charts: build_charts(&years),
        years,
    };
    json_response(StatusCode::OK, response)
}

fn csv_handler_impl(config: &ServerConfig, payload: SchedulePayload) -> Response {
    let inputs = inputs_from_payload(payload);
    let years = match run_schedule(config, &inputs) {
        Ok(years) => years,
        Err(err) => return schedule_error_response(&err),
    };

    match to_csv_string(&years) {
        Ok(csv) => with_cache_control((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                ),
            ],
            csv,
        )),
        Err(err) => {
            tracing::error!(error = %err, "CSV export failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "export-failed",
                &err.to_string(),
            )
        }
    }
}

fn run_schedule(
    config: &ServerConfig,
    inputs: &ScheduleInputs,
) -> Result<Vec<YearRecord>, ScheduleError> {
    tracing::debug!(?inputs, max_years = config.max_years, "computing schedule");
    let result = compute_schedule_with_limit(inputs, config.max_years);
    match &result {
        Ok(years) => tracing::debug!(years = years.len(), "schedule computed"),
        Err(err) => tracing::warn!(kind = err.kind(), error = %err, "schedule rejected"),
    }
    result
}

fn default_inputs() -> ScheduleInputs {
    ScheduleInputs {
        starting_year: chrono::Local::now().year(),
        principal_owing: DEFAULT_PRINCIPAL_OWING,
        period_payment: DEFAULT_PERIOD_PAYMENT,
        annual_extra_payment: DEFAULT_ANNUAL_EXTRA_PAYMENT,
        annual_rate_percent: DEFAULT_ANNUAL_RATE_PERCENT,
    }
}

fn inputs_from_payload(payload: SchedulePayload) -> ScheduleInputs {
    let mut inputs = default_inputs();

    if let Some(v) = payload.starting_year {
        inputs.starting_year = v;
    }
    if let Some(v) = payload.principal_owing {
        inputs.principal_owing = v;
    }
    if let Some(v) = payload.period_payment {
        inputs.period_payment = v;
    }
    if let Some(v) = payload.annual_extra_payment {
        inputs.annual_extra_payment = v;
    }
    if let Some(v) = payload.annual_rate_percent {
        inputs.annual_rate_percent = v;
    }

    inputs
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, kind: &'static str, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            kind,
        },
    )
}

fn bad_request(msg: String) -> Response {
    tracing::warn!(error = %msg, "malformed schedule request");
    error_response(StatusCode::BAD_REQUEST, "bad-request", &msg)
}

fn schedule_error_response(err: &ScheduleError) -> Response {
    error_response(StatusCode::UNPROCESSABLE_ENTITY, err.kind(), &err.to_string())
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<ScheduleInputs, String> {
    let payload = serde_json::from_str::<SchedulePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(inputs_from_payload(payload))
}
