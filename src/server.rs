use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::catalog::{CourseCategory, CourseRegistry};
use crate::clusters::{ClusterCalculator, ClusterCategory, ClusterRegistry};
use crate::config::Config;
use crate::eligibility::match_courses;
use crate::error::EngineError;
use crate::grades::ProfileInput;
use crate::output::json::to_payload;
use crate::report::{build_cluster_report, build_course_report, ClusterReport, CourseReport};
use crate::results::{ResultKind, ResultStore, StoredResult};

#[derive(Clone)]
struct ApiState {
    config: Config,
    calculator: ClusterCalculator,
    catalog: CourseRegistry,
    db_path: PathBuf,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        let status = match &error {
            EngineError::InvalidGrade(_)
            | EngineError::IncompleteProfile { .. }
            | EngineError::DuplicateSubject(_)
            | EngineError::UnknownCategory(_) => StatusCode::BAD_REQUEST,
            EngineError::ClusterNotFound(_) => StatusCode::NOT_FOUND,
            EngineError::CatalogUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Deserialize)]
struct ClustersRequest {
    #[serde(flatten)]
    profile: ProfileInput,
    #[serde(default)]
    save: bool,
    top: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct MatchRequest {
    #[serde(flatten)]
    profile: ProfileInput,
    #[serde(default)]
    save: bool,
    top: Option<usize>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    catalog_source: String,
}

#[derive(Debug, Serialize)]
struct CategoriesResponse {
    categories: Vec<ClusterCategory>,
}

#[derive(Debug, Serialize)]
struct ClustersResponse {
    #[serde(flatten)]
    report: ClusterReport,
    result_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct MatchResponse {
    #[serde(flatten)]
    report: CourseReport,
    result_id: Option<String>,
}

pub fn router(config: Config) -> Result<Router> {
    let catalog = CourseRegistry::from_config(&config.catalog)?;
    let calculator = ClusterCalculator::new(ClusterRegistry::with_defaults(), config.thresholds());
    let state = ApiState {
        db_path: config.resolved_db_path(),
        config,
        calculator,
        catalog,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(health))
        .route("/v1/clusters/categories", get(categories))
        .route("/v1/clusters", post(clusters))
        .route("/v1/courses/match", post(match_handler))
        .route("/v1/results/:id", get(result))
        .layer(cors)
        .with_state(state))
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let app = router(config)?;
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<ApiState>) -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        catalog_source: state.catalog.source_name().to_string(),
    })
}

async fn categories(State(state): State<ApiState>) -> Json<ApiResponse<CategoriesResponse>> {
    ok(CategoriesResponse {
        categories: state.calculator.registry().list_categories().to_vec(),
    })
}

async fn clusters(
    State(state): State<ApiState>,
    Json(request): Json<ClustersRequest>,
) -> ApiResult<ClustersResponse> {
    let profile = request.profile.to_profile()?;
    let top_n = request.top.unwrap_or(state.config.report.top_n);
    let report = build_cluster_report(&state.calculator, &profile, top_n)?;
    let result_id = if request.save {
        Some(save_result(&state, ResultKind::Clusters, &report)?)
    } else {
        None
    };
    Ok(ok(ClustersResponse { report, result_id }))
}

async fn match_handler(
    State(state): State<ApiState>,
    Json(request): Json<MatchRequest>,
) -> ApiResult<MatchResponse> {
    let raw_category = request
        .profile
        .category
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("category is required"))?;
    let category = CourseCategory::from_str(raw_category).map_err(EngineError::from)?;
    let profile = request.profile.to_profile()?;
    let filters = request.profile.filters();

    let catalog = state.catalog.courses_for_category(category).await?;
    let outcome = match_courses(&profile, &catalog, &filters);
    if !outcome.skipped.is_empty() {
        warn!(
            "{} malformed {category} records skipped for this request",
            outcome.skipped.len()
        );
    }
    let report = build_course_report(outcome, request.top, state.config.report.top_n);
    let result_id = if request.save {
        Some(save_result(&state, ResultKind::Courses, &report)?)
    } else {
        None
    };
    Ok(ok(MatchResponse { report, result_id }))
}

async fn result(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<StoredResult> {
    let store = open_store(&state)?;
    match store.get(&id).map_err(ApiError::internal)? {
        Some(stored) => Ok(ok(stored)),
        None => Err(ApiError::not_found(format!("no stored result with id {id}"))),
    }
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

fn open_store(state: &ApiState) -> std::result::Result<ResultStore, ApiError> {
    ResultStore::open(&state.db_path).map_err(ApiError::internal)
}

fn save_result<T: Serialize>(
    state: &ApiState,
    kind: ResultKind,
    report: &T,
) -> std::result::Result<String, ApiError> {
    let payload = to_payload(report).map_err(ApiError::internal)?;
    let store = open_store(state)?;
    store.put(kind, &payload).map_err(ApiError::internal)
}
