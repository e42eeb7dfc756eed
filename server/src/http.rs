use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::{Context, anyhow};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use entity::{Employee, EmployeeDraft, RecordId};
use platform_api::{ApiError, ApiResult};
use products_hr::EmployeeRepository;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{Span, debug, info, instrument};

use crate::config::AppConfig;

const DEFAULT_PAGE: i64 = 1;

#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeRepository,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "employee server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    info!("employee server stopped");
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .route(
            "/employees/{id}",
            get(get_employee_handler)
                .put(update_employee_handler)
                .delete(delete_employee_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

/// Paging parameters as raw strings. The first occurrence of each key wins
/// and a value that does not parse falls back to its default on its own.
#[derive(Debug, Default)]
struct ListQuery {
    page: Option<String>,
    page_size: Option<String>,
}

impl ListQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "pageSize" => &mut query.page_size,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Maps an extractor rejection onto `ApiError`. Rejections axum classes as
/// server faults (a route without the expected parameter) stay masked.
fn rejection_error(status: StatusCode, body_text: String) -> ApiError {
    if status.is_server_error() {
        ApiError::internal(anyhow!(body_text))
    } else {
        ApiError::invalid(body_text)
    }
}

fn parse_id(raw: &str) -> ApiResult<RecordId> {
    raw.parse()
        .map_err(|_| ApiError::invalid(format!("invalid employee id: {raw:?}")))
}

/// Extracts the `{id}` segment and records it on the current span.
fn path_id(path: Result<Path<String>, PathRejection>) -> ApiResult<RecordId> {
    let Path(raw) =
        path.map_err(|rejection| rejection_error(rejection.status(), rejection.body_text()))?;
    let id = parse_id(&raw)?;
    Span::current().record("id", id);
    Ok(id)
}

/// Unwraps a JSON body and validates it, turning both failure kinds into 400s.
fn accept_draft(body: Result<Json<EmployeeDraft>, JsonRejection>) -> ApiResult<EmployeeDraft> {
    let Json(draft) =
        body.map_err(|rejection| rejection_error(rejection.status(), rejection.body_text()))?;
    draft.validate()?;
    Ok(draft)
}

#[instrument(name = "employees.create", skip_all)]
async fn create_employee_handler(
    State(state): State<AppState>,
    body: Result<Json<EmployeeDraft>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let draft = accept_draft(body)?;
    let created = state.employees.create_employee(draft.into_employee(0));
    info!(id = created.id, "employee created");
    Ok(Json(created))
}

#[instrument(name = "employees.get", skip_all, fields(id = tracing::field::Empty))]
async fn get_employee_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Employee>> {
    let id = path_id(path)?;
    state
        .employees
        .get_employee_by_id(id)
        .map(Json)
        .ok_or(ApiError::NotFound("employee"))
}

#[instrument(name = "employees.update", skip_all, fields(id = tracing::field::Empty))]
async fn update_employee_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<EmployeeDraft>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let id = path_id(path)?;
    let employee = accept_draft(body)?.into_employee(id);
    if !state.employees.update_employee(employee.clone()) {
        return Err(ApiError::NotFound("employee"));
    }
    info!("employee updated");
    Ok(Json(employee))
}

#[instrument(name = "employees.delete", skip_all, fields(id = tracing::field::Empty))]
async fn delete_employee_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(path)?;
    if !state.employees.delete_employee(id) {
        return Err(ApiError::NotFound("employee"));
    }
    info!("employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "employees.list", skip_all)]
async fn list_employees_handler(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Json<Vec<Employee>> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let query = ListQuery::from_pairs(pairs);
    let page = parse_or(query.page.as_deref(), DEFAULT_PAGE);
    let page_size = parse_or(query.page_size.as_deref(), state.config.default_page_size);
    let employees = state.employees.list_employees(page, page_size);
    debug!(page, page_size, returned = employees.len(), "employees listed");
    Json(employees)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        employees: state.employees.count(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    employees: usize,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
