use crate::errors::AppError;
use crate::registry::{Procedure, ProcedureKind};
use crate::store::FunnelStore;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store every procedure runs against.
    pub store: Arc<dyn FunnelStore>,
}

/// Successful procedure envelope: `{"result":{"data":...}}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcedureResponse {
    pub result: ProcedureResult,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcedureResult {
    /// Record, list of records, or healthcheck payload.
    #[schema(value_type = Object)]
    pub data: Value,
}

impl ProcedureResponse {
    pub fn new(data: Value) -> Self {
        Self {
            result: ProcedureResult { data },
        }
    }
}

/// Query-string carrier for query procedures.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QueryInput {
    /// URL-encoded JSON input, required by `getPlanById` only.
    pub input: Option<String>,
}

/// Health check endpoint.
///
/// Returns the service status and version. Bypasses rate limiting.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "insurance-funnel-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /trpc/:procedure
///
/// Invokes a query procedure. The optional `input` query parameter carries the
/// JSON payload.
#[utoipa::path(
    get,
    path = "/trpc/{procedure}",
    tag = "procedures",
    params(
        ("procedure" = String, Path, description = "Query procedure name, e.g. getFeaturedPlans"),
        QueryInput
    ),
    responses(
        (status = 200, description = "Procedure result", body = ProcedureResponse),
        (status = 400, description = "Input failed validation", body = ErrorBody),
        (status = 404, description = "Unknown procedure or record", body = ErrorBody),
        (status = 405, description = "Procedure is a mutation", body = ErrorBody)
    )
)]
pub async fn query_procedure(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<QueryInput>,
) -> Result<Json<ProcedureResponse>, AppError> {
    let procedure = resolve(&name, ProcedureKind::Query)?;
    tracing::info!("GET /trpc/{}", procedure);

    let payload = params
        .input
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .map_err(|e| AppError::BadRequest(format!("input is not valid JSON: {}", e)))?;

    let data = procedure.invoke(state.store.as_ref(), payload.as_ref()).await?;
    Ok(Json(ProcedureResponse::new(data)))
}

/// POST /trpc/:procedure
///
/// Invokes a mutation procedure with the request body as its JSON payload.
#[utoipa::path(
    post,
    path = "/trpc/{procedure}",
    tag = "procedures",
    params(
        ("procedure" = String, Path, description = "Mutation procedure name, e.g. createInquiry")
    ),
    responses(
        (status = 200, description = "Procedure result", body = ProcedureResponse),
        (status = 400, description = "Input failed validation", body = ErrorBody),
        (status = 404, description = "Unknown procedure or record", body = ErrorBody),
        (status = 405, description = "Procedure is a query", body = ErrorBody),
        (status = 409, description = "Referenced inquiry does not exist", body = ErrorBody)
    )
)]
pub async fn mutate_procedure(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<ProcedureResponse>, AppError> {
    let procedure = resolve(&name, ProcedureKind::Mutation)?;
    tracing::info!("POST /trpc/{} - {} byte body", procedure, body.len());

    let payload = if body.is_empty() {
        None
    } else {
        Some(
            serde_json::from_slice::<Value>(&body)
                .map_err(|e| AppError::BadRequest(format!("body is not valid JSON: {}", e)))?,
        )
    };

    let data = procedure.invoke(state.store.as_ref(), payload.as_ref()).await?;
    Ok(Json(ProcedureResponse::new(data)))
}

/// Looks up a procedure and checks it was called with the matching HTTP verb.
fn resolve(name: &str, called_as: ProcedureKind) -> Result<Procedure, AppError> {
    let procedure: Procedure = name.parse()?;
    if procedure.kind() != called_as {
        let method = match called_as {
            ProcedureKind::Query => "GET",
            ProcedureKind::Mutation => "POST",
        };
        return Err(AppError::MethodNotAllowed(format!(
            "Unsupported {} request to {} procedure at path \"{}\"",
            method,
            procedure.kind(),
            procedure
        )));
    }
    Ok(procedure)
}
