//! HTTP router assembly.

use crate::config::RateLimit;
use crate::errors::{ErrorBody, ErrorDetail, FieldIssue};
use crate::handlers::{self, AppState, ProcedureResponse, ProcedureResult};
use crate::models::*;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Insurance Funnel API",
        description = "Typed procedures over insurance plans, client inquiries and consultations."
    ),
    paths(
        handlers::health,
        handlers::query_procedure,
        handlers::mutate_procedure
    ),
    components(schemas(
        InsurancePlan,
        PlanCategory,
        ClientInquiry,
        IncomeRange,
        ContactMethod,
        InquiryStatus,
        Consultation,
        ConsultationType,
        ConsultationOutcome,
        PlanIdInput,
        CreateInquiryInput,
        UpdateInquiryStatusInput,
        CreateConsultationInput,
        UpdateConsultationInput,
        HealthStatus,
        ProcedureResponse,
        ProcedureResult,
        ErrorBody,
        ErrorDetail,
        FieldIssue
    )),
    tags(
        (name = "procedures", description = "Query (GET) and mutation (POST) procedures"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Builds the application router.
///
/// With a rate limit, procedure and documentation routes are throttled per
/// client IP while `/health` stays unthrottled.
pub fn build_router(state: Arc<AppState>, rate_limit: Option<RateLimit>) -> anyhow::Result<Router> {
    let procedure_routes = Router::new()
        .route(
            "/trpc/:procedure",
            get(handlers::query_procedure).post(handlers::mutate_procedure),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    let procedure_routes = match rate_limit {
        Some(limit) => {
            let governor_conf = Arc::new(
                GovernorConfigBuilder::default()
                    .per_second(limit.per_second)
                    .burst_size(limit.burst_size)
                    .key_extractor(SmartIpKeyExtractor)
                    .finish()
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid rate limit: {} req/s, burst {}",
                            limit.per_second,
                            limit.burst_size
                        )
                    })?,
            );
            procedure_routes.layer(GovernorLayer {
                config: governor_conf,
            })
        }
        None => procedure_routes,
    };

    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(procedure_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(app)
}
