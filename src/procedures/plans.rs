use crate::errors::AppError;
use crate::models::{InsurancePlan, PlanIdInput};
use crate::store::FunnelStore;

/// getInsurancePlans
pub async fn get_insurance_plans(store: &dyn FunnelStore) -> Result<Vec<InsurancePlan>, AppError> {
    let plans = store.list_plans().await?;
    tracing::debug!("getInsurancePlans - {} plan(s)", plans.len());
    Ok(plans)
}

/// getFeaturedPlans
pub async fn get_featured_plans(store: &dyn FunnelStore) -> Result<Vec<InsurancePlan>, AppError> {
    let plans = store.list_featured_plans().await?;
    tracing::debug!("getFeaturedPlans - {} plan(s)", plans.len());
    Ok(plans)
}

/// getPlanById
///
/// A missing plan is a not-found failure, never a null success.
pub async fn get_plan_by_id(
    store: &dyn FunnelStore,
    input: PlanIdInput,
) -> Result<InsurancePlan, AppError> {
    tracing::debug!("getPlanById - id: {}", input.id);

    store
        .find_plan(input.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Insurance plan with id {} not found", input.id)))
}
