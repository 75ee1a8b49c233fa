//! Binds procedure names to handlers.
//!
//! The registry is the only place that knows which procedures exist, whether
//! each one is a query or a mutation, and which input contract it declares.

use crate::errors::AppError;
use crate::models::HealthStatus;
use crate::procedures::{consultations, inquiries, plans};
use crate::store::FunnelStore;
use crate::validation::ProcedureInput;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Payload handed to procedures without an input contract.
static NO_INPUT: Value = Value::Null;

/// Read-only or read-write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcedureKind::Query => write!(f, "query"),
            ProcedureKind::Mutation => write!(f, "mutation"),
        }
    }
}

/// Every procedure the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    Healthcheck,
    GetInsurancePlans,
    GetFeaturedPlans,
    GetPlanById,
    CreateInquiry,
    GetInquiries,
    UpdateInquiryStatus,
    CreateConsultation,
    GetConsultations,
    UpdateConsultation,
}

impl Procedure {
    pub const ALL: [Procedure; 10] = [
        Procedure::Healthcheck,
        Procedure::GetInsurancePlans,
        Procedure::GetFeaturedPlans,
        Procedure::GetPlanById,
        Procedure::CreateInquiry,
        Procedure::GetInquiries,
        Procedure::UpdateInquiryStatus,
        Procedure::CreateConsultation,
        Procedure::GetConsultations,
        Procedure::UpdateConsultation,
    ];

    /// Name callers use on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Procedure::Healthcheck => "healthcheck",
            Procedure::GetInsurancePlans => "getInsurancePlans",
            Procedure::GetFeaturedPlans => "getFeaturedPlans",
            Procedure::GetPlanById => "getPlanById",
            Procedure::CreateInquiry => "createInquiry",
            Procedure::GetInquiries => "getInquiries",
            Procedure::UpdateInquiryStatus => "updateInquiryStatus",
            Procedure::CreateConsultation => "createConsultation",
            Procedure::GetConsultations => "getConsultations",
            Procedure::UpdateConsultation => "updateConsultation",
        }
    }

    pub fn kind(self) -> ProcedureKind {
        match self {
            Procedure::CreateInquiry
            | Procedure::UpdateInquiryStatus
            | Procedure::CreateConsultation
            | Procedure::UpdateConsultation => ProcedureKind::Mutation,
            Procedure::Healthcheck
            | Procedure::GetInsurancePlans
            | Procedure::GetFeaturedPlans
            | Procedure::GetPlanById
            | Procedure::GetInquiries
            | Procedure::GetConsultations => ProcedureKind::Query,
        }
    }

    /// Whether the procedure declares an input contract.
    pub fn requires_input(self) -> bool {
        matches!(
            self,
            Procedure::GetPlanById
                | Procedure::CreateInquiry
                | Procedure::UpdateInquiryStatus
                | Procedure::CreateConsultation
                | Procedure::UpdateConsultation
        )
    }

    /// Validates `payload` against the procedure's contract and runs it.
    ///
    /// Procedures without an input contract ignore any payload.
    pub async fn invoke(
        self,
        store: &dyn FunnelStore,
        payload: Option<&Value>,
    ) -> Result<Value, AppError> {
        let payload = match (self.requires_input(), payload) {
            (true, Some(payload)) => payload,
            (true, None) => return Err(AppError::invalid_field("input", "is required")),
            (false, _) => &NO_INPUT,
        };

        match self {
            Procedure::Healthcheck => to_json(HealthStatus::now()),
            Procedure::GetInsurancePlans => to_json(plans::get_insurance_plans(store).await?),
            Procedure::GetFeaturedPlans => to_json(plans::get_featured_plans(store).await?),
            Procedure::GetPlanById => {
                let input = parse_input(payload)?;
                to_json(plans::get_plan_by_id(store, input).await?)
            }
            Procedure::CreateInquiry => {
                let input = parse_input(payload)?;
                to_json(inquiries::create_inquiry(store, input).await?)
            }
            Procedure::GetInquiries => to_json(inquiries::get_inquiries(store).await?),
            Procedure::UpdateInquiryStatus => {
                let input = parse_input(payload)?;
                to_json(inquiries::update_inquiry_status(store, input).await?)
            }
            Procedure::CreateConsultation => {
                let input = parse_input(payload)?;
                to_json(consultations::create_consultation(store, input).await?)
            }
            Procedure::GetConsultations => to_json(consultations::get_consultations(store).await?),
            Procedure::UpdateConsultation => {
                let input = parse_input(payload)?;
                to_json(consultations::update_consultation(store, input).await?)
            }
        }
    }
}

impl FromStr for Procedure {
    type Err = AppError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Procedure::ALL
            .into_iter()
            .find(|procedure| procedure.name() == name)
            .ok_or_else(|| AppError::NotFound(format!("No procedure found on path \"{}\"", name)))
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_input<T: ProcedureInput>(payload: &Value) -> Result<T, AppError> {
    T::from_payload(payload)
}

fn to_json<T: Serialize>(value: T) -> Result<Value, AppError> {
    Ok(serde_json::to_value(value)?)
}
