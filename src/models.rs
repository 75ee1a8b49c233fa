use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;

// ============ Closed-set Enumerations ============

/// Tier an insurance plan is sold under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "plan_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanCategory {
    Premium,
    Platinum,
    Executive,
    Elite,
}

/// Self-reported annual income band of a prospective client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "income_range")]
pub enum IncomeRange {
    #[serde(rename = "100k-250k")]
    #[sqlx(rename = "100k-250k")]
    From100kTo250k,
    #[serde(rename = "250k-500k")]
    #[sqlx(rename = "250k-500k")]
    From250kTo500k,
    #[serde(rename = "500k-1m")]
    #[sqlx(rename = "500k-1m")]
    From500kTo1m,
    #[serde(rename = "1m-5m")]
    #[sqlx(rename = "1m-5m")]
    From1mTo5m,
    #[serde(rename = "5m+")]
    #[sqlx(rename = "5m+")]
    Above5m,
}

/// How the client prefers to be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contact_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Email,
    Phone,
    VideoCall,
}

/// Position of an inquiry in the sales funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "inquiry_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    New,
    Contacted,
    Qualified,
    ProposalSent,
    Closed,
    NotInterested,
}

impl InquiryStatus {
    /// Wire/storage name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Contacted => "contacted",
            InquiryStatus::Qualified => "qualified",
            InquiryStatus::ProposalSent => "proposal_sent",
            InquiryStatus::Closed => "closed",
            InquiryStatus::NotInterested => "not_interested",
        }
    }
}

/// Channel a consultation is held over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "consultation_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConsultationType {
    Phone,
    Video,
    InPerson,
}

/// Recorded result of a consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "consultation_outcome", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConsultationOutcome {
    Scheduled,
    Completed,
    Rescheduled,
    Cancelled,
    NoShow,
}

// ============ Database Models ============

/// A sellable insurance product.
///
/// Plans are seeded out-of-band and are read-only through the procedure layer.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, ToSchema)]
pub struct InsurancePlan {
    /// Server-assigned identifier.
    pub id: i32,
    /// Display name of the plan.
    #[schema(example = "Global Elite Shield")]
    pub name: String,
    /// Tier of the plan.
    pub category: PlanCategory,
    /// Yearly premium, two decimal places.
    #[schema(value_type = String, example = "12500.00")]
    pub annual_premium: BigDecimal,
    /// Deductible, two decimal places.
    #[schema(value_type = String, example = "1000.00")]
    pub deductible: BigDecimal,
    /// Maximum covered amount, two decimal places.
    #[schema(value_type = String, example = "5000000.00")]
    pub max_coverage: BigDecimal,
    /// Free-text description of what is covered.
    pub coverage_details: String,
    /// Ordered list of benefit labels.
    pub benefits: Vec<String>,
    /// Number of hospitals in the plan's network.
    pub network_hospitals: i32,
    pub worldwide_coverage: bool,
    pub concierge_services: bool,
    pub emergency_evacuation: bool,
    pub dental_coverage: bool,
    pub vision_coverage: bool,
    pub wellness_programs: bool,
    /// Whether the plan is highlighted on the landing page.
    pub is_featured: bool,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last update.
    pub updated_at: DateTime<Utc>,
}

/// A prospective client's contact-form submission.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, ToSchema)]
pub struct ClientInquiry {
    /// Server-assigned identifier.
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub annual_income_range: Option<IncomeRange>,
    /// Strictly positive when present.
    pub family_size: Option<i32>,
    pub current_coverage: Option<String>,
    /// Coverage areas the client is interested in; possibly empty.
    pub coverage_interests: Vec<String>,
    pub preferred_contact_method: ContactMethod,
    pub message: Option<String>,
    pub consultation_requested: bool,
    /// Funnel position, `new` at creation.
    pub status: InquiryStatus,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last update.
    pub updated_at: DateTime<Utc>,
}

/// An advisory meeting tied to one inquiry.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, ToSchema)]
pub struct Consultation {
    /// Server-assigned identifier.
    pub id: i32,
    /// Foreign key to `client_inquiries`.
    pub inquiry_id: i32,
    pub scheduled_date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub consultation_type: ConsultationType,
    pub advisor_name: String,
    pub notes: Option<String>,
    pub outcome: Option<ConsultationOutcome>,
    pub follow_up_required: bool,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last update.
    pub updated_at: DateTime<Utc>,
}

// ============ Procedure Inputs ============

/// Input of `getPlanById`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PlanIdInput {
    pub id: i32,
}

/// Input of `createInquiry`. Status is not caller-settable.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CreateInquiryInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub annual_income_range: Option<IncomeRange>,
    pub family_size: Option<i32>,
    pub current_coverage: Option<String>,
    pub coverage_interests: Vec<String>,
    pub preferred_contact_method: ContactMethod,
    pub message: Option<String>,
    pub consultation_requested: bool,
}

/// Input of `updateInquiryStatus`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UpdateInquiryStatusInput {
    pub id: i32,
    pub status: InquiryStatus,
}

/// Input of `createConsultation`. Notes, outcome and follow-up are set by the server.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CreateConsultationInput {
    pub inquiry_id: i32,
    pub scheduled_date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub consultation_type: ConsultationType,
    pub advisor_name: String,
}

/// Input of `updateConsultation`. Only the fields present in the payload change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
pub struct UpdateConsultationInput {
    pub id: i32,
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    #[schema(value_type = Option<String>)]
    pub notes: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    #[schema(value_type = Option<ConsultationOutcome>)]
    pub outcome: Patch<ConsultationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_required: Option<bool>,
}

/// Presence-aware update of a nullable column.
///
/// `Unchanged` means the key was absent from the payload, `Clear` means it was
/// an explicit `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Patch::Unchanged)
    }

    /// The new column value, if the patch touches the column at all.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unchanged | Patch::Clear => None,
        }
    }

    /// Applies the patch to a stored value.
    pub fn apply(self, target: &mut Option<T>) {
        match self {
            Patch::Unchanged => {}
            Patch::Clear => *target = None,
            Patch::Set(value) => *target = Some(value),
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// A plan row as written by the seeding tool.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInsurancePlan {
    pub name: String,
    pub category: PlanCategory,
    pub annual_premium: BigDecimal,
    pub deductible: BigDecimal,
    pub max_coverage: BigDecimal,
    pub coverage_details: String,
    pub benefits: Vec<String>,
    pub network_hospitals: i32,
    pub worldwide_coverage: bool,
    pub concierge_services: bool,
    pub emergency_evacuation: bool,
    pub dental_coverage: bool,
    pub vision_coverage: bool,
    pub wellness_programs: bool,
    pub is_featured: bool,
}

// ============ Misc Responses ============

/// Liveness payload of the `healthcheck` procedure.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    pub fn now() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
        }
    }
}
