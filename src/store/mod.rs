//! Persistence boundary for the three funnel record collections.

mod memory;
mod postgres;

pub use memory::MemoryFunnelStore;
pub use postgres::PgFunnelStore;

use crate::errors::AppError;
use crate::models::*;
use async_trait::async_trait;

/// Narrow insert/update/select interface the procedure layer runs against.
///
/// Each method touches at most one record (or reads one whole collection).
/// Update methods return `Ok(None)` when no record carries the identifier.
#[async_trait]
pub trait FunnelStore: Send + Sync {
    async fn list_plans(&self) -> Result<Vec<InsurancePlan>, AppError>;

    async fn list_featured_plans(&self) -> Result<Vec<InsurancePlan>, AppError>;

    async fn find_plan(&self, id: i32) -> Result<Option<InsurancePlan>, AppError>;

    /// Seeding only; plans are read-only through the procedures.
    async fn insert_plan(&self, plan: &NewInsurancePlan) -> Result<InsurancePlan, AppError>;

    async fn insert_inquiry(
        &self,
        input: &CreateInquiryInput,
        status: InquiryStatus,
    ) -> Result<ClientInquiry, AppError>;

    async fn list_inquiries(&self) -> Result<Vec<ClientInquiry>, AppError>;

    async fn update_inquiry_status(
        &self,
        id: i32,
        status: InquiryStatus,
    ) -> Result<Option<ClientInquiry>, AppError>;

    /// Inserts with no notes, no outcome and no follow-up flagged.
    ///
    /// Fails with [`AppError::Referential`] when `inquiry_id` names no inquiry.
    async fn insert_consultation(
        &self,
        input: &CreateConsultationInput,
    ) -> Result<Consultation, AppError>;

    async fn list_consultations(&self) -> Result<Vec<Consultation>, AppError>;

    async fn update_consultation(
        &self,
        input: &UpdateConsultationInput,
    ) -> Result<Option<Consultation>, AppError>;
}
