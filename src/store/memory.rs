use super::FunnelStore;
use crate::errors::AppError;
use crate::models::*;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    plans: Vec<InsurancePlan>,
    inquiries: Vec<ClientInquiry>,
    consultations: Vec<Consultation>,
    last_plan_id: i32,
    last_inquiry_id: i32,
    last_consultation_id: i32,
}

/// Process-local funnel storage for tests and database-less development.
///
/// Writes are serialized behind one lock; identifiers count up from 1 per
/// collection the way `SERIAL` columns do.
#[derive(Default)]
pub struct MemoryFunnelStore {
    tables: RwLock<Tables>,
}

impl MemoryFunnelStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FunnelStore for MemoryFunnelStore {
    async fn list_plans(&self) -> Result<Vec<InsurancePlan>, AppError> {
        Ok(self.tables.read().await.plans.clone())
    }

    async fn list_featured_plans(&self) -> Result<Vec<InsurancePlan>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .plans
            .iter()
            .filter(|plan| plan.is_featured)
            .cloned()
            .collect())
    }

    async fn find_plan(&self, id: i32) -> Result<Option<InsurancePlan>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.plans.iter().find(|plan| plan.id == id).cloned())
    }

    async fn insert_plan(&self, plan: &NewInsurancePlan) -> Result<InsurancePlan, AppError> {
        let mut tables = self.tables.write().await;
        tables.last_plan_id += 1;
        let now = Utc::now();

        let record = InsurancePlan {
            id: tables.last_plan_id,
            name: plan.name.clone(),
            category: plan.category,
            annual_premium: plan.annual_premium.clone(),
            deductible: plan.deductible.clone(),
            max_coverage: plan.max_coverage.clone(),
            coverage_details: plan.coverage_details.clone(),
            benefits: plan.benefits.clone(),
            network_hospitals: plan.network_hospitals,
            worldwide_coverage: plan.worldwide_coverage,
            concierge_services: plan.concierge_services,
            emergency_evacuation: plan.emergency_evacuation,
            dental_coverage: plan.dental_coverage,
            vision_coverage: plan.vision_coverage,
            wellness_programs: plan.wellness_programs,
            is_featured: plan.is_featured,
            created_at: now,
            updated_at: now,
        };
        tables.plans.push(record.clone());
        Ok(record)
    }

    async fn insert_inquiry(
        &self,
        input: &CreateInquiryInput,
        status: InquiryStatus,
    ) -> Result<ClientInquiry, AppError> {
        let mut tables = self.tables.write().await;
        tables.last_inquiry_id += 1;
        let now = Utc::now();

        let record = ClientInquiry {
            id: tables.last_inquiry_id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            company: input.company.clone(),
            annual_income_range: input.annual_income_range,
            family_size: input.family_size,
            current_coverage: input.current_coverage.clone(),
            coverage_interests: input.coverage_interests.clone(),
            preferred_contact_method: input.preferred_contact_method,
            message: input.message.clone(),
            consultation_requested: input.consultation_requested,
            status,
            created_at: now,
            updated_at: now,
        };
        tables.inquiries.push(record.clone());
        Ok(record)
    }

    async fn list_inquiries(&self) -> Result<Vec<ClientInquiry>, AppError> {
        Ok(self.tables.read().await.inquiries.clone())
    }

    async fn update_inquiry_status(
        &self,
        id: i32,
        status: InquiryStatus,
    ) -> Result<Option<ClientInquiry>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(record) = tables.inquiries.iter_mut().find(|inquiry| inquiry.id == id) else {
            return Ok(None);
        };
        record.status = status;
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn insert_consultation(
        &self,
        input: &CreateConsultationInput,
    ) -> Result<Consultation, AppError> {
        let mut tables = self.tables.write().await;
        if !tables
            .inquiries
            .iter()
            .any(|inquiry| inquiry.id == input.inquiry_id)
        {
            return Err(AppError::Referential(format!(
                "Client inquiry with id {} does not exist",
                input.inquiry_id
            )));
        }

        tables.last_consultation_id += 1;
        let now = Utc::now();
        let record = Consultation {
            id: tables.last_consultation_id,
            inquiry_id: input.inquiry_id,
            scheduled_date: input.scheduled_date,
            duration_minutes: input.duration_minutes,
            consultation_type: input.consultation_type,
            advisor_name: input.advisor_name.clone(),
            notes: None,
            outcome: None,
            follow_up_required: false,
            created_at: now,
            updated_at: now,
        };
        tables.consultations.push(record.clone());
        Ok(record)
    }

    async fn list_consultations(&self) -> Result<Vec<Consultation>, AppError> {
        Ok(self.tables.read().await.consultations.clone())
    }

    async fn update_consultation(
        &self,
        input: &UpdateConsultationInput,
    ) -> Result<Option<Consultation>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(record) = tables
            .consultations
            .iter_mut()
            .find(|consultation| consultation.id == input.id)
        else {
            return Ok(None);
        };

        input.notes.clone().apply(&mut record.notes);
        input.outcome.clone().apply(&mut record.outcome);
        if let Some(follow_up_required) = input.follow_up_required {
            record.follow_up_required = follow_up_required;
        }
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }
}
