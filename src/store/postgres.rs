use super::FunnelStore;
use crate::errors::{AppError, ResultExt};
use crate::models::*;
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL-backed funnel storage.
///
/// Row-level write ordering is left to Postgres; no extra locking happens here.
#[derive(Clone)]
pub struct PgFunnelStore {
    pool: PgPool,
}

impl PgFunnelStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FunnelStore for PgFunnelStore {
    async fn list_plans(&self) -> Result<Vec<InsurancePlan>, AppError> {
        sqlx::query_as::<_, InsurancePlan>("SELECT * FROM insurance_plans ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list insurance plans")
    }

    async fn list_featured_plans(&self) -> Result<Vec<InsurancePlan>, AppError> {
        sqlx::query_as::<_, InsurancePlan>(
            "SELECT * FROM insurance_plans WHERE is_featured = TRUE ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list featured plans")
    }

    async fn find_plan(&self, id: i32) -> Result<Option<InsurancePlan>, AppError> {
        sqlx::query_as::<_, InsurancePlan>("SELECT * FROM insurance_plans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch insurance plan {}", id))
    }

    async fn insert_plan(&self, plan: &NewInsurancePlan) -> Result<InsurancePlan, AppError> {
        sqlx::query_as::<_, InsurancePlan>(
            r#"
            INSERT INTO insurance_plans (
                name, category, annual_premium, deductible, max_coverage,
                coverage_details, benefits, network_hospitals,
                worldwide_coverage, concierge_services, emergency_evacuation,
                dental_coverage, vision_coverage, wellness_programs, is_featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(&plan.name)
        .bind(plan.category)
        .bind(&plan.annual_premium)
        .bind(&plan.deductible)
        .bind(&plan.max_coverage)
        .bind(&plan.coverage_details)
        .bind(plan.benefits.as_slice())
        .bind(plan.network_hospitals)
        .bind(plan.worldwide_coverage)
        .bind(plan.concierge_services)
        .bind(plan.emergency_evacuation)
        .bind(plan.dental_coverage)
        .bind(plan.vision_coverage)
        .bind(plan.wellness_programs)
        .bind(plan.is_featured)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to insert insurance plan '{}'", plan.name))
    }

    async fn insert_inquiry(
        &self,
        input: &CreateInquiryInput,
        status: InquiryStatus,
    ) -> Result<ClientInquiry, AppError> {
        sqlx::query_as::<_, ClientInquiry>(
            r#"
            INSERT INTO client_inquiries (
                first_name, last_name, email, phone, company,
                annual_income_range, family_size, current_coverage,
                coverage_interests, preferred_contact_method, message,
                consultation_requested, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.company)
        .bind(input.annual_income_range)
        .bind(input.family_size)
        .bind(&input.current_coverage)
        .bind(input.coverage_interests.as_slice())
        .bind(input.preferred_contact_method)
        .bind(&input.message)
        .bind(input.consultation_requested)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert client inquiry")
    }

    async fn list_inquiries(&self) -> Result<Vec<ClientInquiry>, AppError> {
        sqlx::query_as::<_, ClientInquiry>("SELECT * FROM client_inquiries ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list client inquiries")
    }

    async fn update_inquiry_status(
        &self,
        id: i32,
        status: InquiryStatus,
    ) -> Result<Option<ClientInquiry>, AppError> {
        sqlx::query_as::<_, ClientInquiry>(
            "UPDATE client_inquiries SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to update status of inquiry {}", id))
    }

    async fn insert_consultation(
        &self,
        input: &CreateConsultationInput,
    ) -> Result<Consultation, AppError> {
        let result = sqlx::query_as::<_, Consultation>(
            r#"
            INSERT INTO consultations (
                inquiry_id, scheduled_date, duration_minutes, consultation_type,
                advisor_name, notes, outcome, follow_up_required
            )
            VALUES ($1, $2, $3, $4, $5, NULL, NULL, FALSE)
            RETURNING *
            "#,
        )
        .bind(input.inquiry_id)
        .bind(input.scheduled_date)
        .bind(input.duration_minutes)
        .bind(input.consultation_type)
        .bind(&input.advisor_name)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(consultation) => Ok(consultation),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(AppError::Referential(format!(
                    "Client inquiry with id {} does not exist",
                    input.inquiry_id
                )))
            }
            Err(e) => Err(e).context("Failed to insert consultation"),
        }
    }

    async fn list_consultations(&self) -> Result<Vec<Consultation>, AppError> {
        sqlx::query_as::<_, Consultation>("SELECT * FROM consultations ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list consultations")
    }

    async fn update_consultation(
        &self,
        input: &UpdateConsultationInput,
    ) -> Result<Option<Consultation>, AppError> {
        // Absent fields keep their stored value; explicit nulls clear them.
        sqlx::query_as::<_, Consultation>(
            r#"
            UPDATE consultations SET
                notes = CASE WHEN $2 THEN $3 ELSE notes END,
                outcome = CASE WHEN $4 THEN $5::consultation_outcome ELSE outcome END,
                follow_up_required = COALESCE($6, follow_up_required),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(input.id)
        .bind(!input.notes.is_unchanged())
        .bind(input.notes.value().cloned())
        .bind(!input.outcome.is_unchanged())
        .bind(input.outcome.value().copied())
        .bind(input.follow_up_required)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to update consultation {}", input.id))
    }
}
