use crate::errors::AppError;
use crate::models::{Consultation, CreateConsultationInput, UpdateConsultationInput};
use crate::store::FunnelStore;

/// createConsultation
///
/// Schedules a consultation for an existing inquiry. Notes, outcome and the
/// follow-up flag start empty; the store rejects unknown inquiries.
pub async fn create_consultation(
    store: &dyn FunnelStore,
    input: CreateConsultationInput,
) -> Result<Consultation, AppError> {
    let consultation = store.insert_consultation(&input).await.map_err(|e| {
        tracing::warn!(
            "createConsultation - inquiry_id: {} rejected: {}",
            input.inquiry_id,
            e
        );
        e
    })?;

    tracing::info!(
        "createConsultation - id: {}, inquiry_id: {}, scheduled_date: {}, advisor: {}",
        consultation.id,
        consultation.inquiry_id,
        consultation.scheduled_date,
        consultation.advisor_name
    );
    Ok(consultation)
}

/// getConsultations
pub async fn get_consultations(store: &dyn FunnelStore) -> Result<Vec<Consultation>, AppError> {
    let consultations = store.list_consultations().await?;
    tracing::debug!("getConsultations - {} consultation(s)", consultations.len());
    Ok(consultations)
}

/// updateConsultation
///
/// Applies only the fields present in the request; `updated_at` is refreshed
/// even when nothing else changes.
pub async fn update_consultation(
    store: &dyn FunnelStore,
    input: UpdateConsultationInput,
) -> Result<Consultation, AppError> {
    let consultation = store
        .update_consultation(&input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Consultation with id {} not found", input.id)))?;

    tracing::info!(
        "updateConsultation - id: {}, outcome: {:?}, follow_up_required: {}",
        consultation.id,
        consultation.outcome,
        consultation.follow_up_required
    );
    Ok(consultation)
}
