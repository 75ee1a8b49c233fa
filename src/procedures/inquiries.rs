use crate::errors::AppError;
use crate::models::{ClientInquiry, CreateInquiryInput, InquiryStatus, UpdateInquiryStatusInput};
use crate::store::FunnelStore;

/// createInquiry
///
/// Stores a contact-form submission. Every new inquiry enters the funnel as
/// `new`, whatever the caller sent.
pub async fn create_inquiry(
    store: &dyn FunnelStore,
    input: CreateInquiryInput,
) -> Result<ClientInquiry, AppError> {
    let inquiry = store.insert_inquiry(&input, InquiryStatus::New).await?;

    tracing::info!(
        "createInquiry - id: {}, consultation_requested: {}, interests: {:?}",
        inquiry.id,
        inquiry.consultation_requested,
        inquiry.coverage_interests
    );
    Ok(inquiry)
}

/// getInquiries
pub async fn get_inquiries(store: &dyn FunnelStore) -> Result<Vec<ClientInquiry>, AppError> {
    let inquiries = store.list_inquiries().await?;
    tracing::debug!("getInquiries - {} inquiry(ies)", inquiries.len());
    Ok(inquiries)
}

/// updateInquiryStatus
pub async fn update_inquiry_status(
    store: &dyn FunnelStore,
    input: UpdateInquiryStatusInput,
) -> Result<ClientInquiry, AppError> {
    let inquiry = store
        .update_inquiry_status(input.id, input.status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Client inquiry with id {} not found", input.id)))?;

    tracing::info!(
        "updateInquiryStatus - id: {}, status: {}",
        inquiry.id,
        inquiry.status.as_str()
    );
    Ok(inquiry)
}
