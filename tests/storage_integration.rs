use std::env;

use insurance_funnel_api::db::Database;
use insurance_funnel_api::errors::AppError;
use insurance_funnel_api::models::{InquiryStatus, Patch, PlanCategory, UpdateConsultationInput};
use insurance_funnel_api::store::{FunnelStore, PgFunnelStore};

mod common;

async fn connect() -> anyhow::Result<PgFunnelStore> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::new(&db_url, 2).await?;
    db.ensure_schema().await?;
    Ok(PgFunnelStore::new(db.pool.clone()))
}

/// Smoke test for the Postgres store covering the whole funnel.
/// Marked ignored because it writes rows; set TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn funnel_round_trip_smoke_test() -> anyhow::Result<()> {
    let store = connect().await?;

    let plan = store
        .insert_plan(&common::plan("Smoke Test Plan", PlanCategory::Executive, true))
        .await?;
    assert_eq!(plan.annual_premium.to_string(), "12500.50");
    assert!(store.find_plan(plan.id).await?.is_some());
    assert!(store
        .list_featured_plans()
        .await?
        .iter()
        .any(|p| p.id == plan.id));

    let inquiry = store
        .insert_inquiry(&common::ana_inquiry(), InquiryStatus::New)
        .await?;
    assert_eq!(inquiry.status, InquiryStatus::New);

    let qualified = store
        .update_inquiry_status(inquiry.id, InquiryStatus::Qualified)
        .await?
        .ok_or_else(|| anyhow::anyhow!("inquiry vanished"))?;
    assert!(qualified.updated_at >= inquiry.updated_at);

    let consultation = store
        .insert_consultation(&common::consultation_for(inquiry.id))
        .await?;
    assert_eq!(consultation.outcome, None);

    let updated = store
        .update_consultation(&UpdateConsultationInput {
            id: consultation.id,
            notes: Patch::Set("smoke".to_string()),
            ..Default::default()
        })
        .await?
        .ok_or_else(|| anyhow::anyhow!("consultation vanished"))?;
    assert_eq!(updated.notes.as_deref(), Some("smoke"));
    assert!(!updated.follow_up_required);

    Ok(())
}

#[tokio::test]
#[ignore]
async fn dangling_inquiry_reference_is_rejected() -> anyhow::Result<()> {
    let store = connect().await?;

    let err = store
        .insert_consultation(&common::consultation_for(-1))
        .await
        .unwrap_err();
    assert!(matches!(err.root(), AppError::Referential(_)));
    Ok(())
}
