//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use bigdecimal::BigDecimal;
use chrono::{TimeZone, Utc};
use insurance_funnel_api::models::*;
use insurance_funnel_api::store::{FunnelStore, MemoryFunnelStore};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

pub fn plan(name: &str, category: PlanCategory, is_featured: bool) -> NewInsurancePlan {
    NewInsurancePlan {
        name: name.to_string(),
        category,
        annual_premium: BigDecimal::from_str("12500.50").unwrap(),
        deductible: BigDecimal::from_str("1000.00").unwrap(),
        max_coverage: BigDecimal::from_str("5000000.00").unwrap(),
        coverage_details: "Global inpatient and outpatient care".to_string(),
        benefits: vec!["Private room".to_string(), "Air ambulance".to_string()],
        network_hospitals: 1200,
        worldwide_coverage: true,
        concierge_services: false,
        emergency_evacuation: true,
        dental_coverage: true,
        vision_coverage: false,
        wellness_programs: true,
        is_featured,
    }
}

/// Store holding three plans whose featured flags are `[true, false, true]`.
pub async fn store_with_plans() -> Arc<MemoryFunnelStore> {
    let store = Arc::new(MemoryFunnelStore::new());
    for (name, category, featured) in [
        ("Platinum Horizon", PlanCategory::Platinum, true),
        ("Premium Care", PlanCategory::Premium, false),
        ("Elite Sovereign", PlanCategory::Elite, true),
    ] {
        store.insert_plan(&plan(name, category, featured)).await.unwrap();
    }
    store
}

/// The Ana Lopez contact form.
pub fn ana_inquiry() -> CreateInquiryInput {
    CreateInquiryInput {
        first_name: "Ana".to_string(),
        last_name: "Lopez".to_string(),
        email: "ana@example.com".to_string(),
        phone: None,
        company: None,
        annual_income_range: Some(IncomeRange::From250kTo500k),
        family_size: Some(3),
        current_coverage: None,
        coverage_interests: vec!["dental".to_string(), "vision".to_string()],
        preferred_contact_method: ContactMethod::Email,
        message: None,
        consultation_requested: true,
    }
}

pub fn ana_inquiry_payload() -> Value {
    json!({
        "first_name": "Ana",
        "last_name": "Lopez",
        "email": "ana@example.com",
        "phone": null,
        "company": null,
        "annual_income_range": "250k-500k",
        "family_size": 3,
        "current_coverage": null,
        "coverage_interests": ["dental", "vision"],
        "preferred_contact_method": "email",
        "message": null,
        "consultation_requested": true
    })
}

pub fn consultation_for(inquiry_id: i32) -> CreateConsultationInput {
    CreateConsultationInput {
        inquiry_id,
        scheduled_date: Utc.with_ymd_and_hms(2026, 11, 2, 15, 30, 0).unwrap(),
        duration_minutes: 45,
        consultation_type: ConsultationType::Video,
        advisor_name: "Helena Ortiz".to_string(),
    }
}
