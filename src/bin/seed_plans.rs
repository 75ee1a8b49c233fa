//! Seeds the insurance plan catalogue.
//!
//! Plans are never created through the procedure layer; this tool writes the
//! catalogue directly. It does nothing when plans already exist unless run
//! with `--force`.

use bigdecimal::BigDecimal;
use dotenvy::dotenv;
use insurance_funnel_api::db::Database;
use insurance_funnel_api::models::{NewInsurancePlan, PlanCategory};
use insurance_funnel_api::store::{FunnelStore, PgFunnelStore};
use std::env;
use std::str::FromStr;

fn money(amount: &str) -> anyhow::Result<BigDecimal> {
    BigDecimal::from_str(amount).map_err(|e| anyhow::anyhow!("bad amount '{}': {}", amount, e))
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn catalogue() -> anyhow::Result<Vec<NewInsurancePlan>> {
    Ok(vec![
        NewInsurancePlan {
            name: "Premium Care".to_string(),
            category: PlanCategory::Premium,
            annual_premium: money("8500.00")?,
            deductible: money("2500.00")?,
            max_coverage: money("2000000.00")?,
            coverage_details: "Comprehensive inpatient and outpatient care across the national network."
                .to_string(),
            benefits: labels(&["Private room", "Specialist access", "Annual check-up"]),
            network_hospitals: 850,
            worldwide_coverage: false,
            concierge_services: false,
            emergency_evacuation: false,
            dental_coverage: true,
            vision_coverage: false,
            wellness_programs: true,
            is_featured: false,
        },
        NewInsurancePlan {
            name: "Platinum Horizon".to_string(),
            category: PlanCategory::Platinum,
            annual_premium: money("14500.00")?,
            deductible: money("1000.00")?,
            max_coverage: money("5000000.00")?,
            coverage_details: "Worldwide cover with dental and vision included.".to_string(),
            benefits: labels(&[
                "Worldwide network",
                "Second medical opinion",
                "Dental and vision",
            ]),
            network_hospitals: 2400,
            worldwide_coverage: true,
            concierge_services: false,
            emergency_evacuation: true,
            dental_coverage: true,
            vision_coverage: true,
            wellness_programs: true,
            is_featured: true,
        },
        NewInsurancePlan {
            name: "Executive Select".to_string(),
            category: PlanCategory::Executive,
            annual_premium: money("22000.00")?,
            deductible: money("500.00")?,
            max_coverage: money("10000000.00")?,
            coverage_details: "Corporate-grade cover with a dedicated care coordinator.".to_string(),
            benefits: labels(&[
                "Care coordinator",
                "Executive health screening",
                "Travel medical assistance",
            ]),
            network_hospitals: 3100,
            worldwide_coverage: true,
            concierge_services: true,
            emergency_evacuation: true,
            dental_coverage: true,
            vision_coverage: true,
            wellness_programs: true,
            is_featured: false,
        },
        NewInsurancePlan {
            name: "Elite Sovereign".to_string(),
            category: PlanCategory::Elite,
            annual_premium: money("48000.00")?,
            deductible: money("0.00")?,
            max_coverage: money("9999999999.99")?,
            coverage_details: "Unrestricted global cover with 24/7 concierge medicine.".to_string(),
            benefits: labels(&[
                "24/7 concierge physician",
                "Air ambulance",
                "Family coverage",
                "Longevity programme",
            ]),
            network_hospitals: 4200,
            worldwide_coverage: true,
            concierge_services: true,
            emergency_evacuation: true,
            dental_coverage: true,
            vision_coverage: true,
            wellness_programs: true,
            is_featured: true,
        },
    ])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let force = env::args().any(|arg| arg == "--force");
    let database_url = env::var("DATABASE_URL")
        .or_else(|_| env::var("DB_URL"))
        .map_err(|_| anyhow::anyhow!("DATABASE_URL or DB_URL must be set"))?;

    let db = Database::new(&database_url, 2).await?;
    db.ensure_schema().await?;
    let store = PgFunnelStore::new(db.pool.clone());

    let existing = store.list_plans().await?;
    if !existing.is_empty() && !force {
        println!(
            "{} plan(s) already present, nothing to do (pass --force to add the catalogue anyway)",
            existing.len()
        );
        return Ok(());
    }

    for plan in catalogue()? {
        plan.validate()?;
        let stored = store.insert_plan(&plan).await?;
        println!(
            "- #{} {} ({:?}, featured: {})",
            stored.id, stored.name, stored.category, stored.is_featured
        );
    }

    Ok(())
}
