/// Property-based tests using proptest
/// Input contracts must hold for arbitrary payloads, not just hand-picked ones
mod common;

use insurance_funnel_api::models::{CreateInquiryInput, InquiryStatus, UpdateConsultationInput};
use insurance_funnel_api::registry::Procedure;
use insurance_funnel_api::store::MemoryFunnelStore;
use insurance_funnel_api::validation::{is_valid_email, ProcedureInput};
use proptest::prelude::*;
use serde_json::json;

// Property: Email validation should never panic
proptest! {
    #[test]
    fn email_validation_never_panics(email in "\\PC*") {
        let _ = is_valid_email(&email);
    }

    #[test]
    fn dotted_addresses_are_accepted(
        local in "[a-z0-9]{1,20}",
        domain in "[a-z]{1,20}",
        tld in "[a-z]{2,6}"
    ) {
        let email = format!("{}@{}.{}", local, domain, tld);
        prop_assert!(is_valid_email(&email));
    }

    #[test]
    fn addresses_without_at_are_rejected(text in "[a-z0-9.]{0,40}") {
        prop_assert!(!is_valid_email(&text));
    }
}

// Property: Payload parsing never panics and only ever reports issues
proptest! {
    #[test]
    fn arbitrary_json_never_panics(raw in "\\PC*") {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) {
            let _ = CreateInquiryInput::from_payload(&value);
            let _ = UpdateConsultationInput::from_payload(&value);
        }
    }

    #[test]
    fn well_formed_inquiries_always_accepted(
        first in "[A-Za-z]{1,20}",
        last in "[A-Za-z]{1,20}",
        family_size in proptest::option::of(1i32..20),
        interests in proptest::collection::vec("[a-z]{1,12}", 0..5),
        requested in proptest::bool::ANY
    ) {
        let mut payload = common::ana_inquiry_payload();
        payload["first_name"] = json!(first);
        payload["last_name"] = json!(last);
        payload["family_size"] = json!(family_size);
        payload["coverage_interests"] = json!(interests);
        payload["consultation_requested"] = json!(requested);

        let input = CreateInquiryInput::from_payload(&payload).unwrap();
        prop_assert_eq!(input.first_name, first);
        prop_assert_eq!(input.family_size, family_size);
        prop_assert_eq!(input.coverage_interests, interests);
        prop_assert_eq!(input.consultation_requested, requested);
    }

    #[test]
    fn non_positive_family_size_rejected(family_size in i32::MIN..=0) {
        let mut payload = common::ana_inquiry_payload();
        payload["family_size"] = json!(family_size);

        let err = CreateInquiryInput::from_payload(&payload).unwrap_err();
        prop_assert_eq!(err.issues().len(), 1);
        prop_assert_eq!(err.issues()[0].field.as_str(), "family_size");
    }
}

// Property: A created inquiry is always new, whatever status the caller sends
proptest! {
    #[test]
    fn smuggled_status_never_sticks(
        smuggled in prop::sample::select(vec![
            InquiryStatus::New,
            InquiryStatus::Contacted,
            InquiryStatus::Qualified,
            InquiryStatus::ProposalSent,
            InquiryStatus::Closed,
            InquiryStatus::NotInterested,
        ])
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let store = MemoryFunnelStore::new();
        let mut payload = common::ana_inquiry_payload();
        payload["status"] = json!(smuggled.as_str());

        let data = runtime
            .block_on(Procedure::CreateInquiry.invoke(&store, Some(&payload)))
            .unwrap();
        prop_assert_eq!(&data["status"], &json!("new"));
    }
}
