//! Input contracts for every procedure.
//!
//! Payloads are checked field by field so that a rejected request names every
//! offending field, not just the first serde error. Keys that are not part of
//! a contract are ignored.

use crate::errors::{AppError, FieldIssue};
use crate::models::*;
use bigdecimal::{BigDecimal, Zero};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use std::sync::LazyLock;

/// Simplified RFC 5322 address: `local@label(.label)+`.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email pattern is a valid regex")
});

/// Checks an address against the email syntax accepted by `createInquiry`.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// A procedure input that can be built from a raw JSON payload.
pub trait ProcedureInput: Sized {
    fn from_payload(payload: &Value) -> Result<Self, AppError>;
}

/// Reads typed fields out of a JSON object while collecting issues.
///
/// Every accessor returns `None` exactly when it recorded an issue for its
/// field, so a caller holding `Some` for every field has a valid input.
pub struct FieldReader<'a> {
    object: Option<&'a Map<String, Value>>,
    issues: Vec<FieldIssue>,
}

impl<'a> FieldReader<'a> {
    pub fn new(payload: &'a Value) -> Self {
        let object = payload.as_object();
        let mut issues = Vec::new();
        if object.is_none() {
            issues.push(FieldIssue::new(
                "input",
                format!("expected an object, received {}", json_kind(payload)),
            ));
        }
        Self { object, issues }
    }

    fn lookup(&self, field: &str) -> Option<&'a Value> {
        self.object.and_then(|object| object.get(field))
    }

    fn reject<T>(&mut self, field: &str, message: impl Into<String>) -> Option<T> {
        self.issues.push(FieldIssue::new(field, message));
        None
    }

    fn decode<T: DeserializeOwned>(&mut self, field: &str, value: &Value) -> Option<T> {
        match T::deserialize(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => self.reject(field, err.to_string()),
        }
    }

    /// A key that must be present and non-null.
    pub fn required<T: DeserializeOwned>(&mut self, field: &str) -> Option<T> {
        self.object?;
        match self.lookup(field) {
            None => self.reject(field, "is required"),
            Some(Value::Null) => self.reject(field, "must not be null"),
            Some(value) => self.decode(field, value),
        }
    }

    /// A key that must be present but may be `null`.
    pub fn nullable<T: DeserializeOwned>(&mut self, field: &str) -> Option<Option<T>> {
        self.object?;
        match self.lookup(field) {
            None => self.reject(field, "is required (send null to leave it empty)"),
            Some(Value::Null) => Some(None),
            Some(value) => self.decode(field, value).map(Some),
        }
    }

    /// A key that may be absent but must not be `null`.
    pub fn optional<T: DeserializeOwned>(&mut self, field: &str) -> Option<Option<T>> {
        self.object?;
        match self.lookup(field) {
            None => Some(None),
            Some(Value::Null) => self.reject(field, "must not be null"),
            Some(value) => self.decode(field, value).map(Some),
        }
    }

    /// A nullable key whose absence means "leave unchanged".
    pub fn patch<T: DeserializeOwned>(&mut self, field: &str) -> Option<Patch<T>> {
        self.object?;
        match self.lookup(field) {
            None => Some(Patch::Unchanged),
            Some(Value::Null) => Some(Patch::Clear),
            Some(value) => self.decode(field, value).map(Patch::Set),
        }
    }

    pub fn non_empty_string(&mut self, field: &str) -> Option<String> {
        let value: String = self.required(field)?;
        if value.is_empty() {
            return self.reject(field, "must contain at least 1 character");
        }
        Some(value)
    }

    pub fn email(&mut self, field: &str) -> Option<String> {
        let value: String = self.required(field)?;
        if !is_valid_email(&value) {
            return self.reject(field, "must be a valid email address");
        }
        Some(value)
    }

    /// An integer record identifier, widened to `i64`.
    ///
    /// Integers past `i64::MAX` saturate; no stored row can carry them.
    pub fn record_id(&mut self, field: &str) -> Option<i64> {
        let number: Number = self.required(field)?;
        match (number.as_i64(), number.is_u64()) {
            (Some(value), _) => Some(value),
            (None, true) => Some(i64::MAX),
            (None, false) => self.reject(field, "must be an integer"),
        }
    }

    pub fn positive_int(&mut self, field: &str) -> Option<i32> {
        let value: i32 = self.required(field)?;
        if value <= 0 {
            return self.reject(field, "must be a positive integer");
        }
        Some(value)
    }

    pub fn nullable_positive_int(&mut self, field: &str) -> Option<Option<i32>> {
        match self.nullable::<i32>(field)? {
            Some(value) if value <= 0 => self.reject(field, "must be a positive integer"),
            other => Some(other),
        }
    }

    /// Consumes the reader, failing if any issue was recorded.
    pub fn finish(self) -> Result<(), AppError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.issues))
        }
    }

    /// Consumes the reader into the validation failure it describes.
    pub fn into_error(self) -> AppError {
        if self.issues.is_empty() {
            AppError::InternalError("field reader rejected input without an issue".to_string())
        } else {
            AppError::Validation(self.issues)
        }
    }
}

/// Narrows a decoded identifier to the stored column width.
///
/// Identifiers outside `i32` cannot match a row, so they fail the same way a
/// missing row does.
fn stored_id(id: i64, missing: impl FnOnce(i64) -> AppError) -> Result<i32, AppError> {
    i32::try_from(id).map_err(|_| missing(id))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl ProcedureInput for PlanIdInput {
    fn from_payload(payload: &Value) -> Result<Self, AppError> {
        let mut fields = FieldReader::new(payload);
        let Some(id) = fields.record_id("id") else {
            return Err(fields.into_error());
        };
        fields.finish()?;
        let id = stored_id(id, |id| {
            AppError::NotFound(format!("Insurance plan with id {} not found", id))
        })?;
        Ok(Self { id })
    }
}

impl ProcedureInput for CreateInquiryInput {
    fn from_payload(payload: &Value) -> Result<Self, AppError> {
        let mut fields = FieldReader::new(payload);

        let first_name = fields.non_empty_string("first_name");
        let last_name = fields.non_empty_string("last_name");
        let email = fields.email("email");
        let phone = fields.nullable("phone");
        let company = fields.nullable("company");
        let annual_income_range = fields.nullable("annual_income_range");
        let family_size = fields.nullable_positive_int("family_size");
        let current_coverage = fields.nullable("current_coverage");
        let coverage_interests = fields.required("coverage_interests");
        let preferred_contact_method = fields.required("preferred_contact_method");
        let message = fields.nullable("message");
        let consultation_requested = fields.required("consultation_requested");

        let (
            Some(first_name),
            Some(last_name),
            Some(email),
            Some(phone),
            Some(company),
            Some(annual_income_range),
            Some(family_size),
            Some(current_coverage),
            Some(coverage_interests),
            Some(preferred_contact_method),
            Some(message),
            Some(consultation_requested),
        ) = (
            first_name,
            last_name,
            email,
            phone,
            company,
            annual_income_range,
            family_size,
            current_coverage,
            coverage_interests,
            preferred_contact_method,
            message,
            consultation_requested,
        )
        else {
            return Err(fields.into_error());
        };
        fields.finish()?;

        Ok(Self {
            first_name,
            last_name,
            email,
            phone,
            company,
            annual_income_range,
            family_size,
            current_coverage,
            coverage_interests,
            preferred_contact_method,
            message,
            consultation_requested,
        })
    }
}

impl ProcedureInput for UpdateInquiryStatusInput {
    fn from_payload(payload: &Value) -> Result<Self, AppError> {
        let mut fields = FieldReader::new(payload);
        let id = fields.record_id("id");
        let status = fields.required("status");

        let (Some(id), Some(status)) = (id, status) else {
            return Err(fields.into_error());
        };
        fields.finish()?;
        let id = stored_id(id, |id| {
            AppError::NotFound(format!("Client inquiry with id {} not found", id))
        })?;
        Ok(Self { id, status })
    }
}

impl ProcedureInput for CreateConsultationInput {
    fn from_payload(payload: &Value) -> Result<Self, AppError> {
        let mut fields = FieldReader::new(payload);
        let inquiry_id = fields.record_id("inquiry_id");
        let scheduled_date = fields.required("scheduled_date");
        let duration_minutes = fields.positive_int("duration_minutes");
        let consultation_type = fields.required("consultation_type");
        let advisor_name = fields.non_empty_string("advisor_name");

        let (
            Some(inquiry_id),
            Some(scheduled_date),
            Some(duration_minutes),
            Some(consultation_type),
            Some(advisor_name),
        ) = (
            inquiry_id,
            scheduled_date,
            duration_minutes,
            consultation_type,
            advisor_name,
        )
        else {
            return Err(fields.into_error());
        };
        fields.finish()?;
        let inquiry_id = stored_id(inquiry_id, |id| {
            AppError::Referential(format!("Client inquiry with id {} does not exist", id))
        })?;

        Ok(Self {
            inquiry_id,
            scheduled_date,
            duration_minutes,
            consultation_type,
            advisor_name,
        })
    }
}

impl ProcedureInput for UpdateConsultationInput {
    fn from_payload(payload: &Value) -> Result<Self, AppError> {
        let mut fields = FieldReader::new(payload);
        let id = fields.record_id("id");
        let notes = fields.patch("notes");
        let outcome = fields.patch("outcome");
        let follow_up_required = fields.optional("follow_up_required");

        let (Some(id), Some(notes), Some(outcome), Some(follow_up_required)) =
            (id, notes, outcome, follow_up_required)
        else {
            return Err(fields.into_error());
        };
        fields.finish()?;
        let id = stored_id(id, |id| {
            AppError::NotFound(format!("Consultation with id {} not found", id))
        })?;

        Ok(Self {
            id,
            notes,
            outcome,
            follow_up_required,
        })
    }
}

impl NewInsurancePlan {
    /// Checks the catalogue invariants before a plan is written.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(FieldIssue::new("name", "must contain at least 1 character"));
        }
        let money = [
            ("annual_premium", &self.annual_premium),
            ("deductible", &self.deductible),
            ("max_coverage", &self.max_coverage),
        ];
        for (field, amount) in money {
            if *amount < BigDecimal::zero() {
                issues.push(FieldIssue::new(field, "must not be negative"));
            }
        }
        if self.network_hospitals < 0 {
            issues.push(FieldIssue::new("network_hospitals", "must not be negative"));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn inquiry_payload() -> Value {
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

    fn fields_of(err: &AppError) -> Vec<&str> {
        err.issues().iter().map(|i| i.field.as_str()).collect()
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("ana@localhost"));
        assert!(!is_valid_email("ana@@example.com"));
        assert!(!is_valid_email("ana example@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_create_inquiry_accepts_example() {
        let input = CreateInquiryInput::from_payload(&inquiry_payload()).unwrap();
        assert_eq!(input.first_name, "Ana");
        assert_eq!(input.annual_income_range, Some(IncomeRange::From250kTo500k));
        assert_eq!(input.family_size, Some(3));
        assert_eq!(input.coverage_interests, vec!["dental", "vision"]);
        assert_eq!(input.preferred_contact_method, ContactMethod::Email);
        assert!(input.consultation_requested);
    }

    #[test]
    fn test_create_inquiry_rejects_bad_email() {
        let mut payload = inquiry_payload();
        payload["email"] = json!("not-an-email");

        let err = CreateInquiryInput::from_payload(&payload).unwrap_err();
        assert_eq!(fields_of(&err), vec!["email"]);
    }

    #[test]
    fn test_create_inquiry_reports_every_field() {
        let mut payload = inquiry_payload();
        payload["first_name"] = json!("");
        payload["family_size"] = json!(0);
        payload["preferred_contact_method"] = json!("carrier_pigeon");
        payload.as_object_mut().unwrap().remove("message");

        let err = CreateInquiryInput::from_payload(&payload).unwrap_err();
        assert_eq!(
            fields_of(&err),
            vec![
                "first_name",
                "family_size",
                "preferred_contact_method",
                "message"
            ]
        );
    }

    #[test]
    fn test_create_inquiry_ignores_unknown_keys() {
        let mut payload = inquiry_payload();
        payload["status"] = json!("closed");
        payload["id"] = json!(99);

        assert!(CreateInquiryInput::from_payload(&payload).is_ok());
    }

    #[test]
    fn test_non_object_payload() {
        let err = CreateInquiryInput::from_payload(&json!([1, 2])).unwrap_err();
        assert_eq!(fields_of(&err), vec!["input"]);
        assert!(err.issues()[0].message.contains("array"));
    }

    #[test]
    fn test_plan_id_must_be_integer() {
        assert_eq!(PlanIdInput::from_payload(&json!({ "id": 4 })).unwrap().id, 4);

        let err = PlanIdInput::from_payload(&json!({ "id": 1.5 })).unwrap_err();
        assert_eq!(fields_of(&err), vec!["id"]);

        let err = PlanIdInput::from_payload(&json!({ "id": "4" })).unwrap_err();
        assert_eq!(fields_of(&err), vec!["id"]);
    }

    #[test]
    fn test_ids_past_column_width_cannot_exist() {
        let err = PlanIdInput::from_payload(&json!({ "id": 3_000_000_000u64 })).unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");

        let err = UpdateInquiryStatusInput::from_payload(
            &json!({ "id": -3_000_000_000i64, "status": "closed" }),
        )
        .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");

        let err = UpdateConsultationInput::from_payload(&json!({ "id": u64::MAX })).unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");

        let err = CreateConsultationInput::from_payload(&json!({
            "inquiry_id": 3_000_000_000u64,
            "scheduled_date": "2026-11-02T15:30:00Z",
            "duration_minutes": 30,
            "consultation_type": "phone",
            "advisor_name": "Helena Ortiz"
        }))
        .unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_field_issues_win_over_unreachable_id() {
        let err = CreateConsultationInput::from_payload(&json!({
            "inquiry_id": 3_000_000_000u64,
            "scheduled_date": "2026-11-02T15:30:00Z",
            "duration_minutes": 0,
            "consultation_type": "phone",
            "advisor_name": "Helena Ortiz"
        }))
        .unwrap_err();
        assert_eq!(err.code(), "BAD_REQUEST");
        assert_eq!(fields_of(&err), vec!["duration_minutes"]);
    }

    #[test]
    fn test_update_status_rejects_unlisted_value() {
        let err = UpdateInquiryStatusInput::from_payload(&json!({ "id": 1, "status": "won" }))
            .unwrap_err();
        assert_eq!(fields_of(&err), vec!["status"]);

        let input =
            UpdateInquiryStatusInput::from_payload(&json!({ "id": 1, "status": "proposal_sent" }))
                .unwrap();
        assert_eq!(input.status, InquiryStatus::ProposalSent);
    }

    #[test]
    fn test_create_consultation_constraints() {
        let payload = json!({
            "inquiry_id": -1,
            "scheduled_date": "2026-11-02T15:30:00Z",
            "duration_minutes": 45,
            "consultation_type": "in_person",
            "advisor_name": "Helena Ortiz"
        });
        let input = CreateConsultationInput::from_payload(&payload).unwrap();
        assert_eq!(input.inquiry_id, -1);
        assert_eq!(input.consultation_type, ConsultationType::InPerson);

        let payload = json!({
            "inquiry_id": 1,
            "scheduled_date": "next tuesday",
            "duration_minutes": 0,
            "consultation_type": "video",
            "advisor_name": ""
        });
        let err = CreateConsultationInput::from_payload(&payload).unwrap_err();
        assert_eq!(
            fields_of(&err),
            vec!["scheduled_date", "duration_minutes", "advisor_name"]
        );
    }

    #[test]
    fn test_update_consultation_presence() {
        let input = UpdateConsultationInput::from_payload(&json!({ "id": 3 })).unwrap();
        assert_eq!(input.notes, Patch::Unchanged);
        assert_eq!(input.outcome, Patch::Unchanged);
        assert_eq!(input.follow_up_required, None);

        let input = UpdateConsultationInput::from_payload(&json!({
            "id": 3,
            "notes": null,
            "outcome": "no_show",
            "follow_up_required": true
        }))
        .unwrap();
        assert_eq!(input.notes, Patch::Clear);
        assert_eq!(input.outcome, Patch::Set(ConsultationOutcome::NoShow));
        assert_eq!(input.follow_up_required, Some(true));

        let err =
            UpdateConsultationInput::from_payload(&json!({ "id": 3, "follow_up_required": null }))
                .unwrap_err();
        assert_eq!(fields_of(&err), vec!["follow_up_required"]);
    }

    #[test]
    fn test_new_plan_validation() {
        let plan = NewInsurancePlan {
            name: " ".to_string(),
            category: PlanCategory::Elite,
            annual_premium: BigDecimal::from_str("-1.00").unwrap(),
            deductible: BigDecimal::from_str("0.00").unwrap(),
            max_coverage: BigDecimal::from_str("1000000.00").unwrap(),
            coverage_details: String::new(),
            benefits: vec![],
            network_hospitals: 12,
            worldwide_coverage: false,
            concierge_services: false,
            emergency_evacuation: false,
            dental_coverage: false,
            vision_coverage: false,
            wellness_programs: false,
            is_featured: false,
        };

        let err = plan.validate().unwrap_err();
        assert_eq!(fields_of(&err), vec!["name", "annual_premium"]);
    }
}
