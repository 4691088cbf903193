use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use super::{explicit, non_null, to_datetime};

/// Payment state of a business
///
/// Starts as `Pending`; the payment flow moves it to `Paid` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// Business record stored in redb
/// Uses Unix timestamps for compact storage with bincode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub business_type: Option<String>,
    pub paystack_customer_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    pub last_edited: i64,
}

impl BusinessRecord {
    /// New businesses always start unpaid, with `created_at == last_edited`
    pub fn new(input: NewBusiness, now: i64) -> Self {
        Self {
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            business_type: input.business_type,
            paystack_customer_id: None,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            last_edited: now,
        }
    }

    /// Apply only the fields present in `update`
    pub fn apply(&mut self, update: BusinessUpdate, now: i64) {
        if let Some(Some(name)) = update.name {
            self.name = name;
        }
        if let Some(Some(email)) = update.email {
            self.email = email;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(business_type) = update.business_type {
            self.business_type = business_type;
        }
        self.last_edited = now;
    }

    /// Record a gateway-confirmed payment
    ///
    /// Re-applying the same confirmation leaves the record unchanged apart
    /// from `last_edited`; a missing customer code keeps the stored one.
    pub fn mark_paid(&mut self, customer_code: Option<String>, now: i64) {
        self.payment_status = PaymentStatus::Paid;
        if customer_code.is_some() {
            self.paystack_customer_id = customer_code;
        }
        self.last_edited = now;
    }

    /// Record a failed charge; a business that has already paid stays paid
    pub fn mark_failed(&mut self, now: i64) {
        if self.payment_status == PaymentStatus::Paid {
            return;
        }
        self.payment_status = PaymentStatus::Failed;
        self.last_edited = now;
    }

    /// Registered email matches, ignoring case
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.trim().to_lowercase() == email.trim().to_lowercase()
    }
}

/// Business model for API responses
#[derive(Debug, Clone, Serialize)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub business_type: Option<String>,
    pub paystack_customer_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

impl Business {
    pub fn from_record(id: Uuid, record: BusinessRecord) -> Self {
        Self {
            id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            address: record.address,
            business_type: record.business_type,
            paystack_customer_id: record.paystack_customer_id,
            payment_status: record.payment_status,
            created_at: to_datetime(record.created_at),
            last_edited: to_datetime(record.last_edited),
        }
    }
}

/// Signup payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBusiness {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub business_type: Option<String>,
}

/// Partial business update
///
/// Absent fields are left alone. `null` clears the optional fields
/// (phone, address, type) and is rejected for name and email.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessUpdate {
    #[serde(default, deserialize_with = "explicit")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub address: Option<Option<String>>,
    #[serde(default, rename = "type", deserialize_with = "explicit")]
    pub business_type: Option<Option<String>>,
}

impl Validate for BusinessUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        non_null("name", &self.name, &mut errors);
        non_null("email", &self.email, &mut errors);

        if let Some(Some(name)) = &self.name {
            if name.trim().is_empty() {
                errors.add("name", ValidationError::new("length"));
            }
        }
        if let Some(Some(email)) = &self.email {
            if !email.validate_email() {
                errors.add("email", ValidationError::new("email"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BusinessRecord {
        BusinessRecord::new(
            NewBusiness {
                name: "Corner Bakery".to_string(),
                email: "Owner@Bakery.com".to_string(),
                phone: None,
                address: Some("1 Main St".to_string()),
                business_type: Some("cafe".to_string()),
            },
            1_700_000_000,
        )
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = record();
        assert_eq!(record.payment_status, PaymentStatus::Pending);
        assert_eq!(record.created_at, record.last_edited);
        assert!(record.paystack_customer_id.is_none());
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut record = record();
        let update: BusinessUpdate = serde_json::from_str(r#"{"phone": "555"}"#).unwrap();

        record.apply(update, 1_700_000_100);

        assert_eq!(record.phone.as_deref(), Some("555"));
        assert_eq!(record.name, "Corner Bakery");
        assert_eq!(record.email, "Owner@Bakery.com");
        assert_eq!(record.address.as_deref(), Some("1 Main St"));
        assert_eq!(record.business_type.as_deref(), Some("cafe"));
        assert_eq!(record.last_edited, 1_700_000_100);
    }

    #[test]
    fn test_explicit_null_clears_optional_field() {
        let mut record = record();
        let update: BusinessUpdate = serde_json::from_str(r#"{"address": null}"#).unwrap();
        assert!(update.validate().is_ok());

        record.apply(update, 1_700_000_100);
        assert!(record.address.is_none());
        assert_eq!(record.business_type.as_deref(), Some("cafe"));
    }

    #[test]
    fn test_null_name_is_rejected() {
        let update: BusinessUpdate = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_bad_email_is_rejected() {
        let update: BusinessUpdate = serde_json::from_str(r#"{"email": "nope"}"#).unwrap();
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_email_matches_ignores_case() {
        let record = record();
        assert!(record.email_matches("owner@bakery.com"));
        assert!(record.email_matches("OWNER@BAKERY.COM"));
        assert!(!record.email_matches("other@bakery.com"));
    }

    #[test]
    fn test_mark_paid_is_idempotent() {
        let mut record = record();
        record.mark_paid(Some("CUS_123".to_string()), 1_700_000_200);
        let first = record.clone();

        record.mark_paid(Some("CUS_123".to_string()), 1_700_000_200);
        assert_eq!(record, first);

        record.mark_paid(None, 1_700_000_300);
        assert_eq!(record.paystack_customer_id.as_deref(), Some("CUS_123"));
        assert_eq!(record.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_failed_charge_does_not_downgrade_paid() {
        let mut record = record();
        record.mark_failed(1_700_000_100);
        assert_eq!(record.payment_status, PaymentStatus::Failed);

        record.mark_paid(None, 1_700_000_200);
        record.mark_failed(1_700_000_300);
        assert_eq!(record.payment_status, PaymentStatus::Paid);
        assert_eq!(record.last_edited, 1_700_000_200);
    }

    #[test]
    fn test_record_survives_bincode() {
        let config = bincode::config::standard();
        let record = record();

        let bytes = bincode::serde::encode_to_vec(&record, config).unwrap();
        let (decoded, _): (BusinessRecord, _) =
            bincode::serde::decode_from_slice(&bytes, config).unwrap();

        assert_eq!(decoded, record);
    }
}
