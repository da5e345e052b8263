use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::databases::fields::{calendar_date, optional, positive_quantity, required};
use crate::error::ApiError;
use crate::services::inventory::StockEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedBy {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub medicine: String,
    pub quantity: i32,
    pub expiry: NaiveDate,
    pub address: String,
    pub related_request_id: Option<Uuid>,
    pub requested_by: Option<RequestedBy>,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct DonationRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    phone: String,
    medicine: String,
    quantity: i32,
    expiry: NaiveDate,
    address: String,
    related_request_id: Option<Uuid>,
    requested_by_name: Option<String>,
    requested_by_email: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DonationRow> for Donation {
    fn from(row: DonationRow) -> Self {
        let requested_by = match (row.requested_by_name, row.requested_by_email) {
            (None, None) => None,
            (name, email) => Some(RequestedBy { name, email }),
        };

        Donation {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            medicine: row.medicine,
            quantity: row.quantity,
            expiry: row.expiry,
            address: row.address,
            related_request_id: row.related_request_id,
            requested_by,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationPayload {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub medicine: String,
    pub quantity: i32,
    pub expiry: String,
    pub address: String,
    pub related_request_id: Option<Uuid>,
    pub requested_by: Option<RequestedBy>,
}

/// A donation that passed field validation and is ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDonation {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub medicine: String,
    pub quantity: i32,
    pub expiry: NaiveDate,
    pub address: String,
    pub related_request_id: Option<Uuid>,
    pub requested_by: Option<RequestedBy>,
}

impl DonationPayload {
    pub fn validate(self) -> Result<NewDonation, ApiError> {
        Ok(NewDonation {
            name: required("name", self.name)?,
            email: optional(self.email),
            phone: required("phone", self.phone)?,
            medicine: required("medicine", self.medicine)?,
            quantity: positive_quantity("quantity", self.quantity)?,
            expiry: calendar_date("expiry", &self.expiry)?,
            address: required("address", self.address)?,
            related_request_id: self.related_request_id,
            requested_by: self.requested_by.and_then(|r| {
                let name = optional(r.name);
                let email = optional(r.email);
                if name.is_none() && email.is_none() {
                    None
                } else {
                    Some(RequestedBy { name, email })
                }
            }),
        })
    }
}

pub async fn insert_donation(pool: &PgPool, donation: &NewDonation) -> Result<Donation, sqlx::Error> {
    let (requested_by_name, requested_by_email) = match &donation.requested_by {
        Some(r) => (r.name.as_deref(), r.email.as_deref()),
        None => (None, None),
    };

    let row = sqlx::query_as::<_, DonationRow>(
        r#"
        INSERT INTO donations (
            id, name, email, phone, medicine, quantity, expiry, address,
            related_request_id, requested_by_name, requested_by_email
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&donation.name)
    .bind(&donation.email)
    .bind(&donation.phone)
    .bind(&donation.medicine)
    .bind(donation.quantity)
    .bind(donation.expiry)
    .bind(&donation.address)
    .bind(donation.related_request_id)
    .bind(requested_by_name)
    .bind(requested_by_email)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

pub async fn list_donations(pool: &PgPool) -> Result<Vec<Donation>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DonationRow>("SELECT * FROM donations ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(Donation::from).collect())
}

pub async fn donations_by_email(pool: &PgPool, email: &str) -> Result<Vec<Donation>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DonationRow>(
        "SELECT * FROM donations WHERE email = $1 ORDER BY created_at DESC",
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Donation::from).collect())
}

/// Stock entries whose medicine matches an ILIKE `pattern`, newest first.
pub async fn search_stock(pool: &PgPool, pattern: &str) -> Result<Vec<StockEntry>, sqlx::Error> {
    sqlx::query_as::<_, StockEntry>(
        r#"
        SELECT medicine, quantity, expiry
        FROM donations
        WHERE medicine ILIKE $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
}

pub async fn count_donations(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM donations")
        .fetch_one(pool)
        .await
}

pub async fn delete_donations_by_email(pool: &PgPool, email: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM donations WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> DonationPayload {
        serde_json::from_value(serde_json::json!({
            "name": " Sita ",
            "phone": "9800000001",
            "medicine": "Paracetamol",
            "quantity": 10,
            "expiry": "2025-01-01",
            "address": "Lalitpur",
            "email": ""
        }))
        .unwrap()
    }

    #[test]
    fn valid_payload_keeps_required_fields() {
        let donation = payload().validate().unwrap();
        assert_eq!(donation.name, "Sita");
        assert_eq!(donation.medicine, "Paracetamol");
        assert_eq!(donation.quantity, 10);
        assert_eq!(donation.expiry, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(donation.email, None);
        assert_eq!(donation.requested_by, None);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut p = payload();
        p.quantity = 0;
        assert!(matches!(p.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn blank_medicine_is_rejected() {
        let mut p = payload();
        p.medicine = "  ".into();
        let err = p.validate().unwrap_err();
        assert_eq!(err.to_string(), "medicine is required");
    }

    #[test]
    fn missing_address_fails_deserialization() {
        let result = serde_json::from_value::<DonationPayload>(serde_json::json!({
            "name": "Sita",
            "phone": "1",
            "medicine": "Zinc",
            "quantity": 1,
            "expiry": "2025-01-01"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn row_without_requester_has_no_requested_by() {
        let row = DonationRow {
            id: Uuid::new_v4(),
            name: "Sita".into(),
            email: None,
            phone: "1".into(),
            medicine: "Zinc".into(),
            quantity: 2,
            expiry: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            address: "x".into(),
            related_request_id: None,
            requested_by_name: None,
            requested_by_email: Some("r@example.com".into()),
            created_at: Utc::now(),
        };
        let donation = Donation::from(row);
        assert_eq!(
            donation.requested_by,
            Some(RequestedBy { name: None, email: Some("r@example.com".into()) })
        );

        let json = serde_json::to_value(&donation).unwrap();
        assert!(json.get("relatedRequestId").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
