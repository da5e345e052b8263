use chrono::{DateTime, Utc};
use std::fmt;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::databases::fields::{positive_quantity, required};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Donated,
}

impl RequestStatus {
    /// Only a pending request can move, and only to a different state.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (
                RequestStatus::Pending,
                RequestStatus::Approved | RequestStatus::Rejected | RequestStatus::Donated
            )
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Donated => "donated",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonatedBy {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub medicine: String,
    pub quantity: i32,
    pub reason: String,
    pub status: RequestStatus,
    pub donated_by: Option<DonatedBy>,
    pub donated_quantity: Option<i32>,
    pub donated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct RequestRow {
    id: Uuid,
    name: String,
    email: String,
    medicine: String,
    quantity: i32,
    reason: String,
    status: RequestStatus,
    donated_by_name: Option<String>,
    donated_by_email: Option<String>,
    donated_by_phone: Option<String>,
    donated_quantity: Option<i32>,
    donated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<RequestRow> for MedicineRequest {
    fn from(row: RequestRow) -> Self {
        let donated_by = match (row.donated_by_name, row.donated_by_phone) {
            (Some(name), Some(phone)) => Some(DonatedBy {
                name,
                email: row.donated_by_email,
                phone,
            }),
            _ => None,
        };

        MedicineRequest {
            id: row.id,
            name: row.name,
            email: row.email,
            medicine: row.medicine,
            quantity: row.quantity,
            reason: row.reason,
            status: row.status,
            donated_by,
            donated_quantity: row.donated_quantity,
            donated_at: row.donated_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RequestPayload {
    pub name: String,
    pub email: String,
    pub medicine: String,
    pub quantity: i32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRequest {
    pub name: String,
    pub email: String,
    pub medicine: String,
    pub quantity: i32,
    pub reason: String,
}

impl RequestPayload {
    pub fn validate(self) -> Result<NewRequest, ApiError> {
        Ok(NewRequest {
            name: required("name", self.name)?,
            email: required("email", self.email)?,
            medicine: required("medicine", self.medicine)?,
            quantity: positive_quantity("quantity", self.quantity)?,
            reason: required("reason", self.reason)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: RequestStatus,
}

pub async fn insert_request(pool: &PgPool, request: &NewRequest) -> Result<MedicineRequest, sqlx::Error> {
    let row = sqlx::query_as::<_, RequestRow>(
        r#"
        INSERT INTO requests (id, name, email, medicine, quantity, reason, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'pending')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&request.name)
    .bind(&request.email)
    .bind(&request.medicine)
    .bind(request.quantity)
    .bind(&request.reason)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

pub async fn find_request(pool: &PgPool, id: Uuid) -> Result<Option<MedicineRequest>, sqlx::Error> {
    let row = sqlx::query_as::<_, RequestRow>("SELECT * FROM requests WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(MedicineRequest::from))
}

pub async fn list_requests(pool: &PgPool) -> Result<Vec<MedicineRequest>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RequestRow>("SELECT * FROM requests ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(MedicineRequest::from).collect())
}

pub async fn list_pending_requests(pool: &PgPool) -> Result<Vec<MedicineRequest>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RequestRow>(
        "SELECT * FROM requests WHERE status = 'pending' ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(MedicineRequest::from).collect())
}

pub async fn requests_by_email(pool: &PgPool, email: &str) -> Result<Vec<MedicineRequest>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RequestRow>(
        "SELECT * FROM requests WHERE email = $1 ORDER BY created_at DESC",
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(MedicineRequest::from).collect())
}

/// Moves a request out of `pending`. Returns `None` when the row was gone or
/// had already left `pending` by the time the update ran.
pub async fn update_request_status(
    pool: &PgPool,
    id: Uuid,
    status: RequestStatus,
) -> Result<Option<MedicineRequest>, sqlx::Error> {
    let row = sqlx::query_as::<_, RequestRow>(
        r#"
        UPDATE requests SET status = $2
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(MedicineRequest::from))
}

/// Claims a pending request for one donor. `None` means another caller got
/// there first or the request is gone.
pub async fn record_fulfilment(
    pool: &PgPool,
    id: Uuid,
    donor: &DonatedBy,
    quantity: i32,
) -> Result<Option<MedicineRequest>, sqlx::Error> {
    let row = sqlx::query_as::<_, RequestRow>(
        r#"
        UPDATE requests SET
            status = 'donated',
            donated_by_name = $2,
            donated_by_email = $3,
            donated_by_phone = $4,
            donated_quantity = $5,
            donated_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&donor.name)
    .bind(&donor.email)
    .bind(&donor.phone)
    .bind(quantity)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(MedicineRequest::from))
}

/// Undoes `record_fulfilment` when the donation itself could not be stored.
pub async fn release_fulfilment(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE requests SET
            status = 'pending',
            donated_by_name = NULL,
            donated_by_email = NULL,
            donated_by_phone = NULL,
            donated_quantity = NULL,
            donated_at = NULL
        WHERE id = $1 AND status = 'donated'
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn count_requests(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM requests")
        .fetch_one(pool)
        .await
}

pub async fn delete_requests_by_email(pool: &PgPool, email: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM requests WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use RequestStatus::*;

    #[test]
    fn pending_moves_to_any_terminal_state() {
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Donated));
    }

    #[test]
    fn terminal_states_are_final() {
        for from in [Approved, Rejected, Donated] {
            for to in [Pending, Approved, Rejected, Donated] {
                assert!(!from.can_transition_to(to), "{:?} -> {:?}", from, to);
            }
        }
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn status_parses_from_lowercase() {
        let update: StatusUpdate = serde_json::from_str(r#"{"status":"approved"}"#).unwrap();
        assert_eq!(update.status, Approved);
        assert!(serde_json::from_str::<StatusUpdate>(r#"{"status":"closed"}"#).is_err());
    }

    #[test]
    fn status_displays_as_its_wire_name() {
        for status in [Pending, Approved, Rejected, Donated] {
            assert_eq!(serde_json::to_value(status).unwrap(), status.to_string());
        }
        assert_eq!(Donated.to_string(), "donated");
    }

    #[test]
    fn payload_requires_a_reason() {
        let payload = RequestPayload {
            name: "Gita".into(),
            email: "gita@example.com".into(),
            medicine: "Insulin".into(),
            quantity: 2,
            reason: " ".into(),
        };
        assert_eq!(payload.validate().unwrap_err().to_string(), "reason is required");
    }

    #[test]
    fn fulfilment_fields_serialize_camel_case() {
        let request = MedicineRequest::from(RequestRow {
            id: Uuid::new_v4(),
            name: "Gita".into(),
            email: "gita@example.com".into(),
            medicine: "Insulin".into(),
            quantity: 2,
            reason: "diabetes".into(),
            status: Donated,
            donated_by_name: Some("Ram".into()),
            donated_by_email: None,
            donated_by_phone: Some("98".into()),
            donated_quantity: Some(2),
            donated_at: Some(Utc::now()),
            created_at: Utc::now(),
        });

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["status"], "donated");
        assert_eq!(json["donatedBy"]["name"], "Ram");
        assert_eq!(json["donatedQuantity"], 2);
    }
}
