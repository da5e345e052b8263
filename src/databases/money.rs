use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::databases::fields::{optional, required};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Qr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MoneyDonation {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub address: String,
    pub message: Option<String>,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyDonationPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub address: String,
    pub message: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMoneyDonation {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub address: String,
    pub message: Option<String>,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
}

impl MoneyDonationPayload {
    pub fn validate(self) -> Result<NewMoneyDonation, ApiError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ApiError::validation("amount must be greater than 0"));
        }

        Ok(NewMoneyDonation {
            name: required("name", self.name)?,
            email: required("email", self.email)?,
            phone: required("phone", self.phone)?,
            amount: self.amount,
            payment_method: self.payment_method,
            address: required("address", self.address)?,
            message: optional(self.message),
            payment_status: self.payment_status.unwrap_or_default(),
            transaction_id: optional(self.transaction_id),
        })
    }
}

pub async fn insert_money_donation(
    pool: &PgPool,
    donation: &NewMoneyDonation,
) -> Result<MoneyDonation, sqlx::Error> {
    sqlx::query_as::<_, MoneyDonation>(
        r#"
        INSERT INTO money_donations (
            id, name, email, phone, amount, payment_method, address,
            message, payment_status, transaction_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&donation.name)
    .bind(&donation.email)
    .bind(&donation.phone)
    .bind(donation.amount)
    .bind(donation.payment_method)
    .bind(&donation.address)
    .bind(&donation.message)
    .bind(donation.payment_status)
    .bind(&donation.transaction_id)
    .fetch_one(pool)
    .await
}

pub async fn list_money_donations(pool: &PgPool) -> Result<Vec<MoneyDonation>, sqlx::Error> {
    sqlx::query_as::<_, MoneyDonation>("SELECT * FROM money_donations ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn money_donations_by_email(pool: &PgPool, email: &str) -> Result<Vec<MoneyDonation>, sqlx::Error> {
    sqlx::query_as::<_, MoneyDonation>(
        "SELECT * FROM money_donations WHERE email = $1 ORDER BY created_at DESC",
    )
    .bind(email)
    .fetch_all(pool)
    .await
}

pub async fn count_money_donations(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM money_donations")
        .fetch_one(pool)
        .await
}

/// Sum over completed payments; 0 when there are none.
pub async fn total_raised(pool: &PgPool) -> Result<f64, sqlx::Error> {
    sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(amount), 0)::FLOAT8 FROM money_donations WHERE payment_status = 'completed'",
    )
    .fetch_one(pool)
    .await
}

pub async fn delete_money_donations_by_email(pool: &PgPool, email: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM money_donations WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
