use serde::Serialize;
use sqlx::PgPool;

use crate::databases::donations::delete_donations_by_email;
use crate::databases::money::delete_money_donations_by_email;
use crate::databases::requests::delete_requests_by_email;
use crate::databases::users::{delete_user, User};

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub donations: u64,
    pub requests: u64,
    pub money_donations: u64,
}

/// Removes the account, then every record filed under its email.
///
/// Steps run one after another with no transaction: an error part-way leaves
/// the earlier deletions in place.
pub async fn delete_account(pool: &PgPool, user: &User) -> Result<DeletionReport, sqlx::Error> {
    delete_user(pool, user.id).await?;

    let report = DeletionReport {
        donations: delete_donations_by_email(pool, &user.email).await?,
        requests: delete_requests_by_email(pool, &user.email).await?,
        money_donations: delete_money_donations_by_email(pool, &user.email).await?,
    };

    log::info!(
        "Deleted account {} ({} donations, {} requests, {} money donations)",
        user.email,
        report.donations,
        report.requests,
        report.money_donations
    );

    Ok(report)
}
