use actix_web::{get, web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::databases::donations::count_donations;
use crate::databases::money::{count_money_donations, total_raised};
use crate::databases::requests::count_requests;
use crate::databases::users::count_users;
use crate::error::ApiError;
use crate::routes::guard::AdminAccess;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardStats {
    total_users: i64,
    total_donations: i64,
    total_requests: i64,
    total_money_donated: f64,
    total_money_donations: i64,
}

// Independent counts; no snapshot across them.
#[get("/api/admin/stats")]
async fn get_dashboard_stats(
    _admin: AdminAccess,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let pool = db_pool.get_ref();

    let (total_users, total_donations, total_requests, total_money_donated, total_money_donations) = tokio::try_join!(
        count_users(pool),
        count_donations(pool),
        count_requests(pool),
        total_raised(pool),
        count_money_donations(pool),
    )?;

    Ok(HttpResponse::Ok().json(DashboardStats {
        total_users,
        total_donations,
        total_requests,
        total_money_donated,
        total_money_donations,
    }))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(get_dashboard_stats);
}
