use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;

use crate::databases::donations::list_donations;
use crate::databases::money::list_money_donations;
use crate::databases::requests::list_requests;
use crate::databases::users::list_users;
use crate::error::ApiError;
use crate::routes::guard::AdminAccess;

#[get("/api/admin/users")]
async fn get_users(_admin: AdminAccess, db_pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let users = list_users(&db_pool).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/api/admin/donations")]
async fn get_donations(_admin: AdminAccess, db_pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let donations = list_donations(&db_pool).await?;
    Ok(HttpResponse::Ok().json(donations))
}

#[get("/api/admin/money-donations")]
async fn get_money_donations(
    _admin: AdminAccess,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let donations = list_money_donations(&db_pool).await?;
    Ok(HttpResponse::Ok().json(donations))
}

#[get("/api/admin/requests")]
async fn get_requests(_admin: AdminAccess, db_pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let requests = list_requests(&db_pool).await?;
    Ok(HttpResponse::Ok().json(requests))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(get_users);
    cfg.service(get_donations);
    cfg.service(get_money_donations);
    cfg.service(get_requests);
}
