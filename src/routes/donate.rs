use actix_web::{get, post, web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::databases::donations::{count_donations, insert_donation, DonationPayload};
use crate::databases::money::{count_money_donations, insert_money_donation, total_raised, MoneyDonationPayload};
use crate::databases::requests::{insert_request, RequestPayload};
use crate::error::ApiError;

#[post("/api/donate")]
async fn donate(
    data: web::Json<DonationPayload>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let donation = data.into_inner().validate()?;
    let saved = insert_donation(&db_pool, &donation).await?;

    log::info!("Donation {} recorded: {} x{}", saved.id, saved.medicine, saved.quantity);

    Ok(HttpResponse::Created().json(json!({
        "message": "Donation saved!",
        "donationId": saved.id
    })))
}

#[post("/api/donate-money")]
async fn donate_money(
    data: web::Json<MoneyDonationPayload>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let donation = data.into_inner().validate()?;
    let saved = insert_money_donation(&db_pool, &donation).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Money donation saved!",
        "donationId": saved.id
    })))
}

#[post("/api/request")]
async fn request_medicine(
    data: web::Json<RequestPayload>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let request = data.into_inner().validate()?;
    let saved = insert_request(&db_pool, &request).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Request saved!",
        "requestId": saved.id
    })))
}

#[get("/api/donations/count")]
async fn donations_count(db_pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let count = count_donations(&db_pool).await?;
    Ok(HttpResponse::Ok().json(json!({ "count": count })))
}

#[get("/api/money-donations/count")]
async fn money_donations_count(db_pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let count = count_money_donations(&db_pool).await?;
    Ok(HttpResponse::Ok().json(json!({ "count": count })))
}

#[get("/api/money-donations/total")]
async fn money_donations_total(db_pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let total = total_raised(&db_pool).await?;
    Ok(HttpResponse::Ok().json(json!({ "total": total })))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(donate);
    cfg.service(donate_money);
    cfg.service(request_medicine);
    cfg.service(donations_count);
    cfg.service(money_donations_count);
    cfg.service(money_donations_total);
}
