use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::databases::donations::{list_donations, search_stock};
use crate::error::ApiError;
use crate::services::inventory::{aggregate, like_pattern, normalize_query};

#[derive(Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
}

#[get("/api/medicines/search")]
async fn search_medicines(
    query: web::Query<SearchQuery>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let term = normalize_query(query.query.as_deref())
        .ok_or_else(|| ApiError::validation("Search query is required"))?;

    let entries = search_stock(&db_pool, &like_pattern(term))
        .await
        .map_err(ApiError::internal)?;
    let medicines = aggregate(entries);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": medicines.len(),
        "medicines": medicines
    })))
}

#[get("/api/medicines/all")]
async fn all_medicines(db_pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let donations = list_donations(&db_pool).await.map_err(ApiError::internal)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": donations.len(),
        "donations": donations
    })))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(search_medicines);
    cfg.service(all_medicines);
}
