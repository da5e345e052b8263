use actix_web::{delete, put, web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::databases::requests::{find_request, update_request_status, StatusUpdate};
use crate::databases::users::find_user_by_id;
use crate::error::ApiError;
use crate::routes::guard::AdminAccess;
use crate::services::accounts::delete_account;

#[delete("/api/admin/user/{id}")]
async fn delete_user_by_id(
    _admin: AdminAccess,
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let user = find_user_by_id(&db_pool, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    delete_account(&db_pool, &user).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "User and all associated data deleted successfully!"
    })))
}

#[put("/api/admin/request/{id}/status")]
async fn set_request_status(
    _admin: AdminAccess,
    path: web::Path<Uuid>,
    data: web::Json<StatusUpdate>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let next = data.into_inner().status;

    let current = find_request(&db_pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Request not found"))?;

    if !current.status.can_transition_to(next) {
        return Err(ApiError::validation(format!(
            "Cannot change request status from {} to {}",
            current.status, next
        )));
    }

    // A concurrent change between the read and this update surfaces as None.
    let request = update_request_status(&db_pool, id, next)
        .await?
        .ok_or_else(|| ApiError::validation("Request is no longer pending"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Request status updated successfully!",
        "request": request
    })))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(delete_user_by_id);
    cfg.service(set_request_status);
}
