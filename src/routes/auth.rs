use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::databases::users::{insert_user, user_exists, RegisterPayload};
use crate::error::{is_unique_violation, ApiError};
use crate::services::password::hash_password;

pub async fn register(
    data: web::Json<RegisterPayload>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let (user, password) = data.into_inner().validate()?;

    if user_exists(&db_pool, &user.email).await? {
        return Err(ApiError::Conflict("User with this email already exists".to_string()));
    }

    let hashed = password.as_deref().map(hash_password).transpose()?;

    match insert_user(&db_pool, &user, hashed.as_deref()).await {
        Ok(saved) => {
            log::info!(
                "Registered {} ({})",
                saved.email,
                if saved.password.is_some() { "with password" } else { "without password" }
            );
            Ok(HttpResponse::Created().json(json!({ "message": "User registered!" })))
        }
        Err(e) if is_unique_violation(&e) => {
            Err(ApiError::Conflict("User with this email already exists".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/register", web::post().to(register));
}
