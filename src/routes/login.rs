use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::databases::users::find_user_by_email;
use crate::error::ApiError;
use crate::services::password::verify_password;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    data: web::Json<LoginRequest>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let LoginRequest { email, password } = data.into_inner();

    let user = find_user_by_email(&db_pool, email.trim())
        .await?
        .ok_or_else(|| ApiError::Authentication("User not found".to_string()))?;

    let stored = user.password.as_deref().ok_or_else(|| {
        ApiError::Authentication(
            "This account was created without a password. Please contact support.".to_string(),
        )
    })?;

    if !verify_password(&password, stored) {
        return Err(ApiError::Authentication("Invalid password".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful!",
        "name": user.name,
        "email": user.email
    })))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/login", web::post().to(login));
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::test_app;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    #[actix_web::test]
    async fn login_without_password_field_is_rejected() {
        let app = test::init_service(test_app(None)).await;
        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": "maya@example.com" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
