use actix_web::{delete, get, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;

use crate::databases::donations::{donations_by_email, Donation};
use crate::databases::fields::required;
use crate::databases::money::{money_donations_by_email, MoneyDonation};
use crate::databases::requests::{requests_by_email, MedicineRequest};
use crate::databases::users::{find_user_by_email, set_password, update_profile, ProfileUpdate, UserProfile};
use crate::error::ApiError;
use crate::services::accounts::delete_account;
use crate::services::password::{hash_password, provided, verify_password};
use crate::services::stats::total_completed;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileStats {
    total_donations: usize,
    total_requests: usize,
    total_money_donations: usize,
    total_money_donated: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    user: UserProfile,
    donations: Vec<Donation>,
    requests: Vec<MedicineRequest>,
    money_donations: Vec<MoneyDonation>,
    total_money_donated: f64,
    stats: ProfileStats,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub email: String,
    pub current_password: String,
    pub new_password: String,
}

#[get("/api/user/profile/{email}")]
async fn get_profile(
    email: web::Path<String>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let email = email.into_inner();

    let user = find_user_by_email(&db_pool, &email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let (donations, requests, money_donations) = tokio::try_join!(
        donations_by_email(&db_pool, &user.email),
        requests_by_email(&db_pool, &user.email),
        money_donations_by_email(&db_pool, &user.email),
    )?;

    let total_money_donated = total_completed(&money_donations);

    Ok(HttpResponse::Ok().json(ProfileResponse {
        user: UserProfile::from(&user),
        stats: ProfileStats {
            total_donations: donations.len(),
            total_requests: requests.len(),
            total_money_donations: money_donations.len(),
            total_money_donated,
        },
        donations,
        requests,
        money_donations,
        total_money_donated,
    }))
}

#[put("/api/user/update")]
async fn update_user(
    data: web::Json<ProfileUpdate>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let update = data.into_inner().normalized()?;

    let user = update_profile(&db_pool, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile updated successfully!",
        "user": UserProfile::from(&user)
    })))
}

#[delete("/api/user/delete")]
async fn delete_user_account(
    data: web::Json<DeleteAccountRequest>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let email = required("email", data.into_inner().email)?;

    let user = find_user_by_email(&db_pool, &email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    delete_account(&db_pool, &user).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Account deleted successfully! All your data has been removed."
    })))
}

#[put("/api/user/change-password")]
async fn change_password(
    data: web::Json<ChangePasswordRequest>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let ChangePasswordRequest { email, current_password, new_password } = data.into_inner();

    let new_password = provided(Some(new_password.as_str()))
        .ok_or_else(|| ApiError::validation("newPassword is required"))?
        .to_string();

    let user = find_user_by_email(&db_pool, email.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let stored = user
        .password
        .as_deref()
        .ok_or_else(|| ApiError::Authentication("This account has no password set".to_string()))?;

    if !verify_password(&current_password, stored) {
        return Err(ApiError::Authentication("Current password is incorrect".to_string()));
    }

    let hashed = hash_password(&new_password)?;
    set_password(&db_pool, &user.email, &hashed).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password changed successfully!" })))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(get_profile);
    cfg.service(update_user);
    cfg.service(delete_user_account);
    cfg.service(change_password);
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{error_of, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    #[actix_web::test]
    async fn blank_new_password_is_rejected() {
        let app = test::init_service(test_app(None)).await;
        let req = test::TestRequest::put()
            .uri("/api/user/change-password")
            .set_json(json!({
                "email": "maya@example.com",
                "currentPassword": "old",
                "newPassword": " "
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(resp).await, "newPassword is required");
    }

    #[actix_web::test]
    async fn delete_requires_an_email() {
        let app = test::init_service(test_app(None)).await;
        let req = test::TestRequest::delete()
            .uri("/api/user/delete")
            .set_json(json!({ "email": "" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(resp).await, "email is required");
    }

    #[actix_web::test]
    async fn update_requires_an_email() {
        let app = test::init_service(test_app(None)).await;
        let req = test::TestRequest::put()
            .uri("/api/user/update")
            .set_json(json!({ "email": "", "name": "New" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
