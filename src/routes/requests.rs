use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::databases::donations::{insert_donation, NewDonation, RequestedBy};
use crate::databases::fields::{calendar_date, optional, positive_quantity, required};
use crate::databases::requests::{
    find_request, list_pending_requests, record_fulfilment, release_fulfilment, DonatedBy, MedicineRequest,
    RequestStatus,
};
use crate::error::ApiError;

/// A donor answering a specific request. The medicine comes from the request.
#[derive(Debug, Deserialize)]
pub struct FulfilPayload {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub quantity: i32,
    pub expiry: String,
    pub address: String,
}

impl FulfilPayload {
    fn into_donation(self, request: &MedicineRequest) -> Result<NewDonation, ApiError> {
        Ok(NewDonation {
            name: required("name", self.name)?,
            email: optional(self.email),
            phone: required("phone", self.phone)?,
            medicine: request.medicine.clone(),
            quantity: positive_quantity("quantity", self.quantity)?,
            expiry: calendar_date("expiry", &self.expiry)?,
            address: required("address", self.address)?,
            related_request_id: Some(request.id),
            requested_by: Some(RequestedBy {
                name: Some(request.name.clone()),
                email: Some(request.email.clone()),
            }),
        })
    }
}

#[get("/api/requests")]
async fn open_requests(db_pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let requests = list_pending_requests(&db_pool).await?;
    Ok(HttpResponse::Ok().json(requests))
}

#[post("/api/request/{id}/donate")]
async fn fulfil_request(
    path: web::Path<Uuid>,
    data: web::Json<FulfilPayload>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let request = find_request(&db_pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Request not found"))?;

    if request.status != RequestStatus::Pending {
        return Err(ApiError::validation("Request is no longer pending"));
    }

    let donation = data.into_inner().into_donation(&request)?;
    let donor = DonatedBy {
        name: donation.name.clone(),
        email: donation.email.clone(),
        phone: donation.phone.clone(),
    };

    // Only the caller whose conditional update wins goes on to store a donation.
    let updated = record_fulfilment(&db_pool, id, &donor, donation.quantity)
        .await?
        .ok_or_else(|| ApiError::validation("Request is no longer pending"))?;

    let saved = match insert_donation(&db_pool, &donation).await {
        Ok(saved) => saved,
        Err(e) => {
            log::error!("Donation for request {} failed to save, reopening it: {}", id, e);
            if let Err(reopen) = release_fulfilment(&db_pool, id).await {
                log::error!("Request {} stays donated without a donation: {}", id, reopen);
            }
            return Err(e.into());
        }
    };

    Ok(HttpResponse::Created().json(json!({
        "message": "Donation saved!",
        "donationId": saved.id,
        "request": updated
    })))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(open_requests);
    cfg.service(fulfil_request);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pending_request() -> MedicineRequest {
        MedicineRequest {
            id: Uuid::new_v4(),
            name: "Gita".into(),
            email: "gita@example.com".into(),
            medicine: "Insulin".into(),
            quantity: 3,
            reason: "diabetes".into(),
            status: RequestStatus::Pending,
            donated_by: None,
            donated_quantity: None,
            donated_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn fulfilment_links_donation_to_request() {
        let request = pending_request();
        let payload = FulfilPayload {
            name: "Ram".into(),
            email: None,
            phone: "98".into(),
            quantity: 3,
            expiry: "2026-01-01".into(),
            address: "Kathmandu".into(),
        };

        let donation = payload.into_donation(&request).unwrap();
        assert_eq!(donation.medicine, "Insulin");
        assert_eq!(donation.related_request_id, Some(request.id));
        assert_eq!(
            donation.requested_by,
            Some(RequestedBy {
                name: Some("Gita".into()),
                email: Some("gita@example.com".into()),
            })
        );
    }

    #[actix_web::test]
    async fn malformed_request_id_is_not_found() {
        use crate::routes::test_support::test_app;
        use actix_web::http::StatusCode;
        use actix_web::test;

        let app = test::init_service(test_app(None)).await;
        let req = test::TestRequest::post()
            .uri("/api/request/not-a-uuid/donate")
            .set_json(serde_json::json!({
                "name": "Ram",
                "phone": "98",
                "quantity": 1,
                "expiry": "2026-01-01",
                "address": "Kathmandu"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
