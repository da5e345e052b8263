use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::error::ApiError;

/// Proof that the caller presented the configured admin bearer token.
/// Admin handlers take it as an argument; extraction fails with 401 otherwise.
pub struct AdminAccess;

impl FromRequest for AdminAccess {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(check(req))
    }
}

fn check(req: &HttpRequest) -> Result<AdminAccess, ApiError> {
    let expected = req
        .app_data::<web::Data<Config>>()
        .and_then(|config| config.admin_token.clone())
        .ok_or_else(|| ApiError::Unauthorized("Admin access is not configured".to_string()))?;

    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match presented {
        Some(token) if tokens_match(token, &expected) => Ok(AdminAccess),
        Some(_) => Err(ApiError::Unauthorized("Invalid admin token".to_string())),
        None => Err(ApiError::Unauthorized("Admin token required".to_string())),
    }
}

fn tokens_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::config_with_token;
    use actix_web::test::TestRequest;

    fn request(token: Option<&str>, header: Option<&str>) -> HttpRequest {
        let mut builder = TestRequest::default().app_data(web::Data::new(config_with_token(token)));
        if let Some(header) = header {
            builder = builder.insert_header((AUTHORIZATION, header));
        }
        builder.to_http_request()
    }

    #[test]
    fn matching_bearer_token_is_accepted() {
        assert!(check(&request(Some("letmein"), Some("Bearer letmein"))).is_ok());
    }

    #[test]
    fn wrong_or_missing_token_is_rejected() {
        let wrong = check(&request(Some("letmein"), Some("Bearer nope"))).err().unwrap();
        assert_eq!(wrong.to_string(), "Invalid admin token");

        let missing = check(&request(Some("letmein"), None)).err().unwrap();
        assert_eq!(missing.to_string(), "Admin token required");

        let basic = check(&request(Some("letmein"), Some("Basic letmein"))).err().unwrap();
        assert_eq!(basic.to_string(), "Admin token required");
    }

    #[test]
    fn token_comparison_needs_every_byte() {
        assert!(tokens_match("letmein", "letmein"));
        assert!(!tokens_match("letmeiN", "letmein"));
        assert!(!tokens_match("letme", "letmein"));
        assert!(!tokens_match("letmeinnow", "letmein"));
        assert!(!tokens_match("", "letmein"));
    }

    #[test]
    fn unconfigured_token_refuses_everyone() {
        let err = check(&request(None, Some("Bearer anything"))).err().unwrap();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
