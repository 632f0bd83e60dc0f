//! Bearer-token auth gate.
//!
//! An absent or invalid token is never an error for order placement: the
//! extractor yields `None` and the request proceeds as a guest checkout.
//! `RequireIdentity` and `RequireAdmin` layer the stricter contracts on top
//! for the authenticated and admin surfaces.

use std::future::{ready, Ready};

use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Clone)]
pub struct AuthConfig {
    decoding_key: DecodingKey,
}

impl AuthConfig {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i32,
    pub email: String,
    pub is_admin: bool,
}

fn decode_identity(req: &HttpRequest) -> Option<Identity> {
    let config = req.app_data::<web::Data<AuthConfig>>()?;
    let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))?;
    let data =
        jsonwebtoken::decode::<Claims>(token, &config.decoding_key, &Validation::default()).ok()?;
    let user_id = data.claims.sub.parse().ok()?;
    Some(Identity {
        user_id,
        email: data.claims.email,
        is_admin: data.claims.admin,
    })
}

/// `Some(identity)` for a valid bearer token, `None` otherwise (guest).
pub struct MaybeIdentity(pub Option<Identity>);

impl FromRequest for MaybeIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeIdentity(decode_identity(req))))
    }
}

/// Rejects with 401 when no valid identity is attached.
pub struct RequireIdentity(pub Identity);

impl FromRequest for RequireIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            decode_identity(req)
                .map(RequireIdentity)
                .ok_or(AppError::Unauthorized),
        )
    }
}

/// Rejects with 401 when unauthenticated, 403 when not an admin.
pub struct RequireAdmin(pub Identity);

impl FromRequest for RequireAdmin {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match decode_identity(req) {
            None => Err(AppError::Unauthorized),
            Some(identity) if !identity.is_admin => Err(AppError::Forbidden),
            Some(identity) => Ok(RequireAdmin(identity)),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(sub: &str, admin: bool) -> String {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: sub.to_string(),
            email: "asha@example.com".to_string(),
            admin,
            exp: now + 3600,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn request_with(header_value: Option<String>) -> HttpRequest {
        let mut req = TestRequest::default().app_data(web::Data::new(AuthConfig::from_secret(SECRET)));
        if let Some(value) = header_value {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        req.to_http_request()
    }

    #[test]
    fn valid_token_yields_identity() {
        let req = request_with(Some(format!("Bearer {}", token("42", false))));
        let identity = decode_identity(&req).unwrap();
        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.email, "asha@example.com");
        assert!(!identity.is_admin);
    }

    #[test]
    fn missing_header_is_guest() {
        let req = request_with(None);
        assert!(decode_identity(&req).is_none());
    }

    #[test]
    fn garbage_token_is_guest() {
        let req = request_with(Some("Bearer not-a-jwt".to_string()));
        assert!(decode_identity(&req).is_none());
    }

    #[test]
    fn wrong_scheme_is_guest() {
        let req = request_with(Some(format!("Basic {}", token("42", false))));
        assert!(decode_identity(&req).is_none());
    }

    #[test]
    fn admin_claim_carries_through() {
        let req = request_with(Some(format!("Bearer {}", token("7", true))));
        assert!(decode_identity(&req).unwrap().is_admin);
    }
}
