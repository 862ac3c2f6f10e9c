//! Bearer token inspection

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without checking its signature
///
/// Returns `None` when the token is not a JWT or carries no expiry.
pub fn expires_at(token: &str) -> Option<i64> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()?
        .claims
        .exp
}

/// Whether the token's expiry has passed
///
/// Opaque tokens are never considered expired; only the server can judge them.
pub fn is_expired(token: &str) -> bool {
    match expires_at(token) {
        Some(exp) => exp <= chrono::Utc::now().timestamp(),
        None => false,
    }
}
