use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Stable caller identifier; becomes the owner on every idea the
    /// caller creates.
    pub sub: Uuid,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, name: String, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            name,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Sign a token with the symmetric secret (HS256). Credential checking
/// lives outside this service; this is the issuance half consumed by
/// operators and tests.
pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    #[test]
    fn generated_token_round_trips() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "Ada".to_string(), 1);
        let token = generate_jwt(&claims, "test-secret").unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, user_id);
        assert_eq!(decoded.claims.name, "Ada");
        assert!(decoded.claims.exp > decoded.claims.iat);
    }

    #[test]
    fn empty_secret_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "Ada".to_string(), 1);
        assert!(matches!(
            generate_jwt(&claims, ""),
            Err(JwtError::InvalidSecret)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_fails_validation() {
        let claims = Claims::new(Uuid::new_v4(), "Ada".to_string(), 1);
        let token = generate_jwt(&claims, "secret-a").unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret-b"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
