use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims of a token issued by the account service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: TokenType,
}

fn default_token_type() -> TokenType {
    TokenType::Access
}

/// HS256 signature and expiry check. Only access tokens are accepted.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())?;

    if claims.token_type != TokenType::Access {
        return Err("refresh tokens cannot be used for API calls".to_string());
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "test-secret";

    fn token(token_type: TokenType, exp_offset: i64) -> String {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;
        let claims = Claims {
            user_id: 7,
            sub: "hanako".into(),
            exp: (now + exp_offset) as usize,
            jti: None,
            token_type,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    #[test]
    fn access_token_verifies() {
        let claims = verify_token(&token(TokenType::Access, 600), SECRET).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.sub, "hanako");
    }

    #[test]
    fn refresh_expired_and_foreign_tokens_are_rejected() {
        assert!(verify_token(&token(TokenType::Refresh, 600), SECRET).is_err());
        assert!(verify_token(&token(TokenType::Access, -600), SECRET).is_err());
        assert!(verify_token(&token(TokenType::Access, 600), "other").is_err());
        assert!(verify_token("not.a.token", SECRET).is_err());
    }
}
