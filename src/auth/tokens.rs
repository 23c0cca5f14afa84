//! Signed session tokens.
//!
//! A login hands out a short-lived access token and a long-lived refresh
//! token, which the refresh route trades for a new pair. Refresh tokens can
//! be revoked; revocations live in memory, so every token issued before the
//! process started is rejected as well.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::Blacklist;

/// 15 minutes
pub const ACCESS_VALID: i64 = 900;
/// 1 week
pub const REFRESH_VALID: i64 = 604_800;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
    #[error("token revoked")]
    Revoked,
    #[error("token issued before server start")]
    Stale,
    #[error("expected a {0:?} token")]
    WrongKind(TokenKind),
    #[error("failed to sign token: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User key
    pub sub: String,
    pub username: String,
    pub kind: TokenKind,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    started_at: i64,
    blacklist: Arc<Blacklist>,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], blacklist: Arc<Blacklist>) -> Self {
        TokenIssuer {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            started_at: OffsetDateTime::now_utc().unix_timestamp(),
            blacklist,
        }
    }

    pub fn blacklist(&self) -> &Arc<Blacklist> {
        &self.blacklist
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|err| TokenError::Encoding(err.to_string()))
    }

    pub fn issue(&self, user_id: &str, username: &str, kind: TokenKind) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let valid = match kind {
            TokenKind::Access => ACCESS_VALID,
            TokenKind::Refresh => REFRESH_VALID,
        };

        self.sign(&Claims {
            sub: user_id.to_owned(),
            username: username.to_owned(),
            kind,
            jti: Uuid::now_v7().simple().to_string(),
            iat: now,
            exp: now + valid,
        })
    }

    pub fn issue_pair(&self, user_id: &str, username: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            token: self.issue(user_id, username, TokenKind::Access)?,
            refresh_token: self.issue(user_id, username, TokenKind::Refresh)?,
        })
    }

    pub async fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?
            .claims;

        if claims.kind != kind {
            return Err(TokenError::WrongKind(kind));
        }
        if claims.iat < self.started_at {
            return Err(TokenError::Stale);
        }
        if self.blacklist.is_revoked(&claims.jti).await {
            return Err(TokenError::Revoked);
        }
        Ok(claims)
    }

    pub async fn revoke(&self, refresh_token: &str) -> Result<Claims, TokenError> {
        let claims = self.verify(refresh_token, TokenKind::Refresh).await?;
        let until = OffsetDateTime::from_unix_timestamp(claims.exp).map_err(|_| TokenError::Invalid)?;
        self.blacklist.revoke(&claims.jti, until).await;
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-secret", Arc::new(Blacklist::default()))
    }

    #[tokio::test]
    async fn access_tokens_carry_the_user() {
        let tokens = issuer();
        let pair = tokens.issue_pair("user-1", "ann").unwrap();

        let claims = tokens.verify(&pair.token, TokenKind::Access).await.unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "ann");
        assert_eq!(claims.exp - claims.iat, ACCESS_VALID);

        let claims = tokens.verify(&pair.refresh_token, TokenKind::Refresh).await.unwrap();
        assert_eq!(claims.exp - claims.iat, REFRESH_VALID);
    }

    #[tokio::test]
    async fn kinds_are_not_interchangeable() {
        let tokens = issuer();
        let pair = tokens.issue_pair("user-1", "ann").unwrap();

        assert_eq!(
            tokens.verify(&pair.refresh_token, TokenKind::Access).await,
            Err(TokenError::WrongKind(TokenKind::Access))
        );
        assert_eq!(
            tokens.verify(&pair.token, TokenKind::Refresh).await,
            Err(TokenError::WrongKind(TokenKind::Refresh))
        );
    }

    #[tokio::test]
    async fn rejects_foreign_and_expired_tokens() {
        let tokens = issuer();
        let other = TokenIssuer::new(b"other-secret", Arc::new(Blacklist::default()));
        let foreign = other.issue("user-1", "ann", TokenKind::Access).unwrap();

        assert_eq!(tokens.verify(&foreign, TokenKind::Access).await, Err(TokenError::Invalid));
        assert_eq!(tokens.verify("garbage", TokenKind::Access).await, Err(TokenError::Invalid));

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let expired = tokens
            .sign(&Claims {
                sub: "user-1".to_owned(),
                username: "ann".to_owned(),
                kind: TokenKind::Access,
                jti: "j".to_owned(),
                iat: now,
                exp: now - 10,
            })
            .unwrap();
        assert_eq!(tokens.verify(&expired, TokenKind::Access).await, Err(TokenError::Expired));
    }

    #[tokio::test]
    async fn tokens_from_before_start_are_stale() {
        let tokens = issuer();
        let token = tokens.issue("user-1", "ann", TokenKind::Access).unwrap();

        let restarted = TokenIssuer {
            started_at: tokens.started_at + 10,
            ..tokens
        };
        assert_eq!(restarted.verify(&token, TokenKind::Access).await, Err(TokenError::Stale));
    }

    #[tokio::test]
    async fn revoked_refresh_tokens_stop_working() {
        let tokens = issuer();
        let pair = tokens.issue_pair("user-1", "ann").unwrap();

        let renewed = tokens.issue_pair("user-1", "ann").unwrap();

        tokens.revoke(&pair.refresh_token).await.unwrap();
        assert_eq!(
            tokens.verify(&pair.refresh_token, TokenKind::Refresh).await,
            Err(TokenError::Revoked)
        );
        assert_eq!(tokens.blacklist().len().await, 1);

        assert!(tokens.verify(&renewed.refresh_token, TokenKind::Refresh).await.is_ok());
    }
}
