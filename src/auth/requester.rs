use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::debug;

use crate::{
    ApiError, AppError,
    model::{Identifier, User},
};

use super::{TokenIssuer, TokenKind};

/// The authenticated user behind a request, from its `Authorization: Bearer` access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub id: String,
}

impl Requester {
    pub fn identifier(&self) -> Identifier<User> {
        Identifier::Key(self.id.clone())
    }
}

impl<S> FromRequestParts<S> for Requester
where
    TokenIssuer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::InvalidToken)?;

        let tokens = TokenIssuer::from_ref(state);
        match tokens.verify(token, TokenKind::Access).await {
            Ok(claims) => Ok(Requester { id: claims.sub }),
            Err(err) => {
                debug!(%err, "rejected access token");
                Err(ApiError::InvalidToken.into())
            }
        }
    }
}
