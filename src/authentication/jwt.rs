use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    http::status::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http_err::ErrorRep;

/// The claims carried by a validated access token.
#[derive(Deserialize, Serialize)]
pub struct TokenClaims {
    iss: String,
    sub: String,
}

impl TokenClaims {
    /// Get the ID of the user that the token claims represent.
    ///
    /// This is the user who made the request.
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for TokenClaims
where
    axum_jwks::Jwks: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthenticationError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jwks = axum_jwks::Jwks::from_ref(state);

        let token = axum_jwks::Token::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                debug!("Request is missing an authentication token.");

                AuthenticationError::MissingToken
            })?;

        let token_data = jwks.validate_claims(token.value()).map_err(|error| {
            debug!(?error, "Rejected invalid authentication token.");

            AuthenticationError::InvalidToken
        })?;

        Ok(token_data.claims)
    }
}

pub enum AuthenticationError {
    InvalidToken,
    MissingToken,
}

impl IntoResponse for AuthenticationError {
    fn into_response(self) -> axum::response::Response {
        let message = match self {
            Self::InvalidToken => "Invalid authentication token.",
            Self::MissingToken => "No authentication token provided.",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorRep {
                message: message.to_owned(),
            }),
        )
            .into_response()
    }
}
