//! Bearer-token authentication.
//!
//! Every `/api` route requires `Authorization: Bearer <jwt>`. The token is
//! validated against the identity-provider settings and the resulting
//! [`Caller`] is stored in the request extensions for the handlers.

use std::collections::HashSet;

use api_types::user::UserProfile;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use engine::{Engine, EngineError};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};

/// Identity-provider settings used to validate tokens.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Directory (tenant) of the identity provider. Used to derive the
    /// expected issuer when `issuer` is not set.
    pub tenant_id: Option<String>,
    /// Application id; accepted as audience together with `api://<id>`.
    pub client_id: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub read_scope: Option<String>,
    pub write_scope: Option<String>,
    /// Shared secret for HS256 tokens.
    pub hs256_secret: Option<String>,
    /// PEM public key for RS256 tokens.
    pub rsa_public_key_pem: Option<String>,
}

impl AuthSettings {
    fn expected_issuer(&self) -> Option<String> {
        self.issuer.clone().or_else(|| {
            self.tenant_id
                .as_ref()
                .map(|tenant| format!("https://login.microsoftonline.com/{tenant}/v2.0"))
        })
    }

    fn expected_audiences(&self) -> Vec<String> {
        if let Some(audience) = &self.audience {
            return vec![audience.clone()];
        }
        self.client_id
            .iter()
            .flat_map(|client| [client.clone(), format!("api://{client}")])
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthSetupError {
    #[error("either auth.hs256_secret or auth.rsa_public_key_pem must be set")]
    MissingKey,
    #[error("invalid signing key: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),
}

/// Claims read from a validated token.
#[derive(Clone, Debug, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Stable object id of the user; preferred over `sub` when present.
    pub oid: Option<String>,
    /// Space separated delegated scopes.
    pub scp: Option<String>,
    pub name: Option<String>,
    pub preferred_username: Option<String>,
    pub email: Option<String>,
}

/// The authenticated caller of a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub identity_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub scopes: Vec<String>,
}

impl From<Claims> for Caller {
    fn from(claims: Claims) -> Self {
        Self {
            identity_id: claims.oid.unwrap_or(claims.sub),
            name: claims.name,
            email: claims.email.or(claims.preferred_username),
            scopes: claims
                .scp
                .as_deref()
                .unwrap_or_default()
                .split_whitespace()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl Caller {
    /// Registered profile of the caller.
    pub async fn profile(&self, engine: &Engine) -> Result<UserProfile, ServerError> {
        engine
            .users()
            .get_by_identity(&self.identity_id)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound("user profile not registered".to_string()).into()
            })
    }
}

pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    read_scope: Option<String>,
    write_scope: Option<String>,
}

impl TokenValidator {
    pub fn new(settings: &AuthSettings) -> Result<Self, AuthSetupError> {
        let (decoding_key, algorithm) = match (&settings.rsa_public_key_pem, &settings.hs256_secret)
        {
            (Some(pem), _) => (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256),
            (None, Some(secret)) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
            (None, None) => return Err(AuthSetupError::MissingKey),
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        if let Some(issuer) = settings.expected_issuer() {
            validation.set_issuer(&[issuer]);
        }
        let audiences = settings.expected_audiences();
        if audiences.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&audiences);
        }

        Ok(Self {
            decoding_key,
            validation,
            read_scope: settings.read_scope.clone(),
            write_scope: settings.write_scope.clone(),
        })
    }

    pub fn validate(&self, token: &str) -> Result<Caller, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            tracing::error!("token validation failed: {err}");
            AuthError::InvalidToken
        })?;
        let caller = Caller::from(data.claims);
        self.audit_scopes(&caller);
        Ok(caller)
    }

    /// Scopes are logged for auditing only.
    fn audit_scopes(&self, caller: &Caller) {
        if caller.scopes.is_empty() {
            tracing::warn!(identity = %caller.identity_id, "scope claim not found");
            return;
        }
        tracing::info!(
            identity = %caller.identity_id,
            scopes = %caller.scopes.join(" "),
            "scope found"
        );

        let granted: HashSet<&str> = caller.scopes.iter().map(String::as_str).collect();
        for expected in [&self.read_scope, &self.write_scope].into_iter().flatten() {
            if !granted.contains(expected.as_str()) {
                tracing::debug!(identity = %caller.identity_id, scope = %expected, "configured scope not granted");
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let challenge = match self {
            AuthError::MissingToken => "Bearer",
            AuthError::InvalidToken => "Bearer error=\"invalid_token\"",
        };
        let mut response = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        response
    }
}

/// Middleware validating the bearer token of every request.
pub async fn require_bearer(
    State(state): State<ServerState>,
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        tracing::error!(uri = %request.uri(), "authentication failed: missing bearer token");
        return Err(AuthError::MissingToken);
    };

    let caller = state.validator.validate(auth_header.token())?;
    tracing::debug!(identity = %caller.identity_id, "token validated");

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}
