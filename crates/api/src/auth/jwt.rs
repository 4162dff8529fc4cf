use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lms_core::error::CoreError;
use lms_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Refresh tokens live for seven days.
pub const REFRESH_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Token kind embedded in the `typ` claim so an access token can never be
/// replayed against the refresh endpoint (and vice versa).
pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT claims for authenticated sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's database id.
    pub sub: DbId,
    /// The user's role at issue time.
    pub role: String,
    /// Token kind (`access` or `refresh`).
    pub typ: String,
    /// Expiration time (unix seconds).
    pub exp: u64,
    /// Issued-at time (unix seconds).
    pub iat: u64,
    /// Unique token id.
    pub jti: String,
}

/// JWT signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret used to sign tokens.
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_expiry_secs: u64,
}

impl JwtConfig {
    /// Load from environment. `JWT_SECRET` is required; the process will not
    /// start without it. `JWT_ACCESS_EXPIRY_SECS` defaults to one hour.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let access_expiry_secs: u64 = std::env::var("JWT_ACCESS_EXPIRY_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_SECS must be a valid u64");

        Self {
            secret,
            access_expiry_secs,
        }
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn generate_token(
    config: &JwtConfig,
    user_id: DbId,
    role: &str,
    typ: &str,
    expiry_secs: u64,
) -> Result<String, CoreError> {
    let iat = now_secs();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        typ: typ.to_string(),
        exp: iat + expiry_secs,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| CoreError::Internal(format!("failed to sign token: {e}")))
}

/// Generate a short-lived access token for the given user.
pub fn generate_access_token(
    config: &JwtConfig,
    user_id: DbId,
    role: &str,
) -> Result<String, CoreError> {
    generate_token(
        config,
        user_id,
        role,
        TOKEN_TYPE_ACCESS,
        config.access_expiry_secs,
    )
}

/// Generate a long-lived refresh token for the given user.
pub fn generate_refresh_token(
    config: &JwtConfig,
    user_id: DbId,
    role: &str,
) -> Result<String, CoreError> {
    generate_token(config, user_id, role, TOKEN_TYPE_REFRESH, REFRESH_EXPIRY_SECS)
}

/// Validate a token's signature and expiry, returning its claims.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims, CoreError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))
}

/// Validate a token and additionally require the given `typ` claim.
pub fn validate_token_of_type(
    config: &JwtConfig,
    token: &str,
    typ: &str,
) -> Result<Claims, CoreError> {
    let claims = validate_token(config, token)?;
    if claims.typ != typ {
        return Err(CoreError::Unauthorized("Invalid or expired token".into()));
    }
    Ok(claims)
}
