//! Handlers for the `/users` resource (registration, login, verification,
//! token refresh, social sign-in, and profile management).

use axum::extract::{Multipart, State};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use lms_core::error::CoreError;
use lms_db::models::user::{CreateSocialUser, CreateUser, User, UserResponse};
use lms_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, validate_token_of_type, REFRESH_EXPIRY_SECS,
    TOKEN_TYPE_REFRESH,
};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Name of the HTTP-only cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Avatar images are normalized to a 500x500 webp before upload.
const AVATAR_SIZE: u32 = 500;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /users/verify-otp`.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// Request body for `POST /users/resend-otp`.
#[derive(Debug, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

/// Request body for `POST /users/social-auth`.
#[derive(Debug, Deserialize)]
pub struct SocialAuthRequest {
    pub name: String,
    pub email: Option<String>,
    pub provider: String,
    pub social_id: String,
    pub avatar_url: Option<String>,
}

/// Request body for `PATCH /users/profile`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
}

/// Request body for `PATCH /users/password`.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Successful authentication response returned by register, login, social
/// sign-in, and refresh. The refresh token travels in an HTTP-only cookie,
/// never in the body.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Response for OTP endpoints that only acknowledge the action.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users/register
///
/// Create an unverified account, issue a verification code, and sign the
/// user in. Verification mail is sent in the background; a mail failure
/// never fails registration.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name must not be empty".into(),
        )));
    }
    if input.password.len() < 8 {
        return Err(AppError::Core(CoreError::Validation(
            "Password must be at least 8 characters".into(),
        )));
    }

    // 1. Reject duplicate emails up front with a friendly message. The
    //    unique index still backstops a concurrent insert (409 via the
    //    constraint classifier).
    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    // 2. Hash the password and insert the unverified row.
    let password_hash = hash_password(&input.password)?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            password_hash,
        },
    )
    .await?;

    // 3. Issue a verification code and mail it in the background.
    let code = state.otp.issue(&user.email).await?;
    send_verification_mail(&state, user.name.clone(), user.email.clone(), code);

    // 4. Sign the user in right away; verification gates nothing but the
    //    `is_verified` flag until product rules say otherwise.
    auth_response(&state, jar, user)
}

/// POST /api/v1/users/login
///
/// Authenticate with email + password. Unknown email and wrong password
/// produce the same message so accounts cannot be enumerated.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    // Social-only accounts carry no password hash and cannot log in locally.
    let Some(hash) = user.password_hash.as_deref() else {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    };

    if !verify_password(&input.password, hash)? {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    auth_response(&state, jar, user)
}

/// POST /api/v1/users/verify-otp
///
/// Confirm a pending verification code and mark the account verified.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(input): Json<VerifyOtpRequest>,
) -> AppResult<Json<UserResponse>> {
    state.otp.verify(&input.email, &input.otp).await?;

    if !UserRepo::mark_verified(&state.pool, &input.email).await? {
        return Err(AppError::Core(CoreError::NotFoundMsg(
            "No account for this email".into(),
        )));
    }

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;

    Ok(Json(UserResponse::from(user)))
}

/// POST /api/v1/users/resend-otp
///
/// Issue a fresh verification code unless one is still pending, in which
/// case the response says how long to wait.
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(input): Json<ResendOtpRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundMsg("No account for this email".into()))
        })?;

    if user.is_verified {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already verified".into(),
        )));
    }

    let code = state.otp.resend(&user.email).await?;
    send_verification_mail(&state, user.name.clone(), user.email.clone(), code);

    Ok(Json(MessageResponse {
        message: "Verification code sent".into(),
    }))
}

/// POST /api/v1/users/refresh-token
///
/// Exchange the refresh cookie for a new access token and a fresh cookie.
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Missing refresh token".into()))
        })?;

    let claims = validate_token_of_type(&state.config.jwt, &token, TOKEN_TYPE_REFRESH)?;

    let user = UserRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundMsg("User no longer exists".into()))
        })?;

    auth_response(&state, jar, user)
}

/// POST /api/v1/users/logout
///
/// Clear the refresh cookie. Access tokens are stateless and expire on
/// their own, so there is nothing to revoke server-side.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    // Removal cookie must carry the same path as the one set at login.
    let cookie = Cookie::build((REFRESH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();

    (
        jar.remove(cookie),
        Json(MessageResponse {
            message: "Logged out".into(),
        }),
    )
}

/// POST /api/v1/users/social
///
/// Find-or-create an account from an external identity provider. New social
/// accounts are pre-verified and have no local password.
pub async fn social_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<SocialAuthRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let email = input
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "The identity provider did not supply an email address".into(),
            ))
        })?;

    // An existing account with this email (local or social) is signed in
    // as-is; the provider's claim on the address is trusted.
    let user = match UserRepo::find_by_email(&state.pool, email).await? {
        Some(existing) => existing,
        None => {
            UserRepo::create_social(
                &state.pool,
                &CreateSocialUser {
                    name: input.name,
                    email: email.to_string(),
                    provider: input.provider,
                    social_id: input.social_id,
                    avatar_url: input.avatar_url,
                },
            )
            .await?
        }
    };

    auth_response(&state, jar, user)
}

/// GET /api/v1/users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /api/v1/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name must not be empty".into(),
        )));
    }

    let user = UserRepo::update_name(&state.pool, auth_user.user_id, &input.name)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /api/v1/users/password
///
/// Change the password after verifying the current one.
pub async fn update_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdatePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    if input.new_password.len() < 8 {
        return Err(AppError::Core(CoreError::Validation(
            "Password must be at least 8 characters".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;

    let Some(hash) = user.password_hash.as_deref() else {
        return Err(AppError::Core(CoreError::Validation(
            "This account signs in through a social provider and has no password".into(),
        )));
    };

    if !verify_password(&input.old_password, hash)? {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let new_hash = hash_password(&input.new_password)?;
    if !UserRepo::update_password(&state.pool, auth_user.user_id, &new_hash).await? {
        return Err(AppError::Database(sqlx::Error::RowNotFound));
    }

    Ok(Json(MessageResponse {
        message: "Password updated".into(),
    }))
}

/// PATCH /api/v1/users/avatar (multipart)
///
/// Accept an image upload, normalize it to a 500x500 webp, push it to the
/// media store, and persist the new URL. The previous asset is deleted only
/// after the new one is both uploaded and persisted; a failed cleanup is
/// logged, never surfaced.
pub async fn update_avatar(
    State(state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<UserResponse>> {
    let storage = state.storage.clone().ok_or_else(|| {
        AppError::Core(CoreError::External("Media storage is not configured".into()))
    })?;

    // 1. Pull the file bytes out of the multipart body.
    let mut file_bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
            file_bytes = Some(bytes.to_vec());
        }
    }
    let file_bytes = file_bytes
        .ok_or_else(|| AppError::BadRequest("Missing `file` field in multipart body".into()))?;

    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;

    // 2. Normalize, then upload. Nothing is persisted until the upload
    //    succeeds, so a storage failure leaves the old avatar intact.
    let processed = lms_media::resize_and_optimize(
        &file_bytes,
        AVATAR_SIZE,
        AVATAR_SIZE,
        lms_media::OutputFormat::Webp,
        lms_media::ImageFit::Cover,
    )?;
    let asset = storage.upload(processed, "avatars").await?;

    let old_public_id = user.avatar_public_id.clone();
    let updated =
        UserRepo::update_avatar(&state.pool, user.id, &asset.public_id, &asset.url)
            .await?
            .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;

    // 3. Best-effort cleanup of the replaced asset.
    if let Some(public_id) = old_public_id {
        if let Err(e) = storage.delete(&public_id).await {
            tracing::warn!(public_id = %public_id, error = %e, "Failed to delete previous avatar");
        }
    }

    Ok(Json(UserResponse::from(updated)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate both tokens for the user, set the refresh cookie, and build the
/// auth response body.
fn auth_response(
    state: &AppState,
    jar: CookieJar,
    user: User,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let access_token = generate_access_token(&state.config.jwt, user.id, &user.role)?;
    let refresh = generate_refresh_token(&state.config.jwt, user.id, &user.role)?;

    let cookie = Cookie::build((REFRESH_COOKIE, refresh))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(REFRESH_EXPIRY_SECS as i64))
        .build();

    let response = AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_expiry_secs,
        user: UserResponse::from(user),
    };

    Ok((jar.add(cookie), Json(response)))
}

/// Fire-and-forget delivery of the verification code. When SMTP is not
/// configured the send is skipped with a warning.
fn send_verification_mail(state: &AppState, name: String, email: String, code: String) {
    let Some(mailer) = state.mailer.clone() else {
        tracing::warn!(email = %email, "SMTP not configured, skipping verification mail");
        return;
    };
    tokio::spawn(async move {
        if let Err(e) = mailer.send_verification_otp(&email, &name, &code).await {
            tracing::error!(email = %email, error = %e, "Failed to send verification mail");
        }
    });
}
