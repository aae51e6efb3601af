//! Client wrappers for the auth API endpoints. These helpers centralize
//! endpoint paths and bearer handling so orchestration code never builds
//! requests by hand. Credentials pass through here and must never be logged.

use crate::{
    app_lib::{AppError, get_optional_json_with_bearer, post_json, post_json_with_bearer},
    features::auth::types::{
        ForgotPasswordRequest, LoginRequest, LoginResponse, ProfileBody, ProfileUpdate,
        ResendOtpRequest, ResetPasswordRequest, SignupRequest, StatusResponse, UpdateUserResponse,
        VerifyOtpRequest, VerifyOtpResponse,
    },
};

/// Registers a new account; a success moves the user to the OTP step.
pub async fn signup(request: &SignupRequest) -> Result<StatusResponse, AppError> {
    post_json("/user/signup", request).await
}

/// Exchanges credentials for a bearer token.
pub async fn login(request: &LoginRequest) -> Result<LoginResponse, AppError> {
    post_json("/user/login", request).await
}

/// Submits the emailed OTP code; the answer may carry a token, a user, or both.
pub async fn verify_otp(request: &VerifyOtpRequest) -> Result<VerifyOtpResponse, AppError> {
    post_json("/user/verify-otp", request).await
}

/// Requests a fresh OTP email. Rate limiting lives client-side in the resend
/// policy; the server acknowledges informationally.
pub async fn resend_otp(request: &ResendOtpRequest) -> Result<StatusResponse, AppError> {
    post_json("/user/resend-otp", request).await
}

/// Fetches the profile for the bearer token. `Ok(None)` means "not modified";
/// callers fall back to their cached copy.
pub async fn user_info(token: &str) -> Result<Option<ProfileBody>, AppError> {
    get_optional_json_with_bearer("/user/info", token).await
}

/// Starts the password-reset flow for the given email.
pub async fn forgot_password(request: &ForgotPasswordRequest) -> Result<StatusResponse, AppError> {
    post_json("/user/forgot-password", request).await
}

/// Completes the password-reset flow with the emailed code.
pub async fn reset_password(request: &ResetPasswordRequest) -> Result<StatusResponse, AppError> {
    post_json("/user/updatePassword", request).await
}

/// Updates profile fields for the authenticated user.
pub async fn update_user(
    update: &ProfileUpdate,
    token: &str,
) -> Result<UpdateUserResponse, AppError> {
    post_json_with_bearer("/user/update", update, token).await
}
