//! Sequences each user action as mark-pending, one API call, then
//! response-derived session transitions. Every failure collapses to a single
//! human-readable line via `normalize_error`; the transition logic itself is
//! pure so the protocol can be tested without a network.

use crate::app_lib::AppError;
use crate::app_lib::storage::KeyValueStore;
use crate::features::auth::session::{SessionStore, User};
use crate::features::auth::types::{
    LoginResponse, ProfileBody, StatusResponse, VerifyOtpResponse,
};

/// Per-action fallback messages used when neither the server nor the
/// transport supplied one.
pub mod fallback {
    pub const SIGNUP: &str = "Signup failed";
    pub const LOGIN: &str = "Login failed";
    pub const VERIFY_OTP: &str = "OTP verification failed";
    pub const RESEND_OTP: &str = "Resend OTP failed";
    pub const USER_INFO: &str = "Failed to fetch user info";
    pub const FORGOT_PASSWORD: &str = "Forgot password failed";
    pub const RESET_PASSWORD: &str = "Reset password failed";
    pub const UPDATE_USER: &str = "Update failed";
}

/// Shown when a token cannot be resolved for an authenticated call.
pub const NO_TOKEN_MESSAGE: &str = "No token available";
/// Shown when the API answered "not modified" and nothing was cached.
pub const NO_CACHED_PROFILE_MESSAGE: &str = "No updated user info and no cached user";
/// Local rejection for mismatched reset-password fields.
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match.";

/// Terminal result of a signup attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignupOutcome {
    /// Account created (or still unverified): move to the OTP step.
    VerificationPending,
    /// The account already exists and is verified: route to login instead.
    AlreadyRegistered,
    Rejected(String),
}

/// Reduces any failure to one line: server message if the transport captured
/// one, the transport's own message otherwise, else the action fallback.
pub fn normalize_error(error: &AppError, fallback: &str) -> String {
    match error {
        AppError::Http {
            message: Some(message),
            ..
        } => message.clone(),
        AppError::Http { message: None, .. } => fallback.to_string(),
        AppError::Network(message) | AppError::Timeout(message) => message.clone(),
        _ => fallback.to_string(),
    }
}

/// The backend signals an existing verified account only through prose.
/// Keep the brittle match in this one place so a structured error code can
/// replace it without touching the orchestration.
pub fn is_already_registered(message: &str) -> bool {
    message.to_lowercase().contains("already verified")
}

/// Applies a signup response: success seeds the session with the submitted
/// email so the OTP step knows who is verifying.
pub fn apply_signup<S: KeyValueStore>(
    store: &mut SessionStore<S>,
    email: &str,
    response: &StatusResponse,
) -> SignupOutcome {
    if response.status {
        store.set_user(User::from_email(email));
        store.mark_succeeded();
        return SignupOutcome::VerificationPending;
    }

    let message = response
        .message
        .clone()
        .unwrap_or_else(|| fallback::SIGNUP.to_string());
    store.mark_failed(message.clone());
    classify_signup_rejection(message)
}

/// Folds a transport-level signup failure into the same outcome space.
pub fn reject_signup<S: KeyValueStore>(
    store: &mut SessionStore<S>,
    error: &AppError,
) -> SignupOutcome {
    let message = normalize_error(error, fallback::SIGNUP);
    store.mark_failed(message.clone());
    classify_signup_rejection(message)
}

fn classify_signup_rejection(message: String) -> SignupOutcome {
    if is_already_registered(&message) {
        SignupOutcome::AlreadyRegistered
    } else {
        SignupOutcome::Rejected(message)
    }
}

/// Applies a login response. Authentication requires both the status flag and
/// a token; anything else leaves the session untouched.
pub fn apply_login<S: KeyValueStore>(
    store: &mut SessionStore<S>,
    email: &str,
    response: &LoginResponse,
) -> Result<(), String> {
    match &response.token {
        Some(token) if response.status => {
            store.set_token(token);
            store.set_user(User::from_email(email));
            store.mark_succeeded();
            Ok(())
        }
        _ => {
            let message = response
                .message
                .clone()
                .unwrap_or_else(|| fallback::LOGIN.to_string());
            store.mark_failed(message.clone());
            Err(message)
        }
    }
}

/// Applies a verify-OTP response: whichever of token and user came back is
/// stored, and either one confirms verification.
pub fn apply_verify_otp<S: KeyValueStore>(
    store: &mut SessionStore<S>,
    response: &VerifyOtpResponse,
) -> Result<(), String> {
    if response.token.is_none() && response.user.is_none() {
        let message = response
            .message
            .clone()
            .unwrap_or_else(|| fallback::VERIFY_OTP.to_string());
        store.mark_failed(message.clone());
        return Err(message);
    }

    if let Some(token) = &response.token {
        store.set_token(token);
    }
    if let Some(user) = &response.user {
        store.set_user(user.clone());
    }
    store.confirm_verification();
    store.mark_succeeded();
    Ok(())
}

/// Resolves the profile from a user-info response body. An absent body means
/// "not modified": fall back to the cached copy, else fail.
pub fn resolve_profile<S: KeyValueStore>(
    store: &SessionStore<S>,
    body: Option<ProfileBody>,
) -> Result<User, String> {
    match body {
        Some(body) => Ok(body.into_user()),
        None => store
            .cached_user()
            .ok_or_else(|| NO_CACHED_PROFILE_MESSAGE.to_string()),
    }
}

/// Applies a `{status, message}` acknowledgment for informational actions.
pub fn apply_ack<S: KeyValueStore>(
    store: &mut SessionStore<S>,
    response: &StatusResponse,
    fallback: &str,
) -> Result<(), String> {
    if response.status {
        store.mark_succeeded();
        Ok(())
    } else {
        let message = response
            .message
            .clone()
            .unwrap_or_else(|| fallback.to_string());
        store.mark_failed(message.clone());
        Err(message)
    }
}

/// Reset-password input as submitted; the confirmation field never leaves the
/// client.
#[derive(Clone, Debug)]
pub struct ResetPasswordInput {
    pub email: String,
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Client-side equality check; a mismatch is rejected before any request.
pub fn validate_reset(input: &ResetPasswordInput) -> Result<(), String> {
    if input.new_password != input.confirm_password {
        Err(PASSWORD_MISMATCH_MESSAGE.to_string())
    } else {
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) use dispatch::{
    fetch_user_info, forgot_password, login, logout, resend_otp, reset_password, signup,
    update_user, verify_otp,
};

#[cfg(target_arch = "wasm32")]
mod dispatch {
    use super::*;
    use crate::features::auth::client;
    use crate::features::auth::state::SessionContext;
    use crate::features::auth::types::{
        ForgotPasswordRequest, LoginRequest, ProfileUpdate, ResendOtpRequest,
        ResetPasswordRequest, SignupRequest, UpdateUserResponse, VerifyOtpRequest,
    };

    pub async fn signup(context: &SessionContext, request: SignupRequest) -> SignupOutcome {
        context.with_store(|store| store.mark_pending());
        match client::signup(&request).await {
            Ok(response) => {
                context.with_store(|store| apply_signup(store, &request.email, &response))
            }
            Err(error) => context.with_store(|store| reject_signup(store, &error)),
        }
    }

    pub async fn login(context: &SessionContext, request: LoginRequest) -> Result<(), String> {
        context.with_store(|store| store.mark_pending());
        match client::login(&request).await {
            Ok(response) => {
                context.with_store(|store| apply_login(store, &request.email, &response))
            }
            Err(error) => Err(fail(context, &error, fallback::LOGIN)),
        }
    }

    pub async fn verify_otp(
        context: &SessionContext,
        request: VerifyOtpRequest,
    ) -> Result<(), String> {
        context.with_store(|store| store.mark_pending());
        match client::verify_otp(&request).await {
            Ok(response) => context.with_store(|store| apply_verify_otp(store, &response)),
            Err(error) => Err(fail(context, &error, fallback::VERIFY_OTP)),
        }
    }

    pub async fn resend_otp(
        context: &SessionContext,
        request: ResendOtpRequest,
    ) -> Result<(), String> {
        context.with_store(|store| store.mark_pending());
        match client::resend_otp(&request).await {
            Ok(response) => {
                context.with_store(|store| apply_ack(store, &response, fallback::RESEND_OTP))
            }
            Err(error) => Err(fail(context, &error, fallback::RESEND_OTP)),
        }
    }

    /// Hydrates the profile, resolving the token from the argument, then the
    /// session, then durable storage.
    pub async fn fetch_user_info(
        context: &SessionContext,
        token: Option<String>,
    ) -> Result<User, String> {
        context.with_store(|store| store.mark_pending());

        let token = token
            .or_else(|| context.snapshot().token)
            .or_else(|| context.with_store(|store| store.stored_token()));
        let Some(token) = token else {
            context.with_store(|store| store.mark_failed(NO_TOKEN_MESSAGE));
            return Err(NO_TOKEN_MESSAGE.to_string());
        };

        match client::user_info(&token).await {
            Ok(body) => context.with_store(|store| match resolve_profile(store, body) {
                Ok(user) => {
                    store.set_user(user.clone());
                    store.mark_succeeded();
                    Ok(user)
                }
                Err(message) => {
                    store.mark_failed(message.clone());
                    Err(message)
                }
            }),
            Err(error) => Err(fail(context, &error, fallback::USER_INFO)),
        }
    }

    pub async fn forgot_password(
        context: &SessionContext,
        request: ForgotPasswordRequest,
    ) -> Result<(), String> {
        context.with_store(|store| store.mark_pending());
        match client::forgot_password(&request).await {
            Ok(response) => {
                context.with_store(|store| apply_ack(store, &response, fallback::FORGOT_PASSWORD))
            }
            Err(error) => Err(fail(context, &error, fallback::FORGOT_PASSWORD)),
        }
    }

    pub async fn reset_password(
        context: &SessionContext,
        input: ResetPasswordInput,
    ) -> Result<(), String> {
        // Validation failures never reach the network or the request status.
        validate_reset(&input)?;

        context.with_store(|store| store.mark_pending());
        let request = ResetPasswordRequest {
            email: input.email,
            code: input.code,
            new_password: input.new_password,
        };
        match client::reset_password(&request).await {
            Ok(response) => {
                context.with_store(|store| apply_ack(store, &response, fallback::RESET_PASSWORD))
            }
            Err(error) => Err(fail(context, &error, fallback::RESET_PASSWORD)),
        }
    }

    pub async fn update_user(
        context: &SessionContext,
        update: ProfileUpdate,
        token: Option<String>,
    ) -> Result<(), String> {
        context.with_store(|store| store.mark_pending());

        let token = token
            .or_else(|| context.snapshot().token)
            .or_else(|| context.with_store(|store| store.stored_token()));
        let Some(token) = token else {
            context.with_store(|store| store.mark_failed(NO_TOKEN_MESSAGE));
            return Err(NO_TOKEN_MESSAGE.to_string());
        };

        match client::update_user(&update, &token).await {
            Ok(response) => context.with_store(|store| apply_update(store, response)),
            Err(error) => Err(fail(context, &error, fallback::UPDATE_USER)),
        }
    }

    fn apply_update<S: KeyValueStore>(
        store: &mut SessionStore<S>,
        response: UpdateUserResponse,
    ) -> Result<(), String> {
        if let Some(user) = response.user {
            store.set_user(user);
        }
        if response.status {
            store.mark_succeeded();
            Ok(())
        } else {
            let message = response
                .message
                .unwrap_or_else(|| fallback::UPDATE_USER.to_string());
            store.mark_failed(message.clone());
            Err(message)
        }
    }

    pub fn logout(context: &SessionContext) {
        context.with_store(|store| store.logout());
    }

    fn fail(context: &SessionContext, error: &AppError, fallback: &str) -> String {
        let message = normalize_error(error, fallback);
        context.with_store(|store| store.mark_failed(message.clone()));
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::storage::MemoryStore;
    use crate::features::auth::session::{RequestStatus, SessionStore, USER_KEY};

    fn empty_store() -> SessionStore<MemoryStore> {
        SessionStore::initialize(MemoryStore::new())
    }

    #[test]
    fn normalize_error_prefers_server_then_transport_then_fallback() {
        let with_server = AppError::Http {
            status: 400,
            message: Some("Invalid OTP".to_string()),
        };
        assert_eq!(
            normalize_error(&with_server, fallback::VERIFY_OTP),
            "Invalid OTP"
        );

        let bare_http = AppError::Http {
            status: 500,
            message: None,
        };
        assert_eq!(
            normalize_error(&bare_http, fallback::VERIFY_OTP),
            "OTP verification failed"
        );

        let transport = AppError::Network("Unable to reach the server: refused".to_string());
        assert_eq!(
            normalize_error(&transport, fallback::LOGIN),
            "Unable to reach the server: refused"
        );

        let opaque = AppError::Parse("Failed to decode response: eof".to_string());
        assert_eq!(normalize_error(&opaque, fallback::LOGIN), "Login failed");
    }

    #[test]
    fn already_registered_classification_is_substring_based() {
        assert!(is_already_registered("User already verified"));
        assert!(is_already_registered("Account Already Verified, log in"));
        assert!(!is_already_registered("User already exists"));
    }

    #[test]
    fn signup_success_seeds_user_and_advances_to_otp() {
        let mut store = empty_store();
        let outcome = apply_signup(
            &mut store,
            "a@b.com",
            &StatusResponse {
                status: true,
                message: None,
            },
        );

        assert_eq!(outcome, SignupOutcome::VerificationPending);
        assert_eq!(store.session().user, Some(User::from_email("a@b.com")));
        assert!(!store.session().verified);
        assert_eq!(store.session().status, RequestStatus::Succeeded);
    }

    #[test]
    fn signup_rejection_routes_verified_accounts_to_login() {
        let mut store = empty_store();
        let outcome = apply_signup(
            &mut store,
            "a@b.com",
            &StatusResponse {
                status: false,
                message: Some("User already verified".to_string()),
            },
        );

        assert_eq!(outcome, SignupOutcome::AlreadyRegistered);
        assert_eq!(store.session().user, None);
        assert_eq!(store.session().status, RequestStatus::Failed);
    }

    #[test]
    fn signup_transport_failure_normalizes() {
        let mut store = empty_store();
        let outcome = reject_signup(
            &mut store,
            &AppError::Http {
                status: 422,
                message: Some("Email is taken".to_string()),
            },
        );

        assert_eq!(outcome, SignupOutcome::Rejected("Email is taken".to_string()));
        assert_eq!(store.session().error.as_deref(), Some("Email is taken"));
    }

    #[test]
    fn login_success_stores_token_user_and_verifies() {
        let mut store = empty_store();
        let result = apply_login(
            &mut store,
            "a@b.com",
            &LoginResponse {
                status: true,
                token: Some("abc".to_string()),
                message: None,
            },
        );

        assert_eq!(result, Ok(()));
        let session = store.session();
        assert_eq!(session.token.as_deref(), Some("abc"));
        assert_eq!(session.user, Some(User::from_email("a@b.com")));
        assert!(session.verified);
    }

    #[test]
    fn login_rejection_leaves_session_untouched() {
        let mut store = empty_store();
        let result = apply_login(
            &mut store,
            "a@b.com",
            &LoginResponse {
                status: false,
                token: None,
                message: Some("Invalid credentials".to_string()),
            },
        );

        assert_eq!(result, Err("Invalid credentials".to_string()));
        assert_eq!(store.session().token, None);
        assert_eq!(store.session().user, None);
        assert!(!store.session().verified);
    }

    #[test]
    fn login_without_token_is_a_failure_even_with_status_true() {
        let mut store = empty_store();
        let result = apply_login(
            &mut store,
            "a@b.com",
            &LoginResponse {
                status: true,
                token: None,
                message: None,
            },
        );

        assert_eq!(result, Err("Login failed".to_string()));
        assert_eq!(store.session().token, None);
    }

    #[test]
    fn verify_otp_with_token_only_keeps_user() {
        let mut store = empty_store();
        store.set_user(User::from_email("a@b.com"));

        let result = apply_verify_otp(
            &mut store,
            &VerifyOtpResponse {
                token: Some("xyz".to_string()),
                user: None,
                message: None,
            },
        );

        assert_eq!(result, Ok(()));
        let session = store.session();
        assert_eq!(session.token.as_deref(), Some("xyz"));
        assert_eq!(session.user, Some(User::from_email("a@b.com")));
        assert!(session.verified);
    }

    #[test]
    fn verify_otp_with_user_only_confirms_verification() {
        let mut store = empty_store();
        let result = apply_verify_otp(
            &mut store,
            &VerifyOtpResponse {
                token: None,
                user: Some(User::from_email("a@b.com")),
                message: None,
            },
        );

        assert_eq!(result, Ok(()));
        assert!(store.session().verified);
        assert_eq!(store.session().token, None);
    }

    #[test]
    fn verify_otp_with_neither_field_fails() {
        let mut store = empty_store();
        let result = apply_verify_otp(
            &mut store,
            &VerifyOtpResponse {
                token: None,
                user: None,
                message: Some("Expired code".to_string()),
            },
        );

        assert_eq!(result, Err("Expired code".to_string()));
        assert!(!store.session().verified);
        assert_eq!(store.session().status, RequestStatus::Failed);
    }

    #[test]
    fn resolve_profile_falls_back_to_cached_user() {
        let storage = MemoryStore::with_entries(&[(USER_KEY, r#"{"email":"c@d.com"}"#)]);
        let store = SessionStore::initialize(storage);

        let resolved = resolve_profile(&store, None);
        assert_eq!(resolved, Ok(User::from_email("c@d.com")));
    }

    #[test]
    fn resolve_profile_without_cache_names_the_gap() {
        let store = empty_store();
        assert_eq!(
            resolve_profile(&store, None),
            Err(NO_CACHED_PROFILE_MESSAGE.to_string())
        );
    }

    #[test]
    fn resolve_profile_prefers_fresh_bodies() {
        let storage = MemoryStore::with_entries(&[(USER_KEY, r#"{"email":"stale@d.com"}"#)]);
        let store = SessionStore::initialize(storage);

        let body: ProfileBody =
            serde_json::from_str(r#"{"user":{"email":"fresh@d.com"}}"#).expect("decodes");
        assert_eq!(
            resolve_profile(&store, Some(body)),
            Ok(User::from_email("fresh@d.com"))
        );
    }

    #[test]
    fn ack_maps_status_flag_to_result() {
        let mut store = empty_store();
        assert_eq!(
            apply_ack(
                &mut store,
                &StatusResponse {
                    status: true,
                    message: None
                },
                fallback::RESEND_OTP
            ),
            Ok(())
        );

        assert_eq!(
            apply_ack(
                &mut store,
                &StatusResponse {
                    status: false,
                    message: None
                },
                fallback::RESEND_OTP
            ),
            Err("Resend OTP failed".to_string())
        );
    }

    #[test]
    fn reset_validation_rejects_mismatch_locally() {
        let input = ResetPasswordInput {
            email: "a@b.com".to_string(),
            code: "1234".to_string(),
            new_password: "left".to_string(),
            confirm_password: "right".to_string(),
        };
        assert_eq!(
            validate_reset(&input),
            Err(PASSWORD_MISMATCH_MESSAGE.to_string())
        );

        let matching = ResetPasswordInput {
            confirm_password: "left".to_string(),
            ..input
        };
        assert_eq!(validate_reset(&matching), Ok(()));
    }
}
