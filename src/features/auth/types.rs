//! Request and response payloads for the auth API. Response types decode
//! defensively: the backend omits fields freely, wraps the user profile
//! inconsistently, and signals most outcomes through a `status` flag plus an
//! optional prose `message`.

use crate::features::auth::session::User;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Wire payload for `/user/updatePassword`; the backend expects camelCase.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// Profile fields a user may change; absent fields are left untouched and are
/// not serialized.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Generic `{status, message}` acknowledgment used by signup, resend-OTP,
/// forgot-password and reset-password.
#[derive(Clone, Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VerifyOtpResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `/user/info` answers either `{status, user}` or the bare profile object.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ProfileBody {
    Wrapped { user: User },
    Bare(User),
}

impl ProfileBody {
    pub fn into_user(self) -> User {
        match self {
            ProfileBody::Wrapped { user } => user,
            ProfileBody::Bare(user) => user,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateUserResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_tolerates_missing_fields() {
        let decoded: LoginResponse = serde_json::from_str(r#"{"status":true}"#).expect("decodes");
        assert!(decoded.status);
        assert_eq!(decoded.token, None);
        assert_eq!(decoded.message, None);
    }

    #[test]
    fn verify_otp_response_decodes_token_only() {
        let decoded: VerifyOtpResponse =
            serde_json::from_str(r#"{"token":"xyz"}"#).expect("decodes");
        assert_eq!(decoded.token.as_deref(), Some("xyz"));
        assert_eq!(decoded.user, None);
    }

    #[test]
    fn profile_body_decodes_wrapped_and_bare() {
        let wrapped: ProfileBody =
            serde_json::from_str(r#"{"status":true,"user":{"email":"a@b.com"}}"#)
                .expect("wrapped decodes");
        assert_eq!(wrapped.into_user().email, "a@b.com");

        let bare: ProfileBody =
            serde_json::from_str(r#"{"email":"c@d.com","role":"admin"}"#).expect("bare decodes");
        let user = bare.into_user();
        assert_eq!(user.email, "c@d.com");
        assert_eq!(user.role.as_deref(), Some("admin"));
    }

    #[test]
    fn reset_password_request_uses_wire_casing() {
        let request = ResetPasswordRequest {
            email: "a@b.com".to_string(),
            code: "1234".to_string(),
            new_password: "hunter22".to_string(),
        };
        let json = serde_json::to_string(&request).expect("serializes");
        assert!(json.contains("\"newPassword\""));
        assert!(!json.contains("new_password"));
    }

    #[test]
    fn profile_update_skips_absent_fields() {
        let json = serde_json::to_string(&ProfileUpdate::default()).expect("serializes");
        assert_eq!(json, "{}");

        let json = serde_json::to_string(&ProfileUpdate {
            display_name: Some("Ada".to_string()),
        })
        .expect("serializes");
        assert_eq!(json, r#"{"displayName":"Ada"}"#);
    }
}
