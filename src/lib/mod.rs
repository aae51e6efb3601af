//! Shared frontend utilities for API access, configuration, errors, and
//! durable storage.
//!
//! ## Core Authentication Flows
//!
//! 1. **Signup:** The client POSTs credentials to `/user/signup`; a successful
//!    response moves the user to the OTP step with their email pre-seeded.
//! 2. **Verification:** The OTP code is submitted to `/user/verify-otp`, which
//!    answers with a bearer token and/or the user profile; both are persisted.
//! 3. **Session:** `/user/info` hydrates the profile with the bearer token; a
//!    "not modified" answer falls back to the cached copy in durable storage.
//!
//! Centralizing these helpers keeps network behavior consistent and avoids
//! duplicated logic in routes and features. These utilities do not handle
//! secrets beyond passing caller-provided bearer tokens as headers, and
//! callers must still avoid logging sensitive data.

#[cfg(target_arch = "wasm32")]
pub(crate) mod api;
pub(crate) mod build_info;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod storage;

#[cfg(target_arch = "wasm32")]
pub(crate) use api::{
    get_optional_json_with_bearer, post_json, post_json_with_bearer, report_client_error,
};
pub(crate) use errors::AppError;
