//! Auth feature module: the session state machine, the per-action request
//! orchestration around it, route gating, and the OTP resend policy. This is
//! the one place session state may change; routes only dispatch and render.
//!
//! Flow Overview: Signup seeds an unverified session and hands off to the OTP
//! step. Verify-OTP stores whichever of token/user the API returns and
//! confirms verification. Login short-circuits straight to a verified
//! session. The session is persisted on every identity mutation and
//! rehydrated at startup.

#[cfg(target_arch = "wasm32")]
pub(crate) mod client;
pub(crate) mod cooldown;
pub(crate) mod guards;
pub(crate) mod orchestrator;
pub(crate) mod session;
#[cfg(target_arch = "wasm32")]
pub(crate) mod state;
pub(crate) mod types;
