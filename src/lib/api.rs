//! HTTP helpers for the auth API with consistent timeouts and error handling.
//! The endpoint wrappers in `features::auth::client` use these helpers to
//! avoid duplicating request setup and to enforce a predictable timeout
//! policy. Bearer tokens are attached here from caller-provided values and are
//! never logged.

use super::config::AppConfig;
use super::errors::{AppError, server_message};
use gloo_net::http::{Request, Response};
use gloo_timers::callback::Timeout;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::to_string;
use web_sys::AbortController;

/// Default request timeout (milliseconds) applied to all HTTP helpers.
const DEFAULT_TIMEOUT_MS: u32 = 10_000;

/// Same-origin endpoint for best-effort client error reports.
const DIAGNOSTICS_PATH: &str = "/api/errors";

/// Posts JSON and parses a JSON response.
pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
) -> Result<T, AppError> {
    let response = send_post(&build_url(path), body, None).await?;
    handle_json_response(response).await
}

/// Posts JSON with a bearer token and parses a JSON response.
pub async fn post_json_with_bearer<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
    token: &str,
) -> Result<T, AppError> {
    let response = send_post(&build_url(path), body, Some(token)).await?;
    handle_json_response(response).await
}

/// Fetches JSON with a bearer token, treating "not modified" answers as absent.
///
/// The user-info endpoint may reply 304 or with an empty body when the profile
/// is unchanged; both map to `Ok(None)` so callers can fall back to their
/// cached copy.
pub async fn get_optional_json_with_bearer<T: DeserializeOwned>(
    path: &str,
    token: &str,
) -> Result<Option<T>, AppError> {
    let url = build_url(path);
    let bearer = format!("Bearer {token}");
    let response = send_with_timeout(move |signal| {
        Request::get(&url)
            .header("Authorization", &bearer)
            .abort_signal(Some(signal))
            .build()
            .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
    })
    .await?;

    if response.status() == 304 {
        return Ok(None);
    }
    if response.ok() {
        let body = response.text().await.unwrap_or_default();
        if body.trim().is_empty() {
            return Ok(None);
        }
        return serde_json::from_str::<T>(&body)
            .map(Some)
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")));
    }

    Err(http_error(response).await)
}

/// Reports a client-side error to the diagnostics endpoint, best effort.
///
/// Failures are ignored; diagnostics must never interfere with the flow that
/// triggered them. The report carries no credentials or token material.
pub async fn report_client_error(title: &str, message: &str) {
    let url = web_sys::window()
        .and_then(|window| window.location().href().ok())
        .unwrap_or_default();
    let payload = serde_json::json!({
        "title": title,
        "error": { "message": message },
        "url": url,
        "timestamp": js_sys::Date::new_0().to_iso_string().as_string(),
    });

    if let Ok(request) = Request::post(DIAGNOSTICS_PATH)
        .header("Content-Type", "application/json")
        .body(payload.to_string())
    {
        let _ = request.send().await;
    }
}

/// Builds a URL from the configured API base URL and the provided path.
fn build_url(path: &str) -> String {
    let config = AppConfig::load();
    let base = config.api_base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

async fn send_post<B: Serialize>(
    url: &str,
    body: &B,
    token: Option<&str>,
) -> Result<Response, AppError> {
    let payload = to_string(body)
        .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
    let url = url.to_string();
    let bearer = token.map(|token| format!("Bearer {token}"));

    send_with_timeout(move |signal| {
        let mut builder = Request::post(&url)
            .header("Content-Type", "application/json")
            .abort_signal(Some(signal));

        if let Some(bearer) = &bearer {
            builder = builder.header("Authorization", bearer);
        }

        builder
            .body(payload)
            .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
    })
    .await
}

/// Maps network errors into user-facing `AppError` variants with timeout detection.
fn map_request_error(err: gloo_net::Error) -> AppError {
    let message = err.to_string();
    let lowered = message.to_lowercase();

    if lowered.contains("timeout") || lowered.contains("abort") {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {message}"))
    }
}

/// Sends a request with an abort timeout to avoid hanging UI state.
async fn send_with_timeout(
    build_request: impl FnOnce(&web_sys::AbortSignal) -> Result<Request, AppError>,
) -> Result<Response, AppError> {
    let controller = AbortController::new()
        .map_err(|_| AppError::Config("Failed to initialize request timeout.".to_string()))?;
    let signal = controller.signal();
    let timeout_controller = controller.clone();
    let _timeout = Timeout::new(DEFAULT_TIMEOUT_MS, move || timeout_controller.abort());

    let request = build_request(&signal)?;
    request.send().await.map_err(map_request_error)
}

/// Parses JSON responses and surfaces HTTP errors with extracted messages.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    if response.ok() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AppError::Http {
        status,
        message: server_message(&body),
    }
}
