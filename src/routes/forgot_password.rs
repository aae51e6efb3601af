//! Forgot-password route. A successful request advances to the reset step
//! carrying the email in the query string so the user only types it once.

use crate::components::{Alert, AlertKind, AppShell, Button, Spinner};
use crate::features::auth::orchestrator;
use crate::features::auth::state::use_session;
use crate::features::auth::types::ForgotPasswordRequest;
use crate::routes::paths;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use web_sys::UrlSearchParams;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let (email, set_email) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let forgot_action = Action::new_local(move |email: &String| {
        let email = email.clone();
        async move {
            orchestrator::forgot_password(&session, ForgotPasswordRequest { email: email.clone() })
                .await
                .map(|()| email)
        }
    });

    Effect::new(move |_| {
        if let Some(result) = forgot_action.value().get() {
            match result {
                Ok(email) => navigate(&reset_path(&email), Default::default()),
                Err(message) => set_error.set(Some(message)),
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        set_error.set(None);

        let email_value = email.get_untracked().trim().to_string();
        if email_value.is_empty() {
            set_error.set(Some("Email is required.".to_string()));
            return;
        }
        if !email_value.contains('@') {
            set_error.set(Some("Email address looks invalid.".to_string()));
            return;
        }

        forgot_action.dispatch(email_value);
    };

    view! {
        <AppShell>
            <form class="max-w-sm mx-auto" on:submit=on_submit>
                <h1 class="text-2xl font-semibold text-gray-900 dark:text-white mb-2">
                    "Forgot password"
                </h1>
                <p class="mb-5 text-sm text-gray-600 dark:text-gray-300">
                    "We will email you a reset code."
                </p>
                <div class="mb-5">
                    <label
                        class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                        for="email"
                    >
                        "Your email"
                    </label>
                    <input
                        id="email"
                        type="email"
                        class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white dark:focus:ring-blue-500 dark:focus:border-blue-500"
                        autocomplete="email"
                        placeholder="name@inbox.im"
                        required
                        on:input=move |event| set_email.set(event_target_value(&event))
                    />
                </div>
                <Button button_type="submit" disabled=forgot_action.pending()>
                    "Send Reset Code"
                </Button>
                {move || {
                    forgot_action
                        .pending()
                        .get()
                        .then_some(view! { <div class="mt-4"><Spinner /></div> })
                }}
                {move || {
                    error
                        .get()
                        .map(|message| {
                            view! {
                                <div class="mt-4">
                                    <Alert kind=AlertKind::Error message=message />
                                </div>
                            }
                        })
                }}
            </form>
        </AppShell>
    }
}

/// Builds the reset route with the email percent-encoded in the query.
fn reset_path(email: &str) -> String {
    let params = UrlSearchParams::new().ok();
    match params {
        Some(params) => {
            params.append("email", email);
            format!("{}?{}", paths::RESET_PASSWORD, String::from(params.to_string()))
        }
        None => paths::RESET_PASSWORD.to_string(),
    }
}
