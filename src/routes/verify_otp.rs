//! OTP verification route. Submits the emailed code, stores whatever identity
//! evidence the API returns, and refreshes the profile in the background
//! before landing on the dashboard. Resends are gated by the deterministic
//! cooldown policy; its one-second timer is cancelled when the view unmounts.

use crate::app_lib::report_client_error;
use crate::components::{Alert, AlertKind, AppShell, Button, Spinner};
use crate::features::auth::cooldown::{ResendDenied, ResendPolicy, ResendState};
use crate::features::auth::orchestrator;
use crate::features::auth::state::use_session;
use crate::features::auth::types::{ResendOtpRequest, VerifyOtpRequest};
use crate::routes::paths;
use gloo_timers::callback::Interval;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::{NavigateOptions, hooks::use_navigate};

#[derive(Clone)]
struct VerifyInput {
    email: String,
    code: String,
}

/// Result of a verify attempt, as far as the page needs to react.
#[derive(Clone)]
enum VerifyAdvance {
    /// Token issued: the dashboard is reachable.
    Dashboard,
    /// Verified without a token: credentials are still required.
    NeedsLogin,
}

#[component]
pub fn VerifyOtpPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let (email_input, set_email_input) = signal(String::new());
    let (code, set_code) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (info, set_info) = signal::<Option<String>>(None);
    let policy = RwSignal::new(ResendPolicy::default());
    let ticker = StoredValue::new_local(None::<Interval>);

    // The timer must not outlive the view it updates.
    on_cleanup(move || ticker.set_value(None));

    let session_signal = session.signal();
    let known_email =
        Signal::derive(move || session_signal.get().user.map(|user| user.email));

    let verify_action = Action::new_local(move |input: &VerifyInput| {
        let input = input.clone();
        async move {
            orchestrator::verify_otp(
                &session,
                VerifyOtpRequest {
                    email: input.email,
                    code: input.code,
                },
            )
            .await?;

            if session.snapshot().token.is_none() {
                return Ok(VerifyAdvance::NeedsLogin);
            }

            // Refresh the profile in the background; verification already
            // succeeded, so a failure here is informational only.
            spawn_local(async move {
                if let Err(message) = orchestrator::fetch_user_info(&session, None).await {
                    report_client_error("otp-profile-refresh", &message).await;
                }
            });

            Ok(VerifyAdvance::Dashboard)
        }
    });

    Effect::new(move |_| {
        if let Some(result) = verify_action.value().get() {
            match result {
                Ok(VerifyAdvance::Dashboard) => {
                    // replace prevents back-button returning to the OTP step
                    navigate(
                        paths::DASHBOARD,
                        NavigateOptions {
                            replace: true,
                            ..Default::default()
                        },
                    );
                }
                Ok(VerifyAdvance::NeedsLogin) => {
                    set_info.set(Some("Code verified. Please sign in.".to_string()));
                }
                Err(message) => set_error.set(Some(message)),
            }
        }
    });

    let resend_action = Action::new_local(move |email: &String| {
        let email = email.clone();
        async move { orchestrator::resend_otp(&session, ResendOtpRequest { email }).await }
    });

    Effect::new(move |_| {
        if let Some(result) = resend_action.value().get() {
            match result {
                Ok(()) => {
                    set_info.set(Some("A new OTP has been sent to your email.".to_string()));
                    policy.update(|policy| policy.record_send());
                    ticker.set_value(Some(Interval::new(1_000, move || {
                        policy.update(|policy| policy.tick());
                        if !policy.with_untracked(|policy| policy.is_cooling()) {
                            ticker.set_value(None);
                        }
                    })));
                }
                Err(message) => set_error.set(Some(message)),
            }
        }
    });

    let current_email = move || {
        known_email
            .get_untracked()
            .unwrap_or_else(|| email_input.get_untracked().trim().to_string())
    };

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        set_error.set(None);
        set_info.set(None);

        let email_value = current_email();
        let code_value = code.get_untracked().trim().to_string();

        if email_value.is_empty() {
            set_error.set(Some(
                "Please enter your email (the one you used to sign up).".to_string(),
            ));
            return;
        }
        if code_value.is_empty() {
            set_error.set(Some("Please enter the OTP code.".to_string()));
            return;
        }
        if !(4..=6).contains(&code_value.len())
            || !code_value.chars().all(|digit| digit.is_ascii_digit())
        {
            set_error.set(Some("Enter the 4-6 digit numeric code.".to_string()));
            return;
        }

        verify_action.dispatch(VerifyInput {
            email: email_value,
            code: code_value,
        });
    };

    let on_resend = move |_| {
        set_error.set(None);
        set_info.set(None);

        let email_value = current_email();
        if email_value.is_empty() {
            set_error.set(Some("Please enter your email to resend OTP.".to_string()));
            return;
        }

        match policy.with_untracked(|policy| policy.check()) {
            Ok(()) => {
                resend_action.dispatch(email_value);
            }
            Err(ResendDenied::Cooling { remaining }) => {
                set_error.set(Some(format!(
                    "Please wait {remaining}s before resending."
                )));
            }
            Err(ResendDenied::AttemptsExhausted) => {
                set_error.set(Some("Max resend attempts reached. Try later.".to_string()));
            }
        }
    };

    let verify_pending = verify_action.pending();
    let resend_pending = resend_action.pending();
    let resend_blocked = Signal::derive(move || {
        resend_pending.get()
            || verify_pending.get()
            || policy.with(|policy| policy.check().is_err())
    });

    view! {
        <AppShell>
            <div class="max-w-md mx-auto">
                <h1 class="text-2xl font-semibold text-gray-900 dark:text-white mb-4">
                    "Verify OTP"
                </h1>

                {move || match known_email.get() {
                    Some(email) => view! {
                        <p class="mb-3 text-sm text-gray-600 dark:text-gray-300">
                            "OTP sent to " <span class="font-semibold">{email}</span>
                        </p>
                    }
                    .into_any(),
                    None => view! {
                        <div class="mb-5">
                            <label
                                class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                for="email"
                            >
                                "Email"
                            </label>
                            <input
                                id="email"
                                type="email"
                                class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white dark:focus:ring-blue-500 dark:focus:border-blue-500"
                                autocomplete="email"
                                placeholder="Enter the email you used to sign up"
                                on:input=move |event| set_email_input.set(event_target_value(&event))
                            />
                        </div>
                    }
                    .into_any(),
                }}

                <form on:submit=on_submit>
                    <div class="mb-5">
                        <label
                            class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                            for="code"
                        >
                            "OTP Code"
                        </label>
                        <input
                            id="code"
                            inputmode="numeric"
                            maxlength="6"
                            class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white dark:focus:ring-blue-500 dark:focus:border-blue-500"
                            autocomplete="one-time-code"
                            required
                            on:input=move |event| set_code.set(event_target_value(&event))
                        />
                    </div>
                    <Button button_type="submit" disabled=verify_action.pending()>
                        {move || {
                            if verify_action.pending().get() { "Verifying..." } else { "Verify OTP" }
                        }}
                    </Button>
                </form>

                <div class="mt-4 flex items-center justify-between">
                    <span class="text-sm text-gray-600 dark:text-gray-300">
                        "Didn't get it?"
                    </span>
                    <div class="flex items-center gap-2">
                        <button
                            type="button"
                            class="font-medium text-blue-600 hover:underline dark:text-blue-400 text-sm disabled:text-gray-400 disabled:no-underline disabled:cursor-not-allowed"
                            disabled=move || resend_blocked.get()
                            on:click=on_resend
                        >
                            "Resend OTP"
                        </button>
                        {move || match policy.with(|policy| policy.state()) {
                            ResendState::Cooling { remaining } => Some(view! {
                                <span class="text-xs text-gray-500 dark:text-gray-400">
                                    {format!("({remaining}s)")}
                                </span>
                            }),
                            ResendState::Ready => None,
                        }}
                    </div>
                </div>

                {move || {
                    verify_action
                        .pending()
                        .get()
                        .then_some(view! { <div class="mt-4"><Spinner /></div> })
                }}
                {move || {
                    info.get()
                        .map(|message| {
                            view! {
                                <div class="mt-4">
                                    <Alert kind=AlertKind::Info message=message />
                                </div>
                            }
                        })
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

                <p class="mt-4 text-xs text-gray-500 dark:text-gray-400">
                    "If you still have trouble, check your spam folder or contact support."
                </p>
            </div>
        </AppShell>
    }
}
