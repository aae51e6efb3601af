//! Signup route. Validates inputs locally, submits credentials, and moves the
//! user to the OTP step on success. An account that already finished
//! verification is pointed at login instead of the OTP step.

use crate::components::{Alert, AlertKind, AppShell, Button, Spinner};
use crate::features::auth::guards::RedirectAuthenticated;
use crate::features::auth::orchestrator::{self, SignupOutcome};
use crate::features::auth::state::use_session;
use crate::features::auth::types::SignupRequest;
use crate::routes::paths;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::{components::A, hooks::use_navigate};

/// Minimum password length enforced by the client for early UX feedback.
const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Clone)]
/// Captures signup form input for the async action without borrowing signals.
struct SignupInput {
    email: String,
    password: String,
}

/// Renders the signup form and drives the signup flow.
#[component]
pub fn SignUpPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (account_exists, set_account_exists) = signal(false);

    let signup_action = Action::new_local(move |input: &SignupInput| {
        let input = input.clone();
        async move {
            orchestrator::signup(
                &session,
                SignupRequest {
                    email: input.email,
                    password: input.password,
                },
            )
            .await
        }
    });

    Effect::new(move |_| {
        if let Some(outcome) = signup_action.value().get() {
            match outcome {
                SignupOutcome::VerificationPending => {
                    navigate(paths::VERIFY_OTP, Default::default());
                }
                SignupOutcome::AlreadyRegistered => {
                    set_account_exists.set(true);
                    set_error.set(Some("User already exists. Please log in.".to_string()));
                }
                SignupOutcome::Rejected(message) => set_error.set(Some(message)),
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        set_error.set(None);
        set_account_exists.set(false);

        let email_value = email.get_untracked().trim().to_string();
        let password_value = password.get_untracked();

        if email_value.is_empty() || password_value.trim().is_empty() {
            set_error.set(Some("Email and password are required.".to_string()));
            return;
        }
        if !email_value.contains('@') {
            set_error.set(Some("Email address looks invalid.".to_string()));
            return;
        }
        if password_value.trim().len() < MIN_PASSWORD_LENGTH {
            set_error.set(Some(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters."
            )));
            return;
        }

        session.with_store(|store| store.clear_error());
        signup_action.dispatch(SignupInput {
            email: email_value,
            password: password_value,
        });
    };

    view! {
        <RedirectAuthenticated>
            <AppShell>
                <form class="max-w-sm mx-auto" on:submit=on_submit>
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
                    <div class="mb-5">
                        <label
                            class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                            for="password"
                        >
                            "Your password"
                        </label>
                        <input
                            id="password"
                            type="password"
                            class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white dark:focus:ring-blue-500 dark:focus:border-blue-500"
                            autocomplete="new-password"
                            required
                            on:input=move |event| set_password.set(event_target_value(&event))
                        />
                    </div>
                    <Button button_type="submit" disabled=signup_action.pending()>
                        "Sign Up"
                    </Button>
                    {move || {
                        signup_action
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
                    {move || {
                        account_exists
                            .get()
                            .then_some(view! {
                                <p class="mt-4 text-sm text-gray-600 dark:text-gray-300">
                                    <A
                                        href=paths::LOGIN
                                        {..}
                                        class="font-medium text-blue-600 hover:underline dark:text-blue-400"
                                    >
                                        "Go to login"
                                    </A>
                                </p>
                            })
                    }}
                </form>
            </AppShell>
        </RedirectAuthenticated>
    }
}
