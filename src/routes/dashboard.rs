//! Protected landing page. Reaching it requires a verified token; the guard
//! bounces everyone else to the OTP step or login. The profile is hydrated
//! lazily when the session has a token but no user yet, and the display name
//! can be edited in place.

use crate::components::{Alert, AlertKind, AppShell, Button, Spinner};
use crate::features::auth::guards::RequireSession;
use crate::features::auth::orchestrator;
use crate::features::auth::session::RequestStatus;
use crate::features::auth::state::use_session;
use crate::features::auth::types::ProfileUpdate;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();

    Effect::new(move |_| {
        let snapshot = session.snapshot();
        if snapshot.token.is_some() && snapshot.user.is_none() {
            spawn_local(async move {
                // Failure keeps the last known state; the error surfaces below.
                let _ = orchestrator::fetch_user_info(&session, None).await;
            });
        }
    });

    let session_signal = session.signal();
    let user = Signal::derive(move || session_signal.get().user);
    let pending =
        Signal::derive(move || session_signal.get().status == RequestStatus::Pending);
    let error = Signal::derive(move || session_signal.get().error);

    let (display_name, set_display_name) = signal(String::new());
    let (saved, set_saved) = signal(false);
    let update_action = Action::new_local(move |name: &String| {
        let update = ProfileUpdate {
            display_name: Some(name.clone()),
        };
        async move { orchestrator::update_user(&session, update, None).await }
    });

    Effect::new(move |_| {
        if let Some(result) = update_action.value().get() {
            // Failures surface through the session error below.
            set_saved.set(result.is_ok());
        }
    });

    let on_save = move |event: SubmitEvent| {
        event.prevent_default();
        set_saved.set(false);

        let name = display_name.get_untracked().trim().to_string();
        if name.is_empty() {
            return;
        }
        session.with_store(|store| store.clear_error());
        update_action.dispatch(name);
    };

    view! {
        <RequireSession>
            <AppShell>
                <div class="max-w-lg mx-auto text-center">
                    <h1 class="text-2xl font-semibold text-gray-900 dark:text-white">
                        "Welcome to your dashboard"
                    </h1>
                    {move || match user.get() {
                        Some(user) => view! {
                            <div class="mt-4 space-y-1">
                                <p class="text-gray-900 dark:text-white font-medium">
                                    {user.display_name.unwrap_or_else(|| user.email.clone())}
                                </p>
                                <p class="text-sm text-gray-500 dark:text-gray-400">
                                    {user.email}
                                </p>
                                {user
                                    .role
                                    .map(|role| {
                                        view! {
                                            <p class="text-sm text-gray-500 dark:text-gray-400">
                                                "Role: " {role}
                                            </p>
                                        }
                                    })}
                            </div>
                        }
                        .into_any(),
                        None => view! {
                            <div class="mt-4 flex justify-center">
                                <Spinner />
                            </div>
                        }
                        .into_any(),
                    }}
                    {move || {
                        pending.get()
                            .then_some(view! {
                                <p class="mt-2 text-xs text-gray-400">"Refreshing profile..."</p>
                            })
                    }}

                    <form class="mt-8 flex items-end justify-center gap-3" on:submit=on_save>
                        <div class="text-left">
                            <label
                                class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                                for="display_name"
                            >
                                "Display name"
                            </label>
                            <input
                                id="display_name"
                                class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white dark:focus:ring-blue-500 dark:focus:border-blue-500"
                                autocomplete="name"
                                on:input=move |event| set_display_name.set(event_target_value(&event))
                            />
                        </div>
                        <Button button_type="submit" disabled=update_action.pending()>
                            "Save"
                        </Button>
                    </form>
                    {move || {
                        saved
                            .get()
                            .then_some(view! {
                                <div class="mt-4">
                                    <Alert
                                        kind=AlertKind::Success
                                        message="Profile updated.".to_string()
                                    />
                                </div>
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
                </div>
            </AppShell>
        </RequireSession>
    }
}
