//! Route gating derived from session state. The predicate is pure; the
//! components wrap it for routes. Gating here is UX only; the API must
//! enforce real access control on every request.

use crate::features::auth::session::Session;

/// The set of views a session may reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Anonymous: only the public entry pages.
    Public,
    /// Some identity evidence but no verified token: the OTP step.
    OtpStep,
    /// Verified token holder: the protected views.
    Protected,
}

/// Maps a session to its reachable views. A token alone is not enough for
/// `Protected` (it may predate verification), and a rehydrated user without a
/// token must re-verify to earn one.
pub fn gate(session: &Session) -> Gate {
    if session.verified && session.token.is_some() {
        Gate::Protected
    } else if session.token.is_some() || session.user.is_some() {
        Gate::OtpStep
    } else {
        Gate::Public
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) use components::{RedirectAuthenticated, RequireSession};

#[cfg(target_arch = "wasm32")]
mod components {
    use super::{Gate, gate};
    use crate::features::auth::state::use_session;
    use crate::routes::paths;
    use leptos::prelude::*;
    use leptos_router::{NavigateOptions, hooks::use_navigate};

    /// Guards protected routes: unverified sessions are sent to the OTP step,
    /// anonymous ones to login.
    #[component]
    pub fn RequireSession(children: Children) -> impl IntoView {
        let session = use_session();
        let navigate = use_navigate();

        Effect::new(move |_| match gate(&session.signal().get()) {
            Gate::Protected => {}
            Gate::OtpStep => navigate(paths::VERIFY_OTP, NavigateOptions::default()),
            Gate::Public => navigate(paths::LOGIN, NavigateOptions::default()),
        });

        view! { {children()} }
    }

    /// Keeps signed-in sessions off the public entry pages.
    #[component]
    pub fn RedirectAuthenticated(children: Children) -> impl IntoView {
        let session = use_session();
        let navigate = use_navigate();

        Effect::new(move |_| {
            if gate(&session.signal().get()) == Gate::Protected {
                navigate(
                    paths::DASHBOARD,
                    NavigateOptions {
                        replace: true,
                        ..Default::default()
                    },
                );
            }
        });

        view! { {children()} }
    }
}

#[cfg(test)]
mod tests {
    use super::{Gate, gate};
    use crate::features::auth::session::{Session, User};

    #[test]
    fn anonymous_sessions_stay_public() {
        assert_eq!(gate(&Session::default()), Gate::Public);
    }

    #[test]
    fn unverified_user_is_held_at_the_otp_step() {
        let session = Session {
            user: Some(User::from_email("a@b.com")),
            ..Default::default()
        };
        assert_eq!(gate(&session), Gate::OtpStep);
    }

    #[test]
    fn unverified_token_is_held_at_the_otp_step() {
        let session = Session {
            token: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(gate(&session), Gate::OtpStep);
    }

    #[test]
    fn rehydrated_user_without_token_is_never_protected() {
        let session = Session {
            user: Some(User::from_email("a@b.com")),
            verified: true,
            ..Default::default()
        };
        assert_eq!(gate(&session), Gate::OtpStep);
    }

    #[test]
    fn verified_token_reaches_protected() {
        let session = Session {
            token: Some("abc".to_string()),
            user: Some(User::from_email("a@b.com")),
            verified: true,
            ..Default::default()
        };
        assert_eq!(gate(&session), Gate::Protected);
    }
}
