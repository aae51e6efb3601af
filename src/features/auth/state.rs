//! Session context for the frontend. The provider rehydrates the session
//! store from durable storage once on mount and mirrors every transition into
//! a signal, so routes and guards observe exactly the state the store owns.
//! Only the opaque bearer token and non-sensitive profile data are held here.

use crate::app_lib::storage::BrowserStorage;
use crate::features::auth::guards::{Gate, gate};
use crate::features::auth::session::{Session, SessionStore};
use leptos::prelude::*;

#[derive(Clone, Copy)]
/// Session context shared through Leptos. The store itself lives in the local
/// arena; this handle is cheap to copy into closures and views.
pub struct SessionContext {
    store: StoredValue<SessionStore<BrowserStorage>, LocalStorage>,
    session: RwSignal<Session>,
    pub gate: Signal<Gate>,
}

impl SessionContext {
    /// Builds a context around a freshly rehydrated store.
    fn new() -> Self {
        let mut store = SessionStore::initialize(BrowserStorage);
        let session = RwSignal::new(store.session().clone());
        store.subscribe(move |current: &Session| session.set(current.clone()));

        Self {
            store: StoredValue::new_local(store),
            session,
            gate: Signal::derive(move || gate(&session.get())),
        }
    }

    /// Reactive view of the session.
    pub fn signal(&self) -> RwSignal<Session> {
        self.session
    }

    /// Current session without subscribing the caller.
    pub fn snapshot(&self) -> Session {
        self.session.get_untracked()
    }

    /// Applies store transitions; subscribers run before this returns.
    pub fn with_store<R>(&self, apply: impl FnOnce(&mut SessionStore<BrowserStorage>) -> R) -> R {
        self.store
            .try_update_value(apply)
            .expect("session store accessed outside the UI thread")
    }
}

/// Provides the session context and rehydrates the store once on mount.
#[component]
pub fn SessionProvider(children: Children) -> impl IntoView {
    let context = SessionContext::new();
    provide_context(context);

    view! { {children()} }
}

/// Returns the current session context or a fallback empty context.
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().unwrap_or_else(SessionContext::new)
}
