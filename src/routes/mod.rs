mod dashboard;
mod forgot_password;
mod health;
mod login;
mod not_found;
mod reset_password;
mod signup;
mod verify_otp;

pub(crate) use dashboard::DashboardPage;
pub(crate) use forgot_password::ForgotPasswordPage;
pub(crate) use health::HealthPage;
pub(crate) use login::LoginPage;
pub(crate) use not_found::NotFoundPage;
pub(crate) use reset_password::ResetPasswordPage;
pub(crate) use signup::SignUpPage;
pub(crate) use verify_otp::VerifyOtpPage;

use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Routes};
use leptos_router::path;

/// Route paths shared by navigation and guards.
pub(crate) mod paths {
    pub const DASHBOARD: &str = "/dashboard";
    pub const SIGNUP: &str = "/signup";
    pub const LOGIN: &str = "/login";
    pub const VERIFY_OTP: &str = "/verify-otp";
    pub const FORGOT_PASSWORD: &str = "/forgot-password";
    pub const RESET_PASSWORD: &str = "/reset-password";
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <NotFoundPage /> }>
            <Route path=path!("/") view=|| view! { <Redirect path=paths::SIGNUP /> } />
            <Route path=path!("/signup") view=SignUpPage />
            <Route path=path!("/login") view=LoginPage />
            <Route path=path!("/verify-otp") view=VerifyOtpPage />
            <Route path=path!("/forgot-password") view=ForgotPasswordPage />
            <Route path=path!("/reset-password") view=ResetPasswordPage />
            <Route path=path!("/dashboard") view=DashboardPage />
            <Route path=path!("/health") view=HealthPage />
            <Route path=path!("/*any") view=NotFoundPage />
        </Routes>
    }
}
