use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde_json::json;
use services::{account, ServiceError};
use tracing::{debug, info, instrument, trace};

use crate::errors::{recover, AppError};
use crate::forms::{AdminLoginForm, LoginForm, RegisterForm};
use crate::handlers::{redirect_with, render};
use crate::schemas::{AppState, Flash, PageView};
use crate::session::SessionContext;

/// Customer login form
#[utoipa::path(
    get,
    path = "/giris",
    tag = "auth",
    responses((status = 200, description = "Login form", body = PageView))
)]
#[instrument(skip(session))]
pub async fn login_form(session: SessionContext) -> Result<PageView, AppError> {
    render(&session, "giris.html", json!({})).await
}

/// Log a customer in by email and password
#[utoipa::path(
    post,
    path = "/giris",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, redirected to /index"),
        (status = 200, description = "Login failed, form shown again with a notice", body = PageView),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: SessionContext,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    trace!("Entering login function");
    match account::login(&state.db, &form.email, &form.password).await {
        Ok(identity) => {
            session.login(&identity).await?;
            Ok(redirect_with(&session, Flash::success("Giriş başarılı!"), "/index")
                .await?
                .into_response())
        }
        Err(err) => {
            debug!("Login refused: {}", err);
            let flash = match err {
                ServiceError::MissingField(_) => Flash::error("Lütfen e-posta ve şifre giriniz."),
                other => recover(other)?,
            };
            session.flash(flash).await?;
            Ok(render(&session, "giris.html", &form).await?.into_response())
        }
    }
}

/// Clear the session
#[utoipa::path(
    get,
    path = "/cikis",
    tag = "auth",
    responses((status = 303, description = "Logged out, redirected to /"))
)]
#[instrument(skip(session))]
pub async fn logout(session: SessionContext) -> Result<Redirect, AppError> {
    session.logout().await?;
    info!("Session cleared");
    redirect_with(&session, Flash::success("Çıkış yapıldı."), "/").await
}

/// Administrator login form
#[utoipa::path(
    get,
    path = "/admin",
    tag = "auth",
    responses((status = 200, description = "Admin login form", body = PageView))
)]
#[instrument(skip(session))]
pub async fn admin_login_form(session: SessionContext) -> Result<PageView, AppError> {
    render(&session, "admin_giris.html", json!({})).await
}

/// Log an administrator in by username and password
#[utoipa::path(
    post,
    path = "/admin",
    tag = "auth",
    request_body(content = AdminLoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, redirected to /admin/panel"),
        (status = 200, description = "Login failed, form shown again with a notice", body = PageView),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn admin_login(
    State(state): State<AppState>,
    session: SessionContext,
    Form(form): Form<AdminLoginForm>,
) -> Result<Response, AppError> {
    trace!("Entering admin_login function");
    match account::admin_login(&state.db, &form.username, &form.password).await {
        Ok(identity) => {
            session.login(&identity).await?;
            Ok(
                redirect_with(&session, Flash::success("Admin girişi başarılı!"), "/admin/panel")
                    .await?
                    .into_response(),
            )
        }
        Err(err) if err.is_user_error() => {
            debug!("Admin login refused: {}", err);
            session
                .flash(Flash::error(
                    "Admin girişi başarısız. Kullanıcı adı veya şifre hatalı.",
                ))
                .await?;
            Ok(render(&session, "admin_giris.html", &form).await?.into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Registration form
#[utoipa::path(
    get,
    path = "/kayit",
    tag = "auth",
    responses((status = 200, description = "Registration form", body = PageView))
)]
#[instrument(skip(session))]
pub async fn register_form(session: SessionContext) -> Result<PageView, AppError> {
    render(&session, "kayit.html", json!({})).await
}

/// Register a customer account
#[utoipa::path(
    post,
    path = "/kayit",
    tag = "auth",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered, redirected to /giris"),
        (status = 200, description = "Registration refused, form shown again with a notice", body = PageView),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    session: SessionContext,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    trace!("Entering register function");
    let context = json!({ "username": form.username, "email": form.email, "full_name": form.full_name });

    match account::register(&state.db, form.into()).await {
        Ok(user) => {
            info!("User {} registered", user.username);
            Ok(redirect_with(
                &session,
                Flash::success("Kayıt başarılı! Lütfen giriş yapın."),
                "/giris",
            )
            .await?
            .into_response())
        }
        Err(err) => {
            let flash = recover(err)?;
            session.flash(flash).await?;
            Ok(render(&session, "kayit.html", context).await?.into_response())
        }
    }
}
