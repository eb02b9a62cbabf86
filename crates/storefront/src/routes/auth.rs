//! Authentication route handlers.
//!
//! Sign-in stores the identity under `userInfo` in the session. Credentials
//! go to the store API; when it is unreachable, or the shopper asks for it,
//! the demo identity is used instead so checkout stays usable offline.
//! Registration follows the same rule, keeping the submitted name and email.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use fashion_store_core::{Email, FieldErrors, RegistrationForm, UserInfo};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::identity::IdentityStore;
use crate::services::ApiStatus;
use crate::state::AppState;
use crate::storage::SessionStore;

/// Signed-in identity, without the auth token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub demo: bool,
}

impl From<&UserInfo> for UserView {
    fn from(user: &UserInfo) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.to_string(),
            is_admin: user.is_admin,
            demo: user.is_demo(),
        }
    }
}

/// Sign-in page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPageView {
    pub user: Option<UserView>,
    pub api: ApiStatus,
    /// Shown above the form while the API cannot take credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<&'static str>,
}

/// Login request.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Skip the API and sign in as the demo user.
    #[serde(default)]
    pub demo: bool,
}

impl LoginForm {
    /// Check the fields the API needs. Every failing field is reported.
    fn validate(&self) -> std::result::Result<Email, FieldErrors> {
        let mut errors = FieldErrors::default();

        let email = if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
            None
        } else {
            Email::parse(self.email.trim())
                .map_err(|_| errors.add("email", "Email is invalid"))
                .ok()
        };

        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(email),
            _ => Err(errors),
        }
    }
}

/// Current identity, or `null` when signed out.
#[instrument(skip(session))]
pub async fn me(session: Session) -> Result<Json<Option<UserView>>> {
    let store = SessionStore::new(session);
    let user = IdentityStore::new(&store).current().await?;
    Ok(Json(user.as_ref().map(UserView::from)))
}

/// Sign-in page: current identity and whether credentials can be checked.
#[instrument(skip(state, session))]
pub async fn login_page(State(state): State<AppState>, session: Session) -> Result<Json<LoginPageView>> {
    let store = SessionStore::new(session);
    let user = IdentityStore::new(&store).current().await?;
    let api = state.api().health().await;

    Ok(Json(LoginPageView {
        user: user.as_ref().map(UserView::from),
        api,
        banner: api.banner(),
    }))
}

/// Sign in.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<UserView>> {
    let user = if form.demo {
        UserInfo::demo(Email::parse(form.email.trim()).ok())
    } else {
        let email = form.validate().map_err(AppError::Validation)?;
        state.users().login_or_demo(&email, &form.password).await?
    };

    let store = SessionStore::new(session);
    IdentityStore::new(&store).sign_in(&user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Json(UserView::from(&user)))
}

/// Create an account and sign in as it.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegistrationForm>,
) -> Result<(StatusCode, Json<UserView>)> {
    let registration = form.validate().map_err(AppError::Validation)?;
    let user = state.users().register_or_demo(&registration).await?;

    let store = SessionStore::new(session);
    IdentityStore::new(&store).sign_in(&user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(demo = user.is_demo(), "Registered");

    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

/// Sign out. Cart, wishlist and checkout data stay in the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Option<UserView>>> {
    let store = SessionStore::new(session);
    IdentityStore::new(&store).sign_out().await?;
    clear_sentry_user();
    tracing::info!("Signed out");
    Ok(Json(None))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_reports_every_field() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));

        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: "123456".to_string(),
            demo: false,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_login_form_valid() {
        let form = LoginForm {
            email: " jane@example.com ".to_string(),
            password: "123456".to_string(),
            demo: false,
        };
        assert_eq!(form.validate().unwrap().as_str(), "jane@example.com");
    }

    #[test]
    fn test_user_view_hides_token() {
        let json = serde_json::to_string(&UserView::from(&UserInfo::demo(None))).unwrap();
        assert!(json.contains("\"demo\":true"));
        assert!(!json.contains("demo-token-123"));
    }
}
