//! Sign-in commands.
//!
//! The identity is stored under `userInfo` in the data directory, the same
//! document the server keeps in the browser session.

use fashion_store_core::{Email, RegistrationForm, UserInfo};

use super::{CommandError, Context};
use crate::output;

/// Sign in with credentials, or as the demo user.
///
/// Credentials go to the store API; an unreachable API signs in the demo
/// identity for the given email instead.
pub async fn login(
    ctx: &Context,
    email: Option<&str>,
    password: Option<&str>,
    demo: bool,
) -> Result<String, CommandError> {
    let email = email.map(str::trim).filter(|e| !e.is_empty());

    let user = if demo {
        UserInfo::demo(email.map(Email::parse).transpose()?)
    } else {
        let email = Email::parse(email.ok_or(CommandError::Usage("--email is required"))?)?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(CommandError::Usage("--password is required"))?;
        ctx.state().users().login_or_demo(&email, password).await?
    };

    ctx.identity().sign_in(&user).await?;
    Ok(format!("Signed in as {}", output::user(Some(&user))))
}

/// Create an account and sign in as it.
///
/// An unreachable API signs in a demo identity with the given name and email.
pub async fn register(ctx: &Context, form: &RegistrationForm) -> Result<String, CommandError> {
    let registration = form.validate().map_err(CommandError::Invalid)?;
    let user = ctx.state().users().register_or_demo(&registration).await?;

    ctx.identity().sign_in(&user).await?;
    Ok(format!("Registered {}", output::user(Some(&user))))
}

/// Sign out. Cart, wishlist and checkout data stay.
pub async fn logout(ctx: &Context) -> Result<String, CommandError> {
    ctx.identity().sign_out().await?;
    Ok("Signed out".to_string())
}

pub async fn whoami(ctx: &Context) -> Result<String, CommandError> {
    let user = ctx.identity().current().await?;
    Ok(output::user(user.as_ref()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::testing::context;
    use super::*;

    #[tokio::test]
    async fn test_demo_login_and_logout() {
        let (_dir, ctx) = context().await;
        assert_eq!(whoami(&ctx).await.unwrap(), "Not signed in");

        login(&ctx, Some("shopper@example.com"), None, true)
            .await
            .unwrap();
        let text = whoami(&ctx).await.unwrap();
        assert!(text.contains("<shopper@example.com>"), "{text}");
        assert!(text.ends_with("(demo)"), "{text}");

        logout(&ctx).await.unwrap();
        assert_eq!(whoami(&ctx).await.unwrap(), "Not signed in");
    }

    #[tokio::test]
    async fn test_offline_credentials_fall_back_to_demo() {
        let (_dir, ctx) = context().await;
        let text = login(&ctx, Some("jane@example.com"), Some("secret"), false)
            .await
            .unwrap();
        assert!(text.ends_with("(demo)"), "{text}");
    }

    #[tokio::test]
    async fn test_credentials_required() {
        let (_dir, ctx) = context().await;
        assert!(matches!(
            login(&ctx, None, Some("secret"), false).await,
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            login(&ctx, Some("jane@example.com"), None, false).await,
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            login(&ctx, Some("not-an-email"), Some("secret"), false).await,
            Err(CommandError::Email(_))
        ));
    }

    fn registration(password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_offline_signs_in_submitted_identity() {
        let (_dir, ctx) = context().await;
        let text = register(&ctx, &registration("secret1", "secret1"))
            .await
            .unwrap();
        assert!(text.starts_with("Registered Asha Rao"), "{text}");

        let user = ctx.identity().current().await.unwrap().unwrap();
        assert_eq!(user.name, "Asha Rao");
        assert_eq!(user.email.as_str(), "asha@example.com");
        assert!(user.is_demo());
    }

    #[tokio::test]
    async fn test_register_reports_invalid_fields() {
        let (_dir, ctx) = context().await;
        let Err(CommandError::Invalid(errors)) =
            register(&ctx, &registration("12345", "12346")).await
        else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
        assert_eq!(whoami(&ctx).await.unwrap(), "Not signed in");
    }
}
