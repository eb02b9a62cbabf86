//! Signed-in user identity as persisted under `userInfo`.

use serde::{Deserialize, Serialize};

use super::{Email, UserId};

/// Identity of the signed-in shopper.
///
/// Implements `Debug` manually to redact the auth token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(alias = "token")]
    pub auth_token: String,
}

impl UserInfo {
    /// Identity used when the API is offline and the shopper continues in
    /// demo mode.
    #[must_use]
    pub fn demo(email: Option<Email>) -> Self {
        Self {
            id: UserId::new("demo123"),
            name: "Demo User".to_owned(),
            email: email.unwrap_or_else(Email::demo),
            is_admin: false,
            auth_token: "demo-token-123".to_owned(),
        }
    }

    /// Whether this identity was created offline.
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.id.as_str() == "demo123"
    }
}

impl std::fmt::Debug for UserInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_defaults() {
        let user = UserInfo::demo(None);
        assert_eq!(user.email.as_str(), "demo@example.com");
        assert!(user.is_demo());
        assert!(!user.is_admin);
    }

    #[test]
    fn test_demo_keeps_entered_email() {
        let user = UserInfo::demo(Some(Email::parse("me@shop.in").unwrap()));
        assert_eq!(user.email.as_str(), "me@shop.in");
    }

    #[test]
    fn test_debug_redacts_token() {
        let user = UserInfo::demo(None);
        let debug_output = format!("{user:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("demo-token-123"));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(UserInfo::demo(None)).unwrap();
        assert_eq!(json["authToken"], "demo-token-123");
        assert_eq!(json["isAdmin"], false);
    }

    #[test]
    fn test_accepts_api_login_payload() {
        let user: UserInfo = serde_json::from_str(
            r#"{"_id":"65f1","name":"Jane Smith","email":"jane@example.com","isAdmin":false,"token":"abc"}"#,
        )
        .unwrap();
        assert_eq!(user.id.as_str(), "65f1");
        assert_eq!(user.auth_token, "abc");
        assert!(!user.is_demo());
    }
}
