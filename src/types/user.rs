use serde::{Deserialize, Serialize};

/// The current user, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub is_active: bool,
    pub email_verified: bool,
    pub role: String,
    pub level: u32,
}

impl User {
    /// Display name, falling back to the email address.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_deserializes_camel_case() {
        let user: User = serde_json::from_value(json!({
            "id": "u-1",
            "email": "ada@example.com",
            "displayName": "Ada",
            "isActive": true,
            "emailVerified": false,
            "role": "admin",
            "level": 3
        }))
        .unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Ada"));
        assert!(user.is_active);
        assert!(!user.email_verified);
        assert_eq!(user.level, 3);
        assert_eq!(user.label(), "Ada");
    }

    #[test]
    fn test_display_name_is_optional() {
        let user: User = serde_json::from_value(json!({
            "id": "u-2",
            "email": "bob@example.com",
            "isActive": true,
            "emailVerified": true,
            "role": "user",
            "level": 1
        }))
        .unwrap();
        assert!(user.display_name.is_none());
        assert_eq!(user.label(), "bob@example.com");
    }
}
