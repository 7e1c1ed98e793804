use serde::{Deserialize, Serialize};

/// A user as returned by the user service and cached for the session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of `POST /auth/register`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Body of `PUT /users/{id}`. The username cannot be changed.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.full_name.is_none() && self.avatar_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_uses_camel_case_and_optional_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "username": "alice",
            "email": "alice@example.com",
            "status": "ONLINE",
            "createdAt": "2024-01-01T10:00:00",
            "updatedAt": "2024-01-02T10:00:00"
        }))
        .expect("user should parse");

        assert_eq!(user.id, 7);
        assert!(user.full_name.is_none());
        assert!(user.avatar_url.is_none());

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["createdAt"], "2024-01-01T10:00:00");
        assert!(value.get("fullName").is_none());
    }

    #[test]
    fn test_update_request_only_sends_present_fields() {
        let update = UserUpdateRequest {
            full_name: Some("Alice A.".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "fullName": "Alice A." })
        );
        assert!(UserUpdateRequest::default().is_empty());
    }
}
