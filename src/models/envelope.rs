use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// The `{success, message?, data?}` wrapper every endpoint answers with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwraps `data` from a successful envelope.
    ///
    /// `success: false` is an application-level rejection and carries the
    /// service's message.
    pub fn into_data(self) -> Result<T, AuthError> {
        if !self.success {
            return Err(AuthError::Rejected(
                self.message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| AuthError::InvalidResponse("envelope is missing data".to_string()))
    }

    /// Like [`ApiResponse::into_data`] for endpoints whose payload is irrelevant.
    pub fn into_unit(self) -> Result<(), AuthError> {
        if self.success {
            Ok(())
        } else {
            Err(AuthError::Rejected(
                self.message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_envelope_carries_message() {
        let envelope: ApiResponse<String> =
            serde_json::from_str(r#"{"success": false, "message": "Invalid credentials"}"#)
                .unwrap();
        match envelope.into_data() {
            Err(AuthError::Rejected(message)) => assert_eq!(message, "Invalid credentials"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_success_without_data_is_invalid() {
        let envelope: ApiResponse<String> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(
            envelope.into_data(),
            Err(AuthError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_unit_envelope_ignores_data() {
        let envelope: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"success": true, "data": "Logged out"}"#).unwrap();
        assert!(envelope.into_unit().is_ok());
    }
}
