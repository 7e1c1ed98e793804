use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AuthError;
use crate::models::ApiResponse;

/// Turns a response into the `data` of its envelope.
///
/// Non-success statuses become [`AuthError::Http`], carrying the envelope's
/// message when the body has one.
pub async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, AuthError> {
    let status = response.status();
    if !status.is_success() {
        return Err(http_error(response).await);
    }
    let envelope: ApiResponse<T> = response.json().await?;
    envelope.into_data()
}

/// Like [`read_envelope`] for endpoints whose payload is not needed.
/// An empty success body counts as success.
pub async fn read_unit_envelope(response: Response) -> Result<(), AuthError> {
    let status = response.status();
    if !status.is_success() {
        return Err(http_error(response).await);
    }
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(());
    }
    serde_json::from_str::<ApiResponse<Value>>(&body)
        .map_err(|e| AuthError::InvalidResponse(format!("malformed envelope: {}", e)))?
        .into_unit()
}

/// Builds an [`AuthError::Http`] from a failed response, consuming its body.
pub async fn http_error(response: Response) -> AuthError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiResponse<Value>>(&body)
        .ok()
        .and_then(|envelope| envelope.message)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    AuthError::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    async fn fetch(server: &Server, path: &str) -> Response {
        reqwest::get(format!("{}{}", server.url(), path))
            .await
            .expect("mock server should answer")
    }

    #[tokio::test]
    async fn test_error_status_uses_envelope_message() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/bad")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": false, "message": "Username already exists"}"#)
            .create_async()
            .await;

        let result = read_envelope::<Value>(fetch(&server, "/bad").await).await;
        m.assert_async().await;
        match result {
            Err(AuthError::Http { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Username already exists");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_body_uses_reason() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let error = http_error(fetch(&server, "/gone").await).await;
        m.assert_async().await;
        assert_eq!(error.status(), Some(404));
        assert!(error.to_string().contains("Not Found"));
    }

    #[tokio::test]
    async fn test_unit_envelope_accepts_empty_body() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/ok")
            .with_status(200)
            .create_async()
            .await;

        assert!(read_unit_envelope(fetch(&server, "/ok").await).await.is_ok());
        m.assert_async().await;
    }
}
