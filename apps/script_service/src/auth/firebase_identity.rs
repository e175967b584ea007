use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::identity_provider::{validate_credentials, Identity, IdentityError, IdentityProvider};

pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Email/password accounts backed by the Firebase Auth REST API.
pub struct FirebaseIdentityProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FirebaseIdentityProvider {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn password_call(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        validate_credentials(email, password)?;

        let response = self
            .client
            .post(format!("{}/v1/accounts:{}", self.base_url, action))
            .query(&[("key", &self.api_key)])
            .json(&PasswordRequest {
                email: email.trim(),
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("{status}: {body}"));
            tracing::info!("Identity call {} rejected: {}", action, code);
            return Err(map_error_code(&code));
        }

        let account: AccountResponse = response.json().await?;
        Ok(Identity {
            user_id: account.local_id,
            email: account.email,
        })
    }
}

/// Vendor codes sometimes carry a suffix, e.g. `WEAK_PASSWORD : Password should be ...`.
fn map_error_code(code: &str) -> IdentityError {
    let head = code.split(':').next().unwrap_or(code).trim();
    match head {
        "EMAIL_EXISTS" => IdentityError::EmailExists,
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            IdentityError::InvalidCredentials
        }
        "INVALID_EMAIL" | "MISSING_PASSWORD" | "MISSING_EMAIL" => {
            IdentityError::Validation(head.to_string())
        }
        _ if head.starts_with("WEAK_PASSWORD") => IdentityError::Validation(code.to_string()),
        _ => IdentityError::Upstream(code.to_string()),
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn register(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.password_call("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.password_call("signInWithPassword", email, password)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn maps_vendor_codes() {
        assert!(matches!(
            map_error_code("EMAIL_EXISTS"),
            IdentityError::EmailExists
        ));
        assert!(matches!(
            map_error_code("INVALID_LOGIN_CREDENTIALS"),
            IdentityError::InvalidCredentials
        ));
        assert!(matches!(
            map_error_code("WEAK_PASSWORD : Password should be at least 6 characters"),
            IdentityError::Validation(_)
        ));
        assert!(matches!(
            map_error_code("QUOTA_EXCEEDED"),
            IdentityError::Upstream(_)
        ));
    }

    #[tokio::test]
    async fn register_returns_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signUp"))
            .and(query_param("key", "identity-key"))
            .and(body_partial_json(json!({
                "email": "writer@example.com",
                "returnSecureToken": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": "uid-1",
                "email": "writer@example.com",
                "idToken": "opaque",
                "refreshToken": "opaque",
                "expiresIn": "3600"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = FirebaseIdentityProvider::new("identity-key".to_string(), server.uri());
        let identity = provider
            .register(" writer@example.com ", "secret1")
            .await
            .unwrap();
        assert_eq!(identity.user_id, "uid-1");
        assert_eq!(identity.email, "writer@example.com");
    }

    #[tokio::test]
    async fn sign_in_rejects_wrong_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "INVALID_PASSWORD"}
            })))
            .mount(&server)
            .await;

        let provider = FirebaseIdentityProvider::new("identity-key".to_string(), server.uri());
        let err = provider
            .sign_in("writer@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn invalid_input_never_leaves_the_process() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = FirebaseIdentityProvider::new("identity-key".to_string(), server.uri());
        let err = provider.register("not-an-email", "secret1").await.unwrap_err();
        assert!(matches!(err, IdentityError::Validation(_)));
    }
}
