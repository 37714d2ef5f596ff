use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{IdentityError, IdentityProvider, IdentitySession};

/// REST identity provider (accounts / token endpoints keyed by an API key).
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
    refresh_token: String,
    expires_in: Value,
}

#[derive(Deserialize)]
struct RefreshResponse {
    user_id: String,
    id_token: String,
    refresh_token: String,
    expires_in: Value,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        HttpIdentityProvider {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    async fn call<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, IdentityError> {
        let resp = self
            .http
            .post(self.endpoint(path))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;
        if !status.is_success() {
            let code = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| format!("HTTP_{}", status.as_u16()));
            log::warn!("Identity provider {path} failed: {code}");
            return Err(IdentityError::from_code(&code));
        }
        let bytes = if bytes.is_empty() { &b"{}"[..] } else { &bytes[..] };
        serde_json::from_slice(bytes).map_err(|e| IdentityError::Provider(format!("malformed response: {e}")))
    }
}

/// `expiresIn` arrives as a string of seconds from some endpoints and a number from others.
fn expires_at(expires_in: &Value) -> i64 {
    let secs = match expires_in {
        Value::String(s) => s.parse::<i64>().unwrap_or(3600),
        Value::Number(n) => n.as_i64().unwrap_or(3600),
        _ => 3600,
    };
    chrono::Utc::now().timestamp() + secs
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession, IdentityError> {
        let r: SignInResponse = self
            .call(
                "accounts:signInWithPassword",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        Ok(IdentitySession {
            uid: r.local_id,
            email: if r.email.is_empty() { email.to_string() } else { r.email },
            id_token: r.id_token,
            refresh_token: r.refresh_token,
            expires_at: expires_at(&r.expires_in),
        })
    }

    async fn refresh(&self, session: &IdentitySession) -> Result<IdentitySession, IdentityError> {
        let r: RefreshResponse = self
            .call(
                "token",
                json!({ "grant_type": "refresh_token", "refresh_token": session.refresh_token }),
            )
            .await?;
        Ok(IdentitySession {
            uid: r.user_id,
            email: session.email.clone(),
            id_token: r.id_token,
            refresh_token: r.refresh_token,
            expires_at: expires_at(&r.expires_in),
        })
    }

    async fn sign_out(&self, session: &IdentitySession) -> Result<(), IdentityError> {
        self.call::<Value>("accounts:signOut", json!({ "refreshToken": session.refresh_token }))
            .await
            .map(|_| ())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        self.call::<Value>(
            "accounts:sendOobCode",
            json!({ "requestType": "PASSWORD_RESET", "email": email }),
        )
        .await
        .map(|_| ())
    }
}
