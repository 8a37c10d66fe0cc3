use std::fmt;

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::fetch_error::FetchError;
use crate::http::ensure_success;

/// Portal login. The password never appears in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pass: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("pass", &"***")
            .finish()
    }
}

/// Bearer token returned by the login endpoint. Lives for a single run.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(<{} chars>)", self.0.len())
    }
}

#[derive(Clone)]
pub struct Authenticator {
    client: Client,
    url: Url,
}

impl Authenticator {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    #[instrument(skip(self, credentials), fields(url = %self.url, user = %credentials.user))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Token, FetchError> {
        debug!("Sending login request");
        let response = self
            .client
            .post(self.url.clone())
            .form(&[("user", credentials.user.as_str()), ("pass", credentials.pass.as_str())])
            .send()
            .await?;
        let response = ensure_success(response, self.url.as_str())?;

        let body = response.text().await?;
        debug!("Retrieved login response, size: {} bytes", body.len());

        extract_token(&body)
    }
}

/// Pulls the token out of a login response body.
///
/// The portal answers either with a JSON object carrying a `token` field or
/// with the bare token as plain text. JSON is tried first; a body that is not
/// JSON, or is a bare JSON number, is taken verbatim.
pub fn extract_token(body: &str) -> Result<Token, FetchError> {
    let token = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("token").and_then(Value::as_str) {
            Some(token) => token.trim().to_string(),
            None => {
                warn!("Login response is a JSON object without a string token field");
                return Err(FetchError::MissingToken);
            }
        },
        Ok(Value::String(token)) => token.trim().to_string(),
        Ok(Value::Null | Value::Bool(_) | Value::Array(_)) => {
            warn!("Login response is JSON but carries no token");
            return Err(FetchError::MissingToken);
        }
        Ok(Value::Number(_)) | Err(_) => body.trim().to_string(),
    };

    if token.is_empty() {
        warn!("Login response yielded an empty token");
        return Err(FetchError::EmptyToken);
    }
    Ok(Token(token))
}
