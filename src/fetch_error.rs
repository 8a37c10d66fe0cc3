#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Portal returned {status} for {endpoint}")]
    Status {
        status: reqwest::StatusCode,
        endpoint: String,
    },
    #[error("Login response contained an empty token")]
    EmptyToken,
    #[error("Login response JSON has no string \"token\" field")]
    MissingToken,
}
