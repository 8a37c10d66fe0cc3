use reqwest::{Client, Response};
use tracing::{debug, error};

use crate::config::Config;
use crate::fetch_error::FetchError;

/// Client shared by the login and data requests of one run.
pub fn build_client(config: &Config) -> Result<Client, FetchError> {
    let client = Client::builder()
        .timeout(config.request_timeout())
        .build()?;
    Ok(client)
}

pub(crate) fn ensure_success(response: Response, endpoint: &str) -> Result<Response, FetchError> {
    let status = response.status();
    debug!("Received HTTP response with status: {}", status);

    if status.is_success() {
        Ok(response)
    } else {
        error!("Portal request to {} failed with status {}", endpoint, status);
        Err(FetchError::Status {
            status,
            endpoint: endpoint.to_string(),
        })
    }
}
