use reqwest::{Client, Url};
use tracing::{debug, instrument};

use crate::auth::Token;
use crate::fetch_error::FetchError;
use crate::http::ensure_success;
use crate::profile::ExportProfile;
use crate::query::DataQuery;

#[derive(Clone)]
pub struct EmissionsFetcher {
    client: Client,
    url: Url,
    profile: ExportProfile,
}

impl EmissionsFetcher {
    pub fn new(client: Client, url: Url, profile: ExportProfile) -> Self {
        Self {
            client,
            url,
            profile,
        }
    }

    /// Full request URL for `query`, including the query string.
    /// Spaces are sent as `%20`, the form the portal documents for `et`.
    pub fn request_url(&self, query: &DataQuery) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(query.query_pairs(self.profile));
        // Form encoding escapes a literal '+' as %2B, so every '+' left is a space
        let encoded = url.query().map(|q| q.replace('+', "%20"));
        url.set_query(encoded.as_deref());
        url
    }

    /// POSTs the token to the data endpoint and returns the CSV body untouched.
    #[instrument(skip(self, token, query), fields(
        url = %self.url,
        dataset = %query.dataset,
        fids = %query.feeders.joined(),
        st = %query.start,
        et = %query.end
    ))]
    pub async fn fetch_raw(&self, token: &Token, query: &DataQuery) -> Result<String, FetchError> {
        let url = self.request_url(query);
        debug!("Sending data request: {}", url);

        let response = self
            .client
            .post(url)
            .form(&[("token", token.as_str())])
            .send()
            .await?;
        let response = ensure_success(response, self.url.as_str())?;

        let body = response.text().await?;
        debug!("Retrieved data response, size: {} bytes", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{DatasetKind, FeederIds};

    fn fetcher(profile: ExportProfile) -> EmissionsFetcher {
        EmissionsFetcher::new(
            Client::new(),
            Url::parse("https://portal.c-lockinc.com/api/getemissions").unwrap(),
            profile,
        )
    }

    #[test]
    fn test_request_url_contains_all_parameters() {
        let query = DataQuery::new(
            DatasetKind::Visits,
            "453, 454, 560".parse().unwrap(),
            "2024-01-01_00:00:00".parse().unwrap(),
            "2024-03-01_00:00:00".parse().unwrap(),
        )
        .unwrap();

        let url = fetcher(ExportProfile::Emissions).request_url(&query);
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.path(), "/api/getemissions");
        assert_eq!(
            pairs,
            vec![
                ("d".to_string(), "visits".to_string()),
                ("fids".to_string(), "453,454,560".to_string()),
                ("st".to_string(), "2024-01-01_00:00:00".to_string()),
                ("et".to_string(), "2024-03-01_00:00:00".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_url_gfdata_end_time() {
        let query = DataQuery::new(
            DatasetKind::Visits,
            FeederIds::new([304, 305]).unwrap(),
            "01/01/2024".parse().unwrap(),
            "06/30/2024".parse().unwrap(),
        )
        .unwrap();

        let url = fetcher(ExportProfile::GfData).request_url(&query);
        let et = url
            .query_pairs()
            .find(|(k, _)| k == "et")
            .map(|(_, v)| v.into_owned());

        assert_eq!(et.as_deref(), Some("06/30/2024 12:00:00"));
        assert!(url
            .query()
            .unwrap()
            .ends_with("&et=06%2F30%2F2024%2012%3A00%3A00"));
    }
}
