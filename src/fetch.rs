use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{
    Client, ClientBuilder,
    header::{self, HeaderMap, HeaderValue},
};

use crate::errors::ScraperErrors;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:145.0) Gecko/20100101 Firefox/145.0";

/// Plain GET access to the site.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn text(&self, url: &str) -> Result<String, ScraperErrors>;

    async fn bytes(&self, url: &str) -> Result<Vec<u8>, ScraperErrors>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(referer: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::REFERER, HeaderValue::from_str(referer)?);

        let client = ClientBuilder::new()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, ScraperErrors> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScraperErrors::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperErrors::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn text(&self, url: &str) -> Result<String, ScraperErrors> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|source| ScraperErrors::RequestFailed {
                url: url.to_string(),
                source,
            })
    }

    async fn bytes(&self, url: &str) -> Result<Vec<u8>, ScraperErrors> {
        let data = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|source| ScraperErrors::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        Ok(data.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;

    use super::*;

    /// Serves canned bodies by url; anything else is a 404.
    #[derive(Debug, Default)]
    pub struct FakeSite {
        bodies: HashMap<String, Vec<u8>>,
    }

    impl FakeSite {
        pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.bodies.insert(url.to_string(), body.into());
            self
        }

        fn lookup(&self, url: &str) -> Result<Vec<u8>, ScraperErrors> {
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| ScraperErrors::BadStatus {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    #[async_trait]
    impl Fetch for FakeSite {
        async fn text(&self, url: &str) -> Result<String, ScraperErrors> {
            Ok(String::from_utf8_lossy(&self.lookup(url)?).into_owned())
        }

        async fn bytes(&self, url: &str) -> Result<Vec<u8>, ScraperErrors> {
            self.lookup(url)
        }
    }
}
