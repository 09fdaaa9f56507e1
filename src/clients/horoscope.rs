use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::UpstreamConfig;
use crate::models::ZodiacSign;
use crate::services::period::DayRef;

pub const DEFAULT_BASE_URL: &str = "https://www.horoscope.com/us/horoscopes/general/";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid upstream url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("upstream unavailable: {0}")]
    Unavailable(#[source] reqwest::Error),

    #[error("upstream returned {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),
}

#[derive(Clone)]
pub struct HoroscopeClient {
    client: Client,
    base_url: Url,
}

impl HoroscopeClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
        })
    }

    pub fn daily_url(&self, sign: ZodiacSign, day: DayRef) -> Result<Url, FetchError> {
        let sign_id = sign.id().to_string();
        let url = match day {
            DayRef::Alias(alias) => {
                let mut url = self
                    .base_url
                    .join(&format!("horoscope-general-daily-{}.aspx", alias.as_str()))?;
                url.query_pairs_mut().append_pair("sign", &sign_id);
                url
            }
            DayRef::Date(date) => {
                let mut url = self.base_url.join("horoscope-archive.aspx")?;
                url.query_pairs_mut()
                    .append_pair("sign", &sign_id)
                    .append_pair("laDate", &date.format("%Y%m%d").to_string());
                url
            }
        };
        Ok(url)
    }

    pub fn weekly_url(&self, sign: ZodiacSign) -> Result<Url, FetchError> {
        self.sign_url("horoscope-general-weekly.aspx", sign)
    }

    pub fn monthly_url(&self, sign: ZodiacSign) -> Result<Url, FetchError> {
        self.sign_url("horoscope-general-monthly.aspx", sign)
    }

    fn sign_url(&self, page: &str, sign: ZodiacSign) -> Result<Url, FetchError> {
        let mut url = self.base_url.join(page)?;
        url.query_pairs_mut()
            .append_pair("sign", &sign.id().to_string());
        Ok(url)
    }

    pub async fn fetch_daily(&self, sign: ZodiacSign, day: DayRef) -> Result<String, FetchError> {
        self.get_html(self.daily_url(sign, day)?).await
    }

    pub async fn fetch_weekly(&self, sign: ZodiacSign) -> Result<String, FetchError> {
        self.get_html(self.weekly_url(sign)?).await
    }

    pub async fn fetch_monthly(&self, sign: ZodiacSign) -> Result<String, FetchError> {
        self.get_html(self.monthly_url(sign)?).await
    }

    async fn get_html(&self, url: Url) -> Result<String, FetchError> {
        debug!(url = %url, "Fetching horoscope page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::Unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        response.text().await.map_err(FetchError::Body)
    }
}
