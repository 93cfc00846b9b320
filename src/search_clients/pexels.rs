use crate::config::AppConfig;
use crate::error::AppError;
use crate::photo::SearchResponse;
use crate::search::PhotoSearcher;
use async_trait::async_trait;
use url::Url;

pub struct PexelsSearcher {
    base_url: Url,
    api_key: String,
    per_page: u32,
}

impl PexelsSearcher {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        if config.api_key.is_empty() {
            return Err(AppError::MissingApiKey);
        }
        log::debug!("Creating Pexels client for URL: {}", config.base_url);
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self {
            base_url,
            api_key: config.api_key.clone(),
            per_page: config.per_page,
        })
    }

    fn search_url(&self, query: &str, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("query", query)
            .append_pair("per_page", &self.per_page.to_string());
        url
    }
}

#[async_trait]
impl PhotoSearcher for PexelsSearcher {
    async fn search_photos(&self, query: &str, page: u32) -> Result<SearchResponse, AppError> {
        let url = self.search_url(query, page);
        log::debug!("Fetching page {} for query \"{}\"", page, query);

        let mut res = surf::get(url)
            .header("Authorization", self.api_key.as_str())
            .await?;

        if !res.status().is_success() {
            return Err(AppError::Status(res.status().into()));
        }

        let body = res.body_string().await?;
        let response: SearchResponse = serde_json::from_str(&body)?;
        log::debug!(
            "Received {} photos for query \"{}\" page {}",
            response.photos.len(),
            query,
            page
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> AppConfig {
        AppConfig {
            api_key: api_key.to_string(),
            base_url: "https://api.pexels.com/v1/search".to_string(),
            per_page: 9,
            log_level: "info".to_string(),
            log_file: "image-finder.log".to_string(),
        }
    }

    #[test]
    fn search_url_carries_paging_parameters() {
        let searcher = PexelsSearcher::new(&config("key")).unwrap();
        let url = searcher.search_url("night sky", 3);

        assert_eq!(url.host_str(), Some("api.pexels.com"));
        assert_eq!(url.path(), "/v1/search");
        assert_eq!(url.query(), Some("page=3&query=night+sky&per_page=9"));
    }

    #[test]
    fn missing_api_key_is_rejected() {
        assert!(matches!(
            PexelsSearcher::new(&config("")),
            Err(AppError::MissingApiKey)
        ));
    }
}
