use serde::{Deserialize, Serialize};

/// One image record as returned by the search API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Photo {
    pub id: u64,
    /// Link-out URL of the photo's page.
    pub url: String,
    #[serde(default)]
    pub photographer: String,
    /// May be null or missing for photos without a description.
    #[serde(default)]
    pub alt: Option<String>,
    pub src: PhotoSource,
}

impl Photo {
    pub fn alt_text(&self) -> &str {
        self.alt.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PhotoSource {
    /// Display URL used for rendering the photo at grid size.
    pub medium: String,
}

/// One page of search results.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_results: u64,
    pub photos: Vec<Photo>,
    /// Continuation URL; absent on the last page of results.
    #[serde(default)]
    pub next_page: Option<String>,
}
