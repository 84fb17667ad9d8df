use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration loaded from environment variables (and `.env`)
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, sent as the `api_key` query parameter
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix for poster paths returned by TMDB
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Image used when no poster can be found
    #[serde(default = "default_placeholder_poster_url")]
    pub placeholder_poster_url: String,

    /// Directory holding the offline build artifacts
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,

    /// Optional JSON file replacing the mood / age-group tables
    #[serde(default)]
    pub category_table_path: Option<PathBuf>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Movies per result page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Recommendations computed per query before pagination
    #[serde(default = "default_recommend_limit")]
    pub recommend_limit: usize,

    /// Fuzzy suggestions offered when a title is not found
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

fn default_tmdb_api_url() -> String {
    metadata_client::DEFAULT_TMDB_API_URL.to_string()
}

fn default_image_base_url() -> String {
    metadata_client::DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_placeholder_poster_url() -> String {
    metadata_client::DEFAULT_PLACEHOLDER_URL.to_string()
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_page_size() -> usize {
    12
}

fn default_recommend_limit() -> usize {
    30
}

fn default_suggestion_limit() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply() {
        let vars = vec![("TMDB_API_KEY".to_string(), "secret".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.placeholder_poster_url, "https://via.placeholder.com/150");
        assert_eq!(config.artifacts_dir, PathBuf::from("artifacts"));
        assert_eq!(config.category_table_path, None);
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(
            (config.page_size, config.recommend_limit, config.suggestion_limit),
            (12, 30, 5)
        );
    }

    #[test]
    fn test_overrides_and_missing_key() {
        let vars = vec![
            ("TMDB_API_KEY".to_string(), "k".to_string()),
            ("PORT".to_string(), "8080".to_string()),
            ("PAGE_SIZE".to_string(), "6".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.page_size, 6);

        let missing: Result<Config, _> = envy::from_iter(Vec::<(String, String)>::new());
        assert!(missing.is_err());
    }
}
