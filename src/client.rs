//! Linktree client: configuration, profile resolution, record building

use crate::error::{LinktreeError, Result};
use crate::fetch::get_text;
use crate::links::{assemble_links, unlock_links, GateIds, GATES_PATH};
use crate::profile::extract_page_props;
use crate::schema::{Link, LinktreeUser, PageProps};
use tracing::info;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://linktr.ee";

/// Substring that marks CLI input as a profile URL rather than a username
pub const DOMAIN_MARKER: &str = "linktr.ee";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.77 Safari/537.36";

/// Service endpoints and the browser identity sent to the gates endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinktreeConfig {
    pub base_url: Url,
    pub user_agent: String,
}

impl Default for LinktreeConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl LinktreeConfig {
    /// Service root without a trailing slash; also sent as origin and referer
    pub fn root(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Canonical profile URL: `<root>/<username>`
    pub fn profile_url(&self, username: &str) -> String {
        format!("{}/{}", self.root(), username)
    }

    pub fn gates_url(&self) -> String {
        format!("{}{}", self.root(), GATES_PATH)
    }
}

/// What the user asked for on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Username(String),
    Url(String),
}

impl Target {
    /// Anything containing the service domain or an http(s) scheme is a URL.
    /// A bare `linktr.ee/name` gets an https scheme.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.starts_with("http://") || input.starts_with("https://") {
            Target::Url(input.to_string())
        } else if input.contains(DOMAIN_MARKER) {
            Target::Url(format!("https://{}", input))
        } else {
            Target::Username(input.trim_start_matches('@').to_string())
        }
    }
}

/// Entry point for scraping profiles.
///
/// Holds no state between calls beyond its configuration.
#[derive(Debug, Clone, Default)]
pub struct Linktree {
    config: LinktreeConfig,
}

impl Linktree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LinktreeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LinktreeConfig {
        &self.config
    }

    pub fn profile_url(&self, username: &str) -> String {
        self.config.profile_url(username)
    }

    /// Fetch a page's raw HTML
    pub async fn get_source(&self, url: &str) -> Result<String> {
        get_text(url).await
    }

    /// Decode the page payload from `source`, or fetch it first.
    ///
    /// Without `url`, the canonical URL is derived from `username`. A caller
    /// supplied `source` is parsed as-is and nothing is fetched.
    pub async fn resolve_profile(
        &self,
        source: Option<&str>,
        url: Option<&str>,
        username: Option<&str>,
    ) -> Result<PageProps> {
        if let Some(html) = source {
            return extract_page_props(html);
        }

        let url = match (non_blank(url), non_blank(username)) {
            (Some(url), _) => url.to_string(),
            (None, Some(username)) => self.profile_url(username),
            (None, None) => return Err(LinktreeError::MissingIdentifier),
        };

        info!(url = %url, "fetching profile");
        let html = self.get_source(&url).await?;
        extract_page_props(&html)
    }

    /// Final link list for a payload, unlocking gated links if there are any
    pub async fn assemble_links(&self, payload: &PageProps) -> Result<Vec<Link>> {
        assemble_links(&self.config, payload).await
    }

    pub async fn unlock_links(
        &self,
        account_id: i64,
        link_ids: impl Into<GateIds>,
    ) -> Result<Vec<Link>> {
        unlock_links(&self.config, account_id, link_ids).await
    }

    /// Fetch a profile by URL or username and build its record
    pub async fn user_info(
        &self,
        url: Option<&str>,
        username: Option<&str>,
    ) -> Result<LinktreeUser> {
        if non_blank(url).is_none() && non_blank(username).is_none() {
            return Err(LinktreeError::MissingIdentifier);
        }

        let payload = self.resolve_profile(None, url, username).await?;
        self.build_record(payload, url).await
    }

    /// Build a record from an already fetched profile page
    pub async fn user_info_from_source(
        &self,
        source: &str,
        url: Option<&str>,
    ) -> Result<LinktreeUser> {
        let payload = self.resolve_profile(Some(source), url, None).await?;
        self.build_record(payload, url).await
    }

    async fn build_record(&self, payload: PageProps, url: Option<&str>) -> Result<LinktreeUser> {
        let links = self.assemble_links(&payload).await?;
        let account = payload.account;

        let url = match non_blank(url) {
            Some(url) => url.to_string(),
            None => self.profile_url(&account.username),
        };

        Ok(LinktreeUser {
            username: account.username,
            url,
            avatar_image: account.profile_picture_url,
            id: account.id,
            tier: account.tier,
            is_active: account.is_active,
            description: account.description,
            created_at: account.created_at,
            updated_at: account.updated_at,
            links,
        })
    }
}

/// Empty and whitespace-only identifiers count as not supplied
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_urls() {
        let config = LinktreeConfig::default();
        assert_eq!(config.root(), "https://linktr.ee");
        assert_eq!(config.profile_url("alice"), "https://linktr.ee/alice");
        assert_eq!(
            config.gates_url(),
            "https://linktr.ee/api/profiles/validation/gates"
        );
    }

    #[test]
    fn test_config_with_path() {
        let config = LinktreeConfig {
            base_url: Url::parse("http://127.0.0.1:8080/mirror/").unwrap(),
            ..Default::default()
        };
        assert_eq!(config.profile_url("bob"), "http://127.0.0.1:8080/mirror/bob");
    }

    #[test]
    fn test_target_parse() {
        assert_eq!(
            Target::parse("https://linktr.ee/alice"),
            Target::Url("https://linktr.ee/alice".to_string())
        );
        assert_eq!(
            Target::parse("linktr.ee/alice"),
            Target::Url("https://linktr.ee/alice".to_string())
        );
        assert_eq!(
            Target::parse("http://localhost:3000/alice"),
            Target::Url("http://localhost:3000/alice".to_string())
        );
        assert_eq!(Target::parse("alice"), Target::Username("alice".to_string()));
        assert_eq!(Target::parse("@alice"), Target::Username("alice".to_string()));
    }

    #[tokio::test]
    async fn test_missing_identifier() {
        let client = Linktree::new();
        let err = client.user_info(None, None).await.unwrap_err();
        assert!(matches!(err, LinktreeError::MissingIdentifier));

        let err = client.resolve_profile(None, None, None).await.unwrap_err();
        assert!(matches!(err, LinktreeError::MissingIdentifier));
    }

    #[tokio::test]
    async fn test_blank_identifier() {
        let client = Linktree::new();
        let err = client.user_info(None, Some("")).await.unwrap_err();
        assert!(matches!(err, LinktreeError::MissingIdentifier));

        let err = client.user_info(Some("  "), Some(" ")).await.unwrap_err();
        assert!(matches!(err, LinktreeError::MissingIdentifier));
    }
}
