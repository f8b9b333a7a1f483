//! Error kinds for profile scraping

use thiserror::Error;

/// Everything that can go wrong while building a profile record.
///
/// Nothing in the library recovers locally; each variant propagates to the
/// caller unchanged.
#[derive(Debug, Error)]
pub enum LinktreeError {
    /// Transport failure or non-success HTTP status
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Embedded page data missing, malformed, or lacking expected keys
    #[error("failed to parse profile page: {0}")]
    Parse(String),

    /// Unlock endpoint answered with something other than a link list
    #[error("failed to unlock gated links: {0}")]
    Unlock(String),

    #[error("a Linktree username or profile URL is required")]
    MissingIdentifier,
}

pub type Result<T> = std::result::Result<T, LinktreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            LinktreeError::Parse("no __NEXT_DATA__ script".to_string()).to_string(),
            "failed to parse profile page: no __NEXT_DATA__ script"
        );
        assert_eq!(
            LinktreeError::MissingIdentifier.to_string(),
            "a Linktree username or profile URL is required"
        );
    }
}
