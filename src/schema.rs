//! Profile data model
//!
//! Two layers: the structures decoded from a page's `__NEXT_DATA__` blob
//! (validated eagerly, so a missing key is one parse error), and the
//! normalized `LinktreeUser` record handed back to callers.

use serde::{Deserialize, Deserializer, Serialize};

/// Link type tag for payment links, which never make it into a record
pub const COMMERCE_PAY: &str = "COMMERCE_PAY";

/// A resolved outbound link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absent for link types that carry no URL (headers, embeds)
    pub url: Option<String>,
}

impl Link {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}

/// Normalized account record with its resolved links
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinktreeUser {
    pub username: String,
    /// Canonical profile URL, or the URL the caller supplied
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_image: Option<String>,
    pub id: i64,
    pub tier: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds
    pub updated_at: i64,
    pub links: Vec<Link>,
}

/// Top level of the `__NEXT_DATA__` document
#[derive(Debug, Deserialize)]
pub(crate) struct NextData {
    pub props: NextProps,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NextProps {
    #[serde(rename = "pageProps")]
    pub page_props: PageProps,
}

/// The `props.pageProps` payload shared by field extraction and link assembly
#[derive(Debug, Clone, Deserialize)]
pub struct PageProps {
    pub account: Account,
    pub links: Vec<RawLink>,
}

/// Account fields as the page embeds them
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub profile_picture_url: Option<String>,
    pub tier: String,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Link descriptor as the page embeds it
#[derive(Debug, Clone, Deserialize)]
pub struct RawLink {
    #[serde(deserialize_with = "de_link_id")]
    pub id: i64,
    #[serde(deserialize_with = "de_nullable")]
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub locked: bool,
}

impl RawLink {
    pub fn is_payment(&self) -> bool {
        self.kind == COMMERCE_PAY
    }

    /// Locked with the URL withheld until sensitive content is accepted
    pub fn is_gated(&self) -> bool {
        self.locked && self.url.is_none()
    }
}

/// Key must be present; `null` is allowed.
///
/// With `deserialize_with`, serde no longer treats a missing `Option` key as `None`.
pub(crate) fn de_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Link ids show up both as numbers and as numeric strings
fn de_link_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Num(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid link id: {:?}", s))),
    }
}
