//! Link assembly and sensitive-content unlocking
//!
//! Links flagged as sensitive come down `locked` with no URL. Accepting the
//! content warning is a POST to the gates endpoint with the link ids, which
//! answers with the revealed links.

use crate::client::LinktreeConfig;
use crate::error::{LinktreeError, Result};
use crate::fetch::fetch;
use crate::schema::{de_nullable, Link, PageProps, RawLink};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

/// Gates endpoint, relative to the service root
pub const GATES_PATH: &str = "/api/profiles/validation/gates";

/// One or many link ids to unlock
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateIds(Vec<i64>);

impl GateIds {
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<i64> for GateIds {
    fn from(id: i64) -> Self {
        Self(vec![id])
    }
}

impl From<Vec<i64>> for GateIds {
    fn from(ids: Vec<i64>) -> Self {
        Self(ids)
    }
}

impl From<&[i64]> for GateIds {
    fn from(ids: &[i64]) -> Self {
        Self(ids.to_vec())
    }
}

/// Result of scanning the raw descriptors
#[derive(Debug, Default, PartialEq)]
pub struct Partition {
    /// Emitted links, in page order
    pub visible: Vec<Link>,
    /// Ids still waiting on the gates endpoint
    pub gated: GateIds,
}

/// Split descriptors into visible links and gated ids.
///
/// `COMMERCE_PAY` links are dropped before anything else is looked at.
/// A link with a URL is used as-is whatever its lock flag says.
pub fn partition_links(raw: &[RawLink]) -> Partition {
    let mut visible = Vec::new();
    let mut gated = Vec::new();

    for link in raw {
        if link.is_payment() {
            continue;
        }
        if link.is_gated() {
            gated.push(link.id);
            continue;
        }
        visible.push(Link {
            url: link.url.clone(),
        });
    }

    Partition {
        visible,
        gated: GateIds(gated),
    }
}

/// Build the final link list for a decoded page.
///
/// Unlocked links go after every visible link, in the order the gates
/// endpoint returns them. The endpoint is only called when something is gated.
pub async fn assemble_links(config: &LinktreeConfig, payload: &PageProps) -> Result<Vec<Link>> {
    let Partition { mut visible, gated } = partition_links(&payload.links);

    if !gated.is_empty() {
        let unlocked = unlock_links(config, payload.account.id, gated).await?;
        visible.extend(unlocked);
    }

    Ok(visible)
}

/// Accept the sensitive-content gate for `link_ids` and return what it reveals
pub async fn unlock_links(
    config: &LinktreeConfig,
    account_id: i64,
    link_ids: impl Into<GateIds>,
) -> Result<Vec<Link>> {
    let link_ids = link_ids.into();
    info!(account_id, ids = ?link_ids.as_slice(), "unlocking gated links");

    let root = config.root();
    let headers = [
        ("origin", root),
        ("referer", root),
        ("user-agent", config.user_agent.as_str()),
    ];
    let body = gate_request_body(account_id, link_ids.as_slice());

    let text = fetch(&config.gates_url(), Method::POST, &headers, Some(&body)).await?;
    let links = decode_gate_response(&text)?;
    debug!(count = links.len(), "gates endpoint revealed links");

    Ok(links)
}

fn gate_request_body(account_id: i64, link_ids: &[i64]) -> Value {
    json!({
        "accountId": account_id,
        "validationInput": {
            "acceptedSensitiveContent": link_ids,
        },
        "requestSource": {
            "referrer": null,
        },
    })
}

#[derive(Debug, Deserialize)]
struct GateResponse {
    links: Vec<GateLink>,
}

/// Every revealed link must carry a `url` key, even if it is `null`
#[derive(Debug, Deserialize)]
struct GateLink {
    #[serde(deserialize_with = "de_nullable")]
    url: Option<String>,
}

fn decode_gate_response(body: &str) -> Result<Vec<Link>> {
    let resp: GateResponse =
        serde_json::from_str(body).map_err(|e| LinktreeError::Unlock(e.to_string()))?;
    Ok(resp
        .links
        .into_iter()
        .map(|link| Link { url: link.url })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: i64, url: Option<&str>, kind: &str, locked: bool) -> RawLink {
        RawLink {
            id,
            url: url.map(String::from),
            kind: kind.to_string(),
            locked,
        }
    }

    #[test]
    fn test_partition_keeps_order() {
        let links = vec![
            raw(1, Some("https://a.example"), "CLASSIC", false),
            raw(2, Some("https://b.example"), "CLASSIC", true),
            raw(3, None, "HEADER", false),
            raw(4, Some("https://c.example"), "CLASSIC", false),
        ];
        let part = partition_links(&links);
        assert!(part.gated.is_empty());
        assert_eq!(
            part.visible,
            vec![
                Link::new("https://a.example"),
                Link::new("https://b.example"),
                Link { url: None },
                Link::new("https://c.example"),
            ]
        );
    }

    #[test]
    fn test_partition_drops_payment() {
        let links = vec![
            raw(1, Some("https://pay.example"), "COMMERCE_PAY", false),
            raw(2, None, "COMMERCE_PAY", true),
            raw(3, Some("https://a.example"), "CLASSIC", false),
        ];
        let part = partition_links(&links);
        assert_eq!(part.visible, vec![Link::new("https://a.example")]);
        assert!(part.gated.is_empty());
    }

    #[test]
    fn test_partition_collects_gated() {
        let links = vec![
            raw(1, Some("https://a.example"), "CLASSIC", false),
            raw(2, None, "CLASSIC", true),
            raw(3, None, "COMMERCE_PAY", false),
            raw(5, None, "MUSIC", true),
        ];
        let part = partition_links(&links);
        assert_eq!(part.visible, vec![Link::new("https://a.example")]);
        assert_eq!(part.gated.as_slice(), &[2, 5]);
    }

    #[test]
    fn test_gate_ids_from() {
        assert_eq!(GateIds::from(9).as_slice(), &[9]);
        assert_eq!(GateIds::from(vec![1, 2]).as_slice(), &[1, 2]);
        assert_eq!(GateIds::from(&[3i64][..]).as_slice(), &[3]);
    }

    #[test]
    fn test_gate_request_body() {
        let body = gate_request_body(42, &[2, 5]);
        assert_eq!(
            body,
            json!({
                "accountId": 42,
                "validationInput": {"acceptedSensitiveContent": [2, 5]},
                "requestSource": {"referrer": null}
            })
        );
    }

    #[test]
    fn test_decode_gate_response() {
        let links = decode_gate_response(
            r#"{"links": [{"url": "https://secret.example", "id": 2}, {"url": null}]}"#,
        )
        .unwrap();
        assert_eq!(links, vec![Link::new("https://secret.example"), Link { url: None }]);
    }

    #[test]
    fn test_decode_gate_entry_without_url() {
        let err = decode_gate_response(r#"{"links": [{"url": "https://a.example"}, {"id": 2}]}"#)
            .unwrap_err();
        assert!(matches!(err, LinktreeError::Unlock(_)));
        assert!(err.to_string().contains("url"));
    }

    #[test]
    fn test_decode_gate_response_errors() {
        let missing = decode_gate_response(r#"{"account": {}}"#).unwrap_err();
        assert!(matches!(missing, LinktreeError::Unlock(_)));
        assert!(missing.to_string().contains("links"));

        let garbage = decode_gate_response("<html>").unwrap_err();
        assert!(matches!(garbage, LinktreeError::Unlock(_)));
    }
}
