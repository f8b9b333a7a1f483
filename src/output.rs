//! Rendering a profile record for the terminal

use crate::schema::LinktreeUser;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml,
}

pub fn render(user: &LinktreeUser, format: Format) -> Result<String> {
    let out = match format {
        Format::Text => render_text(user),
        Format::Json => serde_json::to_string_pretty(user)?,
        Format::Yaml => serde_yaml::to_string(user)?,
    };
    Ok(out)
}

fn render_text(user: &LinktreeUser) -> String {
    let mut lines = vec![
        format!("username : {}", user.username),
        format!("url : {}", user.url),
        format!("avatar image : {}", or_none(user.avatar_image.as_deref())),
        format!("id : {}", user.id),
        format!("tier : {}", user.tier),
        format!("isActive : {}", user.is_active),
        format!("description : {}", or_none(user.description.as_deref())),
        format!("createdAt : {}", timestamp(user.created_at)),
        format!("updatedAt : {}", timestamp(user.updated_at)),
        String::new(),
        "Links:".to_string(),
    ];

    lines.extend(user.links.iter().filter_map(|l| l.url.clone()));
    lines.join("\n")
}

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Epoch millis, with an RFC 3339 rendering when in range
fn timestamp(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => format!(
            "{} ({})",
            millis,
            dt.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        None => millis.to_string(),
    }
}
