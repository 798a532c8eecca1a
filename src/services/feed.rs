//! RSS fetching and item extraction

use std::sync::LazyLock;
use std::time::Duration;

use jiff::Timestamp;
use regex::{Captures, Regex};

use super::rss_config::FeedConfig;
use crate::error::{GlassError, Result};
use crate::utils::text::{normalize_whitespace, one_line_snippet, paginate_text, rolling_hash_base36};

pub const SNIPPET_LENGTH: usize = 72;
pub const DETAIL_PAGE_LENGTH: usize = 480;
pub const MISSING_TITLE: &str = "Ohne Titel";
pub const MISSING_DESCRIPTION: &str = "Keine Beschreibung verfuegbar.";

const ACCEPT: &str = "application/rss+xml, application/xml, text/xml";

static ROOT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(rss|rdf:RDF|channel)\b").expect("feed root regex should be valid")
});

static ITEM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<item\b[^>]*>(.*?)</item\s*>").expect("item regex should be valid")
});

static CDATA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("cdata regex should be valid")
});

static MARKUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("markup regex should be valid"));

static ENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("entity regex should be valid")
});

/// Element regexes, compiled once per tag name.
struct TagPatterns {
    title: Regex,
    description: Regex,
    content: Regex,
    link: Regex,
    guid: Regex,
    pub_date: Regex,
}

static TAGS: LazyLock<TagPatterns> = LazyLock::new(|| TagPatterns {
    title: tag_regex("title"),
    description: tag_regex("description"),
    content: tag_regex("content:encoded"),
    link: tag_regex("link"),
    guid: tag_regex("guid"),
    pub_date: tag_regex("pubDate"),
});

fn tag_regex(name: &str) -> Regex {
    let name = regex::escape(name);
    Regex::new(&format!(r"(?is)<{name}(?:\s[^>]*)?>(.*?)</{name}\s*>"))
        .expect("tag regex should be valid")
}

/// Fetches raw feed documents.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Feed source backed by `reqwest`.
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("glassdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GlassError::Feed(format!("HTTP {}", status.as_u16())));
        }
        Ok(response.text().await?)
    }
}

/// One parsed feed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub snippet: String,
    pub pages: Vec<String>,
    pub link: Option<String>,
    pub source: String,
    pub pub_date_text: Option<String>,
    pub published: Option<Timestamp>,
}

/// Extract up to `feed.max_entries` items from an RSS document.
pub fn parse_feed(xml: &str, feed: &FeedConfig) -> Result<Vec<FeedItem>> {
    if !ROOT_REGEX.is_match(xml) {
        return Err(GlassError::Feed(format!(
            "Ungueltiges RSS-XML fuer {}",
            feed.title
        )));
    }

    let items = ITEM_REGEX
        .captures_iter(xml)
        .take(feed.max_entries)
        .enumerate()
        .map(|(index, captures)| parse_item(&captures[1], index, feed))
        .collect();
    Ok(items)
}

fn parse_item(body: &str, index: usize, feed: &FeedConfig) -> FeedItem {
    let tags = &*TAGS;
    let title = first_text(body, &[&tags.title]).unwrap_or_else(|| MISSING_TITLE.to_string());
    let raw_description = first_text(body, &[&tags.description, &tags.content])
        .unwrap_or_else(|| MISSING_DESCRIPTION.to_string());
    let description = normalize_whitespace(&strip_html(&raw_description));
    let pub_date_text = first_text(body, &[&tags.pub_date]);
    let link = first_text(body, &[&tags.link]);
    let guid = first_text(body, &[&tags.guid]);

    let unique_key = guid
        .clone()
        .or_else(|| link.clone())
        .unwrap_or_else(|| format!("{title}-{index}"));

    FeedItem {
        id: format!("{}-{}", feed.id, rolling_hash_base36(&unique_key)),
        snippet: one_line_snippet(&description, SNIPPET_LENGTH),
        pages: paginate_text(&description, DETAIL_PAGE_LENGTH, MISSING_DESCRIPTION),
        published: pub_date_text.as_deref().and_then(parse_pub_date),
        title,
        description,
        link,
        source: feed.title.clone(),
        pub_date_text,
    }
}

/// Text of the first listed element that has non-blank content.
fn first_text(body: &str, patterns: &[&Regex]) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        let captures = pattern.captures(body)?;
        let text = normalize_whitespace(&xml_text(&captures[1]));
        (!text.is_empty()).then_some(text)
    })
}

/// Character data of an element: CDATA sections verbatim, entities decoded elsewhere.
fn xml_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last = 0;
    for captures in CDATA_REGEX.captures_iter(raw) {
        let Some(section) = captures.get(0) else {
            continue;
        };
        out.push_str(&decode_entities(&raw[last..section.start()]));
        out.push_str(&captures[1]);
        last = section.end();
    }
    out.push_str(&decode_entities(&raw[last..]));
    out
}

/// Text content of an HTML fragment.
pub fn strip_html(value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    decode_entities(&MARKUP_REGEX.replace_all(value, ""))
}

fn decode_entities(value: &str) -> String {
    ENTITY_REGEX
        .replace_all(value, |captures: &Captures| {
            let entity = &captures[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(str::parse::<u32>))
                    .and_then(|code| code.ok())
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| captures[0].to_string(), String::from)
        })
        .into_owned()
}

/// RFC 2822 dates as used by RSS, with RFC 3339 as a fallback.
pub fn parse_pub_date(text: &str) -> Option<Timestamp> {
    if let Ok(zoned) = jiff::fmt::rfc2822::parse(text) {
        return Some(zoned.timestamp());
    }
    text.parse::<Timestamp>().ok()
}
