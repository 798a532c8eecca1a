//! `normalize`: run raw bridge events through the normalizer and print the result

use owo_colors::OwoColorize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::Result;
use crate::input::{CanonicalInputEvent, EventNormalizer, RawBridgeEvent};

/// Normalize NDJSON events from stdin, one output line per input line
pub async fn cmd_normalize(json: bool) -> Result<()> {
    let (seen, dropped) = normalize_stream(tokio::io::stdin(), tokio::io::stdout(), json).await?;
    tracing::debug!(seen, dropped, "normalize finished");
    Ok(())
}

/// Canonical event as JSON: kind plus whatever selection hints the payload carries.
pub fn describe_event(event: &CanonicalInputEvent) -> Value {
    let selection = event.selection();
    json!({
        "kind": event.kind.to_string(),
        "index": selection.index,
        "name": selection.name,
        "type_hint": selection.type_hint,
    })
}

fn describe_text(event: &CanonicalInputEvent) -> String {
    let selection = event.selection();
    let mut line = event.kind.to_string().green().to_string();
    if let Some(index) = selection.index {
        line.push_str(&format!(" index={index}"));
    }
    if let Some(name) = &selection.name {
        line.push_str(&format!(" name={name:?}"));
    }
    line
}

/// Returns how many lines were read and how many of them were dropped.
async fn normalize_stream<R, W>(reader: R, mut writer: W, json: bool) -> Result<(usize, usize)>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let normalizer = EventNormalizer::default();
    let mut lines = BufReader::new(reader).lines();
    let (mut seen, mut dropped) = (0, 0);

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        seen += 1;

        let event = normalizer.normalize(RawBridgeEvent::from_line(&line));
        if event.is_none() {
            dropped += 1;
        }
        let rendered = match (event, json) {
            (Some(event), true) => serde_json::to_string(&describe_event(&event))?,
            (None, true) => serde_json::to_string(&json!({ "kind": null }))?,
            (Some(event), false) => describe_text(&event),
            (None, false) => "dropped".dimmed().to_string(),
        };
        writer.write_all(rendered.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    writer.flush().await?;

    Ok((seen, dropped))
}
