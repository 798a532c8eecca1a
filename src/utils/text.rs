//! Text shaping for the small display: whitespace, truncation, paging and ids
//!
//! Lengths are counted in chars so multi-byte text never splits mid-character.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex should be valid"));

static NON_SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug regex should be valid"));

pub const TRUNCATION_MARKER: &str = "\n\n[gekuerzt]";

/// Collapse whitespace runs into single spaces and trim.
pub fn normalize_whitespace(value: &str) -> String {
    WHITESPACE_REGEX.replace_all(value, " ").trim().to_string()
}

/// Cut `text` to `max_len` chars, ending with the `[gekuerzt]` marker when cut.
pub fn truncate_with_marker(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(TRUNCATION_MARKER.chars().count());
    let head: String = text.chars().take(keep).collect();
    format!("{head}{TRUNCATION_MARKER}")
}

/// One-line preview of at most `max_len` chars, ending in "..." when cut.
pub fn one_line_snippet(value: &str, max_len: usize) -> String {
    let normalized = normalize_whitespace(value);
    if normalized.chars().count() <= max_len {
        return normalized;
    }
    let head: String = normalized.chars().take(max_len.saturating_sub(1)).collect();
    format!("{}...", head.trim_end())
}

/// Split text into pages of at most `max_len` chars, breaking at spaces when possible.
///
/// Empty text yields a single placeholder page.
pub fn paginate_text(value: &str, max_len: usize, empty_placeholder: &str) -> Vec<String> {
    let normalized = normalize_whitespace(value);
    if normalized.is_empty() {
        return vec![empty_placeholder.to_string()];
    }

    let chars: Vec<char> = normalized.chars().collect();
    if chars.len() <= max_len || max_len == 0 {
        return vec![normalized];
    }

    let mut pages = Vec::new();
    let mut cursor = 0;
    while cursor < chars.len() {
        let remaining = chars.len() - cursor;
        if remaining <= max_len {
            pages.push(collect_trimmed(&chars[cursor..]));
            break;
        }

        let window = &chars[cursor..cursor + max_len + 1];
        let take = match window.iter().rposition(|c| *c == ' ') {
            Some(split) if split > 0 => split,
            _ => max_len,
        };
        pages.push(collect_trimmed(&window[..take]));
        cursor += take;
        while chars.get(cursor) == Some(&' ') {
            cursor += 1;
        }
    }

    pages.retain(|page| !page.is_empty());
    pages
}

fn collect_trimmed(chars: &[char]) -> String {
    chars.iter().collect::<String>().trim().to_string()
}

/// Lowercase ASCII slug; `fallback` when nothing is left.
pub fn slugify(value: &str, fallback: &str) -> String {
    let lowered = value.to_lowercase();
    let slug = NON_SLUG_REGEX.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug.to_string()
    }
}

/// 32-bit FNV-1a over UTF-16 units, as 8 lowercase hex chars.
pub fn fnv1a_hex(value: &str) -> String {
    let mut hash: u32 = 2_166_136_261;
    for unit in value.encode_utf16() {
        hash ^= u32::from(unit);
        hash = hash.wrapping_mul(16_777_619);
    }
    format!("{hash:08x}")
}

/// Rolling `hash * 31 + unit` over UTF-16 units, absolute value in base 36.
pub fn rolling_hash_base36(value: &str) -> String {
    let mut hash: i32 = 0;
    for unit in value.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    to_base36(i64::from(hash).unsigned_abs())
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
