//! Selection resolution for list-like screens
//!
//! Pure: rows, the previous index and a canonical event go in, the next index and an
//! optional click target come out. Screens own the resulting index.

use std::sync::LazyLock;

use regex::Regex;

use super::rows::SelectableRow;
use crate::input::{CanonicalInputEvent, InputKind, SelectionPayload};

static NUMBERED_ITEM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^item\s*(\d+)$").expect("numbered item regex should be valid")
});

static CHECKBOX_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[ xX]\]\s*").expect("checkbox prefix regex should be valid")
});

/// How a landing row that cannot hold the selection is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkipPolicy {
    /// Any row may be selected.
    #[default]
    None,
    /// Status and divider rows are skipped; checkbox prefixes are ignored by name matching.
    NonInteractive,
}

/// Result of resolving one event against a row list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub next_index: usize,
    pub target_id: Option<String>,
    /// The click moved the selection without any explicit hint and was ignored.
    pub suppressed: bool,
}

impl SelectionOutcome {
    fn at(next_index: usize) -> Self {
        Self {
            next_index,
            target_id: None,
            suppressed: false,
        }
    }
}

/// Resolve `event` against `rows`, starting from `current`.
pub fn resolve(
    rows: &[SelectableRow],
    current: usize,
    event: &CanonicalInputEvent,
    policy: SkipPolicy,
) -> SelectionOutcome {
    if rows.is_empty() {
        return SelectionOutcome::at(0);
    }

    let max_index = rows.len() - 1;
    let current = current.min(max_index);
    let payload = event.selection();
    let resolved = resolve_payload_index(rows, &payload, policy).unwrap_or(current);

    let candidate = match event.kind {
        InputKind::Up => resolved.saturating_sub(1),
        InputKind::Down => (resolved + 1).min(max_index),
        InputKind::Click | InputKind::SelectionChange => resolved,
        InputKind::DoubleClick => current,
    };

    let next_index = match policy {
        SkipPolicy::None => candidate,
        SkipPolicy::NonInteractive => nearest_interactive(rows, candidate),
    };

    if event.kind != InputKind::Click {
        return SelectionOutcome::at(next_index);
    }

    if is_implicit_click(&payload, current, next_index) {
        tracing::debug!(
            previous = current,
            next = next_index,
            "click skipped (implicit selection update)"
        );
        return SelectionOutcome {
            next_index,
            target_id: None,
            suppressed: true,
        };
    }

    SelectionOutcome {
        next_index,
        target_id: rows[next_index].target_id().map(str::to_string),
        suppressed: false,
    }
}

/// Index named or given by the payload, if any. Name wins over index.
pub fn resolve_payload_index(
    rows: &[SelectableRow],
    payload: &SelectionPayload,
    policy: SkipPolicy,
) -> Option<usize> {
    if rows.is_empty() {
        return None;
    }
    let max_index = rows.len() - 1;

    if let Some(name) = payload.name.as_deref()
        && let Some(index) = match_name(rows, name, policy)
    {
        return Some(index);
    }

    payload
        .index
        .map(|index| normalize_event_index(index, max_index))
}

/// Zero-based when in range, one-based when past the end, negatives pinned to 0.
pub fn normalize_event_index(index: i64, max_index: usize) -> usize {
    if index < 0 {
        return 0;
    }
    let index = index as u64;
    let max = max_index as u64;
    if index <= max {
        index as usize
    } else {
        (index - 1).min(max) as usize
    }
}

/// Nearest interactive row, searching backward from `candidate` first.
///
/// Keeps `candidate` when no row is interactive.
pub fn nearest_interactive(rows: &[SelectableRow], candidate: usize) -> usize {
    if rows.is_empty() {
        return 0;
    }
    let candidate = candidate.min(rows.len() - 1);
    if rows[candidate].is_interactive() {
        return candidate;
    }

    (0..candidate)
        .rev()
        .chain(candidate + 1..rows.len())
        .find(|&index| rows[index].is_interactive())
        .unwrap_or(candidate)
}

fn match_name(rows: &[SelectableRow], name: &str, policy: SkipPolicy) -> Option<usize> {
    let wanted = name.trim();
    let by_name = rows.iter().position(|row| {
        unicase::eq(row.label().trim(), wanted)
            || unicase::eq(row.id().trim(), wanted)
            || (policy == SkipPolicy::NonInteractive
                && unicase::eq(
                    CHECKBOX_PREFIX_REGEX.replace(row.label(), "").trim(),
                    wanted,
                ))
    });
    if by_name.is_some() {
        return by_name;
    }

    let captures = NUMBERED_ITEM_REGEX.captures(wanted)?;
    let one_based: usize = captures[1].parse().ok()?;
    if one_based == 0 {
        return None;
    }
    Some((one_based - 1).min(rows.len() - 1))
}

fn is_implicit_click(payload: &SelectionPayload, previous: usize, next: usize) -> bool {
    payload.type_hint.is_none() && !payload.has_selection() && previous != next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawBridgeEvent;
    use serde_json::json;

    fn rows(labels: &[&str]) -> Vec<SelectableRow> {
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| SelectableRow::item(format!("id-{index}"), *label))
            .collect()
    }

    fn event(kind: InputKind, list: serde_json::Value) -> CanonicalInputEvent {
        CanonicalInputEvent::new(kind, RawBridgeEvent::default().list(list))
    }

    fn shopping_rows() -> Vec<SelectableRow> {
        vec![
            SelectableRow::item("bread", "[ ] bread"),
            SelectableRow::divider("__shopping-divider__", "-------- Erledigt --------"),
            SelectableRow::item("a", "[x] a"),
        ]
    }

    #[test]
    fn test_empty_rows_resolve_to_zero() {
        let outcome = resolve(&[], 3, &CanonicalInputEvent::bare(InputKind::Click), SkipPolicy::None);
        assert_eq!(outcome, SelectionOutcome::at(0));
    }

    #[test]
    fn test_up_at_top_stays_at_top() {
        let rows = rows(&["a", "b", "c"]);
        let mut index = 0;
        for _ in 0..5 {
            index = resolve(&rows, index, &CanonicalInputEvent::bare(InputKind::Up), SkipPolicy::None)
                .next_index;
        }
        assert_eq!(index, 0);
    }

    #[test]
    fn test_down_at_bottom_stays_at_bottom() {
        let rows = rows(&["a", "b", "c"]);
        let mut index = 2;
        for _ in 0..5 {
            let outcome =
                resolve(&rows, index, &CanonicalInputEvent::bare(InputKind::Down), SkipPolicy::None);
            assert!(outcome.target_id.is_none());
            index = outcome.next_index;
        }
        assert_eq!(index, 2);
    }

    #[test]
    fn test_up_steps_from_payload_index() {
        let rows = rows(&["a", "b", "c"]);
        let outcome = resolve(
            &rows,
            0,
            &event(InputKind::Up, json!({"currentSelectItemIndex": 2})),
            SkipPolicy::None,
        );
        assert_eq!(outcome.next_index, 1);
    }

    #[test]
    fn test_click_with_zero_based_index() {
        let rows = rows(&["a", "b", "c"]);
        let outcome = resolve(
            &rows,
            0,
            &event(InputKind::Click, json!({"currentSelectItemIndex": 2, "eventType": 0})),
            SkipPolicy::None,
        );
        assert_eq!(outcome.next_index, 2);
        assert_eq!(outcome.target_id.as_deref(), Some("id-2"));
    }

    #[test]
    fn test_click_with_index_past_end_is_one_based() {
        let rows = rows(&["a", "b", "c"]);
        let outcome = resolve(
            &rows,
            0,
            &event(InputKind::Click, json!({"currentSelectItemIndex": 3})),
            SkipPolicy::None,
        );
        assert_eq!(outcome.next_index, 2);

        let far = resolve(
            &rows,
            0,
            &event(InputKind::Click, json!({"currentSelectItemIndex": 99})),
            SkipPolicy::None,
        );
        assert_eq!(far.next_index, 2);
    }

    #[test]
    fn test_negative_index_pins_to_zero() {
        let rows = rows(&["a", "b"]);
        let outcome = resolve(
            &rows,
            1,
            &event(InputKind::SelectionChange, json!({"currentSelectItemIndex": -4})),
            SkipPolicy::None,
        );
        assert_eq!(outcome.next_index, 0);
        assert!(outcome.target_id.is_none());
    }

    #[test]
    fn test_name_beats_index() {
        let rows = rows(&["RSS-Feeds", "Shopping List"]);
        let outcome = resolve(
            &rows,
            0,
            &event(
                InputKind::Click,
                json!({"currentSelectItemName": " shopping list ", "currentSelectItemIndex": 0}),
            ),
            SkipPolicy::None,
        );
        assert_eq!(outcome.next_index, 1);
        assert_eq!(outcome.target_id.as_deref(), Some("id-1"));
    }

    #[test]
    fn test_name_matches_row_id() {
        let rows = rows(&["RSS-Feeds", "Shopping List"]);
        let outcome = resolve(
            &rows,
            0,
            &event(InputKind::SelectionChange, json!({"currentSelectItemName": "ID-1"})),
            SkipPolicy::None,
        );
        assert_eq!(outcome.next_index, 1);
    }

    #[test]
    fn test_numbered_item_name_is_one_based_and_clamped() {
        let rows = rows(&["a", "b", "c"]);
        let second = resolve(
            &rows,
            0,
            &event(InputKind::SelectionChange, json!({"currentSelectItemName": "item2"})),
            SkipPolicy::None,
        );
        assert_eq!(second.next_index, 1);

        let clamped = resolve(
            &rows,
            0,
            &event(InputKind::SelectionChange, json!({"currentSelectItemName": "Item 9"})),
            SkipPolicy::None,
        );
        assert_eq!(clamped.next_index, 2);
    }

    #[test]
    fn test_unknown_name_keeps_current_index() {
        let rows = rows(&["a", "b"]);
        let outcome = resolve(
            &rows,
            1,
            &event(InputKind::Click, json!({"currentSelectItemName": "nope", "eventType": 0})),
            SkipPolicy::None,
        );
        assert_eq!(outcome.next_index, 1);
        assert_eq!(outcome.target_id.as_deref(), Some("id-1"));
    }

    #[test]
    fn test_click_without_payload_targets_current_row() {
        let rows = rows(&["a", "b"]);
        let outcome = resolve(&rows, 1, &CanonicalInputEvent::bare(InputKind::Click), SkipPolicy::None);
        assert_eq!(outcome.next_index, 1);
        assert_eq!(outcome.target_id.as_deref(), Some("id-1"));
        assert!(!outcome.suppressed);
    }

    #[test]
    fn test_implicit_click_that_moves_selection_has_no_target() {
        let rows = vec![
            SelectableRow::divider("__div__", "---"),
            SelectableRow::item("a", "[ ] a"),
        ];
        let outcome = resolve(
            &rows,
            0,
            &CanonicalInputEvent::bare(InputKind::Click),
            SkipPolicy::NonInteractive,
        );
        assert_eq!(outcome.next_index, 1);
        assert!(outcome.target_id.is_none());
        assert!(outcome.suppressed);
    }

    #[test]
    fn test_double_click_keeps_index() {
        let rows = rows(&["a", "b"]);
        let outcome = resolve(
            &rows,
            1,
            &event(InputKind::DoubleClick, json!({"currentSelectItemIndex": 0})),
            SkipPolicy::None,
        );
        assert_eq!(outcome.next_index, 1);
        assert!(outcome.target_id.is_none());
    }

    #[test]
    fn test_divider_payload_lands_on_previous_interactive_row() {
        let outcome = resolve(
            &shopping_rows(),
            2,
            &event(InputKind::SelectionChange, json!({"currentSelectItemIndex": 1})),
            SkipPolicy::NonInteractive,
        );
        assert_eq!(outcome.next_index, 0);
    }

    #[test]
    fn test_checkbox_prefix_is_ignored_by_name() {
        let outcome = resolve(
            &shopping_rows(),
            0,
            &event(InputKind::Click, json!({"currentSelectItemName": "A", "eventType": 0})),
            SkipPolicy::NonInteractive,
        );
        assert_eq!(outcome.next_index, 2);
        assert_eq!(outcome.target_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_down_onto_divider_falls_back_to_previous_item() {
        let outcome = resolve(
            &shopping_rows(),
            0,
            &CanonicalInputEvent::bare(InputKind::Down),
            SkipPolicy::NonInteractive,
        );
        assert_eq!(outcome.next_index, 0);
    }

    #[test]
    fn test_nearest_interactive_searches_forward_when_needed() {
        let rows = vec![
            SelectableRow::status("__status__", "x"),
            SelectableRow::divider("__div__", "---"),
            SelectableRow::item("a", "[ ] a"),
        ];
        assert_eq!(nearest_interactive(&rows, 1), 2);
    }

    #[test]
    fn test_nearest_interactive_keeps_candidate_without_interactive_rows() {
        let rows = vec![SelectableRow::status("__status__", "Keine Shopping-Eintraege vorhanden.")];
        assert_eq!(nearest_interactive(&rows, 0), 0);
    }
}
