//! Selectable rows shared by every list-like screen

/// Direction of a pagination control row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    PreviousPage,
    NextPage,
}

/// One row of a list container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectableRow {
    /// A data row. `target_id` names the list, detail or item a click acts on.
    Item {
        id: String,
        label: String,
        target_id: Option<String>,
    },
    Control {
        id: String,
        label: String,
        kind: ControlKind,
    },
    /// Loading, error or empty-state message.
    Status { id: String, label: String },
    /// Separator between open and done shopping items.
    Divider { id: String, label: String },
}

impl SelectableRow {
    pub fn item(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        SelectableRow::Item {
            target_id: Some(id.clone()),
            id,
            label: label.into(),
        }
    }

    pub fn item_with_target(
        id: impl Into<String>,
        label: impl Into<String>,
        target_id: Option<String>,
    ) -> Self {
        SelectableRow::Item {
            id: id.into(),
            label: label.into(),
            target_id,
        }
    }

    pub fn status(id: impl Into<String>, label: impl Into<String>) -> Self {
        SelectableRow::Status {
            id: id.into(),
            label: label.into(),
        }
    }

    pub fn divider(id: impl Into<String>, label: impl Into<String>) -> Self {
        SelectableRow::Divider {
            id: id.into(),
            label: label.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SelectableRow::Item { id, .. }
            | SelectableRow::Control { id, .. }
            | SelectableRow::Status { id, .. }
            | SelectableRow::Divider { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SelectableRow::Item { label, .. }
            | SelectableRow::Control { label, .. }
            | SelectableRow::Status { label, .. }
            | SelectableRow::Divider { label, .. } => label,
        }
    }

    /// Target of a confirming click. Only item rows have one.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            SelectableRow::Item { target_id, .. } => target_id.as_deref(),
            _ => None,
        }
    }

    /// Status and divider rows can never hold the selection in skipping lists.
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            SelectableRow::Item { .. } | SelectableRow::Control { .. }
        )
    }

    pub fn is_status(&self) -> bool {
        matches!(self, SelectableRow::Status { .. })
    }
}

/// Labels of a row list, in order.
pub fn labels(rows: &[SelectableRow]) -> Vec<String> {
    rows.iter().map(|row| row.label().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_targets_itself_by_default() {
        let row = SelectableRow::item("a", "Eintrag A");
        assert_eq!(row.target_id(), Some("a"));
        assert!(row.is_interactive());
    }

    #[test]
    fn test_status_and_divider_are_not_interactive() {
        assert!(!SelectableRow::status("__status__", "x").is_interactive());
        assert!(!SelectableRow::divider("__div__", "---").is_interactive());
        assert_eq!(SelectableRow::status("__status__", "x").target_id(), None);
    }

    #[test]
    fn test_control_has_no_target() {
        let row = SelectableRow::Control {
            id: "__next__".to_string(),
            label: "[Naechste Seite]".to_string(),
            kind: ControlKind::NextPage,
        };
        assert!(row.is_interactive());
        assert_eq!(row.target_id(), None);
        assert_eq!(row.label(), "[Naechste Seite]");
    }
}
