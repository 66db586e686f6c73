use serde::Serialize;
use std::fmt;

/// Fixed status classification shared by the metrics and the renderer's colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Pending,
    Active,
    Staging,
    Review,
    Deployed,
    Approved,
    Production,
    Blocked,
    Deferred,
    Uncategorized,
}

const STATUS_TABLE: &[(&str, StatusCategory)] = &[
    ("not initiated", StatusCategory::Pending),
    ("to do", StatusCategory::Pending),
    ("open", StatusCategory::Pending),
    ("in progress", StatusCategory::Active),
    ("staging", StatusCategory::Staging),
    ("staging deployed", StatusCategory::Staging),
    ("qa review", StatusCategory::Review),
    ("in review", StatusCategory::Review),
    ("qa deployed", StatusCategory::Deployed),
    ("qa approved", StatusCategory::Approved),
    ("done", StatusCategory::Production),
    ("production", StatusCategory::Production),
    ("released", StatusCategory::Production),
    ("closed", StatusCategory::Production),
    ("on hold", StatusCategory::Blocked),
    ("blocked", StatusCategory::Blocked),
    ("to be picked in another sprint", StatusCategory::Deferred),
    ("deferred", StatusCategory::Deferred),
];

impl StatusCategory {
    pub const ALL: [StatusCategory; 10] = [
        StatusCategory::Pending,
        StatusCategory::Active,
        StatusCategory::Staging,
        StatusCategory::Review,
        StatusCategory::Deployed,
        StatusCategory::Approved,
        StatusCategory::Production,
        StatusCategory::Blocked,
        StatusCategory::Deferred,
        StatusCategory::Uncategorized,
    ];

    /// Maps a raw status string to its category. Unknown strings land in `Uncategorized`.
    pub fn from_status(status: &str) -> Self {
        let normalized = normalize_status(status);
        STATUS_TABLE
            .iter()
            .find(|(label, _)| *label == normalized)
            .map(|(_, category)| *category)
            .unwrap_or(StatusCategory::Uncategorized)
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatusCategory::Pending => "pending",
            StatusCategory::Active => "active",
            StatusCategory::Staging => "staging",
            StatusCategory::Review => "review",
            StatusCategory::Deployed => "deployed",
            StatusCategory::Approved => "approved",
            StatusCategory::Production => "production",
            StatusCategory::Blocked => "blocked",
            StatusCategory::Deferred => "deferred",
            StatusCategory::Uncategorized => "uncategorized",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusCategory::Pending => "Not Initiated",
            StatusCategory::Active => "In Progress",
            StatusCategory::Staging => "Staging",
            StatusCategory::Review => "QA Review",
            StatusCategory::Deployed => "QA Deployed",
            StatusCategory::Approved => "QA Approved",
            StatusCategory::Production => "Production",
            StatusCategory::Blocked => "On Hold",
            StatusCategory::Deferred => "To Be Picked In Another Sprint",
            StatusCategory::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trims, collapses inner whitespace and lowercases a status string.
pub fn normalize_status(status: &str) -> String {
    status
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_table_entries() {
        assert_eq!(StatusCategory::from_status("To Do"), StatusCategory::Pending);
        assert_eq!(StatusCategory::from_status("Open"), StatusCategory::Pending);
        assert_eq!(StatusCategory::from_status("In Progress"), StatusCategory::Active);
        assert_eq!(StatusCategory::from_status("QA Review"), StatusCategory::Review);
        assert_eq!(StatusCategory::from_status("Released"), StatusCategory::Production);
        assert_eq!(StatusCategory::from_status("Blocked"), StatusCategory::Blocked);
        assert_eq!(
            StatusCategory::from_status("To Be Picked In Another Sprint"),
            StatusCategory::Deferred
        );
    }

    #[test]
    fn matching_ignores_case_and_spacing() {
        assert_eq!(StatusCategory::from_status("  in   PROGRESS "), StatusCategory::Active);
        assert_eq!(StatusCategory::from_status("qa approved"), StatusCategory::Approved);
    }

    #[test]
    fn unknown_status_is_uncategorized() {
        assert_eq!(StatusCategory::from_status("Reopened"), StatusCategory::Uncategorized);
        assert_eq!(StatusCategory::from_status(""), StatusCategory::Uncategorized);
    }
}
