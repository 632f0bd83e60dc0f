//! The two status vocabularies and the collapsing map between them.
//!
//! Clients speak a fine-grained UI vocabulary (`paid`, `preparing`, `ready`,
//! `delivered`, ...); the `status` column stores a coarse four-state
//! vocabulary. The collapse is lossy and one-directional, so the raw UI label
//! is mirrored into `original_status` purely for display.

/// The persisted state machine: `pending → processing → completed`, with
/// `cancelled` reachable from any state and terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistedStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl PersistedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistedStatus::Pending => "pending",
            PersistedStatus::Processing => "processing",
            PersistedStatus::Completed => "completed",
            PersistedStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a value read back from the `status` column.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PersistedStatus::Pending),
            "processing" => Some(PersistedStatus::Processing),
            "completed" => Some(PersistedStatus::Completed),
            "cancelled" => Some(PersistedStatus::Cancelled),
            _ => None,
        }
    }
}

/// Collapse a UI-facing status label onto the persisted vocabulary.
///
/// Case-insensitive. Returns `None` for unrecognized labels, which callers
/// treat as "keep the order's current persisted status".
pub fn map_ui_status(ui: &str) -> Option<PersistedStatus> {
    match ui.trim().to_ascii_lowercase().as_str() {
        "pending" => Some(PersistedStatus::Pending),
        "paid" | "preparing" | "processing" => Some(PersistedStatus::Processing),
        "ready" | "completed" | "delivered" => Some(PersistedStatus::Completed),
        "cancelled" => Some(PersistedStatus::Cancelled),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_synonyms_collapse_to_processing() {
        for ui in ["paid", "preparing", "processing"] {
            assert_eq!(map_ui_status(ui), Some(PersistedStatus::Processing));
        }
    }

    #[test]
    fn near_synonyms_collapse_to_completed() {
        for ui in ["ready", "completed", "delivered"] {
            assert_eq!(map_ui_status(ui), Some(PersistedStatus::Completed));
        }
    }

    #[test]
    fn mapping_is_case_insensitive() {
        assert_eq!(map_ui_status("DELIVERED"), Some(PersistedStatus::Completed));
        assert_eq!(map_ui_status("  Paid "), Some(PersistedStatus::Processing));
    }

    #[test]
    fn unknown_label_maps_to_none() {
        assert_eq!(map_ui_status("bogus-status"), None);
        assert_eq!(map_ui_status(""), None);
    }

    #[test]
    fn persisted_round_trips_through_as_str() {
        for status in [
            PersistedStatus::Pending,
            PersistedStatus::Processing,
            PersistedStatus::Completed,
            PersistedStatus::Cancelled,
        ] {
            assert_eq!(PersistedStatus::parse(status.as_str()), Some(status));
        }
    }
}
