//! Staff directory lookup.
//!
//! The demo ships a fixed in-memory table, but the pipeline only depends on
//! the `StaffDirectory` trait so a real lookup (calendar, HR system) can be
//! plugged in without touching the tools or the turn loop.

/// Whether a staff member can take a call right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    pub fn is_available(self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Lookup interface for staff availability.
///
/// Read-only after startup; implementations need no interior mutability.
pub trait StaffDirectory: Send + Sync {
    /// Availability for a named staff member. Unknown names are
    /// `Unavailable`; there is no separate error path.
    fn availability(&self, name: &str) -> Availability;

    /// The names callers can ask for, used to build the greeting prompt.
    fn roster(&self) -> Vec<String>;
}

/// Fixed demonstration directory.
pub struct StaticDirectory {
    entries: Vec<(String, Availability)>,
}

impl StaticDirectory {
    pub fn new(entries: Vec<(String, Availability)>) -> Self {
        Self { entries }
    }
}

impl Default for StaticDirectory {
    /// The four demo staff members with deterministic availability.
    fn default() -> Self {
        Self::new(vec![
            ("John Doe".to_string(), Availability::Available),
            ("Jane Smith".to_string(), Availability::Unavailable),
            ("Bob Johnson".to_string(), Availability::Available),
            ("Alice Brown".to_string(), Availability::Unavailable),
        ])
    }
}

impl StaffDirectory for StaticDirectory {
    fn availability(&self, name: &str) -> Availability {
        let wanted = name.trim();
        self.entries
            .iter()
            .find(|(entry, _)| entry.eq_ignore_ascii_case(wanted))
            .map(|(_, availability)| *availability)
            .unwrap_or(Availability::Unavailable)
    }

    fn roster(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_match_table() {
        let directory = StaticDirectory::default();
        assert_eq!(directory.availability("John Doe"), Availability::Available);
        assert_eq!(
            directory.availability("Jane Smith"),
            Availability::Unavailable
        );
        assert_eq!(
            directory.availability("Bob Johnson"),
            Availability::Available
        );
        assert_eq!(
            directory.availability("Alice Brown"),
            Availability::Unavailable
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let directory = StaticDirectory::default();
        assert_eq!(directory.availability("john doe"), Availability::Available);
        assert_eq!(
            directory.availability("  JOHN DOE  "),
            Availability::Available
        );
    }

    #[test]
    fn test_unknown_names_are_unavailable() {
        let directory = StaticDirectory::default();
        assert_eq!(
            directory.availability("Marvin Martian"),
            Availability::Unavailable
        );
        assert_eq!(directory.availability(""), Availability::Unavailable);
    }

    #[test]
    fn test_roster_lists_all_names() {
        let directory = StaticDirectory::default();
        let roster = directory.roster();
        assert_eq!(roster.len(), 4);
        assert!(roster.contains(&"Alice Brown".to_string()));
    }
}
