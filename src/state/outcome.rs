//! Outcome definitions for processed frontier entries
//!
//! Every dequeued entry ends in exactly one of these outcomes.
use std::fmt;

/// What happened to one dequeued frontier entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    // ===== Success =====
    /// Page was fetched, stored and its links enqueued
    Processed { links_enqueued: usize },

    // ===== Skips =====
    /// Entry depth is beyond the configured maximum
    DepthExceeded,

    /// URL was already in the visited index
    AlreadyVisited,

    /// Response Content-Type is not in the allow-list
    MimeNotAllowed,

    // ===== Failures =====
    /// Network error, non-2xx status or oversized body
    FetchFailed,

    /// Page record could not be written
    StoreFailed,
}

impl PageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }

    /// Returns true for outcomes that are not errors but did no work
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Self::DepthExceeded | Self::AlreadyVisited | Self::MimeNotAllowed
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::StoreFailed)
    }

    /// Returns true if the URL ends up in the visited index
    pub fn marks_visited(&self) -> bool {
        matches!(
            self,
            Self::Processed { .. } | Self::MimeNotAllowed | Self::FetchFailed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed { .. } => "processed",
            Self::DepthExceeded => "depth_exceeded",
            Self::AlreadyVisited => "already_visited",
            Self::MimeNotAllowed => "mime_not_allowed",
            Self::FetchFailed => "fetch_failed",
            Self::StoreFailed => "store_failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PageOutcome; 6] = [
        PageOutcome::Processed { links_enqueued: 0 },
        PageOutcome::DepthExceeded,
        PageOutcome::AlreadyVisited,
        PageOutcome::MimeNotAllowed,
        PageOutcome::FetchFailed,
        PageOutcome::StoreFailed,
    ];

    #[test]
    fn test_each_outcome_in_exactly_one_class() {
        for outcome in ALL {
            let classes = [outcome.is_success(), outcome.is_skipped(), outcome.is_error()];
            assert_eq!(
                classes.iter().filter(|c| **c).count(),
                1,
                "{} should be in one class",
                outcome
            );
        }
    }

    #[test]
    fn test_marks_visited() {
        assert!(PageOutcome::Processed { links_enqueued: 3 }.marks_visited());
        assert!(PageOutcome::MimeNotAllowed.marks_visited());
        assert!(PageOutcome::FetchFailed.marks_visited());

        assert!(!PageOutcome::StoreFailed.marks_visited());
        assert!(!PageOutcome::DepthExceeded.marks_visited());
        assert!(!PageOutcome::AlreadyVisited.marks_visited());
    }

    #[test]
    fn test_display() {
        assert_eq!(PageOutcome::MimeNotAllowed.to_string(), "mime_not_allowed");
        assert_eq!(
            PageOutcome::Processed { links_enqueued: 7 }.to_string(),
            "processed"
        );
    }
}
