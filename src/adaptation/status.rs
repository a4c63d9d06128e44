//! Implementation status shared by household measures and infrastructure projects
//!
//! A project starts `NotImplemented`, enters `Implementing` with its progress
//! counter at 1, gains exactly one unit of progress per advance, and becomes
//! `Implemented` on the advance that brings progress up to its duration. It can
//! never jump straight from `NotImplemented` to `Implemented`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImplementationStatus {
    #[default]
    NotImplemented,
    Implementing { progress: u32 },
    Implemented,
}

/// What a call to [`ImplementationStatus::advance`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Progressed { progress: u32 },
    Completed,
    Unchanged,
}

impl ImplementationStatus {
    /// Move one step along the lifecycle of a project lasting `duration` steps
    pub fn advance(&mut self, duration: u32) -> Transition {
        match *self {
            Self::NotImplemented => {
                *self = Self::Implementing { progress: 1 };
                Transition::Started
            }
            Self::Implementing { progress } => {
                let progress = progress + 1;
                if progress >= duration {
                    *self = Self::Implemented;
                    Transition::Completed
                } else {
                    *self = Self::Implementing { progress };
                    Transition::Progressed { progress }
                }
            }
            Self::Implemented => Transition::Unchanged,
        }
    }

    /// Knock the project back to the start (e.g. destroyed by a flood)
    pub fn reset(&mut self) {
        *self = Self::NotImplemented;
    }

    pub fn progress(&self) -> Option<u32> {
        match self {
            Self::Implementing { progress } => Some(*progress),
            _ => None,
        }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented)
    }

    pub fn is_implementing(&self) -> bool {
        matches!(self, Self::Implementing { .. })
    }

    pub fn is_implemented(&self) -> bool {
        matches!(self, Self::Implemented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_advance_starts_with_progress_one() {
        let mut status = ImplementationStatus::default();
        assert_eq!(status.advance(4), Transition::Started);
        assert_eq!(status.progress(), Some(1));
    }

    #[test]
    fn test_duration_five_completes_on_fifth_advance() {
        let mut status = ImplementationStatus::NotImplemented;
        for call in 1..5 {
            status.advance(5);
            assert!(status.is_implementing(), "completed early at call {}", call);
        }
        assert_eq!(status.advance(5), Transition::Completed);
        assert!(status.is_implemented());
        assert_eq!(status.advance(5), Transition::Unchanged);
        assert!(status.is_implemented());
    }

    #[test]
    fn test_duration_one_still_passes_through_implementing() {
        let mut status = ImplementationStatus::NotImplemented;
        status.advance(1);
        assert!(status.is_implementing());
        status.advance(1);
        assert!(status.is_implemented());
    }

    #[test]
    fn test_reset_returns_to_not_implemented() {
        let mut status = ImplementationStatus::Implemented;
        status.reset();
        assert!(status.is_not_implemented());
        assert_eq!(status.progress(), None);
    }

    proptest! {
        #[test]
        fn prop_progress_increments_once_per_advance(duration in 1u32..20, calls in 1usize..40) {
            let mut status = ImplementationStatus::NotImplemented;
            let mut last_progress = 0;
            for _ in 0..calls {
                let before = status;
                status.advance(duration);
                prop_assert!(!(before.is_not_implemented() && status.is_implemented()));
                if let Some(p) = status.progress() {
                    prop_assert_eq!(p, last_progress + 1);
                    last_progress = p;
                }
                if before.is_implemented() {
                    prop_assert!(status.is_implemented());
                }
            }
        }
    }
}
