use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an id from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>().map(Self).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                })
            }
        }
    };
}

numeric_id!(
    /// Identifier of the student's main goal.
    GoalId
);
numeric_id!(
    /// Identifier of a milestone inside a goal.
    MilestoneId
);
numeric_id!(
    /// Identifier of a to-do item.
    TodoId
);
numeric_id!(
    /// Identifier of a coach-issued assignment.
    AssignmentId
);
numeric_id!(
    /// Identifier of a recorded coaching session.
    SessionLogId
);
numeric_id!(
    /// Identifier of a journal entry.
    JournalEntryId
);
numeric_id!(AchievementId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_id_display() {
        assert_eq!(GoalId::new(42).to_string(), "42");
    }

    #[test]
    fn milestone_id_debug_names_the_kind() {
        assert_eq!(format!("{:?}", MilestoneId::new(7)), "MilestoneId(7)");
    }

    #[test]
    fn todo_id_from_str() {
        let id: TodoId = "123".parse().unwrap();
        assert_eq!(id, TodoId::new(123));
    }

    #[test]
    fn invalid_id_reports_kind() {
        let err = "not-a-number".parse::<AssignmentId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse AssignmentId from string");
    }
}
