//! Closed value domains backed by PostgreSQL enum types.
//!
//! Each enum maps 1:1 onto a `CREATE TYPE ... AS ENUM` in the migrations and
//! uses the same snake_case labels on the wire (JSON) and in the database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when a string does not name a variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} value: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! impl_pg_enum {
    (
        $name:ident as $kind:literal {
            $( $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// The database / wire label for this variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $label => Ok($name::$variant), )+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Account role. Stored locally; not enforced by this service.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Responder,
    #[default]
    Viewer,
    Manager,
}

impl_pg_enum!(UserRole as "user_role" {
    Admin => "admin",
    Responder => "responder",
    Viewer => "viewer",
    Manager => "manager",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "incident_severity", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl_pg_enum!(IncidentSeverity as "incident_severity" {
    Critical => "critical",
    High => "high",
    Medium => "medium",
    Low => "low",
});

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "incident_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl_pg_enum!(IncidentStatus as "incident_status" {
    Open => "open",
    InProgress => "in_progress",
    Resolved => "resolved",
    Closed => "closed",
});

impl IncidentStatus {
    /// Whether entering this status stamps `resolved_at`.
    pub fn is_terminal(self) -> bool {
        matches!(self, IncidentStatus::Resolved | IncidentStatus::Closed)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl_pg_enum!(TaskStatus as "task_status" {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    System,
    Manual,
}

impl_pg_enum!(AlertType as "alert_type" {
    System => "system",
    Manual => "manual",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_severity", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl_pg_enum!(AlertSeverity as "alert_severity" {
    Critical => "critical",
    High => "high",
    Medium => "medium",
    Low => "low",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_is_viewer() {
        assert_eq!(UserRole::default(), UserRole::Viewer);
        assert_eq!(UserRole::default().as_str(), "viewer");
    }

    #[test]
    fn role_labels_match_the_user_role_type() {
        let labels: Vec<_> = UserRole::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(labels, vec!["admin", "responder", "viewer", "manager"]);
    }

    #[test]
    fn labels_parse_back_to_the_same_variant() {
        for status in IncidentStatus::ALL {
            assert_eq!(status.as_str().parse::<IncidentStatus>(), Ok(*status));
        }
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(*status));
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "superuser".parse::<UserRole>().unwrap_err();
        assert_eq!(err.kind, "user_role");
        assert_eq!(err.to_string(), "invalid user_role value: \"superuser\"");
    }

    #[test]
    fn serde_uses_snake_case_labels() {
        let json = serde_json::to_string(&IncidentStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let parsed: AlertType = serde_json::from_str("\"manual\"").unwrap();
        assert_eq!(parsed, AlertType::Manual);
    }

    #[test]
    fn terminal_incident_statuses() {
        assert!(IncidentStatus::Resolved.is_terminal());
        assert!(IncidentStatus::Closed.is_terminal());
        assert!(!IncidentStatus::Open.is_terminal());
        assert!(!IncidentStatus::InProgress.is_terminal());
    }
}
