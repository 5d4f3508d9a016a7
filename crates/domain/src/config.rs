//! Domain configuration loaded from environment variables.

use std::str::FromStr;

use common::OrderStatus;

/// How strictly `SetStatus` checks order status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Only `Open→Pending`, `Open→Cancelled`, `Pending→Paid` and `Pending→Cancelled`.
    #[default]
    Strict,

    /// Any status may replace any other.
    Permissive,
}

impl StatusPolicy {
    /// Returns true if this policy lets an order move from `from` to `to`.
    ///
    /// Same-status requests are not transitions; callers treat them as no-ops.
    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            StatusPolicy::Strict => from.can_transition_to(to),
            StatusPolicy::Permissive => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusPolicy::Strict => "strict",
            StatusPolicy::Permissive => "permissive",
        }
    }
}

impl std::fmt::Display for StatusPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(StatusPolicy::Strict),
            "permissive" => Ok(StatusPolicy::Permissive),
            other => Err(format!("unknown status policy: {other}")),
        }
    }
}

/// Domain service configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `ORDER_STATUS_POLICY`: `strict` or `permissive` (default: `strict`)
#[derive(Debug, Clone, Default)]
pub struct DomainConfig {
    pub status_policy: StatusPolicy,
}

impl DomainConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let status_policy = match std::env::var("ORDER_STATUS_POLICY") {
            Ok(raw) => Self::parse_policy(&raw),
            Err(_) => StatusPolicy::default(),
        };

        Self { status_policy }
    }

    fn parse_policy(raw: &str) -> StatusPolicy {
        raw.parse().unwrap_or_else(|error| {
            tracing::warn!(%error, "falling back to default status policy");
            StatusPolicy::default()
        })
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }
}
