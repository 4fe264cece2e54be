//! Common error infrastructure for droid-core.
//!
//! Domain errors (`OracleError`, `PathError`, `RegistryError`, `ShipError`)
//! live next to the code that raises them and implement [`GameError`].
//!
//! Most failures inside a simulation frame are not errors at all: a bot that
//! cannot find a path waits, a bot stuck in a wall is teleported. Bad content
//! (a waypoint without connections, an unknown sensor name) is reported via
//! [`inform_developers`] and replaced by a safe fallback.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the caller can fall back and retry later.
    ///
    /// Examples: no path found, path needs too many points
    Recoverable,

    /// Validation error - invalid input or content, should not retry without changes.
    ///
    /// Examples: unknown droid type, unknown bot id, broken neighbour link
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error - the simulation cannot run.
    ///
    /// Examples: missing required oracle
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all droid-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Reports broken content that the simulation works around.
///
/// `area` names the subsystem (e.g. `"waypoints"`), `detail` what was wrong
/// and which fallback is applied.
pub fn inform_developers(area: &str, detail: &str) {
    tracing::warn!(
        area,
        "{detail}. This is a content or logic error, please inform the developers."
    );
}
