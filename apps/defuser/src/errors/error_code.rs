//! Error codes exposed to screens.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE.

use core::fmt;

/// Centralized error codes for session actions.
///
/// Screens match on these instead of parsing the human-readable message
/// stored in the session's `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Session preconditions
    /// No round is currently held
    RoundNotInitialized,
    /// No bomb is currently selected
    BombNotInitialized,
    /// No module is currently selected
    ModuleNotInitialized,

    // Local lookups
    /// Round id not present in the session
    RoundNotFound,
    /// Bomb id not present in the held round
    BombNotFound,
    /// Module id or type not present in the bomb
    ModuleNotFound,

    // Arguments
    /// Module count outside the accepted range
    InvalidModuleCount,
    /// Payload does not belong to the module's type
    ModuleTypeMismatch,
    /// Module is solved and its payloads are read-only
    ModuleAlreadySolved,

    // Remote failures
    /// The request never produced an HTTP response
    Transport,
    /// The server answered with a non-success status
    Server,
    /// The response body did not match the expected shape
    Decode,

    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RoundNotInitialized => "ROUND_NOT_INITIALIZED",
            Self::BombNotInitialized => "BOMB_NOT_INITIALIZED",
            Self::ModuleNotInitialized => "MODULE_NOT_INITIALIZED",

            Self::RoundNotFound => "ROUND_NOT_FOUND",
            Self::BombNotFound => "BOMB_NOT_FOUND",
            Self::ModuleNotFound => "MODULE_NOT_FOUND",

            Self::InvalidModuleCount => "INVALID_MODULE_COUNT",
            Self::ModuleTypeMismatch => "MODULE_TYPE_MISMATCH",
            Self::ModuleAlreadySolved => "MODULE_ALREADY_SOLVED",

            Self::Transport => "TRANSPORT",
            Self::Server => "SERVER",
            Self::Decode => "DECODE",

            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(
            ErrorCode::RoundNotInitialized.as_str(),
            "ROUND_NOT_INITIALIZED"
        );
        assert_eq!(ErrorCode::ModuleNotFound.as_str(), "MODULE_NOT_FOUND");
        assert_eq!(
            ErrorCode::ModuleAlreadySolved.as_str(),
            "MODULE_ALREADY_SOLVED"
        );
        assert_eq!(ErrorCode::ConfigError.as_str(), "CONFIG_ERROR");
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(format!("{}", ErrorCode::Transport), "TRANSPORT");
    }
}
