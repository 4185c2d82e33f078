//! Error taxonomy for the hand engine.
//!
//! Five categories, each corresponding to a distinct failure mode of the
//! engine. Categories 1-3 and 5 are fatal to the hand; category 4 (resource
//! failure) is logged and swallowed by the Hand driver.

use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// Malformed script, out-of-range player count, invalid card text.
    InputValidation(String),
    /// Agent returned an action outside ValidActions, or a scripted agent
    /// ran out of actions.
    ProtocolViolation(String),
    /// Attempt to CHECK facing a bet, CALL with nothing to call, etc.
    RuleViolation(String),
    /// Log sink write failure. Non-fatal; the hand continues.
    ResourceFailure(String),
    /// Pot-sum mismatch, negative stack, or other internal bug.
    Invariant(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputValidation(msg) => write!(f, "input validation: {msg}"),
            Self::ProtocolViolation(msg) => write!(f, "protocol violation: {msg}"),
            Self::RuleViolation(msg) => write!(f, "rule violation: {msg}"),
            Self::ResourceFailure(msg) => write!(f, "resource failure: {msg}"),
            Self::Invariant(msg) => write!(f, "invariant violation: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// Category 4 errors never abort the hand; they are logged by the caller.
    pub fn is_resource_failure(&self) -> bool {
        matches!(self, Self::ResourceFailure(_))
    }
}
