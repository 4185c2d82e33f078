//! The uniform decision-making surface every driver of the engine goes
//! through: scripted replay, interactive prompting, rule-based baselines,
//! and learning agents all implement this one trait. The engine never
//! inspects an agent beyond `decide`/`reset`.

use super::action::{Action, ValidActions};
use super::observation::Observation;
use super::state::GameState;
use crate::error::EngineError;
use std::fmt::Debug;

/// An agent's choice: the action it commits to, plus an optional
/// confidence in `[0, 1]`. Cancellation is expressed by choosing
/// `Action::Fold`; the engine imposes no timeout of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub confidence: Option<f32>,
}

impl Decision {
    pub fn new(action: Action) -> Decision {
        Decision {
            action,
            confidence: None,
        }
    }

    pub fn with_confidence(action: Action, confidence: f32) -> Decision {
        Decision {
            action,
            confidence: Some(confidence.clamp(0.0, 1.0)),
        }
    }
}

/// A single capability shared by every decision-making surface. `context`
/// carries the raw `GameState` for agents that need more than the
/// leakage-safe `Observation` (e.g. a rule-based agent estimating equity
/// against live opponent stack sizes); scripted and human agents ignore it.
///
/// Returns `Err` only to signal a protocol violation the agent itself
/// detects (a scripted agent with no actions left for this phase); the
/// engine does not retry, it fails the hand per the error taxonomy.
pub trait Agent: Debug + Send {
    fn decide(
        &mut self,
        obs: &Observation,
        valid: &ValidActions,
        context: &GameState,
    ) -> Result<Decision, EngineError>;

    /// Reset any per-hand state (e.g. a scripted agent's cursor) between
    /// hands. Default is a no-op for stateless agents.
    fn reset(&mut self) {}
}
