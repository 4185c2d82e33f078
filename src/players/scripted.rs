//! Deterministic replay: each seat's action queue is fixed by a loaded
//! `Script`; exhaustion is a protocol violation, not a fallback.

use crate::error::EngineError;
use crate::gameplay::action::{Action, ValidActions};
use crate::gameplay::agent::{Agent, Decision};
use crate::gameplay::observation::Observation;
use crate::gameplay::phase::Phase;
use crate::gameplay::state::GameState;
use crate::money::Cents;
use crate::script::{Script, ScriptAction, ScriptActionType};
use std::collections::{BTreeMap, VecDeque};

/// One seat's pre-recorded action sequence, split by phase per §6.1's
/// per-phase action sections. `bet` and `raise` both parse to `Action::Bet`
/// / `Action::Raise` depending on whether anything has been wagered yet
/// when the action is consumed, mirroring the rules engine's own split.
#[derive(Debug, Clone)]
pub struct ScriptedAgent {
    seat_index: usize,
    queues: BTreeMap<Phase, VecDeque<ScriptAction>>,
    cursors: BTreeMap<Phase, VecDeque<ScriptAction>>,
}

impl ScriptedAgent {
    pub fn new(seat_index: usize, script: &Script) -> ScriptedAgent {
        let mut queues = BTreeMap::new();
        queues.insert(Phase::Preflop, queue_for(&script.preflop, seat_index));
        queues.insert(Phase::Flop, queue_for(&script.flop, seat_index));
        queues.insert(Phase::Turn, queue_for(&script.turn, seat_index));
        queues.insert(Phase::River, queue_for(&script.river, seat_index));
        let cursors = queues.clone();
        ScriptedAgent {
            seat_index,
            queues,
            cursors,
        }
    }
}

fn queue_for(phase_actions: &BTreeMap<usize, Vec<ScriptAction>>, seat_index: usize) -> VecDeque<ScriptAction> {
    phase_actions.get(&seat_index).cloned().unwrap_or_default().into()
}

impl Agent for ScriptedAgent {
    fn decide(&mut self, _obs: &Observation, valid: &ValidActions, context: &GameState) -> Result<Decision, EngineError> {
        let queue = self.queues.get_mut(&context.phase).ok_or_else(|| {
            EngineError::ProtocolViolation(format!(
                "seat {} has no script entries for phase {}",
                self.seat_index, context.phase
            ))
        })?;
        let next = queue.pop_front().ok_or_else(|| {
            EngineError::ProtocolViolation(format!(
                "seat {} ran out of scripted actions on {}",
                self.seat_index, context.phase
            ))
        })?;
        let action = match next.kind {
            ScriptActionType::Fold => Action::Fold,
            ScriptActionType::Check => Action::Check,
            ScriptActionType::Call => Action::Call,
            ScriptActionType::Bet | ScriptActionType::Raise => {
                let amount = next
                    .amount
                    .as_deref()
                    .map(Cents::parse)
                    .transpose()?
                    .ok_or_else(|| {
                        EngineError::InputValidation(format!(
                            "seat {} scripted bet/raise missing amount",
                            self.seat_index
                        ))
                    })?;
                if valid.can_bet {
                    Action::Bet(amount)
                } else {
                    Action::Raise(amount)
                }
            }
        };
        Ok(Decision::new(action))
    }

    fn reset(&mut self) {
        self.queues = self.cursors.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::pot::Pot;
    use crate::gameplay::seat::{Player, Seat};
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn state_at(phase: Phase) -> GameState {
        let seat = Seat::new(0, Cents::new(10000));
        GameState {
            hand_id: Uuid::now_v7(),
            phase,
            players: vec![Player::new(&seat)],
            board: vec![],
            pots: vec![Pot {
                amount: Cents::new(0),
                eligible: BTreeSet::new(),
            }],
            dealer_seat: 0,
            highest_bet: Cents::new(0),
            last_raise_increment: Cents::new(200),
            small_blind: Cents::new(100),
            big_blind: Cents::new(200),
            to_act: None,
            last_aggressor: None,
            raises_this_street: 0,
        }
    }

    fn blank_observation() -> Observation {
        Observation {
            street_one_hot: [0.0; 5],
            players_remaining: 1.0,
            hero_position_one_hot: [0.0; 10],
            pot_in_bb: 0.0,
            amount_to_call_in_bb: 0.0,
            pot_odds: 0.0,
            bet_to_call_ratio: 0.0,
            hero_stack_in_bb: 50.0,
            effective_stack_in_bb: 50.0,
            spr: 0.0,
            is_pair: 0.0,
            is_suited: 0.0,
            gap: 0.0,
            high_rank: 2.0,
            low_rank: 2.0,
            chen_score: 0.0,
            hand_class_tag: 0.0,
            hand_strength_percentile: 0.0,
            raises_this_street: 0.0,
            last_raise_increment_in_bb: 1.0,
            is_aggressor: 0.0,
            has_position: 0.0,
            board_paired: 0.0,
            board_monotone: 0.0,
            board_two_tone: 0.0,
            straighty_index: 0.0,
            top_board_rank: 2.0,
            board_coordination: 0.0,
            players_acted_this_street: 0.0,
            street_number: 1.0,
            is_all_in: 0.0,
            stack_depth_category: 0.0,
        }
    }

    fn permissive_valid() -> ValidActions {
        ValidActions {
            can_fold: true,
            can_check: true,
            can_call: true,
            call_amount: Cents::ZERO,
            can_bet: false,
            can_raise: true,
            raise_amounts: vec![Cents::new(400)],
        }
    }

    #[test]
    fn replays_scripted_actions_in_order() {
        let mut preflop = BTreeMap::new();
        preflop.insert(
            0,
            vec![
                ScriptAction {
                    kind: ScriptActionType::Raise,
                    amount: Some("4.00".into()),
                },
                ScriptAction {
                    kind: ScriptActionType::Fold,
                    amount: None,
                },
            ],
        );
        let script = Script {
            small_blind: Cents::new(100),
            big_blind: Cents::new(200),
            start_stacks: vec![Cents::new(10000)],
            dealer_index: 0,
            hole_cards: vec![],
            board: [
                crate::cards::Card::try_from("2c").unwrap(),
                crate::cards::Card::try_from("3c").unwrap(),
                crate::cards::Card::try_from("4c").unwrap(),
                crate::cards::Card::try_from("5c").unwrap(),
                crate::cards::Card::try_from("6c").unwrap(),
            ],
            preflop,
            flop: BTreeMap::new(),
            turn: BTreeMap::new(),
            river: BTreeMap::new(),
        };
        let mut agent = ScriptedAgent::new(0, &script);
        let state = state_at(Phase::Preflop);
        let valid = permissive_valid();
        let first = agent.decide(&blank_observation(), &valid, &state).unwrap();
        assert_eq!(first.action, Action::Raise(Cents::new(400)));
        let second = agent.decide(&blank_observation(), &valid, &state).unwrap();
        assert_eq!(second.action, Action::Fold);
    }

    #[test]
    fn exhaustion_is_a_protocol_violation() {
        let script = Script {
            small_blind: Cents::new(100),
            big_blind: Cents::new(200),
            start_stacks: vec![Cents::new(10000)],
            dealer_index: 0,
            hole_cards: vec![],
            board: [
                crate::cards::Card::try_from("2c").unwrap(),
                crate::cards::Card::try_from("3c").unwrap(),
                crate::cards::Card::try_from("4c").unwrap(),
                crate::cards::Card::try_from("5c").unwrap(),
                crate::cards::Card::try_from("6c").unwrap(),
            ],
            preflop: BTreeMap::new(),
            flop: BTreeMap::new(),
            turn: BTreeMap::new(),
            river: BTreeMap::new(),
        };
        let mut agent = ScriptedAgent::new(0, &script);
        let state = state_at(Phase::Preflop);
        let valid = permissive_valid();
        let result = agent.decide(&blank_observation(), &valid, &state);
        assert!(matches!(result, Err(EngineError::ProtocolViolation(_))));
    }
}
