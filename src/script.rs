//! Deterministic replay script loading (§6.1), via `serde_json`.

use crate::cards::{parse_cards, Card};
use crate::error::EngineError;
use crate::money::Cents;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptActionType {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ScriptAction {
    #[serde(rename = "type")]
    pub kind: ScriptActionType,
    pub amount: Option<String>,
}

/// Raw JSON shape. Seat keys in each phase's `actions` map may arrive as
/// string or integer JSON keys; `serde_json` normalizes both into this
/// `BTreeMap<usize, _>` directly since JSON object keys are always strings
/// and `usize` has a `FromStr`-backed `Deserialize` impl.
#[derive(Debug, Clone, serde::Deserialize)]
struct RawPhase {
    #[serde(default)]
    actions: BTreeMap<usize, Vec<ScriptAction>>,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct RawScript {
    small_blind: String,
    big_blind: String,
    start_stacks: Vec<String>,
    dealer_index: usize,
    hole_cards: Vec<[String; 2]>,
    board: [String; 5],
    #[serde(default)]
    preflop: Option<RawPhase>,
    #[serde(default)]
    flop: Option<RawPhase>,
    #[serde(default)]
    turn: Option<RawPhase>,
    #[serde(default)]
    river: Option<RawPhase>,
}

/// A fully parsed, validated replay script.
#[derive(Debug, Clone)]
pub struct Script {
    pub small_blind: Cents,
    pub big_blind: Cents,
    pub start_stacks: Vec<Cents>,
    pub dealer_index: usize,
    pub hole_cards: Vec<[Card; 2]>,
    /// flop1, flop2, flop3, turn, river, in dealing order.
    pub board: [Card; 5],
    pub preflop: BTreeMap<usize, Vec<ScriptAction>>,
    pub flop: BTreeMap<usize, Vec<ScriptAction>>,
    pub turn: BTreeMap<usize, Vec<ScriptAction>>,
    pub river: BTreeMap<usize, Vec<ScriptAction>>,
}

impl Script {
    /// Card sequence a `ScriptedDeck` must replay to reproduce this script's
    /// `hole_cards`/`board` under `hand.rs`'s dealing rotation: first card to
    /// each seat left-of-dealer in turn, then second card in the same
    /// rotation, then flop/turn/river in order.
    pub fn deck_sequence(&self) -> Vec<Card> {
        let n = self.hole_cards.len();
        let rotation: Vec<usize> = (1..=n).map(|offset| (self.dealer_index + offset) % n).collect();
        let mut seq = Vec::with_capacity(n * 2 + 5);
        for &seat in &rotation {
            seq.push(self.hole_cards[seat][0]);
        }
        for &seat in &rotation {
            seq.push(self.hole_cards[seat][1]);
        }
        seq.extend_from_slice(&self.board);
        seq
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Script, EngineError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| EngineError::InputValidation(format!("cannot read script: {e}")))?;
        Script::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Script, EngineError> {
        let raw: RawScript = serde_json::from_str(text)
            .map_err(|e| EngineError::InputValidation(format!("malformed script: {e}")))?;

        if raw.hole_cards.len() != raw.start_stacks.len() {
            return Err(EngineError::InputValidation(
                "hole_cards and start_stacks must have equal length".into(),
            ));
        }

        let small_blind = Cents::parse(&raw.small_blind)?;
        let big_blind = Cents::parse(&raw.big_blind)?;
        let start_stacks = raw
            .start_stacks
            .iter()
            .map(|s| Cents::parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        let hole_cards = raw
            .hole_cards
            .iter()
            .map(|pair| {
                let cards = parse_cards(&format!("{} {}", pair[0], pair[1]))
                    .map_err(EngineError::InputValidation)?;
                if cards.len() != 2 {
                    return Err(EngineError::InputValidation("hole_cards entry must hold 2 cards".into()));
                }
                Ok([cards[0], cards[1]])
            })
            .collect::<Result<Vec<_>, EngineError>>()?;
        let board_cards = parse_cards(&raw.board.join(" ")).map_err(EngineError::InputValidation)?;
        if board_cards.len() != 5 {
            return Err(EngineError::InputValidation("board must list exactly 5 cards".into()));
        }
        let board: [Card; 5] = board_cards.try_into().expect("length checked above");

        Ok(Script {
            small_blind,
            big_blind,
            start_stacks,
            dealer_index: raw.dealer_index,
            hole_cards,
            board,
            preflop: raw.preflop.map(|p| p.actions).unwrap_or_default(),
            flop: raw.flop.map(|p| p.actions).unwrap_or_default(),
            turn: raw.turn.map(|p| p.actions).unwrap_or_default(),
            river: raw.river.map(|p| p.actions).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "small_blind": "0.25",
        "big_blind": "0.50",
        "start_stacks": ["100.00", "100.00"],
        "dealer_index": 0,
        "hole_cards": [["Ah", "Kd"], ["2c", "2d"]],
        "board": ["7h", "8h", "9h", "Tc", "2s"],
        "preflop": { "actions": { "0": [{"type": "raise", "amount": "1.00"}], "1": [{"type": "call"}] } }
    }"#;

    #[test]
    fn parses_a_valid_script() {
        let script = Script::parse(SAMPLE).unwrap();
        assert_eq!(script.small_blind, Cents::new(25));
        assert_eq!(script.big_blind, Cents::new(50));
        assert_eq!(script.start_stacks.len(), 2);
        assert_eq!(script.preflop.get(&0).unwrap().len(), 1);
    }

    #[test]
    fn rejects_mismatched_stack_and_hole_card_lengths() {
        let bad = SAMPLE.replace(r#""start_stacks": ["100.00", "100.00"]"#, r#""start_stacks": ["100.00"]"#);
        assert!(Script::parse(&bad).is_err());
    }

    #[test]
    fn rejects_board_of_wrong_length() {
        let bad = SAMPLE.replace(
            r#""board": ["7h", "8h", "9h", "Tc", "2s"]"#,
            r#""board": ["7h", "8h"]"#,
        );
        assert!(Script::parse(&bad).is_err());
    }

    #[test]
    fn deck_sequence_deals_left_of_dealer_first() {
        let script = Script::parse(SAMPLE).unwrap();
        let seq = script.deck_sequence();
        // dealer_index 0, heads-up: rotation is [1, 0].
        assert_eq!(seq[0], script.hole_cards[1][0]);
        assert_eq!(seq[1], script.hole_cards[0][0]);
        assert_eq!(seq[2], script.hole_cards[1][1]);
        assert_eq!(seq[3], script.hole_cards[0][1]);
        assert_eq!(&seq[4..], &script.board);
    }
}
