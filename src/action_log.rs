//! Append-only action log: the structural contract of §4.10. No database
//! schema here (explicitly out of scope) — a `LogSink` trait with an
//! in-memory and a JSONL-file implementation stand in for the persistent
//! sink a host would wire up.

use crate::cards::Card;
use crate::error::EngineError;
use crate::gameplay::phase::Phase;
use crate::gameplay::position::Position;
use crate::money::Cents;
use std::io::Write;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogAction {
    PostSmallBlind,
    PostBigBlind,
    DealHole,
    DealCommunity,
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    PhaseAdvance,
    WinPot,
}

impl std::fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogAction::PostSmallBlind => "POST_SB",
            LogAction::PostBigBlind => "POST_BB",
            LogAction::DealHole => "DEAL_HOLE",
            LogAction::DealCommunity => "DEAL_COMMUNITY",
            LogAction::Fold => "FOLD",
            LogAction::Check => "CHECK",
            LogAction::Call => "CALL",
            LogAction::Bet => "BET",
            LogAction::Raise => "RAISE",
            LogAction::PhaseAdvance => "PHASE_ADVANCE",
            LogAction::WinPot => "WIN_POT",
        };
        write!(f, "{s}")
    }
}

/// One record per §4.10/§6.4. Fields not applicable to a given record kind
/// are `None`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LogRecord {
    pub session_id: Uuid,
    pub hand_id: Uuid,
    pub step_number: u32,
    pub phase: Phase_,
    pub position: Option<Position_>,
    pub seat_index: Option<usize>,
    pub action: LogAction_,
    pub amount_cents: Option<i64>,
    pub hole_cards: Option<String>,
    pub community_cards: Option<String>,
    pub rank5: Option<String>,
    pub hand_class: Option<String>,
    pub amount_to_call: Option<i64>,
    pub pot_odds: Option<f32>,
    pub highest_bet: Option<i64>,
    pub detail: Option<String>,
}

// `Phase`/`Position`/`LogAction` already implement `Display`; mirror that
// into `serde::Serialize` via a thin wrapper rather than deriving Serialize
// directly on the gameplay enums (keeping serde out of the pure rules path).
#[derive(Debug, Clone, Copy)]
pub struct Phase_(pub Phase);
#[derive(Debug, Clone, Copy)]
pub struct Position_(pub Position);
#[derive(Debug, Clone, Copy)]
pub struct LogAction_(pub LogAction);

impl serde::Serialize for Phase_ {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0.to_string())
    }
}
impl serde::Serialize for Position_ {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0.to_string())
    }
}
impl serde::Serialize for LogAction_ {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0.to_string())
    }
}

pub struct LogRecordBuilder {
    session_id: Uuid,
    hand_id: Uuid,
}

impl LogRecordBuilder {
    pub fn new(session_id: Uuid, hand_id: Uuid) -> LogRecordBuilder {
        LogRecordBuilder { session_id, hand_id }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        step_number: u32,
        phase: Phase,
        position: Option<Position>,
        seat_index: Option<usize>,
        action: LogAction,
        amount_cents: Option<Cents>,
    ) -> LogRecord {
        LogRecord {
            session_id: self.session_id,
            hand_id: self.hand_id,
            step_number,
            phase: Phase_(phase),
            position: position.map(Position_),
            seat_index,
            action: LogAction_(action),
            amount_cents: amount_cents.map(|c| c.0),
            hole_cards: None,
            community_cards: None,
            rank5: None,
            hand_class: None,
            amount_to_call: None,
            pot_odds: None,
            highest_bet: None,
            detail: None,
        }
    }
}

impl LogRecord {
    pub fn with_hole_cards(mut self, cards: &[Card]) -> LogRecord {
        self.hole_cards = Some(cards.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(","));
        self
    }

    pub fn with_community_cards(mut self, cards: &[Card]) -> LogRecord {
        self.community_cards = Some(cards.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(","));
        self
    }

    pub fn with_betting_context(mut self, amount_to_call: Cents, pot_odds: f32, highest_bet: Cents) -> LogRecord {
        self.amount_to_call = Some(amount_to_call.0);
        self.pot_odds = Some(pot_odds);
        self.highest_bet = Some(highest_bet.0);
        self
    }

    pub fn with_hand_rank(mut self, rank5: impl Into<String>, hand_class: impl Into<String>) -> LogRecord {
        self.rank5 = Some(rank5.into());
        self.hand_class = Some(hand_class.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> LogRecord {
        self.detail = Some(detail.into());
        self
    }
}

/// Append-only writer. Resource failures (category 4 of §7) are logged and
/// swallowed by the Hand driver; they never abort the hand.
pub trait LogSink: std::fmt::Debug {
    fn write(&mut self, record: &LogRecord) -> Result<(), EngineError>;

    fn flush(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Keeps every record in memory, for tests and short-lived replay runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<LogRecord>,
}

impl MemorySink {
    pub fn new() -> MemorySink {
        MemorySink::default()
    }
}

impl LogSink for MemorySink {
    fn write(&mut self, record: &LogRecord) -> Result<(), EngineError> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// One JSON object per line, grounded in the corpus's preference for a
/// durable file sink over ad hoc stdout prints.
#[derive(Debug)]
pub struct JsonlFileSink {
    file: std::fs::File,
}

impl JsonlFileSink {
    pub fn create(path: impl AsRef<std::path::Path>) -> Result<JsonlFileSink, EngineError> {
        let file = std::fs::File::create(path)
            .map_err(|e| EngineError::ResourceFailure(format!("cannot create log file: {e}")))?;
        Ok(JsonlFileSink { file })
    }
}

impl LogSink for JsonlFileSink {
    fn write(&mut self, record: &LogRecord) -> Result<(), EngineError> {
        let line = serde_json::to_string(record)
            .map_err(|e| EngineError::ResourceFailure(format!("cannot serialize log record: {e}")))?;
        writeln!(self.file, "{line}").map_err(|e| EngineError::ResourceFailure(format!("cannot write log record: {e}")))
    }

    fn flush(&mut self) -> Result<(), EngineError> {
        self.file
            .flush()
            .map_err(|e| EngineError::ResourceFailure(format!("cannot flush log file: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_accumulates_records_in_order() {
        let mut sink = MemorySink::new();
        let builder = LogRecordBuilder::new(Uuid::now_v7(), Uuid::now_v7());
        sink.write(&builder.record(1, Phase::Deal, None, None, LogAction::PostSmallBlind, Some(Cents::new(50))))
            .unwrap();
        sink.write(&builder.record(2, Phase::Deal, None, None, LogAction::PostBigBlind, Some(Cents::new(100))))
            .unwrap();
        assert_eq!(sink.records.len(), 2);
        assert_eq!(sink.records[0].step_number, 1);
        assert_eq!(sink.records[1].step_number, 2);
    }
}
