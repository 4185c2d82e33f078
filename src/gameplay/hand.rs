//! The orchestrator: owns a Deck and a Pot Manager for a single hand, drives
//! it from DEAL through SHOWDOWN, and emits log records as it goes. Pot
//! bookkeeping is delegated to `PotManager`; decision legality and state
//! transitions are delegated to the Rules Engine. This module only sequences
//! the two and talks to agents and the log sink.

use super::action::ActionKind;
use super::agent::Agent;
use super::observation::build_observation;
use super::payout::resolve_payouts;
use super::phase::Phase;
use super::position::{assign_positions, betting_order, Position};
use super::pot::PotManager;
use super::rules::{self, RaiseStyle};
use super::seat::{Player, Seat};
use super::state::GameState;
use crate::cards::{evaluate, Card, DeckSource, Hole, Strength};
use crate::error::EngineError;
use crate::action_log::{LogAction, LogRecord, LogRecordBuilder, LogSink};
use crate::money::Cents;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Final accounting for one completed hand: ending stacks by seat index,
/// the total pot contested, and the per-seat award breakdown. Mirrors the
/// `(final_stacks_cents, total_pot_cents, recorded_events)` shape of the
/// create-hand-and-run flow; the event stream itself lives in the caller's
/// `LogSink`.
#[derive(Debug, Clone)]
pub struct HandResult {
    pub final_stacks: BTreeMap<usize, Cents>,
    pub total_pot: Cents,
    pub payouts: BTreeMap<usize, Cents>,
}

/// Owns everything scoped to one hand: the deck, the pot ledger, and the log
/// sink it writes through. Destroyed once `run_one_hand` returns.
pub struct Hand<'a> {
    session_id: Uuid,
    hand_id: Uuid,
    deck: Box<dyn DeckSource>,
    pots: PotManager,
    sink: &'a mut dyn LogSink,
    small_blind: Cents,
    big_blind: Cents,
    raise_style: RaiseStyle,
    dealer_seat: usize,
    step: u32,
}

/// A copy of `state` with every hole card but `hero`'s stripped, handed to
/// the Observation Builder and to the acting agent so neither can see an
/// opponent's cards, regardless of what `state` itself carries.
fn hero_view(state: &GameState, hero: usize) -> GameState {
    let mut view = state.clone();
    for p in view.players.iter_mut() {
        if p.seat_index != hero {
            p.hole = None;
        }
    }
    view
}

impl<'a> Hand<'a> {
    pub fn new(
        session_id: Uuid,
        deck: Box<dyn DeckSource>,
        sink: &'a mut dyn LogSink,
        small_blind: Cents,
        big_blind: Cents,
        raise_style: RaiseStyle,
        dealer_seat: usize,
    ) -> Hand<'a> {
        Hand {
            session_id,
            hand_id: Uuid::now_v7(),
            deck,
            pots: PotManager::new(),
            sink,
            small_blind,
            big_blind,
            raise_style,
            dealer_seat,
            step: 0,
        }
    }

    fn next_step(&mut self) -> u32 {
        self.step += 1;
        self.step
    }

    fn emit(&mut self, record: LogRecord) {
        if let Err(e) = self.sink.write(&record) {
            log::warn!("log sink write failed: {e}");
        }
    }

    fn builder(&self) -> LogRecordBuilder {
        LogRecordBuilder::new(self.session_id, self.hand_id)
    }

    /// Run a complete hand from blinds to settled stacks, driving `agents`
    /// (indexed by seat index) via the Observation/Agent contract.
    pub fn run_one_hand(
        mut self,
        seats: Vec<Seat>,
        agents: &mut BTreeMap<usize, Box<dyn Agent>>,
    ) -> Result<HandResult, EngineError> {
        let n = seats.len();
        if !(2..=10).contains(&n) {
            return Err(EngineError::InputValidation(format!(
                "player count must be 2-10, got {n}"
            )));
        }

        let positions = assign_positions(n, self.dealer_seat)?;
        let mut players: Vec<Player> = seats.iter().map(Player::new).collect();

        self.post_blinds(&mut players, &positions)?;
        self.deal_hole_cards(&mut players, &positions)?;

        let mut state = GameState {
            hand_id: self.hand_id,
            phase: Phase::Preflop,
            players: players.clone(),
            board: Vec::new(),
            pots: Vec::new(),
            dealer_seat: self.dealer_seat,
            highest_bet: self.big_blind,
            last_raise_increment: self.big_blind,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            to_act: None,
            last_aggressor: players
                .iter()
                .find(|p| positions[p.seat_index] == Position::Bb)
                .map(|p| p.seat_index),
            raises_this_street: 0,
        };
        let step = self.next_step();
        let record = self
            .builder()
            .record(step, Phase::Preflop, None, None, LogAction::PhaseAdvance, None);
        self.emit(record);

        loop {
            state.players = players.clone();
            self.run_betting_round(&mut state, &mut players, &positions, agents)?;
            state.players = players.clone();

            if state.players_remaining() <= 1 {
                return self.settle_uncontested(&mut players, &positions);
            }

            if state.phase == Phase::River {
                return self.settle_showdown(&state, &mut players, &positions);
            }

            self.deal_community(&mut state)?;
            state.phase = state.phase.next();
            state.highest_bet = Cents::ZERO;
            state.last_raise_increment = self.big_blind;
            state.last_aggressor = None;
            state.raises_this_street = 0;
            for p in players.iter_mut() {
                p.start_new_round();
            }
            let step = self.next_step();
            let record = self
                .builder()
                .record(step, state.phase, None, None, LogAction::PhaseAdvance, None);
            self.emit(record);
        }
    }

    fn post_blinds(&mut self, players: &mut [Player], positions: &[Position]) -> Result<(), EngineError> {
        let sb_seat = players
            .iter()
            .position(|p| positions[p.seat_index] == Position::Sb)
            .ok_or_else(|| EngineError::Invariant("no small blind seat assigned".into()))?;
        let bb_seat = players
            .iter()
            .position(|p| positions[p.seat_index] == Position::Bb)
            .ok_or_else(|| EngineError::Invariant("no big blind seat assigned".into()))?;

        let sb_amount = self.small_blind.min(players[sb_seat].stack);
        players[sb_seat].contribute(sb_amount);
        self.pots.post(players[sb_seat].seat_index, sb_amount);
        let step = self.next_step();
        let record = self
            .builder()
            .record(
                step,
                Phase::Deal,
                Some(Position::Sb),
                Some(players[sb_seat].seat_index),
                LogAction::PostSmallBlind,
                Some(sb_amount),
            )
            .with_betting_context(Cents::ZERO, 0.0, sb_amount);
        self.emit(record);

        let bb_amount = self.big_blind.min(players[bb_seat].stack);
        players[bb_seat].contribute(bb_amount);
        self.pots.post(players[bb_seat].seat_index, bb_amount);
        let step = self.next_step();
        let record = self
            .builder()
            .record(
                step,
                Phase::Deal,
                Some(Position::Bb),
                Some(players[bb_seat].seat_index),
                LogAction::PostBigBlind,
                Some(bb_amount),
            )
            .with_betting_context(Cents::ZERO, 0.0, bb_amount);
        self.emit(record);
        Ok(())
    }

    /// Two passes, one card per active seat per pass, starting left of the
    /// dealer — the order a scripted deck must match exactly (§6.3).
    fn deal_hole_cards(&mut self, players: &mut [Player], positions: &[Position]) -> Result<(), EngineError> {
        let order = self.seat_rotation_from_dealer(players.len());
        let mut first_card: BTreeMap<usize, Card> = BTreeMap::new();
        for &seat_index in &order {
            first_card.insert(seat_index, self.deck.draw_one()?);
        }
        let mut holes: BTreeMap<usize, Hole> = BTreeMap::new();
        for &seat_index in &order {
            let second = self.deck.draw_one()?;
            let hole = Hole::new(first_card[&seat_index], second);
            let player = players
                .iter_mut()
                .find(|p| p.seat_index == seat_index)
                .expect("seat exists");
            player.hole = Some(hole);
            holes.insert(seat_index, hole);
        }
        for &seat_index in &order {
            let step = self.next_step();
            let record = self
                .builder()
                .record(
                    step,
                    Phase::Deal,
                    Some(positions[seat_index]),
                    Some(seat_index),
                    LogAction::DealHole,
                    None,
                )
                .with_hole_cards(&holes[&seat_index].cards());
            self.emit(record);
        }
        Ok(())
    }

    fn seat_rotation_from_dealer(&self, n: usize) -> Vec<usize> {
        (1..=n).map(|offset| (self.dealer_seat + offset) % n).collect()
    }

    fn deal_community(&mut self, state: &mut GameState) -> Result<(), EngineError> {
        let count = state.phase.next().cards_dealt();
        if count == 0 {
            return Ok(());
        }
        let cards = self.deck.draw(count)?;
        state.board.extend(cards.iter().copied());
        let step = self.next_step();
        let record = self
            .builder()
            .record(step, state.phase.next(), None, None, LogAction::DealCommunity, None)
            .with_community_cards(&state.board);
        self.emit(record);
        Ok(())
    }

    /// Build the acting queue per §4.7 step 5, pop a seat, fetch its
    /// decision, validate and apply it, and rebuild the queue on a full
    /// raise. Exits once the queue drains and the round is settled.
    fn run_betting_round(
        &mut self,
        state: &mut GameState,
        players: &mut Vec<Player>,
        positions: &[Position],
        agents: &mut BTreeMap<usize, Box<dyn Agent>>,
    ) -> Result<(), EngineError> {
        let is_preflop = state.phase == Phase::Preflop;
        let mut queue = self.build_queue(state, positions, is_preflop, None)?;

        while !queue.is_empty() {
            if rules::should_advance_phase(state) {
                break;
            }
            let seat_index = queue.remove(0);
            let active = state.player_at(seat_index).map(|p| p.is_active()).unwrap_or(false);
            if !active {
                continue;
            }

            let valid = rules::valid_actions(state, seat_index, self.raise_style)?;
            let view = hero_view(state, seat_index);
            let observation = build_observation(&view, seat_index)?;
            let agent = agents
                .get_mut(&seat_index)
                .ok_or_else(|| EngineError::InputValidation(format!("no agent for seat {seat_index}")))?;
            let decision = agent.decide(&observation, &valid, &view)?;
            if !valid.permits(&decision.action) {
                return Err(EngineError::ProtocolViolation(format!(
                    "seat {seat_index} chose {} outside ValidActions",
                    decision.action
                )));
            }

            let call_amount = valid.call_amount;
            let (next_state, applied) =
                rules::apply_action(state, seat_index, decision.action, self.raise_style)?;
            *state = next_state;
            for p in &state.players {
                if let Some(slot) = players.iter_mut().find(|q| q.seat_index == p.seat_index) {
                    *slot = p.clone();
                }
            }

            if applied.kind == ActionKind::Fold {
                self.pots.mark_folded(seat_index);
            } else if applied.chips_moved.0 > 0 {
                self.pots.post(seat_index, applied.chips_moved);
            }

            self.log_decision(state, positions, seat_index, applied.kind, applied.amount, call_amount);

            if matches!(applied.kind, ActionKind::Bet | ActionKind::Raise) && applied.is_full_raise {
                queue = self.build_queue(state, positions, is_preflop, Some(seat_index))?;
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn log_decision(
        &mut self,
        state: &GameState,
        positions: &[Position],
        seat_index: usize,
        kind: ActionKind,
        amount: Cents,
        call_amount: Cents,
    ) {
        let action = match kind {
            ActionKind::Fold => LogAction::Fold,
            ActionKind::Check => LogAction::Check,
            ActionKind::Call => LogAction::Call,
            ActionKind::Bet => LogAction::Bet,
            ActionKind::Raise => LogAction::Raise,
            _ => return,
        };
        let pot = state.current_pot();
        let pot_odds = if call_amount.is_zero() {
            0.0
        } else {
            call_amount.0 as f32 / (pot.0 + call_amount.0) as f32
        };
        let step = self.next_step();
        let record = self
            .builder()
            .record(
                step,
                state.phase,
                Some(positions[seat_index]),
                Some(seat_index),
                action,
                if amount.is_zero() { None } else { Some(amount) },
            )
            .with_betting_context(call_amount, pot_odds, state.highest_bet);
        self.emit(record);
    }

    /// First-to-act-to-last-to-act seat queue filtered to actionable seats.
    /// When `reopened_by` is `Some`, the queue instead begins immediately
    /// left of the raiser and excludes the raiser itself (§4.7 step 5's
    /// "rebuild on a full raise").
    fn build_queue(
        &self,
        state: &GameState,
        positions: &[Position],
        is_preflop: bool,
        reopened_by: Option<usize>,
    ) -> Result<Vec<usize>, EngineError> {
        let n = state.players.len();
        let order = betting_order(n, is_preflop)?;
        let mut seat_order: Vec<usize> = order
            .iter()
            .filter_map(|&pos| (0..n).find(|&seat| positions[seat] == pos))
            .collect();

        if let Some(raiser) = reopened_by {
            let start = seat_order.iter().position(|&s| s == raiser).unwrap_or(0);
            seat_order.rotate_left((start + 1) % seat_order.len());
            seat_order.retain(|&s| s != raiser);
        }

        Ok(seat_order
            .into_iter()
            .filter(|&seat| {
                state
                    .player_at(seat)
                    .map(|p| p.is_active() && (p.round_contrib < state.highest_bet || !p.acted_this_round))
                    .unwrap_or(false)
            })
            .collect())
    }

    /// §4.7 step 6: a single contender remains. Refund the last aggressor's
    /// uncalled overage above the next-highest contributor before the
    /// award, then transition to SHOWDOWN with that seat as sole winner.
    fn settle_uncontested(
        &mut self,
        players: &mut [Player],
        positions: &[Position],
    ) -> Result<HandResult, EngineError> {
        self.refund_uncalled_overage(players);
        let pots = self.pots.build_pots();
        let winner = players
            .iter()
            .find(|p| !p.has_folded)
            .ok_or_else(|| EngineError::Invariant("no uncontested winner present".into()))?
            .seat_index;
        let total: Cents = pots.iter().map(|p| p.amount).sum();
        players
            .iter_mut()
            .find(|p| p.seat_index == winner)
            .expect("winner seat exists")
            .stack += total;
        let step = self.next_step();
        let record = self.builder().record(
            step,
            Phase::Showdown,
            Some(positions[winner]),
            Some(winner),
            LogAction::WinPot,
            Some(total),
        );
        self.emit(record);

        let mut payouts = BTreeMap::new();
        payouts.insert(winner, total);
        Ok(HandResult {
            final_stacks: players.iter().map(|p| (p.seat_index, p.stack)).collect(),
            total_pot: total,
            payouts,
        })
    }

    /// §4.7 step 8: evaluate every remaining contender, build pots, resolve
    /// payouts, credit stacks.
    fn settle_showdown(
        &mut self,
        state: &GameState,
        players: &mut [Player],
        positions: &[Position],
    ) -> Result<HandResult, EngineError> {
        let pots = self.pots.build_pots();

        let mut ranks: BTreeMap<usize, Strength> = BTreeMap::new();
        for p in players.iter().filter(|p| !p.has_folded) {
            if let Some(hole) = p.hole {
                let combined: Vec<_> = hole.cards().into_iter().chain(state.board.iter().copied()).collect();
                ranks.insert(p.seat_index, evaluate(&combined));
            }
        }

        let seat_order = self.seat_rotation_from_dealer(players.len());
        let payouts = resolve_payouts(&pots, &ranks, &seat_order);

        for (&seat, &amount) in &payouts {
            if let Some(p) = players.iter_mut().find(|p| p.seat_index == seat) {
                p.stack += amount;
            }
            let step = self.next_step();
            let mut record = self.builder().record(
                step,
                Phase::Showdown,
                Some(positions[seat]),
                Some(seat),
                LogAction::WinPot,
                Some(amount),
            );
            if let Some(strength) = ranks.get(&seat) {
                let rank5 = strength
                    .kickers
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join("");
                record = record.with_hand_rank(rank5, strength.category.to_string());
            }
            self.emit(record);
        }

        let total_pot: Cents = pots.iter().map(|p| p.amount).sum();
        Ok(HandResult {
            final_stacks: players.iter().map(|p| (p.seat_index, p.stack)).collect(),
            total_pot,
            payouts,
        })
    }

    /// Moves the last aggressor's uncalled excess back onto their stack and
    /// out of the pot ledger, so an uncontested award never pays a bettor
    /// back with a "pot win" of their own un-called chips.
    fn refund_uncalled_overage(&mut self, players: &mut [Player]) {
        let mut contribs: Vec<(usize, Cents)> = players.iter().map(|p| (p.seat_index, p.hand_contrib)).collect();
        contribs.sort_by_key(|&(_, c)| std::cmp::Reverse(c));
        if contribs.len() < 2 {
            return;
        }
        let (top_seat, top_amount) = contribs[0];
        let next_amount = contribs[1].1;
        if top_amount > next_amount {
            let overage = Cents::new(top_amount.0 - next_amount.0);
            if let Some(p) = players.iter_mut().find(|p| p.seat_index == top_seat) {
                p.stack += overage;
                p.hand_contrib -= overage;
            }
            self.pots.refund(top_seat, overage);
        }
    }
}
