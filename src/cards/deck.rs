//! A trait with randomized and scripted implementations, so the Hand state
//! machine can be driven deterministically for replay.

use super::card::{Card, Rank, Suit};
use crate::error::EngineError;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::VecDeque;

pub trait DeckSource: std::fmt::Debug + Send {
    /// Draw `n` cards in dealing order. Fails if fewer than `n` remain.
    fn draw(&mut self, n: usize) -> Result<Vec<Card>, EngineError>;

    fn draw_one(&mut self) -> Result<Card, EngineError> {
        Ok(self.draw(1)?.remove(0))
    }
}

/// Uniformly shuffled permutation of the 52-card deck, drawn front-to-back.
#[derive(Debug)]
pub struct RandomDeck {
    remaining: Vec<Card>,
}

impl RandomDeck {
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    /// Construct from an explicit seed, for reproducible replay.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut cards: Vec<Card> = (0..13)
            .flat_map(|r| Suit::ALL.iter().map(move |&s| Card::new(Rank::from_index(r), s)))
            .collect();
        // Fisher-Yates.
        use rand::Rng;
        for i in (1..cards.len()).rev() {
            let j = rng.random_range(0..=i);
            cards.swap(i, j);
        }
        RandomDeck { remaining: cards }
    }
}

impl Default for RandomDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckSource for RandomDeck {
    fn draw(&mut self, n: usize) -> Result<Vec<Card>, EngineError> {
        if self.remaining.len() < n {
            return Err(EngineError::Invariant(format!(
                "deck exhausted: requested {n}, {} remain",
                self.remaining.len()
            )));
        }
        Ok(self.remaining.drain(..n).collect())
    }
}

/// Pre-specified finite sequence. `draw` fails if fewer than requested
/// remain; there is no shuffle step.
#[derive(Debug)]
pub struct ScriptedDeck {
    queue: VecDeque<Card>,
}

impl ScriptedDeck {
    pub fn new(cards: Vec<Card>) -> Self {
        ScriptedDeck {
            queue: cards.into(),
        }
    }
}

impl DeckSource for ScriptedDeck {
    fn draw(&mut self, n: usize) -> Result<Vec<Card>, EngineError> {
        if self.queue.len() < n {
            return Err(EngineError::InputValidation(format!(
                "scripted deck exhausted: requested {n}, {} remain",
                self.queue.len()
            )));
        }
        Ok((0..n).map(|_| self.queue.pop_front().unwrap()).collect())
    }
}
