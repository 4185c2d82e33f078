//! `holdem`: play a hand against rule-based or human opponents, replay a
//! scripted hand, or deal a quick hole-card/board preview. Grounded in the
//! create-hand-from-script-and-run flow of the Python harness this engine
//! was distilled from, and in the corpus's `clap`-derive CLI conventions.

use clap::{Parser, Subcommand};
use colored::Colorize;
use holdem_engine::action_log::{JsonlFileSink, LogSink, MemorySink};
use holdem_engine::cards::{DeckSource, RandomDeck, ScriptedDeck};
use holdem_engine::gameplay::{Agent, Hand, RaiseStyle, Seat};
use holdem_engine::money::Cents;
use holdem_engine::players::{HumanAgent, RuleBasedAgent, ScriptedAgent};
use holdem_engine::script::Script;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "holdem", about = "No-Limit Hold'em hand-lifecycle engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play one hand against rule-based opponents (or a human, with --human).
    Play {
        #[arg(long, default_value_t = 6)]
        players: usize,
        #[arg(long, default_value = "1.00")]
        small_blind: String,
        #[arg(long, default_value = "2.00")]
        big_blind: String,
        #[arg(long, default_value = "200.00")]
        stack: String,
        #[arg(long, default_value_t = 0)]
        dealer: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Seat index to control interactively; every other seat is rule-based.
        #[arg(long)]
        human: Option<usize>,
        #[arg(long)]
        log: Option<String>,
    },
    /// Replay a deterministic script file end to end.
    Script {
        path: String,
        #[arg(long)]
        log: Option<String>,
    },
    /// Deal hole cards and a board with no betting, for a quick preview.
    Deal {
        #[arg(long, default_value_t = 6)]
        players: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    holdem_engine::init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Play {
            players,
            small_blind,
            big_blind,
            stack,
            dealer,
            seed,
            human,
            log,
        } => run_play(players, &small_blind, &big_blind, &stack, dealer, seed, human, log.as_deref()),
        Command::Script { path, log } => run_script(&path, log.as_deref()),
        Command::Deal { players, seed } => run_deal(players, seed),
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_play(
    players: usize,
    small_blind: &str,
    big_blind: &str,
    stack: &str,
    dealer: usize,
    seed: Option<u64>,
    human: Option<usize>,
    log_path: Option<&str>,
) -> anyhow::Result<()> {
    let small_blind = Cents::parse(small_blind)?;
    let big_blind = Cents::parse(big_blind)?;
    let stack = Cents::parse(stack)?;

    let seats: Vec<Seat> = (0..players).map(|i| Seat::new(i, stack)).collect();
    let mut agents: BTreeMap<usize, Box<dyn Agent>> = BTreeMap::new();
    for i in 0..players {
        let agent: Box<dyn Agent> = if Some(i) == human {
            Box::new(HumanAgent::new(i))
        } else {
            Box::new(RuleBasedAgent::new(i, seed.unwrap_or(0).wrapping_add(i as u64)))
        };
        agents.insert(i, agent);
    }

    let deck: Box<dyn DeckSource> = Box::new(RandomDeck::seeded(seed.unwrap_or_else(rand::random)));
    let mut memory = MemorySink::new();
    let result = {
        let hand = Hand::new(Uuid::now_v7(), deck, &mut memory, small_blind, big_blind, RaiseStyle::DiscreteButtons, dealer);
        hand.run_one_hand(seats, &mut agents)?
    };

    flush_log(log_path, &memory)?;
    print_result(result.final_stacks.iter().map(|(k, v)| (*k, *v)), result.total_pot);
    Ok(())
}

fn run_script(path: &str, log_path: Option<&str>) -> anyhow::Result<()> {
    let script = Script::load(path)?;
    let seats: Vec<Seat> = script
        .start_stacks
        .iter()
        .enumerate()
        .map(|(i, &stack)| Seat::new(i, stack))
        .collect();

    let mut agents: BTreeMap<usize, Box<dyn Agent>> = BTreeMap::new();
    for i in 0..seats.len() {
        agents.insert(i, Box::new(ScriptedAgent::new(i, &script)));
    }

    let deck: Box<dyn DeckSource> = Box::new(ScriptedDeck::new(script.deck_sequence()));
    let mut memory = MemorySink::new();
    let result = {
        let hand = Hand::new(
            Uuid::now_v7(),
            deck,
            &mut memory,
            script.small_blind,
            script.big_blind,
            RaiseStyle::DiscreteButtons,
            script.dealer_index,
        );
        hand.run_one_hand(seats, &mut agents)?
    };

    flush_log(log_path, &memory)?;
    print_result(result.final_stacks.iter().map(|(k, v)| (*k, *v)), result.total_pot);
    Ok(())
}

fn run_deal(players: usize, seed: Option<u64>) -> anyhow::Result<()> {
    let mut deck = RandomDeck::seeded(seed.unwrap_or_else(rand::random));
    for seat in 0..players {
        let hole = deck.draw(2)?;
        println!("seat {seat}: {} {}", hole[0], hole[1]);
    }
    let board = deck.draw(5)?;
    let board_str = board.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ");
    println!("board: {board_str}");
    Ok(())
}

fn flush_log(path: Option<&str>, memory: &MemorySink) -> anyhow::Result<()> {
    let Some(path) = path else { return Ok(()) };
    let mut sink = JsonlFileSink::create(path)?;
    for record in &memory.records {
        sink.write(record)?;
    }
    sink.flush()?;
    Ok(())
}

fn print_result(final_stacks: impl Iterator<Item = (usize, Cents)>, total_pot: Cents) {
    println!("{}", "final stacks".green().bold());
    for (seat, stack) in final_stacks {
        println!("  seat {seat}: {stack}");
    }
    println!("total pot: {total_pot}");
}
