use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use connectron::config::MatchConfig;
use connectron::error::MoveError;
use connectron::game::RoundOutcome;
use connectron::series::{MatchController, MatchPhase, RoundEnd, TurnReport};

/// Play a Connectron series in the terminal.
#[derive(Parser)]
#[command(name = "connectron", about = "Multi-player connect-N with special rules")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connectron.toml")]
    config: PathBuf,

    /// Override the AI random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of rounds (must be odd)
    #[arg(long)]
    best_of: Option<usize>,

    /// Print the series summary as JSON when done
    #[arg(long)]
    json: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// Only print round results, not every board
    #[arg(long)]
    quiet: bool,
}

enum Command {
    Drop(usize),
    Bomb(usize),
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let column = |word: Option<&str>| -> Result<usize> {
        let word = word.context("missing column number")?;
        let n: usize = word
            .parse()
            .with_context(|| format!("'{word}' is not a column number"))?;
        if n == 0 {
            bail!("columns are numbered from 1");
        }
        Ok(n - 1)
    };
    match words.next() {
        Some("q") | Some("quit") => Ok(Command::Quit),
        Some("b") | Some("bomb") => Ok(Command::Bomb(column(words.next())?)),
        first => Ok(Command::Drop(column(first)?)),
    }
}

fn report(game: &MatchController, turn: &TurnReport, quiet: bool) {
    let outcome = &turn.outcome;
    if !quiet {
        if let Some(bonus) = outcome.corner_bonus {
            println!("{} earns a corner bonus of {}", bonus.player, bonus.points);
        }
        if !outcome.solitaire_removed.is_empty() {
            println!("Solitaire removed {} counter(s)", outcome.solitaire_removed.len());
        }
        if !outcome.overflow_spill.is_empty() {
            let columns: Vec<usize> = outcome.overflow_spill.iter().map(|p| p.column + 1).collect();
            println!("Overflow spilled into column(s) {columns:?}");
        }
        if !outcome.bomb_cleared.is_empty() {
            println!("{} bombed column {}", outcome.player, outcome.column + 1);
        }
    }
    if let Some(end) = turn.round_end {
        if let Some(last) = game.history().last() {
            if !quiet {
                println!("\n{}", last.board);
            }
            match end.outcome() {
                RoundOutcome::Winner(p) => {
                    println!("Round {}: {p} wins", last.round)
                }
                RoundOutcome::Draw => println!("Round {}: draw", last.round),
            }
        }
        if let RoundEnd::NextRound { next_round, .. } = end {
            println!("Starting round {next_round}");
        }
    }
}

/// Ask the human seat for a move until one is accepted. `None` means quit.
fn human_turn(
    game: &mut MatchController,
    input: &mut impl BufRead,
) -> Result<Option<TurnReport>> {
    let player = game.current_turn();
    loop {
        print!("{player}, column (or 'b N' to bomb, 'q' to quit): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("reading move")? == 0 {
            return Ok(None);
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err:#}");
                continue;
            }
        };
        let result = match command {
            Command::Quit => return Ok(None),
            Command::Drop(column) => game.drop_at(column),
            Command::Bomb(column) => game.use_bomb(column),
        };
        match result {
            Ok(turn) => return Ok(Some(turn)),
            Err(err @ MoveError::SeriesComplete) => bail!(err),
            Err(err) => println!("{err}"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.dump_config {
        print!("{}", MatchConfig::default_toml());
        return Ok(());
    }

    // Load configuration
    let mut config = MatchConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(seed) = cli.seed {
        config.ai.seed = Some(seed);
    }
    if let Some(best_of) = cli.best_of {
        config.series.best_of = best_of;
    }

    let mut game = MatchController::new(config).context("starting series")?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    while let MatchPhase::AwaitingMove(player) = game.phase() {
        let is_ai = game.seat(player).is_some_and(|seat| seat.is_ai());
        if !cli.quiet && game.round().moves_played() == 0 {
            println!("\nRound {} of {}", game.round_number(), game.config().series.best_of);
        }
        if is_ai {
            let turn = game.play_ai_turn().context("AI move")?;
            if !cli.quiet {
                if let Some(at) = turn.outcome.landed {
                    println!("{player} drops into column {}", at.column + 1);
                }
            }
            report(&game, &turn, cli.quiet);
        } else {
            if !cli.quiet {
                println!("\n{}", game.board());
            }
            match human_turn(&mut game, &mut input)? {
                Some(turn) => report(&game, &turn, cli.quiet),
                None => break,
            }
        }
    }

    println!("\nStandings:");
    for standing in game.standings() {
        println!(
            "  {} ({}): {} win(s)",
            standing.player,
            standing.seat.name(),
            standing.wins
        );
    }

    if cli.json {
        let summary = serde_json::to_string_pretty(&game.summary()).context("serializing summary")?;
        println!("{summary}");
    }

    Ok(())
}
