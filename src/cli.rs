use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use itertools::Itertools;
use log::{debug, LevelFilter};
use serde_json::json;

use crate::cards::{canonicalize, colex_index, format_cards, parse_board};
use crate::category::{combo_count, HoleCategory};
use crate::cfr::{counterfactual_regret, regret_matching};
use crate::comb::binomial;
use crate::config::Config;
use crate::display::{board_display, equity_bar, equity_table, kv_table, print_error, print_section};
use crate::equity::{Equity, Opponent};
use crate::error::{NashError, NashResult};
use crate::hand_evaluator::{split_rank, DirectEvaluator, Evaluator};
use crate::lookup_eval::RankTable;

#[derive(Parser)]
#[command(name = "nash", version = "1.0.0", about = "Hold'em hand evaluation, equity and CFR primitives.")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// HandRanks.dat lookup table (overrides config and NASH_TABLE)
    #[arg(long, global = true)]
    table: Option<PathBuf>,
    /// Monte-Carlo worker count
    #[arg(long, global = true)]
    workers: Option<usize>,
    /// Base seed for the random streams
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank a 5 to 7 card hand
    Eval {
        /// Cards, e.g. "AcAd4s5h7d8c9c"
        cards: String,
        #[arg(long)]
        json: bool,
    },
    /// Equity of two hole cards against a random hand, a holding or a range
    Equity {
        /// Hole cards, e.g. "AdAc"
        hole: String,
        /// Known board cards
        #[arg(short, long)]
        board: Option<String>,
        /// Monte-Carlo trials (config default when omitted)
        #[arg(short = 'n', long)]
        trials: Option<usize>,
        /// Enumerate every scenario instead of sampling
        #[arg(long, conflicts_with = "trials")]
        exhaustive: bool,
        /// Spread the trials over all workers
        #[arg(long)]
        parallel: bool,
        /// Opponent holding ("KsKd") or comma separated categories ("QQ,AKs")
        #[arg(long)]
        vs: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Probability of being dealt a hand category
    Prob {
        /// Category shorthand, e.g. "AA", "AKo", "AKs"
        category: String,
        /// Cards already seen
        #[arg(long)]
        seen: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List the holdings of a category
    Combos {
        category: String,
    },
    /// Suit-canonical form and colex index of a card set
    Canon {
        cards: String,
    },
    /// Binomial coefficient C(n, k)
    Choose {
        n: u64,
        k: u64,
    },
    /// Counterfactual regret of each action at a node
    Regret {
        /// Action values, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        values: Vec<f64>,
        /// Current strategy, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        strategy: Vec<f64>,
        /// Probability of reaching the node
        #[arg(long, default_value_t = 1.0)]
        reach: f64,
    },
    /// Regret-matching strategy from cumulative regret
    Match {
        /// Cumulative regret, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        regret: Vec<f64>,
    },
}

pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = dispatch(cli) {
        print_error(&e.to_string());
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_millis()
        .parse_default_env()
        .init();
}

fn load_config(cli: &Cli) -> NashResult<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if cli.table.is_some() {
        config.table = cli.table.clone();
    }
    if cli.workers.is_some() {
        config.workers = cli.workers;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config.with_env())
}

/// Table-backed evaluator when a table is configured, otherwise the direct one.
fn evaluator(config: &Config) -> NashResult<&'static dyn Evaluator> {
    static DIRECT: DirectEvaluator = DirectEvaluator;
    match &config.table {
        Some(path) => {
            let table: &'static dyn Evaluator = RankTable::global(path)?;
            Ok(table)
        }
        None => {
            debug!("no hand rank table configured, using the direct evaluator");
            Ok(&DIRECT)
        }
    }
}

fn dispatch(cli: Cli) -> NashResult<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Commands::Eval { cards, json } => cmd_eval(&config, &cards, json),
        Commands::Equity {
            hole,
            board,
            trials,
            exhaustive,
            parallel,
            vs,
            json,
        } => {
            let trials = if exhaustive {
                0
            } else {
                trials.unwrap_or(config.trials)
            };
            cmd_equity(&config, &hole, board.as_deref(), trials, parallel, vs.as_deref(), json)
        }
        Commands::Prob {
            category,
            seen,
            json,
        } => cmd_prob(&category, seen.as_deref(), json),
        Commands::Combos { category } => cmd_combos(&category),
        Commands::Canon { cards } => cmd_canon(&cards),
        Commands::Choose { n, k } => {
            println!("{}", binomial(n, k)?);
            Ok(())
        }
        Commands::Regret {
            values,
            strategy,
            reach,
        } => {
            let regret = counterfactual_regret(&values, &strategy, reach)?;
            println!("[{}]", regret.iter().join(" "));
            Ok(())
        }
        Commands::Match { regret } => {
            println!("[{}]", regret_matching(&regret).iter().join(" "));
            Ok(())
        }
    }
}

fn cmd_eval(config: &Config, cards: &str, json: bool) -> NashResult<()> {
    let cards = parse_board(cards)?;
    let rank = evaluator(config)?.evaluate(&cards)?;
    let (category, ordinal) = split_rank(rank.0);
    let name = rank
        .category()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "Invalid".to_string());

    if json {
        let out = json!({
            "cards": format_cards(&cards),
            "category": category,
            "name": name,
            "ordinal": ordinal,
            "rank": rank.0,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  Hand: {}", board_display(&cards));
    println!();
    let table = kv_table(&[
        ("Category", format!("{} ({})", name, category)),
        ("Ordinal", ordinal.to_string()),
        ("Packed rank", rank.0.to_string()),
    ]);
    println!("{}", table);
    println!();
    Ok(())
}

fn parse_opponent(vs: Option<&str>) -> NashResult<Opponent> {
    let Some(vs) = vs else {
        return Ok(Opponent::Random);
    };
    if let Ok(cards) = parse_board(vs) {
        return match cards.as_slice() {
            [a, b] => Ok(Opponent::Holding([*a, *b])),
            _ => Err(NashError::InvalidHoleSize { got: cards.len() }),
        };
    }
    let range = vs
        .split(',')
        .map(|s| s.parse::<HoleCategory>())
        .collect::<NashResult<Vec<_>>>()?;
    Ok(Opponent::Range(range))
}

fn cmd_equity(
    config: &Config,
    hole: &str,
    board: Option<&str>,
    trials: usize,
    parallel: bool,
    vs: Option<&str>,
    json: bool,
) -> NashResult<()> {
    let hole = parse_board(hole)?;
    let board = match board {
        Some(b) => parse_board(b)?,
        None => Vec::new(),
    };
    let opponent = parse_opponent(vs)?;
    let engine = Equity::from_config(evaluator(config)?, config);
    let result = engine.equity(&hole, &board, &opponent, trials, parallel)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let villain = vs.unwrap_or("random");
    let board_str = if board.is_empty() {
        String::new()
    } else {
        format!(" on {}", board_display(&board))
    };
    let mode = if trials == 0 {
        "exhaustive".to_string()
    } else if parallel {
        format!("{} trials on {} workers", trials, engine.workers())
    } else {
        format!("{} trials", trials)
    };

    println!();
    println!("  {} vs {}{}", board_display(&hole), villain.bold(), board_str);
    println!("  Mode: {}\n", mode.bold());
    println!("  Hero:    {}", equity_bar(result.equity(), 30));
    println!("  Villain: {}", equity_bar(1.0 - result.equity(), 30));
    println!();
    println!("{}", equity_table(&result));
    println!();
    Ok(())
}

fn cmd_prob(category: &str, seen: Option<&str>, json: bool) -> NashResult<()> {
    let cat: HoleCategory = category.parse()?;
    let seen = match seen {
        Some(s) => parse_board(s)?,
        None => Vec::new(),
    };
    let p = cat.hole_probability(&seen)?;

    if json {
        let out = json!({
            "category": cat.to_string(),
            "seen": format_cards(&seen),
            "probability": p,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_section(
        &format!("P({})", cat),
        &format!("{:.10} (1 in {:.1})", p, 1.0 / p),
    );
    println!();
    Ok(())
}

fn cmd_combos(category: &str) -> NashResult<()> {
    let cat: HoleCategory = category.parse()?;

    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#".bold().to_string()),
        Cell::new("Holding".bold().to_string()),
    ]);
    for (i, combo) in cat.combos().iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(board_display(combo)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold().to_string()),
        Cell::new(combo_count(category).to_string().bold().to_string()),
    ]);
    println!("{}", table);
    println!();
    Ok(())
}

fn cmd_canon(cards: &str) -> NashResult<()> {
    let cards = parse_board(cards)?;
    let canon = canonicalize(&cards);
    let table = kv_table(&[
        ("Cards", format_cards(&cards).join(" ")),
        ("Canonical", format_cards(&canon).join(" ")),
        ("Colex index", colex_index(&cards).to_string()),
        ("Canonical index", colex_index(&canon).to_string()),
    ]);
    println!();
    println!("{}", table);
    println!();
    Ok(())
}
