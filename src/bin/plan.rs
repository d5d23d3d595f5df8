//! CLI entry point: load a task file, then either run full A* search for a
//! plan or report a single heuristic value at the initial state.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fdr_planner::{a_star, Budget, Fdr, Heuristic, Hmax, LmCut, StripsCompiler, TaskLoader};
use std::path::PathBuf;
use std::time::Duration;

/// A cost-optimal classical planner over finite-domain (SAS+-like) tasks.
#[derive(Debug, Parser)]
#[command(name = "fdr-plan")]
struct Opt {
    /// Logging level to use: one of "error", "warn", "info", "debug", "trace".
    #[arg(short, long, default_value = "info")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search for a cost-optimal plan.
    Plan {
        /// Path to the task file.
        task: PathBuf,
        /// Heuristic to guide the search with.
        #[arg(value_enum)]
        heuristic: HeuristicArg,
        /// Abort the search after this many seconds, reporting failure.
        #[arg(long)]
        budget_secs: Option<u64>,
    },
    /// Evaluate h^max at the task's initial state and print it.
    Hmax {
        /// Path to the task file.
        task: PathBuf,
    },
    /// Evaluate LM-cut at the task's initial state and print it.
    Lmcut {
        /// Path to the task file.
        task: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum HeuristicArg {
    Hmax,
    Lmcut,
}

fn main() -> Result<()> {
    // Terminate the process if a thread panics, rather than leaving it stuck.
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        orig_hook(panic_info);
        std::process::exit(1);
    }));

    let opt = Opt::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(std::time::Instant::now()))
        .with_max_level(opt.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match opt.command {
        Command::Plan {
            task,
            heuristic,
            budget_secs,
        } => run_plan(&task, heuristic, budget_secs),
        Command::Hmax { task } => run_heuristic(&task, &Hmax),
        Command::Lmcut { task } => run_heuristic(&task, &LmCut),
    }
}

fn load_task(path: &PathBuf) -> Result<Fdr> {
    anyhow::ensure!(path.exists(), "task file {} does not exist", path.display());
    TaskLoader::load_file(path).with_context(|| format!("failed to load task file {}", path.display()))
}

fn run_heuristic(path: &PathBuf, heuristic: &dyn Heuristic) -> Result<()> {
    let fdr = load_task(path)?;
    let strips = StripsCompiler::compile(&fdr);
    let state = strips.project(&fdr.init_state);
    let h = heuristic.evaluate(&strips, &state)?;
    println!("{h}");
    Ok(())
}

fn run_plan(path: &PathBuf, heuristic: HeuristicArg, budget_secs: Option<u64>) -> Result<()> {
    let fdr = load_task(path)?;
    let strips = StripsCompiler::compile(&fdr);
    let budget = budget_secs.map(|s| Budget::new(Duration::from_secs(s)));

    let result = match heuristic {
        HeuristicArg::Hmax => a_star(&fdr, &strips, &Hmax, budget.as_ref()),
        HeuristicArg::Lmcut => a_star(&fdr, &strips, &LmCut, budget.as_ref()),
    };

    match result {
        Ok(plan) => {
            for op in &plan.operators {
                println!("{op}");
            }
            println!("Plan cost: {}", plan.cost);
            Ok(())
        }
        Err(fdr_planner::Error::Unsolvable) => {
            tracing::error!("no plan exists for this task");
            eprintln!("no plan exists");
            std::process::exit(1);
        }
        Err(fdr_planner::Error::BudgetExceeded(d)) => {
            tracing::error!(budget = ?d, "search budget exceeded");
            eprintln!("search budget of {d:?} exceeded");
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!(error = %e, "planner failed");
            Err(e.into())
        }
    }
}
