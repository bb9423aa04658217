use std::{
    collections::BTreeSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "drillform", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a drill: ranks, moves, counts and timing.
    Info(InfoArgs),
    /// Check a drill file against the document invariants.
    Validate(ValidateArgs),
    /// Print every rank's position at a count within one move.
    Chart(ChartArgs),
    /// Print the consolidated timeline of a rank selection.
    Reconcile(ReconcileArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input drill JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input drill JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ChartArgs {
    /// Input drill JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Move index (0-based).
    #[arg(long = "move")]
    move_index: usize,

    /// Count within the move; fractions land mid-stride.
    #[arg(long)]
    count: f64,
}

#[derive(Parser, Debug)]
struct ReconcileArgs {
    /// Input drill JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Move index (0-based).
    #[arg(long = "move")]
    move_index: usize,

    /// Comma-separated ranks to reconcile (defaults to every rank).
    #[arg(long, value_delimiter = ',')]
    ranks: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Chart(args) => cmd_chart(args),
        Command::Reconcile(args) => cmd_reconcile(args),
    }
}

fn read_drill_json(path: &Path) -> anyhow::Result<drillform::Drill> {
    let f = File::open(path).with_context(|| format!("open drill '{}'", path.display()))?;
    let r = BufReader::new(f);
    let drill: drillform::Drill =
        serde_json::from_reader(r).with_context(|| "parse drill JSON")?;
    Ok(drill)
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let drill = read_drill_json(&args.in_path)?;
    drill.validate()?;

    let total = drill.total_counts();
    let seconds: f64 = (0..total).map(|c| drill.seconds_per_count_at(c)).sum();
    println!("{}", drill.title);
    println!(
        "ranks: {}",
        drill
            .ranks
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "tempo: {} bpm, {} counts a measure",
        drill.tempo_at_measure(1),
        drill.counts_per_measure_at(1)
    );
    println!(
        "moves: {} ({total} counts, about {seconds:.1}s)",
        drill.moves.len()
    );
    for (i, mov) in drill.moves.iter().enumerate() {
        if mov.comment.is_empty() {
            println!("  {i}: {} counts", mov.total_counts);
        } else {
            println!("  {i}: {} counts  {}", mov.total_counts, mov.comment);
        }
        for (rank, track) in &mov.ranks {
            let line = track
                .commands
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if line.is_empty() {
                println!("    {rank}: (hold)");
            } else {
                println!("    {rank}: {line}");
            }
        }
    }
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let drill = read_drill_json(&args.in_path)?;
    drill
        .validate()
        .with_context(|| format!("validate '{}'", args.in_path.display()))?;
    println!(
        "ok: {} ({} moves, {} ranks)",
        drill.title,
        drill.moves.len(),
        drill.ranks.len()
    );
    Ok(())
}

fn cmd_chart(args: ChartArgs) -> anyhow::Result<()> {
    let drill = read_drill_json(&args.in_path)?;
    drill.validate()?;

    println!("move {} at count {}:", args.move_index, args.count);
    for rank in &drill.ranks {
        let pos = drill.position_at_partial_count(args.move_index, rank, args.count)?;
        println!(
            "  {rank}: head ({:.2}, {:.2})  tail ({:.2}, {:.2})  {:?}",
            pos.head.x, pos.head.y, pos.tail.x, pos.tail.y, pos.shape
        );
    }
    Ok(())
}

fn cmd_reconcile(args: ReconcileArgs) -> anyhow::Result<()> {
    let drill = read_drill_json(&args.in_path)?;
    drill.validate()?;

    let ranks: BTreeSet<String> = if args.ranks.is_empty() {
        drill.ranks.clone()
    } else {
        args.ranks.iter().cloned().collect()
    };
    let mov = drill.moves.get(args.move_index).with_context(|| {
        format!(
            "move {} is out of range ({} moves)",
            args.move_index,
            drill.moves.len()
        )
    })?;
    let cons = drillform::consolidate(mov, &ranks)?;

    println!(
        "move {} reconciled over {}:",
        args.move_index,
        ranks
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if cons.is_empty() {
        println!("  (no commands)");
        return Ok(());
    }
    for (i, command) in cons.commands().iter().enumerate() {
        println!("  {i}: {command}");
    }
    Ok(())
}
