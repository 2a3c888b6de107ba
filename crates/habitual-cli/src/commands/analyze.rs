use clap::Args;
use habitual_core::{HabitAnalysis, PeriodKind};

use super::open_repository;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Only habits with this period length
    #[arg(long)]
    kind: Option<PeriodKind>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;
    let report = match args.kind {
        Some(kind) => HabitAnalysis::for_kind(repo.list(), kind),
        None => repo.analyze(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Habits:                 {}", report.total_habits);
    println!("Completions:            {}", report.total_completions);
    println!("Average current streak: {:.2}", report.average_current_streak);
    match &report.best {
        Some(best) => println!(
            "Best streak:            {} ({}, {} {}s)",
            best.name,
            best.kind,
            best.longest_streak,
            best.kind.unit()
        ),
        None => println!("Best streak:            none yet"),
    }

    if !report.habits.is_empty() {
        println!();
        for habit in &report.habits {
            println!(
                "{} [{}]: {} completions, streak {} (best {})",
                habit.name,
                habit.periodicity,
                habit.total_completions,
                habit.current_streak,
                habit.longest_streak
            );
        }
    }
    Ok(())
}
