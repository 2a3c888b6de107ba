//! Habit management commands for CLI.

use clap::Subcommand;
use habitual_core::{Habit, HabitEdit, HabitSummary, PeriodKind, PeriodicityRule};

use super::{open_repository, today};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Period length: daily, weekly, monthly or yearly
        #[arg(long, default_value = "daily")]
        kind: PeriodKind,
        /// Completions required per period
        #[arg(long, default_value_t = 1)]
        times: u32,
        /// Free-form description
        #[arg(long, default_value = "")]
        spec: String,
    },
    /// List habits
    List {
        /// Only habits with this period length
        #[arg(long)]
        kind: Option<PeriodKind>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one habit
    Show {
        /// Habit id, list position, or name
        habit: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit name, description, or periodicity
    Edit {
        /// Habit id, list position, or name
        habit: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        spec: Option<String>,
        /// New period length (recomputes the streak)
        #[arg(long)]
        kind: Option<PeriodKind>,
        /// New completions per period (recomputes the streak)
        #[arg(long)]
        times: Option<u32>,
    },
    /// Clear completions and streaks
    Reset {
        /// Habit id, list position, or name
        habit: String,
        /// Confirm
        #[arg(long)]
        yes: bool,
    },
    /// Delete a habit
    Remove {
        /// Habit id, list position, or name
        habit: String,
        /// Confirm
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut repo = open_repository()?;

    match action {
        HabitAction::Add {
            name,
            kind,
            times,
            spec,
        } => {
            let rule = PeriodicityRule::new(kind, times)?;
            let habit = repo.add(&name, &spec, rule)?;
            println!("Habit created: {}", habit.id());
            print_habit(habit);
        }
        HabitAction::List { kind, json } => {
            // Positions stay global so they can be used as selectors.
            let listed: Vec<(usize, &Habit)> = repo
                .list()
                .enumerate()
                .map(|(i, habit)| (i + 1, habit))
                .filter(|(_, habit)| kind.map_or(true, |k| habit.rule().kind() == k))
                .collect();

            if json {
                let summaries: Vec<HabitSummary> =
                    listed.iter().map(|(_, habit)| HabitSummary::from(*habit)).collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else if listed.is_empty() {
                println!("No habits yet");
            } else {
                let today = today();
                for (position, habit) in listed {
                    let streak = habit.streak();
                    let (done, required) = habit.progress(today);
                    println!(
                        "{position}. {} [{}] streak {} (best {}), {done}/{required} this {}",
                        habit.name(),
                        habit.rule(),
                        streak.current,
                        streak.longest,
                        habit.rule().kind().unit(),
                    );
                }
            }
        }
        HabitAction::Show { habit, json } => {
            let id = repo.resolve(&habit)?;
            let habit = repo.get(&id).ok_or("habit vanished")?;
            if json {
                println!("{}", serde_json::to_string_pretty(habit)?);
            } else {
                print_habit(habit);
            }
        }
        HabitAction::Edit {
            habit,
            name,
            spec,
            kind,
            times,
        } => {
            let id = repo.resolve(&habit)?;
            let rule = match (kind, times) {
                (None, None) => None,
                (kind, times) => {
                    let current = repo.get(&id).map(|h| *h.rule()).unwrap_or_default();
                    Some(PeriodicityRule::new(
                        kind.unwrap_or(current.kind()),
                        times.unwrap_or(current.required_per_period()),
                    )?)
                }
            };
            let edit = HabitEdit {
                name,
                specification: spec,
                rule,
            };
            if edit.is_empty() {
                return Err("nothing to edit (use --name, --spec, --kind or --times)".into());
            }
            let habit = repo.edit(&id, edit)?;
            println!("Habit updated: {}", habit.id());
            print_habit(habit);
        }
        HabitAction::Reset { habit, yes } => {
            let id = repo.resolve(&habit)?;
            if !yes {
                return Err(format!("refusing to reset '{habit}' without --yes").into());
            }
            let habit = repo.reset(&id)?;
            println!("Habit reset: {}", habit.name());
        }
        HabitAction::Remove { habit, yes } => {
            let id = repo.resolve(&habit)?;
            if !yes {
                return Err(format!("refusing to remove '{habit}' without --yes").into());
            }
            let removed = repo.remove(&id)?;
            println!("Habit removed: {}", removed.name());
        }
    }
    Ok(())
}

fn print_habit(habit: &Habit) {
    let streak = habit.streak();
    println!("Name:           {}", habit.name());
    if !habit.specification().is_empty() {
        println!("Specification:  {}", habit.specification());
    }
    println!("Periodicity:    {}", habit.rule());
    println!("Current streak: {}", streak.current);
    println!("Longest streak: {}", streak.longest);
    match (habit.completions().first(), habit.completions().last()) {
        (Some(first), Some(last)) => println!(
            "Completions:    {} ({first} .. {last})",
            habit.completions().len()
        ),
        _ => println!("Completions:    0"),
    }
}
