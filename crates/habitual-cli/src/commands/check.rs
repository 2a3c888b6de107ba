use chrono::NaiveDate;
use clap::Args;
use habitual_core::{parse_date, CheckOff};

use super::{open_repository, today};

#[derive(Args)]
pub struct CheckArgs {
    /// Habit id, list position, or name
    habit: String,
    /// Completion date as YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

pub fn run(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut repo = open_repository()?;
    let id = repo.resolve(&args.habit)?;
    let date = args.date.unwrap_or_else(today);

    match repo.check_off(&id, date)? {
        CheckOff::Recorded(streak) => {
            let name = repo.get(&id).map(|h| h.name()).unwrap_or_default();
            println!("Checked off {name} on {date}");
            println!("Current streak: {}", streak.current);
            println!("Longest streak: {}", streak.longest);
        }
        CheckOff::AlreadyRecorded => {
            let name = repo.get(&id).map(|h| h.name()).unwrap_or_default();
            println!("{name} was already checked off on {date}");
        }
    }
    Ok(())
}
