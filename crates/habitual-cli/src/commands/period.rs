use chrono::NaiveDate;
use clap::Args;
use habitual_core::{format_date, next_period_start, parse_date, period_start, PeriodKind};

#[derive(Args)]
pub struct PeriodArgs {
    /// Date as YYYY-MM-DD
    #[arg(value_parser = parse_date)]
    date: NaiveDate,
    /// Period length: daily, weekly, monthly or yearly
    #[arg(long, default_value = "daily")]
    kind: PeriodKind,
    /// Also print the start of the following period
    #[arg(long)]
    next: bool,
}

pub fn run(args: PeriodArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start = period_start(args.date, args.kind);
    println!("{}", format_date(start));
    if args.next {
        let next = next_period_start(start, args.kind).ok_or("no period after this date")?;
        println!("{}", format_date(next));
    }
    Ok(())
}
