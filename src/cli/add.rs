use anyhow::{anyhow, Result};
use ansi_term::Colour;
use chrono::{NaiveDate, NaiveTime};
use clap::Parser;

use crate::{
    storage::record_storage::RecordStorage,
    submission::{submit, SubmitOutcome, Submission},
    utils::{
        clock::Clock,
        time::{format_date, parse_time_lenient},
    },
};

use super::{
    output::format_record,
    report::{parse_user_date, DateStyle},
};

#[derive(Debug, Parser)]
pub struct AddCommand {
    #[arg(
        long,
        short,
        help = "Day of the record. Examples are \"today\", \"yesterday\", \"15/03/2025\", \"2025-03-15\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(long, short, value_parser = parse_time_arg, help = "Entry time, HH:MM or HH:MM:SS. Defaults to current time")]
    entry: Option<NaiveTime>,
    #[arg(long, short = 'x', value_parser = parse_time_arg, help = "Exit time, HH:MM or HH:MM:SS. If earlier than entry the shift ends on the next day. Defaults to current time")]
    exit: Option<NaiveTime>,
    #[arg(long = "break", short, value_parser = parse_hours_arg, help = "Hours spent on breaks")]
    break_hours: Option<f64>,
    #[arg(long = "extra", short = 'o', value_parser = parse_hours_arg, help = "Overtime hours")]
    extra_hours: Option<f64>,
}

fn parse_time_arg(value: &str) -> Result<NaiveTime> {
    parse_time_lenient(value).ok_or_else(|| anyhow!("expected time as HH:MM or HH:MM:SS, got {value}"))
}

fn parse_hours_arg(value: &str) -> Result<f64> {
    let hours = value.parse::<f64>()?;
    if hours.is_finite() && hours >= 0. {
        Ok(hours)
    } else {
        Err(anyhow!("hours can't be negative, got {value}"))
    }
}

/// Command to process `add` command. Acts like submitting an entry form: whatever wasn't filled in
/// gets a default.
pub async fn process_add_command(
    AddCommand {
        date,
        date_style,
        entry,
        exit,
        break_hours,
        extra_hours,
    }: AddCommand,
    storage: impl RecordStorage,
    clock: &dyn Clock,
) -> Result<()> {
    let date: Option<NaiveDate> = date
        .map(|v| parse_user_date(&v, clock.now(), date_style))
        .transpose()?;

    let submission = Submission {
        date,
        entry_time: entry,
        exit_time: exit,
        break_hours,
        extra_hours,
    };

    match submit(storage, clock, submission).await? {
        SubmitOutcome::Saved(record) => {
            println!(
                "{} {}",
                Colour::Green.paint("Saved"),
                format_date(record.date)
            );
            println!("{}", format_record(&record));
        }
        SubmitOutcome::Empty => {
            println!("{}", Colour::Yellow.paint("The entry data is empty."));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::{parse_hours_arg, parse_time_arg};

    #[test]
    fn test_parse_time_arg() {
        assert_eq!(
            parse_time_arg("07:45").unwrap(),
            NaiveTime::from_hms_opt(7, 45, 0).unwrap()
        );
        assert!(parse_time_arg("7.45").is_err());
    }

    #[test]
    fn test_parse_hours_arg() {
        assert_eq!(parse_hours_arg("0.5").unwrap(), 0.5);
        assert_eq!(parse_hours_arg("0").unwrap(), 0.);
        assert!(parse_hours_arg("-1").is_err());
        assert!(parse_hours_arg("inf").is_err());
        assert!(parse_hours_arg("one").is_err());
    }
}
