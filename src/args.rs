use crate::error::DateFormatError;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(name = "inventory-report")]
#[clap(version, about)]
pub struct Args {
    /// First day of the period, DD/MM/YYYY.
    #[clap(value_parser = parse_date)]
    pub start: NaiveDate,
    /// Last day of the period, DD/MM/YYYY.
    #[clap(value_parser = parse_date)]
    pub end: NaiveDate,
    /// Months covered by each report file.
    #[clap(
        short,
        long,
        default_value_t = 6,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub months_per_batch: u32,
    /// Stop after this many messages per batch.
    #[clap(long)]
    pub max_results: Option<usize>,
    /// The directory report files are written to.
    #[clap(short, long, default_value = ".")]
    pub out_dir: PathBuf,
    /// OAuth access token for the mailbox account.
    #[clap(long, env = "GMAIL_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,
    /// Suppress any progress output if set.
    #[clap(short, long)]
    pub quiet: bool,
}

fn parse_date(input: &str) -> Result<NaiveDate, DateFormatError> {
    NaiveDate::parse_from_str(input, "%d/%m/%Y").map_err(|_| DateFormatError {
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("01/02/2020").unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
        );
        assert_eq!(
            parse_date("31/12/1999").unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 31).unwrap(),
        );
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("2020-02-01").is_err());
        assert!(parse_date("01/13/2020").is_err());
        assert!(parse_date("31/02/2020").is_err());
        assert!(parse_date("yesterday").is_err());
    }
}
