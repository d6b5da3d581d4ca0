use std::path::PathBuf;

use anyhow::{Context, Result};
use behrdownloader::{
    Client, DashRequest, DatasetId, ProfileMode, Region, StdoutReporter, dataset_aliases, driver,
    parse_year_month,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Utilities to download BEHR OMI NO2 files.
#[derive(Parser, Debug)]
#[command(name = "getbehr", version)]
struct Cli {
    /// DASH archive root URL.
    #[arg(long, global = true)]
    dash_url: Option<String>,

    /// URL of the text file holding the current BEHR version.
    #[arg(long, global = true)]
    version_url: Option<String>,

    /// Do not draw download progress bars.
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download monthly tar files from the official DASH archives.
    #[command(after_help = "Example: getbehr dash daily-gridded 2005-01 2005-02")]
    Dash(DashArgs),
    /// Print the daily BEHR file names for a region and date range.
    List(ListArgs),
}

#[derive(Args, Debug)]
struct DashArgs {
    /// Which dataset to download: one of the aliases below or a DOI string beginning with "doi".
    #[arg(value_parser = parse_dataset, long_help = dataset_help())]
    dataset: DatasetId,

    /// Beginning date to download in yyyy-mm format.
    #[arg(value_parser = parse_month_arg)]
    start: NaiveDate,

    /// Ending date to download in yyyy-mm format.
    #[arg(value_parser = parse_month_arg)]
    end: NaiveDate,

    /// Directory to save downloads to.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Extract the tar files after downloading.
    #[arg(short, long)]
    extract_tar: bool,

    /// Delete tar file after extracting. Has no effect without --extract-tar.
    #[arg(short, long)]
    delete_tar: bool,

    /// Increase logging to console.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Region abbreviation or name.
    #[arg(short, long, default_value = "US", value_parser = parse_region)]
    region: Region,

    /// Profile time resolution (monthly or daily).
    #[arg(short, long, default_value = "monthly", value_parser = parse_profile_mode)]
    profile: ProfileMode,

    /// First day in yyyy-mm-dd format.
    #[arg(default_value = "2005-01-01")]
    start: String,

    /// Last day in yyyy-mm-dd format.
    #[arg(default_value = "2016-12-31")]
    end: String,

    /// Increase logging to console.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn dataset_help() -> String {
    format!(
        "Which dataset to download. Either a DOI string beginning with \"doi\" or one of: {}",
        dataset_aliases().join(", ")
    )
}

fn parse_dataset(s: &str) -> std::result::Result<DatasetId, String> {
    s.parse().map_err(|e: behrdownloader::Error| e.to_string())
}

fn parse_month_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_year_month(s).map_err(|e| e.to_string())
}

fn parse_region(s: &str) -> std::result::Result<Region, String> {
    s.parse().map_err(|e: behrdownloader::Error| e.to_string())
}

fn parse_profile_mode(s: &str) -> std::result::Result<ProfileMode, String> {
    s.parse().map_err(|e: behrdownloader::Error| e.to_string())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = match &cli.command {
        Command::Dash(a) => a.verbose,
        Command::List(a) => a.verbose,
    };
    init_tracing(verbose);

    let client = Client::new(cli.dash_url, cli.version_url, None)
        .context("failed to set up HTTP client")?
        .with_progress(!cli.no_progress);

    match cli.command {
        Command::Dash(args) => {
            let request = DashRequest {
                dataset: args.dataset,
                out_dir: args.out_dir,
                start: args.start,
                end: args.end,
                extract_tar: args.extract_tar,
                delete_tar: args.delete_tar,
                verbose: args.verbose,
            };
            driver::run(&client, &request, &StdoutReporter)
                .with_context(|| format!("download of {} failed", request.dataset))?;
        }
        Command::List(args) => {
            let names = client.daily_filenames(args.region, args.profile, &args.start, &args.end)?;
            for name in names {
                println!("{name}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_dash_subcommand() {
        let cli = Cli::try_parse_from([
            "getbehr", "dash", "monthly-gridded", "2005-01", "2005-03", "-o", "/tmp", "-e", "-d",
            "-vv",
        ])
        .unwrap();
        let Command::Dash(args) = cli.command else {
            panic!("expected dash subcommand");
        };
        assert_eq!(args.dataset.doi(), "doi:10.6078/D1RQ3G");
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2005, 1, 1).unwrap());
        assert_eq!(args.end, NaiveDate::from_ymd_opt(2005, 3, 1).unwrap());
        assert!(args.extract_tar && args.delete_tar);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.out_dir, PathBuf::from("/tmp"));
    }

    #[test]
    fn rejects_unknown_dataset_and_bad_month() {
        assert!(Cli::try_parse_from(["getbehr", "dash", "foo", "2005-01", "2005-02"]).is_err());
        assert!(
            Cli::try_parse_from(["getbehr", "dash", "daily-native", "2005-13", "2006-01"]).is_err()
        );
    }

    #[test]
    fn list_defaults_match_gui() {
        let cli = Cli::try_parse_from(["getbehr", "list", "-r", "hk"]).unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list subcommand");
        };
        assert_eq!(args.region, Region::HongKong);
        assert_eq!(args.profile, ProfileMode::Monthly);
        assert_eq!(args.start, "2005-01-01");
        assert_eq!(args.end, "2016-12-31");
    }
}
