use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use idleg::types::{AggregateResult, Legislator};
use idleg::utils::{DistrictDelegation, MemberStats, SEARCH_LIMIT, find_by_name, search_by_name};
use idleg::{Aggregator, CacheStore, ScraperConfig, WebScraper};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "idleg")]
#[command(about = "Look up Idaho state legislators", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        long,
        global = true,
        value_name = "URL",
        help = "Legislature site to scrape"
    )]
    base_url: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        default_value = "idleg_cache.json",
        help = "Where scraped data is cached"
    )]
    cache_file: PathBuf,

    #[arg(long, global = true, help = "Keep scraped data in memory only")]
    no_cache: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text",
        global = true,
        help = "Output format"
    )]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List every senator and representative
    All,
    /// Show the senator and House members for a district
    District {
        #[arg(
            help = "Legislative district number",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        district: u32,
    },
    /// Find legislators whose name contains the query
    Search {
        #[arg(help = "Part of a legislator's name")]
        query: String,
    },
    /// Show full contact details for the first legislator matching a name
    Show {
        #[arg(help = "Part of a legislator's name")]
        name: String,
    },
    /// List committees and their members
    Committees,
    /// Scrape again even if the cached data is fresh
    Refresh,
    /// Delete the cached data without scraping
    ClearCache,
}

fn serialize_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn print_details(member: &Legislator) {
    println!("{}", member.name);
    println!("  Party: {}", member.party);
    println!("  Chamber: {}", member.chamber);
    println!("  District: {}", member.district);
    if let Some(seat) = member.house_seat {
        println!("  Seat: {}", seat);
    }
    if !member.contact.email.is_empty() {
        println!("  Email: {}", member.contact.email);
    }
    let phones = [
        ("Home phone", &member.contact.home_phone),
        ("Business phone", &member.contact.business_phone),
        ("Statehouse phone", &member.contact.statehouse_phone),
        ("Mailing address", &member.contact.mailing_address),
        ("Occupation", &member.occupation),
    ];
    for (label, value) in phones {
        if let Some(value) = value {
            println!("  {}: {}", label, value);
        }
    }
    if !member.committees.is_empty() {
        println!("  Committees: {}", member.committees.join(", "));
    }
}

fn print_members(data: &AggregateResult) {
    if data.senators.is_empty() && data.representatives.is_empty() {
        println!("No legislators to display.");
        return;
    }
    for (i, member) in data.legislators().enumerate() {
        println!("{:>3}. {}", i + 1, member);
    }
    print!("{}", MemberStats::from_result(data));
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let mut config = ScraperConfig::default();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let scraper = WebScraper::with_config(config).unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    let cache = if cli.no_cache {
        CacheStore::in_memory()
    } else {
        CacheStore::file(&cli.cache_file)
    };
    let aggregator = Aggregator::new(scraper, cache);

    let data = match cli.command {
        Commands::ClearCache => {
            log::info!("Clearing cached data...");
            aggregator.cache().clear();
            return;
        }
        Commands::Refresh => aggregator.refresh().await,
        _ => aggregator.get_all_data().await,
    };
    if data.is_empty() {
        log::warn!("No legislature data available, live or cached");
    }

    match cli.command {
        Commands::All | Commands::Refresh => match cli.format {
            OutputFormat::Json => serialize_json(&data),
            OutputFormat::Text => print_members(&data),
        },

        Commands::District { district } => {
            let delegation = DistrictDelegation::for_district(&data, district);
            match cli.format {
                OutputFormat::Json => serialize_json(&serde_json::json!({
                    "district": delegation.district,
                    "senator": delegation.senator,
                    "representatives": delegation.representatives,
                })),
                OutputFormat::Text if delegation.is_empty() => {
                    println!("No legislators found for district {}.", district);
                }
                OutputFormat::Text => print!("{}", delegation),
            }
        }

        Commands::Search { query } => {
            let matches = search_by_name(&data, &query, SEARCH_LIMIT);
            match cli.format {
                OutputFormat::Json => serialize_json(&matches),
                OutputFormat::Text if matches.is_empty() => {
                    println!("No legislators match '{}'.", query);
                }
                OutputFormat::Text => {
                    for (i, member) in matches.iter().enumerate() {
                        println!("{:>3}. {}", i + 1, member);
                    }
                }
            }
        }

        Commands::Show { name } => match find_by_name(&data, &name) {
            Some(member) => match cli.format {
                OutputFormat::Json => serialize_json(member),
                OutputFormat::Text => print_details(member),
            },
            None => println!("No legislator matches '{}'.", name),
        },

        Commands::ClearCache => {}

        Commands::Committees => match cli.format {
            OutputFormat::Json => serialize_json(&data.committees),
            OutputFormat::Text if data.committees.is_empty() => {
                println!("No committees to display.");
            }
            OutputFormat::Text => {
                for committee in &data.committees {
                    println!("{}", committee);
                }
            }
        },
    }
}
