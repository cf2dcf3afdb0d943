use std::fs;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use lunchmeny::config::{DEFAULT_LAST_DAY_LINES, DEFAULT_LINK_KEYWORD, FinderConfig};
use lunchmeny::scraper::WebScraper;
use lunchmeny::utils::{BatchEntry, BatchStats, parse_url_list};
use lunchmeny::MenuFinder;

#[derive(Parser)]
#[command(name = "lunchmeny")]
#[command(about = "Finds restaurants' weekly lunch menus", long_about = None)]
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
        default_value_t = 30,
        global = true,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "HTTP timeout in seconds"
    )]
    timeout: u64,

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

#[derive(Debug, Args)]
struct FinderArgs {
    #[arg(
        long,
        value_delimiter = ',',
        value_name = "MON,TUE,WED,THU,FRI",
        help = "Weekday labels to look for, Monday first [default: måndag,tisdag,onsdag,torsdag,fredag]"
    )]
    days: Option<Vec<String>>,

    #[arg(
        long,
        default_value = DEFAULT_LINK_KEYWORD,
        help = "Text a link must contain to be taken as the lunch page"
    )]
    keyword: String,

    #[arg(
        long,
        default_value_t = DEFAULT_LAST_DAY_LINES,
        help = "Number of lines read after the last weekday label"
    )]
    last_day_lines: usize,

    #[arg(
        long,
        help = "Read the menu from the given page itself when it links to no lunch page"
    )]
    root_fallback: bool,
}

impl FinderArgs {
    fn into_config(self) -> Result<FinderConfig, String> {
        let mut config = FinderConfig {
            last_day_lines: self.last_day_lines,
            link_keyword: self.keyword,
            root_page_fallback: self.root_fallback,
            ..Default::default()
        };
        if let Some(days) = self.days {
            config = config.with_labels(&days).map_err(|e| e.to_string())?;
        }
        config.validate().map_err(|e| e.to_string())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find the weekly lunch menu of one restaurant
    Menu {
        #[arg(help = "Root URL of the restaurant's website")]
        url: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,

        #[command(flatten)]
        finder: FinderArgs,
    },
    /// Find weekly lunch menus for many restaurants at once
    Batch {
        #[arg(help = "Root URLs of restaurant websites")]
        urls: Vec<String>,

        #[arg(
            short = 'f',
            long,
            value_name = "PATH",
            help = "File with one URL per line, '#' starts a comment"
        )]
        file: Option<String>,

        #[arg(
            short = 'c',
            long,
            default_value_t = 4,
            value_parser = clap::value_parser!(u16).range(1..),
            help = "How many restaurants to look up at the same time"
        )]
        concurrency: u16,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,

        #[command(flatten)]
        finder: FinderArgs,
    },
    /// List the links on a page that could lead to its lunch menu
    Links {
        #[arg(help = "Root URL of the restaurant's website")]
        url: String,

        #[arg(
            long,
            default_value = DEFAULT_LINK_KEYWORD,
            help = "Text a link must contain to be listed"
        )]
        keyword: String,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn build_finder(timeout: Duration, config: FinderConfig) -> MenuFinder {
    let scraper = WebScraper::with_timeout(timeout).unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    MenuFinder::with_fetcher(scraper)
        .with_config(config)
        .unwrap_or_else(|e| {
            log::error!("Invalid args: {e}");
            process::exit(1);
        })
}

fn finder_config(args: FinderArgs) -> FinderConfig {
    args.into_config().unwrap_or_else(|e| {
        log::error!("Invalid args: {e}");
        process::exit(1);
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let timeout = Duration::from_secs(cli.timeout);

    match cli.command {
        Commands::Menu {
            url,
            format,
            finder,
        } => {
            let finder = build_finder(timeout, finder_config(finder));

            log::info!("Looking for a lunch menu on {}...", url);

            let menu = finder.get_weekly_lunch_menu(&url).await.unwrap_or_else(|e| {
                log::error!("Error finding lunch menu: {}", e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&menu),
                OutputFormat::Text => print!("{}", menu),
            }
        }

        Commands::Batch {
            mut urls,
            file,
            concurrency,
            format,
            finder,
        } => {
            if let Some(path) = file {
                let contents = fs::read_to_string(&path).unwrap_or_else(|e| {
                    log::error!("Error reading {}: {}", path, e);
                    process::exit(1);
                });
                urls.extend(parse_url_list(&contents));
            }
            if urls.is_empty() {
                log::error!("Invalid args: no URLs given");
                process::exit(1);
            }

            let finder = build_finder(timeout, finder_config(finder));

            log::info!("Looking up {} restaurant(s)...", urls.len());

            let results = finder
                .get_weekly_lunch_menus(&urls, concurrency as usize)
                .await;
            let stats = BatchStats::from_results(results.iter().map(|(_, r)| r));

            match format {
                OutputFormat::Json => {
                    let entries: Vec<BatchEntry> = results
                        .iter()
                        .map(|(url, result)| BatchEntry::new(url, result))
                        .collect();
                    serialize_json(&serde_json::json!({
                        "results": entries,
                        "stats": stats,
                    }));
                }
                OutputFormat::Text => {
                    for (url, result) in &results {
                        match result {
                            Ok(menu) => println!("{}", menu),
                            Err(e) => println!("✗ {}: {}\n", url, e),
                        }
                    }
                    print!("{}", stats);
                }
            }

            if stats.complete + stats.partial == 0 {
                process::exit(1);
            }
        }

        Commands::Links { url, keyword } => {
            let config = FinderConfig {
                link_keyword: keyword,
                ..Default::default()
            };
            let finder = build_finder(timeout, config);

            let links = finder.find_lunch_links(&url).await.unwrap_or_else(|e| {
                log::error!("Error fetching links: {}", e);
                process::exit(1);
            });

            if links.is_empty() {
                println!("No candidate links on {}.", url);
            } else {
                for (i, link) in links.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, link);
                }
            }
        }
    }
}
