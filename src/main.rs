use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;

use leaderboard::downloader::{export_view, to_json};
use leaderboard::render::render_view;
use leaderboard::{Filters, MetricFilter, Session, sample_records};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "leaderboard")]
#[command(about = "Rank managers and employees from a performance spreadsheet", long_about = None)]
#[command(version)]
struct Cli {
    /// Spreadsheet to load (csv, xlsx, xls, xlsb, ods)
    #[arg(required_unless_present = "sample")]
    file: Option<PathBuf>,

    /// Use the built-in sample data instead of a file
    #[arg(long, conflicts_with = "file")]
    sample: bool,

    /// Only show this manager
    #[arg(long)]
    manager: Option<String>,

    /// Metric key to rank by, or "all" for the total score
    #[arg(long, default_value = "all")]
    metric: MetricFilter,

    /// Output format for the leaderboard
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write the leaderboard to this file (csv, xlsx or json)
    #[arg(long)]
    export: Option<PathBuf>,

    /// Keep a prompt open to change filters and reload data
    #[arg(short, long)]
    interactive: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut session = Session::new();
    if cli.sample {
        session.replace(sample_records());
    } else if let Some(path) = &cli.file {
        session.ingest_file(path)?;
    }

    let mut filters = Filters::new(cli.manager.as_deref(), cli.metric);
    let view = session.recompute(&filters);

    match cli.format {
        OutputFormat::Text => print!("{}", render_view(&view)),
        OutputFormat::Json => println!("{}", to_json(&view)?),
    }
    if let Some(path) = &cli.export {
        export_view(&view, path)?;
    }

    if cli.interactive {
        run_prompt(&mut session, &mut filters)?;
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  q: Quit");
    println!("  show: Print the leaderboard again");
    println!("  managers: List known managers");
    println!("  manager <name>|all: Filter to one manager or show all");
    println!("  metric <key>|all: Rank by mobileSales, fiberSales, promoter, videoPackage or total");
    println!("  load <file>: Replace the data with another spreadsheet");
    println!("  export <file>: Write the current leaderboard (csv, xlsx, json)");
}

fn run_prompt(session: &mut Session, filters: &mut Filters) -> io::Result<()> {
    let mut status = String::from("ok");

    loop {
        print!(
            "({}) [{} | {}] > ",
            status,
            filters.manager.as_deref().unwrap_or("All Managers"),
            filters.metric.label()
        );
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        // Only filter and data changes trigger a re-render
        let mut changed = false;
        match command {
            "" => {
                status = String::from("invalid command");
            }
            "q" | "quit" => break,
            "help" => {
                print_help();
                status = String::from("ok");
            }
            "show" => {
                changed = true;
                status = String::from("ok");
            }
            "managers" => {
                for manager in session.managers() {
                    println!("  {}", manager);
                }
                status = String::from("ok");
            }
            "manager" => {
                filters.manager = session.select_manager(arg);
                if let Some(manager) = filters
                    .manager
                    .as_deref()
                    .filter(|m| !session.has_manager(m))
                {
                    log::warn!("manager {:?} is not in the current data", manager);
                }
                changed = true;
                status = String::from("ok");
            }
            "metric" => match arg.parse::<MetricFilter>() {
                Ok(metric) => {
                    filters.metric = metric;
                    changed = true;
                    status = String::from("ok");
                }
                Err(e) => status = e.to_string(),
            },
            "load" => match session.ingest_file(arg) {
                Ok(count) => {
                    // A manager that no longer exists would hide everything
                    if filters
                        .manager
                        .as_deref()
                        .is_some_and(|m| !session.has_manager(m))
                    {
                        filters.manager = None;
                    }
                    changed = true;
                    status = format!("loaded {} records", count);
                }
                Err(e) => status = format!("load failed: {}", e),
            },
            "export" => match export_view(&session.recompute(filters), arg) {
                Ok(()) => status = format!("exported to {}", arg),
                Err(e) => status = format!("export failed: {}", e),
            },
            _ => {
                status = String::from("invalid command");
            }
        }

        if changed {
            print!("{}", render_view(&session.recompute(filters)));
        }
    }

    Ok(())
}
