use clap::Parser;
use station_enricher::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(commands::run(args));

    match result {
        Ok(()) => {
            // Success - the summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Station Enricher - Petrol Station Metadata Pipeline");
    println!("===================================================");
    println!();
    println!("Enrich scraped Jamaican petrol station listings with standardized");
    println!("coordinates, contact details, opening hours, and ratings from a");
    println!("place-search provider, with an auditable report for every run.");
    println!();
    println!("USAGE:");
    println!("    station-enricher <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    enrich      Run the enrichment pipeline over a listings file");
    println!("    report      Inspect persisted run metadata");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Enrich a scraped listings file:");
    println!("    station-enricher enrich --input listings.json --output ./runs");
    println!();
    println!("    # Enrich with imagery capture and a smaller chunk size:");
    println!("    station-enricher enrich --input listings.json --capture-imagery \\");
    println!("                            --chunk-size 10");
    println!();
    println!("    # List persisted runs:");
    println!("    station-enricher report --output ./runs");
    println!();
    println!("    # Full detail for one run:");
    println!("    station-enricher report --run-id run-20260807-120000 --detailed");
    println!();
    println!("For detailed help on any command, use:");
    println!("    station-enricher <COMMAND> --help");
}
