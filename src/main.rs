use clap::{CommandFactory, Parser};
use station_wx::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and usage examples when no subcommand is provided
fn show_help_and_commands() {
    println!("station-wx - Airport station weather log");
    println!("========================================");
    println!();
    println!("Decode METAR/SPECI reports into structured records and keep them,");
    println!("with daily forecasts and rain events, in a local SQLite database.");
    println!();

    let _ = Args::command().print_help();
    println!();
    println!();
    println!("EXAMPLES:");
    println!("    # Decode and store a report observed today:");
    println!("    station-wx decode METAR VVCS 121230Z 03005G12KT 6000 -RA BKN012 18/15");
    println!();
    println!("    # Decode against a past date without storing it:");
    println!("    station-wx decode --date 2024-07-12 --no-store VVCS 121230Z 03005KT CAVOK 30/24");
    println!();
    println!("    # Import a file of reports, one per line:");
    println!("    station-wx import reports.txt --date 2024-07-31");
    println!();
    println!("    # Log a rain event and chart the last 30 days:");
    println!("    station-wx rain add --time 12:06 --level light --code -RA");
    println!("    station-wx rain list");
    println!();
    println!("For detailed help on any command, use:");
    println!("    station-wx <COMMAND> --help");
}
