use clap::Parser;
use std::process;
use wra_station_config::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the command with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to listen for CTRL+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        // Documents are written only at the end of a command, so an interrupted
        // command leaves every file as it was
        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, stopping...");
                Err(wra_station_config::Error::processing_interrupted(
                    "Command interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("wra-config - IEA Task 43 WRA Station Configuration");
    println!("==================================================");
    println!();
    println!("Build wind resource assessment station documents from logger CSV files");
    println!("and export them as IEA Task 43 schema-compliant JSON.");
    println!();
    println!("USAGE:");
    println!("    wra-config <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    init        Create a new document");
    println!("    import      Import a logger CSV file as measurement points");
    println!("    inspect     Show what would be inferred from a CSV file");
    println!("    edit        Bulk edit or remove measurement points");
    println!("    validate    Check documents for required fields and schema compliance");
    println!("    export      Validate and write the export file");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Start a document with one met mast:");
    println!("    wra-config init station.json --author \"Jane Analyst\" \\");
    println!("                    --organisation \"Example Wind Ltd\" \\");
    println!("                    --location-name \"North Ridge Mast\" --latitude 56.12 --longitude -3.45");
    println!();
    println!("    # Import the columns of a logger file:");
    println!("    wra-config import station.json logger.csv --logger LOG-1");
    println!();
    println!("    # Set the height of every wind vane, then export:");
    println!("    wra-config edit station.json --type wind_direction --set-height 78");
    println!("    wra-config export station.json --output iea-task43-data.json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    wra-config <COMMAND> --help");
}
