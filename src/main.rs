use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use record_log::{diagnostics, CallSite, Config, LogManager, StdoutSink};

/// Write human-readable log lines to the console and rotating text files
#[derive(Parser, Debug)]
#[command(name = "record-log")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log a message
    Write {
        /// Message text; omit to log only the call site
        message: Option<String>,

        /// Tag shown in brackets (defaults to the configured tag)
        #[arg(short, long)]
        tag: Option<String>,

        /// Also append to the log file
        #[arg(short, long)]
        save: bool,

        /// Function name to report
        #[arg(long, default_value = "main")]
        function: String,

        /// File name to report
        #[arg(long, default_value = "record-log")]
        file: String,

        /// Line number to report
        #[arg(long, default_value_t = 0)]
        line: u32,
    },
    /// Delete all log files and recreate the log directory
    Reset,
    /// Print the log directory
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    diagnostics::init()?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let manager = LogManager::new(&config, Arc::new(StdoutSink));

    match cli.command {
        Commands::Write {
            message,
            tag,
            save,
            function,
            file,
            line,
        } => {
            let call_site = CallSite::new(function, file, line);
            manager.write_log(message.as_deref(), tag.as_deref(), save, &call_site);
        }
        Commands::Reset => {
            manager.reset_log_directory();
            println!("Reset {}", manager.log_directory().display());
        }
        Commands::Path => {
            println!("{}", manager.log_directory().display());
        }
    }

    Ok(())
}
