//! Command-line interface for quarto-api.

use clap::Parser;

/// Quarto Web API - serves one in-memory game over HTTP
#[derive(Parser, Debug)]
#[command(name = "quarto-api")]
#[command(about = "HTTP front end for the Quarto rules engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "8000")]
    pub port: u16,

    /// Player who makes the opening selection (1 or 2)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=2))]
    pub starting_player: u8,
}
