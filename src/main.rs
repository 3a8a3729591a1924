use clap::Parser;
use std::env;

use fire_corpus::api::{self, Cli};
use fire_corpus::logging::init_logger;

#[tokio::main]
async fn main() {
    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            init_logger("fire_corpus=info");
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Some("report") => {
            init_logger("fire_corpus=warn");
            // "report" stands in for the binary name.
            let cli = Cli::parse_from(raw_args.iter().skip(1));
            match api::run_report(&cli) {
                Ok(out) => println!("{out}"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("Usage: cargo run -- serve [port]");
            eprintln!("       cargo run -- report [--help | flags]");
            std::process::exit(1);
        }
    }
}
