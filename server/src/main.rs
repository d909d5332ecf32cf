use clap::Parser;
use yorisoi_lib::{run, Cli};

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("yorisoi: {}", e);
        std::process::exit(1);
    }
}
