use clap::Parser;
use pattern_mux::Config;
use tracing::error;

fn main() {
    let config = Config::parse();
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    if let Err(err) = pattern_mux::run(&config) {
        error!(?err);
        std::process::exit(1);
    }
}
