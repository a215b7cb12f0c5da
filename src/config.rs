use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use tracing::Level;

/// Regular-expression routed HTTP server.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:4221")]
    pub addr: SocketAddr,

    /// Seconds an idle connection may wait for the next request. 0 disables the timeout.
    #[arg(long, default_value_t = 10)]
    pub read_timeout: u64,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl Config {
    pub fn read_timeout(&self) -> Option<Duration> {
        match self.read_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
