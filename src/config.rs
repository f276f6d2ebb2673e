use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use clap::Parser;

/// Startup settings. Every flag can also come from the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "schoold")]
#[command(version, about = "School admin dashboard backend", long_about = None)]
pub struct Config {
    /// TCP port to listen on
    #[arg(long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    /// Interface address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Log filter directive, e.g. `info` or `schoold=debug,tower_http=debug`
    #[arg(long, env = "SCHOOLD_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("invalid host address: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
