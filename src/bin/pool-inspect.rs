use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;

use loadmon::config::{AddressFamily, PoolConfig};
use loadmon::pool::{
    next_address, next_url, same_server, PoolLoader, RandomState, StaticResolver, SystemResolver,
    UrlPool,
};

#[derive(Parser)]
#[command(name = "pool-inspect")]
#[command(about = "Load a target URL pool and show how requests would spread across it", long_about = None)]
struct Cli {
    /// Single target URL
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    url: Option<String>,

    /// File with one target URL per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Concurrent connections to map onto addresses
    #[arg(short, long, default_value_t = 4)]
    connections: usize,

    /// Random target picks to sample
    #[arg(short = 'n', long, default_value_t = 1000)]
    picks: usize,

    /// Address family to keep (ipv4, ipv6, any)
    #[arg(long, default_value = "ipv4")]
    family: AddressFamily,

    /// Pin a host to an address, like HOST=IP (repeatable)
    #[arg(long = "resolve", value_name = "HOST=IP")]
    resolve: Vec<String>,

    /// Seed for reproducible picks
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Serialize)]
struct Report {
    urls: Vec<UrlReport>,
    picks: BTreeMap<String, usize>,
    /// Index pairs of targets sharing a backend on connection 0.
    shared_backends: Vec<(usize, usize)>,
}

#[derive(Serialize)]
struct UrlReport {
    url: String,
    scheme: &'static str,
    host: String,
    port: u16,
    ssl: bool,
    addresses: Vec<SocketAddr>,
    /// Address used by each connection index.
    connections: Vec<SocketAddr>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut resolver = StaticResolver::new().with_fallback(Arc::new(SystemResolver));
    for entry in &cli.resolve {
        match parse_override(entry) {
            Some((host, ip)) => resolver = resolver.with_host(host, [ip]),
            None => {
                eprintln!("Invalid --resolve {:?}, expected HOST=IP", entry);
                return ExitCode::from(2);
            }
        }
    }

    let config = PoolConfig {
        address_family: cli.family,
        ..PoolConfig::default()
    };
    let loader = PoolLoader::new(&config).with_resolver(Arc::new(resolver));

    let loaded = match (&cli.url, &cli.file) {
        (Some(url), _) => loader.load_one(url),
        (None, Some(path)) => loader.load_file(path),
        (None, None) => unreachable!("clap requires --url or --file"),
    };
    let pool = match loaded {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut rng = match cli.seed {
        Some(seed) => RandomState::seeded(seed),
        None => RandomState::from_entropy(),
    };
    let report = build_report(&pool, cli.connections, cli.picks, &mut rng);

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_override(entry: &str) -> Option<(&str, IpAddr)> {
    let (host, ip) = entry.split_once('=')?;
    Some((host, ip.parse().ok()?))
}

fn build_report(pool: &UrlPool, connections: usize, picks: usize, rng: &mut RandomState) -> Report {
    let urls = pool
        .iter()
        .map(|u| UrlReport {
            url: u.url().to_string(),
            scheme: u.scheme().as_str(),
            host: u.host().to_string(),
            port: u.port(),
            ssl: u.is_ssl(),
            addresses: u.addresses().to_vec(),
            connections: (0..connections).map(|i| next_address(u, i)).collect(),
        })
        .collect();

    let mut counts = BTreeMap::new();
    for _ in 0..picks {
        *counts.entry(next_url(pool, rng).url().to_string()).or_insert(0) += 1;
    }

    let mut shared_backends = Vec::new();
    for (i, a) in pool.iter().enumerate() {
        for (j, b) in pool.iter().enumerate().skip(i + 1) {
            if same_server(a, b, 0) {
                shared_backends.push((i, j));
            }
        }
    }

    Report {
        urls,
        picks: counts,
        shared_backends,
    }
}
