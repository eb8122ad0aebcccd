use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;
use zak_pulse::config::HarnessConfig;
use zak_pulse::generator::PulseSender;
use zak_pulse::Dissonance;

/// Emit ZAK pulses over UDP.
#[derive(Debug, Parser)]
struct Opt {
    /// JSON harness config. Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Destination address for the pulses. Defaults to 127.0.0.1:8080.
    #[arg(short, long)]
    target: Option<SocketAddr>,

    /// Number of pulses to emit. Defaults to 1.
    #[arg(short, long)]
    count: Option<u64>,

    /// Delay between pulses in milliseconds. Defaults to 1000.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Send one malformed pulse instead: wrong-magic, wrong-size or both.
    #[arg(long, value_parser = parse_dissonance)]
    dissonant: Option<Dissonance>,

    /// The log level for traces. opts: (error, warn, info, debug, trace)
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn parse_dissonance(name: &str) -> Result<Dissonance, String> {
    Dissonance::from_name(name).ok_or_else(|| format!("unknown dissonance: {name}"))
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();
    tracing_subscriber::fmt().with_max_level(opt.log_level).init();

    let mut cfg = HarnessConfig::load(opt.config.as_deref())?.sender;
    if let Some(target) = opt.target {
        cfg.target = target;
    }
    if let Some(count) = opt.count {
        cfg.count = count;
    }
    if let Some(interval_ms) = opt.interval_ms {
        cfg.interval_ms = interval_ms;
    }

    let sender = PulseSender::bind(&cfg)?;
    println!("🌀 ZAK Pulse - emitting to {}", sender.target());

    match opt.dissonant {
        Some(kind) => {
            let sent = sender.send_dissonant(kind)?;
            println!("✅ Sent DISSONANT pulse ({:?}, {} bytes)", kind, sent);
        }
        None => {
            let total = sender.run(cfg.count, cfg.interval())?;
            println!("✅ Sent {} RESONANT pulse(s), {} bytes", cfg.count, total);
        }
    }

    Ok(())
}
