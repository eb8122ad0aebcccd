use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use zak_pulse::config::HarnessConfig;
use zak_pulse::throughput::measure;
use zak_pulse::verify::{self, Scenario};
use zak_pulse::{Dissonance, PulseFrame};

/// Check the admission logic against reference scenarios, or benchmark it.
#[derive(Debug, Parser)]
struct Opt {
    /// JSON harness config. Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Time repeated calls instead of verifying.
    #[arg(short, long)]
    bench: bool,

    /// Calls to time per path in bench mode. Defaults to 10000000.
    #[arg(short, long)]
    iterations: Option<u64>,

    /// The log level for traces. opts: (error, warn, info, debug, trace)
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> anyhow::Result<ExitCode> {
    let opt = Opt::parse();
    tracing_subscriber::fmt().with_max_level(opt.log_level).init();

    if opt.bench {
        let cfg = HarnessConfig::load(opt.config.as_deref())?;
        let iterations = opt.iterations.unwrap_or(cfg.bench.iterations);
        run_benchmark(iterations);
        return Ok(ExitCode::SUCCESS);
    }

    println!("--- ZAK LOGIC VERIFICATION ---");
    let report = verify::run(&Scenario::standard());
    println!("{report}");

    if report.all_passed() {
        info!("all scenarios passed");
        Ok(ExitCode::SUCCESS)
    } else {
        for failure in report.failures() {
            error!(scenario = failure.name, "verification failed");
        }
        Ok(ExitCode::FAILURE)
    }
}

fn run_benchmark(iterations: u64) {
    let valid = PulseFrame::new().encode();
    let wrong_magic = PulseFrame::dissonant(Dissonance::WrongMagic);
    let wrong_size = PulseFrame::dissonant(Dissonance::WrongSize);

    println!("--- ZAK LOGIC BENCHMARK ({iterations} iterations) ---");
    for (label, packet) in [
        ("Accept Path (Valid Magic)", &valid[..]),
        ("Reject Path (Invalid Magic)", &wrong_magic[..]),
        ("Reject Path (Invalid Size)", &wrong_size[..]),
    ] {
        let m = measure(packet, iterations);
        println!("\n{label}\n{m}");
    }
    println!("--------------------------------------");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_documented() {
        let cmd = Opt::command();
        cmd.clone().debug_assert();
        for arg in cmd.get_arguments() {
            assert!(arg.get_help().is_some(), "--{} has no help", arg.get_id());
        }
    }
}
