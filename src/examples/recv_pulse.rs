use clap::Parser;
use std::net::{SocketAddr, UdpSocket};
use tracing::{debug, error, info, warn, Level};
use zak_pulse::{Encapsulation, PulseFrame, Sentry, Verdict, XdpAction};

/// Target for per-datagram audit events.
const AUDIT: &str = "zak_pulse::audit";
const ADAPTER_ID: &str = "zak-ingress-sentry-v1";

/// Receive datagrams and run each one through the admission check.
#[derive(Debug, Parser)]
struct Opt {
    /// Address to receive pulses on.
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// The log level for traces. opts: (error, warn, info, debug, trace)
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();
    tracing_subscriber::fmt().with_max_level(opt.log_level).init();

    let sock = UdpSocket::bind(opt.listen)?;
    info!(addr = %opt.listen, "listening for pulses");

    // The datagram payload is the whole pulse layout.
    let sentry = Sentry::new(&[Encapsulation::Ethernet]);
    let mut buf = vec![0u8; 65536];
    let mut admitted = 0u64;
    let mut rejected = 0u64;

    for correlation_id in 1u64.. {
        let received = sock.recv_from(&mut buf);
        let outcome = received.map(|(size, src)| (size, src, sentry.verdict(&buf[..size])));
        let action = XdpAction::from_outcome(outcome.as_ref().map(|&(_, _, verdict)| verdict));

        match outcome {
            Ok((size, src, verdict)) => {
                debug!(
                    target: AUDIT,
                    adapter = ADAPTER_ID,
                    correlation_id,
                    event = "INGESTED",
                    %src,
                    size
                );
                if let Verdict::Pass(_) = verdict {
                    admitted += 1;
                    // Decoding only succeeds for admitted frames.
                    if let Ok(frame) = PulseFrame::decode(&buf[..size]) {
                        info!(
                            target: AUDIT,
                            adapter = ADAPTER_ID,
                            correlation_id,
                            event = "EMITTED",
                            action = action.name(),
                            %src,
                            admitted,
                            ethertype = frame.eth.ethertype,
                            "valid pulse, passing"
                        );
                    }
                } else {
                    rejected += 1;
                    warn!(
                        target: AUDIT,
                        adapter = ADAPTER_ID,
                        correlation_id,
                        event = "EMITTED",
                        action = action.name(),
                        %src,
                        size,
                        rejected,
                        "no valid pulse, dropping"
                    );
                }
            }
            Err(e) => {
                error!(
                    target: AUDIT,
                    adapter = ADAPTER_ID,
                    correlation_id,
                    event = "REJECTED",
                    action = action.name(),
                    %e,
                    "recv error"
                );
            }
        }
    }

    Ok(())
}
