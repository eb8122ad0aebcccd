use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::analyze_packet;

/// Result of timing a batch of admission checks
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Measurement {
    pub iterations: u64,
    pub elapsed: Duration,
    /// Frame size used for the bits-per-second figure.
    pub frame_len: usize,
}

impl Measurement {
    pub fn ns_per_op(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.elapsed.as_nanos() as f64 / self.iterations as f64
    }

    /// Packets per second. Zero if nothing was timed.
    pub fn pps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.iterations as f64 / secs
    }

    pub fn bps(&self) -> f64 {
        self.pps() * self.frame_len as f64 * 8.0
    }

    pub fn gbps(&self) -> f64 {
        self.bps() / 1_000_000_000.0
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Iterations:   {}", self.iterations)?;
        writeln!(f, "  Total Time:   {:?}", self.elapsed)?;
        writeln!(f, "  Average Time: {:.2} ns/op", self.ns_per_op())?;
        writeln!(f, "  Throughput:   {:.2} Million PPS", self.pps() / 1_000_000.0)?;
        write!(f, "  Line Rate:    {:.2} Gbps", self.gbps())
    }
}

/// Run the classifier `iterations` times over `packet`.
pub fn measure(packet: &[u8], iterations: u64) -> Measurement {
    let start = Instant::now();
    for _ in 0..iterations {
        black_box(analyze_packet(black_box(packet)));
    }
    Measurement {
        iterations,
        elapsed: start.elapsed(),
        frame_len: packet.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PulseFrame, PULSE_LEN};

    #[test]
    fn test_rates() {
        let m = Measurement {
            iterations: 1_000_000,
            elapsed: Duration::from_secs(1),
            frame_len: PULSE_LEN,
        };
        assert_eq!(m.pps(), 1_000_000.0);
        assert_eq!(m.ns_per_op(), 1000.0);
        assert_eq!(m.bps(), 512_000_000.0);
        assert!((m.gbps() - 0.512).abs() < 1e-9);
    }

    #[test]
    fn test_zero_elapsed() {
        let m = Measurement {
            iterations: 0,
            elapsed: Duration::ZERO,
            frame_len: PULSE_LEN,
        };
        assert_eq!(m.pps(), 0.0);
        assert_eq!(m.ns_per_op(), 0.0);
        assert_eq!(m.bps(), 0.0);
    }

    #[test]
    fn test_measure() {
        let packet = PulseFrame::new().encode();
        let m = measure(&packet, 1000);
        assert_eq!(m.iterations, 1000);
        assert_eq!(m.frame_len, PULSE_LEN);
        assert!(m.to_string().contains("Million PPS"));
    }
}
