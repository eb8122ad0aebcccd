use std::net::{SocketAddr, UdpSocket};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::SenderConfig;
use crate::{Dissonance, PulseFrame, Result};

/// Emits pulses as UDP datagram payloads
#[derive(Debug)]
pub struct PulseSender {
    sock: UdpSocket,
    target: SocketAddr,
}

impl PulseSender {
    pub fn bind(cfg: &SenderConfig) -> Result<Self> {
        let sock = UdpSocket::bind(cfg.bind)?;
        sock.connect(cfg.target)?;
        debug!(local = %sock.local_addr()?, target = %cfg.target, "pulse sender ready");
        Ok(Self {
            sock,
            target: cfg.target,
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.sock.local_addr()?)
    }

    pub fn send_raw(&self, payload: &[u8]) -> Result<usize> {
        Ok(self.sock.send(payload)?)
    }

    /// Send one valid pulse with random padding.
    pub fn send_pulse(&self) -> Result<usize> {
        let frame = PulseFrame::new().with_random_padding(&mut rand::thread_rng());
        let sent = self.send_raw(&frame.encode())?;
        debug!(bytes = sent, "pulse emitted");
        Ok(sent)
    }

    pub fn send_dissonant(&self, kind: Dissonance) -> Result<usize> {
        let sent = self.send_raw(&PulseFrame::dissonant(kind))?;
        debug!(bytes = sent, ?kind, "dissonant pulse emitted");
        Ok(sent)
    }

    /// Emit `count` pulses spaced by `interval`. Returns total bytes sent.
    pub fn run(&self, count: u64, interval: Duration) -> Result<u64> {
        let mut total = 0u64;
        for seq in 0..count {
            total += self.send_pulse()? as u64;
            if seq + 1 < count {
                thread::sleep(interval);
            }
        }
        info!(count, bytes = total, target = %self.target, "pulse train complete");
        Ok(total)
    }
}
