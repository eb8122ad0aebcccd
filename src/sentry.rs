//! Ingress filter: applies the admission check to a received frame at each
//! encapsulation a pulse may arrive in.

use crate::{analyze_packet, ETH_HDR_LEN, PULSE_LEN};

const IPV4_HDR_LEN: usize = 20;
const UDP_HDR_LEN: usize = 8;

/// Where the 64-byte pulse sits inside a received frame
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Encapsulation {
    /// Carried as a UDP datagram payload over IPv4 without options.
    Udp,
    /// The frame itself is the pulse.
    Ethernet,
}

impl Encapsulation {
    #[inline]
    pub const fn offset(self) -> usize {
        match self {
            Encapsulation::Udp => ETH_HDR_LEN + IPV4_HDR_LEN + UDP_HDR_LEN,
            Encapsulation::Ethernet => 0,
        }
    }

    /// The candidate pulse window, if the frame is long enough to hold one.
    #[inline]
    pub fn window(self, frame: &[u8]) -> Option<&[u8]> {
        let start = self.offset();
        frame.get(start..start + PULSE_LEN)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass(Encapsulation),
    Drop,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        matches!(self, Verdict::Pass(_))
    }
}

/// Action code handed back to an XDP hook. Values match the kernel's
/// `enum xdp_action`.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum XdpAction {
    Aborted = 0,
    Drop = 1,
    Pass = 2,
}

impl XdpAction {
    /// Map a filtering attempt to an action. Failing to obtain a verdict at
    /// all aborts instead of dropping.
    #[inline]
    pub fn from_outcome<E>(outcome: std::result::Result<Verdict, E>) -> Self {
        match outcome {
            Ok(verdict) => Self::from(verdict),
            Err(_) => XdpAction::Aborted,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            XdpAction::Aborted => "XDP_ABORTED",
            XdpAction::Drop => "XDP_DROP",
            XdpAction::Pass => "XDP_PASS",
        }
    }
}

impl From<Verdict> for XdpAction {
    #[inline]
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass(_) => XdpAction::Pass,
            Verdict::Drop => XdpAction::Drop,
        }
    }
}

/// Stateless per-frame filter. Frames without a pulse at any probed
/// encapsulation are dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sentry {
    probes: Vec<Encapsulation>,
}

impl Default for Sentry {
    fn default() -> Self {
        Self::new(&[Encapsulation::Udp, Encapsulation::Ethernet])
    }
}

impl Sentry {
    pub fn new(probes: &[Encapsulation]) -> Self {
        Self {
            probes: probes.to_vec(),
        }
    }

    pub fn probes(&self) -> &[Encapsulation] {
        &self.probes
    }

    /// First matching probe wins.
    #[inline]
    pub fn verdict(&self, frame: &[u8]) -> Verdict {
        for &encap in &self.probes {
            if let Some(window) = encap.window(frame) {
                if analyze_packet(window) {
                    return Verdict::Pass(encap);
                }
            }
        }
        Verdict::Drop
    }
}
