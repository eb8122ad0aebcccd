use std::fmt;

use crate::{
    analyze_packet, PulseFrame, MAGIC_ID, MAGIC_OFFSET, MIN_HEADER_LEN, PADDING_LEN, PULSE_LEN,
};

/// A fixed input and the decision the classifier must reach for it
#[derive(Clone, Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub packet: Vec<u8>,
    pub expected: bool,
}

impl Scenario {
    pub fn new(name: &'static str, packet: Vec<u8>, expected: bool) -> Self {
        Self {
            name,
            packet,
            expected,
        }
    }

    /// The reference scenarios every build must satisfy.
    pub fn standard() -> Vec<Scenario> {
        let zero_header = PulseFrame::new().with_header(crate::EthernetHeader {
            dst: [0; 6],
            src: [0; 6],
            ethertype: 0,
        });

        // Magic cut off one byte early.
        let mut short_header = vec![0u8; MIN_HEADER_LEN - 1];
        short_header[MAGIC_OFFSET..].copy_from_slice(&MAGIC_ID.to_be_bytes()[..3]);

        vec![
            Scenario::new("valid pulse", zero_header.encode().to_vec(), true),
            Scenario::new("oversized frame", vec![0u8; PULSE_LEN + 1], false),
            Scenario::new(
                "wrong magic",
                zero_header.clone().with_magic(0xDEAD_BEEF).encode().to_vec(),
                false,
            ),
            Scenario::new("empty frame", Vec::new(), false),
            Scenario::new(
                "non-zero padding",
                zero_header
                    .clone()
                    .with_padding([0xA5; PADDING_LEN])
                    .encode()
                    .to_vec(),
                true,
            ),
            Scenario::new("short header", short_header, false),
        ]
    }

    pub fn check(&self) -> Outcome {
        Outcome {
            name: self.name,
            expected: self.expected,
            actual: analyze_packet(&self.packet),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub name: &'static str,
    pub expected: bool,
    pub actual: bool,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

fn verdict_word(admitted: bool) -> &'static str {
    if admitted {
        "accepted"
    } else {
        "dropped"
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed() { "PASS" } else { "FAIL" };
        write!(
            f,
            "{status}: {} (expected {}, got {})",
            self.name,
            verdict_word(self.expected),
            verdict_word(self.actual)
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(Outcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{outcome}")?;
        }
        let passed = self.outcomes.iter().filter(|o| o.passed()).count();
        write!(f, "{passed}/{} scenarios passed", self.outcomes.len())
    }
}

pub fn run(scenarios: &[Scenario]) -> Report {
    Report {
        outcomes: scenarios.iter().map(Scenario::check).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scenarios_pass() {
        let report = run(&Scenario::standard());
        assert_eq!(report.outcomes.len(), 6);
        assert!(report.all_passed(), "{report}");
        assert_eq!(report.failures().count(), 0);
    }

    #[test]
    fn test_valid_pulse_bytes() {
        let scenarios = Scenario::standard();
        let mut expected = vec![0u8; 14];
        expected.extend_from_slice(&[0x5A, 0x41, 0x4B, 0x00]);
        expected.extend_from_slice(&[0u8; 46]);
        assert_eq!(scenarios[0].packet, expected);
    }

    #[test]
    fn test_short_header_bytes() {
        let short = &Scenario::standard()[5];
        assert_eq!(short.packet.len(), MIN_HEADER_LEN - 1);
        assert_eq!(&short.packet[MAGIC_OFFSET..], &[0x5A, 0x41, 0x4B]);
        assert!(!short.expected);
        assert!(short.check().passed());
    }

    #[test]
    fn test_failure_reported() {
        let report = run(&[Scenario::new("inverted", vec![0u8; 3], true)]);
        assert!(!report.all_passed());
        let failure = report.failures().next().unwrap();
        assert_eq!(failure.name, "inverted");
        assert_eq!(
            failure.to_string(),
            "FAIL: inverted (expected accepted, got dropped)"
        );
        assert!(report.to_string().ends_with("0/1 scenarios passed"));
    }
}
