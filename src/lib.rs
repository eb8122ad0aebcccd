pub mod config;
pub mod error;
pub mod frame;
pub mod generator;
pub mod sentry;
pub mod throughput;
pub mod verify;

pub use error::{Error, Result};
pub use frame::{Dissonance, EthernetHeader, PulseFrame};
pub use sentry::{Encapsulation, Sentry, Verdict, XdpAction};

/// Magic tag carried by every pulse ("ZAK\0").
pub const MAGIC_ID: u32 = 0x5A41_4B00;
/// Total length of a pulse frame on the wire.
pub const PULSE_LEN: usize = 64;
/// Ethernet header length. The magic tag follows it immediately.
pub const ETH_HDR_LEN: usize = 14;
pub const MAGIC_OFFSET: usize = ETH_HDR_LEN;
/// Smallest frame that can hold the magic tag.
pub const MIN_HEADER_LEN: usize = MAGIC_OFFSET + 4;
pub const PADDING_LEN: usize = PULSE_LEN - MIN_HEADER_LEN;

/// Outcome of a single admission check
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Admission {
    Rejected = 0,
    Admitted = 1,
}

impl Admission {
    #[inline]
    pub fn is_admitted(self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

impl From<bool> for Admission {
    #[inline]
    fn from(admitted: bool) -> Self {
        if admitted {
            Admission::Admitted
        } else {
            Admission::Rejected
        }
    }
}

/// Returns `true` iff `packet` is a ZAK pulse: exactly [`PULSE_LEN`] bytes with
/// [`MAGIC_ID`] stored big-endian at [`MAGIC_OFFSET`].
///
/// Never allocates and never panics. Wrong-size frames are rejected without
/// reading the payload.
#[inline]
pub fn analyze_packet(packet: &[u8]) -> bool {
    if packet.len() != PULSE_LEN {
        return false;
    }

    // Bound for the indexed read below. Must hold even if the size policy
    // above is ever relaxed.
    if packet.len() < MIN_HEADER_LEN {
        return false;
    }

    let received_magic = u32::from_be_bytes([
        packet[MAGIC_OFFSET],
        packet[MAGIC_OFFSET + 1],
        packet[MAGIC_OFFSET + 2],
        packet[MAGIC_OFFSET + 3],
    ]);

    received_magic == MAGIC_ID
}

/// Typed form of [`analyze_packet`].
#[inline]
pub fn classify(packet: &[u8]) -> Admission {
    Admission::from(analyze_packet(packet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn packet_with_magic(magic: [u8; 4]) -> [u8; PULSE_LEN] {
        let mut packet = [0u8; PULSE_LEN];
        packet[MAGIC_OFFSET..MIN_HEADER_LEN].copy_from_slice(&magic);
        packet
    }

    #[test]
    fn test_valid_pulse() {
        let packet = packet_with_magic([0x5A, 0x41, 0x4B, 0x00]);
        assert!(analyze_packet(&packet));
        assert_eq!(classify(&packet), Admission::Admitted);
    }

    #[test]
    fn test_invalid_size() {
        let packet = [0u8; 65];
        assert!(!analyze_packet(&packet));
    }

    #[test]
    fn test_invalid_magic() {
        let packet = packet_with_magic([0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(!analyze_packet(&packet));
        assert_eq!(classify(&packet), Admission::Rejected);
    }

    #[test]
    fn test_empty_and_short() {
        assert!(!analyze_packet(&[]));
        assert!(!analyze_packet(&[0x5A, 0x41, 0x4B, 0x00]));
        assert!(!analyze_packet(&[0u8; MIN_HEADER_LEN - 1]));
    }

    #[test]
    fn test_padding_ignored() {
        let mut packet = packet_with_magic([0x5A, 0x41, 0x4B, 0x00]);
        packet[..ETH_HDR_LEN].fill(0xFF);
        packet[MIN_HEADER_LEN..].fill(0xA5);
        assert!(analyze_packet(&packet));
    }

    #[test]
    fn test_magic_is_big_endian() {
        // Little-endian layout of the same constant must not pass.
        let packet = packet_with_magic(MAGIC_ID.to_le_bytes());
        assert!(!analyze_packet(&packet));
    }

    #[test]
    fn test_magic_at_frame_start_rejected() {
        let mut packet = [0u8; PULSE_LEN];
        packet[..4].copy_from_slice(&MAGIC_ID.to_be_bytes());
        assert!(!analyze_packet(&packet));
    }

    #[test]
    fn test_admission_from_bool() {
        assert!(Admission::from(true).is_admitted());
        assert!(!Admission::from(false).is_admitted());
        assert_eq!(Admission::Admitted as u8, 1);
    }

    #[test]
    fn test_shared_buffers_across_threads() {
        let pulse = packet_with_magic([0x5A, 0x41, 0x4B, 0x00]);
        let wrong_magic = packet_with_magic([0xDE, 0xAD, 0xBE, 0xEF]);
        let oversized = [0u8; PULSE_LEN + 1];
        let inputs: [&[u8]; 4] = [&pulse, &wrong_magic, &oversized, &[]];
        let expected: Vec<Admission> = inputs.iter().map(|p| classify(p)).collect();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        (0..1_000)
                            .map(|_| inputs.iter().map(|p| classify(p)).collect::<Vec<_>>())
                            .all(|got| got == expected)
                    })
                })
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap());
            }
        });
        assert_eq!(
            expected,
            vec![
                Admission::Admitted,
                Admission::Rejected,
                Admission::Rejected,
                Admission::Rejected
            ]
        );
    }

    proptest! {
        #[test]
        fn wrong_length_never_admitted(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assume!(bytes.len() != PULSE_LEN);
            prop_assert!(!analyze_packet(&bytes));
        }

        #[test]
        fn wrong_magic_never_admitted(
            mut bytes in proptest::collection::vec(any::<u8>(), PULSE_LEN),
            magic in any::<u32>(),
        ) {
            prop_assume!(magic != MAGIC_ID);
            bytes[MAGIC_OFFSET..MIN_HEADER_LEN].copy_from_slice(&magic.to_be_bytes());
            prop_assert!(!analyze_packet(&bytes));
        }

        #[test]
        fn correct_magic_always_admitted(mut bytes in proptest::collection::vec(any::<u8>(), PULSE_LEN)) {
            bytes[MAGIC_OFFSET..MIN_HEADER_LEN].copy_from_slice(&MAGIC_ID.to_be_bytes());
            prop_assert!(analyze_packet(&bytes));
        }

        #[test]
        fn decision_is_idempotent(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
            prop_assert_eq!(classify(&bytes), classify(&bytes));
        }
    }
}
