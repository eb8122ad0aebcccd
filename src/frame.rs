use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::{analyze_packet, Error, Result, ETH_HDR_LEN, MAGIC_ID, PADDING_LEN, PULSE_LEN};

/// IEEE 802 local experimental EtherType, used for raw L2 pulses.
pub const ETH_P_ZAK: u16 = 0x88B5;

/// Magic written into malformed frames.
pub const DISSONANT_MAGIC: u32 = 0xDEAD_BEEF;

/// Ethernet header. 14 bytes on wire: dst(6) + src(6) + ethertype(2).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dst: [u8; 6],
    pub src: [u8; 6],
    pub ethertype: u16,
}

impl Default for EthernetHeader {
    fn default() -> Self {
        Self {
            dst: [0xFF; 6],
            src: [0; 6],
            ethertype: ETH_P_ZAK,
        }
    }
}

/// Ways a generated frame can deviate from a valid pulse
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dissonance {
    WrongMagic,
    WrongSize,
    Both,
}

impl Dissonance {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "wrong-magic" => Some(Dissonance::WrongMagic),
            "wrong-size" => Some(Dissonance::WrongSize),
            "both" => Some(Dissonance::Both),
            _ => None,
        }
    }
}

/// A pulse frame as laid out on the wire
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PulseFrame {
    pub eth: EthernetHeader,
    pub magic: u32,
    pub padding: [u8; PADDING_LEN],
}

impl Default for PulseFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseFrame {
    /// A valid pulse with default header and zero padding.
    pub fn new() -> Self {
        Self {
            eth: EthernetHeader::default(),
            magic: MAGIC_ID,
            padding: [0u8; PADDING_LEN],
        }
    }

    pub fn with_header(mut self, eth: EthernetHeader) -> Self {
        self.eth = eth;
        self
    }

    pub fn with_magic(mut self, magic: u32) -> Self {
        self.magic = magic;
        self
    }

    pub fn with_padding(mut self, padding: [u8; PADDING_LEN]) -> Self {
        self.padding = padding;
        self
    }

    /// Fills the padding with random bytes. Receivers must ignore it.
    pub fn with_random_padding<R: rand::Rng>(mut self, rng: &mut R) -> Self {
        rng.fill(&mut self.padding[..]);
        self
    }

    /// Encode the frame into its 64-byte wire form
    pub fn encode(&self) -> [u8; PULSE_LEN] {
        let mut buf = [0u8; PULSE_LEN];
        buf[..6].copy_from_slice(&self.eth.dst);
        buf[6..12].copy_from_slice(&self.eth.src);
        BigEndian::write_u16(&mut buf[12..ETH_HDR_LEN], self.eth.ethertype);
        BigEndian::write_u32(&mut buf[ETH_HDR_LEN..ETH_HDR_LEN + 4], self.magic);
        buf[ETH_HDR_LEN + 4..].copy_from_slice(&self.padding);
        buf
    }

    /// Decode an admitted frame. Anything the classifier rejects is an error.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if !analyze_packet(data) {
            return Err(Error::NotAPulse { len: data.len() });
        }

        let mut cursor = Cursor::new(data);
        let mut eth = EthernetHeader::default();
        cursor.read_exact(&mut eth.dst)?;
        cursor.read_exact(&mut eth.src)?;
        eth.ethertype = cursor.read_u16::<BigEndian>()?;
        let magic = cursor.read_u32::<BigEndian>()?;
        let mut padding = [0u8; PADDING_LEN];
        cursor.read_exact(&mut padding)?;

        Ok(Self {
            eth,
            magic,
            padding,
        })
    }

    /// Build a malformed frame for exercising the reject path.
    pub fn dissonant(kind: Dissonance) -> Vec<u8> {
        match kind {
            Dissonance::WrongMagic => Self::new().with_magic(DISSONANT_MAGIC).encode().to_vec(),
            Dissonance::WrongSize => {
                let mut buf = Self::new().encode().to_vec();
                buf.push(0);
                buf
            }
            Dissonance::Both => {
                let mut buf = [0u8; 8];
                BigEndian::write_u32(&mut buf[..4], DISSONANT_MAGIC);
                BigEndian::write_u32(&mut buf[4..], DISSONANT_MAGIC);
                buf.to_vec()
            }
        }
    }
}
