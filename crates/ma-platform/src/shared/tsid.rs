//! TSID Generator
//!
//! Time-sorted 64-bit identifiers rendered as 13-character Crockford Base32
//! strings, so ids sort lexicographically in creation order.

use std::sync::atomic::{AtomicU16, Ordering};
use chrono::Utc;
use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U)
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const ENCODED_LEN: usize = 13;

static COUNTER: AtomicU16 = AtomicU16::new(0);

pub struct TsidGenerator;

impl TsidGenerator {
    /// Layout: 42 bits of epoch millis | 10 random bits | 12 counter bits
    pub fn generate() -> String {
        let millis = Utc::now().timestamp_millis() as u64;
        let counter = COUNTER.fetch_add(1, Ordering::SeqCst) as u64;
        let random: u64 = rand::thread_rng().gen_range(0..1024);

        let tsid = ((millis & 0x3FF_FFFF_FFFF) << 22) | (random << 12) | (counter & 0xFFF);
        encode(tsid)
    }

    /// Numeric value of a TSID string, `None` if malformed
    pub fn to_long(tsid: &str) -> Option<i64> {
        decode(tsid).map(|v| v as i64)
    }

    pub fn from_long(value: i64) -> String {
        encode(value as u64)
    }
}

fn encode(mut value: u64) -> String {
    let mut out = [b'0'; ENCODED_LEN];
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x1F) as usize];
        value >>= 5;
    }
    out.iter().map(|&b| b as char).collect()
}

fn decode(s: &str) -> Option<u64> {
    if s.len() != ENCODED_LEN {
        return None;
    }

    s.chars().try_fold(0u64, |acc, c| {
        let upper = c.to_ascii_uppercase() as u8;
        let digit = ALPHABET.iter().position(|&a| a == upper)? as u64;
        Some((acc << 5) | digit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length() {
        assert_eq!(TsidGenerator::generate().len(), 13);
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(ids.insert(TsidGenerator::generate()), "Duplicate TSID generated");
        }
    }

    #[test]
    fn test_long_conversion() {
        let id = TsidGenerator::generate();
        let num = TsidGenerator::to_long(&id).unwrap();
        assert_eq!(TsidGenerator::from_long(num), id);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(TsidGenerator::to_long("short").is_none());
        assert!(TsidGenerator::to_long("0000000000OOO").is_none());
    }

    #[test]
    fn test_sortability() {
        let id1 = TsidGenerator::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = TsidGenerator::generate();
        assert!(id1 < id2, "TSIDs should be lexicographically sortable");
    }
}
