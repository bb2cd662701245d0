use std::fmt::Write as _;

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for the serve-angle random number generator.
///
/// Two games created with the same [`ArenaConfig`](crate::ArenaConfig) and
/// seed serve identically, which keeps fitness evaluation reproducible.
///
/// Serialized as a 16-character lowercase hex string.
///
/// # Example
///
/// ```
/// use pongevo_engine::ServeSeed;
/// use rand::Rng as _;
///
/// let seed: ServeSeed = rand::rng().random();
/// let json = serde_json::to_string(&seed).unwrap();
/// assert_eq!(json.len(), 18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServeSeed(u64);

impl ServeSeed {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a child seed from this seed and a list of coordinates.
    ///
    /// The same inputs always give the same seed, and nearby inputs give
    /// unrelated seeds (splitmix64 finalizer).
    #[must_use]
    pub fn derive(self, coordinates: &[u64]) -> Self {
        let mut state = self.0;
        for &c in coordinates {
            state = splitmix64(state ^ splitmix64(c));
        }
        Self(state)
    }
}

impl From<u64> for ServeSeed {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl Serialize for ServeSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(16);
        write!(&mut hex_str, "{:016x}", self.0).unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for ServeSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 16 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 16 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u64::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num))
    }
}

impl Distribution<ServeSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ServeSeed {
        ServeSeed(rng.random())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_value_serialization() {
        let seed = ServeSeed::new(0x0123_4567_89ab_cdef);
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, "\"0123456789abcdef\"");
        let back: ServeSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seed);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let result: Result<ServeSeed, _> = serde_json::from_str("\"abc\"");
        assert!(result.is_err());
        let result: Result<ServeSeed, _> = serde_json::from_str("\"zzzzzzzzzzzzzzzz\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_derive_is_stable_and_spreads() {
        let base = ServeSeed::new(42);
        assert_eq!(base.derive(&[1, 2, 3]), base.derive(&[1, 2, 3]));
        assert_ne!(base.derive(&[1, 2, 3]), base.derive(&[1, 3, 2]));
        assert_ne!(base.derive(&[0, 0, 1]), base.derive(&[0, 1, 0]));
    }
}
