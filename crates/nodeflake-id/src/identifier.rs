use crate::entropy::low_mask;
use crate::error::{Error, Result};
use modular_bitfield::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NODE_BITS: u32 = 16;
pub const TIME_EPOCH_BITS: u32 = 52;
pub const RANDOM_BITS: u32 = 60;

pub const MAX_NODE: u16 = u16::MAX;
pub const MAX_TIME_EPOCH: u64 = low_mask(TIME_EPOCH_BITS);
pub const MAX_RANDOM: u64 = low_mask(RANDOM_BITS);

// hex digits per field, each width rounded up to a whole nibble
const NODE_DIGITS: usize = 4;
const TIME_EPOCH_DIGITS: usize = 13;
const RANDOM_DIGITS: usize = 15;
const COMPACT_LEN: usize = NODE_DIGITS + TIME_EPOCH_DIGITS + RANDOM_DIGITS;
const PRETTY_LEN: usize = COMPACT_LEN + 2;
const SEPARATOR: char = '-';

/// Wire layout of an [`Identifier`].
///
/// Fields fill from the least significant bit of byte 0 upwards, so the 16
/// bytes are the little-endian encoding of [`Identifier::to_u128`].
#[bitfield]
#[derive(Clone, Copy, PartialEq, Eq)]
struct PackedIdentifier {
    random: B60,
    time_epoch: B52,
    node: B16,
}

/// A 128-bit identifier made of a node, a time epoch and a random part.
///
/// The three parts are kept as separate values so each one can be checked
/// against its width on its own. Ordering follows the integer form, which
/// sorts by node first, then time, then random.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    node: u16,
    time_epoch: u64,
    random: u64,
}

impl Identifier {
    /// Builds an identifier, rejecting any part wider than its field.
    pub fn from_parts(node: u16, time_epoch: u64, random: u64) -> Result<Self> {
        if time_epoch > MAX_TIME_EPOCH {
            return Err(Error::FieldOverflow {
                field: "time_epoch",
                value: time_epoch,
                bits: TIME_EPOCH_BITS,
            });
        }
        if random > MAX_RANDOM {
            return Err(Error::FieldOverflow {
                field: "random",
                value: random,
                bits: RANDOM_BITS,
            });
        }
        Ok(Self {
            node,
            time_epoch,
            random,
        })
    }

    /// Builds an identifier, truncating each part to its field width.
    pub fn masked(node: u16, time_epoch: u64, random: u64) -> Self {
        Self {
            node,
            time_epoch: time_epoch & MAX_TIME_EPOCH,
            random: random & MAX_RANDOM,
        }
    }

    pub fn node(&self) -> u16 {
        self.node
    }

    /// Milliseconds since the generator's start epoch, truncated to 52 bits.
    pub fn time_epoch(&self) -> u64 {
        self.time_epoch
    }

    pub fn random(&self) -> u64 {
        self.random
    }

    /// `node << 112 | time_epoch << 60 | random`
    pub fn to_u128(&self) -> u128 {
        (u128::from(self.node) << (TIME_EPOCH_BITS + RANDOM_BITS))
            | (u128::from(self.time_epoch) << RANDOM_BITS)
            | u128::from(self.random)
    }

    pub fn from_u128(value: u128) -> Self {
        Self {
            node: (value >> (TIME_EPOCH_BITS + RANDOM_BITS)) as u16,
            time_epoch: (value >> RANDOM_BITS) as u64 & MAX_TIME_EPOCH,
            random: value as u64 & MAX_RANDOM,
        }
    }

    /// Packed 16-byte form.
    pub fn to_bytes(&self) -> [u8; 16] {
        PackedIdentifier::new()
            .with_random(self.random)
            .with_time_epoch(self.time_epoch)
            .with_node(self.node)
            .into_bytes()
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        let packed = PackedIdentifier::from_bytes(bytes);
        Self {
            node: packed.node(),
            time_epoch: packed.time_epoch(),
            random: packed.random(),
        }
    }

    /// Renders the identifier as hex digits in node, time, random order.
    ///
    /// The compact form is 32 digits. The pretty form separates the fields
    /// with dashes (`4-13-15` digits). Both are lowercase and zero padded.
    pub fn format(&self, pretty: bool) -> String {
        if pretty {
            format!("{:#}", self)
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(
                f,
                "{:04x}{sep}{:013x}{sep}{:015x}",
                self.node,
                self.time_epoch,
                self.random,
                sep = SEPARATOR
            )
        } else {
            write!(
                f,
                "{:04x}{:013x}{:015x}",
                self.node, self.time_epoch, self.random
            )
        }
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identifier")
            .field("node", &self.node)
            .field("time_epoch", &self.time_epoch)
            .field("random", &self.random)
            .finish()
    }
}

impl FromStr for Identifier {
    type Err = Error;

    /// Parses either the compact or the pretty form. Hex digits may be in
    /// either case.
    fn from_str(s: &str) -> Result<Self> {
        if !s.is_ascii() {
            return Err(Error::InvalidFormat(format!("non-ascii input: {s:?}")));
        }

        let (node, time_epoch, random) = match s.len() {
            COMPACT_LEN => (
                &s[..NODE_DIGITS],
                &s[NODE_DIGITS..NODE_DIGITS + TIME_EPOCH_DIGITS],
                &s[NODE_DIGITS + TIME_EPOCH_DIGITS..],
            ),
            PRETTY_LEN => {
                let mut parts = s.split(SEPARATOR);
                match (parts.next(), parts.next(), parts.next(), parts.next()) {
                    (Some(node), Some(time_epoch), Some(random), None)
                        if node.len() == NODE_DIGITS
                            && time_epoch.len() == TIME_EPOCH_DIGITS
                            && random.len() == RANDOM_DIGITS =>
                    {
                        (node, time_epoch, random)
                    }
                    _ => {
                        return Err(Error::InvalidFormat(format!(
                            "expected {NODE_DIGITS}-{TIME_EPOCH_DIGITS}-{RANDOM_DIGITS} groups: {s:?}"
                        )))
                    }
                }
            }
            len => {
                return Err(Error::InvalidFormat(format!(
                    "expected {COMPACT_LEN} or {PRETTY_LEN} characters, got {len}"
                )))
            }
        };

        // every field is an exact number of nibbles, so parsing cannot overflow
        let node = parse_hex(node, "node")? as u16;
        let time_epoch = parse_hex(time_epoch, "time_epoch")?;
        let random = parse_hex(random, "random")?;

        Self::from_parts(node, time_epoch, random)
    }
}

fn parse_hex(digits: &str, field: &str) -> Result<u64> {
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidFormat(format!(
            "{field} is not hexadecimal: {digits:?}"
        )));
    }
    u64::from_str_radix(digits, 16).map_err(|e| Error::InvalidFormat(format!("{field}: {e}")))
}

impl Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Identifier {
        Identifier::from_parts(0x1A2B, 1000, 0x6cc_7763_2227_24a2).unwrap()
    }

    #[test]
    fn compact_form_is_zero_padded_hex() {
        assert_eq!(sample().format(false), "1a2b00000000003e86cc7763222724a2");
        assert_eq!(sample().to_string(), sample().format(false));
        assert_eq!(sample().format(false).len(), 32);
    }

    #[test]
    fn pretty_form_groups_fields() {
        assert_eq!(sample().format(true), "1a2b-00000000003e8-6cc7763222724a2");
        assert_eq!(format!("{:#}", sample()), sample().format(true));
    }

    #[test]
    fn formatting_is_pure() {
        let id = sample();
        assert_eq!(id.format(false), id.format(false));
        assert_eq!(id.format(true), id.format(true));
    }

    #[test]
    fn zero_and_max_render_full_width() {
        let zero = Identifier::from_parts(0, 0, 0).unwrap();
        assert_eq!(zero.format(false), "0".repeat(32));

        let max = Identifier::from_parts(MAX_NODE, MAX_TIME_EPOCH, MAX_RANDOM).unwrap();
        assert_eq!(max.format(false), "f".repeat(32));
        assert_eq!(max.to_u128(), u128::MAX);
    }

    #[test]
    fn parses_both_forms_back() {
        let id = sample();
        assert_eq!(id.format(false).parse::<Identifier>().unwrap(), id);
        assert_eq!(id.format(true).parse::<Identifier>().unwrap(), id);
        assert_eq!(
            "1A2B-00000000003E8-6CC7763222724A2"
                .parse::<Identifier>()
                .unwrap(),
            id
        );
    }

    #[test]
    fn node_boundaries_round_trip() {
        for node in [0, MAX_NODE] {
            let id = Identifier::from_parts(node, 42, 7).unwrap();
            let parsed: Identifier = id.format(false).parse().unwrap();
            assert_eq!(parsed.node(), node);
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn rejects_malformed_input() {
        let cases = [
            "",
            "1a2b",
            "1a2b00000000003e86cc7763222724a",
            "1a2b00000000003e86cc7763222724a2f",
            "1a2b00000000003e86cc7763222724ag",
            "+a2b00000000003e86cc7763222724a2",
            "1a2b000000000003e8-6cc7763222724a2",
            "1a2b-00000000003e8-6cc7763222724a2-",
            "1a2b_00000000003e8_6cc7763222724a2",
            "1a2b-00000000003e86-cc7763222724a2",
            "1a2b-00000000003é-6cc7763222724a2",
        ];
        for case in cases {
            assert!(
                matches!(case.parse::<Identifier>(), Err(Error::InvalidFormat(_))),
                "{case:?} should be rejected"
            );
        }
    }

    #[test]
    fn from_parts_rejects_wide_values() {
        assert_eq!(
            Identifier::from_parts(0, MAX_TIME_EPOCH + 1, 0),
            Err(Error::FieldOverflow {
                field: "time_epoch",
                value: MAX_TIME_EPOCH + 1,
                bits: TIME_EPOCH_BITS,
            })
        );
        assert_eq!(
            Identifier::from_parts(0, 0, u64::MAX),
            Err(Error::FieldOverflow {
                field: "random",
                value: u64::MAX,
                bits: RANDOM_BITS,
            })
        );
    }

    #[test]
    fn masked_truncates_each_field() {
        let id = Identifier::masked(7, u64::MAX, u64::MAX);
        assert_eq!(id.node(), 7);
        assert_eq!(id.time_epoch(), MAX_TIME_EPOCH);
        assert_eq!(id.random(), MAX_RANDOM);
    }

    #[test]
    fn integer_form_places_fields() {
        let id = sample();
        let value = id.to_u128();
        assert_eq!((value >> 112) as u16, 0x1A2B);
        assert_eq!(value, u128::from_str_radix(&id.format(false), 16).unwrap());
        assert_eq!(Identifier::from_u128(value), id);
    }

    #[test]
    fn packed_bytes_are_little_endian_integer_form() {
        let id = sample();
        let bytes = id.to_bytes();
        assert_eq!(bytes, id.to_u128().to_le_bytes());
        assert_eq!(bytes[15], 0x1A);
        assert_eq!(bytes[14], 0x2B);
        assert_eq!(Identifier::from_bytes(bytes), id);
    }

    #[test]
    fn ordering_follows_integer_form() {
        let a = Identifier::from_parts(1, 5, MAX_RANDOM).unwrap();
        let b = Identifier::from_parts(1, 6, 0).unwrap();
        let c = Identifier::from_parts(2, 0, 0).unwrap();
        assert!(a < b && b < c);
        assert!(a.to_u128() < b.to_u128() && b.to_u128() < c.to_u128());
    }

    #[test]
    fn serializes_as_compact_string() {
        let id = sample();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1a2b00000000003e86cc7763222724a2\"");
        assert_eq!(serde_json::from_str::<Identifier>(&json).unwrap(), id);

        let pretty = "\"1a2b-00000000003e8-6cc7763222724a2\"";
        assert_eq!(serde_json::from_str::<Identifier>(pretty).unwrap(), id);
        assert!(serde_json::from_str::<Identifier>("\"nope\"").is_err());
    }
}
