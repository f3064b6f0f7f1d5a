//! Binary codec for the compressed token.
//!
//! A token packs the AI pairs (and optionally the query attributes) of a
//! canonical URI into a bit stream rendered as a single base64url path
//! segment. The facade in [`crate::compression`] never interprets a token's
//! bytes beyond this module; it only places the segment relative to the
//! custom path.
//!
//! Stream layout (version 1, MSB first): a 4-bit version and 4 flag bits
//! (bit 3: optimisations), then entries introduced by an 8-bit tag (an
//! index into the AI table, `0xFD` for an attribute with an arbitrary key,
//! `0xFF` to terminate), and zero padding to the byte boundary.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::CompressionError;
use crate::registry;

const VERSION: u32 = 1;
const TAG_OTHER_KEY: u32 = 0xFD;
const TAG_END: u32 = 0xFF;
const FLAG_OPTIMISED: u32 = 0b1000;

/// Maximum value length under the short length field.
const SHORT_MAX: usize = 63;
/// Maximum value length under the long length field.
const LONG_MAX: usize = 4095;

const CHARSET64: &[u8; 64] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ-_";

/// The decoded contents of a token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct TokenPayload {
    /// Identifier and key-qualifier pairs, in path order (numeric codes)
    pub pairs: Vec<(String, String)>,
    /// Query attributes, in encounter order
    pub attributes: Vec<(String, String)>,
}

/// Entry kind of a tag in the AI table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Pair,
    Attribute,
}

/// The flat AI tag table: families, then qualifiers, then known attributes,
/// in registry order. A tag is an index into this sequence.
fn tag_entries() -> impl Iterator<Item = (&'static str, Option<usize>, TagKind)> {
    registry::FAMILIES
        .iter()
        .map(|f| (f.code, f.fixed_digits, TagKind::Pair))
        .chain(
            registry::KEY_QUALIFIERS
                .iter()
                .map(|q| (q.code, None, TagKind::Pair)),
        )
        .chain(
            registry::DATA_ATTRIBUTES
                .iter()
                .map(|a| (a.code, None, TagKind::Attribute)),
        )
}

fn tag_of(code: &str) -> Option<(u32, Option<usize>)> {
    tag_entries()
        .enumerate()
        .find(|(_, (c, _, _))| *c == code)
        .map(|(i, (_, fixed, _))| (i as u32, fixed))
}

fn entry_of(tag: u32) -> Option<(&'static str, Option<usize>, TagKind)> {
    tag_entries().nth(tag as usize)
}

struct BitWriter {
    bytes: Vec<u8>,
    cur: u8,
    used: u8,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            cur: 0,
            used: 0,
        }
    }

    fn push(&mut self, value: u32, bits: u32) {
        let mut i = bits;
        while i > 0 {
            i -= 1;
            self.cur = (self.cur << 1) | (((value >> i) & 1) as u8);
            self.used += 1;
            if self.used == 8 {
                self.bytes.push(self.cur);
                self.cur = 0;
                self.used = 0;
            }
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.used > 0 {
            self.bytes.push(self.cur << (8 - self.used));
        }
        self.bytes
    }
}

struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn read(&mut self, bits: u32) -> Option<u32> {
        let mut out = 0;
        for _ in 0..bits {
            let byte = *self.bytes.get(self.pos / 8)?;
            let bit = (byte >> (7 - (self.pos % 8))) & 1;
            out = (out << 1) | u32::from(bit);
            self.pos += 1;
        }
        Some(out)
    }

    fn remaining_bits(&self) -> usize {
        self.bytes.len() * 8 - self.pos
    }

    /// Whether everything left in the stream is zero padding.
    fn only_padding_left(&mut self) -> bool {
        if self.remaining_bits() >= 8 {
            return false;
        }
        while self.remaining_bits() > 0 {
            if self.read(1) != Some(0) {
                return false;
            }
        }
        true
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn write_digits(writer: &mut BitWriter, value: &str) {
    for b in value.bytes() {
        writer.push(u32::from(b - b'0'), 4);
    }
}

/// Writes a value under the general coding: a 2-bit shape selector, a length
/// field, then the characters.
fn write_value(writer: &mut BitWriter, value: &str) -> Result<(), CompressionError> {
    if value.len() <= SHORT_MAX && value.bytes().all(|b| b.is_ascii_digit()) {
        writer.push(0, 2);
        writer.push(value.len() as u32, 6);
        write_digits(writer, value);
        return Ok(());
    }

    let in_charset64 = value
        .bytes()
        .all(|b| CHARSET64.contains(&b));
    if value.len() <= SHORT_MAX && in_charset64 {
        writer.push(1, 2);
        writer.push(value.len() as u32, 6);
        for b in value.bytes() {
            let index = CHARSET64
                .iter()
                .position(|c| *c == b)
                .unwrap_or_default();
            writer.push(index as u32, 6);
        }
        return Ok(());
    }

    if let Some(bad) = value.chars().find(|c| !c.is_ascii() || (*c as u32) < 0x20 || (*c as u32) > 0x7e) {
        return Err(CompressionError::UnencodableCharacter { char: bad });
    }
    if value.len() <= SHORT_MAX {
        writer.push(2, 2);
        writer.push(value.len() as u32, 6);
    } else if value.len() <= LONG_MAX {
        writer.push(3, 2);
        writer.push(value.len() as u32, 12);
    } else {
        return Err(CompressionError::ValueTooLong {
            max: LONG_MAX,
            actual: value.len(),
        });
    }
    for b in value.bytes() {
        writer.push(u32::from(b), 7);
    }
    Ok(())
}

fn read_value(reader: &mut BitReader<'_>) -> Result<String, CompressionError> {
    let truncated = CompressionError::InvalidToken {
        reason: "truncated value",
    };
    let selector = reader.read(2).ok_or(truncated.clone())?;
    let length = match selector {
        0..=2 => reader.read(6).ok_or(truncated.clone())?,
        _ => reader.read(12).ok_or(truncated.clone())?,
    } as usize;

    let mut out = String::with_capacity(length);
    for _ in 0..length {
        match selector {
            0 => {
                let digit = reader.read(4).ok_or(truncated.clone())?;
                if digit > 9 {
                    return Err(CompressionError::InvalidToken {
                        reason: "digit out of range",
                    });
                }
                out.push((b'0' + digit as u8) as char);
            }
            1 => {
                let index = reader.read(6).ok_or(truncated.clone())? as usize;
                out.push(CHARSET64[index] as char);
            }
            _ => {
                let byte = reader.read(7).ok_or(truncated.clone())?;
                if !(0x20..=0x7e).contains(&byte) {
                    return Err(CompressionError::InvalidToken {
                        reason: "character out of range",
                    });
                }
                out.push(byte as u8 as char);
            }
        }
    }
    Ok(out)
}

/// Packs a payload into the text form of a token.
pub(crate) fn encode(
    payload: &TokenPayload,
    optimise: bool,
) -> Result<String, CompressionError> {
    let mut writer = BitWriter::new();
    writer.push(VERSION, 4);
    writer.push(if optimise { FLAG_OPTIMISED } else { 0 }, 4);

    for (code, value) in &payload.pairs {
        let Some((tag, fixed)) = tag_of(code) else {
            return Err(CompressionError::UnknownApplicationIdentifier {
                code: code.clone(),
            });
        };
        writer.push(tag, 8);
        if optimise && let Some(length) = fixed {
            if value.len() == length && is_digits(value) {
                writer.push(1, 1);
                write_digits(&mut writer, value);
            } else {
                writer.push(0, 1);
                write_value(&mut writer, value)?;
            }
        } else {
            write_value(&mut writer, value)?;
        }
    }

    for (key, value) in &payload.attributes {
        match registry::data_attribute_for(key).and_then(|a| tag_of(a.code)) {
            Some((tag, _)) => {
                writer.push(tag, 8);
                write_value(&mut writer, value)?;
            }
            None => {
                writer.push(TAG_OTHER_KEY, 8);
                write_value(&mut writer, key)?;
                write_value(&mut writer, value)?;
            }
        }
    }

    writer.push(TAG_END, 8);
    Ok(URL_SAFE_NO_PAD.encode(writer.finish()))
}

/// Unpacks the text form of a token. Fails on anything structurally off:
/// wrong version, unknown tags, bad lengths, a missing terminator, or
/// non-zero padding. Detection in the facade is built on this strictness.
pub(crate) fn decode(token: &str) -> Result<TokenPayload, CompressionError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| CompressionError::InvalidToken {
            reason: "not base64url",
        })?;
    let mut reader = BitReader::new(&bytes);

    let version = reader.read(4).ok_or(CompressionError::InvalidToken {
        reason: "missing header",
    })?;
    if version != VERSION {
        return Err(CompressionError::UnsupportedVersion {
            version: version as u8,
        });
    }
    let flags = reader.read(4).ok_or(CompressionError::InvalidToken {
        reason: "missing header",
    })?;
    if flags & !FLAG_OPTIMISED != 0 {
        return Err(CompressionError::InvalidToken {
            reason: "reserved flag bits set",
        });
    }
    let optimised = flags & FLAG_OPTIMISED != 0;

    let mut payload = TokenPayload::default();
    loop {
        let tag = reader.read(8).ok_or(CompressionError::InvalidToken {
            reason: "missing terminator",
        })?;
        if tag == TAG_END {
            break;
        }
        if tag == TAG_OTHER_KEY {
            let key = read_value(&mut reader)?;
            let value = read_value(&mut reader)?;
            payload.attributes.push((key, value));
            continue;
        }
        let Some((code, fixed, kind)) = entry_of(tag) else {
            return Err(CompressionError::InvalidToken {
                reason: "unknown tag",
            });
        };
        let value = if optimised && let Some(length) = fixed {
            let raw = reader.read(1).ok_or(CompressionError::InvalidToken {
                reason: "truncated value",
            })?;
            if raw == 1 {
                let mut out = String::with_capacity(length);
                for _ in 0..length {
                    let digit = reader.read(4).ok_or(CompressionError::InvalidToken {
                        reason: "truncated value",
                    })?;
                    if digit > 9 {
                        return Err(CompressionError::InvalidToken {
                            reason: "digit out of range",
                        });
                    }
                    out.push((b'0' + digit as u8) as char);
                }
                out
            } else {
                read_value(&mut reader)?
            }
        } else {
            read_value(&mut reader)?
        };
        match kind {
            TagKind::Pair => payload.pairs.push((code.to_string(), value)),
            TagKind::Attribute => payload.attributes.push((code.to_string(), value)),
        }
    }

    if !reader.only_padding_left() {
        return Err(CompressionError::InvalidToken {
            reason: "trailing data",
        });
    }
    if payload.pairs.is_empty() && payload.attributes.is_empty() {
        return Err(CompressionError::InvalidToken {
            reason: "empty token",
        });
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(pairs: &[(&str, &str)], attributes: &[(&str, &str)]) -> TokenPayload {
        TokenPayload {
            pairs: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            attributes: attributes
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    #[test]
    fn round_trips_pairs() {
        let input = payload(&[("01", "09780345418913"), ("21", "12345")], &[]);
        let token = encode(&input, true).unwrap();
        assert_eq!(decode(&token).unwrap(), input);
    }

    #[test]
    fn round_trips_without_optimisations() {
        let input = payload(&[("00", "123456789123456789")], &[]);
        for optimise in [false, true] {
            let token = encode(&input, optimise).unwrap();
            assert_eq!(decode(&token).unwrap(), input);
        }
    }

    #[test]
    fn round_trips_attributes() {
        let input = payload(
            &[("01", "9780345418913")],
            &[("15", "230911"), ("thngId", "U5mQKGDpnymBwQwRakyBqeYh")],
        );
        let token = encode(&input, true).unwrap();
        assert_eq!(decode(&token).unwrap(), input);
    }

    #[test]
    fn round_trips_percent_encoded_values() {
        let input = payload(&[("01", "9780345418913"), ("21", "ab%2Fcd")], &[]);
        let token = encode(&input, true).unwrap();
        assert_eq!(decode(&token).unwrap(), input);
    }

    #[test]
    fn token_is_a_single_base64url_segment() {
        let input = payload(&[("01", "9780345418913")], &[]);
        let token = encode(&input, true).unwrap();
        assert!(!token.is_empty());
        assert!(
            token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        );
    }

    #[test]
    fn unknown_ai_is_rejected() {
        let input = payload(&[("9999", "1")], &[]);
        assert!(matches!(
            encode(&input, true),
            Err(CompressionError::UnknownApplicationIdentifier { .. })
        ));
    }

    #[test]
    fn plain_values_do_not_decode_as_tokens() {
        for segment in ["12345678", "9780345418913", "custom", "path", "21"] {
            assert!(decode(segment).is_err(), "{segment} decoded as a token");
        }
    }

    #[test]
    fn truncated_token_is_rejected() {
        let input = payload(&[("01", "9780345418913")], &[]);
        let token = encode(&input, true).unwrap();
        assert!(decode(&token[..token.len() - 2]).is_err());
    }
}
