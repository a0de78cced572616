//! Bech32 text encoding: the BIP-173 checksum and its BIP-350 `bech32m`
//! variant.
//!
//! Data is handled as 5-bit groups (values `0..32`); [`convert_bits`]
//! regroups between 8-bit bytes and 5-bit groups.

use crate::error::BtcError;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const SEPARATOR: char = '1';
const CHECKSUM_LEN: usize = 6;
const MAX_LEN: usize = 90;
const MAX_HRP_LEN: usize = 83;
const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];

/// Which checksum constant a string was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// BIP-173.
    Bech32,
    /// BIP-350, required for witness versions 1 and above.
    Bech32m,
}

impl Variant {
    fn constant(self) -> u32 {
        match self {
            Variant::Bech32 => 1,
            Variant::Bech32m => 0x2bc8_30a3,
        }
    }

    fn from_residue(residue: u32) -> Option<Self> {
        [Variant::Bech32, Variant::Bech32m]
            .into_iter()
            .find(|v| v.constant() == residue)
    }
}

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(value);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

/// High bits of each HRP character, a zero, then the low bits.
fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
    out.extend(bytes.iter().map(|b| b >> 5));
    out.push(0);
    out.extend(bytes.iter().map(|b| b & 0x1f));
    out
}

fn create_checksum(hrp: &str, data: &[u8], variant: Variant) -> [u8; CHECKSUM_LEN] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0; CHECKSUM_LEN]);
    let pm = polymod(&values) ^ variant.constant();

    let mut out = [0u8; CHECKSUM_LEN];
    for (i, c) in out.iter_mut().enumerate() {
        *c = ((pm >> (5 * (5 - i))) & 0x1f) as u8;
    }
    out
}

/// `data` includes the trailing six checksum groups. Returns the variant
/// whose checksum matches, if any.
pub fn verify_checksum(hrp: &str, data: &[u8]) -> Option<Variant> {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    Variant::from_residue(polymod(&values))
}

fn validate_hrp(hrp: &str) -> Result<(), BtcError> {
    if hrp.is_empty() || hrp.len() > MAX_HRP_LEN {
        return Err(BtcError::InvalidEncoding(format!(
            "human-readable part must be 1..={MAX_HRP_LEN} characters"
        )));
    }
    if !hrp.bytes().all(|b| (33..=126).contains(&b)) {
        return Err(BtcError::InvalidEncoding(
            "human-readable part contains characters outside US-ASCII 33..=126".into(),
        ));
    }
    Ok(())
}

/// Encodes 5-bit `data` under `hrp` with the BIP-173 checksum. Output is
/// always lowercase.
pub fn encode(hrp: &str, data: &[u8]) -> Result<String, BtcError> {
    encode_variant(hrp, data, Variant::Bech32)
}

pub fn encode_variant(hrp: &str, data: &[u8], variant: Variant) -> Result<String, BtcError> {
    validate_hrp(hrp)?;
    if hrp.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(BtcError::InvalidEncoding(
            "human-readable part must be lowercase".into(),
        ));
    }
    if let Some(&bad) = data.iter().find(|&&d| d > 31) {
        return Err(BtcError::InvalidEncoding(format!("value {bad} is not a 5-bit group")));
    }
    let total = hrp.len() + 1 + data.len() + CHECKSUM_LEN;
    if total > MAX_LEN {
        return Err(BtcError::InvalidEncoding(format!(
            "encoded length {total} exceeds {MAX_LEN}"
        )));
    }

    let checksum = create_checksum(hrp, data, variant);
    let mut out = String::with_capacity(total);
    out.push_str(hrp);
    out.push(SEPARATOR);
    out.extend(
        data.iter()
            .chain(checksum.iter())
            .map(|&d| char::from(CHARSET[usize::from(d)])),
    );
    Ok(out)
}

/// Decodes a BIP-173 bech32 string into its lowercase HRP and 5-bit data,
/// checksum verified and stripped. A bech32m checksum is a mismatch here.
pub fn decode(encoded: &str) -> Result<(String, Vec<u8>), BtcError> {
    match decode_variant(encoded)? {
        (hrp, data, Variant::Bech32) => Ok((hrp, data)),
        (_, _, Variant::Bech32m) => Err(BtcError::InvalidEncoding("checksum mismatch".into())),
    }
}

/// Like [`decode`], but accepts either checksum and reports which one matched.
pub fn decode_variant(encoded: &str) -> Result<(String, Vec<u8>, Variant), BtcError> {
    if encoded.len() > MAX_LEN {
        return Err(BtcError::InvalidEncoding(format!(
            "length {} exceeds {MAX_LEN}",
            encoded.len()
        )));
    }
    let has_lower = encoded.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = encoded.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(BtcError::InvalidEncoding("mixed case".into()));
    }

    let lowered = encoded.to_ascii_lowercase();
    let pos = lowered
        .rfind(SEPARATOR)
        .ok_or_else(|| BtcError::InvalidEncoding("missing separator".into()))?;
    if pos == 0 {
        return Err(BtcError::InvalidEncoding("empty human-readable part".into()));
    }
    if pos + 1 + CHECKSUM_LEN > lowered.len() {
        return Err(BtcError::InvalidEncoding("checksum too short".into()));
    }

    let (hrp, rest) = (&lowered[..pos], &lowered[pos + 1..]);
    validate_hrp(hrp)?;

    let mut data = rest
        .bytes()
        .map(|c| {
            CHARSET
                .iter()
                .position(|&x| x == c)
                .map(|p| p as u8)
                .ok_or_else(|| BtcError::InvalidEncoding(format!("invalid character {:?}", char::from(c))))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    let variant = verify_checksum(hrp, &data)
        .ok_or_else(|| BtcError::InvalidEncoding("checksum mismatch".into()))?;

    data.truncate(data.len() - CHECKSUM_LEN);
    Ok((hrp.to_string(), data, variant))
}

/// Regroups `data` from `from`-bit to `to`-bit values, big-endian bit order.
///
/// With `pad`, a trailing partial group is zero-filled. Without it, leftover
/// bits must be fewer than `from` and all zero. Both widths must be in
/// `1..=8`.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, BtcError> {
    if !(1..=8).contains(&from) || !(1..=8).contains(&to) {
        return Err(BtcError::InvalidEncoding(format!(
            "group widths must be 1..=8 bits, got {from} -> {to}"
        )));
    }
    let max_value: u32 = (1 << to) - 1;
    let max_acc: u32 = (1 << (from + to - 1)) - 1;
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        let value = u32::from(value);
        if value >> from != 0 {
            return Err(BtcError::InvalidEncoding(format!(
                "value {value} does not fit in {from} bits"
            )));
        }
        acc = ((acc << from) | value) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
        return Err(BtcError::InvalidEncoding("invalid padding".into()));
    }

    Ok(out)
}
