use tracing::trace;

use crate::base58check;
use crate::bech32;
use crate::error::BtcError;
use crate::hash;
use crate::network::BtcNetwork;

pub const MAX_WITNESS_VERSION: u8 = 16;

/// `OP_0 OP_PUSHBYTES_20 <pubkey hash>`, the P2WPKH witness program.
pub fn p2wpkh_redeem_script(pubkey_hash: &[u8; 20]) -> [u8; 22] {
    let mut script = [0u8; 22];
    script[0] = 0x00;
    script[1] = 0x14;
    script[2..].copy_from_slice(pubkey_hash);
    script
}

/// P2SH-wrapped P2WPKH: Base58Check of `hash160(redeem script)` under the
/// network's P2SH version byte.
pub fn p2sh_segwit(pubkey_hash: &[u8; 20], network: BtcNetwork) -> String {
    let script_hash = hash::hash160(&p2wpkh_redeem_script(pubkey_hash));
    base58check::encode(&[network.p2sh_version()], &script_hash)
}

/// Native segwit P2WPKH address for a 20-byte pubkey hash.
pub fn p2wpkh(hrp: &str, witness_version: u8, pubkey_hash: &[u8; 20]) -> Result<String, BtcError> {
    encode_witness_program(hrp, witness_version, pubkey_hash)
}

fn validate_program(version: u8, len: usize) -> Result<(), BtcError> {
    if !(2..=40).contains(&len) {
        return Err(BtcError::InvalidWitnessProgram(format!(
            "program length {len} outside 2..=40"
        )));
    }
    if version == 0 && len != 20 && len != 32 {
        return Err(BtcError::InvalidWitnessProgram(format!(
            "version 0 program must be 20 or 32 bytes, got {len}"
        )));
    }
    Ok(())
}

/// Bech32 address for an arbitrary witness program: the version is the first
/// 5-bit group, followed by the program regrouped into 5-bit groups.
pub fn encode_witness_program(hrp: &str, version: u8, program: &[u8]) -> Result<String, BtcError> {
    if version > MAX_WITNESS_VERSION {
        return Err(BtcError::InvalidWitnessVersion(version));
    }
    validate_program(version, program.len())?;

    let mut data = Vec::with_capacity(1 + (program.len() * 8).div_ceil(5));
    data.push(version);
    data.extend(bech32::convert_bits(program, 8, 5, true)?);

    trace!(hrp, version, "encoding witness program");
    bech32::encode(hrp, &data)
}

/// Inverse of [`encode_witness_program`]; `hrp` must match the address.
pub fn decode_witness_program(hrp: &str, address: &str) -> Result<(u8, Vec<u8>), BtcError> {
    let (decoded_hrp, data) = bech32::decode(address)?;
    if decoded_hrp != hrp {
        return Err(BtcError::InvalidAddress(format!(
            "expected human-readable part {hrp:?}, got {decoded_hrp:?}"
        )));
    }

    witness_program(&data)
}

/// Decodes a segwit address as the network accepts it: version 0 must carry
/// the bech32 checksum and versions 1 to 16 the bech32m checksum (BIP-350).
pub fn decode_segwit_address(hrp: &str, address: &str) -> Result<(u8, Vec<u8>), BtcError> {
    let (decoded_hrp, data, variant) = bech32::decode_variant(address)?;
    if decoded_hrp != hrp {
        return Err(BtcError::InvalidAddress(format!(
            "expected human-readable part {hrp:?}, got {decoded_hrp:?}"
        )));
    }

    let (version, program) = witness_program(&data)?;
    let expected = if version == 0 {
        bech32::Variant::Bech32
    } else {
        bech32::Variant::Bech32m
    };
    if variant != expected {
        return Err(BtcError::InvalidEncoding(format!(
            "witness version {version} requires {expected:?} checksum, got {variant:?}"
        )));
    }
    Ok((version, program))
}

fn witness_program(data: &[u8]) -> Result<(u8, Vec<u8>), BtcError> {
    let (&version, groups) = data
        .split_first()
        .ok_or_else(|| BtcError::InvalidWitnessProgram("missing witness version".into()))?;
    if version > MAX_WITNESS_VERSION {
        return Err(BtcError::InvalidWitnessVersion(version));
    }

    let program = bech32::convert_bits(groups, 5, 8, false)?;
    validate_program(version, program.len())?;
    Ok((version, program))
}
