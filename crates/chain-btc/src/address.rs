use crate::base58check;
use crate::bech32;
use crate::error::BtcError;
use crate::network::BtcNetwork;
use crate::sec::PointFormat;
use crate::segwit;

/// Address representations derivable from a single public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// P2PKH over the hash160 of the public key in the given form.
    Legacy(PointFormat),
    /// P2SH-wrapped P2WPKH over the compressed public key.
    P2shSegwit,
    /// Bech32 P2WPKH over the compressed public key.
    NativeSegwit { witness_version: u8 },
}

/// Legacy pay-to-public-key-hash address.
pub fn p2pkh(pubkey_hash: &[u8; 20], network: BtcNetwork) -> String {
    base58check::encode(&[network.p2pkh_version()], pubkey_hash)
}

/// Renders `kind` from the two public key hashes.
///
/// Segwit kinds always commit to the compressed key hash.
pub fn encode(
    kind: AddressKind,
    uncompressed_hash: &[u8; 20],
    compressed_hash: &[u8; 20],
    network: BtcNetwork,
) -> Result<String, BtcError> {
    match kind {
        AddressKind::Legacy(PointFormat::Uncompressed) => Ok(p2pkh(uncompressed_hash, network)),
        AddressKind::Legacy(PointFormat::Compressed) => Ok(p2pkh(compressed_hash, network)),
        AddressKind::P2shSegwit => Ok(segwit::p2sh_segwit(compressed_hash, network)),
        AddressKind::NativeSegwit { witness_version } => {
            segwit::p2wpkh(network.bech32_hrp(), witness_version, compressed_hash)
        }
    }
}

/// Validate a Bitcoin address string for the given network.
///
/// Supports P2PKH, P2SH and segwit addresses of every witness version, with
/// the bech32/bech32m checksum rules of BIP-350. Returns `true` if the
/// address is valid for `network`, `false` if it is well-formed but belongs to
/// another network.
pub fn validate_address(address: &str, network: BtcNetwork) -> Result<bool, BtcError> {
    let known_hrp = address
        .rfind('1')
        .map(|pos| address[..pos].to_ascii_lowercase())
        .filter(|hrp| BtcNetwork::ALL.iter().any(|n| n.bech32_hrp() == hrp.as_str()));
    if let Some(hrp) = known_hrp {
        segwit::decode_segwit_address(&hrp, address)
            .map_err(|e| BtcError::InvalidAddress(format!("invalid segwit address: {e}")))?;
        return Ok(hrp == network.bech32_hrp());
    }
    if let Ok((hrp, _, _)) = bech32::decode_variant(address) {
        return Err(BtcError::InvalidAddress(format!(
            "unknown human-readable part: {hrp}"
        )));
    }

    let decoded = base58check::decode(address)
        .map_err(|e| BtcError::InvalidAddress(format!("failed to parse address: {e}")))?;
    if decoded.len() != 21 {
        return Err(BtcError::InvalidAddress(format!(
            "expected 21 bytes, got {}",
            decoded.len()
        )));
    }

    let version = decoded[0];
    if version == network.p2pkh_version() || version == network.p2sh_version() {
        return Ok(true);
    }
    if BtcNetwork::ALL
        .iter()
        .any(|n| version == n.p2pkh_version() || version == n.p2sh_version())
    {
        return Ok(false);
    }
    Err(BtcError::InvalidAddress(format!(
        "unknown version byte: {version:#04x}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const G_HASH160: &str = "751e76e8199196d454941c45d1b3a323f1433bd6";
    const G_HASH160_UNCOMPRESSED: &str = "91b24bf9f5288532960ac687abb035127b1d28a5";

    fn hashes() -> ([u8; 20], [u8; 20]) {
        (
            hex::decode(G_HASH160_UNCOMPRESSED).unwrap().try_into().unwrap(),
            hex::decode(G_HASH160).unwrap().try_into().unwrap(),
        )
    }

    #[test]
    fn every_kind_for_generator() {
        let (u, c) = hashes();
        let net = BtcNetwork::Mainnet;
        assert_eq!(
            encode(AddressKind::Legacy(PointFormat::Uncompressed), &u, &c, net).unwrap(),
            "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm"
        );
        assert_eq!(
            encode(AddressKind::Legacy(PointFormat::Compressed), &u, &c, net).unwrap(),
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
        );
        assert_eq!(
            encode(AddressKind::P2shSegwit, &u, &c, net).unwrap(),
            "3JvL6Ymt8MVWiCNHC7oWU6nLeHNJKLZGLN"
        );
        assert_eq!(
            encode(AddressKind::NativeSegwit { witness_version: 0 }, &u, &c, net).unwrap(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );
    }

    #[test]
    fn testnet_legacy_addresses() {
        let (u, c) = hashes();
        assert_eq!(p2pkh(&c, BtcNetwork::Testnet), "mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r");
        assert_eq!(p2pkh(&u, BtcNetwork::Testnet), "mtoKs9V381UAhUia3d7Vb9GNak8Qvmcsme");
    }

    #[test]
    fn native_segwit_propagates_version_error() {
        let (u, c) = hashes();
        let result = encode(
            AddressKind::NativeSegwit { witness_version: 17 },
            &u,
            &c,
            BtcNetwork::Mainnet,
        );
        assert_eq!(result, Err(BtcError::InvalidWitnessVersion(17)));
    }

    #[test]
    fn validate_known_mainnet_addresses() {
        for addr in [
            "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH",
            "3JvL6Ymt8MVWiCNHC7oWU6nLeHNJKLZGLN",
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
        ] {
            assert!(validate_address(addr, BtcNetwork::Mainnet).unwrap(), "{addr}");
        }
    }

    #[test]
    fn validate_mainnet_address_on_testnet_returns_false() {
        assert!(!validate_address("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", BtcNetwork::Testnet).unwrap());
        assert!(!validate_address(
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
            BtcNetwork::Testnet
        )
        .unwrap());
    }

    #[test]
    fn validate_testnet_addresses() {
        assert!(validate_address("mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r", BtcNetwork::Testnet).unwrap());
        assert!(validate_address("2NAUYAHhujozruyzpsFRP63mbrdaU5wnEpN", BtcNetwork::Regtest).unwrap());
        assert!(validate_address(
            "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx",
            BtcNetwork::Testnet
        )
        .unwrap());
    }

    #[test]
    fn validate_garbage_address_returns_error() {
        assert!(validate_address("notanaddress!!!", BtcNetwork::Mainnet).is_err());
    }

    #[test]
    fn validate_rejects_wif_payload() {
        // Valid Base58Check, wrong length for an address.
        let result = validate_address(
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn",
            BtcNetwork::Mainnet,
        );
        assert!(matches!(result, Err(BtcError::InvalidAddress(_))));
    }

    #[test]
    fn validate_taproot_addresses() {
        let taproot = "bc1p5d7rjq7g6rdk2yhzks9smlaqtedr4dekq08ge8ztwac72sfr9rusxg3297";
        assert!(validate_address(taproot, BtcNetwork::Mainnet).unwrap());
        assert!(!validate_address(taproot, BtcNetwork::Testnet).unwrap());
        assert!(validate_address(
            "tb1pqqqqp399et2xygdj5xreqhjjvcmzhxw4aywxecjdzew6hylgvsesf3hn0c",
            BtcNetwork::Testnet
        )
        .unwrap());
    }

    #[test]
    fn validate_rejects_v1_with_bech32_checksum() {
        let result = validate_address(
            "bc1pw508d6qejxtdg4y5r3zarvary0c5xw7kw508d6qejxtdg4y5r3zarvary0c5xw7k7grplx",
            BtcNetwork::Mainnet,
        );
        assert!(matches!(result, Err(BtcError::InvalidAddress(_))));
    }

    #[test]
    fn bad_segwit_address_reports_segwit_error() {
        // Last character altered.
        let err = validate_address(
            "bc1p5d7rjq7g6rdk2yhzks9smlaqtedr4dekq08ge8ztwac72sfr9rusxg3298",
            BtcNetwork::Mainnet,
        )
        .unwrap_err();
        let BtcError::InvalidAddress(message) = err else {
            panic!("unexpected error: {err:?}");
        };
        assert!(message.starts_with("invalid segwit address"), "{message}");
        assert!(!message.contains("base58"), "{message}");
    }

    #[test]
    fn validate_rejects_unknown_hrp() {
        let program = [0x75u8; 20];
        let addr = segwit::encode_witness_program("ltc", 0, &program).unwrap();
        assert!(matches!(
            validate_address(&addr, BtcNetwork::Mainnet),
            Err(BtcError::InvalidAddress(_))
        ));
    }
}
