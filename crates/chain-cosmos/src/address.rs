//! Account address codec.
//!
//! A Cosmos account is identified by 20 raw bytes. Those bytes have two textual
//! views: the bech32 form (`<hrp>1<data><checksum>`) used natively by the chain,
//! and the `0x`-prefixed hex form used by the EVM side. The same bytes may be
//! rendered under any HRP, which is how one key yields addresses on several
//! chains.

use std::str::FromStr;

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::error::ChainError;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Decodes a bech32 address into its 20 account bytes.
///
/// Only the original bech32 checksum is accepted (not bech32m). When
/// `expected_prefix` is given the HRP must match it exactly. Empty and
/// wrong-length payloads are rejected.
pub fn decode_bech32(
    address: &str,
    expected_prefix: Option<&str>,
) -> Result<[u8; ADDRESS_LEN], ChainError> {
    let (prefix, bytes) = decode_parts(address)?;

    if let Some(expected) = expected_prefix {
        if prefix != expected {
            return Err(ChainError::AddressFormat(format!(
                "expected prefix '{expected}', got '{prefix}'"
            )));
        }
    }

    Ok(bytes)
}

fn decode_parts(address: &str) -> Result<(String, [u8; ADDRESS_LEN]), ChainError> {
    let checked = CheckedHrpstring::new::<Bech32>(address)
        .map_err(|e| ChainError::AddressFormat(format!("bech32 decode failed: {e}")))?;

    let data: Vec<u8> = checked.byte_iter().collect();
    if data.is_empty() {
        return Err(ChainError::AddressFormat("empty address payload".into()));
    }

    let bytes: [u8; ADDRESS_LEN] = data.try_into().map_err(|v: Vec<u8>| {
        ChainError::AddressFormat(format!("expected {ADDRESS_LEN} bytes, got {}", v.len()))
    })?;

    Ok((checked.hrp().to_lowercase(), bytes))
}

/// Encodes raw bytes as a bech32 address under `prefix`.
pub fn encode_bech32(prefix: &str, bytes: &[u8]) -> Result<String, ChainError> {
    let hrp = Hrp::parse(prefix)
        .map_err(|e| ChainError::AddressFormat(format!("invalid prefix '{prefix}': {e}")))?;

    bech32::encode::<Bech32>(hrp, bytes)
        .map_err(|e| ChainError::AddressFormat(format!("bech32 encoding failed: {e}")))
}

/// Renders 20 address bytes as `0x` followed by lowercase hex.
pub fn to_hex(bytes: &[u8; ADDRESS_LEN]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parses a `0x` + 40 hex character address into raw bytes.
pub fn from_hex(address: &str) -> Result<[u8; ADDRESS_LEN], ChainError> {
    let hex_part = address
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::AddressFormat("address must start with 0x".into()))?;

    if hex_part.len() != ADDRESS_LEN * 2 {
        return Err(ChainError::AddressFormat(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainError::AddressFormat(
            "address contains non-hex characters".into(),
        ));
    }

    let mut out = [0u8; ADDRESS_LEN];
    hex::decode_to_slice(hex_part, &mut out)
        .map_err(|e| ChainError::AddressFormat(format!("invalid hex: {e}")))?;
    Ok(out)
}

/// Converts a bech32 account address to its hex form.
pub fn bech32_to_hex(address: &str) -> Result<String, ChainError> {
    let bytes = decode_bech32(address, None)?;
    Ok(to_hex(&bytes))
}

/// Converts a hex address to bech32 under `prefix`.
pub fn hex_to_bech32(address: &str, prefix: &str) -> Result<String, ChainError> {
    let bytes = from_hex(address)?;
    encode_bech32(prefix, &bytes)
}

/// Re-encodes a bech32 address under a different prefix.
pub fn convert_prefix(address: &str, new_prefix: &str) -> Result<String, ChainError> {
    let data = decode_bech32(address, None)?;
    encode_bech32(new_prefix, &data)
}

/// Returns whether `address` is a decodable 20-byte bech32 address, optionally
/// with the given prefix.
pub fn is_valid_bech32(address: &str, prefix: Option<&str>) -> bool {
    decode_bech32(address, prefix).is_ok()
}

/// Returns whether `address` is exactly `0x` followed by 40 hex characters.
pub fn is_valid_hex(address: &str) -> bool {
    from_hex(address).is_ok()
}

/// Returns the human-readable prefix of a bech32 address.
pub fn prefix_of(address: &str) -> Result<String, ChainError> {
    let (prefix, _) = decode_parts(address)?;
    Ok(prefix)
}

/// Shortens an address for display as `head...tail`.
pub fn shorten(address: &str, head_chars: usize, tail_chars: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= head_chars + tail_chars {
        return address.to_string();
    }

    let head: String = chars[..head_chars].iter().collect();
    let tail: String = chars[chars.len() - tail_chars..].iter().collect();
    format!("{head}...{tail}")
}

/// Applies EIP-55 mixed-case checksum encoding to 20 address bytes.
pub fn to_checksum_hex(bytes: &[u8; ADDRESS_LEN]) -> String {
    let hex_part = hex::encode(bytes);
    let hash = Keccak256::digest(hex_part.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (i, c) in hex_part.chars().enumerate() {
        // High nibble for even positions, low nibble for odd.
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    checksummed
}

/// Returns the 20-byte address of a module account (`sha256(name)[..20]`).
///
/// The governance authority is `module_address("gov")`.
pub fn module_address(module_name: &str) -> [u8; ADDRESS_LEN] {
    let hash = Sha256::digest(module_name.as_bytes());
    let mut out = [0u8; ADDRESS_LEN];
    out.copy_from_slice(&hash[..ADDRESS_LEN]);
    out
}

/// Key algorithm reported by a signing backend alongside an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    Secp256k1,
    #[serde(alias = "eth_secp256k1")]
    Ethsecp256k1,
}

impl KeyAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAlgorithm::Secp256k1 => "secp256k1",
            KeyAlgorithm::Ethsecp256k1 => "ethsecp256k1",
        }
    }
}

impl FromStr for KeyAlgorithm {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp256k1" => Ok(KeyAlgorithm::Secp256k1),
            "ethsecp256k1" | "eth_secp256k1" => Ok(KeyAlgorithm::Ethsecp256k1),
            other => Err(ChainError::InvalidPublicKey(format!(
                "unsupported key algorithm: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives the 20-byte account id from a SEC1-encoded secp256k1 public key.
///
/// - `secp256k1`: RIPEMD-160(SHA-256(compressed key))
/// - `ethsecp256k1`: last 20 bytes of Keccak-256(uncompressed key without 0x04)
pub fn pubkey_to_address_bytes(
    pubkey: &[u8],
    algorithm: KeyAlgorithm,
) -> Result<[u8; ADDRESS_LEN], ChainError> {
    let key = PublicKey::from_sec1_bytes(pubkey)
        .map_err(|e| ChainError::InvalidPublicKey(format!("invalid secp256k1 key: {e}")))?;

    let mut out = [0u8; ADDRESS_LEN];
    match algorithm {
        KeyAlgorithm::Secp256k1 => {
            let compressed = key.to_encoded_point(true);
            let sha = Sha256::digest(compressed.as_bytes());
            out.copy_from_slice(&Ripemd160::digest(sha));
        }
        KeyAlgorithm::Ethsecp256k1 => {
            let uncompressed = key.to_encoded_point(false);
            let hash = Keccak256::digest(&uncompressed.as_bytes()[1..]);
            out.copy_from_slice(&hash[12..]);
        }
    }
    Ok(out)
}
