// SPDX-License-Identifier: GPL-3.0

//! The SCALE codec seam.
//!
//! The library does not implement SCALE itself; it resolves a codec per
//! metadata type id through the [`TypeRegistry`] trait and drives it with
//! dynamic [`ExtensionValue`]s. A registry backed by real runtime metadata is
//! supplied by the embedding application; [`crate::testing::MockRegistry`]
//! backs the test suite.

use sp_core::H256;
use std::{collections::BTreeMap, fmt};

/// Boxed error produced by a codec for a specific type id.
pub type CodecFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Mapping from extension identifier to its value.
///
/// Two of these are carried side by side: one for values encoded inside the
/// extrinsic and one for values that only enter the signing payload.
pub type ExtensionValues = BTreeMap<String, ExtensionValue>;

/// A dynamically typed value for a transaction extension field.
///
/// The vocabulary covers what the canonical extension set needs; chains with
/// exotic extensions route through [`ExtensionValue::Bytes`] with bytes
/// pre-encoded by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionValue {
	/// Zero-sized marker value.
	Unit,
	U32(u32),
	U64(u64),
	U128(u128),
	/// A 32-byte hash (genesis hash, mortality checkpoint, ...).
	Hash(H256),
	/// Pre-encoded bytes, written to the wire verbatim.
	Bytes(Vec<u8>),
	/// Optional hash (metadata hash commitment).
	OptionHash(Option<H256>),
	/// Optional small id (asset fee id).
	OptionU32(Option<u32>),
}

impl fmt::Display for ExtensionValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unit => write!(f, "()"),
			Self::U32(value) => write!(f, "{value}"),
			Self::U64(value) => write!(f, "{value}"),
			Self::U128(value) => write!(f, "{value}"),
			Self::Hash(hash) => write!(f, "0x{}", hex::encode(hash)),
			Self::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
			Self::OptionHash(Some(hash)) => write!(f, "0x{}", hex::encode(hash)),
			Self::OptionHash(None) => write!(f, "none"),
			Self::OptionU32(Some(id)) => write!(f, "{id}"),
			Self::OptionU32(None) => write!(f, "none"),
		}
	}
}

/// Resolves SCALE codecs for runtime metadata type ids.
///
/// Implementations are expected to be cheap to call and read-only; the
/// registry is shared freely behind an `Arc` once constructed.
pub trait TypeRegistry: Send + Sync {
	/// Encode `value` as the type identified by `type_id`, appending the
	/// bytes to `out`.
	fn encode_value(
		&self,
		type_id: u32,
		value: &ExtensionValue,
		out: &mut Vec<u8>,
	) -> Result<(), CodecFailure>;

	/// Decode one value of the type identified by `type_id` from the front of
	/// `input`, advancing it past the consumed bytes.
	fn decode_value(&self, type_id: u32, input: &mut &[u8]) -> Result<ExtensionValue, CodecFailure>;

	/// Whether the type identified by `type_id` encodes to zero bytes.
	///
	/// Zero-sized entries contribute nothing to the wire and require no value
	/// at encode time.
	fn is_zero_sized(&self, type_id: u32) -> bool;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_renders_hashes_as_prefixed_hex() {
		let value = ExtensionValue::Hash(H256::repeat_byte(0xab));
		assert!(value.to_string().starts_with("0xabab"));
	}

	#[test]
	fn display_renders_absent_options_as_none() {
		assert_eq!(ExtensionValue::OptionHash(None).to_string(), "none");
		assert_eq!(ExtensionValue::OptionU32(None).to_string(), "none");
	}
}
