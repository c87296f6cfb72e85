// SPDX-License-Identifier: GPL-3.0

//! Wire-format assembly and disassembly of extrinsics.
//!
//! Two format generations are produced: V4 (bare, signed) and V5 (bare,
//! signed, general). The format is selected once, from chain metadata, when
//! the encoder is constructed. Extension bytes are driven entirely by the
//! metadata schema; any deviation from its order produces a transaction the
//! network rejects.

use crate::{
	error::ExtrinsicError,
	extrinsic::{
		era::Era,
		signed::{decode_signature, encode_signature, take_byte, MultiAddress, SignatureType, SignedData},
	},
	metadata::{is_era_identifier, ChainInfo, EXTRINSIC_V5},
	registry::{ExtensionValue, ExtensionValues},
};
use scale::{Compact, Decode, Encode};
use std::sync::Arc;

/// Version byte bit 7: the extrinsic carries an address/signature envelope.
pub const SIGNED_FLAG: u8 = 0b1000_0000;
/// Version byte bit 6: the V5 "general" mode carrying only extensions.
pub const GENERAL_FLAG: u8 = 0b0100_0000;
/// Version byte bits 0..5: the format version number.
pub const VERSION_MASK: u8 = 0b0011_1111;

/// Stateless extrinsic encoder/decoder bound to one chain's metadata.
#[derive(Debug, Clone)]
pub struct ExtrinsicEncoder {
	chain_info: Arc<ChainInfo>,
	version: u8,
}

/// A decoded extrinsic, sufficient to re-encode it byte-identically.
#[derive(Debug, Clone)]
pub struct DecodedExtrinsic {
	/// Format version from the version byte (4 or 5).
	pub version: u8,
	/// Mode-specific envelope.
	pub body: ExtrinsicBody,
	/// The trailing SCALE-encoded runtime call.
	pub call_data: Vec<u8>,
}

/// Mode-specific content of a decoded extrinsic.
#[derive(Debug, Clone)]
pub enum ExtrinsicBody {
	/// No envelope; the call follows the version byte directly.
	Bare,
	/// Address + signature + in-block extension values.
	Signed {
		address: MultiAddress,
		signature_type: SignatureType,
		signature: Vec<u8>,
		extensions: ExtensionValues,
	},
	/// V5 general: extension version byte + in-block extension values.
	General {
		extension_version: u8,
		extensions: ExtensionValues,
	},
}

impl ExtrinsicEncoder {
	/// Create an encoder for the chain, detecting the format version from
	/// its metadata.
	pub fn new(chain_info: Arc<ChainInfo>) -> Self {
		let version = chain_info.detected_version();
		Self { chain_info, version }
	}

	/// The detected extrinsic format version (4 or 5).
	pub fn version(&self) -> u8 {
		self.version
	}

	/// Encode a bare (unsigned) extrinsic: `compact(len) ++ version ++ call`.
	pub fn encode_unsigned(&self, call_data: &[u8]) -> Vec<u8> {
		let mut body = Vec::with_capacity(1 + call_data.len());
		body.push(self.version);
		body.extend_from_slice(call_data);
		length_prefixed(body)
	}

	/// Encode a signed extrinsic.
	///
	/// The body is the signed-flagged version byte, the address and signature
	/// envelope, the in-block extension bytes in schema order, and finally
	/// the call.
	pub fn encode(&self, data: &SignedData) -> Result<Vec<u8>, ExtrinsicError> {
		let mut body = vec![SIGNED_FLAG | self.version];
		MultiAddress::from_signer(&data.signer).encode_to(&mut body);
		encode_signature(&mut body, &data.signature, data.signature_type);
		encode_extensions(&self.chain_info, &data.extensions, &mut body)?;
		body.extend_from_slice(&data.call_data);
		Ok(length_prefixed(body))
	}

	/// Encode a V5 "general" extrinsic: no signature envelope, extensions
	/// carry any authorization.
	///
	/// Fails with [`ExtrinsicError::UnsupportedVersion`] on a V4 chain.
	pub fn encode_general(
		&self,
		call_data: &[u8],
		extensions: &ExtensionValues,
		extension_version: u8,
	) -> Result<Vec<u8>, ExtrinsicError> {
		if self.version != EXTRINSIC_V5 {
			return Err(ExtrinsicError::UnsupportedVersion(self.version));
		}
		let mut body = vec![GENERAL_FLAG | self.version, extension_version];
		encode_extensions(&self.chain_info, extensions, &mut body)?;
		body.extend_from_slice(call_data);
		Ok(length_prefixed(body))
	}

	/// Decode extrinsic wire bytes produced by any of the encode modes.
	///
	/// The version byte must be one of `0x04`, `0x84`, `0x05`, `0x45`,
	/// `0x85`; anything else is rejected.
	pub fn decode(&self, bytes: &[u8]) -> Result<DecodedExtrinsic, ExtrinsicError> {
		let input = &mut &bytes[..];
		let declared = Compact::<u32>::decode(input)
			.map_err(|_| ExtrinsicError::Truncated("length prefix".into()))?
			.0 as usize;
		if input.len() != declared {
			return Err(ExtrinsicError::Truncated(format!(
				"length prefix declares {declared} bytes, {} remain",
				input.len()
			)));
		}

		let version_byte = take_byte(input, "version byte")?;
		let version = version_byte & VERSION_MASK;
		let signed = version_byte & SIGNED_FLAG != 0;
		let general = version_byte & GENERAL_FLAG != 0;

		let body = match (version, signed, general) {
			(4 | 5, false, false) => ExtrinsicBody::Bare,
			(4 | 5, true, false) => {
				let address = MultiAddress::decode(input)?;
				let (signature_type, signature) = decode_signature(input)?;
				let extensions = decode_extensions(&self.chain_info, input)?;
				ExtrinsicBody::Signed { address, signature_type, signature, extensions }
			},
			(5, false, true) => {
				let extension_version = take_byte(input, "extension version byte")?;
				let extensions = decode_extensions(&self.chain_info, input)?;
				ExtrinsicBody::General { extension_version, extensions }
			},
			_ => return Err(ExtrinsicError::UnsupportedVersion(version_byte)),
		};

		Ok(DecodedExtrinsic { version, body, call_data: input.to_vec() })
	}
}

/// Prefix a finished body with its SCALE-compact length.
fn length_prefixed(body: Vec<u8>) -> Vec<u8> {
	let mut out = Compact(body.len() as u32).encode();
	out.extend_from_slice(&body);
	out
}

/// Encode the in-block extension values in schema order, appending to `out`.
///
/// Zero-sized entries contribute nothing. The mortality pair
/// (`CheckMortality`/`CheckEra`) is written verbatim from its pre-encoded
/// bytes; everything else goes through the registry codec for its type id.
pub(crate) fn encode_extensions(
	chain_info: &ChainInfo,
	values: &ExtensionValues,
	out: &mut Vec<u8>,
) -> Result<(), ExtrinsicError> {
	for ext in chain_info.extension_schema() {
		if !ext.in_extrinsic {
			continue;
		}
		if is_era_identifier(&ext.identifier) {
			match values.get(&ext.identifier) {
				Some(ExtensionValue::Bytes(bytes)) => out.extend_from_slice(bytes),
				Some(_) => return Err(ExtrinsicError::EraFormat(ext.identifier.clone())),
				None => return Err(ExtrinsicError::MissingExtensionValue(ext.identifier.clone())),
			}
			continue;
		}
		if chain_info.types.is_zero_sized(ext.ty) {
			continue;
		}
		let value = values
			.get(&ext.identifier)
			.ok_or_else(|| ExtrinsicError::MissingExtensionValue(ext.identifier.clone()))?;
		chain_info.types.encode_value(ext.ty, value, out).map_err(|source| {
			ExtrinsicError::Codec { identifier: ext.identifier.clone(), type_id: ext.ty, source }
		})?;
	}
	Ok(())
}

/// Encode the "additional signed" (implicit) values in schema order.
///
/// These bytes enter the signing payload only and never appear on the wire.
pub(crate) fn encode_additional_signed(
	chain_info: &ChainInfo,
	values: &ExtensionValues,
	out: &mut Vec<u8>,
) -> Result<(), ExtrinsicError> {
	for ext in chain_info.extension_schema() {
		if !ext.in_signed_data || chain_info.types.is_zero_sized(ext.implicit_ty) {
			continue;
		}
		let value = values
			.get(&ext.identifier)
			.ok_or_else(|| ExtrinsicError::MissingExtensionValue(ext.identifier.clone()))?;
		chain_info.types.encode_value(ext.implicit_ty, value, out).map_err(|source| {
			ExtrinsicError::Codec {
				identifier: ext.identifier.clone(),
				type_id: ext.implicit_ty,
				source,
			}
		})?;
	}
	Ok(())
}

/// Decode the in-block extension values in schema order.
fn decode_extensions(
	chain_info: &ChainInfo,
	input: &mut &[u8],
) -> Result<ExtensionValues, ExtrinsicError> {
	let mut values = ExtensionValues::new();
	for ext in chain_info.extension_schema() {
		if !ext.in_extrinsic {
			continue;
		}
		if is_era_identifier(&ext.identifier) {
			let era = Era::decode(input)?;
			values.insert(ext.identifier.clone(), ExtensionValue::Bytes(era.encode()));
			continue;
		}
		if chain_info.types.is_zero_sized(ext.ty) {
			continue;
		}
		let value = chain_info.types.decode_value(ext.ty, input).map_err(|source| {
			ExtrinsicError::Codec { identifier: ext.identifier.clone(), type_id: ext.ty, source }
		})?;
		values.insert(ext.identifier.clone(), value);
	}
	Ok(values)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing;

	fn hex_of(bytes: &[u8]) -> String {
		hex::encode(bytes)
	}

	#[test]
	fn v5_bare_known_call() {
		let encoder = ExtrinsicEncoder::new(testing::bare_v5_chain_info());
		assert_eq!(hex_of(&encoder.encode_unsigned(&[0x00, 0x01])), "0c050001");
	}

	#[test]
	fn v4_bare_known_call() {
		let encoder = ExtrinsicEncoder::new(testing::bare_v4_chain_info());
		assert_eq!(hex_of(&encoder.encode_unsigned(&[0x00, 0x01])), "0c040001");
	}

	#[test]
	fn v5_bare_single_byte_call() {
		let encoder = ExtrinsicEncoder::new(testing::bare_v5_chain_info());
		assert_eq!(hex_of(&encoder.encode_unsigned(&[0xff])), "0805ff");
	}

	#[test]
	fn v4_bare_empty_call() {
		let encoder = ExtrinsicEncoder::new(testing::bare_v4_chain_info());
		assert_eq!(hex_of(&encoder.encode_unsigned(&[])), "0404");
	}

	#[test]
	fn v5_signed_envelope_layout() {
		let signer: Vec<u8> = (0u8..32).collect();
		let signature = vec![0u8; 64];
		let data = SignedData {
			signature_type: SignatureType::from_signature(&signature),
			signer: signer.clone(),
			signature,
			extensions: ExtensionValues::new(),
			additional_signed: ExtensionValues::new(),
			call_data: vec![],
			signing_payload: vec![],
		};
		let encoder = ExtrinsicEncoder::new(testing::bare_v5_chain_info());
		let bytes = encoder.encode(&data).unwrap();
		// Skip the compact length prefix (2 bytes for a 99-byte body).
		let body = &bytes[2..];
		assert_eq!(body[0], 0x85);
		assert_eq!(body[1], 0x00);
		assert_eq!(&body[2..34], signer.as_slice());
		assert_eq!(body[34], 0x00);
		assert!(body[35..99].iter().all(|&b| b == 0));
	}

	#[test]
	fn signed_version_byte_sets_bit_7() {
		let data = testing::signed_data(&testing::v14_chain_info());
		let encoder = ExtrinsicEncoder::new(testing::v14_chain_info());
		let bytes = encoder.encode(&data).unwrap();
		let (_, body) = testing::split_length_prefix(&bytes);
		assert_eq!(body[0], 0x84);
	}

	#[test]
	fn general_mode_carries_the_extension_version_byte() {
		let info = testing::v16_chain_info();
		let encoder = ExtrinsicEncoder::new(info.clone());
		let data = testing::signed_data(&info);
		let bytes = encoder.encode_general(&data.call_data, &data.extensions, 0).unwrap();
		let (_, body) = testing::split_length_prefix(&bytes);
		assert_eq!(body[0], 0x45);
		assert_eq!(body[1], 0x00);
	}

	#[test]
	fn general_mode_is_rejected_on_v4_chains() {
		let info = testing::v14_chain_info();
		let encoder = ExtrinsicEncoder::new(info.clone());
		let data = testing::signed_data(&info);
		let result = encoder.encode_general(&data.call_data, &data.extensions, 0);
		assert!(matches!(result, Err(ExtrinsicError::UnsupportedVersion(4))));
	}

	#[test]
	fn missing_extension_value_names_the_extension() {
		let info = testing::v16_chain_info();
		let encoder = ExtrinsicEncoder::new(info.clone());
		let mut data = testing::signed_data(&info);
		data.extensions = ExtensionValues::new();
		match encoder.encode(&data) {
			Err(ExtrinsicError::MissingExtensionValue(identifier)) => {
				assert_eq!(identifier, "CheckMortality");
			},
			other => panic!("expected MissingExtensionValue, got {other:?}"),
		}
	}

	#[test]
	fn era_value_must_be_pre_encoded_bytes() {
		let info = testing::v14_chain_info();
		let encoder = ExtrinsicEncoder::new(info.clone());
		let mut data = testing::signed_data(&info);
		data.extensions
			.insert("CheckMortality".into(), ExtensionValue::U32(0));
		assert!(matches!(encoder.encode(&data), Err(ExtrinsicError::EraFormat(_))));
	}

	#[test]
	fn encoding_is_deterministic() {
		let info = testing::v14_chain_info();
		let encoder = ExtrinsicEncoder::new(info.clone());
		let data = testing::signed_data(&info);
		assert_eq!(encoder.encode(&data).unwrap(), encoder.encode(&data).unwrap());
	}

	#[test]
	fn bare_round_trip() {
		let encoder = ExtrinsicEncoder::new(testing::bare_v5_chain_info());
		let bytes = encoder.encode_unsigned(&[0x2a, 0x2b, 0x2c]);
		let decoded = encoder.decode(&bytes).unwrap();
		assert_eq!(decoded.version, 5);
		assert!(matches!(decoded.body, ExtrinsicBody::Bare));
		assert_eq!(decoded.call_data, vec![0x2a, 0x2b, 0x2c]);
		assert_eq!(encoder.encode_unsigned(&decoded.call_data), bytes);
	}

	#[test]
	fn signed_round_trip_re_encodes_byte_identically() {
		let info = testing::v14_chain_info();
		let encoder = ExtrinsicEncoder::new(info.clone());
		let data = testing::signed_data(&info);
		let bytes = encoder.encode(&data).unwrap();

		let decoded = encoder.decode(&bytes).unwrap();
		let ExtrinsicBody::Signed { address, signature_type, signature, extensions } = decoded.body
		else {
			panic!("expected a signed body");
		};
		let re_encoded = encoder
			.encode(&SignedData {
				signer: address.as_bytes().to_vec(),
				signature,
				signature_type,
				extensions,
				additional_signed: ExtensionValues::new(),
				call_data: decoded.call_data,
				signing_payload: vec![],
			})
			.unwrap();
		assert_eq!(re_encoded, bytes);
	}

	#[test]
	fn general_round_trip_re_encodes_byte_identically() {
		let info = testing::v16_chain_info();
		let encoder = ExtrinsicEncoder::new(info.clone());
		let data = testing::signed_data(&info);
		let bytes = encoder.encode_general(&data.call_data, &data.extensions, 3).unwrap();

		let decoded = encoder.decode(&bytes).unwrap();
		let ExtrinsicBody::General { extension_version, extensions } = decoded.body else {
			panic!("expected a general body");
		};
		assert_eq!(extension_version, 3);
		let re_encoded =
			encoder.encode_general(&decoded.call_data, &extensions, extension_version).unwrap();
		assert_eq!(re_encoded, bytes);
	}

	#[test]
	fn unknown_version_bytes_are_rejected() {
		let encoder = ExtrinsicEncoder::new(testing::bare_v5_chain_info());
		for version_byte in [0x06u8, 0x44, 0xc5, 0x00, 0x7f] {
			let bytes = length_prefixed(vec![version_byte, 0x00]);
			assert!(
				matches!(encoder.decode(&bytes), Err(ExtrinsicError::UnsupportedVersion(v)) if v == version_byte),
				"byte {version_byte:#04x} should be rejected"
			);
		}
	}

	#[test]
	fn length_prefix_mismatch_is_rejected() {
		let encoder = ExtrinsicEncoder::new(testing::bare_v4_chain_info());
		// compact(10) but only two bytes of body.
		let mut bytes = Compact(10u32).encode();
		bytes.extend_from_slice(&[0x04, 0x00]);
		assert!(matches!(encoder.decode(&bytes), Err(ExtrinsicError::Truncated(_))));
	}
}
