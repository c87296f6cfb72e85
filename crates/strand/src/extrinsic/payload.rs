// SPDX-License-Identifier: GPL-3.0

//! Signing payload assembly.
//!
//! The payload is what an external signer signs and what the node
//! reconstructs to verify the signature: call bytes, then the in-block
//! extension bytes, then the implicit "additional signed" bytes, all in
//! schema order. Oversized payloads are replaced by their Blake2b-256
//! digest before signing.

use crate::{
	error::ExtrinsicError,
	extrinsic::encoder::{encode_additional_signed, encode_extensions},
	metadata::ChainInfo,
	registry::ExtensionValues,
};

/// Payloads longer than this many bytes are signed through their digest.
pub const SIGNING_PAYLOAD_HASH_THRESHOLD: usize = 256;

/// Build the exact bytes an external signer must sign.
///
/// Returns the raw concatenation when it fits the threshold, otherwise its
/// 32-byte Blake2b-256 digest.
pub fn build_signing_payload(
	chain_info: &ChainInfo,
	call_data: &[u8],
	extensions: &ExtensionValues,
	additional_signed: &ExtensionValues,
) -> Result<Vec<u8>, ExtrinsicError> {
	let mut payload = call_data.to_vec();
	encode_extensions(chain_info, extensions, &mut payload)?;
	encode_additional_signed(chain_info, additional_signed, &mut payload)?;

	if payload.len() > SIGNING_PAYLOAD_HASH_THRESHOLD {
		Ok(sp_core::blake2_256(&payload).to_vec())
	} else {
		Ok(payload)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{extrinsic::ExtensionBuilder, registry::ExtensionValues, testing};

	#[test]
	fn short_payloads_pass_through_unchanged() {
		let info = testing::bare_v4_chain_info();
		let call_data = vec![0xaa; 16];
		let payload = build_signing_payload(
			&info,
			&call_data,
			&ExtensionValues::new(),
			&ExtensionValues::new(),
		)
		.unwrap();
		assert_eq!(payload, call_data);
	}

	#[test]
	fn payloads_at_the_threshold_are_not_hashed() {
		let info = testing::bare_v4_chain_info();
		let call_data = vec![0xbb; SIGNING_PAYLOAD_HASH_THRESHOLD];
		let payload = build_signing_payload(
			&info,
			&call_data,
			&ExtensionValues::new(),
			&ExtensionValues::new(),
		)
		.unwrap();
		assert_eq!(payload.len(), SIGNING_PAYLOAD_HASH_THRESHOLD);
	}

	#[test]
	fn oversized_payloads_are_replaced_by_their_digest() {
		let info = testing::bare_v4_chain_info();
		let call_data = vec![0xcc; SIGNING_PAYLOAD_HASH_THRESHOLD + 1];
		let payload = build_signing_payload(
			&info,
			&call_data,
			&ExtensionValues::new(),
			&ExtensionValues::new(),
		)
		.unwrap();
		assert_eq!(payload, sp_core::blake2_256(&call_data).to_vec());
	}

	#[test]
	fn payload_concatenates_call_extension_and_implicit_bytes() {
		let info = testing::v14_chain_info();
		let mut builder = ExtensionBuilder::new(info.clone());
		builder.standard(testing::standard_params());

		let call_data = vec![0x01, 0x02];
		let payload = build_signing_payload(
			&info,
			&call_data,
			builder.extensions(),
			builder.additional_signed(),
		)
		.unwrap();

		let mut expected = call_data.clone();
		crate::extrinsic::encoder::encode_extensions(&info, builder.extensions(), &mut expected)
			.unwrap();
		crate::extrinsic::encoder::encode_additional_signed(
			&info,
			builder.additional_signed(),
			&mut expected,
		)
		.unwrap();
		assert!(payload.starts_with(&call_data));
		assert_eq!(payload, expected);
	}

	#[test]
	fn missing_implicit_value_surfaces_the_identifier() {
		let info = testing::v14_chain_info();
		let mut builder = ExtensionBuilder::new(info.clone());
		builder.standard(testing::standard_params());
		let (extensions, mut additional) = builder.into_parts();
		additional.remove("CheckGenesis");

		match build_signing_payload(&info, &[], &extensions, &additional) {
			Err(ExtrinsicError::MissingExtensionValue(identifier)) => {
				assert_eq!(identifier, "CheckGenesis");
			},
			other => panic!("expected MissingExtensionValue, got {other:?}"),
		}
	}
}
