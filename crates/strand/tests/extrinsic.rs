// SPDX-License-Identifier: GPL-3.0

//! Wire-fidelity tests: hand-assembled extrinsic bytes in the shape found in
//! chain blocks must decode and re-encode byte-identically.

use scale::{Compact, Encode};
use strand::{testing, ExtrinsicBody, ExtrinsicEncoder, MultiAddress, SignatureType, SignedData};

/// Hand-assemble a V4 signed extrinsic the way it appears in a block: compact
/// length, version byte 0x84, MultiAddress::Id, Sr25519 signature, the
/// canonical extension bytes, call data.
fn build_signed_extrinsic_v4(call_data: &[u8]) -> Vec<u8> {
	let mut inner = Vec::new();
	// Version byte: signed (0x80) + v4 (0x04).
	inner.push(0x84);
	// Address: MultiAddress::Id variant (0x00) + 32-byte account.
	inner.push(0x00);
	inner.extend(testing::ALICE);
	// Signature: Sr25519 variant (0x01) + 64 bytes.
	inner.push(0x01);
	inner.extend([0x77u8; 64]);
	// Extension bytes in schema order:
	inner.push(0x00); // CheckMortality: immortal
	inner.extend(Compact(7u64).encode()); // CheckNonce
	inner.extend(Compact(0u128).encode()); // ChargeTransactionPayment
	inner.push(0x00); // CheckMetadataHash: disabled
	// Call data.
	inner.extend(call_data);
	// Prefix with compact length.
	let mut extrinsic = Compact(inner.len() as u32).encode();
	extrinsic.extend(inner);
	extrinsic
}

#[test]
fn block_shaped_v4_extrinsic_round_trips() {
	let info = testing::v14_chain_info();
	let encoder = ExtrinsicEncoder::new(info);
	let bytes = build_signed_extrinsic_v4(&[0x05, 0x03, 0x00]);

	let decoded = encoder.decode(&bytes).unwrap();
	assert_eq!(decoded.version, 4);
	assert_eq!(decoded.call_data, vec![0x05, 0x03, 0x00]);

	let ExtrinsicBody::Signed { address, signature_type, signature, extensions } = decoded.body
	else {
		panic!("expected a signed body");
	};
	assert_eq!(address, MultiAddress::Id(testing::ALICE));
	assert_eq!(signature_type, SignatureType::Sr25519);
	assert_eq!(signature, vec![0x77u8; 64]);

	let re_encoded = encoder
		.encode(&SignedData {
			signer: address.as_bytes().to_vec(),
			signature,
			signature_type,
			extensions,
			additional_signed: Default::default(),
			call_data: decoded.call_data,
			signing_payload: Vec::new(),
		})
		.unwrap();
	assert_eq!(re_encoded, bytes);
}

#[test]
fn bare_extrinsics_round_trip_for_both_versions() {
	for info in [testing::bare_v4_chain_info(), testing::bare_v5_chain_info()] {
		let encoder = ExtrinsicEncoder::new(info);
		let bytes = encoder.encode_unsigned(&[0x00, 0x01, 0x02]);
		let decoded = encoder.decode(&bytes).unwrap();
		assert!(matches!(decoded.body, ExtrinsicBody::Bare));
		assert_eq!(encoder.encode_unsigned(&decoded.call_data), bytes);
	}
}

#[test]
fn v5_signed_extrinsic_round_trips_with_extensions() {
	let info = testing::v16_chain_info();
	let encoder = ExtrinsicEncoder::new(info.clone());
	let data = testing::signed_data(&info);
	let bytes = encoder.encode(&data).unwrap();

	let (declared, body) = testing::split_length_prefix(&bytes);
	assert_eq!(declared, body.len());
	assert_eq!(body[0], 0x85);

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
			additional_signed: Default::default(),
			call_data: decoded.call_data,
			signing_payload: Vec::new(),
		})
		.unwrap();
	assert_eq!(re_encoded, bytes);
}

#[test]
fn v5_general_extrinsic_round_trips() {
	let info = testing::v16_chain_info();
	let encoder = ExtrinsicEncoder::new(info.clone());
	let data = testing::signed_data(&info);

	let bytes = encoder.encode_general(&data.call_data, &data.extensions, 0).unwrap();
	let (_, body) = testing::split_length_prefix(&bytes);
	assert_eq!(body[0], 0x45);
	assert_eq!(body[1], 0x00);

	let decoded = encoder.decode(&bytes).unwrap();
	let ExtrinsicBody::General { extension_version, extensions } = decoded.body else {
		panic!("expected a general body");
	};
	let re_encoded =
		encoder.encode_general(&decoded.call_data, &extensions, extension_version).unwrap();
	assert_eq!(re_encoded, bytes);
}
