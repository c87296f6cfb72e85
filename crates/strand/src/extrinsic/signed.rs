// SPDX-License-Identifier: GPL-3.0

//! The polymorphic address and signature envelope of signed extrinsics.

use crate::{
	error::ExtrinsicError,
	registry::ExtensionValues,
};
use scale::{Compact, Decode, Encode};

/// `MultiAddress::Id` variant byte: 32-byte account id.
const ADDRESS_ID: u8 = 0x00;
/// `MultiAddress::Raw` variant byte: length-prefixed raw bytes.
const ADDRESS_RAW: u8 = 0x02;
/// `MultiAddress::Address20` variant byte: 20-byte (Ethereum-style) address.
const ADDRESS_20: u8 = 0x04;

const SIGNATURE_ED25519: u8 = 0x00;
const SIGNATURE_SR25519: u8 = 0x01;
const SIGNATURE_ECDSA: u8 = 0x02;

const ED25519_LEN: usize = 64;
const SR25519_LEN: usize = 64;
const ECDSA_LEN: usize = 65;

/// On-wire address of the signing account.
///
/// The variant is chosen from the signer byte length: 32 bytes map to
/// `Id`, 20 bytes to `Address20` and anything else to `Raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiAddress {
	/// A 32-byte account id.
	Id([u8; 32]),
	/// Raw bytes of any other length.
	Raw(Vec<u8>),
	/// A 20-byte address.
	Address20([u8; 20]),
}

impl MultiAddress {
	/// Route signer bytes to the variant their length selects.
	pub fn from_signer(signer: &[u8]) -> Self {
		match signer.len() {
			32 => Self::Id(signer.try_into().expect("length checked; qed")),
			20 => Self::Address20(signer.try_into().expect("length checked; qed")),
			_ => Self::Raw(signer.to_vec()),
		}
	}

	/// The account bytes without the variant framing.
	pub fn as_bytes(&self) -> &[u8] {
		match self {
			Self::Id(bytes) => bytes,
			Self::Raw(bytes) => bytes,
			Self::Address20(bytes) => bytes,
		}
	}

	/// Append the variant byte and payload to `out`.
	pub fn encode_to(&self, out: &mut Vec<u8>) {
		match self {
			Self::Id(bytes) => {
				out.push(ADDRESS_ID);
				out.extend_from_slice(bytes);
			},
			Self::Raw(bytes) => {
				out.push(ADDRESS_RAW);
				out.extend_from_slice(&Compact(bytes.len() as u32).encode());
				out.extend_from_slice(bytes);
			},
			Self::Address20(bytes) => {
				out.push(ADDRESS_20);
				out.extend_from_slice(bytes);
			},
		}
	}

	/// Decode an address from the front of `input`.
	pub fn decode(input: &mut &[u8]) -> Result<Self, ExtrinsicError> {
		let variant = take_byte(input, "address variant")?;
		match variant {
			ADDRESS_ID => Ok(Self::Id(take_array(input, "account id")?)),
			ADDRESS_20 => Ok(Self::Address20(take_array(input, "20-byte address")?)),
			ADDRESS_RAW => {
				let len = Compact::<u32>::decode(input)
					.map_err(|_| ExtrinsicError::Truncated("raw address length".into()))?
					.0 as usize;
				let bytes = take_bytes(input, len, "raw address")?;
				Ok(Self::Raw(bytes))
			},
			other => Err(ExtrinsicError::UnknownVariant { kind: "address", variant: other }),
		}
	}
}

/// Signature scheme of a signed extrinsic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureType {
	Ed25519,
	Sr25519,
	Ecdsa,
	/// Scheme not known to the caller; encoded as Sr25519.
	Unknown,
}

impl SignatureType {
	/// The `MultiSignature` variant byte this scheme encodes as.
	pub fn variant_byte(self) -> u8 {
		match self {
			Self::Ed25519 => SIGNATURE_ED25519,
			Self::Sr25519 | Self::Unknown => SIGNATURE_SR25519,
			Self::Ecdsa => SIGNATURE_ECDSA,
		}
	}

	/// Infer the scheme from signature bytes.
	///
	/// A 65-byte signature is ECDSA. For 64 bytes the high bit of the final
	/// byte separates Ed25519 (clear) from Sr25519 (set); signing tooling
	/// conventionally clamps Ed25519 signatures that way. Prefer an explicit
	/// scheme whenever one is known.
	pub fn from_signature(signature: &[u8]) -> Self {
		match signature.len() {
			ECDSA_LEN => Self::Ecdsa,
			ED25519_LEN if signature[ED25519_LEN - 1] & 0x80 == 0 => Self::Ed25519,
			SR25519_LEN => Self::Sr25519,
			_ => Self::Unknown,
		}
	}
}

/// Append the signature variant byte and raw signature bytes to `out`.
pub(crate) fn encode_signature(out: &mut Vec<u8>, signature: &[u8], signature_type: SignatureType) {
	out.push(signature_type.variant_byte());
	out.extend_from_slice(signature);
}

/// Decode a signature envelope from the front of `input`.
pub(crate) fn decode_signature(
	input: &mut &[u8],
) -> Result<(SignatureType, Vec<u8>), ExtrinsicError> {
	let variant = take_byte(input, "signature variant")?;
	let (signature_type, len) = match variant {
		SIGNATURE_ED25519 => (SignatureType::Ed25519, ED25519_LEN),
		SIGNATURE_SR25519 => (SignatureType::Sr25519, SR25519_LEN),
		SIGNATURE_ECDSA => (SignatureType::Ecdsa, ECDSA_LEN),
		other => return Err(ExtrinsicError::UnknownVariant { kind: "signature", variant: other }),
	};
	Ok((signature_type, take_bytes(input, len, "signature")?))
}

/// Everything the encoder needs to emit a signed extrinsic.
#[derive(Debug, Clone)]
pub struct SignedData {
	/// Address bytes of the signer; the length selects the address variant.
	pub signer: Vec<u8>,
	/// Raw signature bytes (64 or 65).
	pub signature: Vec<u8>,
	/// Signature scheme; use [`SignatureType::from_signature`] when unknown.
	pub signature_type: SignatureType,
	/// Values encoded inside the extrinsic, keyed by extension identifier.
	pub extensions: ExtensionValues,
	/// Values that only enter the signing payload.
	pub additional_signed: ExtensionValues,
	/// SCALE-encoded call bytes; opaque to the encoder.
	pub call_data: Vec<u8>,
	/// The payload the signature was produced over (raw or its digest).
	pub signing_payload: Vec<u8>,
}

pub(crate) fn take_byte(input: &mut &[u8], what: &str) -> Result<u8, ExtrinsicError> {
	let (&byte, rest) =
		input.split_first().ok_or_else(|| ExtrinsicError::Truncated(what.into()))?;
	*input = rest;
	Ok(byte)
}

pub(crate) fn take_bytes(
	input: &mut &[u8],
	len: usize,
	what: &str,
) -> Result<Vec<u8>, ExtrinsicError> {
	if input.len() < len {
		return Err(ExtrinsicError::Truncated(format!("{what}: need {len} bytes, have {}", input.len())));
	}
	let (bytes, rest) = input.split_at(len);
	*input = rest;
	Ok(bytes.to_vec())
}

fn take_array<const N: usize>(input: &mut &[u8], what: &str) -> Result<[u8; N], ExtrinsicError> {
	let bytes = take_bytes(input, N, what)?;
	Ok(bytes.try_into().expect("length checked; qed"))
}
