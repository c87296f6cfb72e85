// SPDX-License-Identifier: GPL-3.0

//! Extrinsic encoding and decoding error types.

use crate::registry::CodecFailure;
use thiserror::Error;

/// Errors that can occur while encoding or decoding extrinsics.
///
/// Variants carry the failing extension identifier or type id where one
/// exists; that is the diagnostic that matters when a signing payload does
/// not match what the node reconstructs.
#[derive(Debug, Error)]
pub enum ExtrinsicError {
	/// The schema requires a value that was not supplied.
	#[error("No value supplied for extension `{0}`")]
	MissingExtensionValue(String),
	/// The mortality extension carried something other than pre-encoded era bytes.
	#[error("Extension `{0}` must carry pre-encoded era bytes")]
	EraFormat(String),
	/// Version byte outside the supported set, or a V5-only mode requested on
	/// a V4 chain.
	#[error("Unsupported extrinsic version: {0:#04x}")]
	UnsupportedVersion(u8),
	/// A codec failed for a specific extension.
	#[error("Codec failure for extension `{identifier}` (type id {type_id}): {source}")]
	Codec {
		/// The extension being encoded or decoded.
		identifier: String,
		/// The metadata type id whose codec failed.
		type_id: u32,
		/// The underlying codec error.
		#[source]
		source: CodecFailure,
	},
	/// The input ended before the structure was complete.
	#[error("Extrinsic bytes ended prematurely: {0}")]
	Truncated(String),
	/// An address or signature variant byte outside the known set.
	#[error("Unknown {kind} variant: {variant:#04x}")]
	UnknownVariant {
		/// What was being decoded ("address" or "signature").
		kind: &'static str,
		/// The offending variant byte.
		variant: u8,
	},
}
