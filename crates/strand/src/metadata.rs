// SPDX-License-Identifier: GPL-3.0

//! Resolved chain metadata as consumed by the encoding pipeline.
//!
//! Parsing raw runtime metadata is out of scope; the embedding application
//! hands the library a [`ChainInfo`] carrying the extrinsic format
//! descriptor and a type registry. From that the library derives the
//! extrinsic format version and the ordered transaction extension schema.

use crate::{
	registry::TypeRegistry,
	strings::extensions::identifiers::{CHECK_ERA, CHECK_MORTALITY},
};
use std::{fmt, sync::Arc};

/// Extrinsic format version 4 (V14/V15 metadata, and V16 without V5 support).
pub const EXTRINSIC_V4: u8 = 4;
/// Extrinsic format version 5 (V16 metadata advertising it).
pub const EXTRINSIC_V5: u8 = 5;

/// Runtime metadata generation the [`ChainInfo`] was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataVersion {
	V14,
	V15,
	V16,
}

/// One transaction extension as declared by metadata.
///
/// V14/V15 metadata calls these "signed extensions" and every entry
/// contributes to both the extrinsic and the signing payload. V16
/// "transaction extensions" flag the two contributions independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionExtensionMeta {
	/// Metadata identifier, e.g. `CheckNonce`.
	pub identifier: String,
	/// Type id of the value encoded inside the extrinsic.
	pub ty: u32,
	/// Type id of the implicit value that only enters the signing payload.
	pub implicit_ty: u32,
	/// Whether the extension contributes bytes to the extrinsic.
	pub in_extrinsic: bool,
	/// Whether the extension contributes bytes to the signing payload.
	pub in_signed_data: bool,
}

impl TransactionExtensionMeta {
	/// A V14/V15-style signed extension: contributes to both byte streams.
	pub fn signed(identifier: impl Into<String>, ty: u32, implicit_ty: u32) -> Self {
		Self { identifier: identifier.into(), ty, implicit_ty, in_extrinsic: true, in_signed_data: true }
	}
}

/// The extrinsic format descriptor of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrinsicMeta {
	/// Extrinsic format versions the runtime accepts.
	pub versions: Vec<u8>,
	/// Transaction extensions in metadata declaration order.
	///
	/// The order is normative: encoding walks this list front to back.
	pub extensions: Vec<TransactionExtensionMeta>,
}

/// Resolved runtime metadata, as far as this library consumes it.
#[derive(Clone)]
pub struct ChainInfo {
	pub metadata_version: MetadataVersion,
	pub extrinsic: ExtrinsicMeta,
	pub types: Arc<dyn TypeRegistry>,
}

impl ChainInfo {
	/// The extrinsic format version to produce for this chain.
	///
	/// V16 metadata advertising version 5 selects the V5 format; everything
	/// else encodes V4.
	pub fn detected_version(&self) -> u8 {
		if self.metadata_version == MetadataVersion::V16 &&
			self.extrinsic.versions.contains(&EXTRINSIC_V5)
		{
			EXTRINSIC_V5
		} else {
			EXTRINSIC_V4
		}
	}

	/// The ordered transaction extension schema.
	pub fn extension_schema(&self) -> &[TransactionExtensionMeta] {
		&self.extrinsic.extensions
	}

	/// Whether the schema declares an extension with the given identifier.
	pub fn has_extension(&self, identifier: &str) -> bool {
		self.extrinsic.extensions.iter().any(|ext| ext.identifier == identifier)
	}

	/// The identifier the schema uses for the mortality extension.
	///
	/// Defaults to `CheckMortality` when the schema declares neither spelling.
	pub(crate) fn era_identifier(&self) -> &str {
		if self.has_extension(CHECK_ERA) { CHECK_ERA } else { CHECK_MORTALITY }
	}
}

impl fmt::Debug for ChainInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChainInfo")
			.field("metadata_version", &self.metadata_version)
			.field("extrinsic", &self.extrinsic)
			.finish_non_exhaustive()
	}
}

/// Identifiers treated as pre-encoded era bytes by the encoder.
pub(crate) fn is_era_identifier(identifier: &str) -> bool {
	identifier == CHECK_MORTALITY || identifier == CHECK_ERA
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing;

	#[test]
	fn v14_metadata_detects_version_4() {
		assert_eq!(testing::v14_chain_info().detected_version(), EXTRINSIC_V4);
	}

	#[test]
	fn v15_metadata_detects_version_4() {
		assert_eq!(testing::v15_chain_info().detected_version(), EXTRINSIC_V4);
	}

	#[test]
	fn v16_metadata_with_v5_detects_version_5() {
		assert_eq!(testing::v16_chain_info().detected_version(), EXTRINSIC_V5);
	}

	#[test]
	fn v16_metadata_without_v5_detects_version_4() {
		assert_eq!(testing::v16_v4_only_chain_info().detected_version(), EXTRINSIC_V4);
	}

	#[test]
	fn schema_preserves_metadata_order() {
		let info = testing::v14_chain_info();
		let identifiers: Vec<_> =
			info.extension_schema().iter().map(|ext| ext.identifier.as_str()).collect();
		assert_eq!(identifiers[0], "CheckNonZeroSender");
		assert_eq!(identifiers.last().copied(), Some("CheckMetadataHash"));
	}

	#[test]
	fn era_identifier_follows_schema_spelling() {
		assert_eq!(testing::v14_chain_info().era_identifier(), "CheckMortality");
		assert_eq!(testing::check_era_chain_info().era_identifier(), "CheckEra");
	}
}
