// SPDX-License-Identifier: GPL-3.0

//! Population of transaction extension values.
//!
//! The builder fills the two parallel value maps the encoding pipeline
//! consumes: `extensions` (encoded inside the extrinsic) and
//! `additional_signed` (signing payload only). It knows how to populate the
//! canonical Polkadot SDK extension set; anything beyond that is set through
//! the generic setters.

use crate::{
	chain_data::ChainData,
	error::ExtrinsicError,
	extrinsic::era::Era,
	metadata::{is_era_identifier, ChainInfo},
	registry::{ExtensionValue, ExtensionValues},
	strings::extensions::identifiers::{
		CHARGE_ASSET_TX_PAYMENT, CHARGE_TRANSACTION_PAYMENT, CHECK_GENESIS, CHECK_METADATA_HASH,
		CHECK_NONCE, CHECK_SPEC_VERSION, CHECK_TX_VERSION,
	},
};
use sp_core::H256;
use std::{fmt::Write, sync::Arc};

/// Inputs for the canonical extension set.
#[derive(Debug, Clone)]
pub struct StandardExtensionParams {
	pub spec_version: u32,
	pub transaction_version: u32,
	pub genesis_hash: H256,
	/// Mortality checkpoint for mortal transactions.
	pub block_hash: H256,
	/// Block number the era phase is computed from.
	pub block_number: u64,
	pub nonce: u64,
	/// Validity window in blocks; `None` produces an immortal transaction.
	pub era_period: Option<u64>,
	/// Fee tip, zero by default.
	pub tip: u128,
}

impl StandardExtensionParams {
	/// Bridge fetched chain state into extension inputs.
	pub fn from_chain_data(data: &ChainData, era_period: Option<u64>, tip: u128) -> Self {
		Self {
			spec_version: data.spec_version,
			transaction_version: data.transaction_version,
			genesis_hash: data.genesis_hash,
			block_hash: data.block_hash,
			block_number: data.block_number,
			nonce: data.nonce,
			era_period,
			tip,
		}
	}
}

/// Builder for the two extension value maps.
#[derive(Debug, Clone)]
pub struct ExtensionBuilder {
	chain_info: Arc<ChainInfo>,
	extensions: ExtensionValues,
	additional_signed: ExtensionValues,
}

impl ExtensionBuilder {
	pub fn new(chain_info: Arc<ChainInfo>) -> Self {
		Self { chain_info, extensions: ExtensionValues::new(), additional_signed: ExtensionValues::new() }
	}

	/// Populate the canonical extension set.
	///
	/// Covers `CheckSpecVersion`, `CheckTxVersion`, `CheckGenesis`, the
	/// mortality pair, `CheckNonce` and `ChargeTransactionPayment`; the
	/// zero-sized markers (`CheckWeight`, `CheckNonZeroSender`) need no
	/// value. `CheckMetadataHash`, when the chain declares it, is disabled
	/// unless [`Self::metadata_hash`] enables it afterwards.
	pub fn standard(&mut self, params: StandardExtensionParams) -> &mut Self {
		self.set_implicit(CHECK_SPEC_VERSION, ExtensionValue::U32(params.spec_version));
		self.set_implicit(CHECK_TX_VERSION, ExtensionValue::U32(params.transaction_version));
		self.set_implicit(CHECK_GENESIS, ExtensionValue::Hash(params.genesis_hash));
		match params.era_period {
			Some(period) => self.mortal(period, params.block_number, params.block_hash),
			None => self.immortal(params.genesis_hash),
		};
		self.set(CHECK_NONCE, ExtensionValue::U64(params.nonce));
		self.set(CHARGE_TRANSACTION_PAYMENT, ExtensionValue::U128(params.tip));
		self.metadata_hash(None);
		self
	}

	/// Set the metadata hash commitment, when the chain declares the
	/// extension: `None` disables the check, `Some` commits to the digest.
	pub fn metadata_hash(&mut self, hash: Option<H256>) -> &mut Self {
		if self.chain_info.has_extension(CHECK_METADATA_HASH) {
			self.set(CHECK_METADATA_HASH, ExtensionValue::OptionHash(hash));
			self.set_implicit(CHECK_METADATA_HASH, ExtensionValue::OptionHash(hash));
		}
		self
	}

	/// Set the optional asset fee id, when the chain charges fees through
	/// `ChargeAssetTxPayment`.
	pub fn asset_id(&mut self, id: Option<u32>) -> &mut Self {
		if self.chain_info.has_extension(CHARGE_ASSET_TX_PAYMENT) {
			self.set(CHARGE_ASSET_TX_PAYMENT, ExtensionValue::OptionU32(id));
		}
		self
	}

	/// Make the transaction immortal, checkpointed at genesis.
	pub fn immortal(&mut self, genesis_hash: H256) -> &mut Self {
		let identifier = self.chain_info.era_identifier().to_owned();
		self.set(&identifier, ExtensionValue::Bytes(Era::Immortal.encode()));
		self.set_implicit(&identifier, ExtensionValue::Hash(genesis_hash));
		self
	}

	/// Bound validity to `period` blocks around `current`, checkpointed at
	/// `block_hash`.
	pub fn mortal(&mut self, period: u64, current: u64, block_hash: H256) -> &mut Self {
		let identifier = self.chain_info.era_identifier().to_owned();
		let era = Era::from_period(period, current);
		self.set(&identifier, ExtensionValue::Bytes(era.encode()));
		self.set_implicit(&identifier, ExtensionValue::Hash(block_hash));
		self
	}

	/// Set an in-block extension value by identifier.
	pub fn set(&mut self, identifier: &str, value: ExtensionValue) -> &mut Self {
		self.extensions.insert(identifier.to_owned(), value);
		self
	}

	/// Set a signing-payload-only value by identifier.
	pub fn set_implicit(&mut self, identifier: &str, value: ExtensionValue) -> &mut Self {
		self.additional_signed.insert(identifier.to_owned(), value);
		self
	}

	/// Check that every non-zero-sized schema entry has a value in the
	/// respective map, and that the mortality entry carries era bytes.
	pub fn validate(&self) -> Result<(), ExtrinsicError> {
		let registry = &self.chain_info.types;
		for ext in self.chain_info.extension_schema() {
			if ext.in_extrinsic {
				if is_era_identifier(&ext.identifier) {
					match self.extensions.get(&ext.identifier) {
						Some(ExtensionValue::Bytes(_)) => {},
						Some(_) => return Err(ExtrinsicError::EraFormat(ext.identifier.clone())),
						None => {
							return Err(ExtrinsicError::MissingExtensionValue(
								ext.identifier.clone(),
							));
						},
					}
				} else if !registry.is_zero_sized(ext.ty) &&
					!self.extensions.contains_key(&ext.identifier)
				{
					return Err(ExtrinsicError::MissingExtensionValue(ext.identifier.clone()));
				}
			}
			if ext.in_signed_data &&
				!registry.is_zero_sized(ext.implicit_ty) &&
				!self.additional_signed.contains_key(&ext.identifier)
			{
				return Err(ExtrinsicError::MissingExtensionValue(ext.identifier.clone()));
			}
		}
		Ok(())
	}

	/// One line per schema entry: `identifier: in-block / implicit`.
	pub fn summary(&self) -> String {
		let mut out = String::new();
		for ext in self.chain_info.extension_schema() {
			let value = self
				.extensions
				.get(&ext.identifier)
				.map(ExtensionValue::to_string)
				.unwrap_or_else(|| "-".into());
			let implicit = self
				.additional_signed
				.get(&ext.identifier)
				.map(ExtensionValue::to_string)
				.unwrap_or_else(|| "-".into());
			let _ = writeln!(out, "{}: {value} / {implicit}", ext.identifier);
		}
		out
	}

	/// The values encoded inside the extrinsic.
	pub fn extensions(&self) -> &ExtensionValues {
		&self.extensions
	}

	/// The values that only enter the signing payload.
	pub fn additional_signed(&self) -> &ExtensionValues {
		&self.additional_signed
	}

	/// Consume the builder, yielding `(extensions, additional_signed)`.
	pub fn into_parts(self) -> (ExtensionValues, ExtensionValues) {
		(self.extensions, self.additional_signed)
	}
}
