// SPDX-License-Identifier: GPL-3.0

//! String constants for transaction extension handling.

/// Transaction extension identifiers as declared by runtime metadata.
///
/// The set below covers the canonical `frame_system` /
/// `pallet_transaction_payment` extensions found on Polkadot SDK chains.
/// Chains are free to declare others; the encoder only needs identifiers for
/// the entries it treats specially (the era pair) and the builder for the
/// entries it knows how to populate.
pub mod identifiers {
	pub const CHECK_NON_ZERO_SENDER: &str = "CheckNonZeroSender";
	pub const CHECK_SPEC_VERSION: &str = "CheckSpecVersion";
	pub const CHECK_TX_VERSION: &str = "CheckTxVersion";
	pub const CHECK_GENESIS: &str = "CheckGenesis";
	/// Mortality extension on current runtimes.
	pub const CHECK_MORTALITY: &str = "CheckMortality";
	/// Mortality extension on older runtimes; wire-compatible with
	/// [`CHECK_MORTALITY`].
	pub const CHECK_ERA: &str = "CheckEra";
	pub const CHECK_NONCE: &str = "CheckNonce";
	pub const CHECK_WEIGHT: &str = "CheckWeight";
	pub const CHARGE_TRANSACTION_PAYMENT: &str = "ChargeTransactionPayment";
	pub const CHARGE_ASSET_TX_PAYMENT: &str = "ChargeAssetTxPayment";
	pub const CHECK_METADATA_HASH: &str = "CheckMetadataHash";
}
