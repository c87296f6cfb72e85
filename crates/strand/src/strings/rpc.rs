// SPDX-License-Identifier: GPL-3.0

//! String constants for JSON-RPC communication.

/// JSON-RPC method names used by the library.
///
/// These match the method names in the Polkadot SDK JSON-RPC specification.
/// The `chain_*`, `state_*` and `system_*` entries are legacy methods, used
/// where the new spec has no request/response equivalent (account nonce,
/// runtime version).
pub mod methods {
	pub const CHAIN_SPEC_GENESIS_HASH: &str = "chainSpec_v1_genesisHash";
	pub const CHAIN_SPEC_CHAIN_NAME: &str = "chainSpec_v1_chainName";
	pub const CHAIN_SPEC_PROPERTIES: &str = "chainSpec_v1_properties";
	pub const CHAIN_HEAD_FOLLOW: &str = "chainHead_v1_follow";
	pub const CHAIN_HEAD_UNFOLLOW: &str = "chainHead_v1_unfollow";
	pub const CHAIN_HEAD_HEADER: &str = "chainHead_v1_header";
	pub const CHAIN_HEAD_BODY: &str = "chainHead_v1_body";
	pub const CHAIN_HEAD_CALL: &str = "chainHead_v1_call";
	pub const CHAIN_HEAD_STORAGE: &str = "chainHead_v1_storage";
	pub const CHAIN_HEAD_UNPIN: &str = "chainHead_v1_unpin";
	pub const TRANSACTION_BROADCAST: &str = "transaction_v1_broadcast";
	pub const TRANSACTION_STOP: &str = "transaction_v1_stop";
	pub const CHAIN_GET_FINALIZED_HEAD: &str = "chain_getFinalizedHead";
	pub const CHAIN_GET_HEADER: &str = "chain_getHeader";
	pub const STATE_GET_RUNTIME_VERSION: &str = "state_getRuntimeVersion";
	pub const SYSTEM_ACCOUNT_NEXT_INDEX: &str = "system_accountNextIndex";
}

/// Field names of the `chainHead_v1_followEvent` wire messages.
pub mod fields {
	/// Discriminator field of every follow event.
	pub const EVENT: &str = "event";
}
