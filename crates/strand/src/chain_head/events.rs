// SPDX-License-Identifier: GPL-3.0

//! Typed `chainHead_v1_followEvent` messages.
//!
//! Raw subscription notifications are discriminated on their `event` field
//! and forwarded as [`FollowEvent`] variants; the client never synthesizes
//! events of its own.

use crate::{error::ChainHeadError, strings::rpc::fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminators this library understands; anything else raises
/// [`ChainHeadError::UnknownEvent`].
const KNOWN_EVENTS: &[&str] = &[
	"initialized",
	"newBlock",
	"bestBlockChanged",
	"finalized",
	"stop",
	"operationBodyDone",
	"operationCallDone",
	"operationStorageItems",
	"operationStorageDone",
	"operationError",
	"operationInaccessible",
];

/// One event on a follow subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum FollowEvent {
	/// First event of every session: the current finalized block.
	Initialized(Initialized),
	/// A new non-finalized block was announced.
	NewBlock(NewBlock),
	/// The best block moved.
	BestBlockChanged(BestBlockChanged),
	/// Blocks were finalized (and possibly pruned).
	Finalized(Finalized),
	/// The server ended the session; no further events follow.
	Stop,
	/// A `body` operation completed.
	#[serde(rename_all = "camelCase")]
	OperationBodyDone {
		operation_id: String,
		/// Hex-encoded extrinsics of the block.
		value: Vec<String>,
	},
	/// A `call` operation completed.
	#[serde(rename_all = "camelCase")]
	OperationCallDone {
		operation_id: String,
		/// Hex-encoded runtime call output.
		output: String,
	},
	/// A partial batch of storage results; more may follow.
	#[serde(rename_all = "camelCase")]
	OperationStorageItems {
		operation_id: String,
		items: Vec<StorageResultItem>,
	},
	/// A `storage` operation finished delivering results.
	#[serde(rename_all = "camelCase")]
	OperationStorageDone {
		operation_id: String,
	},
	/// An operation failed.
	#[serde(rename_all = "camelCase")]
	OperationError {
		operation_id: String,
		error: String,
	},
	/// The operation's block was unpinned before it completed.
	#[serde(rename_all = "camelCase")]
	OperationInaccessible {
		operation_id: String,
	},
}

impl FollowEvent {
	/// Discriminate a raw notification payload into a typed event.
	pub fn from_json(value: Value) -> Result<Self, ChainHeadError> {
		let tag = value
			.get(fields::EVENT)
			.and_then(Value::as_str)
			.unwrap_or_default()
			.to_owned();
		match serde_json::from_value(value) {
			Ok(event) => Ok(event),
			Err(source) if KNOWN_EVENTS.contains(&tag.as_str()) => {
				Err(ChainHeadError::MalformedEvent { event: tag, source })
			},
			Err(_) => Err(ChainHeadError::UnknownEvent(tag)),
		}
	}
}

/// Payload of the `initialized` event.
///
/// Servers have emitted the finalized block both as a scalar
/// `finalizedBlockHash` and as a `finalizedBlockHashes` list; the accessor
/// papers over the difference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Initialized {
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	finalized_block_hashes: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	finalized_block_hash: Option<String>,
	/// Runtime of the finalized block, when requested at follow time.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub finalized_block_runtime: Option<RuntimeEvent>,
}

impl Initialized {
	/// The finalized block hash, from whichever field the server used.
	pub fn finalized_block_hash(&self) -> Option<&str> {
		self.finalized_block_hash
			.as_deref()
			.or_else(|| self.finalized_block_hashes.first().map(String::as_str))
	}

	/// Every finalized hash the event carried.
	pub fn finalized_block_hashes(&self) -> &[String] {
		&self.finalized_block_hashes
	}
}

/// Payload of the `newBlock` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlock {
	pub block_hash: String,
	pub parent_block_hash: String,
	/// Present when the block changes the runtime.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub new_runtime: Option<RuntimeEvent>,
}

/// Payload of the `bestBlockChanged` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestBlockChanged {
	pub best_block_hash: String,
}

/// Payload of the `finalized` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finalized {
	pub finalized_block_hashes: Vec<String>,
	pub pruned_block_hashes: Vec<String>,
}

/// Runtime information attached to block events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuntimeEvent {
	/// The runtime decoded cleanly.
	Valid(ValidRuntime),
	/// The runtime could not be decoded.
	Invalid {
		error: String,
	},
}

/// A decoded runtime specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidRuntime {
	pub spec: crate::chain_data::RuntimeVersion,
}

/// Response to `chainHead_v1_body` / `_call` / `_storage`.
///
/// `started` hands back the operation id the follow stream will use for the
/// results; `limitReached` asks the client to back off and retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum OperationResponse {
	#[serde(rename_all = "camelCase")]
	Started {
		operation_id: String,
		/// For storage operations: how many query items were discarded.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		discarded_items: Option<u32>,
	},
	LimitReached,
}

impl OperationResponse {
	/// The operation id, when the operation started.
	pub fn operation_id(&self) -> Option<&str> {
		match self {
			Self::Started { operation_id, .. } => Some(operation_id),
			Self::LimitReached => None,
		}
	}
}

/// One item of a `chainHead_v1_storage` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageQueryItem {
	/// Storage key (hex-encoded).
	pub key: String,
	/// Query type.
	#[serde(rename = "type")]
	pub query_type: StorageQueryType,
}

/// Storage query type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageQueryType {
	/// Get value.
	Value,
	/// Get hash of value.
	Hash,
	/// Get the Merkle value of the closest descendant.
	ClosestDescendantMerkleValue,
	/// Get the values of all descendants.
	DescendantsValues,
	/// Get the hashes of all descendants.
	DescendantsHashes,
}

/// One storage result delivered through `operationStorageItems`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageResultItem {
	/// Storage key (hex-encoded).
	pub key: String,
	/// Storage value (hex-encoded), if requested and present.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	/// Hash of the value, if requested.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hash: Option<String>,
	/// Closest descendant Merkle value, if requested.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub closest_descendant_merkle_value: Option<String>,
}
