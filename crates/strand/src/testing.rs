// SPDX-License-Identifier: GPL-3.0

//! Shared testing utilities for strand tests.
//!
//! This module provides the scriptable [`MockProvider`], the
//! [`MockRegistry`] codec table, and ready-made [`ChainInfo`] fixtures used
//! across unit and integration tests.

use crate::{
	error::ProviderError,
	extrinsic::{build_signing_payload, ExtensionBuilder, SignatureType, SignedData, StandardExtensionParams},
	metadata::{ChainInfo, ExtrinsicMeta, MetadataVersion, TransactionExtensionMeta},
	registry::{CodecFailure, ExtensionValue, TypeRegistry},
	rpc::{CancelHook, Provider, RpcErrorPayload, RpcResponse, Subscription, SubscriptionMessage},
	strings::extensions::identifiers,
};
use scale::{Compact, Decode, Encode};
use serde_json::Value;
use sp_core::H256;
use std::{
	collections::{HashMap, VecDeque},
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc, Mutex,
	},
};
use tokio::sync::mpsc;

/// Alice's public key (Sr25519).
pub const ALICE: [u8; 32] = [
	0xd4, 0x35, 0x93, 0xc7, 0x15, 0xfd, 0xd3, 0x1c, 0x61, 0x14, 0x1a, 0xbd, 0x04, 0xa9, 0x9f, 0xd6,
	0x82, 0x2c, 0x85, 0x58, 0x85, 0x4c, 0xcd, 0xe3, 0x9a, 0x56, 0x84, 0xe7, 0xa5, 0x6d, 0xa2, 0x7d,
];

/// Alice's SS58 address on generic Substrate chains.
pub const ALICE_SS58: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

/// Type ids the [`MockRegistry`] resolves.
pub mod types {
	pub const UNIT: u32 = 0;
	pub const U32: u32 = 1;
	pub const HASH: u32 = 2;
	pub const COMPACT_U64: u32 = 3;
	pub const COMPACT_U128: u32 = 4;
	pub const OPTION_HASH: u32 = 5;
	pub const OPTION_U32: u32 = 6;
	pub const ERA: u32 = 7;
}

/// Codec kinds backing the mock registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCodec {
	Unit,
	U32,
	CompactU64,
	CompactU128,
	Hash,
	OptionHash,
	OptionU32,
	/// Placeholder for the mortality type; the encoder writes era bytes
	/// verbatim and never invokes this codec.
	Era,
}

/// A [`TypeRegistry`] over a fixed type-id table.
#[derive(Debug, Default)]
pub struct MockRegistry {
	codecs: HashMap<u32, MockCodec>,
}

impl MockRegistry {
	pub fn new(entries: &[(u32, MockCodec)]) -> Self {
		Self { codecs: entries.iter().copied().collect() }
	}

	fn codec(&self, type_id: u32) -> Result<MockCodec, CodecFailure> {
		self.codecs
			.get(&type_id)
			.copied()
			.ok_or_else(|| format!("unknown type id {type_id}").into())
	}
}

fn mismatch(codec: MockCodec, value: &ExtensionValue) -> CodecFailure {
	format!("value {value} does not fit codec {codec:?}").into()
}

impl TypeRegistry for MockRegistry {
	fn encode_value(
		&self,
		type_id: u32,
		value: &ExtensionValue,
		out: &mut Vec<u8>,
	) -> Result<(), CodecFailure> {
		let codec = self.codec(type_id)?;
		match (codec, value) {
			(MockCodec::Unit, _) => {},
			(MockCodec::U32, ExtensionValue::U32(v)) => out.extend_from_slice(&v.to_le_bytes()),
			(MockCodec::CompactU64, ExtensionValue::U64(v)) => out.extend_from_slice(&Compact(*v).encode()),
			(MockCodec::CompactU128, ExtensionValue::U128(v)) => out.extend_from_slice(&Compact(*v).encode()),
			(MockCodec::Hash, ExtensionValue::Hash(h)) => out.extend_from_slice(h.as_bytes()),
			(MockCodec::OptionHash, ExtensionValue::OptionHash(None)) => out.push(0x00),
			(MockCodec::OptionHash, ExtensionValue::OptionHash(Some(h))) => {
				out.push(0x01);
				out.extend_from_slice(h.as_bytes());
			},
			(MockCodec::OptionU32, ExtensionValue::OptionU32(None)) => out.push(0x00),
			(MockCodec::OptionU32, ExtensionValue::OptionU32(Some(v))) => {
				out.push(0x01);
				out.extend_from_slice(&v.to_le_bytes());
			},
			(MockCodec::Era, _) => return Err("era bytes are written verbatim".into()),
			(codec, value) => return Err(mismatch(codec, value)),
		}
		Ok(())
	}

	fn decode_value(&self, type_id: u32, input: &mut &[u8]) -> Result<ExtensionValue, CodecFailure> {
		let codec = self.codec(type_id)?;
		match codec {
			MockCodec::Unit => Ok(ExtensionValue::Unit),
			MockCodec::U32 => {
				let bytes = take(input, 4)?;
				Ok(ExtensionValue::U32(u32::from_le_bytes(bytes.try_into().expect("4 bytes; qed"))))
			},
			MockCodec::CompactU64 => Ok(ExtensionValue::U64(
				Compact::<u64>::decode(input).map_err(|e| CodecFailure::from(e.to_string()))?.0,
			)),
			MockCodec::CompactU128 => Ok(ExtensionValue::U128(
				Compact::<u128>::decode(input).map_err(|e| CodecFailure::from(e.to_string()))?.0,
			)),
			MockCodec::Hash => {
				let bytes = take(input, 32)?;
				Ok(ExtensionValue::Hash(H256::from_slice(&bytes)))
			},
			MockCodec::OptionHash => match take(input, 1)?[0] {
				0x00 => Ok(ExtensionValue::OptionHash(None)),
				0x01 => {
					let bytes = take(input, 32)?;
					Ok(ExtensionValue::OptionHash(Some(H256::from_slice(&bytes))))
				},
				other => Err(format!("invalid option discriminant {other:#04x}").into()),
			},
			MockCodec::OptionU32 => match take(input, 1)?[0] {
				0x00 => Ok(ExtensionValue::OptionU32(None)),
				0x01 => {
					let bytes = take(input, 4)?;
					Ok(ExtensionValue::OptionU32(Some(u32::from_le_bytes(
						bytes.try_into().expect("4 bytes; qed"),
					))))
				},
				other => Err(format!("invalid option discriminant {other:#04x}").into()),
			},
			MockCodec::Era => Err("era bytes are decoded by the encoder".into()),
		}
	}

	fn is_zero_sized(&self, type_id: u32) -> bool {
		self.codecs.get(&type_id) == Some(&MockCodec::Unit)
	}
}

fn take(input: &mut &[u8], len: usize) -> Result<Vec<u8>, CodecFailure> {
	if input.len() < len {
		return Err(format!("need {len} bytes, have {}", input.len()).into());
	}
	let (bytes, rest) = input.split_at(len);
	*input = rest;
	Ok(bytes.to_vec())
}

/// The registry the chain info fixtures share.
pub fn registry() -> Arc<MockRegistry> {
	Arc::new(MockRegistry::new(&[
		(types::UNIT, MockCodec::Unit),
		(types::U32, MockCodec::U32),
		(types::HASH, MockCodec::Hash),
		(types::COMPACT_U64, MockCodec::CompactU64),
		(types::COMPACT_U128, MockCodec::CompactU128),
		(types::OPTION_HASH, MockCodec::OptionHash),
		(types::OPTION_U32, MockCodec::OptionU32),
		(types::ERA, MockCodec::Era),
	]))
}

/// The canonical Polkadot extension set, in metadata order.
fn canonical_schema() -> Vec<TransactionExtensionMeta> {
	vec![
		TransactionExtensionMeta::signed(identifiers::CHECK_NON_ZERO_SENDER, types::UNIT, types::UNIT),
		TransactionExtensionMeta::signed(identifiers::CHECK_SPEC_VERSION, types::UNIT, types::U32),
		TransactionExtensionMeta::signed(identifiers::CHECK_TX_VERSION, types::UNIT, types::U32),
		TransactionExtensionMeta::signed(identifiers::CHECK_GENESIS, types::UNIT, types::HASH),
		TransactionExtensionMeta::signed(identifiers::CHECK_MORTALITY, types::ERA, types::HASH),
		TransactionExtensionMeta::signed(identifiers::CHECK_NONCE, types::COMPACT_U64, types::UNIT),
		TransactionExtensionMeta::signed(identifiers::CHECK_WEIGHT, types::UNIT, types::UNIT),
		TransactionExtensionMeta::signed(
			identifiers::CHARGE_TRANSACTION_PAYMENT,
			types::COMPACT_U128,
			types::UNIT,
		),
		TransactionExtensionMeta::signed(
			identifiers::CHECK_METADATA_HASH,
			types::OPTION_HASH,
			types::OPTION_HASH,
		),
	]
}

fn chain_info(
	metadata_version: MetadataVersion,
	versions: Vec<u8>,
	extensions: Vec<TransactionExtensionMeta>,
) -> Arc<ChainInfo> {
	Arc::new(ChainInfo {
		metadata_version,
		extrinsic: ExtrinsicMeta { versions, extensions },
		types: registry(),
	})
}

/// V14 metadata with the canonical signed-extension set.
pub fn v14_chain_info() -> Arc<ChainInfo> {
	chain_info(MetadataVersion::V14, vec![4], canonical_schema())
}

/// V15 metadata with the canonical signed-extension set.
pub fn v15_chain_info() -> Arc<ChainInfo> {
	chain_info(MetadataVersion::V15, vec![4], canonical_schema())
}

/// V16 metadata advertising extrinsic version 5.
pub fn v16_chain_info() -> Arc<ChainInfo> {
	chain_info(MetadataVersion::V16, vec![4, 5], canonical_schema())
}

/// V16 metadata that still only supports extrinsic version 4.
pub fn v16_v4_only_chain_info() -> Arc<ChainInfo> {
	chain_info(MetadataVersion::V16, vec![4], canonical_schema())
}

/// An older chain spelling the mortality extension `CheckEra`.
pub fn check_era_chain_info() -> Arc<ChainInfo> {
	let extensions = canonical_schema()
		.into_iter()
		.map(|mut ext| {
			if ext.identifier == identifiers::CHECK_MORTALITY {
				ext.identifier = identifiers::CHECK_ERA.into();
			}
			ext
		})
		.collect();
	chain_info(MetadataVersion::V14, vec![4], extensions)
}

/// A V4 chain with no extensions; byte-layout tests use this.
pub fn bare_v4_chain_info() -> Arc<ChainInfo> {
	chain_info(MetadataVersion::V14, vec![4], Vec::new())
}

/// A V5 chain with no extensions; byte-layout tests use this.
pub fn bare_v5_chain_info() -> Arc<ChainInfo> {
	chain_info(MetadataVersion::V16, vec![4, 5], Vec::new())
}

/// Deterministic inputs for the canonical extension set.
pub fn standard_params() -> StandardExtensionParams {
	StandardExtensionParams {
		spec_version: 1_002_000,
		transaction_version: 26,
		genesis_hash: H256::repeat_byte(0x91),
		block_hash: H256::repeat_byte(0x42),
		block_number: 21_000_000,
		nonce: 7,
		era_period: Some(64),
		tip: 0,
	}
}

/// A fully populated [`SignedData`] for `info`, signed by a zeroed dummy
/// signature over the real signing payload.
pub fn signed_data(info: &Arc<ChainInfo>) -> SignedData {
	let mut builder = ExtensionBuilder::new(Arc::clone(info));
	builder.standard(standard_params());
	let call_data = vec![0x00, 0x01];
	let signing_payload =
		build_signing_payload(info, &call_data, builder.extensions(), builder.additional_signed())
			.expect("fixture payload encodes");
	let (extensions, additional_signed) = builder.into_parts();
	let signature = vec![0u8; 64];
	SignedData {
		signer: ALICE.to_vec(),
		signature_type: SignatureType::from_signature(&signature),
		signature,
		extensions,
		additional_signed,
		call_data,
		signing_payload,
	}
}

/// Split extrinsic wire bytes into the declared length and the body.
pub fn split_length_prefix(bytes: &[u8]) -> (usize, &[u8]) {
	let mut input = bytes;
	let declared = Compact::<u32>::decode(&mut input).expect("compact length prefix").0 as usize;
	(declared, input)
}

/// A request recorded by the [`MockProvider`].
#[derive(Debug, Clone)]
pub struct SentRequest {
	pub method: String,
	pub params: Vec<Value>,
}

struct SubscriptionScript {
	id: String,
	events: Vec<Value>,
}

struct SubscriptionSender {
	/// Notification method of the stream, e.g. `chainHead_v1_followEvent`.
	method: String,
	sender: mpsc::UnboundedSender<SubscriptionMessage>,
}

/// A scriptable in-memory [`Provider`].
///
/// Responses and subscription event scripts are queued per method; every
/// request is recorded for assertions. [`MockProvider::emit`] pushes further
/// events onto a live subscription mid-test.
#[derive(Default)]
pub struct MockProvider {
	responses: Mutex<HashMap<String, VecDeque<Result<Value, RpcErrorPayload>>>>,
	subscriptions: Mutex<HashMap<String, VecDeque<SubscriptionScript>>>,
	senders: Mutex<HashMap<String, SubscriptionSender>>,
	requests: Mutex<Vec<SentRequest>>,
	connected: AtomicBool,
}

impl MockProvider {
	pub fn new() -> Self {
		Self { connected: AtomicBool::new(true), ..Self::default() }
	}

	/// Queue a successful response for `method`.
	pub fn queue_response(&self, method: &str, result: Value) {
		self.responses
			.lock()
			.expect("mock lock")
			.entry(method.to_owned())
			.or_default()
			.push_back(Ok(result));
	}

	/// Queue a JSON-RPC error response for `method`.
	pub fn queue_error(&self, method: &str, error: RpcErrorPayload) {
		self.responses
			.lock()
			.expect("mock lock")
			.entry(method.to_owned())
			.or_default()
			.push_back(Err(error));
	}

	/// Queue a subscription for `method`: its id and the events delivered
	/// immediately after it opens. The stream stays open for
	/// [`MockProvider::emit`] until closed.
	pub fn queue_subscription(&self, method: &str, id: &str, events: Vec<Value>) {
		self.subscriptions
			.lock()
			.expect("mock lock")
			.entry(method.to_owned())
			.or_default()
			.push_back(SubscriptionScript { id: id.to_owned(), events });
	}

	/// Push an event onto a live subscription. Returns false once the
	/// consumer is gone.
	pub fn emit(&self, subscription_id: &str, event: Value) -> bool {
		let senders = self.senders.lock().expect("mock lock");
		match senders.get(subscription_id) {
			Some(entry) => entry
				.sender
				.send(SubscriptionMessage {
					method: entry.method.clone(),
					subscription: subscription_id.to_owned(),
					result: event,
				})
				.is_ok(),
			None => false,
		}
	}

	/// End a subscription stream from the server side.
	pub fn close_subscription(&self, subscription_id: &str) {
		self.senders.lock().expect("mock lock").remove(subscription_id);
	}

	/// Every request sent so far, in order.
	pub fn sent(&self) -> Vec<SentRequest> {
		self.requests.lock().expect("mock lock").clone()
	}

	/// How many requests hit `method`.
	pub fn sent_count(&self, method: &str) -> usize {
		self.requests
			.lock()
			.expect("mock lock")
			.iter()
			.filter(|request| request.method == method)
			.count()
	}

	fn record(&self, method: &str, params: &[Value]) {
		self.requests
			.lock()
			.expect("mock lock")
			.push(SentRequest { method: method.to_owned(), params: params.to_vec() });
	}
}

#[async_trait::async_trait]
impl Provider for MockProvider {
	async fn send(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse, ProviderError> {
		self.record(method, &params);
		let queued = self
			.responses
			.lock()
			.expect("mock lock")
			.get_mut(method)
			.and_then(VecDeque::pop_front);
		match queued {
			Some(Ok(result)) => Ok(RpcResponse::ok(result)),
			Some(Err(error)) => Ok(RpcResponse::err(error)),
			None => Err(ProviderError::Transport(format!("no scripted response for `{method}`"))),
		}
	}

	async fn subscribe(
		&self,
		method: &str,
		params: Vec<Value>,
		on_cancel: CancelHook,
	) -> Result<Subscription, ProviderError> {
		self.record(method, &params);
		let script = self
			.subscriptions
			.lock()
			.expect("mock lock")
			.get_mut(method)
			.and_then(VecDeque::pop_front)
			.ok_or_else(|| {
				ProviderError::Transport(format!("no scripted subscription for `{method}`"))
			})?;

		let notification = format!("{method}Event");
		let (sender, receiver) = mpsc::unbounded_channel();
		for event in script.events {
			let _ = sender.send(SubscriptionMessage {
				method: notification.clone(),
				subscription: script.id.clone(),
				result: event,
			});
		}
		self.senders
			.lock()
			.expect("mock lock")
			.insert(script.id.clone(), SubscriptionSender { method: notification, sender });
		Ok(Subscription::new(script.id, receiver, on_cancel))
	}

	async fn connect(&self) -> Result<(), ProviderError> {
		self.connected.store(true, Ordering::SeqCst);
		Ok(())
	}

	async fn disconnect(&self) -> Result<(), ProviderError> {
		self.connected.store(false, Ordering::SeqCst);
		Ok(())
	}

	fn is_connected(&self) -> bool {
		self.connected.load(Ordering::SeqCst)
	}
}
