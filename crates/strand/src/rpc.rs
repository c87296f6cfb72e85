// SPDX-License-Identifier: GPL-3.0

//! The transport seam.
//!
//! The library never opens sockets itself; everything on the wire goes
//! through a [`Provider`] supplied by the embedding application. A provider
//! offers plain request/response ([`Provider::send`]) and subscriptions
//! ([`Provider::subscribe`]) whose cancellation is observable through a hook,
//! the integration point for `chainHead_v1_unfollow` / `transaction_v1_stop`.

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sp_core::H256;
use tokio::sync::mpsc;

/// Hook invoked with the subscription id when the consumer cancels or drops
/// a subscription stream. Fires at most once.
pub type CancelHook = Box<dyn FnOnce(String) + Send + 'static>;

/// A JSON-RPC response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
	#[serde(default)]
	pub id: Option<Value>,
	#[serde(default)]
	pub result: Option<Value>,
	#[serde(default)]
	pub error: Option<RpcErrorPayload>,
}

impl RpcResponse {
	/// A successful response carrying `result`.
	pub fn ok(result: Value) -> Self {
		Self { id: None, result: Some(result), error: None }
	}

	/// An error response carrying `error`.
	pub fn err(error: RpcErrorPayload) -> Self {
		Self { id: None, result: None, error: Some(error) }
	}

	/// Extract the result, converting a non-null `error` field into
	/// [`ProviderError::Rpc`].
	pub fn into_result(self) -> Result<Value, ProviderError> {
		if let Some(error) = self.error {
			return Err(ProviderError::Rpc(error));
		}
		Ok(self.result.unwrap_or(Value::Null))
	}
}

/// The `error` object of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorPayload {
	pub code: i64,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
}

/// One notification delivered on a subscription stream.
#[derive(Debug, Clone)]
pub struct SubscriptionMessage {
	/// The notification method, e.g. `chainHead_v1_followEvent`.
	pub method: String,
	/// The subscription the notification belongs to.
	pub subscription: String,
	/// The notification payload.
	pub result: Value,
}

/// An open subscription: the server-minted id plus the notification stream.
///
/// The cancel hook passed to [`Provider::subscribe`] fires exactly once, when
/// the subscription is cancelled or dropped; callers that tear the
/// subscription down through an explicit RPC first are expected to disarm it
/// through their own state (see the follow session).
pub struct Subscription {
	id: String,
	stream: mpsc::UnboundedReceiver<SubscriptionMessage>,
	guard: CancelGuard,
}

impl Subscription {
	pub fn new(
		id: impl Into<String>,
		stream: mpsc::UnboundedReceiver<SubscriptionMessage>,
		on_cancel: CancelHook,
	) -> Self {
		let id = id.into();
		let guard = CancelGuard { id: id.clone(), hook: Some(on_cancel) };
		Self { id, stream, guard }
	}

	/// The server-minted subscription id.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Receive the next notification; `None` once the provider closes the
	/// stream.
	pub async fn next(&mut self) -> Option<SubscriptionMessage> {
		self.stream.recv().await
	}

	/// Cancel the subscription, firing the cancel hook.
	pub fn cancel(mut self) {
		self.guard.fire();
	}
}

struct CancelGuard {
	id: String,
	hook: Option<CancelHook>,
}

impl CancelGuard {
	fn fire(&mut self) {
		if let Some(hook) = self.hook.take() {
			hook(std::mem::take(&mut self.id));
		}
	}
}

impl Drop for CancelGuard {
	fn drop(&mut self) {
		self.fire();
	}
}

/// Transport capability consumed by the library.
///
/// Connection management, reconnects and backpressure are the provider's
/// concern; nothing here retries.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
	/// Issue a request and await its response envelope.
	async fn send(&self, method: &str, params: Vec<Value>) -> Result<RpcResponse, ProviderError>;

	/// Open a subscription. `on_cancel` is invoked with the subscription id
	/// when the consumer cancels or drops the stream.
	async fn subscribe(
		&self,
		method: &str,
		params: Vec<Value>,
		on_cancel: CancelHook,
	) -> Result<Subscription, ProviderError>;

	async fn connect(&self) -> Result<(), ProviderError>;

	async fn disconnect(&self) -> Result<(), ProviderError>;

	fn is_connected(&self) -> bool;
}

/// Hex-encode bytes with the `0x` prefix the wire expects.
pub fn to_hex(bytes: &[u8]) -> String {
	format!("0x{}", hex::encode(bytes))
}

/// Decode a hex string, tolerating a `0x` prefix.
pub fn parse_hex_bytes(value: &str) -> Result<Vec<u8>, ProviderError> {
	hex::decode(value.trim_start_matches("0x"))
		.map_err(|error| ProviderError::InvalidResponse(format!("invalid hex `{value}`: {error}")))
}

/// Parse a 32-byte block hash from its hex representation.
pub fn parse_block_hash(value: &str) -> Result<H256, ProviderError> {
	let bytes = parse_hex_bytes(value)?;
	if bytes.len() != 32 {
		return Err(ProviderError::InvalidResponse(format!(
			"expected a 32-byte hash, got {} bytes",
			bytes.len()
		)));
	}
	Ok(H256::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	};

	fn counting_hook(counter: &Arc<AtomicUsize>) -> CancelHook {
		let counter = Arc::clone(counter);
		Box::new(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		})
	}

	#[test]
	fn into_result_surfaces_the_error_payload() {
		let payload = RpcErrorPayload { code: -32601, message: "method not found".into(), data: None };
		let result = RpcResponse::err(payload.clone()).into_result();
		assert!(matches!(result, Err(ProviderError::Rpc(p)) if p == payload));
	}

	#[test]
	fn into_result_defaults_a_missing_result_to_null() {
		let response = RpcResponse { id: None, result: None, error: None };
		assert_eq!(response.into_result().unwrap(), Value::Null);
	}

	#[tokio::test]
	async fn dropping_a_subscription_fires_the_hook_once() {
		let fired = Arc::new(AtomicUsize::new(0));
		let (_tx, rx) = mpsc::unbounded_channel();
		let sub = Subscription::new("sub-1", rx, counting_hook(&fired));
		drop(sub);
		assert_eq!(fired.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn cancel_fires_the_hook_exactly_once() {
		let fired = Arc::new(AtomicUsize::new(0));
		let (_tx, rx) = mpsc::unbounded_channel();
		let sub = Subscription::new("sub-1", rx, counting_hook(&fired));
		sub.cancel();
		assert_eq!(fired.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn parse_block_hash_requires_32_bytes() {
		assert!(parse_block_hash("0x0011").is_err());
		let hash = parse_block_hash(&format!("0x{}", "ab".repeat(32))).unwrap();
		assert_eq!(hash, H256::repeat_byte(0xab));
	}

	#[test]
	fn to_hex_round_trips() {
		let bytes = vec![0xde, 0xad, 0xbe, 0xef];
		assert_eq!(parse_hex_bytes(&to_hex(&bytes)).unwrap(), bytes);
	}
}
