// SPDX-License-Identifier: GPL-3.0

//! Transaction submission over `transaction_v1_broadcast`.
//!
//! Broadcasting opens a subscription whose id doubles as the operation id;
//! progress reports arrive on the stream. The operation stays live until
//! [`TransactionBroadcast::stop`] or until the consumer drops the stream,
//! which issues `transaction_v1_stop` through the provider's cancel hook.

use crate::{
	error::ProviderError,
	rpc::{to_hex, CancelHook, Provider, Subscription},
	strings::rpc::methods,
};
use serde_json::{json, Value};
use std::sync::{
	atomic::{AtomicBool, Ordering},
	Arc,
};

/// An in-flight broadcast operation.
pub struct TransactionBroadcast {
	shared: Arc<BroadcastShared>,
	subscription: Subscription,
}

struct BroadcastShared {
	provider: Arc<dyn Provider>,
	live: AtomicBool,
}

impl TransactionBroadcast {
	/// Submit extrinsic wire bytes to the network.
	pub async fn broadcast(
		provider: Arc<dyn Provider>,
		extrinsic: &[u8],
	) -> Result<Self, ProviderError> {
		let shared =
			Arc::new(BroadcastShared { provider: Arc::clone(&provider), live: AtomicBool::new(true) });

		let hook_shared = Arc::clone(&shared);
		let on_cancel: CancelHook = Box::new(move |operation_id: String| {
			if hook_shared.live.swap(false, Ordering::SeqCst) {
				let provider = Arc::clone(&hook_shared.provider);
				tokio::spawn(async move {
					let _ = provider
						.send(methods::TRANSACTION_STOP, vec![Value::String(operation_id)])
						.await;
				});
			}
		});

		let subscription = provider
			.subscribe(methods::TRANSACTION_BROADCAST, vec![json!(to_hex(extrinsic))], on_cancel)
			.await?;
		tracing::debug!(
			operation_id = %subscription.id(),
			bytes = extrinsic.len(),
			"transaction_v1_broadcast: submitted"
		);
		Ok(Self { shared, subscription })
	}

	/// The server-minted operation id.
	pub fn operation_id(&self) -> &str {
		self.subscription.id()
	}

	/// Receive the next progress report; `None` once the stream closes.
	pub async fn next(&mut self) -> Option<Value> {
		self.subscription.next().await.map(|message| message.result)
	}

	/// Ask the server to stop rebroadcasting. Idempotent.
	pub async fn stop(&self) -> Result<(), ProviderError> {
		if !self.shared.live.swap(false, Ordering::SeqCst) {
			return Ok(());
		}
		self.shared
			.provider
			.send(methods::TRANSACTION_STOP, vec![json!(self.subscription.id())])
			.await?
			.into_result()?;
		tracing::debug!(operation_id = %self.subscription.id(), "transaction_v1_stop: issued");
		Ok(())
	}
}

/// Stop a broadcast operation by id, without a handle to it.
pub async fn stop_operation(
	provider: &dyn Provider,
	operation_id: &str,
) -> Result<(), ProviderError> {
	provider
		.send(methods::TRANSACTION_STOP, vec![json!(operation_id)])
		.await?
		.into_result()?;
	Ok(())
}
