// SPDX-License-Identifier: GPL-3.0

//! The `chainHead_v1` follow session.
//!
//! A session is opened with [`ChainHeadFollow::follow`] and stays usable
//! until the first successful [`ChainHeadFollow::unfollow`] or a server
//! `stop` event, whichever comes first. Block-scoped operations (`body`,
//! `call`, `storage`) return an operation id; their results arrive
//! interleaved with block events on the typed stream, correlated by that id.
//! Dropping the session cancels the underlying subscription, which issues
//! `chainHead_v1_unfollow` through the provider's cancel hook.

pub mod events;

use crate::{
	error::{ChainHeadError, ProviderError},
	rpc::{CancelHook, Provider, Subscription},
	strings::rpc::methods,
};
use events::{FollowEvent, OperationResponse, StorageQueryItem};
use serde_json::{json, Value};
use std::sync::{
	atomic::{AtomicBool, Ordering},
	Arc,
};

/// An active follow session.
pub struct ChainHeadFollow {
	shared: Arc<SessionShared>,
	subscription: Subscription,
}

/// State shared with the subscription's cancel hook.
struct SessionShared {
	provider: Arc<dyn Provider>,
	active: AtomicBool,
}

impl ChainHeadFollow {
	/// Open a session via `chainHead_v1_follow`.
	///
	/// With `with_runtime`, block events carry runtime information.
	pub async fn follow(
		provider: Arc<dyn Provider>,
		with_runtime: bool,
	) -> Result<Self, ChainHeadError> {
		let shared =
			Arc::new(SessionShared { provider: Arc::clone(&provider), active: AtomicBool::new(true) });

		// The hook fires when the consumer drops the stream without having
		// unfollowed; the swap keeps the unfollow from being issued twice.
		let hook_shared = Arc::clone(&shared);
		let on_cancel: CancelHook = Box::new(move |subscription_id: String| {
			if hook_shared.active.swap(false, Ordering::SeqCst) {
				let provider = Arc::clone(&hook_shared.provider);
				tokio::spawn(async move {
					let _ = provider
						.send(methods::CHAIN_HEAD_UNFOLLOW, vec![Value::String(subscription_id)])
						.await;
				});
			}
		});

		let subscription = provider
			.subscribe(methods::CHAIN_HEAD_FOLLOW, vec![Value::Bool(with_runtime)], on_cancel)
			.await?;
		tracing::debug!(
			subscription_id = %subscription.id(),
			with_runtime,
			"chainHead_v1_follow: session opened"
		);
		Ok(Self { shared, subscription })
	}

	/// The follow subscription id, passed to every session operation.
	pub fn subscription_id(&self) -> &str {
		self.subscription.id()
	}

	/// Whether the session still accepts operations.
	pub fn is_active(&self) -> bool {
		self.shared.active.load(Ordering::SeqCst)
	}

	/// Receive the next typed event; `None` once the stream closes.
	///
	/// Events are delivered in the server's emission order. Observing `stop`
	/// deactivates the session.
	pub async fn next_event(&mut self) -> Option<Result<FollowEvent, ChainHeadError>> {
		let message = self.subscription.next().await?;
		let event = FollowEvent::from_json(message.result);
		if matches!(event, Ok(FollowEvent::Stop)) {
			tracing::debug!(
				subscription_id = %self.subscription.id(),
				"chainHead_v1_follow: server stopped the session"
			);
			self.shared.active.store(false, Ordering::SeqCst);
		}
		Some(event)
	}

	/// Fetch the header of a pinned block; `None` if the block is not pinned.
	pub async fn header(&self, block_hash: &str) -> Result<Option<String>, ChainHeadError> {
		self.ensure_active()?;
		tracing::debug!(subscription_id = %self.subscription.id(), %block_hash, "chainHead_v1_header");
		let result = self
			.shared
			.provider
			.send(methods::CHAIN_HEAD_HEADER, vec![json!(self.subscription.id()), json!(block_hash)])
			.await?
			.into_result()?;
		parse_response(result)
	}

	/// Request the body (extrinsics) of a pinned block.
	pub async fn body(&self, block_hash: &str) -> Result<OperationResponse, ChainHeadError> {
		self.ensure_active()?;
		tracing::debug!(subscription_id = %self.subscription.id(), %block_hash, "chainHead_v1_body");
		let result = self
			.shared
			.provider
			.send(methods::CHAIN_HEAD_BODY, vec![json!(self.subscription.id()), json!(block_hash)])
			.await?
			.into_result()?;
		parse_response(result)
	}

	/// Execute a runtime call at a pinned block.
	///
	/// `call_parameters` is the hex-encoded SCALE input of `function`.
	pub async fn call(
		&self,
		block_hash: &str,
		function: &str,
		call_parameters: &str,
	) -> Result<OperationResponse, ChainHeadError> {
		self.ensure_active()?;
		tracing::debug!(
			subscription_id = %self.subscription.id(),
			%block_hash,
			%function,
			"chainHead_v1_call"
		);
		let result = self
			.shared
			.provider
			.send(
				methods::CHAIN_HEAD_CALL,
				vec![
					json!(self.subscription.id()),
					json!(block_hash),
					json!(function),
					json!(call_parameters),
				],
			)
			.await?
			.into_result()?;
		parse_response(result)
	}

	/// Query storage at a pinned block.
	pub async fn storage(
		&self,
		block_hash: &str,
		items: Vec<StorageQueryItem>,
		child_trie: Option<String>,
	) -> Result<OperationResponse, ChainHeadError> {
		self.ensure_active()?;
		tracing::debug!(
			subscription_id = %self.subscription.id(),
			%block_hash,
			items_count = items.len(),
			"chainHead_v1_storage"
		);
		let result = self
			.shared
			.provider
			.send(
				methods::CHAIN_HEAD_STORAGE,
				vec![
					json!(self.subscription.id()),
					json!(block_hash),
					json!(items),
					json!(child_trie),
				],
			)
			.await?
			.into_result()?;
		parse_response(result)
	}

	/// Release pinned blocks the session no longer needs.
	pub async fn unpin(&self, block_hashes: &[String]) -> Result<(), ChainHeadError> {
		self.ensure_active()?;
		tracing::debug!(
			subscription_id = %self.subscription.id(),
			count = block_hashes.len(),
			"chainHead_v1_unpin"
		);
		self.shared
			.provider
			.send(methods::CHAIN_HEAD_UNPIN, vec![json!(self.subscription.id()), json!(block_hashes)])
			.await?
			.into_result()?;
		Ok(())
	}

	/// End the session. Idempotent: a second invocation is a no-op, as is
	/// unfollowing after a server `stop`.
	pub async fn unfollow(&self) -> Result<(), ChainHeadError> {
		if !self.shared.active.load(Ordering::SeqCst) {
			return Ok(());
		}
		self.shared
			.provider
			.send(methods::CHAIN_HEAD_UNFOLLOW, vec![json!(self.subscription.id())])
			.await?
			.into_result()?;
		self.shared.active.store(false, Ordering::SeqCst);
		tracing::debug!(subscription_id = %self.subscription.id(), "chainHead_v1_unfollow: session closed");
		Ok(())
	}

	fn ensure_active(&self) -> Result<(), ChainHeadError> {
		if self.shared.active.load(Ordering::SeqCst) {
			Ok(())
		} else {
			Err(ChainHeadError::SessionInactive)
		}
	}
}

fn parse_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ChainHeadError> {
	serde_json::from_value(value)
		.map_err(|error| ProviderError::InvalidResponse(error.to_string()).into())
}
