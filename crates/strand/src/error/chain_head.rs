// SPDX-License-Identifier: GPL-3.0

//! chainHead follow session error types.

use crate::error::ProviderError;
use thiserror::Error;

/// Errors that can occur on a [`crate::chain_head::ChainHeadFollow`] session.
#[derive(Debug, Error)]
pub enum ChainHeadError {
	/// An operation was issued after `unfollow` or a server `stop` event.
	#[error("Session is no longer active")]
	SessionInactive,
	/// A follow event carried a discriminator this library does not know.
	#[error("Unknown chainHead event: `{0}`")]
	UnknownEvent(String),
	/// A follow event had a known discriminator but an unexpected shape.
	#[error("Malformed `{event}` event: {source}")]
	MalformedEvent {
		/// The event discriminator.
		event: String,
		/// The deserialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// The provider or the JSON-RPC server failed.
	#[error(transparent)]
	Rpc(#[from] ProviderError),
}
