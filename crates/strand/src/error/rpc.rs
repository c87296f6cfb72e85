// SPDX-License-Identifier: GPL-3.0

//! Provider and JSON-RPC error types.

use crate::rpc::RpcErrorPayload;
use thiserror::Error;

/// Errors that can occur when talking to a [`crate::rpc::Provider`].
#[derive(Debug, Error)]
pub enum ProviderError {
	/// The server answered with a JSON-RPC error object.
	#[error("RPC error {}: {}", .0.code, .0.message)]
	Rpc(RpcErrorPayload),
	/// The transport failed before a response was produced.
	#[error("Transport failure: {0}")]
	Transport(String),
	/// The response did not have the expected shape.
	#[error("Invalid RPC response: {0}")]
	InvalidResponse(String),
	/// The provider is not connected.
	#[error("Provider is not connected")]
	NotConnected,
}
