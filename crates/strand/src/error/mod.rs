// SPDX-License-Identifier: GPL-3.0

//! Error types for the strand crate, organized by context:
//!
//! - [`extrinsic::ExtrinsicError`] - Errors from extrinsic encoding and decoding.
//! - [`rpc::ProviderError`] - Errors from the transport provider and JSON-RPC responses.
//! - [`chain_head::ChainHeadError`] - Errors from the chainHead follow session.

pub mod chain_head;
pub mod extrinsic;
pub mod rpc;

pub use chain_head::ChainHeadError;
pub use extrinsic::ExtrinsicError;
pub use rpc::ProviderError;
