// SPDX-License-Identifier: GPL-3.0

//! Client-side transaction construction and chain head tracking for
//! Polkadot SDK chains.
//!
//! The crate covers two pipelines. Submission runs from resolved metadata to
//! wire bytes:
//!
//! ```text
//! ChainInfo ──▶ version detection ──▶ ExtensionBuilder ──▶ signing payload
//!                                                              │
//!                                          external signer ◀───┘
//!                                                │
//!                      ExtrinsicEncoder ◀── signature
//!                              │
//!                      TransactionBroadcast ──▶ transaction_v1_broadcast
//! ```
//!
//! State following opens a [`ChainHeadFollow`] session over
//! `chainHead_v1_follow` and hands the consumer a typed event stream;
//! block-scoped operations are correlated back to it by operation id.
//!
//! SCALE codecs, metadata parsing, cryptography and transport are consumed
//! through seams ([`TypeRegistry`], [`ChainInfo`], [`Provider`]) rather than
//! implemented here.

pub mod broadcast;
pub mod chain_data;
pub mod chain_head;
pub mod error;
pub mod extrinsic;
pub mod metadata;
pub mod registry;
pub mod rpc;
mod strings;
pub mod testing;

pub use broadcast::TransactionBroadcast;
pub use chain_data::{ChainData, ChainProperties, RuntimeVersion};
pub use chain_head::{
	events::{FollowEvent, OperationResponse, StorageQueryItem, StorageQueryType},
	ChainHeadFollow,
};
pub use error::{ChainHeadError, ExtrinsicError, ProviderError};
pub use extrinsic::{
	build_signing_payload, DecodedExtrinsic, Era, ExtensionBuilder, ExtrinsicBody,
	ExtrinsicEncoder, MultiAddress, SignatureType, SignedData, StandardExtensionParams,
};
pub use metadata::{ChainInfo, ExtrinsicMeta, MetadataVersion, TransactionExtensionMeta};
pub use registry::{CodecFailure, ExtensionValue, ExtensionValues, TypeRegistry};
pub use rpc::{Provider, RpcErrorPayload, RpcResponse, Subscription, SubscriptionMessage};
