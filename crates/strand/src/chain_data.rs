// SPDX-License-Identifier: GPL-3.0

//! Chain state needed to construct a transaction.
//!
//! [`ChainData::fetch`] gathers everything the extension builder wants in
//! one round of parallel requests: genesis hash, finalized block hash and
//! number, runtime versions, and the account nonce. The `chainSpec_v1`
//! convenience fetchers live here too.

use crate::{
	error::ProviderError,
	rpc::{parse_block_hash, Provider},
	strings::rpc::methods,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sp_core::H256;
use std::collections::HashMap;

/// Chain state snapshot for transaction construction.
#[derive(Debug, Clone)]
pub struct ChainData {
	pub genesis_hash: H256,
	/// The finalized head at fetch time; mortality checkpoint.
	pub block_hash: H256,
	pub block_number: u64,
	pub spec_version: u32,
	pub transaction_version: u32,
	/// Next nonce of the queried account.
	pub nonce: u64,
}

impl ChainData {
	/// Fetch the snapshot for `account` (its on-chain address string).
	///
	/// The independent requests run in parallel; only the header fetch waits
	/// for the finalized head hash.
	pub async fn fetch(provider: &dyn Provider, account: &str) -> Result<Self, ProviderError> {
		let (genesis_hash, block_hash, runtime, nonce) = futures::try_join!(
			genesis_hash(provider),
			finalized_head(provider),
			runtime_version(provider),
			account_nonce(provider, account),
		)?;
		let block_number = block_number(provider, &block_hash).await?;

		Ok(Self {
			genesis_hash: parse_block_hash(&genesis_hash)?,
			block_hash: parse_block_hash(&block_hash)?,
			block_number,
			spec_version: runtime.spec_version,
			transaction_version: runtime.transaction_version,
			nonce,
		})
	}
}

/// Runtime version as reported by `state_getRuntimeVersion`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
	#[serde(default)]
	pub spec_name: String,
	#[serde(default)]
	pub impl_name: String,
	pub spec_version: u32,
	#[serde(default)]
	pub impl_version: u32,
	pub transaction_version: u32,
}

/// Chain properties as reported by `chainSpec_v1_properties`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChainProperties {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ss58_format: Option<u16>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_decimals: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_symbol: Option<String>,
	/// Anything else the chain reports.
	#[serde(flatten)]
	pub additional: HashMap<String, Value>,
}

/// The chain's genesis hash, hex-encoded.
pub async fn genesis_hash(provider: &dyn Provider) -> Result<String, ProviderError> {
	let result =
		provider.send(methods::CHAIN_SPEC_GENESIS_HASH, vec![]).await?.into_result()?;
	parse(result)
}

/// The human-readable chain name.
pub async fn chain_name(provider: &dyn Provider) -> Result<String, ProviderError> {
	let result = provider.send(methods::CHAIN_SPEC_CHAIN_NAME, vec![]).await?.into_result()?;
	parse(result)
}

/// The chain properties (token symbol, decimals, address format).
pub async fn chain_properties(provider: &dyn Provider) -> Result<ChainProperties, ProviderError> {
	let result = provider.send(methods::CHAIN_SPEC_PROPERTIES, vec![]).await?.into_result()?;
	parse(result)
}

async fn finalized_head(provider: &dyn Provider) -> Result<String, ProviderError> {
	let result =
		provider.send(methods::CHAIN_GET_FINALIZED_HEAD, vec![]).await?.into_result()?;
	parse(result)
}

async fn runtime_version(provider: &dyn Provider) -> Result<RuntimeVersion, ProviderError> {
	let result =
		provider.send(methods::STATE_GET_RUNTIME_VERSION, vec![]).await?.into_result()?;
	parse(result)
}

async fn account_nonce(provider: &dyn Provider, account: &str) -> Result<u64, ProviderError> {
	let result = provider
		.send(methods::SYSTEM_ACCOUNT_NEXT_INDEX, vec![json!(account)])
		.await?
		.into_result()?;
	result.as_u64().ok_or_else(|| {
		ProviderError::InvalidResponse(format!("account nonce is not an integer: {result}"))
	})
}

async fn block_number(provider: &dyn Provider, block_hash: &str) -> Result<u64, ProviderError> {
	#[derive(Deserialize)]
	struct Header {
		number: String,
	}

	let result = provider
		.send(methods::CHAIN_GET_HEADER, vec![json!(block_hash)])
		.await?
		.into_result()?;
	let header: Header = parse(result)?;
	u64::from_str_radix(header.number.trim_start_matches("0x"), 16).map_err(|error| {
		ProviderError::InvalidResponse(format!("invalid block number `{}`: {error}", header.number))
	})
}

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ProviderError> {
	serde_json::from_value(value).map_err(|error| ProviderError::InvalidResponse(error.to_string()))
}
