// SPDX-License-Identifier: GPL-3.0

//! Integration tests for transaction broadcasting against the mock provider.

use serde_json::json;
use std::{sync::Arc, time::Duration};
use strand::{broadcast, testing::MockProvider, TransactionBroadcast};

const OP_ID: &str = "broadcast-1";

fn provider_with_broadcast(events: Vec<serde_json::Value>) -> Arc<MockProvider> {
	let provider = MockProvider::new();
	provider.queue_subscription("transaction_v1_broadcast", OP_ID, events);
	Arc::new(provider)
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
	for _ in 0..100 {
		if condition() {
			return;
		}
		tokio::time::sleep(Duration::from_millis(10)).await;
	}
	panic!("condition not reached in time");
}

#[tokio::test(flavor = "multi_thread")]
async fn broadcast_submits_prefixed_hex() {
	let provider = provider_with_broadcast(vec![]);
	let operation =
		TransactionBroadcast::broadcast(provider.clone(), &[0x04, 0x00, 0xff]).await.unwrap();

	assert_eq!(operation.operation_id(), OP_ID);
	let sent = provider.sent();
	assert_eq!(sent[0].method, "transaction_v1_broadcast");
	assert_eq!(sent[0].params, vec![json!("0x0400ff")]);
}

#[tokio::test(flavor = "multi_thread")]
async fn broadcast_streams_progress_reports() {
	let provider = provider_with_broadcast(vec![json!({"numPeers": 2})]);
	let mut operation = TransactionBroadcast::broadcast(provider.clone(), &[0x00]).await.unwrap();

	assert_eq!(operation.next().await, Some(json!({"numPeers": 2})));
	provider.emit(OP_ID, json!({"numPeers": 5}));
	assert_eq!(operation.next().await, Some(json!({"numPeers": 5})));
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelling_the_stream_stops_exactly_once() {
	let provider = provider_with_broadcast(vec![]);
	provider.queue_response("transaction_v1_stop", json!(null));
	let operation = TransactionBroadcast::broadcast(provider.clone(), &[0x00]).await.unwrap();

	drop(operation);
	let counting = provider.clone();
	wait_until(move || counting.sent_count("transaction_v1_stop") == 1).await;

	tokio::time::sleep(Duration::from_millis(50)).await;
	assert_eq!(provider.sent_count("transaction_v1_stop"), 1);
	let stop = provider
		.sent()
		.into_iter()
		.find(|request| request.method == "transaction_v1_stop")
		.unwrap();
	assert_eq!(stop.params, vec![json!(OP_ID)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn explicit_stop_disarms_the_cancel_hook() {
	let provider = provider_with_broadcast(vec![]);
	provider.queue_response("transaction_v1_stop", json!(null));
	let operation = TransactionBroadcast::broadcast(provider.clone(), &[0x00]).await.unwrap();

	operation.stop().await.unwrap();
	// Idempotent.
	operation.stop().await.unwrap();
	drop(operation);
	tokio::time::sleep(Duration::from_millis(50)).await;
	assert_eq!(provider.sent_count("transaction_v1_stop"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_operation_works_without_a_handle() {
	let provider = MockProvider::new();
	provider.queue_response("transaction_v1_stop", json!(null));
	broadcast::stop_operation(&provider, "orphaned-op").await.unwrap();
	assert_eq!(provider.sent()[0].params, vec![json!("orphaned-op")]);
}
