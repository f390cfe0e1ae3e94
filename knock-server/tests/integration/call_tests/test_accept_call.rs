use knock_core::{Profile, ServerSignal};
use knock_server::{CallStatus, VisitKind, VisitOutcome};
use serde_json::json;

use crate::integration::{create_test_relay, init_tracing};

#[tokio::test]
async fn test_accept_from_ringing_connects() {
    init_tracing();

    let relay = create_test_relay();
    let host = relay.join_host("r1").await.unwrap();
    let guest = relay.join_guest("r1", "Bob").await.unwrap();

    relay
        .send(host, json!({"event": "accept-call"}))
        .await
        .unwrap();

    let room = relay.room("r1").await.unwrap().unwrap();
    assert_eq!(room.status, CallStatus::Connected);
    assert!(room.connected_at.is_some());
    assert_eq!(
        relay.output.signals_for(guest).await,
        vec![ServerSignal::CallAccepted]
    );

    assert!(relay.recorder.wait_for_attempts(1, 2000).await);
    let records = relay.recorder.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, VisitOutcome::Accepted);
    assert_eq!(records[0].kind, VisitKind::VideoCall);
    assert_eq!(records[0].guest_profile, Profile::named("Bob"));
    assert_eq!(records[0].room_id.as_str(), "r1");
}

#[tokio::test]
async fn test_accept_without_guest_is_ignored() {
    init_tracing();

    let relay = create_test_relay();
    let host = relay.join_host("r1").await.unwrap();

    relay
        .send(host, json!({"event": "accept-call", "roomId": "r1"}))
        .await
        .unwrap();

    let room = relay.room("r1").await.unwrap().unwrap();
    assert_eq!(room.status, CallStatus::Waiting);

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(relay.recorder.attempts(), 0);
}

#[tokio::test]
async fn test_second_accept_does_not_record_twice() {
    init_tracing();

    let relay = create_test_relay();
    let host = relay.join_host("r1").await.unwrap();
    let guest = relay.join_guest("r1", "Bob").await.unwrap();

    relay.send(host, json!({"event": "accept-call"})).await.unwrap();
    relay.send(host, json!({"event": "accept-call"})).await.unwrap();

    let room = relay.room("r1").await.unwrap().unwrap();
    assert_eq!(room.status, CallStatus::Connected);
    assert_eq!(relay.output.count_for(guest, "call-accepted").await, 1);

    assert!(relay.recorder.wait_for_attempts(1, 2000).await);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(relay.recorder.attempts(), 1);
}
