use knock_core::ServerSignal;
use serde_json::json;

use crate::integration::{create_test_relay, init_tracing};

#[tokio::test]
async fn test_host_joining_second_room_ends_first_call() {
    init_tracing();

    let relay = create_test_relay();
    let host = relay.join_host("r1").await.unwrap();
    let first_guest = relay.join_guest("r1", "Bob").await.unwrap();

    relay
        .send(host, json!({"event": "join", "roomId": "r2", "role": "host"}))
        .await
        .unwrap();

    assert!(relay.room("r1").await.unwrap().is_none());
    assert_eq!(
        relay.output.signals_for(first_guest).await,
        vec![ServerSignal::CallEnded]
    );

    let second_guest = relay.join_guest("r2", "Alice").await.unwrap();
    relay.disconnect(host).await.unwrap();

    let stats = relay.stats().await.unwrap();
    assert_eq!(stats.rooms, 0);
    assert_eq!(relay.output.count_for(second_guest, "call-ended").await, 1);
    assert_eq!(relay.output.count_for(first_guest, "call-ended").await, 1);
}

#[tokio::test]
async fn test_guest_moving_rooms_releases_first_host() {
    init_tracing();

    let relay = create_test_relay();
    let first_host = relay.join_host("r1").await.unwrap();
    let second_host = relay.join_host("r2").await.unwrap();
    let guest = relay.join_guest("r1", "Bob").await.unwrap();

    relay
        .send(guest, json!({"event": "join", "roomId": "r2", "role": "guest"}))
        .await
        .unwrap();

    assert!(relay.room("r1").await.unwrap().is_none());
    assert_eq!(relay.output.count_for(first_host, "call-ended").await, 1);

    let r2 = relay.room("r2").await.unwrap().unwrap();
    assert_eq!(r2.guest, Some(guest));
    assert_eq!(relay.output.count_for(second_host, "ring").await, 1);
}

#[tokio::test]
async fn test_rejoining_same_room_keeps_call() {
    init_tracing();

    let relay = create_test_relay();
    let host = relay.join_host("r1").await.unwrap();
    let guest = relay.join_guest("r1", "Bob").await.unwrap();

    relay
        .send(guest, json!({"event": "join", "roomId": "r1", "role": "guest"}))
        .await
        .unwrap();

    let room = relay.room("r1").await.unwrap().unwrap();
    assert_eq!(room.guest, Some(guest));
    assert_eq!(relay.output.count_for(host, "call-ended").await, 0);
    assert_eq!(relay.output.count_for(host, "ring").await, 2);
}

#[tokio::test]
async fn test_stale_guest_cannot_touch_reopened_room() {
    init_tracing();

    let relay = create_test_relay();
    let old_host = relay.join_host("r1").await.unwrap();
    let guest = relay.join_guest("r1", "Bob").await.unwrap();
    relay.disconnect(old_host).await.unwrap();
    assert_eq!(relay.output.count_for(guest, "call-ended").await, 1);

    let new_host = relay.join_host("r1").await.unwrap();

    relay.send(guest, json!({"event": "end-call"})).await.unwrap();
    relay.send(guest, json!({"event": "accept-call"})).await.unwrap();
    relay
        .send(guest, json!({"event": "toggle-camera", "enabled": false}))
        .await
        .unwrap();
    relay
        .send(guest, json!({"event": "ice-candidate", "candidate": {}}))
        .await
        .unwrap();

    let room = relay.room("r1").await.unwrap().unwrap();
    assert_eq!(room.host, new_host);
    assert!(relay.output.signals_for(new_host).await.is_empty());
}
