use knock_core::{Profile, RoomToken, ServerSignal};
use knock_server::RelayConfig;
use serde_json::json;

use crate::integration::init_tracing;
use crate::utils::{TestServer, WsClient};

async fn start_server() -> TestServer {
    TestServer::start(RelayConfig::default())
        .await
        .expect("Failed to start test server")
}

#[tokio::test]
async fn test_healthz_reports_counts() {
    init_tracing();

    let server = start_server().await;
    let report = server.health().await.unwrap();
    assert_eq!(report["status"], "ok");
    assert_eq!(report["rooms"], 0);
    assert_eq!(report["connections"], 0);

    let _client = WsClient::connect(&server).await.unwrap();
    server
        .wait_for_health(2000, |r| r["connections"] == 1)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_malformed_frames_get_error_reply() {
    init_tracing();

    let server = start_server().await;
    let mut client = WsClient::connect(&server).await.unwrap();

    client.send_raw("not json at all").await.unwrap();
    match client.recv(1000).await.unwrap() {
        ServerSignal::Error { message } => assert!(message.contains("malformed")),
        other => panic!("Expected error frame, got {:?}", other),
    }

    client.send_json(json!({"event": "teleport"})).await.unwrap();
    assert!(matches!(
        client.recv(1000).await.unwrap(),
        ServerSignal::Error { .. }
    ));

    // The session survives bad input.
    let report = server.health().await.unwrap();
    assert_eq!(report["connections"], 1);
}

#[tokio::test]
async fn test_guest_rings_host_over_socket() {
    init_tracing();

    let server = start_server().await;
    let mut host = WsClient::connect(&server).await.unwrap();
    host.send_json(json!({"event": "join", "roomId": "abc12345", "role": "host"}))
        .await
        .unwrap();
    server
        .wait_for_health(2000, |r| r["rooms"] == 1)
        .await
        .unwrap();

    let mut guest = WsClient::connect(&server).await.unwrap();
    guest
        .send_json(json!({
            "event": "join",
            "roomId": "abc12345",
            "role": "guest",
            "profile": {"name": "Bob"}
        }))
        .await
        .unwrap();

    match host.recv(1000).await.unwrap() {
        ServerSignal::Ring {
            guest_profile,
            room_id,
            ..
        } => {
            assert_eq!(guest_profile, Profile::named("Bob"));
            assert_eq!(room_id, RoomToken::from("abc12345"));
        }
        other => panic!("Expected ring, got {:?}", other),
    }

    host.send_json(json!({"event": "accept-call"})).await.unwrap();
    assert_eq!(guest.recv(1000).await.unwrap(), ServerSignal::CallAccepted);
    assert!(server.recorder.wait_for_attempts(1, 1000).await);
}

#[tokio::test]
async fn test_unknown_room_join_over_socket() {
    init_tracing();

    let server = start_server().await;
    let mut guest = WsClient::connect(&server).await.unwrap();

    guest
        .send_json(json!({"event": "join", "roomId": "missing", "role": "guest"}))
        .await
        .unwrap();

    match guest.recv(1000).await.unwrap() {
        ServerSignal::Error { message } => assert!(message.contains("missing")),
        other => panic!("Expected error frame, got {:?}", other),
    }
}

#[tokio::test]
async fn test_closing_socket_ends_call() {
    init_tracing();

    let server = start_server().await;
    let mut host = WsClient::connect(&server).await.unwrap();
    host.send_json(json!({"event": "join", "roomId": "r1", "role": "host"}))
        .await
        .unwrap();
    server
        .wait_for_health(2000, |r| r["rooms"] == 1)
        .await
        .unwrap();

    let mut guest = WsClient::connect(&server).await.unwrap();
    guest
        .send_json(json!({"event": "join", "roomId": "r1", "role": "guest"}))
        .await
        .unwrap();
    assert!(matches!(
        host.recv(1000).await.unwrap(),
        ServerSignal::Ring { .. }
    ));

    guest.close().await.unwrap();

    assert_eq!(host.recv(2000).await.unwrap(), ServerSignal::CallEnded);
    let report = server
        .wait_for_health(2000, |r| r["rooms"] == 0 && r["connections"] == 1)
        .await
        .unwrap();
    assert_eq!(report["joined_connections"], 1);
}
