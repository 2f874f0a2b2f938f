//! Integration tests for liveness supervision: the registration deadline
//! and the keepalive PING/PONG loop.
//!
//! The in-process server lets these run with second-scale timeouts.

mod common;

use std::time::Duration;

use common::TestServer;

#[tokio::test]
async fn test_registration_timeout_closes_connection() {
    // 1 second to register; generous keepalive so it never triggers
    let server = TestServer::spawn_with_timeouts(1, 180, 60)
        .await
        .expect("Failed to spawn server");
    let mut client = server.connect("slowpoke").await.expect("Failed to connect");

    // NICKs alone never complete registration, however many are sent
    client.send_raw("NICK slowpoke").await.unwrap();
    client.send_raw("NICK slower").await.unwrap();

    let line = client
        .recv_timeout(Duration::from_secs(3))
        .await
        .expect("expected ERROR before close");
    assert_eq!(line, "ERROR :Registration timed out");

    client
        .expect_close(Duration::from_secs(2))
        .await
        .expect("server should close after the deadline");
}

#[tokio::test]
async fn test_registration_in_time_is_not_disconnected() {
    let server = TestServer::spawn_with_timeouts(2, 180, 60)
        .await
        .expect("Failed to spawn server");
    let mut client = server.connect("prompt").await.expect("Failed to connect");
    client.register().await.expect("Registration failed");

    // Well past the registration deadline the session is still usable
    tokio::time::sleep(Duration::from_millis(2500)).await;
    client.send_raw("PING :still-here").await.unwrap();
    let lines = client
        .recv_until(|line| line.starts_with("PONG"))
        .await
        .unwrap();
    assert_eq!(lines.last().unwrap(), "PONG minnow.local :still-here");
}

#[tokio::test]
async fn test_keepalive_timeout_closes_connection() {
    // The first PING goes out as soon as registration completes; the
    // client has 1 second to answer it. register() consumes that PING.
    let server = TestServer::spawn_with_timeouts(30, 3, 1)
        .await
        .expect("Failed to spawn server");
    let mut client = server.connect("deadwood").await.expect("Failed to connect");
    client.register().await.expect("Registration failed");

    // Never answer: the ERROR line precedes the close
    let error = client
        .recv_timeout(Duration::from_secs(3))
        .await
        .expect("expected ERROR before close");
    assert_eq!(error, "ERROR :Ping timeout (1 seconds)");

    client
        .expect_close(Duration::from_secs(2))
        .await
        .expect("server should close after ping timeout");
}

#[tokio::test]
async fn test_pong_keeps_connection_alive() {
    let server = TestServer::spawn_with_timeouts(30, 3, 1)
        .await
        .expect("Failed to spawn server");
    let mut client = server.connect("alive").await.expect("Failed to connect");
    client.register().await.expect("Registration failed");

    // Answer the keepalive PING that register() consumed
    client.send_raw("PONG :minnow.local").await.unwrap();

    // Past the timeout window the session is still usable
    tokio::time::sleep(Duration::from_millis(1500)).await;
    client.send_raw("PING :proof").await.unwrap();
    let reply = client.recv().await.unwrap();
    assert_eq!(reply, "PONG minnow.local :proof");

    // And the next cycle's PING still arrives, one period after the first
    let next = client
        .recv_until(|line| line.starts_with("PING"))
        .await
        .unwrap();
    assert_eq!(next.last().unwrap(), "PING :minnow.local");
}

#[tokio::test]
async fn test_undecodable_line_does_not_kill_session() {
    let server = TestServer::spawn().await.expect("Failed to spawn server");
    let mut client = server.connect("binary").await.expect("Failed to connect");
    client.register().await.expect("Registration failed");

    // Invalid UTF-8 in the middle; framing must survive it
    client.send_bytes(b"\xff\xfe garbage\r\n").await.unwrap();
    client.send_raw("PING :after-garbage").await.unwrap();

    let lines = client
        .recv_until(|line| line.starts_with("PONG"))
        .await
        .unwrap();
    assert_eq!(lines.last().unwrap(), "PONG minnow.local :after-garbage");
}
