//! End-to-end scans against real loopback listeners.
//!
//! Tests are serialized so one test's listeners never land inside another
//! test's scanned range.

use portsweep::scanner::{scan, ScanCoordinator, ScanRequest, TcpConnectProber};
use serial_test::serial;
use std::time::Duration;
use tokio::net::TcpListener;

/// Bind `len` consecutive loopback ports, returning the first port and one
/// listener per port.
async fn reserve_block(len: u16) -> (u16, Vec<TcpListener>) {
    loop {
        let first = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = first.local_addr().unwrap().port();
        if base.checked_add(len - 1).is_none() {
            continue;
        }

        let mut listeners = vec![first];
        for offset in 1..len {
            match TcpListener::bind(("127.0.0.1", base + offset)).await {
                Ok(listener) => listeners.push(listener),
                Err(_) => break,
            }
        }
        if listeners.len() == len as usize {
            return (base, listeners);
        }
    }
}

/// Reserve a block and keep listening only on `open_offsets`.
async fn listeners_at(len: u16, open_offsets: &[u16]) -> (u16, Vec<TcpListener>) {
    let (base, listeners) = reserve_block(len).await;
    let kept = listeners
        .into_iter()
        .enumerate()
        .filter(|(offset, _)| open_offsets.contains(&(*offset as u16)))
        .map(|(_, listener)| listener)
        .collect();
    (base, kept)
}

fn spec(base: u16, len: u16) -> String {
    format!("{}-{}", base, base + len - 1)
}

#[tokio::test]
#[serial]
async fn finds_exactly_the_listening_ports() {
    let (base, _listeners) = listeners_at(6, &[1, 3]).await;
    let request = ScanRequest::parse("127.0.0.1", &spec(base, 6))
        .unwrap()
        .with_concurrency(4)
        .with_timeout(Duration::from_secs(5));

    let report = scan(&request).await.unwrap();

    assert_eq!(report.open_port_numbers(), vec![base + 1, base + 3]);
    assert!(report.completed);
    assert_eq!(report.ports_requested, 6);
    assert_eq!(report.ports_probed, 6);
}

#[tokio::test]
#[serial]
async fn result_is_independent_of_concurrency() {
    let (base, _listeners) = listeners_at(16, &[0, 5, 6, 15]).await;
    let expected = vec![base, base + 5, base + 6, base + 15];

    for concurrency in [1, 3, 16] {
        let request = ScanRequest::parse("127.0.0.1", &spec(base, 16))
            .unwrap()
            .with_concurrency(concurrency)
            .with_timeout(Duration::from_secs(10));

        let report = scan(&request).await.unwrap();
        assert_eq!(report.open_port_numbers(), expected, "concurrency {}", concurrency);
        assert!(report.completed);
    }
}

#[tokio::test]
#[serial]
async fn single_closed_port_yields_empty_report() {
    let (base, _none) = listeners_at(1, &[]).await;
    let request = ScanRequest::parse("127.0.0.1", &base.to_string())
        .unwrap()
        .with_concurrency(1)
        .with_timeout(Duration::from_secs(5));

    let report = scan(&request).await.unwrap();

    assert!(report.open_ports.is_empty());
    assert!(report.completed);
}

#[tokio::test]
#[serial]
async fn connect_timeout_does_not_hide_open_ports() {
    let (base, _listeners) = listeners_at(4, &[2]).await;
    let request = ScanRequest::parse("127.0.0.1", &spec(base, 4))
        .unwrap()
        .with_concurrency(2)
        .with_timeout(Duration::from_secs(5));
    let coordinator = ScanCoordinator::new(
        TcpConnectProber::new().with_connect_timeout(Duration::from_secs(1)),
    );

    let report = coordinator.scan(&request).await.unwrap();

    assert_eq!(report.open_port_numbers(), vec![base + 2]);
    assert!(report.completed);
}
