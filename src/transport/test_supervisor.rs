use crate::transport::scripted::Scripted;
use crate::transport::*;

use std::io;
use std::time::Duration;

use tokio::time::Instant;

const ZDA: &str = "$GPZDA,201530.00,04,07,2002,00,00*60";

fn policy(timeout_threshold: u32) -> ReconnectPolicy {
    ReconnectPolicy {
        timeout_threshold,
        ..ReconnectPolicy::default()
    }
}

fn timeouts(count: usize) -> Vec<Result<String, ReadError>> {
    (0..count).map(|_| Err(ReadError::Timeout)).collect()
}

#[tokio::test(start_paused = true)]
async fn test_timeouts_below_threshold() {
    let transport = Scripted::new(timeouts(3));
    let counts = transport.counts();
    let mut supervisor = Supervisor::new(transport, policy(2));

    for _ in 0..3 {
        assert_eq!(Supervised::Retry, supervisor.read_line().await);
    }

    assert_eq!(3, supervisor.timeouts());
    assert_eq!(0, supervisor.reconnects());
    assert_eq!(0, counts.lock().unwrap().connects);
}

#[tokio::test(start_paused = true)]
async fn test_timeouts_past_threshold() {
    let transport = Scripted::new(timeouts(4));
    let counts = transport.counts();
    let mut supervisor = Supervisor::new(transport, policy(2));

    for _ in 0..3 {
        supervisor.read_line().await;
    }

    let start = Instant::now();

    assert_eq!(Supervised::Retry, supervisor.read_line().await);

    assert_eq!(0, supervisor.timeouts());
    assert_eq!(1, supervisor.reconnects());
    assert_eq!(1, counts.lock().unwrap().connects);
    assert_eq!(1, counts.lock().unwrap().disconnects);
    assert_eq!(ConnectionState::Connected, supervisor.state());
    assert!(start.elapsed() >= Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_default_threshold() {
    let transport = Scripted::new(timeouts(7));
    let mut supervisor = Supervisor::new(transport, ReconnectPolicy::default());

    for _ in 0..6 {
        supervisor.read_line().await;
    }

    assert_eq!(0, supervisor.reconnects());

    supervisor.read_line().await;

    assert_eq!(1, supervisor.reconnects());
}

#[tokio::test(start_paused = true)]
async fn test_line_resets_timeouts() {
    let mut reads = timeouts(2);
    reads.push(Ok(ZDA.to_string()));
    reads.extend(timeouts(3));

    let mut supervisor = Supervisor::new(Scripted::new(reads), policy(2));

    supervisor.read_line().await;
    supervisor.read_line().await;

    assert_eq!(2, supervisor.timeouts());
    assert_eq!(Supervised::Line(ZDA.to_string()), supervisor.read_line().await);
    assert_eq!(0, supervisor.timeouts());

    for _ in 0..3 {
        supervisor.read_line().await;
    }

    assert_eq!(0, supervisor.reconnects());
}

#[tokio::test(start_paused = true)]
async fn test_refused() {
    let mut reads = timeouts(2);
    reads.push(Err(ReadError::Refused));

    let transport = Scripted::new(reads);
    let counts = transport.counts();
    let mut supervisor = Supervisor::new(transport, policy(5));
    let mut state = supervisor.subscribe_state();

    supervisor.read_line().await;
    supervisor.read_line().await;

    let start = Instant::now();

    assert_eq!(Supervised::Retry, supervisor.read_line().await);

    assert!(start.elapsed() >= Duration::from_secs(10));
    assert_eq!(1, supervisor.reconnects());
    assert_eq!(0, supervisor.timeouts());
    assert_eq!(1, counts.lock().unwrap().connects);
    assert!(state.has_changed().unwrap());
    assert_eq!(ConnectionState::Connected, *state.borrow_and_update());
}

#[tokio::test(start_paused = true)]
async fn test_refused_reconnect_fails() {
    let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
    let transport =
        Scripted::new(vec![Err(ReadError::Refused)]).failing_connects(vec![Err(refused)]);
    let mut supervisor = Supervisor::new(transport, policy(5));

    assert_eq!(Supervised::Retry, supervisor.read_line().await);
    assert_eq!(ConnectionState::Disconnected, supervisor.state());
}

#[tokio::test(start_paused = true)]
async fn test_overflow() {
    let transport = Scripted::new(vec![Err(ReadError::Overflow(83))]);
    let counts = transport.counts();
    let mut supervisor = Supervisor::new(transport, policy(5));

    assert_eq!(Supervised::Overflow(83), supervisor.read_line().await);
    assert_eq!(ConnectionState::Disconnected, supervisor.state());
    assert_eq!(1, counts.lock().unwrap().disconnects);
    assert_eq!(0, counts.lock().unwrap().connects);
}

#[tokio::test(start_paused = true)]
async fn test_io_error() {
    let error = io::Error::new(io::ErrorKind::Other, "framing error");
    let transport = Scripted::new(vec![Err(ReadError::Io(error))]);
    let counts = transport.counts();
    let mut supervisor = Supervisor::new(transport, policy(5));

    assert_eq!(Supervised::Retry, supervisor.read_line().await);
    assert_eq!(0, supervisor.timeouts());
    assert_eq!(0, supervisor.reconnects());
    assert_eq!(0, counts.lock().unwrap().disconnects);
}

#[tokio::test(start_paused = true)]
async fn test_open() {
    let transport = Scripted::lines(&["GGA,1,2*00", ZDA]);
    let mut supervisor = Supervisor::new(transport, policy(5));

    supervisor.open().await.unwrap();

    assert_eq!(ConnectionState::Connected, supervisor.state());
}

#[tokio::test(start_paused = true)]
async fn test_open_retries() {
    let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
    let transport = Scripted::lines(&[ZDA]).failing_connects(vec![Err(refused)]);
    let counts = transport.counts();
    let mut supervisor = Supervisor::new(transport, policy(5));

    supervisor.open().await.unwrap();

    assert_eq!(2, counts.lock().unwrap().connects);
    assert_eq!(ConnectionState::Connected, supervisor.state());
}

#[tokio::test(start_paused = true)]
async fn test_open_not_nmea() {
    let transport = Scripted::lines(&["AT", "OK", "AT"]);
    let counts = transport.counts();
    let policy = ReconnectPolicy {
        open_timeout: Some(Duration::ZERO),
        ..ReconnectPolicy::default()
    };
    let mut supervisor = Supervisor::new(transport, policy);

    match supervisor.open().await {
        Err(OpenError::NotNMEA(name)) => assert_eq!("scripted", name),
        r => panic!("expected not NMEA, got {:?}", r),
    }

    assert_eq!(ConnectionState::Disconnected, supervisor.state());
    assert_eq!(1, counts.lock().unwrap().disconnects);
    assert_eq!(3, counts.lock().unwrap().reads);
}
