//! Example: Multiplexing channels with `select!`

use crossbeam::channel::{self, after, never, Receiver, Select};
use crossbeam::select;
use std::thread;
use std::time::Duration;

/// Whichever of the two senders is ready first wins.
pub fn basic() -> String {
    let (tx1, rx1) = channel::bounded(1);
    let (tx2, rx2) = channel::bounded(1);
    thread::spawn(move || {
        let _ = tx1.send("First channel");
    });
    thread::spawn(move || {
        let _ = tx2.send("Second channel");
    });

    select! {
        recv(rx1) -> msg => format!("Received from ch1: {}", msg.unwrap_or_default()),
        recv(rx2) -> msg => format!("Received from ch2: {}", msg.unwrap_or_default()),
    }
}

pub fn with_default() -> String {
    let (_tx, rx) = channel::bounded::<String>(0);
    select! {
        recv(rx) -> msg => format!("Received: {}", msg.unwrap_or_default()),
        default => "No message available".to_string(),
    }
}

pub fn with_timeout(timeout: Duration) -> String {
    let (_tx, rx) = channel::bounded::<String>(0);
    select! {
        recv(rx) -> msg => format!("Received: {}", msg.unwrap_or_default()),
        default(timeout) => "Timeout waiting for message".to_string(),
    }
}

/// Three senders on a dynamic `Select`. A disconnected receiver is removed
/// from the set, so every value arrives exactly once.
pub fn three_channels() -> Vec<i32> {
    let receivers: Vec<Receiver<i32>> = (1..=3)
        .map(|value| {
            let (tx, rx) = channel::bounded(0);
            thread::spawn(move || {
                let _ = tx.send(value);
            });
            rx
        })
        .collect();

    let mut sel = Select::new();
    for rx in &receivers {
        sel.recv(rx);
    }

    let mut received = Vec::new();
    let mut open = receivers.len();
    while open > 0 {
        let oper = sel.select();
        let index = oper.index();
        match oper.recv(&receivers[index]) {
            Ok(value) => received.push(value),
            Err(_) => {
                sel.remove(index);
                open -= 1;
            }
        }
    }
    received.sort_unstable();
    received
}

/// A non-blocking send into a one-slot buffer, then a non-blocking receive.
pub fn send_with_default() -> Vec<String> {
    let (tx, rx) = channel::bounded(1);
    let mut lines = Vec::new();

    select! {
        send(tx, 42) -> res => lines.push(match res {
            Ok(()) => "Sent value 42".to_string(),
            Err(_) => "Channel closed".to_string(),
        }),
        default => lines.push("Channel is full".to_string()),
    }

    select! {
        recv(rx) -> val => lines.push(match val {
            Ok(v) => format!("Received: {v}"),
            Err(_) => "Channel closed".to_string(),
        }),
        default => lines.push("No value available".to_string()),
    }

    lines
}

/// Two competing timers per round; the shorter one always fires first.
pub fn competing_timeouts(rounds: usize, short: Duration, long: Duration) -> Vec<&'static str> {
    let rx = never::<String>();
    (0..rounds)
        .map(|_| {
            select! {
                recv(rx) -> _ => "Received",
                recv(after(short)) -> _ => "Short timeout",
                recv(after(long)) -> _ => "Long timeout",
            }
        })
        .collect()
}

/// Reads until the sender hangs up; `recv` reports the disconnect as `Err`.
pub fn closure_detection(values: i32) -> Vec<String> {
    let (tx, rx) = channel::bounded(0);
    thread::spawn(move || {
        for i in 0..values {
            if tx.send(i).is_err() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
    });

    let mut lines = Vec::new();
    loop {
        let closed = select! {
            recv(rx) -> val => match val {
                Ok(v) => {
                    lines.push(format!("Received: {v}"));
                    false
                }
                Err(_) => {
                    lines.push("Channel closed".to_string());
                    true
                }
            },
        };
        if closed {
            return lines;
        }
    }
}

#[cfg(test)]
mod select_tests {
    use super::*;

    #[test]
    fn test_basic_receives_one() {
        let line = basic();
        assert!(
            line == "Received from ch1: First channel" || line == "Received from ch2: Second channel",
            "{line}"
        );
    }

    #[test]
    fn test_default_and_timeout() {
        assert_eq!(with_default(), "No message available");
        assert_eq!(with_timeout(Duration::from_millis(20)), "Timeout waiting for message");
    }

    #[test]
    fn test_three_channels() {
        // Senders hang up right after sending; every run must still see all three.
        for _ in 0..20 {
            assert_eq!(three_channels(), vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_send_with_default() {
        assert_eq!(send_with_default(), vec!["Sent value 42", "Received: 42"]);
    }

    #[test]
    fn test_short_timeout_wins() {
        let results = competing_timeouts(3, Duration::from_millis(10), Duration::from_millis(50));
        assert_eq!(results, vec!["Short timeout"; 3]);
    }

    #[test]
    fn test_closure_detection() {
        assert_eq!(
            closure_detection(3),
            vec!["Received: 0", "Received: 1", "Received: 2", "Channel closed"]
        );
    }
}
