//! Example: Rendezvous, buffered and directional channels

use crossbeam::channel::{self, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use crossbeam::select;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// A zero-capacity channel: the send completes only when the receive does.
pub fn unbuffered() -> String {
    let (tx, rx) = channel::bounded(0);
    thread::spawn(move || {
        let _ = tx.send("Hello from channel!".to_string());
    });
    rx.recv().unwrap_or_default()
}

/// Two sends fit in a buffer of two without a receiver waiting.
pub fn buffered() -> Vec<i32> {
    let (tx, rx) = channel::bounded(2);
    let _ = tx.send(1);
    let _ = tx.send(2);
    rx.try_iter().collect()
}

fn produce(tx: Sender<i32>) {
    let _ = tx.send(42);
}

fn consume(rx: Receiver<i32>) -> Option<i32> {
    rx.recv().ok()
}

/// Passing only one half restricts what each side can do.
pub fn direction() -> Option<i32> {
    let (tx, rx) = channel::bounded(0);
    let producer = thread::spawn(move || produce(tx));
    let value = consume(rx);
    let _ = producer.join();
    value
}

/// The receiver loop stops once the generator drops its sender.
pub fn generator(count: i32) -> Vec<i32> {
    let (tx, rx) = channel::bounded(0);
    thread::spawn(move || {
        for i in 0..count {
            if tx.send(i).is_err() {
                break;
            }
        }
    });
    rx.iter().collect()
}

/// Sends, then receives, on a channel nobody else touches.
pub fn timeouts(timeout: Duration) -> Vec<String> {
    let (tx, rx) = channel::bounded::<String>(0);
    let mut lines = Vec::new();

    match tx.send_timeout("message".to_string(), timeout) {
        Ok(()) => lines.push("Message sent".to_string()),
        Err(SendTimeoutError::Timeout(_)) => lines.push("Timeout sending message".to_string()),
        Err(SendTimeoutError::Disconnected(_)) => lines.push("Channel closed".to_string()),
    }

    match rx.recv_timeout(timeout) {
        Ok(msg) => lines.push(format!("Received: {msg}")),
        Err(RecvTimeoutError::Timeout) => lines.push("Timeout receiving message".to_string()),
        Err(RecvTimeoutError::Disconnected) => lines.push("Channel closed".to_string()),
    }

    lines
}

/// Two consumers share one receiver; each value is delivered exactly once.
/// Returns `(consumer, value)` pairs sorted by value.
pub fn shared_consumers(values: i32) -> Vec<(usize, i32)> {
    let (tx, rx) = channel::bounded(0);
    let (out_tx, out_rx) = channel::unbounded();

    let producer = thread::spawn(move || {
        for i in 0..values {
            if tx.send(i).is_err() {
                break;
            }
        }
    });

    let consumers: Vec<_> = (0..2)
        .map(|id| {
            let rx = rx.clone();
            let out_tx = out_tx.clone();
            thread::spawn(move || {
                for num in rx.iter() {
                    debug!(consumer = id, num, "received");
                    let _ = out_tx.send((id, num));
                }
            })
        })
        .collect();
    drop(out_tx);

    let _ = producer.join();
    for consumer in consumers {
        let _ = consumer.join();
    }

    let mut received: Vec<_> = out_rx.iter().collect();
    received.sort_by_key(|&(_, num)| num);
    received
}

/// Waits on two channels at once until both have delivered. A hung-up
/// receiver is swapped for `never()` so its arm stops winning the select.
pub fn two_channel_select() -> Vec<String> {
    let (tx1, mut rx1) = channel::bounded(0);
    let (tx2, mut rx2) = channel::bounded(0);
    thread::spawn(move || {
        let _ = tx1.send("First channel");
    });
    thread::spawn(move || {
        let _ = tx2.send("Second channel");
    });

    let mut lines = Vec::new();
    while lines.len() < 2 {
        let (mut closed1, mut closed2) = (false, false);
        select! {
            recv(rx1) -> msg => match msg {
                Ok(msg) => lines.push(format!("Received from ch1: {msg}")),
                Err(_) => closed1 = true,
            },
            recv(rx2) -> msg => match msg {
                Ok(msg) => lines.push(format!("Received from ch2: {msg}")),
                Err(_) => closed2 = true,
            },
        }
        if closed1 {
            rx1 = channel::never();
        }
        if closed2 {
            rx2 = channel::never();
        }
    }
    lines.sort();
    lines
}
