use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Whole-second countdown driven by external ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    initial: u32,
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            initial: seconds,
            remaining: seconds,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn initial(&self) -> u32 {
        self.initial
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Advance one second. Returns true on the tick that expires the countdown.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn reset(&mut self) {
        self.remaining = self.initial;
    }

    /// Fraction of time left, for progress bars.
    pub fn fraction_left(&self) -> f64 {
        if self.initial == 0 {
            return 0.0;
        }
        self.remaining as f64 / self.initial as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick;

/// Background tick source scoped to its owner. Dropping the ticker stops and
/// joins the thread, so no tick is delivered into a discarded session.
pub struct Ticker {
    rx: mpsc::Receiver<Tick>,
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tx.send(Tick).is_err() {
                            return;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                }
            }
        });

        Self {
            rx,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// One-second ticks, the cadence every game countdown expects.
    pub fn every_second() -> Self {
        Self::start(Duration::from_secs(1))
    }

    pub fn next(&self) -> anyhow::Result<Tick> {
        Ok(self.rx.recv()?)
    }

    pub fn try_next(&self) -> Option<Tick> {
        self.rx.try_recv().ok()
    }

    pub fn next_timeout(&self, timeout: Duration) -> Option<Tick> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn cancel(self) {}
}

impl Drop for Ticker {
    fn drop(&mut self) {
        // Disconnecting the stop channel wakes the thread immediately.
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
