//! The pulse transmitter: one worker thread that owns the output line.
//!
//! Requests travel over an mpsc channel to a dedicated OS thread
//! (`kraken-tx`) and results come back over a oneshot per request. The
//! worker owns the [`OutputLine`] and [`PulseTimer`] exclusively, so
//! transmissions never interleave and the line needs no locking.
//!
//! Pulse widths are hundreds of microseconds, well below what an async
//! runtime can schedule reliably, which is why the worker is a plain thread
//! that blocks on [`mpsc::Receiver::blocking_recv`] rather than a tokio task.
//!
//! # Cancellation
//!
//! Every request carries a child of the transmitter's [`CancellationToken`].
//! It is cancelled when the caller's future is dropped, when the caller's
//! own token fires, when the optional `abort_after` deadline passes, or when
//! the transmitter shuts down. The worker checks between pulses and inside
//! every wait; on abort it writes nothing further except a single `Low` if
//! the carrier was left on.

use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use kraken_core::error::{Error, Result};
use kraken_core::events::TransmitEvent;
use kraken_core::line::{LineLevel, OutputLine, PulseTimer};
use kraken_core::types::{Codeword, Protocol, TransmitReport};

use crate::waveform::TransmitFrame;

const REQUEST_CHANNEL_CAPACITY: usize = 16;
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Longest accepted base unit override.
pub const MAX_PULSE_LENGTH: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Static configuration of a [`Transmitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitterConfig {
    /// Protocol used when a request does not name one.
    pub protocol: Protocol,
    /// Base unit override. `None` uses the protocol's own pulse length.
    pub pulse_length: Option<Duration>,
    /// Frames sent per request unless overridden.
    pub repeat_count: u32,
}

impl TransmitterConfig {
    /// Base unit for `protocol` under this configuration.
    pub fn unit_for(&self, protocol: &Protocol) -> Duration {
        self.pulse_length.unwrap_or_else(|| protocol.pulse_length())
    }

    /// Reject configurations the worker cannot time.
    pub fn validate(&self) -> Result<()> {
        if self.repeat_count == 0 {
            return Err(Error::InvalidParameter(
                "repeat_count must be at least 1".into(),
            ));
        }
        match self.pulse_length {
            Some(unit) if unit.is_zero() => Err(Error::InvalidParameter(
                "pulse_length must be non-zero".into(),
            )),
            Some(unit) if unit > MAX_PULSE_LENGTH => Err(Error::InvalidParameter(format!(
                "pulse_length must not exceed {} ms",
                MAX_PULSE_LENGTH.as_millis()
            ))),
            _ => Ok(()),
        }
    }
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        let protocol = Protocol::default();
        TransmitterConfig {
            protocol,
            pulse_length: None,
            repeat_count: protocol.default_repeat(),
        }
    }
}

/// Per-request overrides for [`Transmitter::transmit_with`].
#[derive(Debug, Clone, Default)]
pub struct TransmitOptions {
    /// Protocol for this request only.
    pub protocol: Option<Protocol>,
    /// Frame count for this request only.
    pub repeat_count: Option<u32>,
    /// Operator token; cancelling it aborts the request.
    pub cancel: Option<CancellationToken>,
    /// Abort once this much time has passed since the worker picked the
    /// request up.
    pub abort_after: Option<Duration>,
}

impl TransmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn with_repeat_count(mut self, repeat_count: u32) -> Self {
        self.repeat_count = Some(repeat_count);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_abort_after(mut self, timeout: Duration) -> Self {
        self.abort_after = Some(timeout);
        self
    }
}

/// One transmission, fully resolved on the caller side.
struct Job {
    frame: TransmitFrame,
    unit: Duration,
    repeats: u32,
    cancel: CancellationToken,
    operator: Option<CancellationToken>,
    abort_after: Option<Duration>,
}

/// A request sent to the worker thread.
enum Request {
    Transmit {
        job: Job,
        reply: oneshot::Sender<Result<TransmitReport>>,
    },
    /// Release the line and hand it back; the worker exits afterwards.
    Shutdown {
        reply: oneshot::Sender<Box<dyn OutputLine>>,
    },
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to the transmitter worker.
///
/// Cheap to share behind an `Arc`; every method takes `&self`. Requests are
/// served strictly in arrival order.
pub struct Transmitter {
    tx: mpsc::Sender<Request>,
    cancel: CancellationToken,
    config: TransmitterConfig,
    event_tx: broadcast::Sender<TransmitEvent>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Transmitter {
    /// Start the worker thread. The line is activated lazily on the first
    /// transmission and stays active until [`shutdown`](Self::shutdown).
    ///
    /// Fails with [`Error::InvalidParameter`] when `config` does not pass
    /// [`TransmitterConfig::validate`].
    pub fn spawn<L, T>(line: L, timer: T, config: TransmitterConfig) -> Result<Transmitter>
    where
        L: OutputLine + 'static,
        T: PulseTimer + 'static,
    {
        config.validate()?;
        let (tx, rx) = mpsc::channel::<Request>(REQUEST_CHANNEL_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let worker = Worker {
            line: Box::new(line),
            timer: Box::new(timer),
            event_tx: event_tx.clone(),
        };
        let handle = std::thread::Builder::new()
            .name("kraken-tx".into())
            .spawn(move || worker.run(rx))?;

        debug!(protocol = config.protocol.id(), repeat = config.repeat_count, "transmitter started");

        Ok(Transmitter {
            tx,
            cancel,
            config,
            event_tx,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// The configuration this transmitter was started with.
    pub fn config(&self) -> &TransmitterConfig {
        &self.config
    }

    /// Subscribe to lifecycle events of subsequent requests.
    pub fn subscribe(&self) -> broadcast::Receiver<TransmitEvent> {
        self.event_tx.subscribe()
    }

    /// Send `codeword` with the configured protocol and repeat count.
    pub async fn transmit(&self, codeword: &Codeword) -> Result<TransmitReport> {
        self.transmit_with(codeword, TransmitOptions::default()).await
    }

    /// Send `codeword` with per-request overrides.
    ///
    /// Dropping the returned future aborts the transmission at the next
    /// pulse boundary.
    pub async fn transmit_with(
        &self,
        codeword: &Codeword,
        options: TransmitOptions,
    ) -> Result<TransmitReport> {
        if codeword.is_empty() {
            return Err(Error::InvalidParameter("codeword is empty".into()));
        }
        let protocol = options.protocol.unwrap_or(self.config.protocol);
        let repeats = options.repeat_count.unwrap_or(self.config.repeat_count);
        if repeats == 0 {
            return Err(Error::InvalidParameter(
                "repeat count must be at least 1".into(),
            ));
        }
        if self.cancel.is_cancelled() {
            return Err(Error::NotConnected);
        }

        let token = self.cancel.child_token();
        let guard = token.clone().drop_guard();
        let job = Job {
            frame: TransmitFrame::new(codeword.clone(), protocol),
            unit: self.config.unit_for(&protocol),
            repeats,
            cancel: token,
            operator: options.cancel,
            abort_after: options.abort_after,
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::Transmit {
                job,
                reply: reply_tx,
            })
            .await
            .map_err(|_| Error::NotConnected)?;

        let result = reply_rx.await.map_err(|_| Error::NotConnected)?;
        guard.disarm();
        result
    }

    /// Abort any in-flight request, release the line and stop the worker.
    ///
    /// Returns the line so the caller can reuse it. A second call, or any
    /// transmission afterwards, fails with [`Error::NotConnected`].
    pub async fn shutdown(&self) -> Result<Box<dyn OutputLine>> {
        self.cancel.cancel();

        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::Shutdown { reply: reply_tx })
            .await
            .map_err(|_| Error::NotConnected)?;
        let line = reply_rx.await.map_err(|_| Error::NotConnected)?;

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            let _ = tokio::task::spawn_blocking(move || handle.join()).await;
        }
        info!("transmitter shut down");
        Ok(line)
    }
}

impl Drop for Transmitter {
    fn drop(&mut self) {
        // The worker sees the closed channel once `tx` is gone and releases
        // the line on its own.
        self.cancel.cancel();
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

struct Worker {
    line: Box<dyn OutputLine>,
    timer: Box<dyn PulseTimer>,
    event_tx: broadcast::Sender<TransmitEvent>,
}

/// How far a job got before it stopped.
struct Progress {
    frames: u32,
    writes: u64,
    level: LineLevel,
}

impl Worker {
    fn run(mut self, mut rx: mpsc::Receiver<Request>) {
        while let Some(req) = rx.blocking_recv() {
            match req {
                Request::Transmit { job, reply } => {
                    let result = self.execute(&job);
                    let _ = reply.send(result);
                }
                Request::Shutdown { reply } => {
                    debug!("transmitter shutdown requested");
                    self.release();
                    let _ = reply.send(self.line);
                    return;
                }
            }
        }
        debug!("request channel closed, exiting transmitter worker");
        self.release();
    }

    fn release(&mut self) {
        if self.line.is_active() {
            if let Err(e) = self.line.release() {
                warn!(error = %e, "failed to release output line");
            }
        }
    }

    fn emit(&self, event: TransmitEvent) {
        // No subscribers is not an error.
        let _ = self.event_tx.send(event);
    }

    fn execute(&mut self, job: &Job) -> Result<TransmitReport> {
        let started = Instant::now();
        let deadline = job.abort_after.map(|timeout| started + timeout);
        let aborted = || {
            job.cancel.is_cancelled()
                || job.operator.as_ref().is_some_and(|t| t.is_cancelled())
                || deadline.is_some_and(|d| Instant::now() >= d)
        };

        if aborted() {
            debug!("transmission cancelled before start");
            self.emit(TransmitEvent::Aborted {
                frames: 0,
                reason: Error::Cancelled.to_string(),
            });
            return Err(Error::Cancelled);
        }

        if !self.line.is_active() {
            self.line.activate()?;
            info!("output line activated");
        }

        let codeword = job.frame.codeword();
        debug!(
            codeword = %codeword,
            protocol = job.frame.protocol().id(),
            unit_us = job.unit.as_micros() as u64,
            repeats = job.repeats,
            "transmission started"
        );
        self.emit(TransmitEvent::Started {
            codeword: codeword.clone(),
            repeats: job.repeats,
        });

        let mut progress = Progress {
            frames: 0,
            writes: 0,
            level: LineLevel::Low,
        };

        match self.send_frames(job, &mut progress, &aborted) {
            Ok(()) => {
                let report = TransmitReport {
                    frames: progress.frames,
                    segments: u64::from(progress.frames) * job.frame.segment_count() as u64,
                    writes: progress.writes,
                    elapsed: started.elapsed(),
                };
                info!(
                    frames = report.frames,
                    writes = report.writes,
                    elapsed_us = report.elapsed.as_micros() as u64,
                    "transmission finished"
                );
                self.emit(TransmitEvent::Finished {
                    frames: report.frames,
                });
                Ok(report)
            }
            Err(Error::Cancelled) => {
                if progress.level == LineLevel::High {
                    // Carrier was left on: one final write to drop it.
                    if let Err(e) = self.line.set_line(LineLevel::Low) {
                        warn!(error = %e, "failed to drop carrier after cancel");
                    }
                }
                info!(frames = progress.frames, "transmission cancelled");
                self.emit(TransmitEvent::Aborted {
                    frames: progress.frames,
                    reason: Error::Cancelled.to_string(),
                });
                Err(Error::Cancelled)
            }
            Err(e) => {
                warn!(error = %e, frames = progress.frames, "transmission failed");
                self.emit(TransmitEvent::Aborted {
                    frames: progress.frames,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Emit every frame of `job`, one mark/space pair per pulse.
    ///
    /// Deadlines are offsets from the start of each frame, so a late wake-up
    /// shortens the next interval instead of shifting the rest of the frame.
    fn send_frames(
        &mut self,
        job: &Job,
        progress: &mut Progress,
        aborted: &dyn Fn() -> bool,
    ) -> Result<()> {
        for index in 0..job.repeats {
            let origin = Instant::now();
            let mut offset = Duration::ZERO;

            for pulse in job.frame.pulses() {
                let (high, low) = pulse.durations(job.unit);

                if aborted() {
                    return Err(Error::Cancelled);
                }
                self.write(LineLevel::High, progress)?;
                offset += high;
                if !self.timer.wait_until(origin, offset, aborted) {
                    return Err(Error::Cancelled);
                }

                self.write(LineLevel::Low, progress)?;
                offset += low;
                if !self.timer.wait_until(origin, offset, aborted) {
                    return Err(Error::Cancelled);
                }
            }

            progress.frames += 1;
            debug!(index, "frame sent");
            self.emit(TransmitEvent::FrameSent { index });
        }
        Ok(())
    }

    fn write(&mut self, level: LineLevel, progress: &mut Progress) -> Result<()> {
        trace!(%level, "set line");
        self.line.set_line(level)?;
        progress.writes += 1;
        progress.level = level;
        Ok(())
    }
}
