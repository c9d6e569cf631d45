//! Background OCR execution
//!
//! Recognition can take seconds, or hang if the engine misbehaves, so
//! each request runs on its own thread and the UI polls for the result.
//! A request is abandoned when it passes its deadline or when the user
//! starts a new selection. Its [`CancelToken`] is then set so the engine
//! can stop, and whatever the thread still produces is dropped.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, TryRecvError};
use image::RgbaImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::ViewerError;
use crate::vision::{self, OcrCapability, OcrError};

/// Shared flag telling a running request its result is no longer wanted
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of polling the worker
#[derive(Debug)]
pub enum OcrPoll {
    /// Nothing submitted
    Idle,
    /// Still running
    Pending,
    /// Finished, failed or timed out
    Finished(Result<String, ViewerError>),
}

struct PendingJob {
    id: u64,
    receiver: Receiver<Result<String, ViewerError>>,
    deadline: Instant,
    cancel: CancelToken,
}

/// Runs OCR requests off the UI thread, one at a time
pub struct OcrWorker {
    engine: Arc<dyn OcrCapability>,
    timeout: Duration,
    pending: Option<PendingJob>,
    next_id: u64,
}

impl OcrWorker {
    pub fn new(engine: Arc<dyn OcrCapability>, timeout: Duration) -> Self {
        Self {
            engine,
            timeout,
            pending: None,
            next_id: 1,
        }
    }

    /// Start recognizing `region`, cancelling any request still running
    ///
    /// Returns the request id used in log messages.
    pub fn submit(&mut self, region: RgbaImage) -> u64 {
        self.cancel();

        let id = self.next_id;
        self.next_id += 1;

        let (sender, receiver) = bounded(1);
        let cancel = CancelToken::new();
        let engine = Arc::clone(&self.engine);
        let thread_cancel = cancel.clone();

        info!(
            "OCR request #{} ({}x{}) submitted to {}",
            id,
            region.width(),
            region.height(),
            engine.name()
        );

        std::thread::spawn(move || {
            let start = Instant::now();
            let result = vision::recognize_cropped(engine.as_ref(), &region, &thread_cancel);
            if thread_cancel.is_cancelled() {
                debug!("OCR request #{} stopped after cancellation, result dropped", id);
                return;
            }
            debug!("OCR request #{} finished in {:?}", id, start.elapsed());
            // The receiver is gone if the worker itself was dropped
            let _ = sender.send(result);
        });

        self.pending = Some(PendingJob {
            id,
            receiver,
            deadline: Instant::now() + self.timeout,
            cancel,
        });
        id
    }

    /// Abandon the running request, if any
    ///
    /// Returns whether a request was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(job) => {
                job.cancel.cancel();
                info!("OCR request #{} cancelled", job.id);
                true
            }
            None => false,
        }
    }

    /// Check for a result without blocking
    pub fn poll(&mut self) -> OcrPoll {
        let Some(job) = self.pending.as_ref() else {
            return OcrPoll::Idle;
        };

        let deadline = job.deadline;
        let received = job.receiver.try_recv();

        match received {
            Ok(result) => self.finish(result),
            Err(TryRecvError::Empty) if Instant::now() >= deadline => self.expire(),
            Err(TryRecvError::Empty) => OcrPoll::Pending,
            Err(TryRecvError::Disconnected) => self.disconnected(),
        }
    }

    /// Block until the running request finishes or times out
    pub fn wait(&mut self) -> OcrPoll {
        let Some(job) = self.pending.as_ref() else {
            return OcrPoll::Idle;
        };

        let received = job.receiver.recv_deadline(job.deadline);

        match received {
            Ok(result) => self.finish(result),
            Err(RecvTimeoutError::Timeout) => self.expire(),
            Err(RecvTimeoutError::Disconnected) => self.disconnected(),
        }
    }

    fn finish(&mut self, result: Result<String, ViewerError>) -> OcrPoll {
        let job = self.pending.take();
        if let (Some(job), Err(e)) = (&job, &result) {
            warn!("OCR request #{} failed: {}", job.id, e);
        }
        OcrPoll::Finished(result)
    }

    fn expire(&mut self) -> OcrPoll {
        if let Some(job) = self.pending.take() {
            job.cancel.cancel();
            warn!("OCR request #{} timed out after {:?}", job.id, self.timeout);
        }
        OcrPoll::Finished(Err(ViewerError::OcrTimeout(self.timeout)))
    }

    fn disconnected(&mut self) -> OcrPoll {
        // The thread exits without sending only when it panicked
        if let Some(job) = self.pending.take() {
            warn!("OCR request #{} ended without a result", job.id);
        }
        OcrPoll::Finished(Err(ViewerError::OcrEngineFailure(OcrError::Recognition(
            "OCR thread terminated unexpectedly".to_string(),
        ))))
    }
}

impl Drop for OcrWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}
