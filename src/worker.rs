use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crossbeam_channel::{bounded, Receiver};
use log::info;

use crate::classify::{PolicyTables, TagClassifier};
use crate::decode::Decoder;
use crate::task::{DecodeTask, TaskHandle, TaskStatus};

/// A queued decode. `receiver` yields the handle once the run has written its
/// result; for a cancelled run the channel disconnects without a value.
pub struct DecodeRequest {
    pub handle: TaskHandle,
    pub receiver: Receiver<TaskHandle>,
}

/// Runs decodes on background threads. A newer request supersedes the one in
/// flight: queuing cancels the previous run.
pub struct DecodeWorker<C = PolicyTables> {
    decoder: Arc<Decoder<C>>,
    current: Mutex<Option<TaskHandle>>,
}

impl<C: TagClassifier + Send + Sync + 'static> DecodeWorker<C> {
    pub fn new(decoder: Decoder<C>) -> Self {
        DecodeWorker {
            decoder: Arc::new(decoder),
            current: Mutex::new(None),
        }
    }

    pub fn queue_request(&self, input: Vec<u8>) -> DecodeRequest {
        let (tx, rx) = bounded(1);
        let task = DecodeTask::new(self.decoder.clone(), input);
        let handle = task.handle();

        {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = current.replace(handle.clone()) {
                if !previous.is_finished() {
                    info!("Superseding in-flight decode");
                }
                previous.cancel();
            }
        }

        let reply = handle.clone();
        thread::spawn(move || {
            if task.run() != TaskStatus::Cancelled {
                let _ = tx.send(reply);
            }
        });

        DecodeRequest {
            handle,
            receiver: rx,
        }
    }

    /// Cancels the run in flight, if any.
    pub fn cancel_current(&self) {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = current.as_ref() {
            handle.cancel();
        }
    }
}

impl<C> Drop for DecodeWorker<C> {
    fn drop(&mut self) {
        let current = self.current.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = current.take() {
            handle.cancel();
        }
    }
}
