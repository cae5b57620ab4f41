//! Cross-thread command queue
//!
//! Lets any thread queue commands for the thread that owns the dispatcher.
//! The owner drains the queue with [`CommandQueue::pump`], for example once
//! per frame, and each submitter gets its result on a one-shot channel.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use livetweak_sdk::{TweakCommand, TweakCommandResult};

use crate::config::TweakConfig;
use crate::dispatcher::Dispatcher;

/// Default capacity of the command queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// A queued command and where to send its result
struct Job {
    command: TweakCommand,
    reply: Sender<TweakCommandResult>,
}

/// Failure to queue a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// The queue is at capacity; the command was dropped
    #[error("Command queue full")]
    Full,

    /// The receiving side is gone
    #[error("Command queue disconnected")]
    Disconnected,
}

/// Bounded MPSC queue of commands
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct CommandQueue {
    sender: Sender<Job>,
    receiver: Receiver<Job>,
    capacity: usize,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Queue sized by `queue_capacity`
    pub fn from_config(config: &TweakConfig) -> Self {
        Self::with_capacity(config.queue_capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queue a command for the next [`pump`](Self::pump)
    ///
    /// This is safe to call from any thread.
    ///
    /// # Returns
    /// - `Ok(receiver)` yielding the result once the command has run
    /// - `Err(QueueError::Full)` if the queue is full (command is dropped)
    #[tracing::instrument(skip(self, command), fields(entry = %command.entry_id))]
    pub fn submit(
        &self,
        command: TweakCommand,
    ) -> Result<Receiver<TweakCommandResult>, QueueError> {
        let (reply, result) = bounded(1);
        match self.sender.try_send(Job { command, reply }) {
            Ok(()) => Ok(result),
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Command queue full, dropping command");
                Err(QueueError::Full)
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("Command queue disconnected");
                Err(QueueError::Disconnected)
            }
        }
    }

    /// Queue a command, blocking while the queue is full
    ///
    /// # Warning
    /// Only call from threads other than the one that pumps the queue
    /// (would deadlock if the queue is full and waiting for a pump).
    #[tracing::instrument(skip(self, command), fields(entry = %command.entry_id))]
    pub fn submit_blocking(
        &self,
        command: TweakCommand,
    ) -> Result<Receiver<TweakCommandResult>, QueueError> {
        let (reply, result) = bounded(1);
        self.sender.send(Job { command, reply }).map_err(|e| {
            tracing::error!("Failed to queue command (blocking): {}", e);
            QueueError::Disconnected
        })?;
        Ok(result)
    }

    /// Dispatch queued commands in FIFO order
    ///
    /// Processes at most `capacity` commands per call and returns how many
    /// ran.
    #[tracing::instrument(skip_all)]
    pub fn pump(&self, dispatcher: &Dispatcher) -> usize {
        let mut count = 0;

        while let Ok(job) = self.receiver.try_recv() {
            let result = dispatcher.dispatch(&job.command);
            if job.reply.send(result).is_err() {
                tracing::trace!("Result for '{}' dropped by submitter", job.command.entry_id);
            }
            count += 1;

            if count >= self.capacity {
                break;
            }
        }

        count
    }

    /// Number of commands waiting
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl std::fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandQueue")
            .field("capacity", &self.capacity)
            .field("pending", &self.pending())
            .finish()
    }
}
