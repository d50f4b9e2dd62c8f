use std::fmt::Debug;

use flume::{Sender, TrySendError};
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleOrMany<T> {
    Single(T),
    Many(Vec<T>),
}

impl<T> From<T> for SingleOrMany<T> {
    fn from(msg: T) -> Self {
        SingleOrMany::Single(msg)
    }
}

impl<T> From<Vec<T>> for SingleOrMany<T> {
    fn from(msgs: Vec<T>) -> Self {
        SingleOrMany::Many(msgs)
    }
}

/// Collects messages and sends them as one batch when dropped
#[derive(Debug)]
pub struct DeferredSender<T>
where
    T: Debug + Send + Sync + 'static,
{
    sender: MessageSender<T>,
    buffer: Vec<T>,
}

impl<T> DeferredSender<T>
where
    T: Debug + Send + Sync + 'static,
{
    pub fn new(sender: MessageSender<T>) -> Self {
        Self { sender, buffer: vec![] }
    }

    pub fn queue(&mut self, message: T) {
        self.buffer.push(message);
    }
}

#[derive(Debug)]
pub struct MessageSender<T> {
    sender: Sender<SingleOrMany<T>>,
}

impl<T> Clone for MessageSender<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T> MessageSender<T>
where
    T: Debug + Send + Sync + 'static,
{
    pub fn new(sender: Sender<SingleOrMany<T>>) -> Self {
        Self { sender }
    }

    /// Send without blocking, the message is dropped if the queue is full
    pub fn send(&self, message: impl Into<SingleOrMany<T>>) {
        let message = message.into();
        debug!("send: {message:?}");

        match self.sender.try_send(message) {
            Ok(_) => {}
            Err(TrySendError::Full(message)) => {
                error!("nfc manager queue is full, dropping message: {message:?}");
            }
            Err(error) => {
                error!("unable to send message to nfc manager: {error:?}");
            }
        }
    }
}

impl<T> Drop for DeferredSender<T>
where
    T: Debug + Send + Sync + 'static,
{
    fn drop(&mut self) {
        let mut msgs = std::mem::take(&mut self.buffer);
        match msgs.len() {
            0 => {}
            1 => {
                if let Some(msg) = msgs.pop() {
                    self.sender.send(SingleOrMany::Single(msg));
                }
            }
            _ => self.sender.send(SingleOrMany::Many(msgs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_deferred_sender_batches_on_drop() {
        let (tx, rx) = flume::bounded(10);
        let sender = MessageSender::new(tx);

        {
            let mut deferred = DeferredSender::new(sender.clone());
            deferred.queue(1);
            deferred.queue(2);
            assert!(rx.is_empty());
        }

        assert_eq!(rx.recv().unwrap(), SingleOrMany::Many(vec![1, 2]));

        {
            let mut deferred = DeferredSender::new(sender.clone());
            deferred.queue(3);
        }

        assert_eq!(rx.recv().unwrap(), SingleOrMany::Single(3));

        drop(DeferredSender::new(sender));
        assert!(rx.is_empty());
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let (tx, rx) = flume::bounded(1);
        let sender = MessageSender::new(tx);

        sender.send(1);
        sender.send(2);

        assert_eq!(rx.try_recv().unwrap(), SingleOrMany::Single(1));
        assert!(rx.is_empty());

        sender.send(3);
        assert_eq!(rx.try_recv().unwrap(), SingleOrMany::Single(3));
    }
}
