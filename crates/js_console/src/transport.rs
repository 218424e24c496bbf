//! Delivery of console events to the remote observer.

use crate::protocol::ConsoleEvent;
use tokio::sync::mpsc;

/// Outgoing half of the observer connection.
///
/// All methods are fire-and-forget.
pub trait ConsoleTransport: Send + Sync {
    /// A message was appended at `index`.
    fn did_output_message(&self, index: usize);

    /// Batched response to a catch-up request.
    fn did_get_messages(&self, start_index: usize, message_types: Vec<String>, messages: Vec<String>);

    /// The observer broke the protocol. Not fatal to the console.
    fn did_misbehave(&self, reason: &str);
}

/// Transport that queues [`ConsoleEvent`]s on an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<ConsoleEvent>,
}

impl ChannelTransport {
    pub fn new(sender: mpsc::UnboundedSender<ConsoleEvent>) -> Self {
        Self { sender }
    }

    /// Create a transport together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ConsoleEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    fn send(&self, event: ConsoleEvent) {
        if let Err(err) = self.sender.send(event) {
            tracing::warn!("Console observer is gone, dropping {:?}", err.0);
        }
    }
}

impl ConsoleTransport for ChannelTransport {
    fn did_output_message(&self, index: usize) {
        self.send(ConsoleEvent::MessageAvailable { index });
    }

    fn did_get_messages(&self, start_index: usize, message_types: Vec<String>, messages: Vec<String>) {
        self.send(ConsoleEvent::Messages {
            start_index,
            message_types,
            messages,
        });
    }

    fn did_misbehave(&self, reason: &str) {
        tracing::warn!("Console observer misbehaved: {}", reason);
        self.send(ConsoleEvent::Misbehavior {
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_delivers_in_order() {
        let (transport, mut receiver) = ChannelTransport::channel();
        transport.did_output_message(0);
        transport.did_misbehave("bad index");

        assert_eq!(receiver.try_recv().unwrap(), ConsoleEvent::MessageAvailable { index: 0 });
        assert_eq!(
            receiver.try_recv().unwrap(),
            ConsoleEvent::Misbehavior {
                reason: "bad index".into()
            }
        );
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_is_not_fatal() {
        let (transport, receiver) = ChannelTransport::channel();
        drop(receiver);
        transport.did_output_message(3);
        transport.did_get_messages(0, vec![], vec![]);
    }
}
