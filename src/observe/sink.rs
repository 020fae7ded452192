use std::fmt;

use derive_more::Display;
use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use hashlink::LinkedHashMap;
use tracing::debug;

use crate::changeset::Changeset;

/// Receives every changeset emitted by an observable tree.
///
/// Sinks are called synchronously from inside the mutating call, after the tree already holds
/// the new state.
pub trait ChangesetSink<S, I> {
    fn receive(&mut self, changeset: &Changeset<S, I>);
}

impl<S, I, F> ChangesetSink<S, I> for F
where
    F: FnMut(&Changeset<S, I>),
{
    fn receive(&mut self, changeset: &Changeset<S, I>) {
        (self)(changeset)
    }
}

/// Forwards owned changesets into an unbounded channel.
///
/// Sending never blocks, so delivery stays synchronous with the mutation. Once the receiver is
/// dropped, changesets are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink<S, I> {
    sender: UnboundedSender<Changeset<S, I>>,
}

impl<S, I> ChannelSink<S, I> {
    pub fn new() -> (Self, UnboundedReceiver<Changeset<S, I>>) {
        let (sender, receiver) = mpsc::unbounded();
        (Self { sender }, receiver)
    }

    pub fn from_sender(sender: UnboundedSender<Changeset<S, I>>) -> Self {
        Self { sender }
    }
}

impl<S: Clone, I: Clone> ChangesetSink<S, I> for ChannelSink<S, I> {
    fn receive(&mut self, changeset: &Changeset<S, I>) {
        if let Err(send_err) = self.sender.unbounded_send(changeset.clone()) {
            debug!("Dropping changeset, channel receiver is gone: {}", send_err);
        }
    }
}

/// Handle returned on subscription, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("listener#{_0}")]
pub struct ListenerId(u64);

/// Registered sinks in subscription order.
pub struct Listeners<S, I> {
    next_id: u64,
    sinks: LinkedHashMap<ListenerId, Box<dyn ChangesetSink<S, I>>>,
}

impl<S, I> Default for Listeners<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, I> Listeners<S, I> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            sinks: LinkedHashMap::new(),
        }
    }

    pub fn subscribe(&mut self, sink: impl ChangesetSink<S, I> + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.sinks.insert(id, Box::new(sink));
        debug!("Subscribed {}", id);
        id
    }

    /// Returns whether a sink was registered under `id`.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let removed = self.sinks.remove(&id).is_some();
        debug!("Unsubscribed {}: {}", id, removed);
        removed
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Delivers `changeset` to every sink, in subscription order.
    pub fn notify(&mut self, changeset: &Changeset<S, I>) {
        for sink in self.sinks.values_mut() {
            sink.receive(changeset);
        }
    }
}

impl<S, I> fmt::Debug for Listeners<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("next_id", &self.next_id)
            .field("sinks", &self.sinks.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use futures::StreamExt;
    use futures::executor::block_on;

    use super::*;
    use crate::changeset::Operation;
    use crate::tree::SectionedTree;

    fn reload() -> Changeset<&'static str, i32> {
        Changeset::new(vec![Operation::Reload], Arc::new(SectionedTree::new()))
    }

    #[test]
    fn listeners_are_notified_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            listeners.subscribe(move |_: &Changeset<&'static str, i32>| log.borrow_mut().push(name));
        }

        listeners.notify(&reload());

        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let count = Rc::new(RefCell::new(0));
        let mut listeners = Listeners::new();
        let id = {
            let count = Rc::clone(&count);
            listeners.subscribe(move |_: &Changeset<&'static str, i32>| *count.borrow_mut() += 1)
        };

        listeners.notify(&reload());
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.notify(&reload());

        assert_eq!(*count.borrow(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn channel_sink_forwards_owned_changesets() {
        let (mut sink, mut receiver) = ChannelSink::<&'static str, i32>::new();

        sink.receive(&reload());
        drop(sink);

        let received = block_on(receiver.next()).expect("Expected a changeset");
        assert!(received.is_reload());
        assert!(block_on(receiver.next()).is_none());
    }

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (mut sink, receiver) = ChannelSink::<&'static str, i32>::new();
        drop(receiver);

        sink.receive(&reload());
    }
}
