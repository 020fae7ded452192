//! Observable wrapper around the two-level tree.
//!
//! Every mutation goes through [`ObservableSections`], which emits one [`Changeset`] per call to
//! the registered [`ChangesetSink`]s.
//!
//! [`Changeset`]: crate::changeset::Changeset

mod observable;
mod sink;

pub use observable::ObservableSections;
pub use sink::{ChangesetSink, ChannelSink, ListenerId, Listeners};
