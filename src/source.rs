//! Event sources.
//!
//! An [`EventSource`] is the platform side of the pipeline: it yields one
//! [`SourceEvent`] at a time, strictly in order, on the caller's thread. The core never
//! reaches into the platform except through the descriptor handed over on attach.

use crate::error::Result;
use crate::event::{AttachEvent, ReportEvent};

/// One delivery from an event source.
#[derive(Debug)]
pub enum SourceEvent {
    /// A device is ready; parse its descriptor before any report.
    Attach(AttachEvent),
    /// One raw input report from the attached device.
    Report(ReportEvent),
}

pub trait EventSource {
    /// Next event, `Ok(None)` once the source is exhausted or closed.
    ///
    /// Sources may block until a report arrives.
    fn next_event(&mut self) -> Result<Option<SourceEvent>>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
