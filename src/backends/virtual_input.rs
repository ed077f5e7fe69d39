//! In-process scripted event source.
//!
//! [`ScriptedSource`] replays a queue of events fed by the caller. It backs the replay
//! demo and the session tests; no hardware is involved.

use crate::error::Result;
use crate::event::{AttachEvent, DeviceDescriptor, ReportEvent};
use crate::metadata::DeviceMeta;
use crate::source::{EventSource, SourceEvent};
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct ScriptedSource {
    name: String,
    events: VecDeque<SourceEvent>,
}

impl ScriptedSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            events: VecDeque::new(),
        }
    }

    /// Queue a raw event.
    pub fn feed(&mut self, event: SourceEvent) {
        self.events.push_back(event);
    }

    /// Queue an attach for `descriptor`.
    pub fn attach(&mut self, descriptor: impl DeviceDescriptor + 'static) {
        let meta = DeviceMeta::named("scripted", &self.name);
        self.feed(SourceEvent::Attach(AttachEvent::new(descriptor, meta)));
    }

    /// Queue a report whose declared size is its full length.
    pub fn report(&mut self, bytes: &[u8]) {
        self.feed(SourceEvent::Report(ReportEvent::new(bytes.to_vec())));
    }

    /// Number of queued events not yet delivered.
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for ScriptedSource {
    fn next_event(&mut self) -> Result<Option<SourceEvent>> {
        Ok(self.events.pop_front())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
