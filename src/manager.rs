//! Event dispatch.
//!
//! [`InputManager`] sits between an [`EventSource`] and the consumer. It owns at most one
//! [`DeviceSession`] and routes events to it:
//! - an attach builds a new session (replacing any previous one), and a catalog failure
//!   is returned to the caller right away;
//! - a report runs one cycle; decode failures are absorbed and reported as
//!   [`Dispatch::Discarded`] so the loop keeps going.
//!
//! Everything runs on the caller's thread, one event at a time. Consumers read the
//! snapshot between dispatches.

use crate::config::SessionConfig;
use crate::error::{ConfigError, DecodeError, Result};
use crate::event::InputKind;
use crate::session::DeviceSession;
use crate::snapshot::InputSnapshot;
use crate::source::{EventSource, SourceEvent};
use tracing::{debug, info};

/// Outcome of dispatching one event.
#[derive(Debug)]
pub enum Dispatch {
    /// A session was started.
    Attached,
    /// A cycle committed; carries its button edges.
    Updated(Vec<InputKind>),
    /// The report was rejected; the snapshot is unchanged.
    Discarded(DecodeError),
    /// A report arrived with no attached device.
    Ignored,
}

/// Totals from [`InputManager::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub cycles: u64,
    pub discarded: u64,
    pub ignored: u64,
}

#[derive(Default)]
pub struct InputManager {
    config: SessionConfig,
    session: Option<DeviceSession>,
}

impl InputManager {
    /// Start a manager with no attached device.
    ///
    /// ### Errors
    /// [`ConfigError::Invalid`] if `config` fails [`SessionConfig::validate`].
    pub fn new(config: SessionConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            session: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&DeviceSession> {
        self.session.as_ref()
    }

    pub fn snapshot(&self) -> Option<&InputSnapshot> {
        self.session.as_ref().map(DeviceSession::snapshot)
    }

    /// Route one event.
    ///
    /// ### Errors
    /// [`Error::Catalog`](crate::Error::Catalog) when an attach cannot be parsed. The
    /// previous session, if any, is dropped in that case.
    pub fn dispatch(&mut self, event: SourceEvent) -> Result<Dispatch> {
        match event {
            SourceEvent::Attach(attach) => {
                if let Some(old) = self.session.take() {
                    info!(device = %old.meta(), cycles = old.cycles(), "session replaced");
                }
                self.session = Some(DeviceSession::attach(attach, &self.config)?);
                Ok(Dispatch::Attached)
            }
            SourceEvent::Report(report) => {
                let Some(session) = self.session.as_mut() else {
                    debug!(bytes = report.bytes.len(), "report before attach ignored");
                    return Ok(Dispatch::Ignored);
                };
                Ok(match session.handle_report(&report) {
                    Ok(snapshot) => Dispatch::Updated(snapshot.edges()),
                    Err(e) => Dispatch::Discarded(e),
                })
            }
        }
    }

    /// Drain `source`, calling `on_cycle` after every committed cycle.
    ///
    /// Stops when the source is exhausted. Attach failures and source errors end the run
    /// with an error; discarded reports do not.
    pub fn run<S, F>(&mut self, source: &mut S, mut on_cycle: F) -> Result<RunStats>
    where
        S: EventSource + ?Sized,
        F: FnMut(&InputSnapshot, &[InputKind]),
    {
        let mut stats = RunStats::default();
        info!(source = source.name(), "event loop started");

        while let Some(event) = source.next_event()? {
            match self.dispatch(event)? {
                Dispatch::Attached => {}
                Dispatch::Updated(edges) => {
                    stats.cycles += 1;
                    if let Some(snapshot) = self.snapshot() {
                        on_cycle(snapshot, &edges);
                    }
                }
                Dispatch::Discarded(_) => stats.discarded += 1,
                Dispatch::Ignored => stats.ignored += 1,
            }
        }

        info!(
            source = source.name(),
            cycles = stats.cycles,
            discarded = stats.discarded,
            "event loop finished"
        );
        Ok(stats)
    }
}
