//! One attached device.
//!
//! A [`DeviceSession`] owns everything that lives for the duration of a device
//! attachment: the descriptor handed over by the event source, the catalog parsed from
//! it, the decoder's scratch buffer, and the [`InputSnapshot`].
//!
//! Each report runs one cycle: decode, then advance. A cycle either commits completely
//! or not at all. On failure the previous snapshot stays authoritative, the failure is
//! logged, and the session keeps accepting reports.

use crate::capability::CapabilityCatalog;
use crate::config::SessionConfig;
use crate::decoder::ReportDecoder;
use crate::error::{DecodeError, Result};
use crate::event::{AttachEvent, ChannelDesc, DeviceDescriptor, ReportEvent};
use crate::metadata::DeviceMeta;
use crate::snapshot::InputSnapshot;
use crate::trace::Tracer;
use crate::usage::ButtonLabels;
use tracing::{debug, info, warn};

pub struct DeviceSession {
    meta: DeviceMeta,
    descriptor: Box<dyn DeviceDescriptor>,
    catalog: CapabilityCatalog,
    decoder: ReportDecoder,
    snapshot: InputSnapshot,
    labels: ButtonLabels,
    tracer: Tracer,
    cycles: u64,
    discarded: u64,
}

impl DeviceSession {
    /// Parse the attach event's descriptor and start a session.
    ///
    /// ### Errors
    /// - [`Error::Config`](crate::Error::Config) if `config` fails validation.
    /// - [`Error::Catalog`](crate::Error::Catalog) for any catalog failure; the device
    ///   cannot be used without a catalog.
    pub fn attach(event: AttachEvent, config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        let AttachEvent { descriptor, meta } = event;
        let catalog = CapabilityCatalog::parse(&*descriptor)?;

        if catalog.button_count() > config.button_count {
            warn!(
                device = %meta,
                declared = catalog.button_count(),
                capacity = config.button_count,
                "primary button range is wider than the button vector; presses past capacity will be rejected"
            );
        }
        for range in catalog.secondary_button_ranges() {
            debug!(device = %meta, ?range, "secondary button range not decoded");
        }
        for value in catalog.pass_through_values() {
            debug!(device = %meta, ?value, "range value capability is pass-through only");
        }

        info!(
            device = %meta,
            buttons = catalog.button_count(),
            values = catalog.values().len(),
            "device attached"
        );

        let labels = config.labels();
        Ok(Self {
            decoder: ReportDecoder::for_catalog(&catalog),
            snapshot: InputSnapshot::new(config.button_count),
            tracer: Tracer::new(config.trace, labels.clone()),
            labels,
            meta,
            descriptor,
            catalog,
            cycles: 0,
            discarded: 0,
        })
    }

    /// Run one decode + advance cycle.
    ///
    /// On error nothing about the snapshot changes.
    pub fn handle_report(
        &mut self,
        report: &ReportEvent,
    ) -> std::result::Result<&InputSnapshot, DecodeError> {
        let usage_min = self.catalog.primary_button_range().usage_min;
        let result = self
            .decoder
            .decode(&self.catalog, &*self.descriptor, report.report())
            .and_then(|decoded| self.snapshot.advance(usage_min, &decoded));

        match result {
            Ok(()) => {
                self.cycles += 1;
                self.tracer.emit(self.cycles, &self.snapshot);
                Ok(&self.snapshot)
            }
            Err(e) => {
                self.discarded += 1;
                warn!(
                    device = %self.meta,
                    declared_size = report.declared_size,
                    error = %e,
                    "report discarded"
                );
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    pub fn catalog(&self) -> &CapabilityCatalog {
        &self.catalog
    }

    pub fn meta(&self) -> &DeviceMeta {
        &self.meta
    }

    pub fn labels(&self) -> &ButtonLabels {
        &self.labels
    }

    /// Channels declared by the device, labeled with this session's table.
    pub fn describe(&self) -> Vec<ChannelDesc> {
        self.catalog.describe(&self.labels)
    }

    /// Committed cycles so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Reports discarded so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}
