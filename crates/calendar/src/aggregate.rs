//! Multi-source calendar aggregation.
//!
//! Every source is folded independently: a source that failed to load, or a
//! record whose dates do not parse, only removes that source's (or that
//! record's) events. Everything else still reaches the calendar.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use stockroom_inventory::InventoryEvent;

use crate::event::{CalendarEvent, EventKey};
use crate::source::{
    CalendarSource, CallLog, OrderRecord, ProductionBatch, SourceKind, SupplierInvoice,
    SupplierPayment,
};

/// Fetch state of one source collection.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceFeed<'a, T> {
    Loading,
    Loaded(&'a [T]),
    Failed(String),
}

impl<T> Default for SourceFeed<'_, T> {
    fn default() -> Self {
        SourceFeed::Loading
    }
}

impl<'a, T> SourceFeed<'a, T> {
    /// Map a store query (`data`, `is_error`) onto a feed.
    pub fn from_query(data: Option<&'a [T]>, error: Option<&str>) -> Self {
        match (data, error) {
            (Some(items), _) => SourceFeed::Loaded(items),
            (None, Some(e)) => SourceFeed::Failed(e.to_string()),
            (None, None) => SourceFeed::Loading,
        }
    }
}

/// Everything the operations calendar draws from.
#[derive(Debug, Clone, Default)]
pub struct CalendarSources<'a> {
    pub orders: SourceFeed<'a, OrderRecord>,
    pub payments: SourceFeed<'a, SupplierPayment>,
    pub invoices: SourceFeed<'a, SupplierInvoice>,
    pub calls: SourceFeed<'a, CallLog>,
    pub inventory: SourceFeed<'a, InventoryEvent>,
    pub production: SourceFeed<'a, ProductionBatch>,
}

/// Per-source outcome of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: SourceKind,
    pub kept: usize,
    /// Records left off the calendar (no parseable date, or a repeated id).
    pub dropped: usize,
    pub loading: bool,
    pub failed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    /// Sorted by start, then by key.
    pub events: Vec<CalendarEvent>,
    pub report: Vec<SourceReport>,
}

impl Aggregation {
    pub fn dropped(&self) -> usize {
        self.report.iter().map(|r| r.dropped).sum()
    }

    pub fn failed_sources(&self) -> Vec<SourceKind> {
        self.report
            .iter()
            .filter(|r| r.failed.is_some())
            .map(|r| r.source)
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.report.iter().any(|r| r.loading)
    }
}

pub fn aggregate(sources: &CalendarSources<'_>) -> Aggregation {
    let mut events = Vec::new();
    let report = vec![
        fold(&sources.orders, &mut events),
        fold(&sources.payments, &mut events),
        fold(&sources.invoices, &mut events),
        fold(&sources.calls, &mut events),
        fold(&sources.inventory, &mut events),
        fold(&sources.production, &mut events),
    ];
    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.key.cmp(&b.key)));
    Aggregation { events, report }
}

fn fold<T: CalendarSource>(feed: &SourceFeed<'_, T>, out: &mut Vec<CalendarEvent>) -> SourceReport {
    let mut report = SourceReport {
        source: T::KIND,
        kept: 0,
        dropped: 0,
        loading: false,
        failed: None,
    };
    let records = match feed {
        SourceFeed::Loading => {
            report.loading = true;
            return report;
        }
        SourceFeed::Failed(error) => {
            warn!(source = T::KIND.as_str(), error = %error, "calendar source failed to load");
            report.failed = Some(error.clone());
            return report;
        }
        SourceFeed::Loaded(records) => *records,
    };

    let category = T::KIND.category();
    let mut seen = HashSet::new();
    for record in records {
        let id = record.record_id();
        let Some(start) = record.start() else {
            debug!(source = T::KIND.as_str(), id = %id, "calendar record has no parseable date");
            report.dropped += 1;
            continue;
        };
        if !seen.insert(id.clone()) {
            debug!(source = T::KIND.as_str(), id = %id, "duplicate calendar record");
            report.dropped += 1;
            continue;
        }
        out.push(CalendarEvent {
            key: EventKey {
                source: T::KIND,
                id,
            },
            title: record.title(),
            start,
            category,
            color: category.color(),
        });
        report.kept += 1;
    }
    if report.dropped > 0 {
        warn!(
            source = T::KIND.as_str(),
            dropped = report.dropped,
            kept = report.kept,
            "calendar records dropped"
        );
    }
    report
}
