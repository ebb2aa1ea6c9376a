use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::source::SourceKind;

/// Toggleable calendar layer. Each has a fixed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Orders,
    Payments,
    Calls,
    Inventory,
    Production,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Orders,
        EventCategory::Payments,
        EventCategory::Calls,
        EventCategory::Inventory,
        EventCategory::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Orders => "orders",
            EventCategory::Payments => "payments",
            EventCategory::Calls => "calls",
            EventCategory::Inventory => "inventory",
            EventCategory::Production => "production",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            EventCategory::Orders => "#3b82f6",
            EventCategory::Payments => "#10b981",
            EventCategory::Calls => "#f59e0b",
            EventCategory::Inventory => "#8b5cf6",
            EventCategory::Production => "#ef4444",
        }
    }
}

/// Identity of a calendar event across all sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventKey {
    pub source: SourceKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub key: EventKey,
    pub title: String,
    pub start: NaiveDateTime,
    pub category: EventCategory,
    pub color: &'static str,
}

impl CalendarEvent {
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }
}
