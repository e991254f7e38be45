// File: ./src/model/event.rs
// The calendar-displayable event record produced by the builder.
use serde::Serialize;

/// One entry for a generic calendar-rendering widget. Built fresh on every
/// request from current note state; never persisted.
///
/// `start` is always present. `end` and `rrule` are mutually exclusive: a
/// valid recurrence rule removes the computed end and carries the span as
/// `duration` instead (only when an end instant was computable).
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Multi-line recurrence text: `DTSTART:YYYYMMDD[THHMMSS]` followed by
    /// the raw rule text, e.g. `FREQ=DAILY;COUNT=5`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
    /// Wall-clock `HH:MM` span of one occurrence; hours are not capped at 24.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted_attributes: Option<Vec<(String, String)>>,
    pub url: String,
    pub note_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_class: Option<String>,
}
