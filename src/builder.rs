// File: ./src/builder.rs
// Turns note metadata (labels and relations) into calendar event records.
use crate::dates::{duration_hhmm, format_date_to_local_iso, months_in_date_range, offset_date};
use crate::model::{AttributeType, Event, Note};
use crate::notify::NotificationSink;
use crate::store::NoteStore;
use anyhow::Result;
use log::error;
use rrule::RRuleSet;
use std::collections::HashMap;
use std::str::FromStr;

/// Resolved field values for one note. Field names can be repointed through
/// `calendar:<field>` labels, see [`customisable_label`].
#[derive(Debug, Clone, Default)]
pub struct EventFields {
    pub start_date: String,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub recurrence: Option<String>,
    pub is_archived: bool,
}

impl EventFields {
    pub fn with_start_date(start_date: &str) -> Self {
        Self {
            start_date: start_date.to_string(),
            ..Default::default()
        }
    }

    fn resolve(note: &Note) -> Option<Self> {
        let start_date = customisable_label(note, "startDate", "calendar:startDate")?;
        Some(Self {
            start_date,
            end_date: customisable_label(note, "endDate", "calendar:endDate"),
            start_time: customisable_label(note, "startTime", "calendar:startTime"),
            end_time: customisable_label(note, "endTime", "calendar:endTime"),
            recurrence: customisable_label(note, "recurrence", "calendar:recurrence"),
            is_archived: note.has_label("archived"),
        })
    }
}

/// Reads a label whose name may be repointed by a companion `calendar:<field>`
/// label. The indirection is one level deep: if the companion label names an
/// actual label that resolves to a non-empty value, that value wins; in every
/// other case the builtin label is read directly.
pub fn customisable_label(
    note: &Note,
    default_label_name: &str,
    customizer_label_name: &str,
) -> Option<String> {
    if let Some(custom_name) = note
        .get_label_value(customizer_label_name)
        .filter(|v| !v.is_empty())
        && let Some(value) = note.get_label_value(custom_name).filter(|v| !v.is_empty())
    {
        return Some(value.to_string());
    }
    note.get_label_value(default_label_name)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub struct EventBuilder<'a> {
    store: &'a dyn NoteStore,
    notifier: &'a dyn NotificationSink,
}

impl<'a> EventBuilder<'a> {
    pub fn new(store: &'a dyn NoteStore, notifier: &'a dyn NotificationSink) -> Self {
        Self { store, notifier }
    }

    /// Builds events for an explicit batch of note identifiers. Notes without
    /// a resolvable start date are silently skipped; one note may yield
    /// several events (one per resolved title).
    pub async fn build_events(&self, note_ids: &[String]) -> Result<Vec<Event>> {
        let notes = self.store.get_notes(note_ids).await?;
        let mut events = Vec::new();

        for note in &notes {
            let Some(fields) = EventFields::resolve(note) else {
                continue;
            };
            events.extend(self.build_event(note, fields).await?);
        }
        Ok(events)
    }

    /// Builds events for a calendar root note over a visible date range.
    /// Every per-day "date note" of the touched months contributes its own
    /// event, and each of its subtree descendants is attached to that date.
    pub async fn build_events_for_calendar(
        &self,
        calendar_root: &Note,
        range_start: &str,
        range_end: &str,
    ) -> Result<Vec<Event>> {
        let mut events = Vec::new();

        // Gather all the required date note ids.
        let mut all_date_note_ids = Vec::new();
        for month in months_in_date_range(range_start, range_end) {
            let date_notes_for_month = self
                .store
                .get_month_date_notes(&calendar_root.note_id, &month)
                .await?;
            all_date_note_ids.extend(date_notes_for_month.into_values());
        }

        let date_notes = self.store.get_notes(&all_date_note_ids).await?;
        let mut child_note_to_date: HashMap<String, String> = HashMap::new();
        let mut child_note_order: Vec<String> = Vec::new();
        for date_note in &date_notes {
            let Some(start_date) = date_note.get_label_value("dateNote") else {
                continue;
            };

            events.extend(
                self.build_event(date_note, EventFields::with_start_date(start_date))
                    .await?,
            );

            if date_note.has_children() {
                for child_note_id in self.store.get_subtree_note_ids(&date_note.note_id).await? {
                    if !child_note_to_date.contains_key(&child_note_id) {
                        child_note_order.push(child_note_id.clone());
                    }
                    child_note_to_date.insert(child_note_id, start_date.to_string());
                }
            }
        }

        // Request all child notes of date notes in a single run.
        let child_notes = self.store.get_notes(&child_note_order).await?;
        for child_note in &child_notes {
            if let Some(start_date) = child_note_to_date.get(&child_note.note_id) {
                events.extend(
                    self.build_event(child_note, EventFields::with_start_date(start_date))
                        .await?,
                );
            }
        }

        Ok(events)
    }

    /// Builds the events of a single note: one per resolved title. The date
    /// composition works on copies of the field values so that one title's
    /// derivation cannot leak into the next.
    pub async fn build_event(&self, note: &Note, fields: EventFields) -> Result<Vec<Event>> {
        let custom_title_attribute_name = note.get_label_value("calendar:title");
        let titles = self
            .resolve_titles(custom_title_attribute_name, note, true)
            .await?;

        let promoted_attributes = match note.get_label_value("calendar:displayedAttributes") {
            Some(displayed) => {
                let names: Vec<&str> = displayed.split(',').collect();
                Some(self.build_displayed_attributes(note, &names).await?)
            }
            None => None,
        };

        let mut events = Vec::with_capacity(titles.len());
        for title in titles {
            let start_date = fields.start_date.clone();
            let mut end_date = fields.end_date.clone();

            if fields.start_time.is_some() && fields.end_time.is_some() && end_date.is_none() {
                end_date = Some(start_date.clone());
            }

            let start = match &fields.start_time {
                Some(start_time) => format!("{start_date}T{start_time}:00"),
                None => start_date.clone(),
            };
            if fields.start_time.is_none() {
                // All-day: calendar widgets treat the end bound as exclusive,
                // so push it one calendar day out.
                let base = end_date.as_deref().unwrap_or(&start_date);
                if let Some(shifted) = offset_date(base, 1) {
                    end_date = Some(format_date_to_local_iso(shifted));
                }
            }

            let end = match (&end_date, &fields.end_time) {
                (Some(date), Some(end_time)) => Some(format!("{date}T{end_time}:00")),
                (Some(date), None) => Some(date.clone()),
                (None, _) => None,
            };

            let mut event = Event {
                id: note.note_id.clone(),
                title,
                start: start.clone(),
                end,
                rrule: None,
                duration: None,
                class_name: class_name(fields.is_archived, note.get_color_class()),
                promoted_attributes: promoted_attributes.clone(),
                url: format!("#{}?popup", note.note_id),
                note_id: note.note_id.clone(),
                icon_class: note.get_label_value("iconClass").map(str::to_string),
            };

            if let Some(recurrence) = fields.recurrence.as_deref().filter(|r| !r.is_empty()) {
                self.apply_recurrence(&mut event, note, &start, recurrence);
            }

            events.push(event);
        }
        Ok(events)
    }

    /// Validates the recurrence text and attaches it to the event. A valid
    /// rule replaces the end bound with a per-occurrence duration; an invalid
    /// rule leaves the event as a plain single occurrence and reports the
    /// problem without failing the batch.
    fn apply_recurrence(&self, event: &mut Event, note: &Note, start: &str, recurrence: &str) {
        let dtstart = start.replace(['-', ':'], "");
        let rrule_string = format!("DTSTART:{dtstart}\n{recurrence}");

        if recurrence_is_valid(&dtstart, recurrence) {
            let end = event.end.take();
            event.rrule = Some(rrule_string);
            if let Some(end) = end {
                event.duration = duration_hhmm(start, &end);
            }
        } else {
            let error_message = format!(
                "Note \"{} {}\" has an invalid #recurrence string. This note will not recur.",
                note.note_id, note.title
            );
            self.notifier.show_error(&error_message);
            error!("{}", error_message);
        }
    }

    /// Resolves the displayed titles of a note, honoring a `calendar:title`
    /// label that names either a label (literal value) or one or more
    /// relations (target note titles). Relation chains are followed exactly
    /// one hop; the nested call runs with `allow_relations` disabled.
    async fn resolve_titles(
        &self,
        custom_title_attribute_name: Option<&str>,
        note: &Note,
        allow_relations: bool,
    ) -> Result<Vec<String>> {
        if let Some(attribute_name) = custom_title_attribute_name.filter(|n| !n.is_empty()) {
            if let Some(label_value) = note.get_attribute_value(AttributeType::Label, attribute_name)
            {
                return Ok(vec![label_value.to_string()]);
            }

            if allow_relations {
                let relations = note.get_relations(attribute_name);
                if !relations.is_empty() {
                    let target_note_ids: Vec<String> =
                        relations.iter().map(|r| r.value.clone()).collect();
                    let target_notes = self.store.get_notes(&target_note_ids).await?;

                    let mut titles = Vec::new();
                    for target_note in &target_notes {
                        let target_custom_title = target_note.get_label_value("calendar:title");
                        let target_titles = Box::pin(self.resolve_titles(
                            target_custom_title,
                            target_note,
                            false,
                        ))
                        .await?;
                        titles.extend(target_titles);
                    }
                    return Ok(titles);
                }
            }
        }

        Ok(vec![note.title.clone()])
    }

    /// Projects the attributes named by `calendar:displayedAttributes` into
    /// (name, display value) pairs. The note's own attribute order is kept,
    /// not the requested list's order. Relation values resolve to the target
    /// note's title, fetched in one batch; unresolvable targets degrade to an
    /// empty string.
    async fn build_displayed_attributes(
        &self,
        note: &Note,
        displayed_attribute_names: &[&str],
    ) -> Result<Vec<(String, String)>> {
        let filtered: Vec<_> = note
            .get_attributes()
            .iter()
            .filter(|attr| displayed_attribute_names.contains(&attr.name.as_str()))
            .collect();

        let target_note_ids: Vec<String> = filtered
            .iter()
            .filter(|attr| attr.attr_type == AttributeType::Relation)
            .map(|attr| attr.value.clone())
            .collect();
        let target_notes = self.store.get_notes(&target_note_ids).await?;
        let target_titles: HashMap<String, String> = target_notes
            .into_iter()
            .map(|n| (n.note_id, n.title))
            .collect();

        let mut result = Vec::with_capacity(filtered.len());
        for attribute in filtered {
            match attribute.attr_type {
                AttributeType::Label => {
                    result.push((attribute.name.clone(), attribute.value.clone()));
                }
                AttributeType::Relation => {
                    let title = target_titles
                        .get(&attribute.value)
                        .cloned()
                        .unwrap_or_default();
                    result.push((attribute.name.clone(), title));
                }
            }
        }
        Ok(result)
    }
}

/// The note author may write the rule without the `RRULE:` prefix and the
/// start anchor may be date-only; normalize both before handing the text to
/// the parser. Validation is parse-or-reject: any malformed text is invalid.
fn recurrence_is_valid(dtstart: &str, recurrence: &str) -> bool {
    let anchor = if dtstart.contains('T') {
        format!("DTSTART:{dtstart}Z")
    } else {
        format!("DTSTART:{dtstart}T000000Z")
    };

    let mut lines = vec![anchor];
    for line in recurrence.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.contains(':') {
            lines.push(line.to_string());
        } else {
            lines.push(format!("RRULE:{line}"));
        }
    }

    RRuleSet::from_str(&lines.join("\n")).is_ok()
}

fn class_name(is_archived: bool, color_class: Option<&str>) -> String {
    let mut parts = Vec::new();
    if is_archived {
        parts.push("archived");
    }
    if let Some(color_class) = color_class.filter(|c| !c.is_empty()) {
        parts.push(color_class);
    }
    parts.join(" ")
}
