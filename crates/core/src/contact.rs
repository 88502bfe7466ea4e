use serde::{Deserialize, Serialize};

use crate::normalize::split_full_name;

/// Separator used when accumulating `source` and `notes` across observations.
pub const ACCUMULATE_SEPARATOR: &str = "; ";

/// Canonical contact record, keyed by normalized email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Trimmed, lower-cased. Always contains `@`.
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// `"<group> - <event>"`, possibly several joined by `"; "`.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Contact {
    /// New contact carrying only identity and provenance.
    pub fn new(email: impl Into<String>, labels: &SourceLabels) -> Self {
        Self {
            first_name: None,
            last_name: None,
            email: email.into(),
            company: None,
            linkedin: None,
            phone: None,
            source: labels.source(),
            notes: Some(labels.notes()),
        }
    }

    /// Set first/last name from a single full-name string.
    pub fn with_full_name(mut self, full_name: &str) -> Self {
        let (first, last) = split_full_name(full_name);
        self.first_name = first;
        self.last_name = last;
        self
    }

    /// Fold a later observation of the same email into this record.
    ///
    /// Identity fields only fill gaps; `source` and `notes` accumulate.
    pub fn absorb(&mut self, other: &Contact) {
        fill_gap(&mut self.first_name, &other.first_name);
        fill_gap(&mut self.last_name, &other.last_name);
        fill_gap(&mut self.company, &other.company);
        fill_gap(&mut self.linkedin, &other.linkedin);
        fill_gap(&mut self.phone, &other.phone);

        if let Some(note) = other.notes.as_deref().filter(|n| !n.is_empty()) {
            let existing = self.notes.get_or_insert_with(String::new);
            if existing.is_empty() {
                existing.push_str(note);
            } else {
                append_distinct(existing, note);
            }
        }

        if self.source.is_empty() {
            self.source = other.source.clone();
        } else {
            append_distinct(&mut self.source, &other.source);
        }
    }

    pub fn has_company(&self) -> bool {
        is_present(&self.company)
    }

    pub fn has_linkedin(&self) -> bool {
        is_present(&self.linkedin)
    }

    pub fn has_phone(&self) -> bool {
        is_present(&self.phone)
    }
}

/// Group/event pair a contact was observed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLabels {
    pub group_name: String,
    pub event_name: String,
}

impl SourceLabels {
    pub fn new(group_name: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            event_name: event_name.into(),
        }
    }

    pub fn source(&self) -> String {
        format!("{} - {}", self.group_name, self.event_name)
    }

    pub fn notes(&self) -> String {
        format!("Attended: {}", self.event_name)
    }
}

fn is_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.is_empty())
}

fn fill_gap(slot: &mut Option<String>, incoming: &Option<String>) {
    if !is_present(slot) && is_present(incoming) {
        *slot = incoming.clone();
    }
}

fn append_distinct(existing: &mut String, incoming: &str) {
    if incoming.is_empty() || existing.contains(incoming) {
        return;
    }
    existing.push_str(ACCUMULATE_SEPARATOR);
    existing.push_str(incoming);
}
