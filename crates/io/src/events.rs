//! Event-name canonicalization.
//!
//! Guest-list exports are named after the event plus whatever the exporting
//! tool appends (emoji, "Guests", timestamps). A fixed, ordered rule table maps
//! those raw names onto the labels used in `source` and `notes`.

use serde::{Deserialize, Serialize};

/// Built-in rules as (trigger groups, canonical name). Order matters.
const BUILTIN_RULES: &[(&[&[&str]], &str)] = &[
    (&[&["Founder Beach Club"]], "Founder Beach Club - Summer Of Rho"),
    (
        &[&["SundaySwervice", "Sunday Swervice"], &["Gunther", "Birthday"]],
        "Sunday Swervice - Gunther's Birthday",
    ),
    (&[&["SundaySwervice", "Sunday Swervice"]], "Sunday Swervice"),
    (&[&["Sunday Service"]], "Sunday Service"),
    (
        &[&["Immigration Founders", "Immigrant Founders"]],
        "Immigrant Founders Mixer",
    ),
];

/// A rule matches when every trigger group has at least one substring present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRule {
    pub triggers: Vec<Vec<String>>,
    pub name: String,
}

impl EventRule {
    pub fn matches(&self, raw: &str) -> bool {
        !self.triggers.is_empty()
            && self
                .triggers
                .iter()
                .all(|group| group.iter().any(|t| !t.is_empty() && raw.contains(t.as_str())))
    }
}

#[derive(Debug, Clone)]
pub struct EventTable {
    rules: Vec<EventRule>,
}

impl Default for EventTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EventTable {
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(groups, name)| EventRule {
                triggers: groups
                    .iter()
                    .map(|g| g.iter().map(|t| t.to_string()).collect())
                    .collect(),
                name: name.to_string(),
            })
            .collect();
        Self { rules }
    }

    /// Deployment rules are consulted before the built-ins.
    pub fn with_overrides(overrides: &[EventRule]) -> Self {
        let mut table = Self::builtin();
        let mut rules = overrides.to_vec();
        rules.append(&mut table.rules);
        table.rules = rules;
        table
    }

    pub fn rules(&self) -> &[EventRule] {
        &self.rules
    }

    /// Canonical label for a raw event name; the raw name when nothing matches.
    pub fn canonicalize(&self, raw: &str) -> String {
        self.rules
            .iter()
            .find(|r| r.matches(raw))
            .map(|r| r.name.clone())
            .unwrap_or_else(|| raw.to_string())
    }
}
