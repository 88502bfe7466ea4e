use serde::{Deserialize, Serialize};

use crate::contact::Contact;

/// Field coverage counts over a merged contact list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSummary {
    #[serde(rename = "withEmail")]
    pub with_email: usize,
    #[serde(rename = "withCompany")]
    pub with_company: usize,
    #[serde(rename = "withLinkedIn")]
    pub with_linkedin: usize,
    #[serde(rename = "withPhone")]
    pub with_phone: usize,
}

impl ContactSummary {
    pub fn from_contacts(contacts: &[Contact]) -> Self {
        let mut summary = Self::default();
        for c in contacts {
            if !c.email.is_empty() {
                summary.with_email += 1;
            }
            if c.has_company() {
                summary.with_company += 1;
            }
            if c.has_linkedin() {
                summary.with_linkedin += 1;
            }
            if c.has_phone() {
                summary.with_phone += 1;
            }
        }
        summary
    }
}
