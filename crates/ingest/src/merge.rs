use std::collections::HashMap;

use justiguide_core::Contact;

/// Email-keyed accumulator for one run. Output keeps first-seen order.
#[derive(Debug, Default)]
pub struct ContactMerger {
    index: HashMap<String, usize>,
    contacts: Vec<Contact>,
}

impl ContactMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new email, or fold into the existing record (fill gaps,
    /// accumulate `source`/`notes`).
    pub fn absorb(&mut self, mut contact: Contact) {
        let key = contact.email.trim().to_lowercase();
        match self.index.get(&key) {
            Some(&i) => self.contacts[i].absorb(&contact),
            None => {
                contact.email = key.clone();
                self.index.insert(key, self.contacts.len());
                self.contacts.push(contact);
            }
        }
    }

    pub fn absorb_all(&mut self, contacts: impl IntoIterator<Item = Contact>) {
        for c in contacts {
            self.absorb(c);
        }
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn into_contacts(self) -> Vec<Contact> {
        self.contacts
    }
}

/// Merge per-file batches. Callers pass CSV batches before PDF batches so
/// survey data is seeded before name-only guest lists.
pub fn merge_batches(batches: impl IntoIterator<Item = Vec<Contact>>) -> Vec<Contact> {
    let mut merger = ContactMerger::new();
    for batch in batches {
        merger.absorb_all(batch);
    }
    merger.into_contacts()
}
