//! Presentation - pure functions of the controller state.

use std::fmt;

use crate::contact::Contact;

pub const EMPTY_TITLE: &str = "No contacts found";
pub const EMPTY_HINT: &str = "Try adjusting your search";

/// Case-insensitive substring match of `search` against `"{name} {number}"`.
/// An empty search matches everything.
pub fn matches_search(contact: &Contact, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    format!("{} {}", contact.name, contact.number)
        .to_lowercase()
        .contains(&search.to_lowercase())
}

pub fn filter_contacts<'a>(contacts: &'a [Contact], search: &str) -> Vec<&'a Contact> {
    contacts
        .iter()
        .filter(|contact| matches_search(contact, search))
        .collect()
}

/// User intents a row can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Edit(String),
    Delete(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub id: String,
    pub initial: char,
    pub name: String,
    pub number: String,
}

impl ContactRow {
    fn new(contact: &Contact) -> Self {
        let initial = contact
            .name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?');

        Self {
            id: contact.id.clone(),
            initial,
            name: contact.name.clone(),
            number: contact.number.clone(),
        }
    }

    pub fn edit(&self) -> RowAction {
        RowAction::Edit(self.id.clone())
    }

    pub fn delete(&self) -> RowAction {
        RowAction::Delete(self.id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactListView {
    Empty,
    Rows(Vec<ContactRow>),
}

impl ContactListView {
    pub fn new(contacts: &[Contact], search: &str) -> Self {
        let rows: Vec<ContactRow> = filter_contacts(contacts, search)
            .into_iter()
            .map(ContactRow::new)
            .collect();

        if rows.is_empty() {
            ContactListView::Empty
        } else {
            ContactListView::Rows(rows)
        }
    }

    /// Number of contacts shown.
    pub fn count(&self) -> usize {
        match self {
            ContactListView::Empty => 0,
            ContactListView::Rows(rows) => rows.len(),
        }
    }

    pub fn rows(&self) -> &[ContactRow] {
        match self {
            ContactListView::Empty => &[],
            ContactListView::Rows(rows) => rows,
        }
    }
}

impl fmt::Display for ContactListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactListView::Empty => {
                writeln!(f, "{}", EMPTY_TITLE)?;
                writeln!(f, "{}", EMPTY_HINT)
            }
            ContactListView::Rows(rows) => {
                for row in rows {
                    writeln!(f, "({}) {}  {}  [edit] [delete]", row.initial, row.name, row.number)?;
                }
                Ok(())
            }
        }
    }
}

/// Everything a frame of the UI shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub notification: Option<String>,
    pub alert: Option<String>,
    pub prompt: Option<String>,
    pub search: String,
    pub form_name: String,
    pub form_number: String,
    pub list: ContactListView,
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Phonebook")?;
        if let Some(message) = &self.notification {
            writeln!(f, "[ok] {}", message)?;
        }
        if let Some(message) = &self.alert {
            writeln!(f, "[!] {}", message)?;
        }
        if let Some(prompt) = &self.prompt {
            writeln!(f, "[?] {}", prompt)?;
        }
        writeln!(f, "Search: {}", self.search)?;
        writeln!(f, "Name: {}  Number: {}", self.form_name, self.form_number)?;
        writeln!(f, "Contacts ({})", self.list.count())?;
        write!(f, "{}", self.list)
    }
}
