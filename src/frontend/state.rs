//! PhonebookApp - the frontend state controller.
//!
//! Holds the contact list, the search box, the entry form, a transient
//! notification, the current alert and at most one pending confirmation.
//! Decisions that used to block on `confirm`/`prompt` dialogs are parked in
//! [`PendingAction`] and resolved later through [`PhonebookApp::confirm`] or
//! [`PhonebookApp::cancel`].
//!
//! Each user intent starts by clearing the previous alert.
//! Local state only changes after the server has accepted a change.
//! Failed calls are logged and leave the list as it was.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{error, info};

use super::client::PhonebookClient;
use super::view::{ContactListView, PageView, RowAction};
use crate::contact::policy::{check_entry, PolicyViolation};
use crate::contact::{Contact, ContactPayload};

/// How long a notification stays up.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub shown_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTIFICATION_TTL
    }
}

/// Messages shown in place of the old blocking `alert` calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Alert {
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
    #[error("Name and number are both required")]
    MissingField,
    #[error("{name} {number} is already added to phonebook")]
    Duplicate { name: String, number: String },
    #[error("Enter a new number")]
    EmptyNumber,
    #[error("That number is already the current number.")]
    UnchangedNumber,
    #[error("Number {number} is already used by {owner}.")]
    NumberTaken { number: String, owner: String },
    #[error("That contact is no longer in the phonebook")]
    UnknownContact,
    #[error("Answer the open question first")]
    Busy,
}

/// A decision waiting on the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Submitted name already exists with another number.
    ReplaceNumber {
        id: String,
        name: String,
        number: String,
    },
    /// Number prompt for an existing contact; `input` is the edit box.
    EditNumber {
        id: String,
        name: String,
        input: String,
    },
    /// Final check before an edited number is sent.
    ConfirmEdit {
        id: String,
        name: String,
        from: String,
        to: String,
    },
    Delete { id: String, name: String },
}

impl PendingAction {
    /// Question to put in front of the user.
    pub fn prompt(&self) -> String {
        match self {
            PendingAction::ReplaceNumber { name, .. } => format!(
                "{name} is already in the phonebook. Replace the old number with the new one?"
            ),
            PendingAction::EditNumber { name, .. } => format!("Update number for {name}:"),
            PendingAction::ConfirmEdit { name, from, to, .. } => format!(
                "Are you sure you want to update {name}'s number from {from} to {to}?"
            ),
            PendingAction::Delete { name, .. } => format!("Delete {name}?"),
        }
    }
}

/// Result of a user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The change went through (or there was nothing to send).
    Done,
    /// A [`PendingAction`] now waits for `confirm` or `cancel`.
    AwaitingConfirmation,
    /// Refused locally; nothing was sent.
    Rejected(Alert),
    Cancelled,
    /// The server call failed; local state is unchanged.
    Failed,
}

#[derive(Debug, Default)]
pub struct PhonebookApp {
    contacts: Vec<Contact>,
    search: String,
    form_name: String,
    form_number: String,
    notification: Option<Notification>,
    alert: Option<Alert>,
    pending: Option<PendingAction>,
}

impl PhonebookApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn form(&self) -> (&str, &str) {
        (&self.form_name, &self.form_number)
    }

    pub fn set_form_name(&mut self, name: impl Into<String>) {
        self.form_name = name.into();
    }

    pub fn set_form_number(&mut self, number: impl Into<String>) {
        self.form_number = number.into();
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Edit box of an open number prompt.
    pub fn set_edit_input(&mut self, value: impl Into<String>) {
        if let Some(PendingAction::EditNumber { input, .. }) = &mut self.pending {
            *input = value.into();
        }
    }

    /// Clear the notification once its time is up.
    pub fn expire_notification(&mut self, now: Instant) {
        if self.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notification = None;
        }
    }

    /// Fetch the full list. Meant to run once on mount.
    pub async fn load<C: PhonebookClient + ?Sized>(&mut self, client: &C) -> Outcome {
        match client.get_all().await {
            Ok(contacts) => {
                info!(count = contacts.len(), "Loaded contacts");
                self.contacts = contacts;
                Outcome::Done
            }
            Err(e) => {
                error!(error = %e, "Error loading contacts");
                Outcome::Failed
            }
        }
    }

    /// Submit the entry form.
    pub async fn submit<C: PhonebookClient + ?Sized>(&mut self, client: &C) -> Outcome {
        self.alert = None;
        if self.pending.is_some() {
            return self.reject(Alert::Busy);
        }

        let name = self.form_name.trim().to_string();
        let number = self.form_number.trim().to_string();

        if let Err(violation) = check_entry(&name, &number) {
            return self.reject(violation.into());
        }
        if name.is_empty() {
            return self.reject(Alert::MissingField);
        }

        let lowered = name.to_lowercase();
        let existing = self
            .contacts
            .iter()
            .find(|c| c.name.to_lowercase() == lowered);

        match existing {
            Some(contact) if contact.number == number => self.reject(Alert::Duplicate {
                name,
                number,
            }),
            Some(contact) => {
                self.pending = Some(PendingAction::ReplaceNumber {
                    id: contact.id.clone(),
                    name: contact.name.clone(),
                    number,
                });
                Outcome::AwaitingConfirmation
            }
            None => self.create(client, name, number).await,
        }
    }

    async fn create<C: PhonebookClient + ?Sized>(
        &mut self,
        client: &C,
        name: String,
        number: String,
    ) -> Outcome {
        match client.create(&ContactPayload::new(name, number)).await {
            Ok(created) => {
                self.notify(format!("{} was added to the phonebook", created.name));
                self.contacts.push(created);
                self.clear_form();
                Outcome::Done
            }
            Err(e) => {
                error!(error = %e, "Error creating entry");
                Outcome::Failed
            }
        }
    }

    /// Open the number prompt for a contact.
    pub fn begin_edit(&mut self, id: &str) -> Outcome {
        self.alert = None;
        if self.pending.is_some() {
            return self.reject(Alert::Busy);
        }
        let Some(contact) = self.find(id) else {
            return self.reject(Alert::UnknownContact);
        };

        self.pending = Some(PendingAction::EditNumber {
            id: contact.id.clone(),
            name: contact.name.clone(),
            input: contact.number.clone(),
        });
        Outcome::AwaitingConfirmation
    }

    /// Answer the number prompt. Moves on to a final confirmation when the
    /// new number is acceptable.
    pub fn submit_edit(&mut self, number: &str) -> Outcome {
        self.alert = None;
        let Some(PendingAction::EditNumber { id, .. }) = self.pending.clone() else {
            return Outcome::Cancelled;
        };

        let number = number.trim();
        if number.is_empty() {
            self.pending = None;
            return self.reject(Alert::EmptyNumber);
        }

        let Some(contact) = self.find(&id).cloned() else {
            self.pending = None;
            return self.reject(Alert::UnknownContact);
        };

        if contact.number == number {
            self.pending = None;
            return self.reject(Alert::UnchangedNumber);
        }

        if let Some(owner) = self.contacts.iter().find(|c| c.number == number && c.id != id) {
            let alert = Alert::NumberTaken {
                number: number.to_string(),
                owner: owner.name.clone(),
            };
            self.pending = None;
            return self.reject(alert);
        }

        self.pending = Some(PendingAction::ConfirmEdit {
            id,
            name: contact.name,
            from: contact.number,
            to: number.to_string(),
        });
        Outcome::AwaitingConfirmation
    }

    /// Ask before deleting a contact.
    pub fn request_delete(&mut self, id: &str) -> Outcome {
        self.alert = None;
        if self.pending.is_some() {
            return self.reject(Alert::Busy);
        }
        let Some(contact) = self.find(id) else {
            return self.reject(Alert::UnknownContact);
        };

        self.pending = Some(PendingAction::Delete {
            id: contact.id.clone(),
            name: contact.name.clone(),
        });
        Outcome::AwaitingConfirmation
    }

    /// Route a row button to its handler.
    pub fn dispatch(&mut self, action: RowAction) -> Outcome {
        match action {
            RowAction::Edit(id) => self.begin_edit(&id),
            RowAction::Delete(id) => self.request_delete(&id),
        }
    }

    /// Accept the pending action.
    pub async fn confirm<C: PhonebookClient + ?Sized>(&mut self, client: &C) -> Outcome {
        self.alert = None;
        let Some(pending) = self.pending.take() else {
            return Outcome::Cancelled;
        };

        match pending {
            PendingAction::ReplaceNumber { id, name, number } => {
                let outcome = self.update(client, &id, name, number).await;
                if outcome == Outcome::Done {
                    self.clear_form();
                }
                outcome
            }
            PendingAction::EditNumber { input, id, name } => {
                self.pending = Some(PendingAction::EditNumber {
                    id,
                    name,
                    input: input.clone(),
                });
                self.submit_edit(&input)
            }
            PendingAction::ConfirmEdit { id, name, to, .. } => {
                self.update(client, &id, name, to).await
            }
            PendingAction::Delete { id, name } => match client.remove(&id).await {
                Ok(()) => {
                    self.contacts.retain(|c| c.id != id);
                    self.notify(format!("{} was deleted from the phonebook", name));
                    Outcome::Done
                }
                Err(e) => {
                    error!(error = %e, id = %id, "Error deleting person");
                    Outcome::Failed
                }
            },
        }
    }

    /// Decline the pending action. Nothing is sent.
    pub fn cancel(&mut self) -> Outcome {
        self.pending = None;
        Outcome::Cancelled
    }

    pub fn view(&self) -> PageView {
        self.view_at(Instant::now())
    }

    /// Frame as of `now`. Notifications past their TTL are left out even if
    /// [`expire_notification`](Self::expire_notification) has not run yet.
    pub fn view_at(&self, now: Instant) -> PageView {
        PageView {
            notification: self
                .notification
                .as_ref()
                .filter(|n| !n.is_expired(now))
                .map(|n| n.message.clone()),
            alert: self.alert.as_ref().map(Alert::to_string),
            prompt: self.pending.as_ref().map(PendingAction::prompt),
            search: self.search.clone(),
            form_name: self.form_name.clone(),
            form_number: self.form_number.clone(),
            list: ContactListView::new(&self.contacts, &self.search),
        }
    }

    async fn update<C: PhonebookClient + ?Sized>(
        &mut self,
        client: &C,
        id: &str,
        name: String,
        number: String,
    ) -> Outcome {
        match client.update(id, &ContactPayload::new(name, number)).await {
            Ok(updated) => {
                if let Some(slot) = self.contacts.iter_mut().find(|c| c.id == updated.id) {
                    *slot = updated;
                }
                Outcome::Done
            }
            Err(e) => {
                error!(error = %e, id = %id, "Error updating person");
                Outcome::Failed
            }
        }
    }

    fn find(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    fn reject(&mut self, alert: Alert) -> Outcome {
        self.alert = Some(alert.clone());
        Outcome::Rejected(alert)
    }

    fn notify(&mut self, message: String) {
        self.notification = Some(Notification {
            message,
            shown_at: Instant::now(),
        });
    }

    fn clear_form(&mut self) {
        self.form_name.clear();
        self.form_number.clear();
    }
}
