//! View state of the contact window.
//!
//! All UI state lives in [`AppState`] and changes only through
//! [`AppState::update`]. Network calls and timers are not performed here;
//! `update` returns them as [`Effect`]s for the UI layer to run, and their
//! outcomes come back as further [`Action`]s.

use crate::api::client::{ApiClient, ClientError};
use crate::api::models::{Contact, CreateContactRequest};
use crate::validation::{Field, is_valid_email, validate_field};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

pub const CONTACT_ADDED: &str = "Contact added successfully!";
pub const CONTACT_DELETED: &str = "Contact deleted successfully!";
pub const LOAD_FAILED: &str = "Failed to load contacts";
pub const SUBMIT_FAILED: &str = "Failed to submit contact";
pub const DELETE_FAILED: &str = "Failed to delete contact";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    Name,
    Email,
    #[default]
    Date,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Name, SortKey::Email, SortKey::Date];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Email => "Email",
            SortKey::Date => "Date Created",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Success,
    Error,
}

/// Inline banner under the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Message => &self.message,
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
            Field::Message => self.message = value,
        }
    }

    pub fn to_request(&self) -> CreateContactRequest {
        CreateContactRequest {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            phone: Some(self.phone.clone()),
            message: Some(self.message.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Load,
    Loaded(Result<Vec<Contact>, String>),
    FieldChanged(Field, String),
    FieldBlurred(Field),
    Submit,
    Created(Result<Contact, String>),
    DismissSubmitStatus,
    SortBy(SortKey),
    ToggleSortOrder,
    RequestDelete(Uuid),
    CancelDelete,
    ConfirmDelete,
    Deleted { id: Uuid, result: Result<(), String> },
    /// Closed by the user.
    DismissToast(u64),
    ToastExpired(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchContacts,
    CreateContact(CreateContactRequest),
    DeleteContact(Uuid),
    ExpireToast { id: u64, after: Duration },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub contacts: Vec<Contact>,
    pub loading: bool,
    pub form: ContactForm,
    pub errors: BTreeMap<Field, String>,
    pub submitting: bool,
    pub submit_status: Option<Notice>,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    /// Contact awaiting delete confirmation.
    pub pending_delete: Option<Uuid>,
    pub toast: Option<Toast>,
    next_toast_id: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Load => {
                self.loading = true;
                vec![Effect::FetchContacts]
            }
            Action::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok(contacts) => {
                        self.contacts = contacts;
                        Vec::new()
                    }
                    Err(err) => {
                        log::warn!("loading contacts failed: {err}");
                        self.show_toast(Severity::Error, LOAD_FAILED)
                    }
                }
            }
            Action::FieldChanged(field, value) => {
                self.form.set(field, value);
                self.errors.remove(&field);
                self.submit_status = None;
                Vec::new()
            }
            Action::FieldBlurred(field) => {
                if let Some(err) = validate_field(field, self.form.value(field)) {
                    self.errors.insert(field, err.to_string());
                }
                Vec::new()
            }
            Action::Submit => self.submit(),
            Action::Created(result) => {
                self.submitting = false;
                match result {
                    Ok(contact) => {
                        self.contacts.insert(0, contact);
                        self.form = ContactForm::default();
                        self.errors.clear();
                        self.submit_status = Some(Notice {
                            severity: Severity::Success,
                            message: CONTACT_ADDED.to_string(),
                        });
                        self.show_toast(Severity::Success, CONTACT_ADDED)
                    }
                    Err(message) => {
                        self.submit_status = Some(Notice {
                            severity: Severity::Error,
                            message: message.clone(),
                        });
                        self.show_toast(Severity::Error, message)
                    }
                }
            }
            Action::DismissSubmitStatus => {
                self.submit_status = None;
                Vec::new()
            }
            Action::SortBy(key) => {
                self.sort_key = key;
                Vec::new()
            }
            Action::ToggleSortOrder => {
                self.sort_order = self.sort_order.toggled();
                Vec::new()
            }
            Action::RequestDelete(id) => {
                self.pending_delete = Some(id);
                Vec::new()
            }
            Action::CancelDelete => {
                self.pending_delete = None;
                Vec::new()
            }
            Action::ConfirmDelete => match self.pending_delete.take() {
                Some(id) => vec![Effect::DeleteContact(id)],
                None => Vec::new(),
            },
            Action::Deleted { id, result } => match result {
                Ok(()) => {
                    self.contacts.retain(|c| c.id != id);
                    self.show_toast(Severity::Success, CONTACT_DELETED)
                }
                Err(message) => self.show_toast(Severity::Error, message),
            },
            Action::DismissToast(id) | Action::ToastExpired(id) => {
                if self.toast.as_ref().is_some_and(|t| t.id == id) {
                    self.toast = None;
                }
                Vec::new()
            }
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        if self.submitting {
            return Vec::new();
        }
        self.errors = [Field::Name, Field::Email, Field::Phone]
            .into_iter()
            .filter_map(|f| validate_field(f, self.form.value(f)).map(|e| (f, e.to_string())))
            .collect();
        if !self.errors.is_empty() {
            return Vec::new();
        }
        self.submitting = true;
        self.submit_status = None;
        vec![Effect::CreateContact(self.form.to_request())]
    }

    /// Replaces any visible toast and schedules its expiry.
    fn show_toast(&mut self, severity: Severity, message: impl Into<String>) -> Vec<Effect> {
        self.next_toast_id += 1;
        let id = self.next_toast_id;
        self.toast = Some(Toast {
            id,
            severity,
            message: message.into(),
        });
        vec![Effect::ExpireToast {
            id,
            after: TOAST_DURATION,
        }]
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        let f = &self.form;
        !self.submitting
            && !f.name.trim().is_empty()
            && !f.email.trim().is_empty()
            && is_valid_email(&f.email)
            && !f.phone.trim().is_empty()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Submitting..."
        } else {
            "Submit Contact"
        }
    }

    pub fn sorted_contacts(&self) -> Vec<&Contact> {
        sort_contacts(&self.contacts, self.sort_key, self.sort_order)
    }

    pub fn pending_contact(&self) -> Option<&Contact> {
        let id = self.pending_delete?;
        self.contacts.iter().find(|c| c.id == id)
    }
}

/// Case-insensitive text order, falling back to byte order for ties.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sorted view over `contacts`; the slice itself is left untouched.
pub fn sort_contacts(contacts: &[Contact], key: SortKey, order: SortOrder) -> Vec<&Contact> {
    let mut sorted: Vec<&Contact> = contacts.iter().collect();
    sorted.sort_by(|a, b| {
        let ord = match key {
            SortKey::Name => compare_text(&a.name, &b.name),
            SortKey::Email => compare_text(&a.email, &b.email),
            SortKey::Date => a.created_at.cmp(&b.created_at),
        };
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    sorted
}

fn create_failure_message(err: &ClientError) -> String {
    err.server_message().unwrap_or(SUBMIT_FAILED).to_string()
}

fn delete_failure_message(err: &ClientError) -> String {
    match err.server_message() {
        Some(message) => message.to_string(),
        None => {
            let text = err.to_string();
            if text.is_empty() {
                DELETE_FAILED.to_string()
            } else {
                text
            }
        }
    }
}

/// Runs a network effect against the service and maps the outcome to the
/// action that reports it. Timer effects belong to the UI and yield `None`.
pub async fn perform(client: &ApiClient, effect: Effect) -> Option<Action> {
    match effect {
        Effect::FetchContacts => Some(Action::Loaded(
            client.list().await.map_err(|e| e.to_string()),
        )),
        Effect::CreateContact(req) => Some(Action::Created(
            client
                .create(&req)
                .await
                .map_err(|e| create_failure_message(&e)),
        )),
        Effect::DeleteContact(id) => Some(Action::Deleted {
            id,
            result: client
                .delete(id)
                .await
                .map(|_| ())
                .map_err(|e| delete_failure_message(&e)),
        }),
        Effect::ExpireToast { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};

    fn contact(name: &str, email: &str, age_minutes: i64) -> Contact {
        Contact {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            phone: "555".into(),
            message: String::new(),
            created_at: Utc::now() - ChronoDuration::minutes(age_minutes),
        }
    }

    fn filled_state() -> AppState {
        let mut state = AppState::new();
        state.update(Action::FieldChanged(Field::Name, "Ann".into()));
        state.update(Action::FieldChanged(Field::Email, "ann@x.com".into()));
        state.update(Action::FieldChanged(Field::Phone, "555-1111".into()));
        state
    }

    fn names(list: &[&Contact]) -> Vec<String> {
        list.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn load_shows_spinner_until_settled() {
        let mut state = AppState::new();
        assert_eq!(state.update(Action::Load), vec![Effect::FetchContacts]);
        assert!(state.loading);

        let ann = contact("Ann", "ann@x.com", 0);
        assert!(state.update(Action::Loaded(Ok(vec![ann.clone()]))).is_empty());
        assert!(!state.loading);
        assert_eq!(state.contacts, vec![ann]);
    }

    #[test]
    fn failed_load_toasts_and_keeps_list_empty() {
        let mut state = AppState::new();
        state.update(Action::Load);
        let effects = state.update(Action::Loaded(Err("connection refused".into())));
        assert!(!state.loading);
        assert!(state.contacts.is_empty());
        let toast = state.toast.clone().unwrap();
        assert_eq!(toast.message, LOAD_FAILED);
        assert_eq!(toast.severity, Severity::Error);
        assert_eq!(
            effects,
            vec![Effect::ExpireToast {
                id: toast.id,
                after: TOAST_DURATION
            }]
        );
    }

    #[test]
    fn invalid_submit_never_issues_a_request() {
        let mut state = AppState::new();
        state.update(Action::FieldChanged(Field::Email, "bob@x".into()));
        assert!(!state.can_submit());
        assert!(state.update(Action::Submit).is_empty());
        assert!(!state.submitting);
        assert_eq!(state.errors[&Field::Name], "Name is required");
        assert_eq!(state.errors[&Field::Email], "Please enter a valid email address");
        assert_eq!(state.errors[&Field::Phone], "Phone is required");
    }

    #[test]
    fn editing_a_field_clears_its_error_and_the_banner() {
        let mut state = AppState::new();
        state.update(Action::Submit);
        state.submit_status = Some(Notice {
            severity: Severity::Error,
            message: "boom".into(),
        });
        state.update(Action::FieldChanged(Field::Name, "A".into()));
        assert!(!state.errors.contains_key(&Field::Name));
        assert!(state.errors.contains_key(&Field::Phone));
        assert_eq!(state.submit_status, None);
    }

    #[test]
    fn blur_validates_only_that_field() {
        let mut state = AppState::new();
        state.update(Action::FieldBlurred(Field::Email));
        assert_eq!(state.errors.len(), 1);
        assert_eq!(state.errors[&Field::Email], "Email is required");
        state.update(Action::FieldBlurred(Field::Message));
        assert_eq!(state.errors.len(), 1);
    }

    #[test]
    fn valid_submit_disables_form_until_created() {
        let mut state = filled_state();
        assert!(state.can_submit());
        let effects = state.update(Action::Submit);
        assert_eq!(effects, vec![Effect::CreateContact(state.form.to_request())]);
        assert!(state.submitting);
        assert!(!state.can_submit());
        assert_eq!(state.submit_label(), "Submitting...");
        assert!(state.update(Action::Submit).is_empty());
    }

    #[test]
    fn created_contact_is_prepended_and_form_reset() {
        let mut state = filled_state();
        let older = contact("Zed", "zed@x.com", 10);
        state.contacts = vec![older.clone()];
        state.update(Action::Submit);

        let ann = contact("Ann", "ann@x.com", 0);
        state.update(Action::Created(Ok(ann.clone())));
        assert_eq!(state.contacts, vec![ann, older]);
        assert_eq!(state.form, ContactForm::default());
        assert!(!state.submitting);
        assert_eq!(state.submit_status.as_ref().unwrap().severity, Severity::Success);
        assert_eq!(state.toast.as_ref().unwrap().message, CONTACT_ADDED);
    }

    #[test]
    fn failed_create_keeps_entered_values() {
        let mut state = filled_state();
        state.update(Action::Submit);
        let before = state.form.clone();
        state.update(Action::Created(Err("Please enter a valid email address".into())));
        assert_eq!(state.form, before);
        assert!(state.contacts.is_empty());
        assert_eq!(
            state.submit_status,
            Some(Notice {
                severity: Severity::Error,
                message: "Please enter a valid email address".into()
            })
        );
        assert!(state.can_submit());
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut state = AppState::new();
        let ann = contact("Ann", "ann@x.com", 0);
        state.contacts = vec![ann.clone()];

        assert!(state.update(Action::RequestDelete(ann.id)).is_empty());
        assert_eq!(state.pending_contact(), Some(&ann));
        state.update(Action::CancelDelete);
        assert_eq!(state.pending_delete, None);
        assert!(state.update(Action::ConfirmDelete).is_empty());

        state.update(Action::RequestDelete(ann.id));
        assert_eq!(
            state.update(Action::ConfirmDelete),
            vec![Effect::DeleteContact(ann.id)]
        );
        assert_eq!(state.pending_delete, None);
    }

    #[test]
    fn delete_outcome_updates_list_only_on_success() {
        let mut state = AppState::new();
        let ann = contact("Ann", "ann@x.com", 0);
        let bob = contact("Bob", "bob@x.com", 1);
        state.contacts = vec![ann.clone(), bob.clone()];

        state.update(Action::Deleted {
            id: ann.id,
            result: Err("Contact not found".into()),
        });
        assert_eq!(state.contacts.len(), 2);
        assert_eq!(state.toast.as_ref().unwrap().message, "Contact not found");

        state.update(Action::Deleted {
            id: ann.id,
            result: Ok(()),
        });
        assert_eq!(state.contacts, vec![bob]);
        assert_eq!(state.toast.as_ref().unwrap().message, CONTACT_DELETED);
    }

    #[test]
    fn toast_expires_unless_replaced() {
        let mut state = AppState::new();
        let first = state.update(Action::Loaded(Err("x".into())));
        let Effect::ExpireToast { id: first_id, .. } = first[0].clone() else {
            panic!("expected expiry effect");
        };
        state.update(Action::Deleted {
            id: Uuid::nil(),
            result: Err("second".into()),
        });
        state.update(Action::ToastExpired(first_id));
        assert_eq!(state.toast.as_ref().unwrap().message, "second");

        let second_id = state.toast.as_ref().unwrap().id;
        state.update(Action::ToastExpired(second_id));
        assert_eq!(state.toast, None);
    }

    #[test]
    fn toast_can_be_closed_early() {
        let mut state = AppState::new();
        state.update(Action::Loaded(Err("x".into())));
        let id = state.toast.as_ref().unwrap().id;
        state.update(Action::DismissToast(id + 1));
        assert!(state.toast.is_some());
        state.update(Action::DismissToast(id));
        assert_eq!(state.toast, None);
    }

    #[test]
    fn sorting_is_a_projection() {
        let mut state = AppState::new();
        state.contacts = vec![
            contact("Bob", "bob@x.com", 0),
            contact("Ann", "ann@x.com", 5),
        ];
        state.update(Action::SortBy(SortKey::Name));
        state.sort_order = SortOrder::Asc;
        assert_eq!(names(&state.sorted_contacts()), ["Ann", "Bob"]);
        state.update(Action::ToggleSortOrder);
        assert_eq!(names(&state.sorted_contacts()), ["Bob", "Ann"]);
        assert_eq!(state.contacts[0].name, "Bob");
        assert_eq!(state.contacts[1].name, "Ann");
    }

    #[test]
    fn default_sort_is_newest_first() {
        let contacts = vec![
            contact("Old", "o@x.com", 30),
            contact("New", "n@x.com", 0),
            contact("Mid", "m@x.com", 10),
        ];
        let state = AppState {
            contacts,
            ..AppState::default()
        };
        assert_eq!(names(&state.sorted_contacts()), ["New", "Mid", "Old"]);
        let asc = sort_contacts(&state.contacts, SortKey::Date, SortOrder::Asc);
        assert_eq!(names(&asc), ["Old", "Mid", "New"]);
    }

    #[test]
    fn email_sort_ignores_case() {
        let contacts = vec![contact("B", "b@x.com", 0), contact("A", "A@x.com", 0)];
        let sorted = sort_contacts(&contacts, SortKey::Email, SortOrder::Asc);
        assert_eq!(names(&sorted), ["A", "B"]);
    }

    #[test]
    fn failure_messages_prefer_the_server_text() {
        let with_body = ClientError::Api {
            status: 400,
            message: Some("Name, email, and phone are required".into()),
        };
        let without_body = ClientError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(
            create_failure_message(&with_body),
            "Name, email, and phone are required"
        );
        assert_eq!(create_failure_message(&without_body), SUBMIT_FAILED);
        assert_eq!(delete_failure_message(&without_body), "HTTP 500");
    }

    #[test]
    fn state_serializes() {
        let mut state = filled_state();
        state.update(Action::Submit);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["form"]["name"], "Ann");
        assert_eq!(json["submitting"], true);
    }
}
