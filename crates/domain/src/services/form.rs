//! Entity form state.
//!
//! A form holds one draft plus its per-field errors. Validation runs after
//! every change for immediate feedback and once more as the gate before
//! submission.

use std::collections::BTreeMap;
use std::str::FromStr;

use validator::{Validate, ValidationErrors};

use crate::models::{Draft, PartnerDraft, PartnerStatus, Record, SubscriptionDraft, SubscriptionStatus};

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<E> {
    Create,
    Edit(E),
}

impl<E: Record> FormMode<E> {
    /// Id of the record being edited.
    pub fn editing_id(&self) -> Option<i64> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(existing) => Some(existing.id()),
        }
    }

    pub fn existing(&self) -> Option<&E> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(existing) => Some(existing),
        }
    }
}

/// Field name to messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for e in errs {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                out.insert(field.to_string(), message);
            }
        }
        out
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Drafts whose status can be entered as free text.
pub trait StatusField {
    type Status: FromStr;

    fn set_status(&mut self, status: Self::Status);
}

impl StatusField for PartnerDraft {
    type Status = PartnerStatus;

    fn set_status(&mut self, status: PartnerStatus) {
        self.status = status;
    }
}

impl StatusField for SubscriptionDraft {
    type Status = SubscriptionStatus;

    fn set_status(&mut self, status: SubscriptionStatus) {
        self.status = status;
    }
}

/// Modal form state for one entity type.
#[derive(Debug, Clone)]
pub struct EntityForm<D: Draft> {
    open: bool,
    mode: FormMode<D::Entity>,
    draft: D,
    errors: FieldErrors,
    /// Errors for raw input that could not be applied to the draft.
    input_errors: BTreeMap<&'static str, String>,
}

impl<D: Draft> Default for EntityForm<D> {
    fn default() -> Self {
        Self {
            open: false,
            mode: FormMode::Create,
            draft: D::default(),
            errors: FieldErrors::new(),
            input_errors: BTreeMap::new(),
        }
    }
}

impl<D: Draft> EntityForm<D> {
    /// A closed form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the form, seeding from `existing` (edit) or defaults (create).
    pub fn open(&mut self, existing: Option<&D::Entity>) {
        match existing {
            Some(entity) => {
                self.draft = D::from_entity(entity);
                self.mode = FormMode::Edit(entity.clone());
            }
            None => {
                self.draft = D::default();
                self.mode = FormMode::Create;
            }
        }
        self.input_errors.clear();
        self.errors = FieldErrors::new();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> &FormMode<D::Entity> {
        &self.mode
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Applies a change to the draft and re-validates. Ignored while closed.
    pub fn edit<F: FnOnce(&mut D)>(&mut self, change: F) -> &FieldErrors {
        if self.open {
            change(&mut self.draft);
            self.errors = self.collect_errors();
        }
        &self.errors
    }

    /// Runs validation and returns the draft when every field is valid.
    pub fn validate(&mut self) -> Result<D, FieldErrors> {
        self.errors = self.collect_errors();
        if self.errors.is_empty() {
            Ok(self.draft.clone())
        } else {
            Err(self.errors.clone())
        }
    }

    pub fn is_valid(&self) -> bool {
        self.collect_errors().is_empty()
    }

    fn collect_errors(&self) -> FieldErrors {
        let mut errors = match self.draft.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(&e),
        };
        for (field, message) in &self.input_errors {
            errors.insert(*field, message.clone());
        }
        errors
    }
}

impl<D: Draft + StatusField> EntityForm<D> {
    /// Sets the status from text. Unknown literals leave the draft unchanged
    /// and mark the field invalid until a valid status is entered.
    pub fn set_status_input(&mut self, raw: &str) -> &FieldErrors {
        if !self.open {
            return &self.errors;
        }
        match raw.parse::<D::Status>() {
            Ok(status) => {
                self.input_errors.remove("status");
                self.edit(|draft| draft.set_status(status))
            }
            Err(_) => {
                self.input_errors
                    .insert("status", format!("Invalid status '{raw}'"));
                self.errors = self.collect_errors();
                &self.errors
            }
        }
    }
}
