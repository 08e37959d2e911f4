//! Runtime form lifecycle
//!
//! An ordered sequence of groups of fields with a cursor on the field that
//! currently receives input. The form completes when the last field accepts
//! a valid answer; a completed form ignores further input.

use crate::error::ValidationError;
use crate::input::InputEvent;

use super::field::RuntimeField;
use super::store::{FieldValue, ValueStore};

/// Widest render width a form accepts from a resize event
pub const MAX_WIDTH: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Active,
    Completed,
}

/// Reaction of a form to one input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Answer stored, cursor moved to the next field
    Accepted,
    /// Answer rejected; the cursor stays put
    Rejected(ValidationError),
    /// Answer stored and it was the last one
    Completed,
    /// Cursor moved back one field
    Reverted,
    Resized,
    Ignored,
}

#[derive(Debug)]
pub struct RuntimeGroup {
    pub key: String,
    pub title: String,
    pub description: String,
    pub fields: Vec<RuntimeField>,
}

#[derive(Debug)]
pub struct RuntimeForm {
    groups: Vec<RuntimeGroup>,
    values: ValueStore,
    /// (group, field) index of every field in schema order
    order: Vec<(usize, usize)>,
    cursor: usize,
    state: FormState,
    width: u16,
    last_error: Option<ValidationError>,
}

impl RuntimeForm {
    pub(crate) fn new(groups: Vec<RuntimeGroup>, values: ValueStore) -> Self {
        let order: Vec<(usize, usize)> = groups
            .iter()
            .enumerate()
            .flat_map(|(g, group)| (0..group.fields.len()).map(move |f| (g, f)))
            .collect();
        let state = if order.is_empty() {
            FormState::Completed
        } else {
            FormState::Active
        };

        Self {
            groups,
            values,
            order,
            cursor: 0,
            state,
            width: MAX_WIDTH,
            last_error: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == FormState::Completed
    }

    pub fn groups(&self) -> &[RuntimeGroup] {
        &self.groups
    }

    pub fn fields(&self) -> impl Iterator<Item = &RuntimeField> {
        self.groups.iter().flat_map(|g| g.fields.iter())
    }

    /// Field awaiting input, `None` once completed
    pub fn current_field(&self) -> Option<&RuntimeField> {
        if self.is_completed() {
            return None;
        }
        self.order
            .get(self.cursor)
            .map(|&(g, f)| &self.groups[g].fields[f])
    }

    pub fn current_group(&self) -> Option<&RuntimeGroup> {
        if self.is_completed() {
            return None;
        }
        self.order.get(self.cursor).map(|&(g, _)| &self.groups[g])
    }

    /// (position of the current field, total fields), 1-based
    pub fn progress(&self) -> (usize, usize) {
        ((self.cursor + 1).min(self.order.len()), self.order.len())
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Error of the last rejected answer, cleared by the next accepted one
    pub fn last_error(&self) -> Option<&ValidationError> {
        self.last_error.as_ref()
    }

    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    pub fn get_string(&self, key: &str) -> String {
        self.values.get_string(key)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.values.get_bool(key)
    }

    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.values.get_list(key)
    }

    /// Copy every value out and reset the slots to their zero values
    pub fn take_values(&mut self) -> Vec<(String, FieldValue)> {
        self.values.drain_values()
    }

    pub fn into_values(self) -> ValueStore {
        self.values
    }

    /// Route one input event to the current field
    pub fn handle(&mut self, event: &InputEvent) -> FormOutcome {
        match event {
            InputEvent::Resize { width, .. } => {
                self.width = (*width).min(MAX_WIDTH);
                FormOutcome::Resized
            }
            _ if self.is_completed() => FormOutcome::Ignored,
            InputEvent::Submit(value) => self.submit(value.clone()),
            InputEvent::Back => {
                if self.cursor == 0 {
                    return FormOutcome::Ignored;
                }
                self.cursor -= 1;
                self.last_error = None;
                FormOutcome::Reverted
            }
            InputEvent::Finalize | InputEvent::Interrupt => FormOutcome::Ignored,
        }
    }

    fn submit(&mut self, value: FieldValue) -> FormOutcome {
        let Some(field) = self.current_field() else {
            return FormOutcome::Ignored;
        };

        if let Err(err) = field.validate(&value) {
            self.last_error = Some(err.clone());
            return FormOutcome::Rejected(err);
        }

        let key = field.key.clone();
        self.values.set(&key, value);
        self.last_error = None;
        self.cursor += 1;

        if self.cursor >= self.order.len() {
            self.state = FormState::Completed;
            FormOutcome::Completed
        } else {
            FormOutcome::Accepted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormBuilder;
    use crate::schema::{FieldDescriptor, FieldType, GroupDescriptor};

    fn taste_form() -> RuntimeForm {
        let groups = vec![GroupDescriptor::new("taste", "Taste")
            .with_field(FieldDescriptor::new(FieldType::Range, "rating", "Taste").mandatory())
            .with_field(FieldDescriptor::new(FieldType::Text, "comment", "Comment"))];
        FormBuilder::new(&groups).build().unwrap()
    }

    #[test]
    fn test_walks_fields_to_completion() {
        let mut form = taste_form();
        assert_eq!(form.state(), FormState::Active);
        assert_eq!(form.current_field().unwrap().key, "taste_rating");

        assert_eq!(
            form.handle(&InputEvent::Submit(FieldValue::text("4"))),
            FormOutcome::Accepted
        );
        assert_eq!(form.current_field().unwrap().key, "taste_comment");
        assert_eq!(form.progress(), (2, 2));

        assert_eq!(
            form.handle(&InputEvent::Submit(FieldValue::text("lovely"))),
            FormOutcome::Completed
        );
        assert!(form.is_completed());
        assert!(form.current_field().is_none());
        assert_eq!(form.get_string("taste_rating"), "4");
        assert_eq!(form.get_string("taste_comment"), "lovely");
    }

    #[test]
    fn test_rejected_answer_keeps_cursor() {
        let mut form = taste_form();
        let outcome = form.handle(&InputEvent::Submit(FieldValue::text("")));
        assert!(matches!(outcome, FormOutcome::Rejected(ValidationError::Required { .. })));
        assert_eq!(form.current_field().unwrap().key, "taste_rating");
        assert!(form.last_error().is_some());
        assert_eq!(form.get_string("taste_rating"), "");

        form.handle(&InputEvent::Submit(FieldValue::text("2")));
        assert!(form.last_error().is_none());
    }

    #[test]
    fn test_back_and_resize() {
        let mut form = taste_form();
        assert_eq!(form.handle(&InputEvent::Back), FormOutcome::Ignored);
        form.handle(&InputEvent::Submit(FieldValue::text("3")));
        assert_eq!(form.handle(&InputEvent::Back), FormOutcome::Reverted);
        assert_eq!(form.current_field().unwrap().key, "taste_rating");

        form.handle(&InputEvent::Resize {
            width: 200,
            height: 40,
        });
        assert_eq!(form.width(), MAX_WIDTH);
        form.handle(&InputEvent::Resize {
            width: 60,
            height: 40,
        });
        assert_eq!(form.width(), 60);
    }

    #[test]
    fn test_completed_form_ignores_input() {
        let mut form = taste_form();
        form.handle(&InputEvent::Submit(FieldValue::text("5")));
        form.handle(&InputEvent::Submit(FieldValue::text("")));
        assert_eq!(
            form.handle(&InputEvent::Submit(FieldValue::text("1"))),
            FormOutcome::Ignored
        );
        assert_eq!(form.get_string("taste_rating"), "5");
    }

    #[test]
    fn test_take_values_resets() {
        let mut form = taste_form();
        form.handle(&InputEvent::Submit(FieldValue::text("5")));
        form.handle(&InputEvent::Submit(FieldValue::text("great")));

        let taken = form.take_values();
        assert_eq!(taken.len(), 2);
        assert_eq!(form.get_string("taste_rating"), "");
        assert_eq!(form.get_string("taste_comment"), "");
    }

    #[test]
    fn test_empty_form_is_complete() {
        let form = FormBuilder::new(&[]).build().unwrap();
        assert!(form.is_completed());
        assert_eq!(form.progress(), (0, 0));
    }
}
