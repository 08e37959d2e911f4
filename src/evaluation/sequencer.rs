//! Reviewer sequencing
//!
//! One form instance per reviewer, built from the shared evaluation groups.
//! Exactly one form is active at a time; input reaches only that form. When
//! it completes, its values are harvested into [`Results`] and the next
//! pending reviewer (ascending ordinal) becomes active. There is no way back
//! to a finished reviewer.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::ConfigurationError;
use crate::form::{FormBuilder, FormOutcome, RuntimeForm};
use crate::input::InputEvent;
use crate::schema::GroupDescriptor;

use super::results::Results;
use super::reviewer::Reviewer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Uninitialized,
    /// Ordinal of the reviewer whose form receives input
    Active(u32),
    Complete,
}

/// Reaction of the sequencer to one input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerOutcome {
    /// Event handled by the active form, reviewer unchanged
    Form(FormOutcome),
    /// A reviewer finished; `next` is the newly active one, if any
    ReviewerFinished { reviewer: u32, next: Option<u32> },
    Ignored,
}

#[derive(Debug)]
pub struct EvaluationSequencer {
    state: SequencerState,
    reviewers: Vec<Reviewer>,
    forms: BTreeMap<u32, RuntimeForm>,
    results: Results,
}

impl Default for EvaluationSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationSequencer {
    pub fn new() -> Self {
        Self {
            state: SequencerState::Uninitialized,
            reviewers: Vec::new(),
            forms: BTreeMap::new(),
            results: Results::new(),
        }
    }

    /// Initialized sequencer for the given reviewers
    pub fn start(
        evaluation: &[GroupDescriptor],
        reviewers: Vec<Reviewer>,
    ) -> Result<Self, ConfigurationError> {
        let mut sequencer = Self::new();
        sequencer.initialize(evaluation, reviewers)?;
        Ok(sequencer)
    }

    /// Build one form per reviewer and activate the lowest ordinal
    pub fn initialize(
        &mut self,
        evaluation: &[GroupDescriptor],
        mut reviewers: Vec<Reviewer>,
    ) -> Result<(), ConfigurationError> {
        if reviewers.is_empty() {
            return Err(ConfigurationError::NoReviewers);
        }
        reviewers.sort_by_key(|r| r.ordinal);
        if let Some(pair) = reviewers.windows(2).find(|w| w[0].ordinal == w[1].ordinal) {
            return Err(ConfigurationError::DuplicateReviewer {
                ordinal: pair[0].ordinal,
                first: pair[0].key.clone(),
                second: pair[1].key.clone(),
            });
        }

        let builder = FormBuilder::new(evaluation);
        let mut forms = BTreeMap::new();
        for reviewer in &reviewers {
            forms.insert(reviewer.ordinal, builder.build()?);
        }

        self.reviewers = reviewers;
        self.forms = forms;
        self.results = Results::new();
        self.state = SequencerState::Uninitialized;
        self.activate_next();

        info!(reviewers = self.reviewers.len(), "evaluation started");
        Ok(())
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SequencerState::Complete
    }

    pub fn reviewers(&self) -> &[Reviewer] {
        &self.reviewers
    }

    pub fn active_reviewer(&self) -> Option<&Reviewer> {
        match self.state {
            SequencerState::Active(ordinal) => self.reviewers.iter().find(|r| r.ordinal == ordinal),
            _ => None,
        }
    }

    pub fn active_form(&self) -> Option<&RuntimeForm> {
        match self.state {
            SequencerState::Active(ordinal) => self.forms.get(&ordinal),
            _ => None,
        }
    }

    /// (1-based position of the active reviewer, reviewer count)
    pub fn position(&self) -> (usize, usize) {
        let total = self.reviewers.len();
        let current = match self.state {
            SequencerState::Active(ordinal) => self
                .reviewers
                .iter()
                .position(|r| r.ordinal == ordinal)
                .map_or(total, |i| i + 1),
            SequencerState::Complete => total,
            SequencerState::Uninitialized => 0,
        };
        (current, total)
    }

    pub fn results(&self) -> &Results {
        &self.results
    }

    pub fn into_parts(self) -> (Vec<Reviewer>, Results) {
        (self.reviewers, self.results)
    }

    /// Route an event to the active reviewer's form
    pub fn handle(&mut self, event: &InputEvent) -> SequencerOutcome {
        let SequencerState::Active(ordinal) = self.state else {
            return SequencerOutcome::Ignored;
        };
        let Some(form) = self.forms.get_mut(&ordinal) else {
            return SequencerOutcome::Ignored;
        };

        match form.handle(event) {
            FormOutcome::Completed => {
                let next = self.finish(ordinal);
                SequencerOutcome::ReviewerFinished {
                    reviewer: ordinal,
                    next,
                }
            }
            outcome => SequencerOutcome::Form(outcome),
        }
    }

    fn finish(&mut self, ordinal: u32) -> Option<u32> {
        if let Some(form) = self.forms.get_mut(&ordinal) {
            let values = form.take_values();
            if !self.results.record(ordinal, values) {
                debug!(reviewer = ordinal, "reviewer already recorded");
            }
        }
        if let Some(reviewer) = self.reviewers.iter_mut().find(|r| r.ordinal == ordinal) {
            reviewer.completed = true;
            info!(reviewer = ordinal, name = %reviewer.name, "review completed");
        }
        self.activate_next()
    }

    /// Activate the lowest pending reviewer; forms that are complete from the
    /// start (no evaluation fields) are finished straight away
    fn activate_next(&mut self) -> Option<u32> {
        loop {
            let Some(next) = self
                .reviewers
                .iter()
                .find(|r| !r.completed)
                .map(|r| r.ordinal)
            else {
                self.state = SequencerState::Complete;
                return None;
            };

            self.state = SequencerState::Active(next);
            let already_done = self.forms.get(&next).is_some_and(RuntimeForm::is_completed);
            if !already_done {
                return Some(next);
            }
            self.finish_silently(next);
        }
    }

    fn finish_silently(&mut self, ordinal: u32) {
        if let Some(form) = self.forms.get_mut(&ordinal) {
            self.results.record(ordinal, form.take_values());
        }
        if let Some(reviewer) = self.reviewers.iter_mut().find(|r| r.ordinal == ordinal) {
            reviewer.completed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;
    use crate::schema::{FieldDescriptor, FieldType};

    fn taste_schema() -> Vec<GroupDescriptor> {
        vec![GroupDescriptor::new("taste", "Taste")
            .with_field(FieldDescriptor::new(FieldType::Range, "rating", "Taste").mandatory())
            .with_field(FieldDescriptor::new(FieldType::Text, "comment", "Comment"))]
    }

    fn submit(sequencer: &mut EvaluationSequencer, value: &str) -> SequencerOutcome {
        sequencer.handle(&InputEvent::Submit(FieldValue::text(value)))
    }

    #[test]
    fn test_no_reviewers_is_configuration_error() {
        let err = EvaluationSequencer::start(&taste_schema(), vec![]).unwrap_err();
        assert_eq!(err, ConfigurationError::NoReviewers);
    }

    #[test]
    fn test_duplicate_ordinals_rejected() {
        let reviewers = vec![Reviewer::new(2, "reviewer_2"), Reviewer::new(2, "reviewer_02")];
        let err = EvaluationSequencer::start(&taste_schema(), reviewers).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateReviewer { ordinal: 2, .. }));
    }

    #[test]
    fn test_uninitialized_ignores_input() {
        let mut sequencer = EvaluationSequencer::new();
        assert_eq!(sequencer.state(), SequencerState::Uninitialized);
        assert_eq!(submit(&mut sequencer, "3"), SequencerOutcome::Ignored);
    }

    #[test]
    fn test_reviewers_in_ascending_order_without_leakage() {
        let reviewers = vec![Reviewer::new(3, "reviewer_3"), Reviewer::new(1, "reviewer_1")];
        let mut sequencer = EvaluationSequencer::start(&taste_schema(), reviewers).unwrap();
        assert_eq!(sequencer.state(), SequencerState::Active(1));
        assert_eq!(sequencer.position(), (1, 2));

        submit(&mut sequencer, "5");
        assert_eq!(
            submit(&mut sequencer, "great"),
            SequencerOutcome::ReviewerFinished {
                reviewer: 1,
                next: Some(3)
            }
        );

        // The next reviewer starts from zero values
        let form = sequencer.active_form().unwrap();
        assert_eq!(form.get_string("taste_rating"), "");
        assert_eq!(form.get_string("taste_comment"), "");
        assert_eq!(sequencer.active_reviewer().unwrap().ordinal, 3);
        assert_eq!(sequencer.position(), (2, 2));

        submit(&mut sequencer, "2");
        assert_eq!(
            submit(&mut sequencer, ""),
            SequencerOutcome::ReviewerFinished {
                reviewer: 3,
                next: None
            }
        );
        assert!(sequencer.is_complete());

        let results = sequencer.results();
        assert_eq!(results.get_string("taste_rating", 1), "5");
        assert_eq!(results.get_string("taste_comment", 1), "great");
        assert_eq!(results.get_string("taste_rating", 3), "2");
        assert_eq!(results.get_string("taste_comment", 3), "");
        assert!(sequencer.reviewers().iter().all(|r| r.completed));
    }

    #[test]
    fn test_rejection_stays_on_reviewer() {
        let reviewers = vec![Reviewer::new(1, "reviewer_1"), Reviewer::new(2, "reviewer_2")];
        let mut sequencer = EvaluationSequencer::start(&taste_schema(), reviewers).unwrap();

        assert!(matches!(
            submit(&mut sequencer, "0"),
            SequencerOutcome::Form(FormOutcome::Rejected(_))
        ));
        assert_eq!(sequencer.state(), SequencerState::Active(1));
        assert!(!sequencer.results().contains_reviewer(1));
    }

    #[test]
    fn test_complete_ignores_input() {
        let reviewers = vec![Reviewer::new(1, "reviewer_1")];
        let mut sequencer = EvaluationSequencer::start(&taste_schema(), reviewers).unwrap();
        submit(&mut sequencer, "4");
        submit(&mut sequencer, "");
        assert!(sequencer.is_complete());
        assert_eq!(submit(&mut sequencer, "1"), SequencerOutcome::Ignored);
        assert_eq!(sequencer.results().get_string("taste_rating", 1), "4");
    }

    #[test]
    fn test_empty_evaluation_completes_immediately() {
        let reviewers = vec![Reviewer::new(1, "reviewer_1"), Reviewer::new(2, "reviewer_2")];
        let sequencer = EvaluationSequencer::start(&[], reviewers).unwrap();
        assert!(sequencer.is_complete());
        assert_eq!(sequencer.results().reviewer_count(), 2);
    }
}
