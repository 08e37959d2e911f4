//! Pre-recorded input, for tests and unattended runs.

use std::collections::VecDeque;

use crate::error::Result;
use crate::form::FieldValue;

use super::{FieldPrompt, InputEvent, InputSource, SummaryPrompt};

/// Replays a fixed sequence of events, then interrupts
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
    /// Field keys prompted so far, in order
    prompted: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = InputEvent>>(events: I) -> Self {
        Self {
            events: events.into_iter().collect(),
            prompted: Vec::new(),
        }
    }

    pub fn push(&mut self, event: InputEvent) -> &mut Self {
        self.events.push_back(event);
        self
    }

    pub fn text(&mut self, value: &str) -> &mut Self {
        self.push(InputEvent::Submit(FieldValue::text(value)))
    }

    pub fn confirm(&mut self, value: bool) -> &mut Self {
        self.push(InputEvent::Submit(FieldValue::Bool(value)))
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    pub fn prompted(&self) -> &[String] {
        &self.prompted
    }

    fn next(&mut self) -> InputEvent {
        self.events.pop_front().unwrap_or(InputEvent::Interrupt)
    }
}

impl InputSource for ScriptedInput {
    fn field_event(&mut self, prompt: &FieldPrompt<'_>) -> Result<InputEvent> {
        self.prompted.push(prompt.field.key.clone());
        Ok(self.next())
    }

    fn summary_event(&mut self, _prompt: &SummaryPrompt<'_>) -> Result<InputEvent> {
        Ok(self.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldKind, RuntimeField};
    use crate::summary::Summary;

    #[test]
    fn test_replays_then_interrupts() {
        let field = RuntimeField::new("g_name", "Name", FieldKind::Input);
        let prompt = FieldPrompt {
            header: String::new(),
            group_title: "G",
            field: &field,
            current: None,
            error: None,
            progress: (1, 1),
            width: 80,
        };
        let summary = Summary {
            groups: vec![],
            overall_average: 0.0,
            rank: None,
        };

        let mut input = ScriptedInput::default();
        input.text("Ada").push(InputEvent::Finalize);

        assert_eq!(
            input.field_event(&prompt).unwrap(),
            InputEvent::Submit(FieldValue::text("Ada"))
        );
        let summary_prompt = SummaryPrompt {
            applicant: "",
            object_name: "",
            summary: &summary,
        };
        assert_eq!(input.summary_event(&summary_prompt).unwrap(), InputEvent::Finalize);
        assert_eq!(input.field_event(&prompt).unwrap(), InputEvent::Interrupt);
        assert_eq!(input.prompted(), ["g_name", "g_name"]);
    }
}
