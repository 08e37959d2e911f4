//! Input
//!
//! The events a ceremony reacts to and the sources that produce them. A
//! source is asked for one event at a time, given a description of what is
//! being asked; the ceremony state machine never talks to the terminal.

mod scripted;
mod terminal;

pub use scripted::ScriptedInput;
pub use terminal::TerminalInput;

use crate::error::{Result, ValidationError};
use crate::form::{FieldValue, RuntimeField};
use crate::summary::Summary;

/// One user action
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Answer for the field awaiting input
    Submit(FieldValue),
    /// Return to the previous field of the same form
    Back,
    /// Terminal dimensions changed
    Resize { width: u16, height: u16 },
    /// Confirm the summary and issue the certificate
    Finalize,
    /// Abandon the ceremony
    Interrupt,
}

/// The field a source is asked to answer
#[derive(Debug)]
pub struct FieldPrompt<'a> {
    /// Status line, e.g. whose review is running
    pub header: String,
    pub group_title: &'a str,
    pub field: &'a RuntimeField,
    /// Value currently held by the field
    pub current: Option<&'a FieldValue>,
    /// Why the previous answer was rejected
    pub error: Option<&'a ValidationError>,
    /// (field position, field count), 1-based
    pub progress: (usize, usize),
    pub width: u16,
}

/// The summary shown before the certificate is issued
#[derive(Debug, Clone, Copy)]
pub struct SummaryPrompt<'a> {
    pub applicant: &'a str,
    pub object_name: &'a str,
    pub summary: &'a Summary,
}

/// Producer of input events
pub trait InputSource {
    /// Next event while a form field awaits input
    fn field_event(&mut self, prompt: &FieldPrompt<'_>) -> Result<InputEvent>;

    /// Next event while the summary is shown
    fn summary_event(&mut self, prompt: &SummaryPrompt<'_>) -> Result<InputEvent>;
}
