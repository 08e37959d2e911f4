//! Interactive terminal input with dialoguer prompts.

use console::{style, truncate_str, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};

use crate::error::Result;
use crate::form::{rating_label, FieldKind, FieldValue, RATING_SCALE};

use super::{FieldPrompt, InputEvent, InputSource, SummaryPrompt};

/// Typed into a text prompt to return to the previous field
const BACK_COMMAND: &str = ":back";

pub struct TerminalInput {
    term: Term,
    theme: ColorfulTheme,
    last_size: Option<(u16, u16)>,
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalInput {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
            last_size: None,
        }
    }

    /// Resize event when the terminal changed since the last prompt
    fn poll_resize(&mut self) -> Option<InputEvent> {
        let (height, width) = self.term.size();
        if self.last_size == Some((width, height)) {
            return None;
        }
        self.last_size = Some((width, height));
        Some(InputEvent::Resize { width, height })
    }

    fn write_context(&self, prompt: &FieldPrompt<'_>) -> Result<()> {
        let width = usize::from(prompt.width);
        let (position, total) = prompt.progress;

        self.term.write_line("")?;
        self.term.write_line(&format!(
            "{} {}",
            style(truncate_str(&prompt.header, width, "…")).bold().cyan(),
            style(format!("[{position}/{total}]")).dim()
        ))?;
        self.term.write_line(&format!(
            "{} {}",
            style("→").cyan(),
            style(prompt.group_title).bold()
        ))?;
        if !prompt.field.description.is_empty() {
            self.term.write_line(&format!(
                "  {}",
                style(truncate_str(&prompt.field.description, width.saturating_sub(2), "…")).dim()
            ))?;
        }
        if let Some(err) = prompt.error {
            self.term.write_line(&format!("{} {}", style("✗").red(), err))?;
        }
        Ok(())
    }

    fn text_event(&self, title: String, current: Option<&FieldValue>) -> Result<InputEvent> {
        let initial = current.and_then(FieldValue::as_str).unwrap_or_default();
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(title)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()?;

        if answer.trim() == BACK_COMMAND {
            return Ok(InputEvent::Back);
        }
        Ok(InputEvent::Submit(FieldValue::Text(answer)))
    }
}

impl InputSource for TerminalInput {
    fn field_event(&mut self, prompt: &FieldPrompt<'_>) -> Result<InputEvent> {
        if let Some(resize) = self.poll_resize() {
            return Ok(resize);
        }
        self.write_context(prompt)?;

        let field = prompt.field;
        let title = if field.mandatory {
            format!("{} *", field.title)
        } else {
            field.title.clone()
        };

        let event = match &field.kind {
            FieldKind::Input | FieldKind::Text => self.text_event(title, prompt.current)?,
            FieldKind::FilePicker { allowed } => {
                let title = if allowed.is_empty() {
                    title
                } else {
                    format!("{title} ({})", allowed.join(", "))
                };
                self.text_event(title, prompt.current)?
            }
            FieldKind::Select { options } => {
                let current = prompt.current.and_then(FieldValue::as_str);
                let default = options.iter().position(|o| Some(o.as_str()) == current).unwrap_or(0);
                match Select::with_theme(&self.theme)
                    .with_prompt(title)
                    .items(options)
                    .default(default)
                    .interact_opt()?
                {
                    Some(index) => InputEvent::Submit(FieldValue::text(options[index].clone())),
                    None => InputEvent::Back,
                }
            }
            FieldKind::MultiSelect { options } => {
                let current = prompt.current.and_then(FieldValue::as_list).unwrap_or_default();
                let defaults: Vec<bool> = options.iter().map(|o| current.contains(o)).collect();
                match MultiSelect::with_theme(&self.theme)
                    .with_prompt(title)
                    .items(options)
                    .defaults(&defaults)
                    .interact_opt()?
                {
                    Some(indices) => InputEvent::Submit(FieldValue::List(
                        indices.into_iter().map(|i| options[i].clone()).collect(),
                    )),
                    None => InputEvent::Back,
                }
            }
            FieldKind::Range => {
                let items: Vec<String> = RATING_SCALE
                    .iter()
                    .map(|value| format!("{value}  {}", rating_label(value)))
                    .collect();
                let current = prompt.current.and_then(FieldValue::as_str);
                let default = RATING_SCALE.iter().position(|v| Some(*v) == current).unwrap_or(0);
                match Select::with_theme(&self.theme)
                    .with_prompt(title)
                    .items(&items)
                    .default(default)
                    .interact_opt()?
                {
                    Some(index) => InputEvent::Submit(FieldValue::text(RATING_SCALE[index])),
                    None => InputEvent::Back,
                }
            }
            FieldKind::Confirm {
                affirmative,
                negative,
            } => {
                let current = prompt.current.and_then(FieldValue::as_bool).unwrap_or(false);
                match Select::with_theme(&self.theme)
                    .with_prompt(title)
                    .items(&[affirmative.as_str(), negative.as_str()])
                    .default(if current { 0 } else { 1 })
                    .interact_opt()?
                {
                    Some(index) => InputEvent::Submit(FieldValue::Bool(index == 0)),
                    None => InputEvent::Back,
                }
            }
        };
        Ok(event)
    }

    fn summary_event(&mut self, prompt: &SummaryPrompt<'_>) -> Result<InputEvent> {
        let summary = prompt.summary;

        self.term.write_line("")?;
        self.term.write_line(&format!(
            "{} {} - {}",
            style("Summary").bold().cyan(),
            style(prompt.applicant).bold(),
            prompt.object_name
        ))?;
        for group in &summary.groups {
            let stats = group.stats;
            self.term.write_line(&format!(
                "  {:<24} {} {:.2}  {} {:.2}  {} {:.2}",
                group.title,
                style("min").dim(),
                stats.min,
                style("max").dim(),
                stats.max,
                style("avg").dim(),
                stats.average
            ))?;
        }
        self.term.write_line(&format!(
            "  {:<24} {:.2}",
            style("Overall").bold(),
            summary.overall_average
        ))?;
        match &summary.rank {
            Some(rank) => self
                .term
                .write_line(&format!("{} Rank: {}", style("✓").green(), style(rank).bold()))?,
            None => self
                .term
                .write_line(&format!("{} No rank reached", style("⚠").yellow()))?,
        }

        let issue = Confirm::with_theme(&self.theme)
            .with_prompt("Issue the certificate?")
            .default(true)
            .interact()?;
        Ok(if issue {
            InputEvent::Finalize
        } else {
            InputEvent::Interrupt
        })
    }
}
