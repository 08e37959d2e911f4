//! Drives a ceremony with an input source and carries out its effects.

use std::path::PathBuf;

use console::style;
use tracing::{debug, error, info};

use crate::certificate::{resolve_companion_image, Certificate, CertificateStore};
use crate::error::{CeremonyError, Result};
use crate::input::{InputEvent, InputSource};

use super::{Ceremony, Effect};

/// How a run ended
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub certificate: Option<Certificate>,
    /// Where the certificate was stored
    pub location: Option<PathBuf>,
    /// Why storing the certificate failed; the run itself still succeeded
    pub persist_error: Option<String>,
    pub interrupted: bool,
}

pub struct CeremonyRunner<'a, I, S> {
    ceremony: Ceremony,
    input: I,
    store: &'a S,
    fallback_image: PathBuf,
    quiet: bool,
}

impl<'a, I, S> CeremonyRunner<'a, I, S>
where
    I: InputSource,
    S: CertificateStore,
{
    pub fn new(ceremony: Ceremony, input: I, store: &'a S, fallback_image: PathBuf) -> Self {
        Self {
            ceremony,
            input,
            store,
            fallback_image,
            quiet: false,
        }
    }

    /// Suppress progress output on stdout
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn ceremony(&self) -> &Ceremony {
        &self.ceremony
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Feed events until the ceremony is done
    ///
    /// A configuration problem ends the run with an error. A failed save is
    /// reported in the outcome.
    pub fn run(&mut self) -> Result<RunOutcome> {
        let mut outcome = RunOutcome::default();

        while !self.ceremony.is_done() {
            let event = if let Some(prompt) = self.ceremony.field_prompt() {
                self.input.field_event(&prompt)?
            } else if let Some(prompt) = self.ceremony.summary_prompt() {
                self.input.summary_event(&prompt)?
            } else {
                InputEvent::Interrupt
            };

            for effect in self.ceremony.handle(event) {
                self.perform(effect, &mut outcome)?;
            }
        }

        Ok(outcome)
    }

    fn perform(&mut self, effect: Effect, outcome: &mut RunOutcome) -> Result<()> {
        match effect {
            Effect::PhaseChanged(phase) => debug!(%phase, "phase changed"),
            Effect::Rejected(err) => debug!(error = %err, "answer rejected"),
            Effect::ReviewerStarted {
                name,
                position,
                total,
                ..
            } => {
                self.say(format!(
                    "{} Review by {} ({}/{})",
                    style("→").cyan(),
                    style(&name).bold(),
                    position,
                    total
                ));
            }
            Effect::ReviewerCompleted { name, .. } => {
                self.say(format!("{} {} done", style("✓").green(), name));
            }
            Effect::SummaryReady(summary) => {
                debug!(overall = summary.overall_average, rank = ?summary.rank, "summary ready");
            }
            Effect::PersistCertificate { certificate, image } => {
                let image = resolve_companion_image(image.as_deref(), &self.fallback_image);
                match self.store.persist(&certificate, image.as_deref()) {
                    Ok(path) => {
                        self.say(format!(
                            "{} Certificate saved to {}",
                            style("✓").green(),
                            path.display()
                        ));
                        outcome.location = Some(path);
                    }
                    Err(err) => {
                        error!(error = %err, id = %certificate.id, "certificate not saved");
                        self.say(format!("{} Certificate not saved: {}", style("✗").red(), err));
                        outcome.persist_error = Some(err.to_string());
                    }
                }
                outcome.certificate = Some(certificate);
            }
            Effect::AssemblyFailed(err) | Effect::Aborted(err) => {
                return Err(CeremonyError::Configuration(err));
            }
            Effect::Interrupted => {
                info!("ceremony ended without certificate");
                outcome.interrupted = true;
            }
        }
        Ok(())
    }

    fn say(&self, line: String) {
        if !self.quiet {
            println!("{line}");
        }
    }
}
