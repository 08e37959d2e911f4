//! Ceremony
//!
//! The top-level workflow: data entry, then one evaluation per reviewer, then
//! the summary, then done. Every transition is a pure function of the current
//! stage and one input event; whatever has to happen outside the state
//! machine (saving the certificate, telling the operator who is up next) is
//! returned as a list of [`Effect`]s for the caller to carry out.

mod runner;

pub use runner::{CeremonyRunner, RunOutcome};

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::certificate::{AssemblyInput, Certificate, CertificateAssembler};
use crate::error::{ConfigurationError, ValidationError};
use crate::evaluation::{discover_reviewers, reviewer_ordinal, EvaluationSequencer, SequencerOutcome};
use crate::evaluation::{Results, Reviewer};
use crate::form::{FormBuilder, FormOutcome, RuntimeForm, ValueStore};
use crate::input::{FieldPrompt, InputEvent, SummaryPrompt};
use crate::schema::Schema;
use crate::summary::{Aggregator, Summary};

/// Data-entry answer holding the applicant's name
pub const APPLICANT_NAME_KEY: &str = "data_entry_applicant_name";
/// Data-entry answer naming the certification object
pub const OBJECT_NAME_KEY: &str = "data_entry_object_description";
/// Data-entry answer classifying the object
pub const OBJECT_CLASS_KEY: &str = "data_entry_object_class";
/// Data-entry answer with the path of the object picture
pub const OBJECT_IMAGE_KEY: &str = "data_entry_object_image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    DataEntry,
    Evaluation,
    Summary,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::DataEntry => write!(f, "data entry"),
            Phase::Evaluation => write!(f, "evaluation"),
            Phase::Summary => write!(f, "summary"),
            Phase::Done => write!(f, "done"),
        }
    }
}

/// What the data-entry form captured
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub applicant: String,
    pub object_name: String,
    /// Picture picked by the applicant, if any
    pub image: Option<PathBuf>,
    /// Every data-entry answer
    pub answers: ValueStore,
}

impl Application {
    pub fn from_answers(answers: ValueStore) -> Self {
        let image = answers.get_string(OBJECT_IMAGE_KEY);
        let image = image.trim();
        Self {
            applicant: answers.get_string(APPLICANT_NAME_KEY).trim().to_string(),
            object_name: answers.get_string(OBJECT_NAME_KEY).trim().to_string(),
            image: (!image.is_empty()).then(|| PathBuf::from(image)),
            answers,
        }
    }
}

/// Work the caller performs after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    PhaseChanged(Phase),
    /// An answer was rejected; the same field is asked again
    Rejected(ValidationError),
    ReviewerStarted {
        ordinal: u32,
        name: String,
        position: usize,
        total: usize,
    },
    ReviewerCompleted {
        ordinal: u32,
        name: String,
    },
    SummaryReady(Summary),
    /// Store the certificate together with the applicant's picture
    PersistCertificate {
        certificate: Certificate,
        image: Option<PathBuf>,
    },
    /// The ceremony cannot continue as configured
    Aborted(ConfigurationError),
    /// The certificate could not be assembled; the summary stays open
    AssemblyFailed(ConfigurationError),
    Interrupted,
}

#[derive(Debug)]
enum Stage {
    DataEntry(RuntimeForm),
    Evaluation {
        application: Application,
        sequencer: EvaluationSequencer,
    },
    Summary {
        application: Application,
        reviewers: Vec<Reviewer>,
        results: Results,
        summary: Summary,
    },
    Done {
        application: Option<Application>,
        certificate: Option<Certificate>,
    },
}

impl Stage {
    fn phase(&self) -> Phase {
        match self {
            Stage::DataEntry(_) => Phase::DataEntry,
            Stage::Evaluation { .. } => Phase::Evaluation,
            Stage::Summary { .. } => Phase::Summary,
            Stage::Done { .. } => Phase::Done,
        }
    }

    fn done() -> Self {
        Stage::Done {
            application: None,
            certificate: None,
        }
    }
}

/// One certification ceremony
#[derive(Debug)]
pub struct Ceremony {
    schema: Schema,
    stage: Stage,
}

impl Ceremony {
    /// Start a ceremony at data entry
    pub fn new(schema: Schema) -> Result<Self, ConfigurationError> {
        schema.validate()?;
        let form = FormBuilder::new(&schema.data_collection).build()?;
        let mut ceremony = Self {
            schema,
            stage: Stage::DataEntry(form),
        };
        // A data-collection schema without fields is complete right away
        if matches!(&ceremony.stage, Stage::DataEntry(form) if form.is_completed()) {
            let stage = std::mem::replace(&mut ceremony.stage, Stage::done());
            if let Stage::DataEntry(form) = stage {
                let (next, effects) = enter_evaluation(&ceremony.schema, form);
                if let Some(err) = effects.into_iter().find_map(|effect| match effect {
                    Effect::Aborted(err) => Some(err),
                    _ => None,
                }) {
                    return Err(err);
                }
                ceremony.stage = next;
            }
        }
        Ok(ceremony)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn phase(&self) -> Phase {
        self.stage.phase()
    }

    pub fn is_done(&self) -> bool {
        self.phase() == Phase::Done
    }

    /// Data-entry answers, once data entry is over
    pub fn application(&self) -> Option<&Application> {
        match &self.stage {
            Stage::DataEntry(_) => None,
            Stage::Evaluation { application, .. } | Stage::Summary { application, .. } => {
                Some(application)
            }
            Stage::Done { application, .. } => application.as_ref(),
        }
    }

    /// Live evaluation results
    pub fn results(&self) -> Option<&Results> {
        match &self.stage {
            Stage::Evaluation { sequencer, .. } => Some(sequencer.results()),
            Stage::Summary { results, .. } => Some(results),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<&Summary> {
        match &self.stage {
            Stage::Summary { summary, .. } => Some(summary),
            _ => None,
        }
    }

    /// The issued certificate, once finalized
    pub fn certificate(&self) -> Option<&Certificate> {
        match &self.stage {
            Stage::Done { certificate, .. } => certificate.as_ref(),
            _ => None,
        }
    }

    /// Field awaiting input, with its status line
    pub fn field_prompt(&self) -> Option<FieldPrompt<'_>> {
        let (form, header) = match &self.stage {
            Stage::DataEntry(form) => (form, data_entry_header(form)),
            Stage::Evaluation { sequencer, .. } => {
                let form = sequencer.active_form()?;
                let reviewer = sequencer.active_reviewer()?;
                let (position, total) = sequencer.position();
                (form, format!("Review by {} - {}/{}", reviewer.name, position, total))
            }
            _ => return None,
        };

        let field = form.current_field()?;
        Some(FieldPrompt {
            header,
            group_title: form.current_group().map_or("", |g| g.title.as_str()),
            field,
            current: form.values().get(&field.key),
            error: form.last_error(),
            progress: form.progress(),
            width: form.width(),
        })
    }

    pub fn summary_prompt(&self) -> Option<SummaryPrompt<'_>> {
        match &self.stage {
            Stage::Summary {
                application,
                summary,
                ..
            } => Some(SummaryPrompt {
                applicant: &application.applicant,
                object_name: &application.object_name,
                summary,
            }),
            _ => None,
        }
    }

    /// Apply one input event
    pub fn handle(&mut self, event: InputEvent) -> Vec<Effect> {
        let stage = std::mem::replace(&mut self.stage, Stage::done());
        let before = stage.phase();
        let (next, effects) = transition(&self.schema, stage, event);
        if next.phase() != before {
            debug!(phase = %next.phase(), "ceremony phase");
        }
        self.stage = next;
        effects
    }
}

/// Status line while data entry runs: applicant, object and the panel so far
fn data_entry_header(form: &RuntimeForm) -> String {
    let applicant = form.get_string(APPLICANT_NAME_KEY);
    let object = form.get_string(OBJECT_NAME_KEY);
    let class = form.get_string(OBJECT_CLASS_KEY);

    let mut header = match (applicant.trim(), object.trim()) {
        ("", _) => "New certification request".to_string(),
        (applicant, "") => format!("Request by {applicant}"),
        (applicant, object) => format!("Request by {applicant}: {object}"),
    };
    if !class.trim().is_empty() {
        header.push_str(&format!(" ({})", class.trim()));
    }

    let mut panel: Vec<String> = form
        .values()
        .iter()
        .filter(|(key, _)| reviewer_ordinal(key).is_some())
        .filter_map(|(_, value)| value.as_str())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    if !panel.is_empty() {
        panel.sort();
        header.push_str(&format!(" | Panel: {}", panel.join(", ")));
    }
    header
}

fn transition(schema: &Schema, stage: Stage, event: InputEvent) -> (Stage, Vec<Effect>) {
    if event == InputEvent::Interrupt {
        info!(phase = %stage.phase(), "ceremony interrupted");
        let application = match stage {
            Stage::Evaluation { application, .. } | Stage::Summary { application, .. } => {
                Some(application)
            }
            Stage::Done { application, .. } => application,
            Stage::DataEntry(_) => None,
        };
        return (
            Stage::Done {
                application,
                certificate: None,
            },
            vec![Effect::Interrupted],
        );
    }

    match stage {
        Stage::DataEntry(mut form) => match form.handle(&event) {
            FormOutcome::Completed => enter_evaluation(schema, form),
            FormOutcome::Rejected(err) => (Stage::DataEntry(form), vec![Effect::Rejected(err)]),
            _ => (Stage::DataEntry(form), Vec::new()),
        },

        Stage::Evaluation {
            application,
            mut sequencer,
        } => match sequencer.handle(&event) {
            SequencerOutcome::ReviewerFinished { reviewer, next } => {
                let mut effects = vec![Effect::ReviewerCompleted {
                    ordinal: reviewer,
                    name: reviewer_name(&sequencer, reviewer),
                }];
                match next {
                    Some(_) => {
                        effects.extend(reviewer_started(&sequencer));
                        (
                            Stage::Evaluation {
                                application,
                                sequencer,
                            },
                            effects,
                        )
                    }
                    None => {
                        let (stage, more) = enter_summary(schema, application, sequencer);
                        effects.extend(more);
                        (stage, effects)
                    }
                }
            }
            SequencerOutcome::Form(FormOutcome::Rejected(err)) => (
                Stage::Evaluation {
                    application,
                    sequencer,
                },
                vec![Effect::Rejected(err)],
            ),
            _ => (
                Stage::Evaluation {
                    application,
                    sequencer,
                },
                Vec::new(),
            ),
        },

        Stage::Summary {
            application,
            reviewers,
            results,
            summary,
        } => {
            if event != InputEvent::Finalize {
                return (
                    Stage::Summary {
                        application,
                        reviewers,
                        results,
                        summary,
                    },
                    Vec::new(),
                );
            }

            let assembled = CertificateAssembler::new(&schema.evaluation).assemble(AssemblyInput {
                applicant: &application.applicant,
                object_name: &application.object_name,
                reviewers: &reviewers,
                results: &results,
            });
            match assembled {
                Ok(certificate) => {
                    info!(id = %certificate.id, "certificate issued");
                    let effects = vec![
                        Effect::PersistCertificate {
                            certificate: certificate.clone(),
                            image: application.image.clone(),
                        },
                        Effect::PhaseChanged(Phase::Done),
                    ];
                    (
                        Stage::Done {
                            application: Some(application),
                            certificate: Some(certificate),
                        },
                        effects,
                    )
                }
                Err(err) => {
                    warn!(error = %err, "certificate assembly failed");
                    (
                        Stage::Summary {
                            application,
                            reviewers,
                            results,
                            summary,
                        },
                        vec![Effect::AssemblyFailed(err)],
                    )
                }
            }
        }

        done @ Stage::Done { .. } => (done, Vec::new()),
    }
}

fn enter_evaluation(schema: &Schema, form: RuntimeForm) -> (Stage, Vec<Effect>) {
    let application = Application::from_answers(form.into_values());
    info!(applicant = %application.applicant, "data entry completed");

    let started = discover_reviewers(&schema.data_collection).and_then(|mut reviewers| {
        for reviewer in &mut reviewers {
            reviewer.resolve_name(&application.answers);
        }
        EvaluationSequencer::start(&schema.evaluation, reviewers)
    });

    let sequencer = match started {
        Ok(sequencer) => sequencer,
        Err(err) => {
            warn!(error = %err, "evaluation cannot start");
            return (
                Stage::Done {
                    application: Some(application),
                    certificate: None,
                },
                vec![Effect::Aborted(err)],
            );
        }
    };

    let mut effects = vec![Effect::PhaseChanged(Phase::Evaluation)];
    if sequencer.is_complete() {
        let (stage, more) = enter_summary(schema, application, sequencer);
        effects.extend(more);
        return (stage, effects);
    }
    effects.extend(reviewer_started(&sequencer));
    (
        Stage::Evaluation {
            application,
            sequencer,
        },
        effects,
    )
}

fn enter_summary(
    schema: &Schema,
    application: Application,
    sequencer: EvaluationSequencer,
) -> (Stage, Vec<Effect>) {
    let summary =
        Aggregator::new(&schema.evaluation, &schema.skill_levels).summarize_results(sequencer.results());
    let (reviewers, results) = sequencer.into_parts();
    let effects = vec![
        Effect::PhaseChanged(Phase::Summary),
        Effect::SummaryReady(summary.clone()),
    ];
    (
        Stage::Summary {
            application,
            reviewers,
            results,
            summary,
        },
        effects,
    )
}

fn reviewer_name(sequencer: &EvaluationSequencer, ordinal: u32) -> String {
    sequencer
        .reviewers()
        .iter()
        .find(|r| r.ordinal == ordinal)
        .map(|r| r.name.clone())
        .unwrap_or_default()
}

fn reviewer_started(sequencer: &EvaluationSequencer) -> Option<Effect> {
    let reviewer = sequencer.active_reviewer()?;
    let (position, total) = sequencer.position();
    Some(Effect::ReviewerStarted {
        ordinal: reviewer.ordinal,
        name: reviewer.name.clone(),
        position,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;
    use crate::schema::{FieldDescriptor, FieldType, GroupDescriptor, SkillLevel};

    fn small_schema(reviewers: &[&str]) -> Schema {
        let mut panel = GroupDescriptor::new("reviewer", "Panel");
        for key in reviewers {
            panel = panel.with_field(FieldDescriptor::new(FieldType::Input, *key, "Reviewer"));
        }
        Schema {
            data_collection: vec![
                GroupDescriptor::new("data_entry", "Request")
                    .with_field(
                        FieldDescriptor::new(FieldType::Input, "applicant_name", "Name").mandatory(),
                    )
                    .with_field(FieldDescriptor::new(
                        FieldType::Text,
                        "object_description",
                        "Object",
                    )),
                panel,
            ],
            evaluation: vec![GroupDescriptor::new("taste", "Taste")
                .with_field(FieldDescriptor::new(FieldType::Range, "rating", "Taste").mandatory())
                .with_field(FieldDescriptor::new(FieldType::Text, "comment", "Comment"))],
            skill_levels: vec![SkillLevel::new(0, "Junior", 0.0), SkillLevel::new(1, "Master", 4.0)],
        }
    }

    fn submit(ceremony: &mut Ceremony, value: &str) -> Vec<Effect> {
        ceremony.handle(InputEvent::Submit(FieldValue::text(value)))
    }

    #[test]
    fn test_full_walk() {
        let mut ceremony = Ceremony::new(small_schema(&["1", "2"])).unwrap();
        assert_eq!(ceremony.phase(), Phase::DataEntry);

        submit(&mut ceremony, "Ada");
        assert_eq!(ceremony.field_prompt().unwrap().header, "Request by Ada");
        submit(&mut ceremony, "Sachertorte");
        submit(&mut ceremony, "Grace");
        let effects = submit(&mut ceremony, "");
        assert_eq!(ceremony.phase(), Phase::Evaluation);
        assert_eq!(
            effects,
            vec![
                Effect::PhaseChanged(Phase::Evaluation),
                Effect::ReviewerStarted {
                    ordinal: 1,
                    name: "Grace".into(),
                    position: 1,
                    total: 2
                }
            ]
        );
        assert_eq!(
            ceremony.field_prompt().unwrap().header,
            "Review by Grace - 1/2"
        );

        submit(&mut ceremony, "5");
        submit(&mut ceremony, "great");
        assert_eq!(ceremony.field_prompt().unwrap().header, "Review by reviewer_2 - 2/2");
        submit(&mut ceremony, "3");
        let effects = submit(&mut ceremony, "");
        assert_eq!(ceremony.phase(), Phase::Summary);
        assert!(matches!(effects.last(), Some(Effect::SummaryReady(_))));

        let summary = ceremony.summary().unwrap();
        assert_eq!(summary.overall_average, 4.0);
        assert_eq!(summary.rank.as_deref(), Some("Master"));

        let effects = ceremony.handle(InputEvent::Finalize);
        assert_eq!(ceremony.phase(), Phase::Done);
        let Some(Effect::PersistCertificate { certificate, image }) = effects.first() else {
            panic!("expected a persist effect, got {effects:?}");
        };
        assert_eq!(image, &None);
        assert_eq!(certificate.applicant, "Ada");
        assert_eq!(certificate.object_name, "Sachertorte");
        assert_eq!(certificate.reviewers, vec!["Grace", "reviewer_2"]);
        assert_eq!(ceremony.certificate(), Some(certificate));
    }

    #[test]
    fn test_summary_waits_for_finalize() {
        let mut ceremony = Ceremony::new(small_schema(&["1"])).unwrap();
        for value in ["Ada", "Cake", "", "4", ""] {
            submit(&mut ceremony, value);
        }
        assert_eq!(ceremony.phase(), Phase::Summary);
        assert!(submit(&mut ceremony, "anything").is_empty());
        assert!(ceremony.handle(InputEvent::Back).is_empty());
        assert_eq!(ceremony.phase(), Phase::Summary);
    }

    #[test]
    fn test_rejection_is_reported() {
        let mut ceremony = Ceremony::new(small_schema(&["1"])).unwrap();
        let effects = submit(&mut ceremony, "  ");
        assert!(matches!(
            effects.as_slice(),
            [Effect::Rejected(ValidationError::Required { .. })]
        ));
        assert_eq!(ceremony.phase(), Phase::DataEntry);
        assert!(ceremony.field_prompt().unwrap().error.is_some());
    }

    #[test]
    fn test_no_reviewers_aborts() {
        let mut ceremony = Ceremony::new(small_schema(&[])).unwrap();
        submit(&mut ceremony, "Ada");
        let effects = submit(&mut ceremony, "Cake");
        assert_eq!(effects, vec![Effect::Aborted(ConfigurationError::NoReviewers)]);
        assert!(ceremony.is_done());
        assert_eq!(ceremony.application().unwrap().applicant, "Ada");
    }

    #[test]
    fn test_empty_data_collection_is_configuration_error() {
        let schema = Schema {
            data_collection: vec![],
            ..small_schema(&[])
        };
        assert_eq!(
            Ceremony::new(schema).unwrap_err(),
            ConfigurationError::NoReviewers
        );
    }

    #[test]
    fn test_interrupt_from_any_phase() {
        let mut ceremony = Ceremony::new(small_schema(&["1"])).unwrap();
        submit(&mut ceremony, "Ada");
        submit(&mut ceremony, "Cake");
        submit(&mut ceremony, "");
        assert_eq!(ceremony.phase(), Phase::Evaluation);

        assert_eq!(ceremony.handle(InputEvent::Interrupt), vec![Effect::Interrupted]);
        assert!(ceremony.is_done());
        assert!(ceremony.certificate().is_none());
        assert!(ceremony.handle(InputEvent::Finalize).is_empty());
    }

    #[test]
    fn test_broken_evaluation_group_keeps_summary() {
        let mut schema = small_schema(&["1"]);
        schema.evaluation[0].fields.pop();
        let mut ceremony = Ceremony::new(schema).unwrap();
        for value in ["Ada", "Cake", "", "4"] {
            submit(&mut ceremony, value);
        }
        assert_eq!(ceremony.phase(), Phase::Summary);

        let effects = ceremony.handle(InputEvent::Finalize);
        assert!(matches!(
            effects.as_slice(),
            [Effect::AssemblyFailed(ConfigurationError::RatingCommentPair { .. })]
        ));
        assert_eq!(ceremony.phase(), Phase::Summary);
    }

    #[test]
    fn test_data_entry_header_lists_panel() {
        let mut ceremony = Ceremony::new(small_schema(&["1", "2"])).unwrap();
        assert_eq!(ceremony.field_prompt().unwrap().header, "New certification request");
        submit(&mut ceremony, "Ada");
        submit(&mut ceremony, "Sachertorte");
        submit(&mut ceremony, "Linus");
        assert_eq!(
            ceremony.field_prompt().unwrap().header,
            "Request by Ada: Sachertorte | Panel: Linus"
        );
        ceremony.handle(InputEvent::Back);
        submit(&mut ceremony, "Grace");
        assert_eq!(
            ceremony.field_prompt().unwrap().header,
            "Request by Ada: Sachertorte | Panel: Grace"
        );
    }

    #[test]
    fn test_application_from_answers() {
        let mut answers = ValueStore::new();
        answers.bind(APPLICANT_NAME_KEY, FieldValue::text(" Ada "));
        answers.bind(OBJECT_NAME_KEY, FieldValue::text("Tart"));
        answers.bind(OBJECT_IMAGE_KEY, FieldValue::text("/tmp/tart.png"));
        let application = Application::from_answers(answers);
        assert_eq!(application.applicant, "Ada");
        assert_eq!(application.object_name, "Tart");
        assert_eq!(application.image, Some(PathBuf::from("/tmp/tart.png")));
    }
}
