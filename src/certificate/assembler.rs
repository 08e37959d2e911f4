//! Certificate assembly from finished evaluation results.

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::error::ConfigurationError;
use crate::evaluation::{Results, Reviewer};
use crate::schema::GroupDescriptor;
use crate::summary::parse_rating;

use super::{Certificate, CertificateQuestion, CertificateResponse};

/// Everything a certificate is built from
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub applicant: &'a str,
    pub object_name: &'a str,
    pub reviewers: &'a [Reviewer],
    pub results: &'a Results,
}

#[derive(Debug, Clone, Copy)]
pub struct CertificateAssembler<'a> {
    evaluation: &'a [GroupDescriptor],
}

impl<'a> CertificateAssembler<'a> {
    pub fn new(evaluation: &'a [GroupDescriptor]) -> Self {
        Self { evaluation }
    }

    /// Assemble with a fresh id and the current time
    pub fn assemble(&self, input: AssemblyInput<'_>) -> Result<Certificate, ConfigurationError> {
        self.assemble_with(input, Uuid::new_v4(), Local::now())
    }

    /// Assemble with a given id and date
    ///
    /// Responses follow group order, then reviewer ordinal. Every group must
    /// carry exactly one rating and one comment field.
    pub fn assemble_with(
        &self,
        input: AssemblyInput<'_>,
        id: Uuid,
        date: DateTime<Local>,
    ) -> Result<Certificate, ConfigurationError> {
        if input.reviewers.is_empty() {
            return Err(ConfigurationError::NoReviewers);
        }
        let mut reviewers: Vec<&Reviewer> = input.reviewers.iter().collect();
        reviewers.sort_by_key(|r| r.ordinal);

        let mut questions = Vec::with_capacity(self.evaluation.len());
        for group in self.evaluation {
            let (rating, comment) = group.rating_and_comment()?;
            let rating_key = group.field_key(rating);
            let comment_key = group.field_key(comment);

            let responses = reviewers
                .iter()
                .map(|reviewer| {
                    CertificateResponse::new(
                        reviewer.name.clone(),
                        parse_rating(&input.results.get_string(&rating_key, reviewer.ordinal)),
                        input.results.get_string(&comment_key, reviewer.ordinal),
                    )
                })
                .collect();

            questions.push(CertificateQuestion {
                question: group.title.clone(),
                responses,
            });
        }

        Ok(Certificate {
            id,
            date,
            applicant: input.applicant.to_string(),
            object_name: input.object_name.to_string(),
            reviewers: reviewers.iter().map(|r| r.name.clone()).collect(),
            questions,
        })
    }
}
