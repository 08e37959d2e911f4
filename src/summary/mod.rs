//! Summary
//!
//! Per-group statistics over reviewer ratings, the overall average and the
//! rank it earns. Works both on live evaluation results and on a loaded
//! certificate.

mod rank;

pub use rank::resolve_rank;

use serde::Serialize;

use crate::certificate::Certificate;
use crate::evaluation::Results;
use crate::schema::{GroupDescriptor, SkillLevel, RATING_SUFFIX};

/// Numeric value of a rating answer; anything unparsable counts as 0
pub fn parse_rating(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GroupStatistics {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub average: f64,
}

impl GroupStatistics {
    /// Statistics over weighted ratings, averaged over `reviewers`
    ///
    /// With no ratings min and max are 0; with no reviewers the average is 0.
    pub fn from_ratings(ratings: &[f64], reviewers: usize) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }
        let min = ratings.iter().copied().fold(f64::INFINITY, f64::min);
        let max = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let sum: f64 = ratings.iter().sum();
        let average = if reviewers == 0 {
            0.0
        } else {
            sum / reviewers as f64
        };
        Self {
            min,
            max,
            sum,
            average,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub title: String,
    #[serde(flatten)]
    pub stats: GroupStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub groups: Vec<GroupSummary>,
    /// Mean of the group averages
    pub overall_average: f64,
    /// Name of the skill level reached, if any
    pub rank: Option<String>,
}

impl Summary {
    fn from_groups(groups: Vec<GroupSummary>, skill_levels: &[SkillLevel]) -> Self {
        let overall_average = if groups.is_empty() {
            0.0
        } else {
            groups.iter().map(|g| g.stats.average).sum::<f64>() / groups.len() as f64
        };
        let rank = resolve_rank(skill_levels, overall_average).map(|level| level.name.clone());
        Self {
            groups,
            overall_average,
            rank,
        }
    }
}

/// Summarizes evaluation groups against a skill-level table
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    evaluation: &'a [GroupDescriptor],
    skill_levels: &'a [SkillLevel],
}

impl<'a> Aggregator<'a> {
    pub fn new(evaluation: &'a [GroupDescriptor], skill_levels: &'a [SkillLevel]) -> Self {
        Self {
            evaluation,
            skill_levels,
        }
    }

    /// Weighted statistics for every group from live results
    ///
    /// Every `*_rating` field of a group contributes, scaled by its weight.
    pub fn summarize_results(&self, results: &Results) -> Summary {
        let reviewers: Vec<u32> = results.reviewers().collect();

        let groups = self
            .evaluation
            .iter()
            .map(|group| {
                let mut ratings = Vec::new();
                for field in &group.fields {
                    let key = group.field_key(field);
                    if !key.ends_with(RATING_SUFFIX) {
                        continue;
                    }
                    let weight = field.effective_weight();
                    for &reviewer in &reviewers {
                        let value = parse_rating(&results.get_string(&key, reviewer));
                        ratings.push(value as f64 * weight);
                    }
                }
                GroupSummary {
                    title: group.title.clone(),
                    stats: GroupStatistics::from_ratings(&ratings, reviewers.len()),
                }
            })
            .collect();

        Summary::from_groups(groups, self.skill_levels)
    }

    /// Unweighted statistics recomputed from a stored certificate
    pub fn summarize_certificate(&self, certificate: &Certificate) -> Summary {
        summarize_certificate(certificate, self.skill_levels)
    }
}

/// Statistics for a loaded certificate; responses are stored unweighted
pub fn summarize_certificate(certificate: &Certificate, skill_levels: &[SkillLevel]) -> Summary {
    let reviewers = certificate.reviewers.len();
    let groups = certificate
        .questions
        .iter()
        .map(|question| {
            let ratings: Vec<f64> = question.responses.iter().map(|r| r.value as f64).collect();
            GroupSummary {
                title: question.question.clone(),
                stats: GroupStatistics::from_ratings(&ratings, reviewers),
            }
        })
        .collect();

    Summary::from_groups(groups, skill_levels)
}
