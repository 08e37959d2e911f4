//! Certificate rendering
//!
//! Markdown output through handlebars. The built-in template can be replaced
//! by a user template file.

use std::path::Path;

use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::schema::SkillLevel;
use crate::summary::{summarize_certificate, GroupStatistics};

use super::Certificate;

const TEMPLATE_NAME: &str = "certificate";
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/certificate.md.hbs");

/// The built-in certificate template
pub fn default_template() -> &'static str {
    DEFAULT_TEMPLATE
}

/// Turns a certificate into a printable document
pub trait CertificateRenderer {
    fn render(
        &self,
        certificate: &Certificate,
        skill_levels: &[SkillLevel],
        image_file: Option<&str>,
    ) -> Result<String>;
}

handlebars_helper!(stars: |n: i64| "⭐".repeat(n.clamp(0, 5) as usize));
handlebars_helper!(initials: |name: str| initials_of(name));
handlebars_helper!(fixed: |x: f64| format!("{x:.2}"));

fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[derive(Serialize)]
struct GroupRow<'a> {
    title: &'a str,
    #[serde(flatten)]
    stats: GroupStatistics,
}

#[derive(Serialize)]
struct RenderData<'a> {
    #[serde(flatten)]
    certificate: &'a Certificate,
    date_display: String,
    summaries: Vec<GroupRow<'a>>,
    overall_average: f64,
    rank: Option<String>,
    image_file: Option<&'a str>,
}

pub struct MarkdownRenderer {
    registry: Handlebars<'static>,
}

impl MarkdownRenderer {
    /// Renderer with the built-in template
    pub fn new() -> Result<Self> {
        Self::with_template(DEFAULT_TEMPLATE)
    }

    pub fn with_template(template: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.register_helper("stars", Box::new(stars));
        registry.register_helper("initials", Box::new(initials));
        registry.register_helper("fixed", Box::new(fixed));
        registry.register_template_string(TEMPLATE_NAME, template)?;
        Ok(Self { registry })
    }

    /// The template at `path` if present, else the built-in one
    pub fn from_override(path: &Path) -> Result<Self> {
        if path.is_file() {
            debug!(path = %path.display(), "using custom certificate template");
            let template = std::fs::read_to_string(path)?;
            return Self::with_template(&template);
        }
        Self::new()
    }
}

impl CertificateRenderer for MarkdownRenderer {
    fn render(
        &self,
        certificate: &Certificate,
        skill_levels: &[SkillLevel],
        image_file: Option<&str>,
    ) -> Result<String> {
        let summary = summarize_certificate(certificate, skill_levels);
        let data = RenderData {
            certificate,
            date_display: certificate.date.format("%d.%m.%Y").to_string(),
            summaries: summary
                .groups
                .iter()
                .map(|g| GroupRow {
                    title: &g.title,
                    stats: g.stats,
                })
                .collect(),
            overall_average: summary.overall_average,
            rank: summary.rank.clone(),
            image_file,
        };
        Ok(self.registry.render(TEMPLATE_NAME, &data)?)
    }
}
