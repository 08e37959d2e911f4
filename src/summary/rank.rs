//! Rank resolution against the skill-level table.

use crate::schema::SkillLevel;

/// Skill level earned by an average
///
/// Levels are scanned in list order and the last one whose threshold is
/// reached wins. The list is not sorted first, so an unsorted table resolves
/// by position.
pub fn resolve_rank(levels: &[SkillLevel], average: f64) -> Option<&SkillLevel> {
    levels.iter().rev().find(|level| average >= level.min_points)
}
