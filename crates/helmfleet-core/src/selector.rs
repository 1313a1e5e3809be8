//! Rollout selection rules
//!
//! A rollout applies to a deployment only when both the tag rule and the
//! category rule hold. Tag matching is a subset check: the deployment may
//! carry tags the filter never mentions.

use crate::record::DeploymentSpec;

/// Every tag in `filter` must be present in `tags`. An empty filter
/// matches everything.
pub fn matches_tags(tags: &[String], filter: &[String]) -> bool {
    filter.iter().all(|f| tags.iter().any(|t| t == f))
}

/// Exact category match; an empty filter matches everything.
pub fn matches_category(category: &str, filter: &str) -> bool {
    filter.is_empty() || category == filter
}

/// Both rules must hold for the deployment to be selected.
pub fn matches(spec: &DeploymentSpec, tag_filter: &[String], category_filter: &str) -> bool {
    matches_tags(&spec.tags, tag_filter) && matches_category(&spec.category, category_filter)
}
