//! Deterministic, filesystem-safe base names for rendered pages.

use itertools::Itertools;

use crate::timetable::TimetablePage;

const FALLBACK_NAME: &str = "timetable";

/// Hyphen-joined sanitized components: route, agency, cohort when present,
/// and a page suffix when the cohort spans several pages.
pub fn page_basename(page: &TimetablePage) -> String {
    let mut components = vec![
        sanitize(page.route.display_name()),
        sanitize(&page.agency_name),
    ];
    if let Some(cohort) = &page.cohort {
        components.push(sanitize(cohort));
    }
    if page.page_count > 1 {
        components.push(format!("page-{}", page.page_number));
    }
    let name = components
        .into_iter()
        .filter(|component| !component.is_empty())
        .join("-");
    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}

/// Drops anything unsafe in a file name, collapses whitespace runs to single
/// underscores and trims underscores at the edges.
fn sanitize(component: &str) -> String {
    let kept: String = component
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '_' | '.'))
        .collect();
    kept.split_whitespace()
        .join("_")
        .trim_matches('_')
        .to_string()
}
