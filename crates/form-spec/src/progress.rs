use serde::Serialize;

use crate::error::SpecError;
use crate::template::TemplateEngine;

/// Share of the form reached on `current`, from 0 to 100.
pub fn percentage(current: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    current as f64 / total as f64 * 100.0
}

/// Progress indicator state for a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub percentage: f64,
    pub text: String,
}

impl Progress {
    pub fn new(
        templates: &TemplateEngine,
        current: usize,
        total: usize,
    ) -> Result<Self, SpecError> {
        Ok(Self {
            current,
            total,
            percentage: percentage(current, total),
            text: templates.progress_text(current, total)?,
        })
    }
}

/// Visibility and enabled state of the navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub previous_disabled: bool,
    pub next_hidden: bool,
    pub submit_visible: bool,
}

pub fn navigation(current: usize, total: usize) -> NavigationState {
    let last = current == total;
    NavigationState {
        previous_disabled: current == 1,
        next_hidden: last,
        submit_visible: last,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_tracks_page_share() {
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(4, 4), 100.0);
        assert!((percentage(3, 7) - 42.857).abs() < 0.001);
    }

    #[test]
    fn first_page_disables_previous() {
        let nav = navigation(1, 4);
        assert!(nav.previous_disabled);
        assert!(!nav.next_hidden);
        assert!(!nav.submit_visible);
    }

    #[test]
    fn last_page_hides_next() {
        let nav = navigation(7, 7);
        assert!(!nav.previous_disabled);
        assert!(nav.next_hidden);
        assert!(nav.submit_visible);
    }

    #[test]
    fn single_page_form_has_both_edges() {
        let nav = navigation(1, 1);
        assert!(nav.previous_disabled);
        assert!(nav.next_hidden);
    }
}
