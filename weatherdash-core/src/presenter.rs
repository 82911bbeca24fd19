use std::fmt::Debug;

use crate::alert::AlertDecision;

/// Where alerts and suggestions end up. Rendering belongs to the front end.
pub trait Presenter: Send + Sync + Debug {
    fn present_alert(&self, alert: &AlertDecision);

    /// Show `suggestions` and return the one the user picked, if any.
    fn present_suggestions(&self, suggestions: &[String]) -> Option<String>;
}

/// Presenter that shows nothing and never picks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPresenter;

impl Presenter for SilentPresenter {
    fn present_alert(&self, _alert: &AlertDecision) {}

    fn present_suggestions(&self, _suggestions: &[String]) -> Option<String> {
        None
    }
}
