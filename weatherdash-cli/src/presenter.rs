use inquire::Select;
use tracing::warn;
use weatherdash_core::{AlertDecision, Presenter};

/// Prints alerts to stdout and offers suggestions as a selection prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn present_alert(&self, alert: &AlertDecision) {
        println!("{} Weather Alert: {}", alert.icon, alert.message);
    }

    fn present_suggestions(&self, suggestions: &[String]) -> Option<String> {
        match Select::new("Did you mean:", suggestions.to_vec()).prompt_skippable() {
            Ok(picked) => picked,
            Err(err) => {
                warn!(error = %err, "suggestion prompt failed");
                None
            }
        }
    }
}
