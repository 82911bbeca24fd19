use inquire::{
    CustomUserError,
    autocompletion::{Autocomplete, Replacement},
};
use weatherdash_core::{HistoryEntry, SuggestionIndex};

/// Per-keystroke city suggestions for the interactive prompt.
///
/// Holds a snapshot of the history taken when the prompt opens.
#[derive(Debug, Clone)]
pub struct CityCompleter {
    index: SuggestionIndex,
    history: Vec<HistoryEntry>,
}

impl CityCompleter {
    pub fn new(index: SuggestionIndex, history: &[HistoryEntry]) -> Self {
        Self { index, history: history.to_vec() }
    }
}

impl Autocomplete for CityCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self.index.suggest(input, &self.history))
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        let completion = highlighted_suggestion
            .or_else(|| self.index.suggest(input, &self.history).into_iter().next());
        Ok(completion)
    }
}
