use log::LevelFilter;

/// Settings of a single type checking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Most verbose level the checker's own notes are emitted at.
    pub log_level: LevelFilter,
    /// Largest edit distance for "did you mean" suggestions.
    pub max_suggestion_distance: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            log_level: LevelFilter::Warn,
            max_suggestion_distance: 2,
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_max_suggestion_distance(mut self, distance: usize) -> Self {
        self.max_suggestion_distance = distance;
        self
    }
}
