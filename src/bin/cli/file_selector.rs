//! File selection using glob patterns.

use glob::{MatchOptions, Pattern};

/// Error type for file selector operations
#[derive(Debug)]
pub struct PatternError(pub String);

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid glob pattern: {}", self.0)
    }
}

impl std::error::Error for PatternError {}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Decides which collected files go into the archive.
///
/// Patterns are matched against both the archive path and the bare file
/// name, so `*.log` skips logs at any depth while `cache/*` only skips that
/// folder.
pub struct FileSelector {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl FileSelector {
    /// Creates a new file selector from pattern strings
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, PatternError> {
        let compile = |patterns: &[String]| {
            patterns
                .iter()
                .map(|p| Pattern::new(p).map_err(|e| PatternError(format!("{}: {}", p, e))))
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Checks if an archive path passes the include and exclude patterns
    pub fn matches(&self, archive_path: &str) -> bool {
        let file_name = archive_path.rsplit('/').next().unwrap_or(archive_path);
        let hit = |p: &Pattern| {
            p.matches_with(archive_path, MATCH_OPTIONS) || p.matches_with(file_name, MATCH_OPTIONS)
        };

        if !self.include.is_empty() && !self.include.iter().any(hit) {
            return false;
        }
        !self.exclude.iter().any(hit)
    }
}
