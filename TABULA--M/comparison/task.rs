use serde::{Deserialize, Serialize};

/// Coarse category of work a question asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Programming related.
    Code,
    /// Analysis, explanation or comparison.
    Analysis,
    /// Creative writing or generation.
    Creative,
    /// Research and investigation.
    Research,
    /// Fixing or solving a problem.
    ProblemSolving,
    /// Anything else.
    General,
}

impl TaskType {
    /// Stable snake-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Analysis => "analysis",
            Self::Creative => "creative",
            Self::Research => "research",
            Self::ProblemSolving => "problem_solving",
            Self::General => "general",
        }
    }
}

// Checked in order; first hit wins.
const TASK_KEYWORDS: [(TaskType, &[&str]); 5] = [
    (
        TaskType::Code,
        &["code", "python", "javascript", "function", "algorithm"],
    ),
    (
        TaskType::Analysis,
        &["analyze", "analysis", "explain", "compare"],
    ),
    (
        TaskType::Creative,
        &["write", "story", "poem", "create", "generate"],
    ),
    (
        TaskType::Research,
        &["research", "study", "find", "investigate"],
    ),
    (
        TaskType::ProblemSolving,
        &["solve", "problem", "fix", "debug"],
    ),
];

/// Labels `question` by substring keywords.
#[must_use]
pub fn classify_task(question: &str) -> TaskType {
    let lower = question.to_lowercase();
    TASK_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|word| lower.contains(word)))
        .map_or(TaskType::General, |(task, _)| *task)
}
