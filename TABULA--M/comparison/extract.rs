use std::sync::OnceLock;

use indexmap::IndexSet;
use regex::Regex;

use crate::{
    render::{render_comparison_table, render_pros_cons_table},
    table::{ComparisonTable, ProsConsTable, Theme},
};

/// Structured data lifted out of an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedTable {
    /// Item-by-attribute matrix.
    Comparison(ComparisonTable),
    /// Two-item pros/cons lists.
    ProsCons(ProsConsTable),
}

impl ExtractedTable {
    /// Renders whichever table variant this is.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Comparison(table) => render_comparison_table(table),
            Self::ProsCons(table) => render_pros_cons_table(table),
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Comparison(_) => "comparison",
            Self::ProsCons(_) => "pros_cons",
        }
    }
}

/// Turns free-form answer text into table data.
///
/// Implementations return `None` when the answer carries nothing they can
/// structure; callers then keep the plain answer.
pub trait ComparisonExtractor: Send + Sync {
    /// Attempts extraction for one question/answer pair.
    fn extract(&self, question: &str, answer: &str) -> Option<ExtractedTable>;

    /// Name used in telemetry.
    fn name(&self) -> &'static str;
}

/// Extractor that never produces a table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExtractor;

impl ComparisonExtractor for NullExtractor {
    fn extract(&self, _question: &str, _answer: &str) -> Option<ExtractedTable> {
        None
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// Lifts the first GitHub-style pipe table out of a markdown answer.
///
/// The header's first cell labels the attribute column; the remaining header
/// cells are the compared items. Each body row is one attribute, and a repeated
/// attribute row is dropped in favour of the first. Prose outside the table is
/// ignored.
///
/// Two-item tables whose rows (or columns) are labelled pros and cons become a
/// [`ProsConsTable`]. When the question asks for pros and cons, any two-item
/// table with exactly two rows is read that way, first row as pros.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownTableExtractor {
    theme: Theme,
}

impl MarkdownTableExtractor {
    /// Creates an extractor producing tables in `theme`.
    #[must_use]
    pub const fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn comparison(&self, table: &PipeTable) -> Option<ComparisonTable> {
        let items = table.items();
        let mut builder = ComparisonTable::builder(items.join(" vs "))
            .items(items.iter().cloned())
            .theme(self.theme);
        let mut seen = IndexSet::new();
        for (attribute, values) in table.labelled_rows() {
            if !seen.insert(attribute) {
                continue;
            }
            builder = builder.attribute(attribute);
            for (item, value) in items.iter().zip(values) {
                if !value.is_empty() {
                    builder = builder.value(item.clone(), attribute, value.clone());
                }
            }
        }
        builder.build().ok()
    }

    fn pros_cons(&self, table: &PipeTable, asked: bool) -> Option<ProsConsTable> {
        let items = table.items();
        if items.len() != 2 {
            return None;
        }
        let rows: Vec<(&str, &[String])> = table.labelled_rows().collect();

        let mut lists: [Vec<String>; 4] = Default::default();
        if !rows.is_empty() && rows.iter().all(|(label, _)| side_of(label).is_some()) {
            // Items across the top, one row per side.
            for (label, values) in &rows {
                let offset = side_of(label)?.offset();
                for (column, value) in values.iter().take(2).enumerate() {
                    lists[column * 2 + offset].extend(split_entries(value));
                }
            }
            return Some(self.pros_cons_table(&items[0], &items[1], lists));
        }

        let header_sides: Option<Vec<Side>> = items.iter().map(|item| side_of(item)).collect();
        if let Some(sides) = header_sides {
            // Sides across the top, one row per item.
            if rows.len() != 2 || sides[0] == sides[1] {
                return None;
            }
            for (row, (_, values)) in rows.iter().enumerate() {
                for (side, value) in sides.iter().zip(values.iter()) {
                    lists[row * 2 + side.offset()].extend(split_entries(value));
                }
            }
            return Some(self.pros_cons_table(rows[0].0, rows[1].0, lists));
        }

        if asked && rows.len() == 2 {
            for (side, (_, values)) in rows.iter().enumerate() {
                for (column, value) in values.iter().take(2).enumerate() {
                    lists[column * 2 + side].extend(split_entries(value));
                }
            }
            return Some(self.pros_cons_table(&items[0], &items[1], lists));
        }
        None
    }

    fn pros_cons_table(&self, item_a: &str, item_b: &str, lists: [Vec<String>; 4]) -> ProsConsTable {
        let [pros_a, cons_a, pros_b, cons_b] = lists;
        ProsConsTable::new(item_a, item_b)
            .side_a(pros_a, cons_a)
            .side_b(pros_b, cons_b)
            .with_theme(self.theme)
    }
}

impl ComparisonExtractor for MarkdownTableExtractor {
    fn extract(&self, question: &str, answer: &str) -> Option<ExtractedTable> {
        let table = PipeTable::find(answer)?;
        let lower = question.to_lowercase();
        let asked = PROS_CONS_CUES.iter().any(|cue| lower.contains(cue));
        if let Some(pros_cons) = self.pros_cons(&table, asked) {
            if pros_cons.row_count() > 0 {
                return Some(ExtractedTable::ProsCons(pros_cons));
            }
        }
        self.comparison(&table).map(ExtractedTable::Comparison)
    }

    fn name(&self) -> &'static str {
        "markdown_table"
    }
}

const PROS_CONS_CUES: [&str; 2] = ["pros and cons", "advantages and disadvantages"];

const PROS_LABELS: [&str; 6] = ["pros", "pro", "advantages", "advantage", "benefits", "strengths"];

const CONS_LABELS: [&str; 6] = ["cons", "con", "disadvantages", "disadvantage", "drawbacks", "weaknesses"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Pros,
    Cons,
}

impl Side {
    const fn offset(self) -> usize {
        match self {
            Self::Pros => 0,
            Self::Cons => 1,
        }
    }
}

// Labels may carry decoration such as `✅ Pros:`.
fn side_of(label: &str) -> Option<Side> {
    let label = label
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    if PROS_LABELS.contains(&label.as_str()) {
        Some(Side::Pros)
    } else if CONS_LABELS.contains(&label.as_str()) {
        Some(Side::Cons)
    } else {
        None
    }
}

/// Header and body cells of one pipe table, emphasis already stripped.
#[derive(Debug)]
struct PipeTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl PipeTable {
    /// First table with at least two columns and one body row.
    fn find(answer: &str) -> Option<Self> {
        let lines: Vec<&str> = answer.lines().collect();
        let start = lines
            .windows(2)
            .position(|pair| is_pipe_row(pair[0]) && is_delimiter_row(pair[1]))?;
        let header = split_row(lines[start]);
        if header.len() < 2 {
            return None;
        }
        let rows: Vec<Vec<String>> = lines[start + 2..]
            .iter()
            .take_while(|l| is_pipe_row(l))
            .map(|l| split_row(l))
            .filter(|cells| cells.first().is_some_and(|label| !label.is_empty()))
            .collect();
        if rows.is_empty() {
            return None;
        }
        Some(Self { header, rows })
    }

    fn items(&self) -> &[String] {
        &self.header[1..]
    }

    fn labelled_rows(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rows
            .iter()
            .filter_map(|cells| cells.split_first())
            .map(|(label, values)| (label.as_str(), values))
    }
}

fn is_pipe_row(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.contains('|')
}

fn is_delimiter_row(line: &str) -> bool {
    static DELIMITER: OnceLock<Regex> = OnceLock::new();
    let delimiter =
        DELIMITER.get_or_init(|| Regex::new(r"^:?-+:?$").expect("delimiter pattern is valid"));
    if !is_pipe_row(line) {
        return false;
    }
    let cells = raw_cells(line);
    !cells.is_empty() && cells.iter().all(|cell| delimiter.is_match(cell))
}

fn raw_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(|cell| cell.trim().to_string()).collect()
}

// Cells lose surrounding emphasis markers such as `**Speed**` or `_fast_`.
fn split_row(line: &str) -> Vec<String> {
    static EMPHASIS: OnceLock<Regex> = OnceLock::new();
    let emphasis = EMPHASIS.get_or_init(|| {
        Regex::new(r"^(?:\*\*(.+)\*\*|__(.+)__|\*(.+)\*|_(.+)_|`(.+)`)$")
            .expect("emphasis pattern is valid")
    });
    raw_cells(line)
        .into_iter()
        .map(|cell| {
            emphasis
                .captures(&cell)
                .and_then(|caps| caps.iter().skip(1).flatten().next())
                .map_or_else(|| cell.clone(), |inner| inner.as_str().trim().to_string())
        })
        .collect()
}

// One list entry per `<br>` or `;`, without leading bullets.
fn split_entries(cell: &str) -> Vec<String> {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    let separator = SEPARATOR
        .get_or_init(|| Regex::new(r"(?i)<br\s*/?>|;").expect("separator pattern is valid"));
    separator
        .split(cell)
        .map(|entry| entry.trim().trim_start_matches(&['-', '•'][..]).trim())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safe_text::SafeText;

    const ANSWER: &str = "Here is a quick overview.

| Feature | Python | JavaScript |
|---------|:------:|-----------:|
| **Type** | Interpreted | Interpreted/JIT |
| Speed | Medium | |
| Use Case | Data Science | Frontend |

Both are popular.";

    #[test]
    fn lifts_first_pipe_table() {
        let extracted = MarkdownTableExtractor::default()
            .extract("Compare Python and JavaScript", ANSWER)
            .unwrap();
        let ExtractedTable::Comparison(table) = extracted else {
            panic!("expected comparison table");
        };
        assert_eq!(table.title().raw(), "Python vs JavaScript");
        let items: Vec<&str> = table.items().iter().map(|i| i.raw()).collect();
        assert_eq!(items, vec!["Python", "JavaScript"]);
        let attributes: Vec<&str> = table.attributes().iter().map(|a| a.raw()).collect();
        assert_eq!(attributes, vec!["Type", "Speed", "Use Case"]);
        assert_eq!(table.value("JavaScript", "Type").unwrap().raw(), "Interpreted/JIT");
        assert!(table.value("JavaScript", "Speed").is_none());
    }

    #[test]
    fn rendered_extraction_uses_placeholder_for_blank_cells() {
        let extracted = MarkdownTableExtractor::new(Theme::Green)
            .extract("q", ANSWER)
            .unwrap();
        let html = extracted.render();
        assert_eq!(extracted.kind(), "comparison");
        assert!(html.contains("#A8E71F"));
        assert!(html.contains(">-</td>"));
    }

    #[test]
    fn prose_without_table_yields_nothing() {
        let extractor = MarkdownTableExtractor::default();
        assert!(extractor
            .extract("q", "Python is interpreted | sometimes JIT compiled.")
            .is_none());
        assert!(extractor.extract("q", "").is_none());
    }

    #[test]
    fn header_only_or_single_column_tables_are_ignored() {
        let extractor = MarkdownTableExtractor::default();
        assert!(extractor.extract("q", "| A | B |\n|---|---|\n").is_none());
        assert!(extractor.extract("q", "| A |\n|---|\n| x |").is_none());
    }

    #[test]
    fn duplicate_item_headers_are_rejected() {
        let extractor = MarkdownTableExtractor::default();
        let answer = "| F | Go | Go |\n|---|---|---|\n| Speed | fast | fast |";
        assert!(extractor.extract("q", answer).is_none());
    }

    #[test]
    fn strips_each_emphasis_marker() {
        let cells = split_row("| **Type** | _fast_ | `Go` | *JIT* | __bold__ | plain* |");
        assert_eq!(cells, vec!["Type", "fast", "Go", "JIT", "bold", "plain*"]);
    }

    #[test]
    fn repeated_attribute_rows_keep_the_first() {
        let answer = "| F | Go | Rust |\n|---|---|---|\n| Speed | fast | faster |\n| Speed | compile slow | compile slower |";
        let Some(ExtractedTable::Comparison(table)) =
            MarkdownTableExtractor::default().extract("Compare Go and Rust", answer)
        else {
            panic!("expected comparison table");
        };
        assert_eq!(table.attributes().len(), 1);
        assert_eq!(table.value("Go", "Speed").unwrap().raw(), "fast");
        assert_eq!(table.value("Rust", "Speed").unwrap().raw(), "faster");
        assert_eq!(table.populated_cells(), 2);
    }

    #[test]
    fn labelled_rows_become_pros_and_cons() {
        fn raw(list: &[SafeText]) -> Vec<&str> {
            list.iter().map(SafeText::raw).collect()
        }
        let answer = "| | Remote | Office |\n|---|---|---|\n| ✅ Pros | No commute<br>Flexible hours | Team contact |\n| Cons | Isolation | Commute; Noise |";
        let Some(ExtractedTable::ProsCons(table)) =
            MarkdownTableExtractor::new(Theme::Blue).extract("Remote or office?", answer)
        else {
            panic!("expected pros/cons table");
        };
        assert_eq!(table.item_a.raw(), "Remote");
        assert_eq!(table.item_b.raw(), "Office");
        assert_eq!(raw(&table.pros_a), vec!["No commute", "Flexible hours"]);
        assert_eq!(raw(&table.cons_a), vec!["Isolation"]);
        assert_eq!(raw(&table.pros_b), vec!["Team contact"]);
        assert_eq!(raw(&table.cons_b), vec!["Commute", "Noise"]);
        assert_eq!(table.theme, Theme::Blue);
    }

    #[test]
    fn labelled_columns_become_pros_and_cons() {
        let answer = "| Option | Advantages | Disadvantages |\n|---|---|---|\n| Tea | Calm | Weak |\n| Coffee | Strong | Jitters |";
        let Some(ExtractedTable::ProsCons(table)) =
            MarkdownTableExtractor::default().extract("Tea or coffee?", answer)
        else {
            panic!("expected pros/cons table");
        };
        assert_eq!(table.item_a.raw(), "Tea");
        assert_eq!(table.item_b.raw(), "Coffee");
        assert_eq!(table.cons_a[0].raw(), "Weak");
        assert_eq!(table.pros_b[0].raw(), "Strong");
    }

    #[test]
    fn pros_and_cons_question_reads_two_rows_as_sides() {
        let answer = "| | Cats | Dogs |\n|---|---|---|\n| Upside | Independent | Loyal |\n| Downside | Aloof | Needy |";
        let extractor = MarkdownTableExtractor::default();
        let Some(ExtractedTable::ProsCons(table)) =
            extractor.extract("What are the pros and cons of cats vs dogs?", answer)
        else {
            panic!("expected pros/cons table");
        };
        assert_eq!(table.pros_a[0].raw(), "Independent");
        assert_eq!(table.cons_b[0].raw(), "Needy");

        let plain = extractor.extract("Compare cats and dogs", answer).unwrap();
        assert_eq!(plain.kind(), "comparison");
    }

    #[test]
    fn null_extractor_never_extracts() {
        assert!(NullExtractor.extract("Compare", ANSWER).is_none());
        assert_eq!(NullExtractor.name(), "null");
    }
}
