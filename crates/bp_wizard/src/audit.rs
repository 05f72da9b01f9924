//! Read-only checks over a generated article. Nothing here triggers another call;
//! the results are only shown next to the article and in the export.

use std::collections::BTreeSet;
use std::sync::LazyLock;
use regex::Regex;
use bp_core::Source;

/// Word count the article prompt asks for.
pub const TARGET_WORDS: usize = 2000;

/// Accepted spread around [`TARGET_WORDS`], in percent.
const WORD_TOLERANCE: usize = 25;

static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("citation pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleAudit {
    pub checks: Vec<Check>,
}

impl ArticleAudit {
    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn total(&self) -> usize {
        self.checks.len()
    }

    pub fn check(&self, name: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn to_markdown(&self) -> String {
        let mut doc = format!("## Quality Audit\n\n{} / {} checks passed\n\n", self.passed(), self.total());
        for check in &self.checks {
            let mark = if check.passed { "x" } else { " " };
            doc.push_str(&format!("- [{}] {}: {}\n", mark, check.name, check.note));
        }
        doc
    }
}

pub const WORD_COUNT: &str = "Word count";
pub const TITLE: &str = "Title heading";
pub const CITATIONS: &str = "Citations";
pub const MATH: &str = "LaTeX math";

/// Bracketed numbers such as `[3]`, in order of appearance.
pub fn citations(article: &str) -> Vec<usize> {
    CITATION_RE
        .captures_iter(article)
        .filter_map(|c| c[1].parse().ok())
        .collect()
}

pub fn audit_article(article: &str, sources: &[Source]) -> ArticleAudit {
    let words = article.split_whitespace().count();
    let low = TARGET_WORDS * (100 - WORD_TOLERANCE) / 100;
    let high = TARGET_WORDS * (100 + WORD_TOLERANCE) / 100;

    let first_line = article.lines().find(|l| !l.trim().is_empty()).unwrap_or_default();
    let has_title = first_line.trim_start().starts_with("# ");

    let cited = citations(article);
    let out_of_range: BTreeSet<usize> = cited
        .iter()
        .copied()
        .filter(|n| *n == 0 || *n > sources.len())
        .collect();
    let citation_note = if !out_of_range.is_empty() {
        let listed: Vec<String> = out_of_range.iter().map(|n| format!("[{}]", n)).collect();
        format!("{} outside 1..={} ({} sources)", listed.join(", "), sources.len(), sources.len())
    } else if cited.is_empty() {
        format!("no citations, {} sources", sources.len())
    } else {
        let distinct: BTreeSet<_> = cited.iter().collect();
        format!("{} citations of {} distinct sources, all within range", cited.len(), distinct.len())
    };

    let display_math = article.matches("$$").count();
    let has_math = article.contains('$');

    ArticleAudit {
        checks: vec![
            Check {
                name: WORD_COUNT,
                passed: (low..=high).contains(&words),
                note: format!("~{} words, target {} ({}-{})", words, TARGET_WORDS, low, high),
            },
            Check {
                name: TITLE,
                passed: has_title,
                note: if has_title {
                    first_line.trim().to_string()
                } else {
                    "article does not open with a `# ` heading".to_string()
                },
            },
            Check {
                name: CITATIONS,
                passed: out_of_range.is_empty(),
                note: citation_note,
            },
            Check {
                name: MATH,
                passed: has_math,
                note: if has_math {
                    format!("{} display block(s), inline math present", display_math / 2)
                } else {
                    "no $ or $$ math found".to_string()
                },
            },
        ],
    }
}
