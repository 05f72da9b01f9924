use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use crossterm::{
    cursor, execute, queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
};
use bp_core::Category;
use crate::audit::{audit_article, ArticleAudit};
use crate::state::{Step, Wizard};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Full screen for the current step: header, banner, body.
pub fn render<W: Write>(out: &mut W, wizard: &Wizard) -> io::Result<()> {
    render_header(out, wizard.step())?;
    render_error(out, wizard.error())?;
    match wizard.step() {
        Step::Category => render_categories(out)?,
        Step::Topic => render_topics(out, wizard)?,
        Step::Theme => render_themes(out, wizard)?,
        Step::Research => render_sources(out, wizard)?,
        Step::Article => render_article_page(out, wizard)?,
    }
    out.flush()
}

pub fn render_header<W: Write>(out: &mut W, current: Step) -> io::Result<()> {
    queue!(out, Print("\n"), PrintStyledContent("✦ Blog Automator".magenta().bold()), Print("   "))?;
    for (i, step) in Step::ALL.iter().enumerate() {
        if i > 0 {
            queue!(out, PrintStyledContent(" › ".dark_grey()))?;
        }
        let label = step.label();
        if *step == current {
            queue!(out, PrintStyledContent(label.cyan().bold()))?;
        } else if *step < current {
            queue!(out, PrintStyledContent(label.green()))?;
        } else {
            queue!(out, PrintStyledContent(label.dark_grey()))?;
        }
    }
    queue!(out, Print("\n\n"))
}

pub fn render_error<W: Write>(out: &mut W, error: Option<&str>) -> io::Result<()> {
    if let Some(message) = error {
        queue!(
            out,
            PrintStyledContent(format!("✖ {}", message).red().bold()),
            PrintStyledContent("  (d to dismiss)\n\n".dark_grey())
        )?;
    }
    Ok(())
}

fn render_categories<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, PrintStyledContent("What are we writing about today?\n\n".bold()))?;
    for (i, category) in Category::ALL.iter().enumerate() {
        queue!(out, Print(format!("  {}. {}\n", i + 1, category)))?;
    }
    Ok(())
}

fn render_topics<W: Write>(out: &mut W, wizard: &Wizard) -> io::Result<()> {
    let category = wizard.category().map(|c| c.name()).unwrap_or_default();
    queue!(
        out,
        PrintStyledContent("Trending Topics".bold()),
        Print(format!(" in {}\n\n", category))
    )?;
    for (i, topic) in wizard.topics().iter().enumerate() {
        queue!(
            out,
            Print(format!("  {}. ", i + 1)),
            PrintStyledContent(topic.title.as_str().bold()),
            Print(format!("\n     {}\n", topic.description))
        )?;
    }
    render_empty(out, wizard.topics().is_empty())
}

fn render_themes<W: Write>(out: &mut W, wizard: &Wizard) -> io::Result<()> {
    let topic = wizard.selected_topic().map(|t| t.title.as_str()).unwrap_or_default();
    queue!(
        out,
        PrintStyledContent("SEO/AEO Optimized Themes".bold()),
        Print(format!(" for {}\n\n", topic))
    )?;
    for (i, theme) in wizard.themes().iter().enumerate() {
        queue!(
            out,
            Print(format!("  {}. ", i + 1)),
            PrintStyledContent(theme.theme.as_str().bold()),
            Print("\n     "),
            PrintStyledContent("✔ Why it works: ".green()),
            Print(format!("{}\n", theme.rationale))
        )?;
    }
    render_empty(out, wizard.themes().is_empty())
}

fn render_sources<W: Write>(out: &mut W, wizard: &Wizard) -> io::Result<()> {
    let theme = wizard.selected_theme().map(|t| t.theme.as_str()).unwrap_or_default();
    queue!(
        out,
        PrintStyledContent("Deep Research".bold()),
        Print(format!(": {} sources for {}\n\n", wizard.sources().len(), theme))
    )?;
    for (i, source) in wizard.sources().iter().enumerate() {
        queue!(
            out,
            PrintStyledContent(format!("  Source [{}] • {}\n", i + 1, source.date).cyan()),
            Print("  "),
            PrintStyledContent(source.title.as_str().bold()),
            Print(format!("\n  {}\n", source.snippet)),
            PrintStyledContent(format!("  {}\n\n", source.url).dark_grey())
        )?;
    }
    render_empty(out, wizard.sources().is_empty())
}

fn render_article_page<W: Write>(out: &mut W, wizard: &Wizard) -> io::Result<()> {
    if let Some(theme) = wizard.selected_theme() {
        queue!(out, PrintStyledContent(format!("Generated Article: {}\n", theme.theme).bold()))?;
    }
    queue!(out, PrintStyledContent(format!("{}\n\n", "─".repeat(60)).dark_grey()))?;
    let article = wizard.article().unwrap_or_default();
    render_article(out, article)?;
    render_audit(out, &audit_article(article, wizard.sources()))
}

pub fn render_audit<W: Write>(out: &mut W, audit: &ArticleAudit) -> io::Result<()> {
    queue!(
        out,
        PrintStyledContent(format!("\n{}\n", "─".repeat(60)).dark_grey()),
        PrintStyledContent("Quality Audit".bold()),
        Print(format!("  {} / {} checks passed\n", audit.passed(), audit.total()))
    )?;
    for check in &audit.checks {
        let mark = if check.passed { "✔".green() } else { "✖".red() };
        queue!(
            out,
            Print("  "),
            PrintStyledContent(mark),
            Print(format!(" {}: ", check.name)),
            PrintStyledContent(check.note.as_str().dark_grey()),
            Print("\n")
        )?;
    }
    Ok(())
}

fn render_empty<W: Write>(out: &mut W, empty: bool) -> io::Result<()> {
    if empty {
        queue!(out, PrintStyledContent("  (nothing came back)\n".dark_grey()))?;
    }
    Ok(())
}

/// Markdown with light styling: headings, code fences and `$$` math blocks.
pub fn render_article<W: Write>(out: &mut W, markdown: &str) -> io::Result<()> {
    let mut in_code = false;
    let mut in_math = false;

    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            in_code = !in_code;
            queue!(out, PrintStyledContent(format!("{}\n", line).dark_grey()))?;
        } else if in_code {
            queue!(out, PrintStyledContent(format!("{}\n", line).yellow()))?;
        } else if trimmed.starts_with("$$") {
            // a block that opens and closes on the same line does not toggle
            if !(trimmed.len() > 2 && trimmed.ends_with("$$")) {
                in_math = !in_math;
            }
            queue!(out, PrintStyledContent(format!("{}\n", line).magenta()))?;
        } else if in_math {
            queue!(out, PrintStyledContent(format!("{}\n", line).magenta()))?;
        } else if trimmed.starts_with('#') {
            queue!(out, PrintStyledContent(format!("{}\n", line).cyan().bold()))?;
        } else {
            queue!(out, Print(format!("{}\n", line)))?;
        }
    }
    Ok(())
}

pub fn help_line(step: Step) -> &'static str {
    match step {
        Step::Category | Step::Topic | Step::Theme => "Pick a number, d to dismiss, q to quit",
        Step::Research => "g to generate the article, d to dismiss, q to quit",
        Step::Article => "",
    }
}

pub fn render_prompt<W: Write>(out: &mut W, step: Step) -> io::Result<()> {
    queue!(out, PrintStyledContent(format!("\n{} > ", help_line(step)).dark_grey()))?;
    out.flush()
}

pub fn render_notice<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    queue!(out, PrintStyledContent(format!("{}\n", message).yellow()))?;
    out.flush()
}

/// Busy indicator on stderr while a call is in flight.
pub struct Spinner {
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    pub fn start(label: &'static str) -> Self {
        if !io::stderr().is_terminal() {
            eprintln!("{}...", label);
            return Self { handle: None };
        }

        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_millis(100));
            for frame in SPINNER_FRAMES.iter().cycle() {
                tick.tick().await;
                let _ = execute!(
                    io::stderr(),
                    cursor::MoveToColumn(0),
                    Clear(ClearType::CurrentLine),
                    PrintStyledContent(format!("{} {}...", frame, label).magenta())
                );
            }
        });
        Self { handle: Some(handle) }
    }

    pub async fn stop(self) {
        if let Some(handle) = self.handle {
            handle.abort();
            let _ = handle.await;
            let _ = execute!(io::stderr(), cursor::MoveToColumn(0), Clear(ClearType::CurrentLine));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_core::Source;
    use crate::state::{Action, Reply};

    fn rendered(wizard: &Wizard) -> String {
        let mut out = Vec::new();
        render(&mut out, wizard).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_category_screen_lists_all_categories() {
        let text = rendered(&Wizard::new());
        for category in Category::ALL {
            assert!(text.contains(category.name()));
        }
        assert!(text.contains("Category"));
    }

    #[test]
    fn test_error_banner_is_shown() {
        let mut wizard = Wizard::new();
        wizard.begin(Action::SelectCategory(Category::GpuComputing)).unwrap();
        wizard.finish(Err("Failed to suggest topics".to_string())).unwrap();
        assert!(rendered(&wizard).contains("✖ Failed to suggest topics"));
    }

    #[test]
    fn test_sources_show_citation_numbers() {
        let mut wizard = Wizard::new();
        wizard.begin(Action::SelectCategory(Category::GpuComputing)).unwrap();
        wizard.finish(Ok(Reply::Topics(vec![Default::default()]))).unwrap();
        wizard.begin(Action::SelectTopic(0)).unwrap();
        wizard.finish(Ok(Reply::Themes(vec![Default::default()]))).unwrap();
        wizard.begin(Action::SelectTheme(0)).unwrap();
        let source = Source {
            title: "MLPerf Inference v5.1".into(),
            url: "https://mlcommons.org".into(),
            snippet: "Results".into(),
            date: "2025-09".into(),
        };
        wizard.finish(Ok(Reply::Sources(vec![source]))).unwrap();

        let text = rendered(&wizard);
        assert!(text.contains("Source [1] • 2025-09"));
        assert!(text.contains("MLPerf Inference v5.1"));
        assert!(text.contains("1 sources"));
    }

    #[test]
    fn test_article_rendering_keeps_text() {
        let mut out = Vec::new();
        let markdown = "# Title\n\nBody [1]\n\n$$\na^2 + b^2\n$$\n\n```rust\nfn main() {}\n```";
        render_article(&mut out, markdown).unwrap();
        let text = String::from_utf8(out).unwrap();
        for piece in ["# Title", "Body [1]", "a^2 + b^2", "fn main() {}"] {
            assert!(text.contains(piece), "missing {}", piece);
        }
    }

    #[test]
    fn test_article_page_shows_audit() {
        let mut wizard = Wizard::new();
        wizard.begin(Action::SelectCategory(Category::GpuComputing)).unwrap();
        wizard.finish(Ok(Reply::Topics(vec![Default::default()]))).unwrap();
        wizard.begin(Action::SelectTopic(0)).unwrap();
        wizard.finish(Ok(Reply::Themes(vec![Default::default()]))).unwrap();
        wizard.begin(Action::SelectTheme(0)).unwrap();
        wizard.finish(Ok(Reply::Sources(vec![Default::default()]))).unwrap();
        wizard.begin(Action::GenerateArticle).unwrap();
        wizard.finish(Ok(Reply::Article("# NVLink\n\nSee [1] and [4].".into()))).unwrap();

        let text = rendered(&wizard);
        assert!(text.contains("Quality Audit"));
        assert!(text.contains("1 / 4 checks passed"));
        assert!(text.contains("[4] outside 1..=1"));
    }

    #[test]
    fn test_help_line() {
        assert!(help_line(Step::Research).starts_with("g "));
        assert!(help_line(Step::Topic).contains("number"));
    }
}
