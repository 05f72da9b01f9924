use std::io::{self, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use bp_core::Category;
use crate::audit::audit_article;
use crate::client::PipelineClient;
use crate::state::{Action, Step, Wizard};
use crate::ui::{self, Spinner};

#[derive(Debug, Clone, Default)]
pub struct WizardOptions {
    /// Where to save the finished article as markdown.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Zero-based option index.
    Select(usize),
    Generate,
    Dismiss,
    Quit,
}

/// Options are shown 1-based; `0` and anything unrecognised is rejected.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "g" | "generate" => Some(Command::Generate),
        "d" | "dismiss" => Some(Command::Dismiss),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => line.parse::<usize>().ok().filter(|n| *n > 0).map(|n| Command::Select(n - 1)),
    }
}

/// Maps a command to the transition it stands for at `step`.
pub fn action_for(step: Step, command: Command) -> Option<Action> {
    match (step, command) {
        (Step::Category, Command::Select(i)) => Category::ALL.get(i).copied().map(Action::SelectCategory),
        (Step::Topic, Command::Select(i)) => Some(Action::SelectTopic(i)),
        (Step::Theme, Command::Select(i)) => Some(Action::SelectTheme(i)),
        (Step::Research, Command::Generate) => Some(Action::GenerateArticle),
        _ => None,
    }
}

/// The finished article followed by a reference list and the quality audit,
/// or `None` before the article step.
pub fn export_markdown(wizard: &Wizard) -> Option<String> {
    let article = wizard.article()?;
    let mut doc = article.trim_end().to_string();
    if !wizard.sources().is_empty() {
        doc.push_str("\n\n## References\n\n");
        for (i, source) in wizard.sources().iter().enumerate() {
            doc.push_str(&format!("[{}] [{}]({})", i + 1, source.title, source.url));
            if !source.date.is_empty() {
                doc.push_str(&format!(" ({})", source.date));
            }
            doc.push('\n');
        }
    }
    let mut doc = doc.trim_end().to_string();
    doc.push_str("\n\n");
    doc.push_str(&audit_article(article, wizard.sources()).to_markdown());
    Some(doc)
}

/// Runs one transition: begin, call with a spinner, finish.
pub async fn advance<C>(wizard: &mut Wizard, client: &C, action: Action) -> anyhow::Result<()>
where
    C: PipelineClient + ?Sized,
{
    let call = wizard.begin(action)?;
    let spinner = Spinner::start(call.busy_label());
    let outcome = client.execute(call).await.map_err(|e| {
        tracing::warn!("Stage failed: {:?}", e);
        e.to_string()
    });
    spinner.stop().await;
    wizard.finish(outcome)?;
    Ok(())
}

/// Interactive loop over stdin until the article is shown, the operator quits, or input ends.
pub async fn run<C>(client: &C, options: WizardOptions) -> anyhow::Result<Wizard>
where
    C: PipelineClient + ?Sized,
{
    let mut wizard = Wizard::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = io::stdout();

    loop {
        ui::render(&mut out, &wizard)?;
        if wizard.step() == Step::Article {
            break;
        }
        ui::render_prompt(&mut out, wizard.step())?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let action = match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Dismiss) => {
                wizard.dismiss_error();
                continue;
            }
            Some(command) => action_for(wizard.step(), command),
            None => None,
        };
        let Some(action) = action else {
            ui::render_notice(&mut out, &format!("Not an option here. {}", ui::help_line(wizard.step())))?;
            continue;
        };

        if let Err(e) = advance(&mut wizard, client, action).await {
            ui::render_notice(&mut out, &e.to_string())?;
        }
    }

    if let (Some(path), Some(doc)) = (&options.output, export_markdown(&wizard)) {
        tokio::fs::write(path, doc).await?;
        ui::render_notice(&mut out, &format!("Saved article to {}", path.display()))?;
    }
    out.flush()?;
    Ok(wizard)
}
