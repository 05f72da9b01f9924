use std::fmt;
use thiserror::Error;
use bp_core::{Category, Source, Theme, Topic};

/// Wizard screens, in the only order they can be visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Category,
    Topic,
    Theme,
    Research,
    Article,
}

impl Step {
    pub const ALL: [Step; 5] = [Step::Category, Step::Topic, Step::Theme, Step::Research, Step::Article];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Topic => "Topic",
            Self::Theme => "Theme",
            Self::Research => "Research",
            Self::Article => "Article",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operator input that moves the wizard forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectCategory(Category),
    SelectTopic(usize),
    SelectTheme(usize),
    GenerateArticle,
}

impl Action {
    fn step(&self) -> Step {
        match self {
            Self::SelectCategory(_) => Step::Category,
            Self::SelectTopic(_) => Step::Topic,
            Self::SelectTheme(_) => Step::Theme,
            Self::GenerateArticle => Step::Research,
        }
    }
}

/// The orchestration call a transition needs. Produced by [`Wizard::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingCall {
    SuggestTopics { category: String },
    SuggestThemes { topic: String },
    DeepResearch { theme: String },
    GenerateArticle { theme: String, sources: Vec<Source> },
}

impl PendingCall {
    pub fn busy_label(&self) -> &'static str {
        match self {
            Self::SuggestTopics { .. } => "Finding trending topics",
            Self::SuggestThemes { .. } => "Framing themes",
            Self::DeepResearch { .. } => "Researching sources",
            Self::GenerateArticle { .. } => "Writing the article",
        }
    }
}

/// A successful orchestration result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Topics(Vec<Topic>),
    Themes(Vec<Theme>),
    Sources(Vec<Source>),
    Article(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WizardError {
    #[error("A request is already in flight")]
    Busy,

    #[error("No request is in flight")]
    Idle,

    #[error("Cannot do that at the {current} step (expected the {expected} step)")]
    WrongStep { current: Step, expected: Step },

    #[error("No option {index} (there are {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Session state of the wizard. Transitions are split into [`Wizard::begin`] and
/// [`Wizard::finish`] so the caller owns the network call.
#[derive(Debug, Clone)]
pub struct Wizard {
    step: Step,
    category: Option<Category>,
    topics: Vec<Topic>,
    selected_topic: Option<Topic>,
    themes: Vec<Theme>,
    selected_theme: Option<Theme>,
    sources: Vec<Source>,
    article: Option<String>,
    busy: bool,
    error: Option<String>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: Step::Category,
            category: None,
            topics: Vec::new(),
            selected_topic: None,
            themes: Vec::new(),
            selected_theme: None,
            sources: Vec::new(),
            article: None,
            busy: false,
            error: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn selected_topic(&self) -> Option<&Topic> {
        self.selected_topic.as_ref()
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn selected_theme(&self) -> Option<&Theme> {
        self.selected_theme.as_ref()
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn article(&self) -> Option<&str> {
        self.article.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Records the selection, clears the banner and marks the wizard busy.
    /// Rejected actions leave the state untouched.
    pub fn begin(&mut self, action: Action) -> Result<PendingCall, WizardError> {
        if self.busy {
            return Err(WizardError::Busy);
        }
        if action.step() != self.step {
            return Err(WizardError::WrongStep { current: self.step, expected: action.step() });
        }

        let call = match action {
            Action::SelectCategory(category) => {
                self.category = Some(category);
                PendingCall::SuggestTopics { category: category.name().to_string() }
            }
            Action::SelectTopic(index) => {
                let topic = pick(&self.topics, index)?.clone();
                let call = PendingCall::SuggestThemes { topic: topic.title.clone() };
                self.selected_topic = Some(topic);
                call
            }
            Action::SelectTheme(index) => {
                let theme = pick(&self.themes, index)?.clone();
                let call = PendingCall::DeepResearch { theme: theme.theme.clone() };
                self.selected_theme = Some(theme);
                call
            }
            Action::GenerateArticle => PendingCall::GenerateArticle {
                theme: self.selected_theme.as_ref().map(|t| t.theme.clone()).unwrap_or_default(),
                sources: self.sources.clone(),
            },
        };

        self.error = None;
        self.busy = true;
        Ok(call)
    }

    /// Applies the outcome of the call started by [`Wizard::begin`]. Success stores the
    /// data and advances one step; failure sets the banner and stays put. Busy is cleared
    /// either way.
    pub fn finish(&mut self, outcome: Result<Reply, String>) -> Result<(), WizardError> {
        if !self.busy {
            return Err(WizardError::Idle);
        }
        self.busy = false;

        match (self.step, outcome) {
            (Step::Category, Ok(Reply::Topics(topics))) => {
                self.topics = topics;
                self.step = Step::Topic;
            }
            (Step::Topic, Ok(Reply::Themes(themes))) => {
                self.themes = themes;
                self.step = Step::Theme;
            }
            (Step::Theme, Ok(Reply::Sources(sources))) => {
                self.sources = sources;
                self.step = Step::Research;
            }
            (Step::Research, Ok(Reply::Article(article))) => {
                self.article = Some(article);
                self.step = Step::Article;
            }
            (step, Ok(_)) => {
                self.error = Some(format!("Unexpected reply at the {} step", step));
            }
            (_, Err(message)) => {
                self.error = Some(message);
            }
        }
        Ok(())
    }
}

fn pick<T>(items: &[T], index: usize) -> Result<&T, WizardError> {
    items.get(index).ok_or(WizardError::OutOfRange { index, len: items.len() })
}
