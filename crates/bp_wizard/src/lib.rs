pub mod audit;
pub mod client;
pub mod driver;
pub mod state;
pub mod ui;

pub use audit::{audit_article, ArticleAudit, Check};
pub use client::{ClientError, HttpClient, PipelineClient, DEFAULT_API_URL};
pub use driver::{advance, run, WizardOptions};
pub use state::{Action, PendingCall, Reply, Step, Wizard, WizardError};

pub mod prelude {
    pub use super::{HttpClient, PipelineClient, Wizard, WizardOptions, Step};
    pub use bp_core::{Category, Topic, Theme, Source};
}
