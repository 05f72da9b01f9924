use std::net::SocketAddr;
use std::path::PathBuf;
use clap::Parser;
use tracing::info;
use bp_inference::models::{GeminiModel, ModelFilter};
use bp_inference::{create_model, Config, ModelKind, Pipeline};
use bp_web::AppState;
use bp_wizard::{HttpClient, Step, WizardOptions, DEFAULT_API_URL};

mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Topic, theme, research and article pipeline", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, default_value = "gemini", help = "Model to use. Available models: gemini (default), dummy")]
    model: ModelKind,
    #[arg(long, global = true, env = "GEMINI_MODEL", help = "Remote model name, e.g. gemini-2.5-flash")]
    model_name: Option<String>,
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, global = true, env = "GEMINI_BASE_URL")]
    base_url: Option<String>,
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the orchestration API
    Serve {
        /// Full bind address; overrides --port
        #[arg(long)]
        addr: Option<SocketAddr>,
        #[arg(long, env = "PORT", default_value_t = 3001)]
        port: u16,
    },
    /// Walk through category, topic, theme, research and article in the terminal
    Wizard {
        #[arg(long, env = "BP_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,
        /// Run the pipeline in this process instead of calling a server
        #[arg(long)]
        local: bool,
        /// Save the finished article (with references) to this markdown file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List remote models, optionally filtered
    ListModels {
        /// Keep models whose name contains this (repeatable)
        #[arg(long)]
        contains: Vec<String>,
        /// Keep models supporting this generation method, e.g. generateContent
        #[arg(long)]
        method: Option<String>,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let env = Config::from_env();
        Config {
            api_key: self.api_key.clone().or(env.api_key),
            model_name: self.model_name.clone().or(env.model_name),
            base_url: self.base_url.clone().or(env.base_url),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // the wizard owns the terminal, keep the log quiet unless asked
    let base_level = match cli.command {
        Commands::Wizard { .. } => "warn",
        _ => "info",
    };
    logging::init_logging(logging::level_for(cli.verbose, base_level));

    let config = cli.config();
    match cli.command {
        Commands::Serve { addr, port } => {
            let model = create_model(cli.model, config)?;
            info!("🧠 Inference model initialized (using {})", model.name());
            let addr = addr.unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], port)));
            bp_web::serve(addr, AppState::new(Pipeline::new(model))).await?;
        }
        Commands::Wizard { api_url, local, output } => {
            let options = WizardOptions { output };
            let wizard = if local {
                let model = create_model(cli.model, config)?;
                info!("Running the pipeline locally with {}", model.name());
                bp_wizard::run(&Pipeline::new(model), options).await?
            } else {
                info!("Using orchestration service at {}", api_url);
                bp_wizard::run(&HttpClient::new(api_url), options).await?
            };
            if wizard.step() != Step::Article {
                info!("Left the wizard at the {} step", wizard.step());
            }
        }
        Commands::ListModels { contains, method } => {
            let model = GeminiModel::new(config)?;
            let filter = ModelFilter { name_contains: contains, method };
            let models = model.list_models(&filter).await?;
            for m in &models {
                println!("{} {:?}", m.name, m.supported_generation_methods);
            }
            info!("Found {} models", models.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["bp", "--model", "dummy", "serve", "--port", "8080"]).unwrap();
        assert_eq!(cli.model, ModelKind::Dummy);
        match cli.command {
            Commands::Serve { addr, port } => {
                assert!(addr.is_none());
                assert_eq!(port, 8080);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_wizard() {
        let cli = Cli::try_parse_from(["bp", "wizard", "--local", "--output", "post.md", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Wizard { local, output, .. } => {
                assert!(local);
                assert_eq!(output, Some(PathBuf::from("post.md")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_models() {
        let cli = Cli::try_parse_from(["bp", "list-models", "--contains", "image", "--contains", "imagen", "--method", "predict"]).unwrap();
        match cli.command {
            Commands::ListModels { contains, method } => {
                assert_eq!(contains, vec!["image", "imagen"]);
                assert_eq!(method.as_deref(), Some("predict"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        assert!(Cli::try_parse_from(["bp", "--model", "ollama", "serve"]).is_err());
    }
}
