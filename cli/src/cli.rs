use anyhow::bail;
use clap::ArgAction;
use notices_core::{
    validate_business_id, Enumeration, RegisteredNotices, SearchQuery, Transport, CODE_LIST,
    DEFAULT_BASE_URL, LANGUAGE,
};
use serde_json::Value;

use crate::config::Config;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the registered notices API
    #[arg(long, env = "PRH_NOTICES_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Extra request header as `Name: Value` (repeatable)
    #[arg(short = 'H', long = "header", global = true)]
    headers: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, env = "PRH_NOTICES_TIMEOUT", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = Config::new(&self.base_url, &self.headers, self.timeout)?;
        tracing::debug!(
            base_url = %config.base_url,
            timeout = ?config.timeout,
            headers = ?config.header_names(),
            "resolved configuration"
        );

        let output = self.command.execute(&config.notices())?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Search registered notices
    Search(Search),

    /// Show one company by business ID
    Company {
        business_id: String,
    },

    /// Show one public notice
    Notice {
        /// Record year, e.g. 2024
        year: i32,
        /// Record number within the year
        number: String,
    },

    /// List descriptions of a code list
    ///
    /// Both arguments accept the wire code (`CF`, `FI`) or the symbolic
    /// name (`COMPANY_FORM`, `FINNISH`).
    Codes {
        code: String,
        language: String,
    },

    /// Check a business ID locally without contacting the API
    Validate {
        business_id: String,
    },
}

#[derive(Debug, Default, clap::Args)]
pub struct Search {
    /// Result page, starting at 1
    #[arg(long)]
    page: Option<u32>,

    /// Company name, or part of it
    #[arg(long)]
    name: Option<String>,

    /// Restrict to one business ID
    #[arg(long)]
    business_id: Option<String>,
}

impl Command {
    /// Run the command and return the document to print.
    pub fn execute<T: Transport>(&self, notices: &RegisteredNotices<T>) -> anyhow::Result<Value> {
        let value = match self {
            Command::Search(search) => {
                let query = SearchQuery {
                    page: search.page,
                    name: search.name.clone(),
                    business_id: search.business_id.clone(),
                };
                serde_json::to_value(notices.search(&query)?)?
            }
            Command::Company { business_id } => serde_json::to_value(notices.get_company(business_id)?)?,
            Command::Notice { year, number } => serde_json::to_value(notices.get_public_notice(*year, number)?)?,
            Command::Codes { code, language } => notices.get_code_descriptions(
                resolve_code(&CODE_LIST, code),
                resolve_code(&LANGUAGE, language),
            )?,
            Command::Validate { business_id } => {
                if !validate_business_id(business_id) {
                    bail!("invalid business ID: {business_id}");
                }
                serde_json::json!({ "businessId": business_id, "valid": true })
            }
        };
        Ok(value)
    }
}

/// Map a symbolic name to its code; anything else passes through unchanged.
fn resolve_code<'a>(enumeration: &Enumeration, arg: &'a str) -> &'a str {
    enumeration.code(&arg.to_ascii_uppercase()).unwrap_or(arg)
}
