//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand, ValueEnum};

use weblinks::config::OFFLINE_ENV;
use weblinks::provider::doi::DOI_BASE_URL;
use weblinks::provider::github::API_BASE_URL;

/// Build URLs and query web APIs.
///
/// Composes links from a base URL, fetches DOI citations and lists
/// repository metadata from GitHub.
#[derive(Parser, Debug)]
#[command(name = "weblinks")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Never probe URLs for reachability
    #[arg(long, env = OFFLINE_ENV, value_parser = clap::builder::BoolishValueParser::new(), global = true)]
    pub offline: bool,

    /// HTTP connect timeout in seconds (1-300) [default: 10, or $WEBLINKS_CONNECT_TIMEOUT_SECS]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=300), global = true)]
    pub connect_timeout: Option<u64>,

    /// HTTP read timeout in seconds (1-3600) [default: 30, or $WEBLINKS_READ_TIMEOUT_SECS]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600), global = true)]
    pub read_timeout: Option<u64>,

    /// GitHub access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// GitHub API root, for GitHub Enterprise servers
    #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL, global = true)]
    pub github_api_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a URL from a base and print it
    Url {
        /// Base URL, e.g. https://example.com/api
        base: String,

        /// Path to append; may contain '/' (repeatable)
        #[arg(short, long)]
        path: Vec<String>,

        /// Query parameter as KEY=VALUE (repeatable)
        #[arg(long, value_parser = parse_query_pair)]
        query: Vec<(String, String)>,

        /// Fragment to set
        #[arg(short, long)]
        fragment: Option<String>,

        /// Probe the URL and fail if it is unreachable
        #[arg(long)]
        check: bool,
    },

    /// Fetch a citation for a DOI
    Doi {
        /// DOI, bare or as a doi.org URL
        doi: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = CitationFormat::Text)]
        format: CitationFormat,

        /// CSL style for text output, e.g. apa
        #[arg(long)]
        style: Option<String>,

        /// Locale for text output, e.g. en-US
        #[arg(long)]
        locale: Option<String>,

        /// DOI resolver root
        #[arg(long, env = "WEBLINKS_DOI_RESOLVER", default_value = DOI_BASE_URL, hide = true)]
        resolver: String,
    },

    /// Query a GitHub repository
    #[command(subcommand)]
    Github(GithubCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum GithubCommand {
    /// List issue labels
    Labels {
        /// Repository as OWNER/REPO
        #[arg(value_parser = parse_repo)]
        repo: RepoRef,
    },
    /// List tag names
    Tags {
        /// Repository as OWNER/REPO
        #[arg(value_parser = parse_repo)]
        repo: RepoRef,
    },
    /// List branch names
    Branches {
        /// Repository as OWNER/REPO
        #[arg(value_parser = parse_repo)]
        repo: RepoRef,
    },
}

/// Output format of the `doi` command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationFormat {
    Text,
    Bibtex,
    Ris,
    /// Curated citation as JSON
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

fn parse_query_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

fn parse_repo(raw: &str) -> Result<RepoRef, String> {
    match raw.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(RepoRef {
                owner: owner.to_string(),
                name: name.to_string(),
            })
        }
        _ => Err(format!("expected OWNER/REPO, got '{raw}'")),
    }
}
