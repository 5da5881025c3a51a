//! CLI entry point for the weblinks tool.

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info, warn};
use weblinks::provider::doi::{ABBREVISO_BASE_URL, Doi, DoiClient};
use weblinks::provider::github::{GitHub, Repo, UPLOAD_BASE_URL};
use weblinks::{HttpClient, LinkConfig, Reachability, Url};

mod cli;

use cli::{Args, CitationFormat, Command, GithubCommand, RepoRef};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    init_tracing(default_level);

    debug!(
        offline = args.offline,
        connect_timeout = ?args.connect_timeout,
        read_timeout = ?args.read_timeout,
        authenticated = args.token.is_some(),
        "CLI arguments parsed"
    );

    // Flags win over WEBLINKS_* variables, which win over built-in defaults
    let mut config = LinkConfig::from_env().with_offline(args.offline);
    if let Some(secs) = args.connect_timeout {
        config.connect_timeout_secs = secs;
    }
    if let Some(secs) = args.read_timeout {
        config.read_timeout_secs = secs;
    }
    debug!(
        offline = config.offline,
        connect_timeout = config.connect_timeout_secs,
        read_timeout = config.read_timeout_secs,
        "configuration resolved"
    );
    let http = HttpClient::new(&config).context("failed to build HTTP client")?;

    match args.command {
        Command::Url {
            base,
            path,
            query,
            fragment,
            check,
        } => run_url(&http, &base, &path, query, fragment, check).await,
        Command::Doi {
            doi,
            format,
            style,
            locale,
            resolver,
        } => {
            let client = DoiClient::with_endpoints(
                http,
                Url::parse(&resolver).context("invalid DOI resolver URL")?,
                Url::parse(ABBREVISO_BASE_URL)?,
            );
            run_doi(&client, &doi, format, style.as_deref(), locale.as_deref()).await
        }
        Command::Github(command) => {
            let github = GitHub::with_endpoints(
                http,
                args.token,
                Url::parse(&args.github_api_url).context("invalid GitHub API URL")?,
                Url::parse(UPLOAD_BASE_URL)?,
            );
            run_github(&github, command).await
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

async fn run_url(
    http: &HttpClient,
    base: &str,
    paths: &[String],
    query: Vec<(String, String)>,
    fragment: Option<String>,
    check: bool,
) -> Result<()> {
    let mut url = Url::parse(base).with_context(|| format!("invalid base URL '{base}'"))?;
    for path in paths {
        url = url.join(path);
    }
    let url = url.merge_query(query).with_fragment(fragment);

    match http.check_reachable(&url, check).await {
        Reachability::Unreachable => bail!("{url} is not reachable"),
        Reachability::Skipped if check => warn!(url = %url, "offline, reachability not checked"),
        Reachability::Reachable => info!(url = %url, "reachable"),
        Reachability::Skipped => {}
    }
    println!("{url}");
    Ok(())
}

async fn run_doi(
    client: &DoiClient,
    raw: &str,
    format: CitationFormat,
    style: Option<&str>,
    locale: Option<&str>,
) -> Result<()> {
    let doi = Doi::parse(raw)?;
    let output = match format {
        CitationFormat::Text => client.text(&doi, style, locale).await?,
        CitationFormat::Bibtex => client.bibtex(&doi).await?,
        CitationFormat::Ris => client.ris(&doi).await?,
        CitationFormat::Json => serde_json::to_string_pretty(&client.curated(&doi).await?)
            .context("failed to serialize citation")?,
    };
    println!("{}", output.trim_end());
    Ok(())
}

async fn run_github(github: &GitHub, command: GithubCommand) -> Result<()> {
    let names: Vec<String> = match command {
        GithubCommand::Labels { repo } => repo_of(github, &repo)
            .labels()
            .await?
            .iter()
            .filter_map(|label| label.get("name")?.as_str().map(str::to_string))
            .collect(),
        GithubCommand::Tags { repo } => repo_of(github, &repo)
            .tag_names(None)
            .await?
            .into_iter()
            .map(|tag| tag.name)
            .collect(),
        GithubCommand::Branches { repo } => repo_of(github, &repo)
            .branches()
            .await?
            .iter()
            .filter_map(|branch| branch.get("name")?.as_str().map(str::to_string))
            .collect(),
    };
    for name in &names {
        println!("{name}");
    }
    debug!(count = names.len(), "listed");
    Ok(())
}

fn repo_of(github: &GitHub, repo: &RepoRef) -> Repo {
    github.repo(repo.owner.clone(), repo.name.clone())
}
