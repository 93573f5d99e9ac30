use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use framer_export_core::analyzer::{extract_dependencies, DependencyReport};
use framer_export_core::canvas::{write_items, CanvasDocument, SnapshotSession};
use framer_export_core::config::{
    Settings, ACCESS_TOKEN_ENV, DEFAULT_API_BASE, DEFAULT_CDN_BASE, DEFAULT_TIMEOUT_SECS,
};
use framer_export_core::framer::FramerClient;
use framer_export_core::tools::{
    export_framer_components, get_component_code, list_framer_projects, ExportComponentsInput,
    GetComponentInput, ListProjectsInput, ToolHandlers,
};
use framer_export_core::{logging, McpServer};
use serde::Serialize;
use std::collections::HashSet;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Framer component export engine", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SettingsArgs {
    /// Framer API access token
    #[arg(long, global = true, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
    access_token: Option<String>,

    #[arg(long, global = true, env = "FRAMER_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[arg(long, global = true, env = "FRAMER_CDN_BASE", default_value = DEFAULT_CDN_BASE)]
    cdn_base: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

impl From<SettingsArgs> for Settings {
    fn from(args: SettingsArgs) -> Self {
        Settings {
            access_token: args.access_token,
            api_base: args.api_base,
            cdn_base: args.cdn_base,
            timeout: Duration::from_secs(args.timeout_secs),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdio
    Serve,
    /// List modules and components of a project
    List(ProjectArgs),
    /// Download every component of a project into a directory
    Export {
        #[command(flatten)]
        project: ProjectArgs,
        /// Directory that receives `original/` and `export-summary.json`
        #[arg(long, short)]
        output_path: PathBuf,
    },
    /// Fetch one component by its CDN url
    Component {
        url: String,
    },
    /// Build export items from a canvas document (`-` reads STDIN)
    Snapshot(SnapshotArgs),
    /// Print the external packages imported by a source read from STDIN
    Deps,
    /// Dependency report for every source file under a directory
    Report {
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ProjectArgs {
    /// framer.com/projects/... url or published site url
    project_url: String,
    /// Required when the url carries no project id
    #[arg(long)]
    project_id: Option<String>,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    input: String,
    /// Write one JSON file per item into this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Item ids to write; all items when omitted
    #[arg(long = "select")]
    select: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let settings = Settings::from(cli.settings);

    match cli.command {
        Commands::Serve => {
            McpServer::new(ToolHandlers::new(settings)).run().await?;
        }
        Commands::List(project) => {
            let client = FramerClient::new(settings.client_config(None)?)?;
            let input = ListProjectsInput {
                project_url: project.project_url,
                project_id: project.project_id,
                access_token: None,
            };
            print_json(&list_framer_projects(&client, &input).await?)?;
        }
        Commands::Export { project, output_path } => {
            let client = FramerClient::new(settings.client_config(None)?)?;
            let input = ExportComponentsInput {
                project_url: project.project_url,
                project_id: project.project_id,
                output_path: output_path.to_string_lossy().to_string(),
                access_token: None,
            };
            print_json(&export_framer_components(&client, &input).await?)?;
        }
        Commands::Component { url } => {
            let client = FramerClient::new(settings.client_config(None)?)?;
            let input = GetComponentInput { component_url: url, access_token: None };
            print_json(&get_component_code(&client, &input).await?)?;
        }
        Commands::Snapshot(args) => snapshot(args).await?,
        Commands::Deps => {
            let source = read_stdin()?;
            let deps: Vec<String> = extract_dependencies(&source).into_iter().collect();
            print_json(&deps)?;
        }
        Commands::Report { dir } => {
            let root = dir.to_string_lossy().to_string();
            let report = tokio::task::spawn_blocking(move || DependencyReport::index_dir(&root)).await?;
            println!("{}", report.to_json());
        }
    }
    Ok(())
}

async fn snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let document = if args.input == "-" {
        CanvasDocument::from_json(&read_stdin()?)?
    } else {
        CanvasDocument::load(Path::new(&args.input))?
    };

    let view = SnapshotSession::new(document).refresh().await;
    if let Some(error) = &view.error {
        anyhow::bail!("snapshot failed: {error}");
    }
    tracing::info!(items = view.items.len(), "{}", view.message);

    if let Some(dir) = args.out_dir {
        let selected: HashSet<String> = if args.select.is_empty() {
            view.items.iter().map(|item| item.id.clone()).collect()
        } else {
            args.select.into_iter().collect()
        };
        let written = write_items(&view.items, &selected, &dir)?;
        print_json(&written)?;
    } else {
        print_json(&view.items)?;
    }
    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).context("failed to read from STDIN")?;
    Ok(buf)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
