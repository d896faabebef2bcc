use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use pmdash_lib::config::{load_config, load_config_from};
use pmdash_lib::dashboard::view::SearchLink;
use pmdash_lib::org_draft::FileDraftStore;
use pmdash_lib::{
    ApiClient, DashboardController, DashboardView, Navigator, PhaseGroup, SearchStatus,
    UnitDraftFlow, UnitForm, UnitStatus,
};

#[derive(Parser)]
#[command(name = "pmdash")]
#[command(about = "Project dashboard, search and unit creation against the PM API")]
struct Cli {
    /// Config file (defaults to ~/.pmdash/config.json)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL from config
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show project stats and the (optionally filtered) project table
    Projects {
        /// PLANNED, ACTIVE, COMPLETED or ALL
        #[arg(long, default_value = "ALL")]
        group: PhaseGroup,

        /// Print the dashboard view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search projects, tasks and users
    Search {
        term: String,
    },
    /// Create a unit under the drafted organization
    CreateUnit {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        manager: String,
    },
}

/// Terminal stand-in for route changes.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, route: &str) {
        println!("-> {}", route);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    log::debug!("Using API at {}", config.api_base_url);

    let client = Arc::new(ApiClient::new(&config.api_base_url)?);

    match cli.command {
        Command::Projects { group, json } => {
            let dashboard = DashboardController::new(client);
            dashboard.init().await;
            dashboard.set_group_filter(group);
            let view = dashboard.view();

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_dashboard(&view);
            }
            if let Some(error) = view.error {
                anyhow::bail!(error);
            }
        }
        Command::Search { term } => {
            if term.trim().is_empty() {
                return Ok(());
            }
            let dashboard = DashboardController::new(client);
            let state = dashboard.submit_search(&term).await;
            if let SearchStatus::Failed(message) = &state.search_status {
                log::warn!("Search failed: {}", message);
            }
            match dashboard.view().search {
                Some(panel) => {
                    println!("Search Results");
                    print_links("Projects", &panel.projects);
                    print_links("Tasks", &panel.tasks);
                    print_links("Users", &panel.users);
                    if let Some(message) = panel.empty_message {
                        println!("{}", message);
                    }
                }
                None => println!("{}", pmdash_lib::dashboard::view::NO_RESULTS),
            }
        }
        Command::CreateUnit {
            name,
            description,
            manager,
        } => {
            let drafts = Arc::new(FileDraftStore::new(config.org_draft_path()?));
            let flow = UnitDraftFlow::new(
                client,
                drafts,
                Arc::new(PrintNavigator),
                config.navigation_delay(),
            );
            if let Some(org) = flow.organization_name() {
                println!("For Organization: {}", org);
            }

            let form = UnitForm {
                name,
                description,
                manager,
            };
            match flow.submit(&form).await {
                Ok(pending) => {
                    if let UnitStatus::Succeeded(message) = flow.status() {
                        println!("{}", message);
                    }
                    pending.wait().await;
                }
                Err(e) => anyhow::bail!(e),
            }
        }
    }

    Ok(())
}

fn print_dashboard(view: &DashboardView) {
    for tile in &view.tiles {
        let marker = if tile.selected { "*" } else { " " };
        println!("{} {:<20} {}", marker, tile.label, tile.count);
    }
    println!();
    println!("{}", view.table_title);
    println!(
        "{:<36} {:<24} {:<12} {}",
        "PROJECT", "PHASE", "START DATE", "TEAM"
    );
    for row in &view.rows {
        println!(
            "{:<36} {:<24} {:<12} {}",
            row.title, row.phase, row.start_date, row.team
        );
    }
}

fn print_links(heading: &str, links: &[SearchLink]) {
    if links.is_empty() {
        return;
    }
    println!("{}", heading);
    for link in links {
        println!("  {} ({})", link.label, link.link);
    }
}
