use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use netsecure_portal::{
    AppConfig, Env, Navigation, Portal,
    models::{OrganizationRequest, OrganizationUpdate},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// NetSecure IQ portal client
#[derive(Parser, Debug)]
#[command(name = "netsecure")]
#[command(version, about, long_about = None)]
struct Args {
    /// Backend base URL (overrides NETSECURE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides NETSECURE_SESSION_FILE)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "NETSECURE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Request an account; the backend mails a temporary password
    Register { email: String },
    /// Show the signed-in profile
    Whoami {
        /// Reload the profile (permissions, site grants) from the backend first
        #[arg(long)]
        refresh: bool,
    },
    /// Show where a page navigation would end up
    Navigate { path: String },
    /// Manage MikroTik agents
    #[command(subcommand)]
    Agents(AgentCommand),
    /// Manage organizations
    #[command(subcommand)]
    Orgs(OrgCommand),
    /// List the sites visible to the signed-in account
    Sites {
        /// Show the unfiltered list
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
enum AgentCommand {
    List,
    Preregister {
        mac: String,
        #[arg(long)]
        site: Option<String>,
    },
    Enable { mac: String },
    Disable { mac: String },
    Test { mac: String },
    Associate { mac: String, site: String },
    Remove { mac: String },
    Delete { mac: String },
}

#[derive(Subcommand, Debug)]
enum OrgCommand {
    Get { id: String },
    /// Create from a JSON file holding the full organization record
    Create { file: PathBuf },
    /// Complete the signed-in operator's organization from a JSON file
    Complete { file: PathBuf },
    /// Apply a partial update from a JSON file
    Update { id: String, file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration (.env first, then the process environment, then flags)
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = &args.api_url {
        config = config.with_api_base_url(url);
    }
    if let Some(path) = &args.session_file {
        config = config.with_session_file(path.clone());
    }

    // 2. Logging: pretty for local use, JSON in production. Always on stderr so
    // command output on stdout stays machine-readable.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "netsecure_portal=info,netsecure=info".into());

    match config.env {
        Env::Local => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init(),
        Env::Production => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    tracing::debug!(api = %config.api_base_url, "starting in {:?} mode", config.env);

    // 3. Portal assembly around the persisted session
    let portal = Portal::with_file_storage(config)?;

    run(&portal, args.command).await
}

async fn run(portal: &Portal, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let user = portal.auth.login(&email, &password).await?;
            // Permissions only arrive through /me; a failure here keeps the login.
            let user = match portal.auth.refresh_profile().await {
                Ok(Some(fresh)) => fresh,
                Ok(None) => user,
                Err(e) => {
                    tracing::warn!(error = %e, "signed in but could not load the full profile");
                    user
                }
            };
            print_json(&user)?;
            println!("landing page: {}", portal.auth.landing_page());
        }
        Command::Logout => {
            portal.auth.logout();
            println!("signed out");
        }
        Command::Register { email } => print_json(&portal.auth_api().register(&email).await?)?,
        Command::Whoami { refresh } => {
            if refresh {
                portal.auth.refresh_profile().await?;
            }
            match portal.auth.user().filter(|_| portal.auth.is_authenticated()) {
                Some(user) => print_json(&user)?,
                None => println!("not signed in"),
            }
        }
        Command::Navigate { path } => match portal.navigate(&path) {
            Navigation::Arrived { path, redirects } if redirects.is_empty() => {
                println!("{path}");
            }
            Navigation::Arrived { path: to, redirects } => {
                println!("{to} (redirected via {})", redirects.join(" -> "));
            }
            Navigation::NotFound(missing) => anyhow::bail!("no page at {missing}"),
            Navigation::RedirectLoop(hops) => {
                anyhow::bail!("redirect loop: {}", hops.join(" -> "))
            }
        },
        Command::Agents(cmd) => run_agents(portal, cmd).await?,
        Command::Orgs(cmd) => run_orgs(portal, cmd).await?,
        Command::Sites { all } => {
            portal.sites.fetch_sites().await?;
            let sites = if all {
                portal.sites.sites()
            } else {
                portal.sites.filtered_sites()
            };
            print_json(&sites)?;
        }
    }
    Ok(())
}

async fn run_agents(portal: &Portal, cmd: AgentCommand) -> Result<()> {
    let agents = &portal.agents;
    match cmd {
        AgentCommand::List => print_json(&agents.list().await?),
        AgentCommand::Preregister { mac, site } => {
            print_json(&agents.preregister(&mac, site.as_deref()).await?)
        }
        AgentCommand::Enable { mac } => print_json(&agents.enable(&mac).await?),
        AgentCommand::Disable { mac } => print_json(&agents.disable(&mac).await?),
        AgentCommand::Test { mac } => print_json(&agents.test(&mac).await?),
        AgentCommand::Associate { mac, site } => {
            print_json(&agents.associate(&mac, &site).await?)
        }
        AgentCommand::Remove { mac } => print_json(&agents.remove(&mac).await?),
        AgentCommand::Delete { mac } => print_json(&agents.delete(&mac).await?),
    }
}

async fn run_orgs(portal: &Portal, cmd: OrgCommand) -> Result<()> {
    let orgs = &portal.organizations;
    match cmd {
        OrgCommand::Get { id } => print_json(&orgs.get(&id).await?),
        OrgCommand::Create { file } => {
            let payload: OrganizationRequest = read_json(&file)?;
            print_json(&orgs.create(&payload).await?)
        }
        OrgCommand::Complete { file } => {
            let payload: OrganizationRequest = read_json(&file)?;
            print_json(&portal.auth_api().complete_organization(&payload).await?)
        }
        OrgCommand::Update { id, file } => {
            let changes: OrganizationUpdate = read_json(&file)?;
            print_json(&orgs.update(&id, &changes).await?)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
