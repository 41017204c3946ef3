mod config;
mod net;
mod pages;
mod state;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use session::{FileTokenStore, Route, Session, StoreError};
use tracing_subscriber::EnvFilter;

use crate::config::{ClientConfig, ConfigError};
use crate::net::api::ApiClient;
use crate::net::transport::{ReqwestTransport, TransportError};
use crate::pages::dashboard::{DELETE_PROMPT, Dashboard, DashboardCommand, HELP, parse_command, render_table};
use crate::state::credentials::CredentialsForm;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client error: {0}")]
    Transport(#[from] TransportError),
    #[error("session storage error: {0}")]
    Store(#[from] StoreError),
    #[error("not logged in; run `taskdesk login` first")]
    LoginRequired,
    #[error("{0}")]
    Rejected(String),
    #[error("no task with id {0}")]
    UnknownPosition(i64),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "taskdesk", about = "Task list client for the positions API")]
struct Cli {
    /// API base URL; overrides TASKDESK_API_BASE.
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Session token file; overrides TASKDESK_TOKEN_FILE.
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token.
    Login(CredentialArgs),
    /// Create an account. Does not log in.
    Register(CredentialArgs),
    /// Forget the stored session token.
    Logout,
    /// Show who the stored session belongs to.
    Whoami,
    Positions(PositionsCommand),
    /// Interactive task dashboard.
    Dashboard,
}

#[derive(Args, Debug)]
struct CredentialArgs {
    username: String,

    /// Read from stdin when omitted.
    #[arg(long, env = "TASKDESK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct PositionsCommand {
    #[command(subcommand)]
    command: PositionsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PositionsSubcommand {
    List,
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?.with_overrides(cli.api_base, cli.token_file)?;
    tracing::debug!(api_base = %config.api_base, token_file = %config.token_file.display(), "client configured");

    let session = Session::new(Arc::new(FileTokenStore::new(config.token_file.clone())));
    let transport = ReqwestTransport::new(&config)?;
    let api = ApiClient::new(Arc::new(transport), session);

    match cli.command {
        Command::Login(args) => run_login(&api, args).await,
        Command::Register(args) => run_register(&api, args).await,
        Command::Logout => {
            api.session().logout()?;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            run_whoami(api.session());
            Ok(())
        }
        Command::Positions(positions) => run_positions(api, positions.command).await,
        Command::Dashboard => run_dashboard(api).await,
    }
}

// =============================================================================
// ACCOUNT COMMANDS
// =============================================================================

fn credentials_form(args: CredentialArgs) -> Result<CredentialsForm, CliError> {
    let password = match args.password {
        Some(password) => password,
        None => prompt("password: ")?,
    };
    Ok(CredentialsForm::new(&args.username, &password))
}

async fn run_login(api: &ApiClient, args: CredentialArgs) -> Result<(), CliError> {
    let mut form = credentials_form(args)?;
    match pages::login::submit(api, &mut form).await {
        Some(_) => {
            println!("logged in as {}", api.session().identity().username);
            Ok(())
        }
        None => Err(form_error(form.error)),
    }
}

async fn run_register(api: &ApiClient, args: CredentialArgs) -> Result<(), CliError> {
    let mut form = credentials_form(args)?;
    match pages::register::submit(api, &mut form).await {
        Some(_) => {
            println!("registered {}; now run `taskdesk login`", form.username);
            Ok(())
        }
        None => Err(form_error(form.error)),
    }
}

fn run_whoami(current: &Session) {
    let identity = current.identity();
    if identity.is_anonymous() {
        println!("{} (not logged in)", identity.username);
        return;
    }
    match &identity.role {
        Some(role) => println!("{} ({role})", identity.username),
        None => println!("{}", identity.username),
    }
    let now = session::claims::now_secs();
    if identity.is_expired(now) {
        println!("token has expired; the server will ask for a new login");
    } else if let Some(exp) = identity.expires_at {
        let remaining = exp.saturating_sub(now);
        println!("token expires in {}m", remaining / 60);
    }
}

fn form_error(error: Option<String>) -> CliError {
    CliError::Rejected(error.unwrap_or_else(|| "request failed".to_owned()))
}

// =============================================================================
// POSITIONS
// =============================================================================

async fn open_dashboard(api: ApiClient) -> Result<Dashboard, CliError> {
    Dashboard::open(api).await.map_err(|_| CliError::LoginRequired)
}

fn navigation(route: Option<Route>) -> Result<(), CliError> {
    match route {
        Some(_) => Err(CliError::LoginRequired),
        None => Ok(()),
    }
}

fn page_result(page: &Dashboard) -> Result<(), CliError> {
    match &page.state().error {
        Some(error) => Err(CliError::Rejected(error.clone())),
        None => Ok(()),
    }
}

async fn run_positions(api: ApiClient, command: PositionsSubcommand) -> Result<(), CliError> {
    let mut page = open_dashboard(api).await?;
    page_result(&page)?;

    match command {
        PositionsSubcommand::List => {}
        PositionsSubcommand::Create { code, name } => {
            page.set_code(&code);
            page.set_name(&name);
            navigation(page.submit().await)?;
        }
        PositionsSubcommand::Update { id, code, name } => {
            if !page.start_edit(id) {
                return Err(CliError::UnknownPosition(id));
            }
            if let Some(code) = code {
                page.set_code(&code);
            }
            if let Some(name) = name {
                page.set_name(&name);
            }
            navigation(page.submit().await)?;
        }
        PositionsSubcommand::Delete { id, yes } => {
            if page.state().find(id).is_none() {
                return Err(CliError::UnknownPosition(id));
            }
            let route = if yes { page.delete(id, |_| true).await } else { page.delete(id, confirm_delete).await };
            navigation(route)?;
        }
    }

    page_result(&page)?;
    print!("{}", render_table(page.state()));
    Ok(())
}

// =============================================================================
// INTERACTIVE DASHBOARD
// =============================================================================

async fn run_dashboard(api: ApiClient) -> Result<(), CliError> {
    let mut page = open_dashboard(api).await?;
    println!("{}", page.render());
    println!("type `help` for commands");

    loop {
        let line = prompt("> ")?;
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        let route = match command {
            DashboardCommand::Refresh => page.refresh().await,
            DashboardCommand::Code(code) => {
                page.set_code(&code);
                None
            }
            DashboardCommand::Name(name) => {
                page.set_name(&name);
                None
            }
            DashboardCommand::Save => page.submit().await,
            DashboardCommand::Edit(id) => {
                if !page.start_edit(id) {
                    eprintln!("no task with id {id}");
                }
                None
            }
            DashboardCommand::Cancel => {
                page.cancel_edit();
                None
            }
            DashboardCommand::Delete(id) => page.delete(id, confirm_delete).await,
            DashboardCommand::Logout => Some(page.logout()?),
            DashboardCommand::Help => {
                println!("{HELP}");
                continue;
            }
            DashboardCommand::Quit => return Ok(()),
        };

        if let Some(route) = route {
            println!("session ended; run `taskdesk login` ({})", route.path());
            return Ok(());
        }
        println!("{}", page.render());
    }
}

// =============================================================================
// TERMINAL
// =============================================================================

fn prompt(label: &str) -> Result<String, CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(label.as_bytes())?;
    stdout.flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(CliError::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn confirm_delete(id: i64) -> bool {
    match prompt(&format!("{DELETE_PROMPT} (#{id}) [y/N] ")) {
        Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            tracing::warn!(error = %e, "confirmation prompt failed; not deleting");
            false
        }
    }
}
