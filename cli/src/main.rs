mod http;
mod storage;

use clap::{Args, Parser, Subcommand};
use guard::countdown::{Countdown, DEFAULT_REDIRECT_TARGET, Navigator};
use guard::runtime::spawn_countdown;
use guard::types::{LoginRequest, RegisterRequest};
use guard::verify::{verify_admin, verify_user};
use guard::{AccessLevel, AuthStore, DenyReason, GuardPhase, RouteGuard};

use crate::http::ApiClient;
use crate::storage::FileStorage;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("session storage failed: {0}")]
    Storage(#[from] guard::store::StoreError),
    #[error("login response carried no session")]
    MissingSession,
    #[error("not signed in; run `login` first")]
    NotSignedIn,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "storefront-cli", about = "Storefront session and route-guard CLI")]
struct Cli {
    #[arg(long, env = "STOREFRONT_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// JSON file holding the persisted session.
    #[arg(long, env = "STOREFRONT_STATE_FILE", default_value = ".storefront-session.json")]
    state_file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register(RegisterArgs),
    Login(LoginArgs),
    Logout,
    Whoami,
    /// Ask the server whether the stored token is still valid.
    Verify {
        #[arg(long)]
        admin: bool,
    },
    /// Evaluate the route guard for `path` and follow its redirect on denial.
    Visit(VisitArgs),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    /// Recovery answer used by password reset.
    #[arg(long)]
    answer: String,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "STOREFRONT_PASSWORD")]
    password: String,
}

#[derive(Args, Debug)]
struct VisitArgs {
    path: String,
    #[arg(long)]
    admin: bool,
    /// Redirect target on denial; defaults to `login` (`/` for admin pages).
    #[arg(long)]
    redirect: Option<String>,
}

/// Prints redirects instead of performing them.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, path: &str, from: &str) {
        println!("redirect -> {path} (from {from})");
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    let cli = Cli::parse();
    let api = ApiClient::new(&cli.base_url);
    let store = AuthStore::open(FileStorage::new(&cli.state_file));

    match cli.command {
        Command::Register(args) => run_register(&api, args).await,
        Command::Login(args) => run_login(&api, &store, args).await,
        Command::Logout => run_logout(&api, &store).await,
        Command::Whoami => run_whoami(&store),
        Command::Verify { admin } => run_verify(&api, &store, admin).await,
        Command::Visit(args) => run_visit(&api, &store, args).await,
    }
}

async fn run_register(api: &ApiClient, args: RegisterArgs) -> Result<(), CliError> {
    let req = RegisterRequest {
        name: args.name,
        email: args.email,
        password: args.password,
        phone: args.phone,
        address: args.address,
        answer: args.answer,
    };
    let resp = api.register(&req).await?;
    println!("{}", resp.message);
    Ok(())
}

async fn run_login(api: &ApiClient, store: &AuthStore<FileStorage>, args: LoginArgs) -> Result<(), CliError> {
    let state = api.login(&LoginRequest { email: args.email, password: args.password }).await?;
    let name = state.user.as_ref().map(|u| u.name.clone()).unwrap_or_default();
    store.write(state)?;
    println!("signed in as {name}");
    Ok(())
}

async fn run_logout(api: &ApiClient, store: &AuthStore<FileStorage>) -> Result<(), CliError> {
    if let Some(token) = store.authorization() {
        if let Err(e) = api.logout(&token).await {
            tracing::warn!(error = %e, "server logout failed; clearing local session anyway");
        }
    }
    store.logout()?;
    println!("signed out");
    Ok(())
}

fn run_whoami(store: &AuthStore<FileStorage>) -> Result<(), CliError> {
    let state = store.read();
    let user = state.user.ok_or(CliError::NotSignedIn)?;
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

async fn run_verify(api: &ApiClient, store: &AuthStore<FileStorage>, admin: bool) -> Result<(), CliError> {
    let token = store.authorization().ok_or(CliError::NotSignedIn)?;
    let ok = if admin { verify_admin(api, &token).await } else { verify_user(api, &token).await };
    println!("{}", if ok { "authorized" } else { "denied" });
    Ok(())
}

async fn run_visit(api: &ApiClient, store: &AuthStore<FileStorage>, args: VisitArgs) -> Result<(), CliError> {
    let level = if args.admin { AccessLevel::Admin } else { AccessLevel::User };
    let guard = RouteGuard::new(level, api);
    let phase = guard.evaluate(&store.token()).await;

    let GuardPhase::Denied(reason) = phase else {
        println!("{}: authorized", args.path);
        return Ok(());
    };
    println!("{}: {}", args.path, deny_message(reason));

    let target = redirect_target(level, args.redirect.as_deref());
    let mut task = spawn_countdown(Countdown::new(target, args.path), PrintNavigator);
    println!("redirecting in {}...", task.remaining());
    while let Some(n) = task.next().await {
        if n > 0 {
            println!("redirecting in {n}...");
        }
    }
    task.wait().await;
    Ok(())
}

fn deny_message(reason: DenyReason) -> &'static str {
    match reason {
        DenyReason::Unauthenticated => "not signed in",
        DenyReason::VerificationFailed => "session rejected by server",
        DenyReason::VerificationUnreachable => "could not verify session",
    }
}

fn redirect_target(level: AccessLevel, requested: Option<&str>) -> &str {
    match (requested, level) {
        (Some(target), _) => target,
        (None, AccessLevel::User) => DEFAULT_REDIRECT_TARGET,
        (None, AccessLevel::Admin) => "",
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
