//! session-probe — 会话与接口连通性诊断工具
//!
//! Usage:
//!   session-probe whoami                       Bootstrap the session and print it
//!   session-probe login <email> <password>     Log in and print the canonical user
//!   session-probe get <path>                   GET an endpoint and print its payload
//!
//! Options (any command):
//!   --base-url <url>      Overrides APP_API_BASE_URL
//!   --timeout-ms <ms>     Overrides APP_API_TIMEOUT_MS

use app_api_client::{ApiClient, AppError, AuthSessionStore, ClientConfig, ConfigHandle, Session};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let config = resolve_config(&args[2..]);
    let client = match ApiClient::new(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let positional = positional_args(&args[2..]);
    let result = match args[1].as_str() {
        "whoami" => cmd_whoami(client).await,
        "login" => cmd_login(client, &positional).await,
        "get" => cmd_get(client, &positional).await,
        "version" | "--version" | "-V" => {
            println!("session-probe {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        if let Some(id) = &e.request_id {
            eprintln!("request id: {id}");
        }
        std::process::exit(2);
    }
}

fn print_usage() {
    println!(
        r#"session-probe — session and endpoint diagnostics

USAGE:
    session-probe <COMMAND> [OPTIONS]

COMMANDS:
    whoami                      Bootstrap the session and print it
    login <email> <password>    Log in and print the canonical user
    get <path>                  GET an endpoint and print its payload
    version                     Show version information
    help                        Show this help message

OPTIONS:
    --base-url <url>            API base URL
    --timeout-ms <ms>           Default request timeout

ENVIRONMENT:
    APP_API_BASE_URL            API base URL (default http://localhost:8080)
    APP_API_TIMEOUT_MS          Default request timeout (default 30000)
    RUST_LOG                    Log filter (default warn)"#
    );
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn positional_args(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--base-url" || arg == "--timeout-ms" {
            iter.next();
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

fn resolve_config(args: &[String]) -> ConfigHandle {
    let env_config = ClientConfig::from_env();
    let base_url = flag_value(args, "--base-url").unwrap_or(&env_config.base_url);
    let timeout = flag_value(args, "--timeout-ms")
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(env_config.timeout);
    let handle = ConfigHandle::default();
    handle.configure(base_url, Some(timeout));
    handle
}

fn print_session(session: &Session) {
    match session {
        Session::Authenticated(user) => println!(
            "authenticated: {} <{}> role={} level={} verified={}",
            user.label(),
            user.email,
            user.role,
            user.level,
            user.email_verified
        ),
        Session::Anonymous => println!("anonymous"),
        Session::Loading => println!("loading"),
    }
}

async fn cmd_whoami(client: ApiClient) -> Result<(), AppError> {
    let store = AuthSessionStore::new(client);
    print_session(&store.bootstrap().await);
    Ok(())
}

async fn cmd_login(client: ApiClient, args: &[&str]) -> Result<(), AppError> {
    let (email, password) = match args {
        [email, password, ..] => (*email, *password),
        _ => {
            eprintln!("usage: session-probe login <email> <password>");
            std::process::exit(1);
        }
    };
    let store = AuthSessionStore::new(client);
    store.subscribe(|s| tracing::info!(session = ?s, "session changed"));
    store.login(email, password).await?;
    print_session(&store.session());
    Ok(())
}

async fn cmd_get(client: ApiClient, args: &[&str]) -> Result<(), AppError> {
    let Some(path) = args.first() else {
        eprintln!("usage: session-probe get <path>");
        std::process::exit(1);
    };
    match client.get(path).await? {
        Some(data) => println!(
            "{}",
            serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string())
        ),
        None => println!("(no content)"),
    }
    Ok(())
}
