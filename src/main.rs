use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;

use chat_session::auth::Navigation;
use chat_session::config::{load_config, print_schema};
use chat_session::error::AuthError;
use chat_session::models::{RegisterRequest, UserUpdateRequest};
use chat_session::startup::build_context;
use chat_session::state::SessionContext;
use chat_session::utils::logger::init_logging;

#[derive(Parser, Debug)]
#[command(name = "chat-session", about = "Chat service session client")]
struct Cli {
    #[arg(long, env = "CHAT_SESSION_CONFIG", default_value = "./config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session.
    Login {
        username_or_email: String,
        #[arg(long, env = "CHAT_SESSION_PASSWORD")]
        password: String,
    },
    /// Create an account (does not sign in).
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CHAT_SESSION_PASSWORD")]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Sign out and revoke the refresh token.
    Logout,
    /// Exchange the refresh token for a new pair.
    Refresh,
    /// Show the persisted session.
    Status,
    /// Fetch a user by id.
    User { id: i64 },
    /// Update profile fields of a user.
    UpdateProfile {
        id: i64,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Search users by keyword.
    Search { keyword: String },
    /// Run the route guard for a view.
    Navigate { view: String },
    /// Print the configuration JSON schema.
    Schema,
}

#[derive(Serialize)]
struct Status {
    authenticated: bool,
    access_token_live: bool,
    has_refresh_token: bool,
    user: Option<chat_session::models::User>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Schema = cli.command {
        if let Err(e) = print_schema() {
            eprintln!("Error printing schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = match load_config(&cli.config) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let context = match build_context(config) {
        Ok(context) => context,
        Err(e) => {
            error!("Failed to initialize session: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, &context).await {
        error!("Command failed: {}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, context: &SessionContext) -> Result<(), AuthError> {
    match command {
        Command::Login {
            username_or_email,
            password,
        } => {
            let payload = context.auth.login(&username_or_email, &password).await?;
            print_json(&payload.user)
        }
        Command::Register {
            username,
            email,
            password,
            full_name,
        } => {
            let request = RegisterRequest {
                username,
                email,
                password,
                full_name,
            };
            print_json(&context.auth.register(&request).await?)
        }
        Command::Logout => {
            context.auth.logout().await;
            println!("Logged out");
            Ok(())
        }
        Command::Refresh => {
            let payload = context.auth.refresh_token().await?;
            print_json(&payload.user)
        }
        Command::Status => print_json(&Status {
            authenticated: context.session.is_authenticated(),
            access_token_live: context.auth.is_authenticated(),
            has_refresh_token: context.auth.stored_refresh_token().is_some(),
            user: context.session.current_user(),
        }),
        Command::User { id } => print_json(&context.users.get_user(id).await?),
        Command::UpdateProfile {
            id,
            email,
            full_name,
            avatar_url,
        } => {
            let update = UserUpdateRequest {
                email,
                full_name,
                avatar_url,
            };
            if update.is_empty() {
                return Err(AuthError::Rejected("Nothing to update".to_string()));
            }
            print_json(&context.users.update_user(id, &update).await?)
        }
        Command::Search { keyword } => print_json(&context.users.search_users(&keyword).await?),
        Command::Navigate { view } => {
            match context.guard.check(&view).await {
                Navigation::Allow => println!("allow {}", view),
                Navigation::Redirect(target) => println!("redirect {}", target),
            }
            Ok(())
        }
        Command::Schema => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AuthError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AuthError::InvalidResponse(format!("cannot render output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
