use std::fs;
use std::sync::Arc;

use anyhow::bail;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use skillswap::auth::issue_token;
use skillswap::cli::{
    AdminCommands, AuthCommands, AvailabilityCommands, FeedbackCommands, LevelArg,
    ProfileCommands, RequestCommands, SkillCommands, TokenCommands, UserCommands,
};
use skillswap::config::ServerConfig;
use skillswap::server::validation::validate_username;
use skillswap::server::{AppState, create_router};
use skillswap::store::{SqliteStore, Store};
use skillswap::types::User;

#[cfg(unix)]
fn set_restrictive_permissions(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to set permissions on {}: {e}", path.display());
    }
}

#[derive(Parser)]
#[command(name = "skillswap")]
#[command(about = "A skill exchange server and client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands (run on the server host)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },

    /// Manage saved server credentials
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Manage the skills you offer and want
    Skill {
        #[command(subcommand)]
        command: SkillCommands,
    },

    /// Manage the days and times you are available
    Availability {
        #[command(subcommand)]
        command: AvailabilityCommands,
    },

    /// Browse public profiles
    Browse {
        /// Match against names, locations and skill names
        #[arg(long)]
        search: Option<String>,

        /// Match against location
        #[arg(long)]
        location: Option<String>,

        /// Only profiles with a skill at this level
        #[arg(long, value_enum)]
        experience: Option<LevelArg>,
    },

    /// Send and answer swap requests
    Request {
        #[command(subcommand)]
        command: RequestCommands,
    },

    /// Rate completed swaps
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommands,
    },
}

fn run_init(data_dir: String, non_interactive: bool) -> anyhow::Result<()> {
    let config = ServerConfig {
        data_dir: data_dir.into(),
        ..ServerConfig::default()
    };
    fs::create_dir_all(&config.data_dir)?;

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let token_file = config.admin_token_path();

    if store.has_admin_token()? {
        bail!(
            "Server already initialized. Admin token exists at: {}",
            token_file.display()
        );
    }

    let (raw_token, _) = issue_token(&store, None, None)?;
    fs::write(&token_file, &raw_token)?;

    #[cfg(unix)]
    set_restrictive_permissions(&token_file);

    println!();
    println!("========================================");
    println!("Admin token (save this, it won't be shown again):");
    println!();
    println!("  {raw_token}");
    println!();
    println!("Token also written to: {}", token_file.display());
    println!("========================================");
    println!();

    if !non_interactive {
        create_default_user_prompt(&store)?;
    }

    Ok(())
}

fn create_default_user_prompt(store: &SqliteStore) -> anyhow::Result<()> {
    let create_user = inquire::Confirm::new("Would you like to create a default user?")
        .with_default(false)
        .prompt()?;

    if !create_user {
        return Ok(());
    }

    let username = inquire::Text::new("Username:")
        .with_validator(|input: &str| match validate_username(input) {
            Ok(()) => Ok(inquire::validator::Validation::Valid),
            Err(msg) => Ok(inquire::validator::Validation::Invalid(msg.into())),
        })
        .prompt()?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: username.clone(),
        created_at: Utc::now(),
    };
    store.create_user(&user)?;

    let (raw_token, _) = issue_token(store, Some(&user.id), None)?;

    println!();
    println!("========================================");
    println!("Created user '{username}' with token:");
    println!();
    println!("  {raw_token}");
    println!();
    println!("========================================");
    println!();

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let token_file = config.admin_token_path();
    if !token_file.exists() {
        bail!(
            "Server not initialized. Run 'skillswap admin init' first to create the database and admin token."
        );
    }

    let store = SqliteStore::new(config.db_path())?;
    if !store.has_admin_token()? {
        bail!(
            "Server not initialized. Run 'skillswap admin init' first to create the database and admin token."
        );
    }

    info!("Admin token available at {}", token_file.display());

    let state = Arc::new(AppState {
        store: Arc::new(store),
    });

    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn run_admin(command: AdminCommands) -> anyhow::Result<()> {
    match command {
        AdminCommands::Init {
            data_dir,
            non_interactive,
        } => run_init(data_dir, non_interactive),
        AdminCommands::User { command } => match command {
            UserCommands::Add {
                data_dir,
                username,
                create_token,
                non_interactive,
            } => skillswap::cli::run_user_add(data_dir, username, create_token, non_interactive),
            UserCommands::Remove {
                data_dir,
                user_id,
                non_interactive,
                yes,
            } => skillswap::cli::run_user_remove(data_dir, user_id, non_interactive, yes),
        },
        AdminCommands::Token { command } => match command {
            TokenCommands::Create {
                data_dir,
                user_id,
                expires_days,
                non_interactive,
                list,
                json,
            } => skillswap::cli::run_token_create(
                data_dir,
                user_id,
                expires_days,
                non_interactive,
                list,
                json,
            ),
            TokenCommands::Revoke {
                data_dir,
                token_id,
                non_interactive,
                yes,
            } => skillswap::cli::run_token_revoke(data_dir, token_id, non_interactive, yes),
        },
        AdminCommands::Info { data_dir, json } => skillswap::cli::run_info(data_dir, json),
    }
}

/// Client commands use reqwest's blocking client, which must not run on the
/// runtime's worker threads.
async fn run_blocking<F>(f: F) -> anyhow::Result<()>
where
    F: FnOnce() -> anyhow::Result<()> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("skillswap=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => run_admin(command)?,
        Commands::Serve {
            host,
            port,
            data_dir,
        } => {
            serve(ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
            })
            .await?;
        }
        Commands::Auth { command } => match command {
            AuthCommands::Login {
                server,
                token,
                non_interactive,
            } => {
                run_blocking(move || {
                    skillswap::cli::run_auth_login(server, token, non_interactive)
                })
                .await?
            }
            AuthCommands::Logout => skillswap::cli::run_auth_logout()?,
        },
        Commands::Profile { command } => match command {
            ProfileCommands::Show { user_id } => {
                run_blocking(move || skillswap::cli::run_profile_show(user_id)).await?
            }
            ProfileCommands::Set {
                full_name,
                location,
                bio,
                private,
                public,
                photo_url,
                non_interactive,
            } => {
                let edits = skillswap::cli::ProfileEdits {
                    full_name,
                    location,
                    bio,
                    photo_url,
                    is_public: match (private, public) {
                        (true, _) => Some(false),
                        (_, true) => Some(true),
                        _ => None,
                    },
                };
                run_blocking(move || skillswap::cli::run_profile_set(edits, non_interactive))
                .await?
            }
        },
        Commands::Skill { command } => match command {
            SkillCommands::List { skill_type } => {
                run_blocking(move || skillswap::cli::run_skill_list(skill_type)).await?
            }
            SkillCommands::Add {
                name,
                level,
                skill_type,
                description,
                priority,
                non_interactive,
            } => {
                run_blocking(move || {
                    skillswap::cli::run_skill_add(
                        name,
                        level,
                        skill_type,
                        description,
                        priority,
                        non_interactive,
                    )
                })
                .await?
            }
            SkillCommands::Remove {
                id,
                non_interactive,
                yes,
            } => {
                run_blocking(move || {
                    skillswap::cli::run_skill_remove(id, non_interactive, yes)
                })
                .await?
            }
        },
        Commands::Availability { command } => match command {
            AvailabilityCommands::Show => {
                run_blocking(skillswap::cli::run_availability_show).await?
            }
            AvailabilityCommands::Set {
                days,
                slots,
                non_interactive,
            } => {
                run_blocking(move || {
                    skillswap::cli::run_availability_set(days, slots, non_interactive)
                })
                .await?
            }
        },
        Commands::Browse {
            search,
            location,
            experience,
        } => {
            run_blocking(move || {
                skillswap::cli::run_browse(search, location, experience)
            })
            .await?
        }
        Commands::Request { command } => match command {
            RequestCommands::List { json } => {
                run_blocking(move || skillswap::cli::run_request_list(json)).await?
            }
            RequestCommands::Send {
                to,
                offer,
                want,
                message,
                non_interactive,
            } => {
                run_blocking(move || {
                    skillswap::cli::run_request_send(to, offer, want, message, non_interactive)
                })
                .await?
            }
            RequestCommands::Accept {
                id,
                non_interactive,
            } => {
                run_blocking(move || {
                    skillswap::cli::run_request_accept(id, non_interactive)
                })
                .await?
            }
            RequestCommands::Reject {
                id,
                non_interactive,
            } => {
                run_blocking(move || {
                    skillswap::cli::run_request_reject(id, non_interactive)
                })
                .await?
            }
            RequestCommands::Complete {
                id,
                non_interactive,
            } => {
                run_blocking(move || {
                    skillswap::cli::run_request_complete(id, non_interactive)
                })
                .await?
            }
        },
        Commands::Feedback { command } => match command {
            FeedbackCommands::Leave {
                request,
                rating,
                comment,
                no_swap_again,
                non_interactive,
            } => {
                run_blocking(move || {
                    skillswap::cli::run_feedback_leave(
                        request,
                        rating,
                        comment,
                        no_swap_again,
                        non_interactive,
                    )
                })
                .await?
            }
            FeedbackCommands::List { user } => {
                run_blocking(move || skillswap::cli::run_feedback_list(user)).await?
            }
        },
    }

    Ok(())
}
