use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client_core::{
    ClubForm, ControllerError, ControllerEvent, HttpClubApi, LoginForm, PlayerForm,
    SessionController, SignupForm, TeamForm,
};
use shared::domain::{Role, TeamId};
use storage::Storage;
use tokio::sync::broadcast;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::ClientSettings;

/// Command-line front end for the GreenLink club manager.
#[derive(Parser, Debug)]
#[command(name = "greenlink", version)]
struct Cli {
    /// Overrides `base_url` from greenlink.toml / GREENLINK__BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: String,
        /// PLAYER or MANAGER.
        #[arg(long, default_value = "PLAYER")]
        role: Role,
    },
    CreateClub {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    JoinClub {
        code: String,
    },
    /// Show who is signed in and the selected club.
    Status,
    Teams,
    CreateTeam {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        age_group: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Players {
        #[arg(long)]
        team: i64,
    },
    AddPlayer {
        #[arg(long)]
        team: i64,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        position: String,
        #[arg(long, default_value = "")]
        jersey: String,
    },
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = ClientSettings::load()?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
        settings.validate()?;
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let store = Storage::new(&settings.store_url).await?;
    let api = HttpClubApi::new(settings.base_url.as_str())?;
    let controller = SessionController::new(Arc::new(api), Arc::new(store));
    let mut events = controller.subscribe_events();

    let restored = controller.restore().await?;
    debug!(screen = restored.name(), "session restored");

    let outcome = run(&controller, cli.command).await;
    print_notices(&mut events);
    outcome.map_err(|err| anyhow!(err.user_message()))
}

async fn run(controller: &SessionController, command: Command) -> Result<(), ControllerError> {
    match command {
        Command::Login { username, password } => {
            let session = controller.login(LoginForm { username, password }).await?;
            println!("Welcome back, {}!", session.full_name);
        }
        Command::Signup {
            username,
            email,
            password,
            full_name,
            role,
        } => {
            let session = controller
                .signup(SignupForm {
                    username,
                    email,
                    password,
                    full_name,
                    role,
                })
                .await?;
            println!("Account created for {}.", session.full_name);
        }
        Command::CreateClub {
            name,
            description,
            location,
        } => {
            controller
                .create_club(ClubForm {
                    name,
                    description,
                    location,
                })
                .await?;
        }
        Command::JoinClub { code } => {
            controller.join_club(&code).await?;
        }
        Command::Status => {}
        Command::Teams => {
            let teams = controller.go_to_teams().await?;
            println!("{}", render::teams(&teams));
        }
        Command::CreateTeam {
            name,
            age_group,
            description,
        } => {
            controller
                .create_team(TeamForm {
                    name,
                    age_group,
                    description,
                })
                .await?;
            println!("{}", render::teams(controller.snapshot().await.teams()));
        }
        Command::Players { team } => {
            controller.go_to_teams().await?;
            let players = controller.open_team(TeamId(team)).await?;
            println!("{}", render::players(&players));
        }
        Command::AddPlayer {
            team,
            name,
            position,
            jersey,
        } => {
            controller.go_to_teams().await?;
            controller.open_team(TeamId(team)).await?;
            let player = controller
                .add_player(PlayerForm {
                    name,
                    position,
                    jersey_number: jersey,
                })
                .await?;
            println!("Added {} to the roster.", player.name);
            println!("{}", render::players(controller.snapshot().await.players()));
        }
        Command::Logout => {
            controller.logout().await;
            println!("Signed out.");
        }
    }
    println!("{}", render::status(&controller.snapshot().await));
    Ok(())
}

fn print_notices(events: &mut broadcast::Receiver<ControllerEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            ControllerEvent::Notice(message) => println!("{message}"),
            ControllerEvent::Error { category, message } => {
                debug!(?category, %message, "operation failed");
            }
            ControllerEvent::StateChanged(_) => {}
        }
    }
}
