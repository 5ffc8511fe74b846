//! Toolcrib CLI - headless front-end for the equipment request system.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (persists the session under the state directory)
//! toolcrib account login -e user@test.com -p 1111
//!
//! # Browse the catalog and fill the cart
//! toolcrib equipment list
//! toolcrib cart add 1 -q 2
//! toolcrib cart show
//!
//! # Submit the cart as a request and track it
//! toolcrib request submit
//! toolcrib request list
//!
//! # Administrators: manage inventory and decide requests
//! toolcrib equipment create -n "Label Printer" -c OFFICE -s 4 --image label.png
//! toolcrib admin requests
//! toolcrib admin approve 10
//! toolcrib admin reject 11 -r "budget exceeded"
//! ```
//!
//! # Environment Variables
//!
//! - `TOOLCRIB_API_URL` - Base URL of the equipment backend (required)
//! - `TOOLCRIB_STATE_DIR` - Directory for the persisted session and cart
//! - `RUST_LOG` - Log filter (default: info)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use toolcrib_client::{AppState, ClientConfig};
use toolcrib_core::{EquipmentId, RequestId};

mod commands;

#[derive(Parser)]
#[command(name = "toolcrib")]
#[command(author, version, about = "Toolcrib equipment request tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign up, sign out, or show the current session
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Browse or (as admin) manage the equipment catalog
    Equipment {
        #[command(subcommand)]
        action: EquipmentAction,
    },
    /// Manage the cart of pending request lines
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Submit the cart and track your requests
    Request {
        #[command(subcommand)]
        action: RequestAction,
    },
    /// Administrator request processing
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Register a new account
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and clear local state
    Logout,
    /// Show the signed-in identity
    Whoami,
}

#[derive(Subcommand)]
enum EquipmentAction {
    /// List the catalog, optionally filtered by keyword
    List {
        /// Search keyword
        #[arg(short, long)]
        keyword: Option<String>,
    },
    /// Show one catalog item
    Show {
        /// Equipment id
        id: EquipmentId,
    },
    /// Create a catalog item (admin)
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Category label
        #[arg(short, long)]
        category: String,

        /// Units in stock
        #[arg(short, long)]
        stock: u32,

        /// Free-form description
        #[arg(short, long)]
        description: Option<String>,

        /// Mark the item unavailable for requests
        #[arg(long)]
        unavailable: bool,

        /// Path to an image file to upload
        #[arg(long)]
        image: Option<std::path::PathBuf>,
    },
    /// Update a catalog item (admin)
    Update {
        /// Equipment id
        id: EquipmentId,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Category label
        #[arg(short, long)]
        category: String,

        /// Units in stock
        #[arg(short, long)]
        stock: u32,

        /// Free-form description
        #[arg(short, long)]
        description: Option<String>,

        /// Mark the item unavailable for requests
        #[arg(long)]
        unavailable: bool,

        /// Path to an image file to upload
        #[arg(long)]
        image: Option<std::path::PathBuf>,
    },
    /// Delete a catalog item (admin)
    Delete {
        /// Equipment id
        id: EquipmentId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a catalog item to the cart
    Add {
        /// Equipment id
        id: EquipmentId,

        /// Quantity to request (clamped to the item's stock)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line from the cart
    Remove {
        /// Equipment id
        id: EquipmentId,
    },
    /// Change a line's quantity (clamped to the stock snapshot)
    SetQuantity {
        /// Equipment id
        id: EquipmentId,

        /// New quantity
        quantity: u32,
    },
    /// Empty the cart
    Clear,
    /// Show the cart contents
    Show,
}

#[derive(Subcommand)]
enum RequestAction {
    /// Submit the cart as an equipment request
    Submit,
    /// List your own requests
    List,
}

#[derive(Subcommand)]
enum AdminAction {
    /// List every request in the system
    Requests,
    /// Approve a pending request
    Approve {
        /// Request id
        id: RequestId,
    },
    /// Reject a pending request with a reason
    Reject {
        /// Request id
        id: RequestId,

        /// Reason shown to the requester
        #[arg(short, long)]
        reason: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing; default to info so command output is visible.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Account { action } => match action {
            AccountAction::Login { email, password } => {
                commands::account::login(&state, &email, password).await?;
            }
            AccountAction::Signup {
                name,
                email,
                password,
            } => {
                commands::account::signup(&state, &name, &email, password).await?;
            }
            AccountAction::Logout => commands::account::logout(&state),
            AccountAction::Whoami => commands::account::whoami(&state)?,
        },
        Commands::Equipment { action } => match action {
            EquipmentAction::List { keyword } => {
                commands::equipment::list(&state, keyword.as_deref()).await?;
            }
            EquipmentAction::Show { id } => commands::equipment::show(&state, id).await?,
            EquipmentAction::Create {
                name,
                category,
                stock,
                description,
                unavailable,
                image,
            } => {
                commands::equipment::create(
                    &state,
                    commands::equipment::FormArgs {
                        name,
                        category,
                        stock,
                        description,
                        available: !unavailable,
                        image,
                    },
                )
                .await?;
            }
            EquipmentAction::Update {
                id,
                name,
                category,
                stock,
                description,
                unavailable,
                image,
            } => {
                commands::equipment::update(
                    &state,
                    id,
                    commands::equipment::FormArgs {
                        name,
                        category,
                        stock,
                        description,
                        available: !unavailable,
                        image,
                    },
                )
                .await?;
            }
            EquipmentAction::Delete { id } => commands::equipment::delete(&state, id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Add { id, quantity } => commands::cart::add(&state, id, quantity).await?,
            CartAction::Remove { id } => commands::cart::remove(&state, id)?,
            CartAction::SetQuantity { id, quantity } => {
                commands::cart::set_quantity(&state, id, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(&state)?,
            CartAction::Show => commands::cart::show(&state)?,
        },
        Commands::Request { action } => match action {
            RequestAction::Submit => commands::requests::submit(&state).await?,
            RequestAction::List => commands::requests::list_mine(&state).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Requests => commands::requests::list_all(&state).await?,
            AdminAction::Approve { id } => commands::requests::approve(&state, id).await?,
            AdminAction::Reject { id, reason } => {
                commands::requests::reject(&state, id, &reason).await?;
            }
        },
    }
    Ok(())
}
