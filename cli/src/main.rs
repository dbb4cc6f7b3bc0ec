//! A command line client for a Towns space
//!
//! Reads reviews, installed apps, and diamond facets; submits reviews; and
//! watches review events as they are emitted

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(unsafe_code)]

mod commands;

use clap::{Parser, Subcommand};
use common::types::app::Permission;
use config::{ConfigArgs, parse_command_line_args, parse_config_from_args};
use contracts_client::SpaceClient;
use eyre::{Result, eyre};
use tracing::info;

use crate::commands::{
    app_entitled, list_apps, list_facets, list_reviews, review_history, show_app_definition,
    show_review, watch_reviews, write_review,
};

/// The CLI
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The connection and logging options
    #[command(flatten)]
    config: ConfigArgs,
    /// The command to run
    #[command(subcommand)]
    command: Command,
}

/// The commands the CLI supports
#[derive(Debug, Subcommand)]
enum Command {
    /// List every review of the space
    Reviews,
    /// Show a single user's review of the space
    Review {
        /// The reviewer's address
        user: String,
    },
    /// Show the last review call a user made, recovered from its calldata
    ReviewHistory {
        /// The reviewer's address
        user: String,
    },
    /// Add a review of the space from the configured key
    AddReview {
        /// The review text
        #[arg(long)]
        comment: String,
        /// The rating, from 1 to 5
        #[arg(long)]
        rating: u8,
    },
    /// Replace the configured key's review of the space
    UpdateReview {
        /// The review text
        #[arg(long)]
        comment: String,
        /// The rating, from 1 to 5
        #[arg(long)]
        rating: u8,
    },
    /// Delete the configured key's review of the space
    DeleteReview,
    /// List the apps installed into the space
    Apps,
    /// Check whether an app's client is entitled to a permission
    AppEntitled {
        /// The app's address
        #[arg(long)]
        app: String,
        /// The app's client key
        #[arg(long)]
        client: String,
        /// The permission name, e.g. `Read`
        #[arg(long)]
        permission: Permission,
    },
    /// Show an app's definition from the app registry
    AppDefinition {
        /// The registry id of an app version
        #[arg(long, conflicts_with = "app")]
        app_id: Option<String>,
        /// The app's address, resolving its latest version
        #[arg(long)]
        app: Option<String>,
    },
    /// List the facets of the space diamond
    Facets,
    /// Stream review events until interrupted
    WatchReviews {
        /// The block to start watching from, defaults to the next block
        #[arg(long)]
        from_block: Option<u64>,
        /// Only stream events from these reviewers
        #[arg(long)]
        user: Vec<String>,
    },
}

/// Main
#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = parse_command_line_args().map_err(|e| eyre!(e))?;
    let config = parse_config_from_args(&cli.config).map_err(|e| eyre!(e))?;
    config.setup_telemetry()?;

    let client = SpaceClient::new(config.client.clone())?;
    info!("connected to space {:#x} on {}", client.space_addr(), config.chain());

    match cli.command {
        Command::Reviews => list_reviews(&client).await,
        Command::Review { user } => show_review(&client, &user).await,
        Command::ReviewHistory { user } => review_history(&client, &user).await,
        Command::AddReview { comment, rating } => {
            write_review(&client, Some((comment.as_str(), rating)), false).await
        },
        Command::UpdateReview { comment, rating } => {
            write_review(&client, Some((comment.as_str(), rating)), true).await
        },
        Command::DeleteReview => write_review(&client, None, false).await,
        Command::Apps => list_apps(&client).await,
        Command::AppEntitled { app, client: app_client, permission } => {
            app_entitled(&client, &app, &app_client, permission).await
        },
        Command::AppDefinition { app_id, app } => {
            show_app_definition(&client, app_id.as_deref(), app.as_deref()).await
        },
        Command::Facets => list_facets(&client).await,
        Command::WatchReviews { from_block, user } => {
            watch_reviews(&client, from_block, &user).await
        },
    }
}
