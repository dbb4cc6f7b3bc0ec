//! Handlers for each CLI command

use alloy::primitives::Address;
use common::types::{app::Permission, review::Review};
use contracts_client::{
    SpaceClient, abi::SpaceReview::SpaceReviewEvents, client::EventSubscription,
};
use eyre::{Result, eyre};
use tracing::{info, warn};
use util::{
    get_current_time_seconds,
    hex::{address_from_hex_string, address_to_hex_string, b256_from_hex_string},
};

/// Parse an address given on the command line
fn parse_address(addr: &str) -> Result<Address> {
    address_from_hex_string(addr).map_err(|e| eyre!("invalid address {addr}: {e}"))
}

/// Print a review as a single line of JSON
fn print_review(review: &Review) -> Result<()> {
    println!("{}", serde_json::to_string(review)?);
    Ok(())
}

/// List every review of the space
pub async fn list_reviews(client: &SpaceClient) -> Result<()> {
    let reviews = client.get_all_reviews().await?;
    for review in reviews.iter() {
        print_review(review)?;
    }

    info!("{} reviews", reviews.len());
    Ok(())
}

/// Show a single user's review of the space
pub async fn show_review(client: &SpaceClient, user: &str) -> Result<()> {
    let user = parse_address(user)?;
    match client.get_review(user).await? {
        Some(review) => print_review(&review),
        None => {
            println!("{user:#x} has not reviewed the space");
            Ok(())
        },
    }
}

/// Show the last review call a user made
pub async fn review_history(client: &SpaceClient, user: &str) -> Result<()> {
    let user = parse_address(user)?;
    let tx_hash = match client.find_latest_review_tx(user).await? {
        Some(tx_hash) => tx_hash,
        None => {
            println!("no review events for {user:#x}");
            return Ok(());
        },
    };

    let call = client.fetch_review_call(tx_hash).await?;
    match call.content {
        Some(content) => println!(
            "{tx_hash:#x}: {} rating={} comment={:?}",
            call.action, content.rating, content.comment
        ),
        None => println!("{tx_hash:#x}: {}", call.action),
    }

    Ok(())
}

/// Add, update, or delete the configured key's review
///
/// A review without content is a delete
pub async fn write_review(
    client: &SpaceClient,
    review: Option<(&str, u8)>,
    update: bool,
) -> Result<()> {
    let receipt = match review {
        Some((comment, rating)) if update => client.update_review(comment, rating).await?,
        Some((comment, rating)) => client.add_review(comment, rating).await?,
        None => client.delete_review().await?,
    };

    println!("review written in tx {:#x}", receipt.transaction_hash);
    Ok(())
}

/// List the apps installed into the space
pub async fn list_apps(client: &SpaceClient) -> Result<()> {
    let now = get_current_time_seconds();
    for app in client.get_installed_app_records().await? {
        let status = if app.is_expired_at(now) { "expired" } else { "active" };
        let addr = address_to_hex_string(&app.app);
        println!("{addr} id={:#x} expires={} ({status})", app.app_id, app.expiration);
    }

    Ok(())
}

/// Check whether an app's client is entitled to a permission
pub async fn app_entitled(
    client: &SpaceClient,
    app: &str,
    app_client: &str,
    permission: Permission,
) -> Result<()> {
    let app = parse_address(app)?;
    let app_client = parse_address(app_client)?;
    let entitled = client.is_app_entitled(app, app_client, permission).await?;

    println!("{entitled}");
    Ok(())
}

/// Show an app's registry definition, by version id or its latest version
pub async fn show_app_definition(
    client: &SpaceClient,
    app_id: Option<&str>,
    app: Option<&str>,
) -> Result<()> {
    let definition = match (app_id, app) {
        (Some(app_id), _) => {
            let app_id = b256_from_hex_string(app_id).map_err(|e| eyre!(e))?;
            client.get_app_by_id(app_id).await?
        },
        (None, Some(app)) => client.get_latest_app(parse_address(app)?).await?,
        (None, None) => return Err(eyre!("one of `--app-id` or `--app` is required")),
    };

    println!("{}", serde_json::to_string_pretty(&definition)?);
    Ok(())
}

/// List the facets of the space diamond
pub async fn list_facets(client: &SpaceClient) -> Result<()> {
    for facet in client.facets().await? {
        let selectors = facet.selectors.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        println!("{:#x}: {}", facet.facet, selectors.join(","));
    }

    Ok(())
}

/// Stream review events until interrupted or the watcher fails
pub async fn watch_reviews(
    client: &SpaceClient,
    from_block: Option<u64>,
    users: &[String],
) -> Result<()> {
    let users = users.iter().map(|u| parse_address(u)).collect::<Result<Vec<_>>>()?;
    let mut sub = client.watch_review_events(from_block, &users).await?;
    info!("watching review events");

    let mut interrupted = false;
    loop {
        tokio::select! {
            event = sub.recv() => match event {
                Some((event, log)) => print_review_event(&event, log.block_number),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                interrupted = true;
                break;
            },
        }
    }

    if interrupted {
        sub.unsubscribe();
        return Ok(());
    }

    stop_with_error(sub).await
}

/// Print a review event
fn print_review_event(event: &SpaceReviewEvents, block: Option<u64>) {
    let block = block.map(|b| b.to_string()).unwrap_or_else(|| "pending".to_string());
    match event {
        SpaceReviewEvents::ReviewAdded(e) => {
            println!("[{block}] added {:#x} rating={} {:?}", e.user, e.rating, e.comment)
        },
        SpaceReviewEvents::ReviewUpdated(e) => {
            println!("[{block}] updated {:#x} rating={} {:?}", e.user, e.rating, e.comment)
        },
        SpaceReviewEvents::ReviewDeleted(e) => println!("[{block}] deleted {:#x}", e.user),
    }
}

/// Surface the error a finished watcher stopped on
async fn stop_with_error(mut sub: EventSubscription<SpaceReviewEvents>) -> Result<()> {
    match sub.err().await {
        Some(e) => Err(e.into()),
        None => {
            warn!("review watcher stopped");
            Ok(())
        },
    }
}
