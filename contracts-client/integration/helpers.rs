//! Helpers shared by the integration tests

use std::time::Duration;

use alloy::primitives::Address;
use contracts_client::{SpaceClient, client::EventSubscription};
use eyre::{Result, eyre};
use rand::{Rng, distributions::Alphanumeric, thread_rng};

/// How long to wait on a watcher before failing a test
const WATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Generate a random review comment, so reruns never observe stale state
pub fn random_comment() -> String {
    let suffix: String = thread_rng().sample_iter(&Alphanumeric).take(16).map(char::from).collect();
    format!("integration review {suffix}")
}

/// Generate a random address, one the devnet has never seen
pub fn random_address() -> Address {
    Address::from(thread_rng().r#gen::<[u8; 20]>())
}

/// Remove the sender's review of the space, if it left one
pub async fn clear_review(client: &SpaceClient) -> Result<()> {
    let sender = client.sender().ok_or_else(|| eyre!("client has no signer"))?;
    if client.get_review(sender).await?.is_some() {
        client.delete_review().await?;
    }

    Ok(())
}

/// Wait for the next event of a subscription
pub async fn next_event<T>(sub: &mut EventSubscription<T>) -> Result<T> {
    match tokio::time::timeout(WATCH_TIMEOUT, sub.recv()).await {
        Ok(Some((event, _log))) => Ok(event),
        Ok(None) => match sub.err().await {
            Some(e) => Err(e.into()),
            None => Err(eyre!("subscription closed")),
        },
        Err(_) => Err(eyre!("timed out waiting for an event")),
    }
}
