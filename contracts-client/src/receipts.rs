//! Verification that a transaction receipt contains the review event a
//! `setReview` call was expected to emit

use alloy::rpc::types::TransactionReceipt;
use alloy_primitives::{Address, Log};
use alloy_sol_types::SolEvent;
use common::types::review::ReviewAction;

use crate::abi::SpaceReview::{ReviewAdded, ReviewDeleted, ReviewUpdated};
use crate::errors::ContractsClientError;

/// The error message emitted when no matching review event is in a receipt
pub const ERR_REVIEW_EVENT_NOT_FOUND: &str = "matching review event not found in receipt logs";

/// Find the review event matching the given action in a set of logs
///
/// Only logs emitted by the space are considered. An add or update matches on
/// the reviewer and the rating; a delete matches on the reviewer alone. Logs
/// that don't decode as the expected event are skipped.
pub fn find_review_event(
    logs: &[Log],
    space: Address,
    action: ReviewAction,
    user: Address,
    rating: u8,
) -> Result<(), ContractsClientError> {
    let found = logs.iter().filter(|log| log.address == space).any(|log| match action {
        ReviewAction::Add => ReviewAdded::decode_log(log)
            .is_ok_and(|event| event.user == user && event.rating == rating),
        ReviewAction::Update => ReviewUpdated::decode_log(log)
            .is_ok_and(|event| event.user == user && event.rating == rating),
        ReviewAction::Delete => ReviewDeleted::decode_log(log).is_ok_and(|event| event.user == user),
    });

    if found {
        Ok(())
    } else {
        Err(ContractsClientError::EventNotFound(ERR_REVIEW_EVENT_NOT_FOUND.to_string()))
    }
}

/// Find the review event matching the given action in a transaction receipt
pub fn find_review_event_in_receipt(
    receipt: &TransactionReceipt,
    space: Address,
    action: ReviewAction,
    user: Address,
    rating: u8,
) -> Result<(), ContractsClientError> {
    let logs: Vec<Log> = receipt.logs().iter().cloned().map(Log::from).collect();
    find_review_event(&logs, space, action, user, rating)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::LogData;

    use super::*;

    /// The space emitting the events in the tests
    const SPACE: Address = Address::repeat_byte(0x11);
    /// The reviewer in the tests
    const USER: Address = Address::repeat_byte(0x22);

    /// Build a log emitted by `address`
    fn log(address: Address, data: LogData) -> Log {
        Log { address, data }
    }

    /// A `ReviewAdded` log emitted by the space
    fn added(user: Address, rating: u8) -> Log {
        let event = ReviewAdded { user, comment: "nice".to_string(), rating };
        log(SPACE, event.encode_log_data())
    }

    #[test]
    fn test_finds_added_review() {
        let logs = vec![added(USER, 4)];
        assert!(find_review_event(&logs, SPACE, ReviewAction::Add, USER, 4).is_ok());
    }

    #[test]
    fn test_rating_and_user_must_match() {
        let logs = vec![added(USER, 4)];
        assert!(find_review_event(&logs, SPACE, ReviewAction::Add, USER, 5).is_err());
        let other = Address::repeat_byte(0x33);
        assert!(find_review_event(&logs, SPACE, ReviewAction::Add, other, 4).is_err());
    }

    #[test]
    fn test_ignores_other_emitters() {
        let event = ReviewAdded { user: USER, comment: String::new(), rating: 2 };
        let logs = vec![log(Address::repeat_byte(0x99), event.encode_log_data())];
        let err = find_review_event(&logs, SPACE, ReviewAction::Add, USER, 2).unwrap_err();
        assert!(err.to_string().contains(ERR_REVIEW_EVENT_NOT_FOUND));
    }

    #[test]
    fn test_skips_undecodable_logs() {
        let deleted = log(SPACE, ReviewDeleted { user: USER }.encode_log_data());
        let garbage = log(SPACE, LogData::new_unchecked(vec![], vec![1, 2, 3].into()));
        let logs = vec![garbage, added(USER, 1), deleted];

        assert!(find_review_event(&logs, SPACE, ReviewAction::Delete, USER, 0).is_ok());
        // An add event does not satisfy an update
        assert!(find_review_event(&logs, SPACE, ReviewAction::Update, USER, 1).is_err());
    }
}
