//! Reviews left on a space by its members

use std::{fmt::Display, str::FromStr};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A single user's review of a space
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// The user that left the review
    pub user: Address,
    /// The free-form comment
    pub comment: String,
    /// The rating given by the user
    pub rating: u8,
    /// The unix timestamp (seconds) at which the review was created
    pub created_at: u64,
    /// The unix timestamp (seconds) at which the review was last updated
    pub updated_at: u64,
}

impl Review {
    /// Whether the review has been edited since it was created
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }
}

/// The action taken on a review by `setReview`
///
/// The discriminants are the `uint8` values the contract expects
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ReviewAction {
    /// Add a new review
    Add = 0,
    /// Update an existing review
    Update = 1,
    /// Delete an existing review
    Delete = 2,
}

impl ReviewAction {
    /// The `uint8` value of the action
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ReviewAction {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ReviewAction::Add),
            1 => Ok(ReviewAction::Update),
            2 => Ok(ReviewAction::Delete),
            x => Err(format!("invalid review action: {x}")),
        }
    }
}

impl Display for ReviewAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewAction::Add => write!(f, "add"),
            ReviewAction::Update => write!(f, "update"),
            ReviewAction::Delete => write!(f, "delete"),
        }
    }
}

impl FromStr for ReviewAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(ReviewAction::Add),
            "update" => Ok(ReviewAction::Update),
            "delete" => Ok(ReviewAction::Delete),
            _ => Err(format!("invalid review action: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_u8_mapping() {
        for action in [ReviewAction::Add, ReviewAction::Update, ReviewAction::Delete] {
            assert_eq!(ReviewAction::try_from(action.as_u8()).unwrap(), action);
            assert_eq!(action.to_string().parse::<ReviewAction>().unwrap(), action);
        }

        assert!(ReviewAction::try_from(3).is_err());
    }

    #[test]
    fn test_review_serde() {
        let review = Review {
            user: Address::with_last_byte(7),
            comment: "great space".to_string(),
            rating: 5,
            created_at: 100,
            updated_at: 150,
        };
        assert!(review.is_edited());

        let json = serde_json::to_string(&review).unwrap();
        let recovered: Review = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, review);
    }
}
