//! ABI of the review facet of a space

use alloy::sol;

sol! {
    #[sol(rpc, all_derives)]
    contract SpaceReview {
        // Types
        struct ReviewContent {
            string comment;
            uint8 rating;
            uint40 createdAt;
            uint40 updatedAt;
        }

        // Errors
        error ReviewFacet__InvalidCommentLength();
        error ReviewFacet__InvalidRating();
        error ReviewFacet__ReviewAlreadyExists();
        error ReviewFacet__ReviewDoesNotExist();

        // Events
        event ReviewAdded(address indexed user, string comment, uint8 rating);
        event ReviewUpdated(address indexed user, string comment, uint8 rating);
        event ReviewDeleted(address indexed user);

        // Functions
        function getAllReviews() external view returns (address[] memory users, ReviewContent[] memory reviews);
        function getReview(address user) external view returns (ReviewContent memory);
        function setReview(uint8 action, bytes calldata data) external;
    }
}
