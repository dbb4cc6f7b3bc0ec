//! ABI of the space diamond proxy, including the cut, loupe, and
//! introspection facets every diamond is deployed with

use alloy::sol;

sol! {
    #[sol(rpc, all_derives)]
    contract Diamond {
        // Types
        enum FacetCutAction {
            Add,
            Replace,
            Remove
        }

        struct FacetCut {
            address facetAddress;
            FacetCutAction action;
            bytes4[] functionSelectors;
        }

        struct Facet {
            address facet;
            bytes4[] selectors;
        }

        // Errors
        error DiamondCut_FunctionAlreadyExists(bytes4 selector);
        error DiamondCut_FunctionDoesNotExist(address facet);
        error DiamondCut_FunctionFromSameFacetAlreadyExists(bytes4 selector);
        error DiamondCut_ImmutableFacet();
        error DiamondCut_InvalidContract(address contract_);
        error DiamondCut_InvalidFacet(address facet);
        error DiamondCut_InvalidFacetCutAction();
        error DiamondCut_InvalidFacetCutLength(address facet);
        error DiamondCut_InvalidFacetRemoval(address facet, bytes4 selector);
        error DiamondCut_InvalidFacetSelectors(address facet);
        error DiamondCut_InvalidSelector();
        error Initializable_InInitializingState();
        error Initializable_NotInInitializingState();
        error Introspection_AlreadySupported();
        error Introspection_NotSupported();
        error Proxy__ImplementationIsNotContract();

        // Events
        event DiamondCut(FacetCut[] facetCuts, address init, bytes initPayload);
        event Initialized(uint32 version);
        event InterfaceAdded(bytes4 indexed interfaceId);
        event InterfaceRemoved(bytes4 indexed interfaceId);

        // Functions
        function diamondCut(FacetCut[] memory facetCuts, address init, bytes memory initPayload) external;
        function facets() external view returns (Facet[] memory);
        function facetFunctionSelectors(address facet) external view returns (bytes4[] memory);
        function facetAddresses() external view returns (address[] memory);
        function facetAddress(bytes4 selector) external view returns (address);
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
    }
}
