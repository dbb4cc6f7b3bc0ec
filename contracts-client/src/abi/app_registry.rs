//! ABI definitions for the app registry
//!
//! Note that these definitions only contain the subset of the registry used
//! to look up and install apps into a space, not its admin interface.

use alloy::sol;

sol! {
    #[sol(rpc, all_derives)]
    contract IAppRegistry {
        // Types
        struct ManifestExecutionFunction {
            // the selector the app may execute through the account
            bytes4 executionSelector;
            bool skipRuntimeValidation;
            bool allowGlobalValidation;
        }

        struct ManifestExecutionHook {
            bytes4 executionSelector;
            uint32 entityId;
            bool isPreHook;
            bool isPostHook;
        }

        struct ExecutionManifest {
            ManifestExecutionFunction[] executionFunctions;
            ManifestExecutionHook[] executionHooks;
            bytes4[] interfaceIds;
        }

        struct App {
            bytes32 appId;
            address module;
            address owner;
            address client;
            bytes32[] permissions;
            ExecutionManifest manifest;
            uint48 duration;
        }

        // Errors
        error AppAlreadyRegistered();
        error AppDoesNotImplementInterface();
        error AppNotInstalled();
        error AppNotRegistered();
        error AppRevoked();
        error BannedApp();
        error ClientAlreadyRegistered();
        error InsufficientPayment();
        error InvalidAddressInput();
        error InvalidAppId();
        error InvalidAppName();
        error InvalidArrayInput();
        error InvalidDuration();
        error InvalidPrice();
        error NotAllowed();
        error NotAppOwner();

        // Events
        event AppInstalled(address indexed app, address indexed account, bytes32 indexed appId);
        event AppRenewed(address indexed app, address indexed account, bytes32 indexed appId);
        event AppUninstalled(address indexed app, address indexed account, bytes32 indexed appId);

        // Functions
        function getAppByClient(address client) external view returns (address);
        function getAppById(bytes32 appId) external view returns (App memory);
        function getAppDuration(address app) external view returns (uint48);
        function getAppPrice(address app) external view returns (uint256);
        function getLatestAppId(address app) external view returns (bytes32);
        function isAppBanned(address app) external view returns (bool);
        function installApp(address app, address account, bytes calldata data) external payable;
        function renewApp(address app, address account, bytes calldata data) external payable;
        function uninstallApp(address app, address account, bytes calldata data) external;
    }
}
