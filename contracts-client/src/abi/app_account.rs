//! ABI of the app account facet of a space

use alloy::sol;

sol! {
    #[sol(rpc, all_derives)]
    contract AppAccount {
        // Errors
        error AppAlreadyInstalled();
        error InvalidAppAddress(address app);
        error InvalidCaller();
        error InvalidManifest();
        error NotEnoughEth();
        error UnauthorizedApp(address app);
        error UnauthorizedSelector();

        // Functions
        function disableApp(address app) external;
        function enableApp(address app) external;
        function getAppExpiration(address app) external view returns (uint48);
        function getAppId(address app) external view returns (bytes32);
        function getInstalledApps() external view returns (address[] memory);
        function isAppEntitled(address app, address publicKey, bytes32 permission) external view returns (bool);
        function isAppInstalled(address app) external view returns (bool);
        function onInstallApp(bytes32 appId, bytes calldata data) external;
        function onRenewApp(bytes32 appId, bytes calldata data) external;
        function onUninstallApp(bytes32 appId, bytes calldata data) external;
    }
}
