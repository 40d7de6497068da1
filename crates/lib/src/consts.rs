/// Project configuration file name.
pub const CONFIG_FILENAME: &str = "stagebuild.toml";

/// Lock manifest file name, stored directly under the build path.
pub const LOCK_MANIFEST_FILENAME: &str = ".stagebuild.lock";

/// Default build directory, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "_build";

/// Environment variable overriding the build path.
pub const BUILD_PATH_ENV: &str = "STAGEBUILD_BUILD_PATH";
