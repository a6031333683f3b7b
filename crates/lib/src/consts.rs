/// Directory name used under the user's cache/data roots.
pub const APP_NAME: &str = "stagekit";

/// Default recipe file looked up in the current directory.
pub const RECIPE_FILENAME: &str = "stagekit.toml";

/// Metadata file written at the root of every published package.
pub const PACKAGE_INFO_FILENAME: &str = "package_info.json";

/// Environment variable overriding the dependency cache root.
pub const CACHE_ENV: &str = "STAGEKIT_CACHE";
