use std::path::PathBuf;

use thiserror::Error;

/// Failure while resolving a token.
///
/// Unresolvable tokens are not errors; they resolve to `None`. Only dataset
/// authoring bugs that make resolution impossible end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A theme reference leads back to a token already on the resolution path.
    ///
    /// `chain` lists the path from the first repeated token back to itself,
    /// e.g. `["color_a", "color_b", "color_a"]`.
    #[error("cyclic token reference: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {what} json: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("palette family `{family}` has duplicate shade level `{level}`")]
    DuplicateShade { family: String, level: String },

    #[error("palette families `{first}` and `{second}` share the lookup key `{key}`")]
    DuplicateFamilyKey {
        key: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
