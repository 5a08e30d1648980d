//! Build metadata embedded by `build.rs` (vergen).

use serde::Serialize;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Metadata describing the running build. Fields vergen could not
/// determine read `"unknown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_branch: &'static str,
    pub git_sha: &'static str,
    pub dirty: bool,
    pub built_at: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            git_branch: option_env!("VERGEN_GIT_BRANCH").unwrap_or("unknown"),
            git_sha: option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
            dirty: option_env!("VERGEN_GIT_DIRTY") == Some("true"),
            built_at: option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
        }
    }

    /// `{version}+{branch}.{short sha}`, with `.dirty` appended for a
    /// dirty tree.
    pub fn version_string(&self) -> String {
        let sha = self.git_sha.get(..7).unwrap_or(self.git_sha);
        let dirty = if self.dirty { ".dirty" } else { "" };
        format!("{}+{}.{sha}{dirty}", self.version, self.git_branch)
    }
}

/// Version string of the running build, e.g. `0.1.0+main.abc1234`.
pub fn version_string() -> String {
    BuildInfo::current().version_string()
}
