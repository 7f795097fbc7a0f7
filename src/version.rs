//! Build identification for logs and `mimir version`.
//!
//! Git fields come from `build.rs`; a build outside a checkout reports them
//! as `"unknown"` rather than failing.

use std::fmt;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";

/// What was built, from where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub branch: &'static str,
    pub sha: &'static str,
    pub dirty: bool,
}

impl BuildInfo {
    /// Metadata embedded into this binary.
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            branch: match option_env!("VERGEN_GIT_BRANCH") {
                Some(branch) => branch,
                None => UNKNOWN,
            },
            sha: match option_env!("VERGEN_GIT_SHA") {
                Some(sha) => sha,
                None => UNKNOWN,
            },
            dirty: option_env!("VERGEN_GIT_DIRTY") == Some("true"),
        }
    }

    /// Whether any git metadata was captured.
    pub fn has_git(&self) -> bool {
        self.sha != UNKNOWN
    }

    /// First seven characters of the commit, or the whole value if shorter.
    pub fn short_sha(&self) -> &'static str {
        match self.sha.char_indices().nth(7) {
            Some((idx, _)) => &self.sha[..idx],
            None => self.sha,
        }
    }
}

/// `{version}+{branch}.{sha}`, with `.dirty` appended for a modified tree.
/// Just `{version}` when no git metadata was captured.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_git() {
            return f.write_str(self.version);
        }
        write!(f, "{}+{}.{}", self.version, self.branch, self.short_sha())?;
        if self.dirty {
            f.write_str(".dirty")?;
        }
        Ok(())
    }
}

/// [`BuildInfo::current`] rendered as a single string.
pub fn version_string() -> String {
    BuildInfo::current().to_string()
}
