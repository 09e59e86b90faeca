// src/config/options.rs
use std::path::PathBuf;

/// Which properties an operation applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropSelector {
    /// Every property in the metadata table that has a wiki URL.
    All,
    /// An explicit list of property names (may include "-" for stdin
    /// where the command supports it).
    Named(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fetch, sanitize and persist short descriptions.
    Scrape { props: PropSelector },
    /// Lint persisted description files (source format + content).
    Lint { dir: PathBuf },
    /// Lint live wiki content for the named properties (or stdin via "-").
    LintWiki { props: Vec<String> },
    /// Merge every description file into one exported object.
    Aggregate { out: Option<PathBuf> },
    /// Check every rule's good/bad example against the rule itself.
    SelfTest,
}
