//! Workspace root package.
//!
//! Exists to carry the git-hook dev-dependency; all functionality lives in
//! the member crates under `crates/`.
