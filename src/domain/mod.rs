//! Domain types - release tags, versions and commits independent of any provider

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::{short_sha, Commit, CommitNote, ConventionalCommit, PullRequest};
pub use tag::Tag;
pub use version::Version;
