//! Command-line workflows

pub mod orchestration;

pub use orchestration::{
    emit_commit_outputs, run_commits_workflow, run_version_workflow, CommitsWorkflowArgs, Source,
};
