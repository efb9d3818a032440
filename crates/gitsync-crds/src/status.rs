//! GitSync status
//!
//! Observed state of a GitSync: the lifecycle phase, its message, the
//! condition set and the last commit the reconciler attempted to sync.
//!
//! The reconciler owns a `GitSyncStatus` for the duration of one pass and
//! drives it through the `mark_*` operations:
//!
//! ```text
//! (unset) --init_conditions--> Pending
//! any     --mark_running-----> Running
//! any     --mark_failed------> Failed
//! any     --mark_not_applicable--> NotApplicable
//! ```
//!
//! Transitions are not validated here. A Failed GitSync goes back to Running
//! as soon as the reconciler calls `mark_running` again.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::conditions::{ConditionSet, ConditionType};
use crate::error::CrdError;

/// GitSync lifecycle phase
///
/// Serializes as PascalCase ("Running", "Failed", etc.), with the unset phase
/// as an empty string. Deserializes lowercase spellings as well.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, Default)]
pub enum GitSyncPhase {
    /// No phase recorded yet
    #[default]
    #[serde(rename = "")]
    Unset,

    /// Conditions initialized, first sync not finished
    #[serde(alias = "pending")]
    Pending,

    /// Last sync succeeded
    #[serde(alias = "running")]
    Running,

    /// Last sync failed
    #[serde(alias = "failed")]
    Failed,

    /// This cluster is not a destination of the GitSync
    #[serde(alias = "notApplicable", alias = "notapplicable")]
    NotApplicable,
}

impl GitSyncPhase {
    /// String form used on the wire
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Failed => "Failed",
            Self::NotApplicable => "NotApplicable",
        }
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        *self == Self::Unset
    }
}

impl fmt::Display for GitSyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GitSyncPhase {
    type Err = CrdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Unset),
            "Pending" => Ok(Self::Pending),
            "Running" => Ok(Self::Running),
            "Failed" => Ok(Self::Failed),
            "NotApplicable" => Ok(Self::NotApplicable),
            other => Err(CrdError::UnknownPhase(other.to_string())),
        }
    }
}

/// Outcome of the last attempt to sync a Git commit
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommitStatus {
    /// Hash of the git commit
    pub hash: String,

    /// Whether the sync went through
    pub synced: bool,

    /// Last time a sync of this commit was attempted, successful or not
    pub sync_time: DateTime<Utc>,

    /// Error from the sync attempt, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommitStatus {
    /// Successful sync of `hash`, stamped now
    pub fn synced(hash: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            hash: hash.into(),
            synced: true,
            sync_time: clock.now(),
            error: None,
        }
    }

    /// Failed sync of `hash`, stamped now
    pub fn failed(hash: impl Into<String>, error: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            hash: hash.into(),
            synced: false,
            sync_time: clock.now(),
            error: Some(error.into()),
        }
    }
}

/// GitSyncStatus defines the observed state of a GitSync
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GitSyncStatus {
    /// Current phase
    #[serde(default, skip_serializing_if = "GitSyncPhase::is_unset")]
    pub phase: GitSyncPhase,

    /// Latest observations of the resource's state, sorted by type
    #[serde(default, skip_serializing_if = "ConditionSet::is_empty")]
    pub conditions: ConditionSet,

    /// Set on failure, cleared when the GitSync runs again
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Last commit processed and its outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_status: Option<CommitStatus>,
}

impl GitSyncStatus {
    /// Overwrite the phase and message
    pub fn set_phase(&mut self, phase: GitSyncPhase, message: impl Into<String>) {
        let message = message.into();
        if self.phase != phase {
            debug!("GitSync phase {:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
        self.message = message;
    }

    /// Set `Configured` to Unknown and the phase to Pending.
    ///
    /// Call once, when the status is first created. A second call resets a
    /// True or False `Configured` condition back to Unknown.
    pub fn init_conditions(&mut self, clock: &impl Clock) {
        self.initialize_conditions([ConditionType::CONFIGURED], clock);
        self.set_phase(GitSyncPhase::Pending, "");
    }

    /// Set each given condition type to Unknown
    pub fn initialize_conditions<I, T>(&mut self, types: I, clock: &impl Clock)
    where
        I: IntoIterator<Item = T>,
        T: Into<ConditionType>,
    {
        self.conditions.initialize(types, clock);
    }

    pub fn mark_condition_true(&mut self, t: ConditionType, clock: &impl Clock) {
        self.conditions.mark_true(t, clock);
    }

    pub fn mark_condition_false(
        &mut self,
        t: ConditionType,
        reason: &str,
        message: &str,
        clock: &impl Clock,
    ) {
        self.conditions.mark_false(t, reason, message, clock);
    }

    pub fn mark_condition_unknown(
        &mut self,
        t: ConditionType,
        reason: &str,
        message: &str,
        clock: &impl Clock,
    ) {
        self.conditions.mark_unknown(t, reason, message, clock);
    }

    /// Configured → True, phase → Running
    pub fn mark_running(&mut self, clock: &impl Clock) {
        self.mark_condition_true(ConditionType::CONFIGURED, clock);
        self.set_phase(GitSyncPhase::Running, "");
    }

    /// Configured → False, phase → Failed with `message`
    pub fn mark_failed(&mut self, reason: &str, message: &str, clock: &impl Clock) {
        self.mark_condition_false(ConditionType::CONFIGURED, reason, message, clock);
        self.set_phase(GitSyncPhase::Failed, message);
    }

    /// Configured → False, phase → NotApplicable with `message`
    ///
    /// Used when this cluster is not listed as the GitSync's destination.
    pub fn mark_not_applicable(&mut self, reason: &str, message: &str, clock: &impl Clock) {
        self.mark_condition_false(ConditionType::CONFIGURED, reason, message, clock);
        self.set_phase(GitSyncPhase::NotApplicable, message);
    }

    /// Replace the commit record
    pub fn record_commit(&mut self, commit: CommitStatus) {
        debug!("Recording commit {} (synced: {})", commit.hash, commit.synced);
        self.commit_status = Some(commit);
    }

    /// Whether the `Configured` condition is True
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.conditions.is_true(&ConditionType::CONFIGURED)
    }

    /// Render as a `{"status": ...}` JSON merge patch
    pub fn to_status_patch(&self) -> Result<serde_json::Value, CrdError> {
        let status = serde_json::to_value(self)?;
        Ok(serde_json::json!({ "status": status }))
    }
}
