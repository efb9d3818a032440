//! Status conditions
//!
//! A [`ConditionSet`] holds at most one [`Condition`] per [`ConditionType`],
//! kept sorted by type so serialized status diffs cleanly between passes.
//! Every mutation goes through [`ConditionSet::upsert`], which leaves the set
//! and its timestamps untouched when the incoming condition carries nothing new.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::error::CrdError;

/// Reason and message written by [`ConditionSet::mark_true`]
pub const REASON_SUCCESSFUL: &str = "Successful";

/// Reason written by [`ConditionSet::initialize`]
pub const REASON_UNKNOWN: &str = "Unknown";

/// Name of one aspect of a resource's health
///
/// Any string is accepted. Types compare lexicographically, which is the
/// order conditions are stored in.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ConditionType(Cow<'static, str>);

impl ConditionType {
    /// True when the GitSync has a valid configuration and its last sync succeeded
    pub const CONFIGURED: Self = Self(Cow::Borrowed("Configured"));

    /// String form of the type
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConditionType {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_string()))
    }
}

impl From<String> for ConditionType {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tri-state value of a condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "PascalCase")]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl ConditionStatus {
    /// String form used on the wire
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionStatus {
    type Err = CrdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "True" => Ok(Self::True),
            "False" => Ok(Self::False),
            "Unknown" => Ok(Self::Unknown),
            other => Err(CrdError::UnknownConditionStatus(other.to_string())),
        }
    }
}

/// A single observation about the resource
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition
    pub r#type: ConditionType,

    /// Status of the condition (True, False, Unknown)
    pub status: ConditionStatus,

    /// Machine-readable reason for the last transition
    pub reason: String,

    /// Human-readable detail
    #[serde(default)]
    pub message: String,

    /// Last time the type, status, reason or message changed
    pub last_transition_time: DateTime<Utc>,
}

impl Condition {
    /// Build a condition with an unset transition time.
    ///
    /// The time is filled in by [`ConditionSet::upsert`].
    pub fn new(
        r#type: ConditionType,
        status: ConditionStatus,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            r#type,
            status,
            reason: reason.into(),
            message: message.into(),
            last_transition_time: DateTime::UNIX_EPOCH,
        }
    }
}

/// Ordered set of conditions, unique by type
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct ConditionSet(Vec<Condition>);

impl ConditionSet {
    /// Insert or replace the condition of the same type.
    ///
    /// Returns `false` and leaves the set untouched when an existing condition
    /// already has the same status, reason and message. Otherwise the
    /// condition is stamped with `clock.now()`, stored, and the set re-sorted.
    pub fn upsert(&mut self, mut condition: Condition, clock: &impl Clock) -> bool {
        let mut conditions = Vec::with_capacity(self.0.len() + 1);
        for existing in &self.0 {
            if existing.r#type != condition.r#type {
                conditions.push(existing.clone());
                continue;
            }
            condition.last_transition_time = existing.last_transition_time;
            if *existing == condition {
                trace!("Condition {} unchanged ({})", condition.r#type, condition.status);
                return false;
            }
        }

        condition.last_transition_time = clock.now();
        debug!(
            "Condition {} -> {} (reason: {})",
            condition.r#type, condition.status, condition.reason
        );
        conditions.push(condition);
        conditions.sort_by(|a, b| a.r#type.cmp(&b.r#type));
        self.0 = conditions;
        true
    }

    /// Set each type to Unknown with reason "Unknown" and no message
    pub fn initialize<I, T>(&mut self, types: I, clock: &impl Clock)
    where
        I: IntoIterator<Item = T>,
        T: Into<ConditionType>,
    {
        for t in types {
            self.upsert(
                Condition::new(t.into(), ConditionStatus::Unknown, REASON_UNKNOWN, ""),
                clock,
            );
        }
    }

    /// Set `t` to True with reason and message "Successful"
    pub fn mark_true(&mut self, t: ConditionType, clock: &impl Clock) -> bool {
        self.upsert(
            Condition::new(t, ConditionStatus::True, REASON_SUCCESSFUL, REASON_SUCCESSFUL),
            clock,
        )
    }

    /// Set `t` to False
    pub fn mark_false(
        &mut self,
        t: ConditionType,
        reason: &str,
        message: &str,
        clock: &impl Clock,
    ) -> bool {
        self.upsert(Condition::new(t, ConditionStatus::False, reason, message), clock)
    }

    /// Set `t` to Unknown
    pub fn mark_unknown(
        &mut self,
        t: ConditionType,
        reason: &str,
        message: &str,
        clock: &impl Clock,
    ) -> bool {
        self.upsert(Condition::new(t, ConditionStatus::Unknown, reason, message), clock)
    }

    /// Condition of the given type, if present
    #[must_use]
    pub fn get(&self, t: &ConditionType) -> Option<&Condition> {
        self.0.iter().find(|c| &c.r#type == t)
    }

    /// Whether the condition of the given type is present and True
    #[must_use]
    pub fn is_true(&self, t: &ConditionType) -> bool {
        self.get(t).is_some_and(|c| c.status == ConditionStatus::True)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Condition] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
