//! GitSync Custom Resource Definition
//!
//! Mirrors a path in a Git repository into a destination cluster and,
//! optionally, a namespace.

use std::fmt;

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::status::GitSyncStatus;

/// GitSyncSpec defines the desired state of a GitSync
///
/// # Example
///
/// ```yaml
/// apiVersion: gitsync.microscaler.io/v1alpha1
/// kind: GitSync
/// metadata:
///   name: platform-config
///   namespace: gitops
/// spec:
///   repositoryPath:
///     name: platform
///     repoUrl: https://github.com/microscaler/platform-config
///     path: clusters/east
///     targetRevision: main
///   destination:
///     cluster: east
///     namespace: platform
/// ```
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "gitsync.microscaler.io",
    version = "v1alpha1",
    kind = "GitSync",
    namespaced,
    status = "GitSyncStatus",
    shortname = "gs",
    printcolumn = r#"{"name":"Phase", "type":"string", "jsonPath":".status.phase"}, {"name":"Configured", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Configured\")].status"}, {"name":"Message", "type":"string", "jsonPath":".status.message"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct GitSyncSpec {
    /// Git repository path to watch
    pub repository_path: RepositoryPath,

    /// Cluster and namespace to sync into
    pub destination: Destination,
}

/// A path within a Git repository at a given revision
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryPath {
    /// Unique name
    pub name: String,

    /// URL of the repository
    pub repo_url: String,

    /// Path from the repository root to the resources (file or directory).
    /// Empty means the root directory. Every `.yaml` file under it is synced.
    #[serde(default)]
    pub path: String,

    /// Branch, tag or commit hash to sync
    pub target_revision: String,
}

/// Cluster (and optional namespace) to sync into
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Cluster name
    pub cluster: String,

    /// Namespace for resources that don't declare their own.
    /// Omitted for cluster-scoped resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl GitSyncSpec {
    /// Whether `cluster` is this GitSync's destination
    #[must_use]
    pub fn contains_cluster_destination(&self, cluster: &str) -> bool {
        self.destination.cluster == cluster
    }

    /// Destination namespace for `cluster`, or `""` if `cluster` is not the
    /// destination or no namespace is set
    #[must_use]
    pub fn destination_namespace(&self, cluster: &str) -> &str {
        if self.contains_cluster_destination(cluster) {
            self.destination.namespace.as_deref().unwrap_or_default()
        } else {
            ""
        }
    }
}

impl GitSync {
    /// Status of this GitSync, created empty on first access
    pub fn status_mut(&mut self) -> &mut GitSyncStatus {
        self.status.get_or_insert_with(GitSyncStatus::default)
    }
}

impl fmt::Display for GitSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.namespace().unwrap_or_default(),
            self.name_any()
        )
    }
}
