//! Shared types for descale
//!
//! This crate contains the data structures used across the descale crates:
//! the deployment view read from the cluster, the replica classification,
//! and the report formatting.

use std::fmt;

/// The namespace that is never touched, whatever its deployments look like.
pub const RESERVED_NAMESPACE: &str = "kube-system";

/// Deployment information as read from the cluster API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentInfo {
    pub name: String,
    pub namespace: String,
    /// Desired replicas from `spec.replicas`; `None` when the field is unset.
    pub replicas: Option<i32>,
}

impl DeploymentInfo {
    pub fn new(name: String, namespace: String, replicas: Option<i32>) -> Self {
        Self {
            name,
            namespace,
            replicas,
        }
    }

    /// Whether this deployment takes part in a scaling run.
    ///
    /// Deployments in the reserved namespace are excluded, as are deployments
    /// with no replica count or a count below 1. Returns the current count
    /// when the deployment qualifies.
    pub fn qualifying_replicas(&self) -> Option<i32> {
        if self.namespace == RESERVED_NAMESPACE {
            return None;
        }
        self.replicas.filter(|r| *r >= 1)
    }
}

/// How a deployment's current replica count relates to the target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Current count is above the target
    Descaled,
    /// Current count already matches the target
    Unchanged,
    /// Current count is below the target
    Scaled,
}

impl Classification {
    /// Classify a current replica count against the target.
    pub fn of(current: i32, target: i32) -> Self {
        match current.cmp(&target) {
            std::cmp::Ordering::Greater => Self::Descaled,
            std::cmp::Ordering::Equal => Self::Unchanged,
            std::cmp::Ordering::Less => Self::Scaled,
        }
    }

    /// Display verb used in the report block
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Descaled => "descaled",
            Self::Unchanged => "not changed",
            Self::Scaled => "scaled",
        }
    }
}

/// One report block: a classified deployment plus its current count.
///
/// Formats as the multi-line block printed for every qualifying deployment.
#[derive(Clone, Debug)]
pub struct ReportBlock {
    pub classification: Classification,
    pub namespace: String,
    pub name: String,
    pub current_replicas: i32,
}

impl ReportBlock {
    pub fn new(deployment: &DeploymentInfo, classification: Classification) -> Self {
        Self {
            classification,
            namespace: deployment.namespace.clone(),
            name: deployment.name.clone(),
            current_replicas: deployment.replicas.unwrap_or_default(),
        }
    }
}

impl fmt::Display for ReportBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "This deployment will be {}:",
            self.classification.verb()
        )?;
        writeln!(f, " ns='{}'", self.namespace)?;
        writeln!(f, " name='{}'", self.name)?;
        write!(
            f,
            " current number of replicas='{}'",
            self.current_replicas
        )
    }
}
