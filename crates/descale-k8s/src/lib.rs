//! Kubernetes client for descale
//!
//! This crate provides the cluster-facing half of descale: listing
//! deployments across all namespaces and patching their scale subresource.

mod client;
mod error;

pub use client::KubeClient;
pub use error::Error;

// Re-export types that are used in our public API
pub use descale_types::DeploymentInfo;

/// The cluster operations the scaling run needs.
///
/// `KubeClient` implements this against a live cluster; tests implement it
/// with an in-memory fake so the run loop can be exercised without a cluster.
pub trait ClusterOps {
    /// List every deployment in every namespace, consuming pagination.
    fn list_all_deployments(
        &self,
    ) -> impl Future<Output = Result<Vec<DeploymentInfo>, Error>> + Send;

    /// Patch `spec.replicas` of one deployment via the scale subresource.
    fn scale_deployment(
        &self,
        namespace: &str,
        name: &str,
        replicas: i32,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}
