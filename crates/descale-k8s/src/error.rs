use thiserror::Error;

/// Failures talking to the cluster.
///
/// `Kubeconfig`, `Config` and `List` are fatal to a run; `Patch` is recovered
/// per deployment and only affects the exit code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load kubeconfig (is kubectl configured?): {0}")]
    Kubeconfig(#[source] kube::config::KubeconfigError),

    #[error("failed to create Kubernetes client: {0}")]
    Config(#[source] kube::Error),

    #[error("failed to list deployments across namespaces: {0}")]
    List(#[source] kube::Error),

    #[error("failed to scale deployment '{name}' in namespace '{namespace}': {source}")]
    Patch {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },
}

impl Error {
    /// Whether this error aborts the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Patch { .. })
    }
}
