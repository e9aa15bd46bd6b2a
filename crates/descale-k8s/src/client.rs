//! Live cluster client built on kube-rs

use descale_types::DeploymentInfo;
use k8s_openapi::api::apps::v1::Deployment;
use kube::Api;
use kube::api::{ListParams, Patch, PatchParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::ClusterOps;

/// Page size for the all-namespace deployment listing
const LIST_PAGE_LIMIT: u32 = 500;

/// Kubernetes client wrapper
pub struct KubeClient {
    client: kube::Client,
}

impl KubeClient {
    /// Create a new KubeClient by loading the kubeconfig.
    ///
    /// `context` selects a named kubeconfig context; `None` uses the current
    /// context. Authentication is whatever the kubeconfig says it is.
    pub async fn new(context: Option<&str>) -> Result<Self, Error> {
        let kubeconfig = Kubeconfig::read().map_err(Error::Kubeconfig)?;

        let config = kube::Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(str::to_string),
                ..Default::default()
            },
        )
        .await
        .map_err(Error::Kubeconfig)?;

        let client = kube::Client::try_from(config).map_err(Error::Config)?;

        Ok(Self { client })
    }

    /// Convert a k8s Deployment to DeploymentInfo
    fn deployment_to_info(deploy: Deployment) -> DeploymentInfo {
        DeploymentInfo::new(
            deploy.metadata.name.unwrap_or_default(),
            deploy.metadata.namespace.unwrap_or_default(),
            deploy.spec.and_then(|s| s.replicas),
        )
    }
}

impl ClusterOps for KubeClient {
    /// Fetch all deployments in all namespaces, following continue tokens
    /// until the listing is exhausted.
    async fn list_all_deployments(&self) -> Result<Vec<DeploymentInfo>, Error> {
        let deployments: Api<Deployment> = Api::all(self.client.clone());

        let mut out = Vec::new();
        let mut params = ListParams::default().limit(LIST_PAGE_LIMIT);

        loop {
            let list = deployments.list(&params).await.map_err(Error::List)?;
            let token = list.metadata.continue_.clone();

            out.extend(list.items.into_iter().map(Self::deployment_to_info));

            match token {
                Some(token) if !token.is_empty() => {
                    debug!(fetched = out.len(), "following deployment list page");
                    params = ListParams::default()
                        .limit(LIST_PAGE_LIMIT)
                        .continue_token(&token);
                }
                _ => break,
            }
        }

        debug!(count = out.len(), "listed deployments across all namespaces");
        Ok(out)
    }

    /// Patch `spec.replicas` through the scale subresource, scoped by
    /// (namespace, name). No verification that the patch took effect.
    async fn scale_deployment(
        &self,
        namespace: &str,
        name: &str,
        replicas: i32,
    ) -> Result<(), Error> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);

        let body = json!({ "spec": { "replicas": replicas } });
        deployments
            .patch_scale(name, &PatchParams::default(), &Patch::Merge(&body))
            .await
            .map_err(|source| Error::Patch {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            })?;

        debug!(namespace, name, replicas, "patched deployment scale");
        Ok(())
    }
}
