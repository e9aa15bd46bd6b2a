//! The sequential scale-all run

use std::fmt;

use descale_k8s::{ClusterOps, Error};
use descale_types::{Classification, ReportBlock};
use tracing::warn;

/// Counts of what a run did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub descaled: usize,
    pub scaled: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} descaled, {} scaled, {} unchanged, {} failed",
            self.descaled, self.scaled, self.unchanged, self.failed
        )
    }
}

/// Classify, report, and patch every qualifying deployment, one at a time.
///
/// Deployments in the reserved namespace and deployments with zero or unset
/// replicas are skipped. Deployments already at the target are reported but
/// not patched. A patch failure is reported and counted, never fatal; only
/// the initial listing can abort the run.
pub async fn scale_all<C: ClusterOps>(cluster: &C, target: i32) -> Result<RunSummary, Error> {
    let deployments = cluster.list_all_deployments().await?;

    let mut summary = RunSummary::default();
    for deployment in deployments {
        let Some(current) = deployment.qualifying_replicas() else {
            continue;
        };

        let classification = Classification::of(current, target);
        println!("{}\n", ReportBlock::new(&deployment, classification));

        if classification == Classification::Unchanged {
            summary.unchanged += 1;
            continue;
        }

        match cluster
            .scale_deployment(&deployment.namespace, &deployment.name, target)
            .await
        {
            Ok(()) => {
                if classification == Classification::Descaled {
                    summary.descaled += 1;
                } else {
                    summary.scaled += 1;
                }
            }
            Err(e) => {
                // Keep going: one bad deployment must not end the run.
                println!("{e}\n");
                warn!(
                    namespace = %deployment.namespace,
                    name = %deployment.name,
                    error = %e,
                    "scale patch failed"
                );
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_target;
    use descale_types::DeploymentInfo;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeCluster {
        deployments: Vec<DeploymentInfo>,
        fail_on: Option<(String, String)>,
        list_calls: AtomicUsize,
        patch_attempts: Mutex<Vec<(String, String, i32)>>,
    }

    impl FakeCluster {
        fn with(deployments: Vec<DeploymentInfo>) -> Self {
            Self {
                deployments,
                ..Default::default()
            }
        }

        fn failing_on(mut self, namespace: &str, name: &str) -> Self {
            self.fail_on = Some((namespace.to_string(), name.to_string()));
            self
        }

        fn attempts(&self) -> Vec<(String, String, i32)> {
            self.patch_attempts.lock().unwrap().clone()
        }
    }

    impl ClusterOps for FakeCluster {
        async fn list_all_deployments(&self) -> Result<Vec<DeploymentInfo>, Error> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.deployments.clone())
        }

        async fn scale_deployment(
            &self,
            namespace: &str,
            name: &str,
            replicas: i32,
        ) -> Result<(), Error> {
            self.patch_attempts.lock().unwrap().push((
                namespace.to_string(),
                name.to_string(),
                replicas,
            ));

            match &self.fail_on {
                Some((ns, n)) if ns == namespace && n == name => Err(Error::Patch {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    source: kube::Error::Api(kube::core::ErrorResponse {
                        status: "Failure".to_string(),
                        message: "injected failure".to_string(),
                        reason: "Forbidden".to_string(),
                        code: 403,
                    }),
                }),
                _ => Ok(()),
            }
        }
    }

    fn deployment(namespace: &str, name: &str, replicas: Option<i32>) -> DeploymentInfo {
        DeploymentInfo::new(name.to_string(), namespace.to_string(), replicas)
    }

    #[tokio::test]
    async fn test_scale_all_classifies_and_patches() {
        // Scenario from the tool's contract: target 3 against a mixed cluster
        let cluster = FakeCluster::with(vec![
            deployment("a", "x", Some(5)),
            deployment("kube-system", "y", Some(10)),
            deployment("b", "z", Some(3)),
            deployment("c", "w", Some(0)),
        ]);

        let summary = scale_all(&cluster, 3).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                descaled: 1,
                scaled: 0,
                unchanged: 1,
                failed: 0
            }
        );
        // Only x is patched: y is reserved, z already matches, w is at zero
        assert_eq!(
            cluster.attempts(),
            vec![("a".to_string(), "x".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn test_scale_all_to_zero_descales_everything() {
        let cluster = FakeCluster::with(vec![
            deployment("a", "x", Some(1)),
            deployment("b", "y", Some(1)),
            deployment("c", "z", Some(1)),
        ]);

        let summary = scale_all(&cluster, 0).await.unwrap();

        assert_eq!(summary.descaled, 3);
        assert_eq!(summary.failed, 0);
        let attempts = cluster.attempts();
        assert_eq!(attempts.len(), 3);
        assert!(attempts.iter().all(|(_, _, r)| *r == 0));
    }

    #[tokio::test]
    async fn test_patch_failure_does_not_stop_the_run() {
        let cluster = FakeCluster::with(vec![
            deployment("a", "first", Some(2)),
            deployment("b", "second", Some(2)),
            deployment("c", "third", Some(2)),
        ])
        .failing_on("b", "second");

        let summary = scale_all(&cluster, 5).await.unwrap();

        assert_eq!(summary.scaled, 2);
        assert_eq!(summary.failed, 1);
        // All three were attempted despite the injected failure
        let names: Vec<_> = cluster
            .attempts()
            .into_iter()
            .map(|(_, name, _)| name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_reserved_namespace_is_skipped_at_any_count() {
        let cluster = FakeCluster::with(vec![
            deployment("kube-system", "coredns", Some(2)),
            deployment("kube-system", "proxy", Some(100)),
        ]);

        let summary = scale_all(&cluster, 1).await.unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(cluster.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_unset_replicas_are_skipped() {
        let cluster = FakeCluster::with(vec![
            deployment("a", "paused", None),
            deployment("a", "live", Some(4)),
        ]);

        let summary = scale_all(&cluster, 2).await.unwrap();

        assert_eq!(summary.descaled, 1);
        assert_eq!(cluster.attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_cluster_calls() {
        let cluster = FakeCluster::with(vec![deployment("a", "x", Some(5))]);

        // Parsing fails before scale_all would ever be invoked
        let parsed = parse_target("not-a-number");
        assert!(parsed.is_err());

        assert_eq!(cluster.list_calls.load(Ordering::SeqCst), 0);
        assert!(cluster.attempts().is_empty());
    }
}
