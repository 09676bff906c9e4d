use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mntctl_common::error::{MntError, Result};
use tracing::debug;

use crate::snapshot::ClusterSnapshot;

#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn cluster_snapshot(&self) -> Result<ClusterSnapshot>;
}

/// Reads a JSON snapshot exported from the admin service.
#[derive(Debug, Clone)]
pub struct FileSnapshotProvider {
    path: PathBuf,
}

impl FileSnapshotProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotProvider for FileSnapshotProvider {
    async fn cluster_snapshot(&self) -> Result<ClusterSnapshot> {
        let payload = match tokio::fs::read_to_string(&self.path).await {
            Ok(payload) => payload,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(MntError::SnapshotUnavailable(format!(
                    "no snapshot at {}",
                    self.path.display()
                )));
            }
            Err(err) => return Err(MntError::Io(err)),
        };

        let snapshot = ClusterSnapshot::from_json(&payload)?;
        debug!(
            path = %self.path.display(),
            nodes = snapshot.nodes().len(),
            maintenances = snapshot.all_maintenances().len(),
            "loaded cluster snapshot"
        );
        Ok(snapshot)
    }
}

/// Serves a snapshot that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshotProvider {
    snapshot: ClusterSnapshot,
}

impl StaticSnapshotProvider {
    pub fn new(snapshot: ClusterSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl SnapshotProvider for StaticSnapshotProvider {
    async fn cluster_snapshot(&self) -> Result<ClusterSnapshot> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{FileSnapshotProvider, SnapshotProvider, StaticSnapshotProvider};
    use crate::snapshot::ClusterSnapshot;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("mntctl-{name}-{}-{nanos}.json", std::process::id()))
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let provider = FileSnapshotProvider::new(scratch_path("missing"));
        let err = provider.cluster_snapshot().await.unwrap_err();
        assert_eq!(err.error_code(), "SnapshotUnavailable");
    }

    #[tokio::test]
    async fn loads_snapshot_from_disk() {
        let path = scratch_path("load");
        let payload = r#"{"nodes": [{"node_index": 2, "node_name": "two", "num_shards": 4}]}"#;
        tokio::fs::write(&path, payload).await.unwrap();

        let snapshot = FileSnapshotProvider::new(&path)
            .cluster_snapshot()
            .await
            .unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(snapshot.node_view(2).unwrap().num_shards, 4);
        assert!(snapshot.all_maintenances().is_empty());
    }

    #[tokio::test]
    async fn garbage_file_is_invalid() {
        let path = scratch_path("garbage");
        tokio::fs::write(&path, "[1, 2").await.unwrap();

        let err = FileSnapshotProvider::new(&path)
            .cluster_snapshot()
            .await
            .unwrap_err();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(err.error_code(), "InvalidSnapshot");
    }

    #[tokio::test]
    async fn static_provider_returns_its_snapshot() {
        let provider = StaticSnapshotProvider::new(ClusterSnapshot::default());
        let snapshot = provider.cluster_snapshot().await.unwrap();
        assert!(snapshot.nodes().is_empty());
    }
}
