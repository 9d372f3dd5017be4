//! Generic projector: table stream in, domain-value stream out.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::debug;

use duka_store::live::{self, LiveQuery};
use duka_store::{StoredRow, Table};

/// Republish a table's live snapshots through a pure projection.
///
/// The seed value is the projection of the current committed snapshot, taken
/// through the same subscription the projector task consumes, so no mutation
/// can fall between the seed and the first change notification. The task
/// runs the projection once per table emission; all domain subscribers share
/// its output.
pub(crate) async fn project_live<R, D, F>(
    table: &Arc<Table<R>>,
    project: F,
) -> (LiveQuery<Vec<D>>, JoinHandle<()>)
where
    R: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
    F: Fn(&StoredRow<R>) -> D + Send + 'static,
{
    let mut sub = table.live().subscribe();

    // First recv resolves immediately with the committed snapshot.
    let seed: Vec<D> = sub
        .recv()
        .await
        .unwrap_or_default()
        .iter()
        .map(&project)
        .collect();
    let (publisher, query) = live::channel(seed);

    let name = table.name();
    let task = tokio::spawn(async move {
        while let Some(rows) = sub.recv().await {
            publisher.publish(rows.iter().map(&project).collect());
        }
        debug!(table = name, "table stream closed; projector stopping");
    });

    (query, task)
}
