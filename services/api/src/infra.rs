use job_board::board::{CatalogueImporter, InMemoryBoardStore, JobBoardService};
use job_board::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Board service over a fresh in-memory store, optionally seeded from a catalogue CSV.
pub(crate) fn board_service(
    seed_csv: Option<&Path>,
) -> Result<Arc<JobBoardService<InMemoryBoardStore>>, AppError> {
    let service = JobBoardService::new(Arc::new(InMemoryBoardStore::default()));

    if let Some(path) = seed_csv {
        let summary = CatalogueImporter::from_path(&service, path)?;
        info!(
            path = %path.display(),
            jobs = summary.jobs.len(),
            "board seeded from catalogue"
        );
    }

    Ok(Arc::new(service))
}
