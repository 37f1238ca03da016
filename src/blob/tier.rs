//! Bulk access tier changes
//!
//! Enumerates a container, applies the prefix and extension filters and
//! sets the requested tier on every matching block blob. Failures on a
//! single blob are recorded in the report and never abort the run.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::blob::models::{BlobKind, TierChangeReport, TierChangeRequest, TierOutcome};
use crate::blob::store::BlobStore;
use crate::error::{BlobctlError, Result};

/// Change the access tier of every matching blob in the store's container
pub async fn change_blob_tiers(
    store: &dyn BlobStore,
    request: &TierChangeRequest,
) -> Result<TierChangeReport> {
    change_blob_tiers_with_progress(store, request, |_| {}).await
}

/// Same as [`change_blob_tiers`], calling `on_outcome` as each blob is done
pub async fn change_blob_tiers_with_progress<F>(
    store: &dyn BlobStore,
    request: &TierChangeRequest,
    mut on_outcome: F,
) -> Result<TierChangeReport>
where
    F: FnMut(&TierOutcome),
{
    let started_at = Utc::now();
    let container = store.container_name();
    let filter = &request.filter;

    info!(
        container = %container,
        tier = %request.tier,
        prefix = ?filter.prefix,
        extension = ?filter.extension,
        "changing blob tiers"
    );

    let names = store
        .list_blob_names(filter.prefix().map(str::to_string))
        .await?;

    let mut outcomes = Vec::new();
    let mut filtered_out = 0;

    for name in names {
        if !filter.matches(&name) {
            debug!(blob = %name, "skipping blob outside filter");
            filtered_out += 1;
            continue;
        }

        let outcome = match store.get_properties(&name).await {
            Ok(properties) if properties.kind == BlobKind::BlockBlob => {
                debug!(
                    blob = %name,
                    from = properties.access_tier.as_deref().unwrap_or("unknown"),
                    to = %request.tier,
                    "setting tier"
                );
                match store.set_access_tier(&name, request.tier).await {
                    Ok(()) => TierOutcome::Updated { name },
                    Err(e) => TierOutcome::Failed {
                        name,
                        message: failure_message(e),
                    },
                }
            }
            Ok(properties) => TierOutcome::Skipped {
                name,
                blob_type: properties.kind,
            },
            // Listed blob deleted before its properties were read
            Err(e @ BlobctlError::BlobNotFound { .. }) => TierOutcome::Failed {
                name,
                message: e.to_string(),
            },
            Err(e) => return Err(e),
        };

        match &outcome {
            TierOutcome::Updated { name } => info!(blob = %name, "updated tier"),
            TierOutcome::Skipped { name, blob_type } => {
                info!(blob = %name, blob_type = %blob_type, "skipped non-block blob")
            }
            TierOutcome::Failed { name, message } => {
                warn!(blob = %name, error = %message, "failed to update tier")
            }
        }

        on_outcome(&outcome);
        outcomes.push(outcome);
    }

    let report = TierChangeReport {
        container,
        tier: request.tier,
        filter: filter.clone(),
        outcomes,
        filtered_out,
        started_at,
        finished_at: Utc::now(),
    };

    info!(
        updated = report.updated(),
        skipped = report.skipped(),
        failed = report.failed(),
        "finished changing blob tiers"
    );

    Ok(report)
}

/// Underlying service message, without this crate's error prefix
fn failure_message(error: BlobctlError) -> String {
    match error {
        BlobctlError::AzureApiError(message) => message,
        other => other.to_string(),
    }
}
