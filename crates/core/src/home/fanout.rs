//! Best-effort refresh fan-out.

use fiscus_shared::AppResult;
use futures::future::{BoxFuture, join_all};
use tracing::debug;

/// Awaits every refresh future and keeps going regardless of failures.
///
/// The snapshot recalculations are best-effort: a failed refresh means the
/// subsequent read serves whatever snapshot state already exists. Failures
/// are therefore recorded at debug level, not surfaced. This is the
/// settle-all counterpart to the fail-fast `tokio::join!` used for reads.
pub(crate) async fn settle_refresh(
    refreshes: Vec<BoxFuture<'_, AppResult<()>>>,
) -> Vec<AppResult<()>> {
    let outcomes = join_all(refreshes).await;
    for err in outcomes.iter().filter_map(|o| o.as_ref().err()) {
        debug!(error = %err, "snapshot refresh failed; reading existing snapshot state");
    }
    outcomes
}
