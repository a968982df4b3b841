use futures::stream::FuturesUnordered;
use futures::StreamExt;
use indicatif::ProgressBar;
use log::{debug, warn};

use crate::model::Address;
use crate::source::RecordSource;
use crate::window::PageWindow;

/// Outcome of one orchestration: the records that arrived, in ascending ID
/// order, and the IDs whose reads failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageFetch {
    pub addresses: Vec<Address>,
    pub failed: Vec<u64>,
}

/// Reads every ID in `window` concurrently and waits for all reads to settle.
///
/// Failed reads are logged and skipped, never retried. An empty window
/// returns immediately without touching the source.
pub async fn fetch_window<S>(source: &S, window: PageWindow, pb: &ProgressBar) -> PageFetch
where
    S: RecordSource + ?Sized,
{
    if window.is_empty() {
        return PageFetch::default();
    }

    pb.set_length(window.len());
    debug!(
        "fetching records {}..={} ({} reads)",
        window.start,
        window.end,
        window.len()
    );

    let mut reads = window
        .ids()
        .map(|id| async move { (id, source.address(id).await) })
        .collect::<FuturesUnordered<_>>();

    let mut arrived: Vec<(u64, Address)> = Vec::with_capacity(window.len() as usize);
    let mut failed: Vec<u64> = Vec::new();
    while let Some((id, result)) = reads.next().await {
        pb.inc(1);
        match result {
            Ok(address) => arrived.push((id, address)),
            Err(e) => {
                warn!("skipping record {id}: {e}");
                failed.push(id);
            }
        }
    }

    pb.finish_and_clear();

    // completion order is arbitrary, display order is issuance order
    arrived.sort_by_key(|(id, _)| *id);
    failed.sort_unstable();

    PageFetch {
        addresses: arrived.into_iter().map(|(_, address)| address).collect(),
        failed,
    }
}
