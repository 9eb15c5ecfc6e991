//! CTA asset probe: is any of the link targets reachable?

use crate::fetch::Fetcher;
use crate::source::Source;

/// True as soon as one target exists; targets are checked in order.
/// An empty target list is never reachable.
pub async fn probe_any(fetcher: &Fetcher, targets: &[Source]) -> bool {
    for target in targets {
        if fetcher.exists(target).await {
            return true;
        }
    }
    false
}
