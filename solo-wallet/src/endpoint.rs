//! Node endpoint selection

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::{Endpoint, TokenAllowlist};

/// Pick the endpoint for one request.
///
/// A usable `node_override` always wins. Otherwise one endpoint is drawn
/// uniformly from the allowlist entry for `network`, falling back to
/// `default` when the entry is missing or has no endpoints. Nothing is
/// cached, so repeated calls make independent draws.
pub fn select_endpoint<R: Rng + ?Sized>(
    allowlist: Option<&TokenAllowlist>,
    node_override: Option<&Endpoint>,
    network: &str,
    default: &Endpoint,
    rng: &mut R,
) -> Endpoint {
    if let Some(endpoint) = node_override.filter(|endpoint| endpoint.is_usable_override()) {
        debug!(url = %endpoint.url, "using node override");
        return endpoint.clone();
    }

    let picked = allowlist
        .and_then(|allowlist| allowlist.network(network))
        .and_then(|entry| entry.endpoints().choose(rng));

    match picked {
        Some(endpoint) => {
            debug!(network, url = %endpoint.url, "picked allowlisted endpoint");
            endpoint.clone()
        }
        None => {
            debug!(network, url = %default.url, "no allowlisted endpoint, using default");
            default.clone()
        }
    }
}
