//! Network fee charged on aggregated prove-commits.
//!
//! Aggregation moves verification cost off the gas market, so the protocol
//! charges a flat per-sector fee instead: the base fee (floored by the batch
//! balancer) times an estimated single prove-commit gas usage, discounted
//! for proving in bulk.

use fvm_shared::econ::TokenAmount;
use fvm_shared::version::NetworkVersion;

/// Estimated gas burned by one un-aggregated prove-commit.
const SINGLE_PROVE_COMMIT_GAS_USAGE: i64 = 49_299_973;

/// Discount granted for proving in bulk.
const BATCH_DISCOUNT_NUM: i64 = 1;
const BATCH_DISCOUNT_DENOM: i64 = 20;

/// Gas-price floor applied when pricing aggregation, in nanoFIL per gas
/// unit. Keeps the fee meaningful when the gas market is idle.
fn batch_balancer() -> TokenAmount {
    TokenAmount::from_nano(5)
}

/// The fee the network charges for an aggregated prove-commit of
/// `aggregate_size` sectors at the given base fee.
///
/// Network versions that predate proof aggregation charge nothing.
pub fn aggregate_prove_commit_network_fee(
    nv: NetworkVersion,
    aggregate_size: usize,
    base_fee: &TokenAmount,
) -> TokenAmount {
    if nv < NetworkVersion::V13 {
        return TokenAmount::from_atto(0);
    }

    let effective_fee = std::cmp::max(base_fee.clone(), batch_balancer());
    let atto = effective_fee.atto()
        * SINGLE_PROVE_COMMIT_GAS_USAGE
        * (aggregate_size as i64)
        * BATCH_DISCOUNT_NUM
        / BATCH_DISCOUNT_DENOM;
    TokenAmount::from_atto(atto)
}
