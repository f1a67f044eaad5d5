//! Seams to the batcher's external collaborators: the chain node, the proof
//! aggregation backend, and the funding address selector.

pub mod address;
pub mod chain_client;
pub mod prover;

pub use address::{AddressPurpose, AddressSelector, AddressSelectorError};
pub use chain_client::{ChainClient, ChainClientError, TipSetToken};
pub use prover::{ProofAggregator, ProverError};

#[cfg(feature = "test-utils")]
pub use address::MockAddressSelector;
#[cfg(feature = "test-utils")]
pub use chain_client::MockChainClient;
#[cfg(feature = "test-utils")]
pub use prover::MockProofAggregator;
