//! Outbound clients and the enrichment flow built on them.

mod account_client;
mod enricher;
mod identity_client;
pub mod metrics;

pub use account_client::AccountResolverClient;
pub use enricher::ClaimEnricher;
pub use identity_client::{IdentityProviderClient, ServiceCredential};
