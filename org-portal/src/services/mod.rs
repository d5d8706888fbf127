pub mod gateway_client;
pub mod identity_client;
pub mod metrics;
pub mod org_switch;

pub use gateway_client::{GatewayClient, GatewayResponse};
pub use identity_client::{CacheMode, GetTokenOptions, IdentityClient};
pub use org_switch::{active_org_from_tokens, OrgSwitcher};
