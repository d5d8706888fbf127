pub mod organization;
pub mod query;
pub mod session;

pub use organization::{
    Organization, OrganizationsView, OrganisationsResponse, SwitchReport, SwitchRequest,
    SwitchStatus,
};
pub use query::ApiQuery;
pub use session::{AuthUser, SessionTokens, TokenResponse, UserSession};
