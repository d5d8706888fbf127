pub mod account;
pub mod event;

pub use account::{AccountContext, AccountLookupRequest};
pub use event::{EventSecrets, HookSecrets, LoginEvent, LoginRequest, LoginUser};
