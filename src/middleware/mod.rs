pub mod esb;

pub use esb::{esb_auth_middleware, esb_auth_v1_middleware, EsbCredential, ESB_TOKEN_HEADER};
