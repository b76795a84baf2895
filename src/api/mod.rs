pub mod envelope;

pub use envelope::{codes, BkV2Response, Empty, V1Response, V2Response};
