pub mod error;
pub mod md5;

pub use error::DigestError;
