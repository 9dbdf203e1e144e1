use thiserror::Error;

/// 解析或校验十六进制摘要时可能出现的错误
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("digest is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("digest must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
