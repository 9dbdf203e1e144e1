mod core;

use crate::error::DigestError;

/// 摘要的字节长度
pub const DIGEST_LEN: usize = 16;

/// 分组的字节长度
const BLOCK_LEN: usize = 64;

/// 计算摘要信息，返回由16进制小写字符组成的长度为32的字符串
pub fn digest(data: &str) -> String {
    digest_bytes(data.as_bytes())
}

/// 计算任意字节序列的摘要，返回由16进制小写字符组成的字符串
pub fn digest_bytes(data: &[u8]) -> String {
    tracing::trace!(len = data.len(), "md5 digest");
    hex::encode(hash(data))
}

/// 计算原始的128比特摘要
pub fn hash(data: &[u8]) -> [u8; DIGEST_LEN] {
    core::Crypto::new(data).hash()
}

/// 将16进制字符串解析为摘要，大小写均可，忽略首尾空白
pub fn parse(digest: &str) -> Result<[u8; DIGEST_LEN], DigestError> {
    let bytes = hex::decode(digest.trim())?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| DigestError::InvalidLength {
        expected: DIGEST_LEN,
        actual,
    })
}

/// 校验数据的摘要是否与给定的16进制摘要一致
pub fn verify(data: &str, expected: &str) -> Result<bool, DigestError> {
    let expected = parse(expected)?;
    let matched = hash(data.as_bytes()) == expected;
    if !matched {
        tracing::debug!(expected = %hex::encode(expected), "md5 digest mismatch");
    }
    Ok(matched)
}


/// 增量计算摘要，可分多次写入数据；只保留寄存器和不足一个分组的尾部数据
#[derive(Debug, Clone)]
pub struct Md5 {
    registers: [u32; 4],
    tail: Vec<u8>,
    length: u64,
}

impl Default for Md5 {
    fn default() -> Self {
        Md5 {
            registers: core::IV,
            tail: Vec::with_capacity(BLOCK_LEN),
            length: 0,
        }
    }
}

impl Md5 {
    /// 创建处于初始状态的摘要计算器
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入数据，凑满的分组立即压缩
    pub fn update(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        let mut data = data.as_ref();
        self.length = self.length.wrapping_add(data.len() as u64);

        if !self.tail.is_empty() {
            let take = (BLOCK_LEN - self.tail.len()).min(data.len());
            self.tail.extend_from_slice(&data[..take]);
            data = &data[take..];
            if self.tail.len() < BLOCK_LEN {
                return self;
            }
            let mut block = [0; BLOCK_LEN];
            block.copy_from_slice(&self.tail);
            core::compress(&mut self.registers, &block);
            self.tail.clear();
        }

        let mut chunks = data.chunks_exact(BLOCK_LEN);
        for chunk in &mut chunks {
            let mut block = [0; BLOCK_LEN];
            block.copy_from_slice(chunk);
            core::compress(&mut self.registers, &block);
        }
        self.tail.extend_from_slice(chunks.remainder());
        self
    }

    /// 填充尾部数据并输出128比特的摘要
    pub fn finalize(mut self) -> [u8; DIGEST_LEN] {
        core::pad(&mut self.tail, self.length);
        for chunk in self.tail.chunks_exact(BLOCK_LEN) {
            let mut block = [0; BLOCK_LEN];
            block.copy_from_slice(chunk);
            core::compress(&mut self.registers, &block);
        }
        core::output(&self.registers)
    }

    /// 输出由16进制小写字符组成的摘要
    pub fn finalize_hex(self) -> String {
        hex::encode(self.finalize())
    }
}


#[cfg(test)]
mod tests {
    use crate::md5::{self, Md5, BLOCK_LEN};

    #[test]
    fn streaming_keeps_only_a_partial_block() {
        let chunk = [0x5a; 1000];
        let mut hasher = Md5::new();
        for _ in 0..1024 {
            hasher.update(chunk);
            assert!(hasher.tail.len() < BLOCK_LEN);
        }
        assert_eq!(hasher.length, 1024 * 1000);

        let mut whole = Vec::new();
        for _ in 0..1024 {
            whole.extend_from_slice(&chunk);
        }
        assert_eq!(hasher.finalize(), md5::hash(&whole));
    }

    #[test]
    fn streaming_fills_tail_byte_by_byte() {
        let text = "12345678901234567890123456789012345678901234567890123456789012345678901234567890";
        let mut hasher = Md5::new();
        for b in text.bytes() {
            hasher.update([b]);
            assert!(hasher.tail.len() < BLOCK_LEN);
        }
        assert_eq!(hasher.finalize_hex(), "57edf4a22be3c955ac49da2e2107b67a");
    }
}
