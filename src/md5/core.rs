// 初始值，用于确定压缩函数寄存器的初态（A、B、C、D，小端存储）
pub const IV: [u32; 4] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

// 常量表，K[i] = floor(|sin(i + 1)| * 2^32)
const K: [u32; 64] = [
    0xd76a_a478, 0xe8c7_b756, 0x2420_70db, 0xc1bd_ceee, 0xf57c_0faf, 0x4787_c62a, 0xa830_4613, 0xfd46_9501,
    0x6980_98d8, 0x8b44_f7af, 0xffff_5bb1, 0x895c_d7be, 0x6b90_1122, 0xfd98_7193, 0xa679_438e, 0x49b4_0821,
    0xf61e_2562, 0xc040_b340, 0x265e_5a51, 0xe9b6_c7aa, 0xd62f_105d, 0x0244_1453, 0xd8a1_e681, 0xe7d3_fbc8,
    0x21e1_cde6, 0xc337_07d6, 0xf4d5_0d87, 0x455a_14ed, 0xa9e3_e905, 0xfcef_a3f8, 0x676f_02d9, 0x8d2a_4c8a,
    0xfffa_3942, 0x8771_f681, 0x6d9d_6122, 0xfde5_380c, 0xa4be_ea44, 0x4bde_cfa9, 0xf6bb_4b60, 0xbebf_bc70,
    0x289b_7ec6, 0xeaa1_27fa, 0xd4ef_3085, 0x0488_1d05, 0xd9d4_d039, 0xe6db_99e5, 0x1fa2_7cf8, 0xc4ac_5665,
    0xf429_2244, 0x432a_ff97, 0xab94_23a7, 0xfc93_a039, 0x655b_59c3, 0x8f0c_cc92, 0xffef_f47d, 0x8584_5dd1,
    0x6fa8_7e4f, 0xfe2c_e6e0, 0xa301_4314, 0x4e08_11a1, 0xf753_7e82, 0xbd3a_f235, 0x2ad7_d2bb, 0xeb86_d391,
];

// 每一步循环左移的位数，四轮各自使用一组
const S: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22,
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20,
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23,
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

fn ff(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (!x & z)
}

fn gg(x: u32, y: u32, z: u32) -> u32 {
    (x & z) | (y & !z)
}

fn hh(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}

fn ii(x: u32, y: u32, z: u32) -> u32 {
    y ^ (x | !z)
}


/// 假设消息m的长度为l 比特。首先将比特“1”添加到消息的末尾，再添加k 个“0”，
/// k是满足l + 1 + k ≡ 448 mod 512 的最小的非负整数。然后再添加一个64位比特串，
/// 该比特串是l的二进制表示，与SM3不同，这里按小端顺序写入。
///
/// `tail` 为尚未压缩的尾部数据，`length` 为整条消息的字节数。
pub fn pad(tail: &mut Vec<u8>, length: u64) {
    // 长度按 2^64 取模
    let l = length.wrapping_mul(8);
    tail.push(0x80);
    while tail.len() % 64 != 56 {
        tail.push(0x00);
    }
    tail.extend_from_slice(&l.to_le_bytes());
}

/// 压缩函数
/// 1. 将分组B(i)按小端划分为16个字 M0, M1, · · · , M15
/// 2. ABCD ← V(i)，共4轮、每轮16步:
///     第1轮 F = FF(B, C, D), g = j
///     第2轮 F = GG(B, C, D), g = (5j + 1) mod 16
///     第3轮 F = HH(B, C, D), g = (3j + 5) mod 16
///     第4轮 F = II(B, C, D), g = 7j mod 16
///     T ← A + F + Kj + Mg
///     A←D, D←C, C←B, B ← B + (T ≪ Sj)
/// 3. V(i+1) ← ABCD + V(i)（模 2^32 加）
pub fn compress(registers: &mut [u32; 4], b: &[u8; 64]) {
    let mut m: [u32; 16] = [0; 16];
    for (i, word) in m.iter_mut().enumerate() {
        *word = u32::from_le_bytes([b[i * 4], b[i * 4 + 1], b[i * 4 + 2], b[i * 4 + 3]]);
    }

    let mut ra = registers[0];
    let mut rb = registers[1];
    let mut rc = registers[2];
    let mut rd = registers[3];

    for j in 0..64 {
        let (f, g) = match j {
            0..=15 => (ff(rb, rc, rd), j),
            16..=31 => (gg(rb, rc, rd), (5 * j + 1) % 16),
            32..=47 => (hh(rb, rc, rd), (3 * j + 5) % 16),
            _ => (ii(rb, rc, rd), (7 * j) % 16),
        };
        let t = ra
            .wrapping_add(f)
            .wrapping_add(K[j])
            .wrapping_add(m[g]);
        ra = rd;
        rd = rc;
        rc = rb;
        rb = rb.wrapping_add(t.rotate_left(S[j]));
    }

    registers[0] = registers[0].wrapping_add(ra);
    registers[1] = registers[1].wrapping_add(rb);
    registers[2] = registers[2].wrapping_add(rc);
    registers[3] = registers[3].wrapping_add(rd);
}

/// 输出128比特的哈希值
pub fn output(registers: &[u32; 4]) -> [u8; 16] {
    // 小端模式：[u32; 4] -> [u8; 16]
    let mut hash: [u8; 16] = [0; 16];
    for (i, e) in registers.iter().enumerate() {
        hash[i * 4..(i + 1) * 4].copy_from_slice(&e.to_le_bytes());
    }
    hash
}


#[derive(Debug)]
pub struct Crypto {
    data: Vec<u8>,
    blocks: Vec<[u8; 64]>,
    registers: [u32; 4],
}

impl Crypto {
    pub fn new(data: &[u8]) -> Self {
        Crypto {
            data: data.to_vec(),
            blocks: Vec::new(),
            registers: IV,
        }
    }

    pub fn hash(&mut self) -> [u8; 16] {
        self.pad().block().iterate().output()
    }

    fn pad(&mut self) -> &mut Self {
        let length = self.data.len() as u64;
        pad(&mut self.data, length);
        self
    }

    /// 分组：将填充后的消息按512比特进行分组
    fn block(&mut self) -> &mut Self {
        self.blocks = self
            .data
            .chunks_exact(64)
            .map(|chunk| {
                let mut block = [0; 64];
                block.copy_from_slice(chunk);
                block
            })
            .collect();
        self
    }

    /// 迭代压缩
    fn iterate(&mut self) -> &mut Self {
        let registers = &mut self.registers;
        self.blocks.iter().for_each(|b| compress(registers, b));
        self
    }

    fn output(&self) -> [u8; 16] {
        output(&self.registers)
    }
}


#[cfg(test)]
mod tests {
    use crate::md5::core::Crypto;

    #[test]
    fn main() {
        let plain = String::from("abc");
        let data = plain.as_bytes();
        let hash = hex::encode(Crypto::new(data).hash());
        assert_eq!(hash, "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn padding_fills_to_block_boundary() {
        let mut crypto = Crypto::new(b"abc");
        crypto.pad();
        assert_eq!(crypto.data.len(), 64);
        assert_eq!(crypto.data[3], 0x80);
        assert_eq!(&crypto.data[56..], &24u64.to_le_bytes());
    }

    #[test]
    fn padding_spills_into_second_block() {
        // 56字节的消息无法在同一分组中放下长度字段
        let mut crypto = Crypto::new(&[0x61; 56]);
        crypto.pad().block();
        assert_eq!(crypto.blocks.len(), 2);
        assert_eq!(&crypto.data[120..], &448u64.to_le_bytes());
    }

    #[test]
    fn rfc1321_suite() {
        let cases = [
            ("", "d41d8cd98f00b204e9800998ecf8427e"),
            ("a", "0cc175b9c0f1b6a831c399e269772661"),
            ("abc", "900150983cd24fb0d6963f7d28e17f72"),
            ("message digest", "f96b697d7cb7938d525a2f31aaf161d0"),
            ("abcdefghijklmnopqrstuvwxyz", "c3fcd3d76192e4007dfb496cca67e13b"),
            (
                "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
                "d174ab98d277d9f5a5611c2c9f419d9f",
            ),
            (
                "12345678901234567890123456789012345678901234567890123456789012345678901234567890",
                "57edf4a22be3c955ac49da2e2107b67a",
            ),
        ];
        for (plain, expected) in cases {
            assert_eq!(hex::encode(Crypto::new(plain.as_bytes()).hash()), expected, "md5({:?})", plain);
        }
    }
}
