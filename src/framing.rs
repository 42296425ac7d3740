//! # 比特帧模块
//!
//! 在文本消息与带长度前缀的比特序列之间做无损转换。
//!
//! 帧格式：`[长度: 32 bits 大端][字符 0: 8 bits]...[字符 L-1: 8 bits]`，
//! 长度以字符数计，而不是字节数。

use crate::constants::{BITS_PER_CHAR, LENGTH_PREFIX_BITS};
use crate::error::{StegoError, Underflow};

/// 有序的单比特序列。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSequence {
    bits: Vec<bool>,
}

impl BitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.bits.reserve(additional);
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// 以大端顺序追加 `value` 的低 `width` 位。
    pub fn push_be(&mut self, value: u32, width: usize) {
        debug_assert!(width <= 32);
        self.bits
            .extend((0..width).rev().map(|shift| (value >> shift) & 1 == 1));
    }

    /// 从 `start` 开始，以大端顺序读取 `width` 位。
    ///
    /// 越界时返回 `None`。
    pub fn read_be(&self, start: usize, width: usize) -> Option<u32> {
        debug_assert!(width <= 32);
        let end = start.checked_add(width)?;
        let window = self.bits.get(start..end)?;
        Some(
            window
                .iter()
                .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit)),
        )
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

/// 一条含 `chars` 个字符的消息成帧后的总比特数。
pub fn framed_len(chars: usize) -> usize {
    chars
        .saturating_mul(BITS_PER_CHAR)
        .saturating_add(LENGTH_PREFIX_BITS)
}

/// 读取比特序列开头声明的字符数；不足 32 位时返回 `None`。
pub fn declared_length(bits: &BitSequence) -> Option<u32> {
    bits.read_be(0, LENGTH_PREFIX_BITS)
}

/// 将消息编码为带长度前缀的比特序列。
///
/// # Errors
///
/// * 字符数超过 `u32::MAX` 时返回 [`StegoError::PayloadTooLong`]。
/// * 任一字符码点大于 255 时返回 [`StegoError::CodePointRange`]。
pub fn encode(payload: &str) -> Result<BitSequence, StegoError> {
    let length = payload.chars().count();
    let declared = u32::try_from(length).map_err(|_| StegoError::PayloadTooLong { length })?;

    let mut bits = BitSequence::with_capacity(framed_len(length));
    bits.push_be(declared, LENGTH_PREFIX_BITS);

    for (index, ch) in payload.chars().enumerate() {
        let code = u8::try_from(ch).map_err(|_| StegoError::CodePointRange { index, ch })?;
        bits.push_be(u32::from(code), BITS_PER_CHAR);
    }

    Ok(bits)
}

/// 将比特序列解码回消息。
///
/// 只使用前 `32 + 8·L` 位，多余的比特被忽略。
///
/// # Errors
///
/// 比特不足时返回 [`StegoError::Underflow`]。
pub fn decode(bits: &BitSequence) -> Result<String, StegoError> {
    let declared = declared_length(bits).ok_or(Underflow::MissingLengthPrefix {
        available: bits.len(),
    })?;

    let required = framed_len(declared as usize);
    if bits.len() < required {
        return Err(Underflow::TruncatedPayload {
            declared,
            required,
            available: bits.len(),
        }
        .into());
    }

    let payload = (0..declared as usize)
        .map(|i| {
            let offset = LENGTH_PREFIX_BITS + BITS_PER_CHAR * i;
            bits.read_be(offset, BITS_PER_CHAR)
                .map(|code| char::from(code as u8))
                .ok_or(Underflow::TruncatedPayload {
                    declared,
                    required,
                    available: bits.len(),
                })
        })
        .collect::<Result<String, Underflow>>()?;

    Ok(payload)
}
