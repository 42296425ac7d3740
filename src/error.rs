//! # 错误类型模块
//!
//! 定义隐写核心 (比特帧与像素通道编解码) 可能产生的全部错误。
//! 这些错误都是确定性的逻辑错误，调用方不应重试。

use thiserror::Error;

/// 隐写核心的错误。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 消息所需的比特数超过了图像的通道容量。
    #[error("message needs {required} bits but the image only holds {available}")]
    Capacity { required: usize, available: usize },

    /// 消息中某个字符的码点超出 8 位范围。
    #[error("character {ch:?} at index {index} does not fit in 8 bits")]
    CodePointRange { index: usize, ch: char },

    /// 消息的字符数无法用 32 位长度前缀表示。
    #[error("message has {length} characters, more than a 32-bit length prefix can declare")]
    PayloadTooLong { length: usize },

    /// 可用的比特不足以组成一条完整的消息。
    #[error("no valid hidden message: {0}")]
    Underflow(#[from] Underflow),
}

/// 比特不足的两种情形。
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Underflow {
    /// 连 32 位长度前缀都凑不齐。
    #[error("only {available} bits available, the length prefix alone needs 32")]
    MissingLengthPrefix { available: usize },

    /// 长度前缀声明的字符数超出了剩余的比特。
    #[error(
        "declared length of {declared} characters needs {required} bits but only {available} are available"
    )]
    TruncatedPayload {
        declared: u32,
        required: usize,
        available: usize,
    },
}
