//! # rgb_lsb 库
//!
//! 本库包含 RGB 通道 LSB 隐写工具的核心逻辑：
//! 比特帧编解码 (`framing`)、像素通道编解码 (`steganography`)，
//! 以及图像存取 (`store`) 与命令行外壳 (`cli`, `handler`)。

pub mod cli;
pub mod constants;
pub mod error;
pub mod framing;
pub mod handler;
pub mod steganography;
pub mod store;

pub use error::{StegoError, Underflow};
pub use framing::BitSequence;
