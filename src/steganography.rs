//! # 像素通道编解码模块
//!
//! 按固定顺序遍历 RGB 图像的通道：先行后列 (第 0 行起，每行从左到右)，
//! 每个像素内依次为 R、G、B。每个通道的最低有效位承载一个比特。
//! 编码端与解码端必须严格遵守同一顺序。

use crate::constants::{BITS_PER_CHAR, CHANNELS_PER_PIXEL, LENGTH_PREFIX_BITS};
use crate::error::{StegoError, Underflow};
use crate::framing::{self, BitSequence};
use image::RgbImage;
use log::debug;

/// 提取过程的扫描状态。
#[derive(Debug, Clone, Copy)]
enum Scan {
    /// 正在收集前 32 位长度前缀。
    Length,
    /// 长度已知，正在收集消息比特。
    Payload { declared: u32, required: usize },
}

/// 图像可承载的总比特数 (每个通道一位)。
pub fn capacity(raster: &RgbImage) -> usize {
    (raster.width() as usize)
        .saturating_mul(raster.height() as usize)
        .saturating_mul(CHANNELS_PER_PIXEL)
}

/// 图像最多能隐藏的字符数。
pub fn max_message_chars(raster: &RgbImage) -> usize {
    capacity(raster).saturating_sub(LENGTH_PREFIX_BITS) / BITS_PER_CHAR
}

/// 按扫描顺序读出每个通道的最低有效位。
pub fn scan_lsbs(raster: &RgbImage) -> impl Iterator<Item = bool> + '_ {
    raster
        .pixels()
        .flat_map(|pixel| pixel.0.iter())
        .map(|&channel| channel & 1 == 1)
}

/// 将比特序列写入图像各通道的最低有效位。
///
/// 写完最后一个比特后立即停止，其后的通道保持原值。
///
/// # Errors
///
/// 比特数超过图像容量时返回 [`StegoError::Capacity`]，此时图像不会被修改。
pub fn embed(raster: &mut RgbImage, bits: &BitSequence) -> Result<(), StegoError> {
    let required = bits.len();
    let available = capacity(raster);

    if required > available {
        return Err(StegoError::Capacity {
            required,
            available,
        });
    }

    let channels = raster.pixels_mut().flat_map(|pixel| pixel.0.iter_mut());
    bits.iter().zip(channels).for_each(|(bit, channel)| {
        *channel = (*channel & 0xFE) | u8::from(bit);
    });

    debug!("embedded {required} bits into {available} channel slots");
    Ok(())
}

/// 从图像中读出一条完整的帧 (`32 + 8·L` 位)。
///
/// 凑齐所需比特后立即停止扫描，不会读取最后一个通道之后的数据。
///
/// # Errors
///
/// 图像在凑齐所需比特前耗尽时返回 [`StegoError::Underflow`]。
pub fn extract(raster: &RgbImage) -> Result<BitSequence, StegoError> {
    let available = capacity(raster);
    let mut bits = BitSequence::with_capacity(LENGTH_PREFIX_BITS.min(available));
    let mut state = Scan::Length;

    for bit in scan_lsbs(raster) {
        bits.push(bit);

        if let Scan::Length = state {
            if bits.len() < LENGTH_PREFIX_BITS {
                continue;
            }

            let declared = framing::declared_length(&bits).ok_or(
                Underflow::MissingLengthPrefix {
                    available: bits.len(),
                },
            )?;
            let required = framing::framed_len(declared as usize);
            debug!("declared length {declared} characters, {required} bits required");

            // 声明长度可能远超图像容量，预留空间以容量为上限。
            bits.reserve(required.min(available).saturating_sub(bits.len()));
            state = Scan::Payload { declared, required };
        }

        if let Scan::Payload { required, .. } = state
            && bits.len() == required
        {
            return Ok(bits);
        }
    }

    let underflow = match state {
        Scan::Length => Underflow::MissingLengthPrefix {
            available: bits.len(),
        },
        Scan::Payload { declared, required } => Underflow::TruncatedPayload {
            declared,
            required,
            available: bits.len(),
        },
    };
    Err(underflow.into())
}

/// 编码消息并写入图像。
///
/// # Errors
///
/// 成帧或写入失败时返回相应的 [`StegoError`]；失败时图像保持不变。
pub fn hide(raster: &mut RgbImage, message: &str) -> Result<(), StegoError> {
    let bits = framing::encode(message)?;
    embed(raster, &bits)
}

/// 从图像中恢复隐藏的消息。
pub fn reveal(raster: &RgbImage) -> Result<String, StegoError> {
    let bits = extract(raster)?;
    framing::decode(&bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::{Rng, RngCore};

    fn random_raster(width: u32, height: u32) -> RgbImage {
        let mut raw = vec![0u8; (width * height) as usize * CHANNELS_PER_PIXEL];
        rand::rng().fill_bytes(&mut raw);
        RgbImage::from_raw(width, height, raw).unwrap()
    }

    #[test]
    fn capacity_is_three_bits_per_pixel() {
        let raster = RgbImage::new(7, 5);
        assert_eq!(capacity(&raster), 105);
        assert_eq!(max_message_chars(&raster), 9);
        assert_eq!(max_message_chars(&RgbImage::new(2, 2)), 0);
    }

    #[test]
    fn two_by_two_is_too_small_for_one_character() {
        let mut raster = random_raster(2, 2);
        let before = raster.clone();

        let err = hide(&mut raster, "A").unwrap_err();
        assert_eq!(
            err,
            StegoError::Capacity {
                required: 40,
                available: 12,
            }
        );
        assert_eq!(raster.as_raw(), before.as_raw());
    }

    #[test]
    fn four_by_four_round_trips_one_character() {
        let mut raster = random_raster(4, 4);
        hide(&mut raster, "A").unwrap();
        assert_eq!(reveal(&raster).unwrap(), "A");
    }

    #[test]
    fn exact_capacity_succeeds() {
        // 24 × 3 = 72 = 32 + 8 × 5
        let mut raster = random_raster(24, 1);
        hide(&mut raster, "hello").unwrap();
        assert_eq!(reveal(&raster).unwrap(), "hello");
    }

    #[test]
    fn one_bit_short_fails_and_leaves_raster_untouched() {
        // 21 × 3 = 63 = 32 + 8 × 4 - 1
        let mut raster = random_raster(21, 1);
        let before = raster.clone();

        let err = hide(&mut raster, "abcd").unwrap_err();
        assert_eq!(
            err,
            StegoError::Capacity {
                required: 64,
                available: 63,
            }
        );
        assert_eq!(raster.as_raw(), before.as_raw());
    }

    #[test]
    fn code_point_error_happens_before_raster_access() {
        let mut raster = random_raster(32, 32);
        let before = raster.clone();

        let err = hide(&mut raster, "ok → no").unwrap_err();
        assert!(matches!(err, StegoError::CodePointRange { index: 3, .. }));
        assert_eq!(raster.as_raw(), before.as_raw());
    }

    #[test]
    fn empty_message_round_trips() {
        let mut raster = random_raster(4, 3);
        hide(&mut raster, "").unwrap();
        assert_eq!(reveal(&raster).unwrap(), "");
    }

    #[test]
    fn writes_bits_in_row_major_rgb_order() {
        let mut raster = RgbImage::from_pixel(4, 4, Rgb([0xFE, 0xFE, 0xFE]));
        let bits = framing::encode("A").unwrap();
        embed(&mut raster, &bits).unwrap();

        let lsbs: Vec<bool> = raster.as_raw().iter().map(|&c| c & 1 == 1).collect();
        assert_eq!(&lsbs[..bits.len()], bits.as_slice());
        // 第 31 位 (长度前缀的最低位) 落在第 10 个像素 (x = 2, y = 2) 的 G 通道。
        assert_eq!(raster.get_pixel(2, 2).0, [0xFE, 0xFF, 0xFE]);
    }

    #[test]
    fn channels_after_the_last_bit_are_untouched() {
        let mut raster = random_raster(10, 10);
        let before = raster.clone();
        hide(&mut raster, "A").unwrap();

        assert_eq!(raster.as_raw()[40..], before.as_raw()[40..]);
        raster
            .as_raw()
            .iter()
            .zip(before.as_raw())
            .take(40)
            .for_each(|(after, before)| assert_eq!(after & 0xFE, before & 0xFE));
    }

    #[test]
    fn extract_returns_exactly_the_frame() {
        let mut raster = random_raster(20, 20);
        hide(&mut raster, "frame").unwrap();

        let bits = extract(&raster).unwrap();
        assert_eq!(bits.len(), framing::framed_len(5));
        assert_eq!(bits, framing::encode("frame").unwrap());
    }

    #[test]
    fn tiny_raster_underflows_on_length_prefix() {
        let raster = random_raster(3, 3);
        assert_eq!(
            extract(&raster).unwrap_err(),
            StegoError::Underflow(Underflow::MissingLengthPrefix { available: 27 })
        );
    }

    #[test]
    fn declared_length_beyond_capacity_underflows() {
        let mut raster = random_raster(4, 4);
        let mut bits = BitSequence::new();
        bits.push_be(100, LENGTH_PREFIX_BITS);
        embed(&mut raster, &bits).unwrap();

        assert_eq!(
            extract(&raster).unwrap_err(),
            StegoError::Underflow(Underflow::TruncatedPayload {
                declared: 100,
                required: 832,
                available: 48,
            })
        );
    }

    #[test]
    fn scan_runs_out_a_few_bits_short_of_the_declared_frame() {
        // 5 × 3 × 3 = 45 位，两个字符的帧需要 48 位。
        let mut raster = random_raster(5, 3);
        let mut bits = BitSequence::new();
        bits.push_be(2, LENGTH_PREFIX_BITS);
        bits.push_be(u32::from(b'o'), BITS_PER_CHAR);
        embed(&mut raster, &bits).unwrap();

        assert_eq!(
            extract(&raster).unwrap_err(),
            StegoError::Underflow(Underflow::TruncatedPayload {
                declared: 2,
                required: 48,
                available: 45,
            })
        );
    }

    #[test]
    fn flipping_scan_position_five_changes_only_bit_five() {
        let mut raster = random_raster(6, 6);
        let before: Vec<bool> = scan_lsbs(&raster).collect();

        // 扫描位置 5 是第 1 个像素 (x = 1, y = 0) 的 B 通道。
        raster.get_pixel_mut(1, 0).0[2] ^= 1;
        let after: Vec<bool> = scan_lsbs(&raster).collect();

        let changed: Vec<usize> = (0..before.len())
            .filter(|&i| before[i] != after[i])
            .collect();
        assert_eq!(changed, vec![5]);
    }

    #[test]
    fn flipping_a_payload_channel_changes_only_that_bit() {
        let mut raster = random_raster(8, 8);
        hide(&mut raster, "xyz").unwrap();
        let before = extract(&raster).unwrap();

        // 扫描位置 40 是第 13 个像素 (x = 5, y = 1) 的 G 通道。
        raster.get_pixel_mut(5, 1).0[1] ^= 1;
        let after = extract(&raster).unwrap();

        assert_eq!(before.len(), after.len());
        let changed: Vec<usize> = (0..before.len())
            .filter(|&i| before.get(i) != after.get(i))
            .collect();
        assert_eq!(changed, vec![40]);
        assert_ne!(reveal(&raster).unwrap(), "xyz");
    }

    #[test]
    fn random_latin1_messages_round_trip() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let length = rng.random_range(0..200);
            let message: String = (0..length)
                .map(|_| char::from(rng.random::<u8>()))
                .collect();

            let mut raster = random_raster(40, 40);
            hide(&mut raster, &message).unwrap();
            assert_eq!(reveal(&raster).unwrap(), message);
        }
    }
}
