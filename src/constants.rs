use image::ImageFormat;

/// 长度前缀所占的比特数。
/// 消息的字符数以 32 位大端无符号整数写在比特序列最前面。
pub const LENGTH_PREFIX_BITS: usize = 32;

/// 每个字符占用的比特数。
/// 字符码点必须落在 0..=255 范围内，按 8 位大端写入。
pub const BITS_PER_CHAR: usize = 8;

/// 每个像素可承载的比特数：R、G、B 各一位。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 未指定输出路径时，隐写结果文件名的前缀。
pub const HIDDEN_IMAGE_PREFIX: &str = "doctored_";

/// 可以逐字节无损保存像素数据的输出格式。
/// JPEG 等有损格式会重新量化通道值，从而破坏隐藏的数据。
pub const LOSSLESS_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::WebP,
    ImageFormat::Qoi,
];
