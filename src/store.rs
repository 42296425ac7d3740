//! # 图像存取模块
//!
//! 负责从磁盘读取图像并统一转换为 8 位 RGB，以及将结果以无损格式写回磁盘。

use crate::constants::LOSSLESS_FORMATS;
use image::{ImageError, ImageFormat, RgbImage};
use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 图像读写错误。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unable to open image {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("unable to save image {}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("cannot determine an image format from {}", .path.display())]
    UnknownFormat { path: PathBuf },

    #[error("{format:?} is lossy and would destroy the hidden data in {}", .path.display())]
    LossyFormat { path: PathBuf, format: ImageFormat },
}

/// 读取图像并转换为 RGB。
///
/// 灰度、调色板等图像会被展开为三通道，Alpha 通道被丢弃。
pub fn load(path: &Path) -> Result<RgbImage, StoreError> {
    let image = image::open(path).map_err(|source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image.into_rgb8())
}

/// 根据扩展名推断的输出格式；不是无损格式时报错。
pub fn output_format(path: &Path) -> Result<ImageFormat, StoreError> {
    let format = ImageFormat::from_path(path).map_err(|_| StoreError::UnknownFormat {
        path: path.to_path_buf(),
    })?;

    if !LOSSLESS_FORMATS.contains(&format) {
        return Err(StoreError::LossyFormat {
            path: path.to_path_buf(),
            format,
        });
    }

    Ok(format)
}

/// 以无损格式保存图像。格式不合适时不会写入任何文件。
pub fn save(raster: &RgbImage, path: &Path) -> Result<(), StoreError> {
    let format = output_format(path)?;

    raster
        .save_with_format(path, format)
        .map_err(|source| StoreError::Save {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("saved {} as {format:?}", path.display());
    Ok(())
}
