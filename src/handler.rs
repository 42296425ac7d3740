//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::HIDDEN_IMAGE_PREFIX;
use crate::error::StegoError;
use crate::steganography::{capacity, hide, max_message_chars, reveal};
use crate::store;
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 未指定输出路径时隐写图像的默认路径：与输入图像同目录的 `doctored_<名称>.png`。
pub fn default_hidden_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_else(|| "image".into());
    image.with_file_name(format!("{HIDDEN_IMAGE_PREFIX}{stem}.png"))
}

/// 目标文件已存在且未指定 `--force` 时拒绝继续。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本、检查隐写空间是否足够、调用隐写核心函数写入消息，
/// 最后将结果以无损格式写入目标图像文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 消息为空，或包含码点大于 255 的字符。
/// * 图像文件没有足够的空间来隐藏文本。
/// * 目标文件已存在且未指定 `--force`，或其格式不是无损格式。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let message = match (args.message, &args.text) {
        (Some(message), _) => message,
        (None, Some(text)) => fs::read_to_string(text).with_context(|| {
            format!(
                "Unable to read text file: {}",
                text.to_string_lossy().red().bold()
            )
        })?,
        (None, None) => anyhow::bail!("Either a message or a text file must be given."),
    };

    anyhow::ensure!(!message.is_empty(), "The message to hide is empty.");

    let dest = args
        .dest
        .unwrap_or_else(|| default_hidden_path(&args.image));
    ensure_writable(&dest, args.force)?;
    // 在修改像素之前确认输出格式可用。
    store::output_format(&dest).with_context(|| {
        format!(
            "Unsupported output image: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    let mut picture = store::load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    hide(&mut picture, &message).map_err(|err| match err {
        StegoError::Capacity {
            required,
            available,
        } => anyhow::Error::new(err).context(format!(
            "Not enough space in the image to hide the message. \nRequired: {} bits, Available: {} bits",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        )),
        StegoError::CodePointRange { index, ch } => anyhow::Error::new(err).context(format!(
            "Character {} (at index {}) cannot be hidden: only code points 0-255 are supported.",
            ch.to_string().red().bold(),
            index.to_string().green()
        )),
        other => anyhow::Error::new(other).context("Failed to hide the message in the image."),
    })?;

    store::save(&picture, &dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    info!(
        "hid {} characters from {} into {}",
        message.chars().count(),
        args.image.display(),
        dest.display()
    );
    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数提取消息，
/// 然后写入目标文本文件，或在未指定文件时直接输出到终端。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中没有有效的隐藏消息。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    if let Some(text) = &args.text {
        ensure_writable(text, args.force)?;
    }

    let picture = store::load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let message = reveal(&picture).with_context(|| {
        format!(
            "No valid hidden message found in '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    // 长度为 0 的帧无法与未隐写过的图像区分 (例如纯黑图像)，而 hide 从不写入空消息。
    anyhow::ensure!(
        !message.is_empty(),
        "No valid hidden message found in '{}'. \nThe image does not appear to carry a message.",
        args.image.to_string_lossy().red().bold()
    );

    info!(
        "recovered {} characters from {}",
        message.chars().count(),
        args.image.display()
    );

    match &args.text {
        Some(text) => {
            fs::write(text, &message).with_context(|| {
                format!(
                    "Unable to write to target text file: {}",
                    text.to_string_lossy().red().bold()
                )
            })?;

            println!(
                "The text has been successfully recovered and saved: {}",
                text.to_string_lossy().green().bold()
            );
        }
        None => println!("{message}"),
    }

    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：报告图像的比特容量和可隐藏的最大字符数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = store::load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} ({}x{}): {} bits, up to {} characters",
        args.image.to_string_lossy().bold(),
        picture.width(),
        picture.height(),
        capacity(&picture).to_string().green().bold(),
        max_message_chars(&picture).to_string().green().bold()
    );

    Ok(())
}
