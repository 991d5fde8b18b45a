use std::path::{Path, PathBuf};

use eyre::WrapErr;
use image::imageops;
use image::RgbaImage;

use crate::*;

/// "name" -> `avatar_name.png`、"name2" -> `avatar_name_2.png`。
/// 末尾の数字 1 桁を昇進段階として扱う。
pub fn avatar_file_name(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next_back() {
        Some(c) if c.is_ascii_digit() && !chars.as_str().is_empty() => {
            let level = c.to_digit(10).unwrap_or_default();
            if level <= 2 {
                output_file_name(chars.as_str(), Some(EliteLevel::new(level as u8)))
            } else {
                output_file_name(token, None)
            }
        }
        _ => output_file_name(token, None),
    }
}

pub fn avatar_paths<'a>(dir: &Path, tokens: impl IntoIterator<Item = &'a str>) -> Vec<PathBuf> {
    tokens
        .into_iter()
        .map(|token| dir.join(avatar_file_name(token)))
        .collect()
}

/// 同じ幅の画像を左から並べる。間隔は幅 × `gap` (偶数丸め)。
/// 高さは最も高い画像に合わせ、余白は透明。
pub fn combine_strip(images: &[RgbaImage], gap: f64) -> RgbaImage {
    let first = match images.first() {
        Some(img) => img,
        None => return RgbaImage::new(0, 0),
    };

    let width = first.width();
    let height = images.iter().map(|img| img.height()).max().unwrap_or(0);
    let gap_px = (f64::from(width) * gap.max(0.0)).round_ties_even() as u32;
    let n = images.len() as u32;

    let mut strip = RgbaImage::new(n * width + (n - 1) * gap_px, height);
    for (i, img) in images.iter().enumerate() {
        let x = i as u32 * (width + gap_px);
        imageops::replace(&mut strip, img, x, 0);
    }

    strip
}

/// ファイルが存在するものだけ読み込む。
pub fn open_existing(paths: impl IntoIterator<Item = PathBuf>) -> eyre::Result<Vec<RgbaImage>> {
    let mut images = Vec::new();
    for path in paths {
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "not found, skipping");
            continue;
        }
        let img = image::open(&path)
            .wrap_err_with(|| format!("cannot decode {}", path.display()))?
            .into_rgba8();
        images.push(img);
    }

    Ok(images)
}
