use image::imageops;
use image::{Rgba, RgbaImage};
use imageproc::rect::Rect;

use crate::*;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn overlay_at(canvas: &mut RgbaImage, layer: &RgbaImage, region: Region) {
    imageops::overlay(canvas, layer, region.x, region.y);
}

/// 名前に使うフォントサイズ (px)。大きい方で canvas 幅を超えるなら小さい方。
pub fn label_font_px(assets: &AssetBundle, name: &str) -> u32 {
    let font = assets.font();
    assets
        .layout()
        .font_px(|px| font.measure(name, px).width())
}

/// 頭像を合成する。
///
/// 重ね順は 背景 < 立ち絵 < 昇進 < 職業 < レアリティ < 名前帯 < 名前 で固定。
/// 入力が範囲内なら失敗しない。
pub fn compose(
    assets: &AssetBundle,
    portrait: &RgbaImage,
    name: &str,
    elite: Option<EliteLevel>,
    rarity: Rarity,
    profession: Profession,
) -> RgbaImage {
    let layout = assets.layout();
    let k = assets.constants();

    let mut img = RgbaImage::from_pixel(layout.canvas_width, layout.canvas_height, TRANSPARENT);

    overlay_at(&mut img, assets.background(), layout.background);

    let portrait = crate::asset::resize(
        portrait,
        layout.portrait.width,
        layout.portrait.height,
        k.filter,
    );
    overlay_at(&mut img, &portrait, layout.portrait);

    if let Some(level) = elite {
        overlay_at(&mut img, assets.elite_badge(level), layout.elite);
    }

    overlay_at(&mut img, assets.profession_badge(profession), layout.profession);

    let badge = assets.rarity_badge(rarity);
    overlay_at(&mut img, badge, layout.rarity(badge.width()));

    draw_label(&mut img, assets, name);

    img
}

fn draw_label(img: &mut RgbaImage, assets: &AssetBundle, name: &str) {
    let layout = assets.layout();
    let k = assets.constants();

    let band = layout.label;
    if band.width > 0 && band.height > 0 {
        let rect = Rect::at(band.x as i32, band.y as i32).of_size(band.width, band.height);
        imageproc::drawing::draw_filled_rect_mut(img, rect, k.label_color);
    }

    if name.is_empty() {
        return;
    }

    let px = label_font_px(assets, name);
    if px == 0 {
        return;
    }
    assets
        .font()
        .draw_centered(img, layout.text_center, px, k.text_color, name);
}
