mod common;

use image::{Rgba, RgbaImage};

use avatar_forge::*;

use common::*;

#[test]
fn canvas_size_for_every_combination() {
    let assets = bundle(90);
    let layout = assets.layout().clone();
    let portrait = portrait();

    for &profession in &Profession::ALL {
        for rarity in Rarity::all() {
            for &elite in &EliteLevel::VARIANTS {
                for name in &["", "W", "Skadi the Corrupting Heart"] {
                    let img = compose(&assets, &portrait, name, elite, rarity, profession);
                    assert_eq!(
                        img.dimensions(),
                        (layout.canvas_width, layout.canvas_height)
                    );
                }
            }
        }
    }
}

#[test]
fn compose_is_deterministic() {
    let assets = bundle(180);
    let portrait = portrait();

    let a = compose(
        &assets,
        &portrait,
        "Amiya",
        Some(EliteLevel::Elite2),
        Rarity::new(4).unwrap(),
        Profession::Caster,
    );
    let b = compose(
        &assets,
        &portrait,
        "Amiya",
        Some(EliteLevel::Elite2),
        Rarity::new(4).unwrap(),
        Profession::Caster,
    );

    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn elite_badge_covers_portrait() {
    let assets = bundle(180);
    let layout = assets.layout().clone();
    let (x, y) = (10, 130);
    assert!(layout.portrait.contains(x, y));
    assert!(layout.elite.contains(x, y));
    assert!(!layout.profession.contains(x, y));

    let rarity = Rarity::new(0).unwrap();

    let plain = compose(&assets, &portrait(), "A", None, rarity, Profession::Tank);
    assert!(close(*plain.get_pixel(x, y), PORTRAIT), "{:?}", plain.get_pixel(x, y));

    for &level in &EliteLevel::ALL {
        let img = compose(&assets, &portrait(), "A", Some(level), rarity, Profession::Tank);
        let p = *img.get_pixel(x, y);
        assert!(close(p, ELITE[level.value() as usize]), "{:?}: {:?}", level, p);
    }
}

#[test]
fn badges_stack_in_fixed_order() {
    let assets = bundle(180);
    let layout = assets.layout().clone();
    let rarity = Rarity::new(5).unwrap();
    let rarity_region = layout.rarity(assets.rarity_badge(rarity).width());

    let img = compose(
        &assets,
        &portrait(),
        "A",
        Some(EliteLevel::Elite0),
        rarity,
        Profession::Medic,
    );

    // 職業バッジは頭像の左上
    assert!(close(*img.get_pixel(5, 5), PROFESSION));
    // レアリティは昇進バッジより上
    let (x, y) = (rarity_region.x + 1, rarity_region.bottom() - 2);
    assert!(layout.elite.contains(x, y));
    assert!(close(*img.get_pixel(x, y), RARITY), "{:?}", img.get_pixel(x, y));
    // どのバッジにも覆われていない所は立ち絵
    assert!(close(*img.get_pixel(120, 60), PORTRAIT));
}

#[test]
fn background_is_beneath_portrait() {
    let assets = bundle(180);

    let clear = RgbaImage::new(64, 64);
    let img = compose(&assets, &clear, "A", None, Rarity::new(0).unwrap(), Profession::Sniper);
    assert!(close(*img.get_pixel(100, 60), BACKGROUND));

    let img = compose(&assets, &portrait(), "A", None, Rarity::new(0).unwrap(), Profession::Sniper);
    assert!(close(*img.get_pixel(100, 60), PORTRAIT));
}

#[test]
fn label_band_covers_elite_overhang() {
    let assets = bundle(180);
    let layout = assets.layout().clone();
    let label_color = assets.constants().label_color;

    // 昇進バッジは余白の分だけ名前帯にはみ出す
    assert!(layout.elite.bottom() > layout.label.y);
    let (x, y) = (2, layout.label.y + 1);
    assert!(layout.elite.contains(x, y));

    let img = compose(
        &assets,
        &portrait(),
        "Ai",
        Some(EliteLevel::Elite1),
        Rarity::new(2).unwrap(),
        Profession::Support,
    );

    assert_eq!(*img.get_pixel(x, y), label_color);
    assert_eq!(img.get_pixel(x, layout.canvas_height - 1)[3], 0xFF);
}

#[test]
fn corners_outside_layers_stay_transparent() {
    let k = LayoutConstants {
        horizontal_padding: 0.25,
        ..LayoutConstants::DEFAULT
    };
    let assets = AssetBundle::from_images(sources(), font(), 100, k).unwrap();

    let img = compose(
        &assets,
        &portrait(),
        "A",
        None,
        Rarity::new(1).unwrap(),
        Profession::Pioneer,
    );

    assert_eq!(img.dimensions(), (150, 122));
    assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    assert_eq!(*img.get_pixel(149, 50), Rgba([0, 0, 0, 0]));
}

fn text_rows(img: &RgbaImage, layout: &Layout, label_color: Rgba<u8>) -> Option<(u32, u32)> {
    let band = layout.label;
    let rows: Vec<u32> = (band.y..band.bottom())
        .filter(|&y| (band.x..band.right()).any(|x| *img.get_pixel(x, y) != label_color))
        .collect();

    Some((*rows.first()?, *rows.last()?))
}

#[test]
fn long_names_fall_back_to_small_font() {
    let assets = bundle(180);
    let layout = assets.layout().clone();
    let label_color = assets.constants().label_color;

    let long = "Ch'en the Holungday";
    let short = "Ag";

    assert!(assets.font().measure(long, layout.font_px_large).width() > layout.canvas_width);
    assert_eq!(label_font_px(&assets, long), layout.font_px_small);
    assert_eq!(label_font_px(&assets, short), layout.font_px_large);

    // 描画された文字の高さが小さいフォントの境界に収まる
    let img = compose(
        &assets,
        &portrait(),
        long,
        None,
        Rarity::new(3).unwrap(),
        Profession::Special,
    );
    let (top, bottom) = text_rows(&img, &layout, label_color).unwrap();
    let small = assets.font().measure(long, layout.font_px_small);
    assert!(bottom - top + 1 <= small.height(), "{}..={} vs {:?}", top, bottom, small);

    let img = compose(
        &assets,
        &portrait(),
        short,
        None,
        Rarity::new(3).unwrap(),
        Profession::Special,
    );
    let (top, bottom) = text_rows(&img, &layout, label_color).unwrap();
    let large = assets.font().measure(short, layout.font_px_large);
    assert!(bottom - top + 1 <= large.height());
}

#[test]
fn label_text_is_centered() {
    let assets = bundle(180);
    let layout = assets.layout().clone();
    let label_color = assets.constants().label_color;

    let img = compose(
        &assets,
        &portrait(),
        "Amiya",
        None,
        Rarity::new(4).unwrap(),
        Profession::Caster,
    );

    let band = layout.label;
    let cols: Vec<u32> = (band.x..band.right())
        .filter(|&x| (band.y..band.bottom()).any(|y| *img.get_pixel(x, y) != label_color))
        .collect();
    let mid = (cols.first().unwrap() + cols.last().unwrap() + 1) as i32 / 2;
    assert!((mid - layout.text_center.0 as i32).abs() <= 2, "mid = {}", mid);

    let (top, bottom) = text_rows(&img, &layout, label_color).unwrap();
    let mid = (top + bottom + 1) as i32 / 2;
    assert!((mid - layout.text_center.1 as i32).abs() <= 2, "mid = {}", mid);
}
