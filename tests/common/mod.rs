#![allow(dead_code)]

use std::path::Path;

use image::{Rgba, RgbaImage};

use avatar_forge::*;

pub const FONT: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/asset/DejaVuSans.ttf"));

pub const PORTRAIT: Rgba<u8> = Rgba([0xFF, 0x00, 0x00, 0xFF]);
pub const BACKGROUND: Rgba<u8> = Rgba([0x00, 0x00, 0xFF, 0xFF]);
pub const ELITE: [Rgba<u8>; 3] = [
    Rgba([0x00, 0xFF, 0x00, 0xFF]),
    Rgba([0x00, 0xC0, 0x40, 0xFF]),
    Rgba([0x00, 0x80, 0x80, 0xFF]),
];
pub const PROFESSION: Rgba<u8> = Rgba([0xFF, 0xFF, 0x00, 0xFF]);
pub const RARITY: Rgba<u8> = Rgba([0xFF, 0x00, 0xFF, 0xFF]);

pub fn font() -> Font {
    Font::from_bytes(FONT.to_vec()).unwrap()
}

/// 各レイヤーを単色で塗り分けた素材。
pub fn sources() -> SourceImages {
    SourceImages {
        elite: ELITE
            .iter()
            .map(|&c| RgbaImage::from_pixel(256, 256, c))
            .collect(),
        professions: Profession::ALL
            .iter()
            .map(|_| RgbaImage::from_pixel(50, 50, PROFESSION))
            .collect(),
        rarity: Rarity::all()
            .map(|_| RgbaImage::from_pixel(89, 25, RARITY))
            .collect(),
        background: RgbaImage::from_pixel(100, 100, BACKGROUND),
    }
}

pub fn bundle(avatar_pixels: u32) -> AssetBundle {
    AssetBundle::from_images(sources(), font(), avatar_pixels, LayoutConstants::DEFAULT).unwrap()
}

pub fn write_assets(dir: &Path) {
    let src = sources();

    for (&level, img) in EliteLevel::ALL.iter().zip(&src.elite) {
        img.save(dir.join(elite_badge_file(level))).unwrap();
    }
    for (&p, img) in Profession::ALL.iter().zip(&src.professions) {
        img.save(dir.join(profession_badge_file(p))).unwrap();
    }
    for (r, img) in Rarity::all().zip(&src.rarity) {
        img.save(dir.join(rarity_badge_file(r))).unwrap();
    }
    src.background.save(dir.join(BACKGROUND_FILE)).unwrap();
}

pub fn portrait() -> RgbaImage {
    RgbaImage::from_pixel(64, 64, PORTRAIT)
}

/// リサンプリングの誤差を許容して比較する。
pub fn close(a: Rgba<u8>, b: Rgba<u8>) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .all(|(&x, &y)| (i32::from(x) - i32::from(y)).abs() <= 3)
}

pub fn record(id: &str, name: &str) -> CharacterRecord {
    CharacterRecord {
        id: id.to_owned(),
        name: name.to_owned(),
        rarity: Rarity::new(5).unwrap(),
        profession: Profession::Warrior,
    }
}
