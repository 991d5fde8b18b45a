use std::path::Path;

use eyre::{ensure, WrapErr};
use image::imageops;
use image::imageops::FilterType;
use image::RgbaImage;

use crate::*;

pub const BACKGROUND_FILE: &str = "background.png";

pub fn elite_badge_file(level: EliteLevel) -> String {
    format!("精英_{}_大图.png", level.value())
}

pub fn profession_badge_file(profession: Profession) -> String {
    format!("图标_职业_{}.png", profession.wiki_name())
}

pub fn rarity_badge_file(rarity: Rarity) -> String {
    format!("稀有度_黄_{}.png", rarity.value())
}

/// 画像ホストから取得するバッジ画像のファイル名一覧。背景は含まない。
pub fn badge_asset_names() -> Vec<String> {
    let elites = EliteLevel::ALL.iter().map(|&level| elite_badge_file(level));
    let professions = Profession::ALL.iter().map(|&p| profession_badge_file(p));
    let rarities = Rarity::all().map(rarity_badge_file);

    elites.chain(professions).chain(rarities).collect()
}

fn open_rgba(path: &Path) -> eyre::Result<RgbaImage> {
    ensure!(path.is_file(), "missing asset: {}", path.display());

    let img = image::open(path).wrap_err_with(|| format!("cannot decode {}", path.display()))?;

    Ok(img.into_rgba8())
}

/// 幅か高さが 0 の場合は空画像を返す (極端に小さい avatar_pixels 用)。
pub(crate) fn resize(img: &RgbaImage, width: u32, height: u32, filter: FilterType) -> RgbaImage {
    if width == 0 || height == 0 || img.width() == 0 || img.height() == 0 {
        return RgbaImage::new(width, height);
    }

    imageops::resize(img, width, height, filter)
}

/// 縮小前の素材。順序は `EliteLevel::ALL`, `Profession::ALL`, `Rarity::all()` に従う。
#[derive(Clone)]
pub struct SourceImages {
    pub elite: Vec<RgbaImage>,
    pub professions: Vec<RgbaImage>,
    pub rarity: Vec<RgbaImage>,
    pub background: RgbaImage,
}

impl SourceImages {
    pub fn open(root: impl AsRef<Path>) -> eyre::Result<Self> {
        let root = root.as_ref();
        ensure!(root.is_dir(), "asset directory not found: {}", root.display());

        let open = |name: String| open_rgba(&root.join(name));

        let elite = EliteLevel::ALL
            .iter()
            .map(|&level| open(elite_badge_file(level)))
            .collect::<eyre::Result<_>>()?;
        let professions = Profession::ALL
            .iter()
            .map(|&p| open(profession_badge_file(p)))
            .collect::<eyre::Result<_>>()?;
        let rarity = Rarity::all()
            .map(|r| open(rarity_badge_file(r)))
            .collect::<eyre::Result<_>>()?;
        let background = open(BACKGROUND_FILE.to_owned())?;

        Ok(Self {
            elite,
            professions,
            rarity,
            background,
        })
    }
}

/// 起動時に一度だけ作る、縮小済みの素材一式。作成後は変更しない。
pub struct AssetBundle {
    constants: LayoutConstants,
    layout: Layout,
    elite: Vec<RgbaImage>,
    professions: Vec<RgbaImage>,
    rarity: Vec<RgbaImage>,
    background: RgbaImage,
    font: Font,
}

impl AssetBundle {
    pub fn load(
        assets_root: impl AsRef<Path>,
        font_path: impl AsRef<Path>,
        avatar_pixels: u32,
        constants: LayoutConstants,
    ) -> eyre::Result<Self> {
        let sources = SourceImages::open(assets_root)?;
        let font = Font::open(font_path)?;

        Self::from_images(sources, font, avatar_pixels, constants)
    }

    pub fn from_images(
        sources: SourceImages,
        font: Font,
        avatar_pixels: u32,
        constants: LayoutConstants,
    ) -> eyre::Result<Self> {
        ensure!(avatar_pixels > 0, "avatar_pixels must be positive");
        ensure!(
            sources.elite.len() == EliteLevel::ALL.len(),
            "expected {} elite badges, got {}",
            EliteLevel::ALL.len(),
            sources.elite.len()
        );
        ensure!(
            sources.professions.len() == PROFESSION_COUNT,
            "expected {} profession badges, got {}",
            PROFESSION_COUNT,
            sources.professions.len()
        );
        ensure!(
            sources.rarity.len() == RARITY_COUNT,
            "expected {} rarity badges, got {}",
            RARITY_COUNT,
            sources.rarity.len()
        );

        let layout = Layout::new(avatar_pixels, &constants);
        let filter = constants.filter;

        let elite = sources
            .elite
            .iter()
            .map(|img| scale_elite_badge(img, &constants, &layout))
            .collect();
        let professions = sources
            .professions
            .iter()
            .map(|img| {
                let r = layout.profession;
                resize(img, r.width, r.height, filter)
            })
            .collect();
        let rarity = sources
            .rarity
            .iter()
            .map(|img| scale_rarity_badge(img, &constants, avatar_pixels))
            .collect();
        let background = resize(
            &sources.background,
            layout.background.width,
            layout.background.height,
            filter,
        );

        Ok(Self {
            constants,
            layout,
            elite,
            professions,
            rarity,
            background,
            font,
        })
    }

    pub fn constants(&self) -> &LayoutConstants {
        &self.constants
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn elite_badge(&self, level: EliteLevel) -> &RgbaImage {
        &self.elite[level.value() as usize]
    }

    pub fn profession_badge(&self, profession: Profession) -> &RgbaImage {
        &self.professions[profession.index()]
    }

    pub fn rarity_badge(&self, rarity: Rarity) -> &RgbaImage {
        &self.rarity[rarity.value() as usize]
    }

    pub fn background(&self) -> &RgbaImage {
        &self.background
    }

    pub fn font(&self) -> &Font {
        &self.font
    }
}

/// 元画像を透明な正方形の中央に置いてから縮小する。
/// 元画像ごとに大きさが違うので、こうしないと縮尺が揃わない。
fn scale_elite_badge(img: &RgbaImage, k: &LayoutConstants, layout: &Layout) -> RgbaImage {
    let side = k.elite_box.max(img.width()).max(img.height());

    let mut boxed = RgbaImage::new(side, side);
    imageops::replace(
        &mut boxed,
        img,
        side / 2 - img.width() / 2,
        side / 2 - img.height() / 2,
    );

    resize(&boxed, layout.elite.width, layout.elite.height, k.filter)
}

/// 高さを揃え、幅は元画像の縦横比に従う。
fn scale_rarity_badge(img: &RgbaImage, k: &LayoutConstants, avatar_pixels: u32) -> RgbaImage {
    let height = ratio_px(k.rarity_height, avatar_pixels);
    let aspect = if img.height() == 0 {
        0.0
    } else {
        f64::from(img.width()) / f64::from(img.height())
    };
    let width = ratio_px(k.rarity_height * aspect, avatar_pixels);

    resize(img, width, height, k.filter)
}
