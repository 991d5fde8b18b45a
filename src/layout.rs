use image::imageops::FilterType;
use image::Rgba;

pub const DEFAULT_AVATAR_PIXELS: u32 = 360;

/// レイアウトの比率表。値はすべて `avatar_pixels` に対する比率。
///
/// 元画像の寸法は 180px 基準で測ったものなので、その形のまま書いてある。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConstants {
    pub horizontal_padding: f64,
    pub elite_size: f64,
    /// 昇進バッジは余白込みで正規化されるので、その分だけ下にずらす。
    pub elite_drop: f64,
    /// 昇進バッジを埋め込む正方形の一辺 (元画像の px)。
    pub elite_box: u32,
    pub profession_size: f64,
    pub rarity_height: f64,
    pub background_size: f64,
    pub label_height: f64,
    pub font_size_large: f64,
    pub font_size_small: f64,
    pub label_color: Rgba<u8>,
    pub text_color: Rgba<u8>,
    pub filter: FilterType,
}

impl LayoutConstants {
    pub const DEFAULT: Self = Self {
        horizontal_padding: 0.0,
        elite_size: 64.0 / 180.0,
        elite_drop: 5.0 / 180.0,
        elite_box: 256,
        profession_size: 26.0 / 180.0 * 3.0 / 2.0,
        rarity_height: 25.0 / 180.0 * 4.0 / 3.0,
        background_size: 1.0,
        label_height: 40.0 / 180.0,
        font_size_large: 28.0 / 180.0,
        font_size_small: 24.0 / 180.0,
        label_color: Rgba([0x1E, 0x1E, 0x1E, 0xFF]),
        text_color: Rgba([0xFF, 0xFF, 0xFF, 0xFF]),
        filter: FilterType::CatmullRom,
    };
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.x..self.right()).contains(&x) && (self.y..self.bottom()).contains(&y)
    }
}

/// 比率を px に直す。丸めは偶数丸め (再実行で結果がぶれないこと)。
pub fn ratio_px(ratio: f64, avatar_pixels: u32) -> u32 {
    assert!(ratio >= 0.0, "negative layout ratio: {}", ratio);

    (ratio * f64::from(avatar_pixels)).round_ties_even() as u32
}

/// 各レイヤーの配置。`Layout::new` は純粋関数。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Layout {
    pub avatar_pixels: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub portrait: Region,
    pub background: Region,
    pub elite: Region,
    pub profession: Region,
    pub rarity_height: u32,
    pub label: Region,
    pub text_center: (u32, u32),
    pub font_px_large: u32,
    pub font_px_small: u32,
}

impl Layout {
    pub fn new(avatar_pixels: u32, k: &LayoutConstants) -> Self {
        assert!(avatar_pixels > 0, "avatar_pixels must be positive");

        let px = |ratio: f64| ratio_px(ratio, avatar_pixels);

        let canvas_width = px(1.0 + 2.0 * k.horizontal_padding);
        let label_height = px(k.label_height);
        let canvas_height = avatar_pixels + label_height;

        let portrait = Region::new(
            canvas_width.saturating_sub(avatar_pixels) / 2,
            0,
            avatar_pixels,
            avatar_pixels,
        );

        let background_px = px(k.background_size);
        let background = Region::new(portrait.x, portrait.y, background_px, background_px);

        // 左下。余白の分だけ下にはみ出す。
        let elite_px = px(k.elite_size);
        let elite = Region::new(
            portrait.x,
            (portrait.bottom() + px(k.elite_drop)).saturating_sub(elite_px),
            elite_px,
            elite_px,
        );

        // 左上
        let profession_px = px(k.profession_size);
        let profession = Region::new(portrait.x, portrait.y, profession_px, profession_px);

        let label = Region::new(0, avatar_pixels, canvas_width, label_height);
        let text_center = (canvas_width / 2, label.y + label_height / 2);

        Self {
            avatar_pixels,
            canvas_width,
            canvas_height,
            portrait,
            background,
            elite,
            profession,
            rarity_height: px(k.rarity_height),
            label,
            text_center,
            font_px_large: px(k.font_size_large),
            font_px_small: px(k.font_size_small),
        }
    }

    /// 幅 `width` のレアリティバッジの配置 (右下、頭像の右端に揃える)。
    pub fn rarity(&self, width: u32) -> Region {
        Region::new(
            self.portrait.right().saturating_sub(width),
            self.portrait.bottom().saturating_sub(self.rarity_height),
            width,
            self.rarity_height,
        )
    }

    /// 大きいフォントで canvas に収まらなければ小さいフォントにする。
    /// それでもはみ出す場合はそのまま (切れてよい)。
    pub fn font_px(&self, mut measure_width: impl FnMut(u32) -> u32) -> u32 {
        if measure_width(self.font_px_large) > self.canvas_width {
            self.font_px_small
        } else {
            self.font_px_large
        }
    }
}
