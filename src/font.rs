use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use eyre::{eyre, WrapErr};
use image::{Rgba, RgbaImage};
use rusttype::{point, Scale};

const MEASURE_CACHE_CAPACITY: usize = 4096;

/// 描画されたテキストのピクセル境界 (描画原点からの相対座標)。
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }
}

#[derive(Debug, Default)]
struct MeasureCache {
    boxes: HashMap<(String, u32), TextBox>,
    order: VecDeque<(String, u32)>,
}

impl MeasureCache {
    fn get(&self, key: &(String, u32)) -> Option<TextBox> {
        self.boxes.get(key).copied()
    }

    fn insert(&mut self, key: (String, u32), tb: TextBox) {
        if self.boxes.contains_key(&key) {
            return;
        }
        if self.order.len() >= MEASURE_CACHE_CAPACITY {
            if let Some(oldest) = self.order.pop_front() {
                self.boxes.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.boxes.insert(key, tb);
    }

    fn len(&self) -> usize {
        self.boxes.len()
    }
}

/// 名前描画用のフォント。計測結果は (テキスト, px) をキーに保持する。
pub struct Font {
    inner: rusttype::Font<'static>,
    cache: Mutex<MeasureCache>,
}

impl Font {
    pub fn from_bytes(buf: Vec<u8>) -> eyre::Result<Self> {
        let inner = rusttype::Font::try_from_vec(buf).ok_or_else(|| eyre!("cannot load font"))?;

        Ok(Self {
            inner,
            cache: Mutex::default(),
        })
    }

    pub fn open(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let buf = std::fs::read(path).wrap_err_with(|| format!("cannot read {}", path.display()))?;

        Self::from_bytes(buf).wrap_err_with(|| format!("in {}", path.display()))
    }

    fn scale(px: u32) -> Scale {
        Scale::uniform(px as f32)
    }

    fn measure_uncached(&self, text: &str, px: u32) -> TextBox {
        let scale = Self::scale(px);
        let ascent = self.inner.v_metrics(scale).ascent;

        self.inner
            .layout(text, scale, point(0.0, ascent))
            .filter_map(|g| g.pixel_bounding_box())
            .fold(None, |acc: Option<TextBox>, bb| {
                Some(match acc {
                    None => TextBox {
                        left: bb.min.x,
                        top: bb.min.y,
                        right: bb.max.x,
                        bottom: bb.max.y,
                    },
                    Some(tb) => TextBox {
                        left: tb.left.min(bb.min.x),
                        top: tb.top.min(bb.min.y),
                        right: tb.right.max(bb.max.x),
                        bottom: tb.bottom.max(bb.max.y),
                    },
                })
            })
            .unwrap_or_default()
    }

    /// `imageproc::drawing::draw_text_mut` と同じ原点で計測する。
    pub fn measure(&self, text: &str, px: u32) -> TextBox {
        let key = (text.to_owned(), px);

        if let Some(tb) = self.lock_cache().get(&key) {
            return tb;
        }

        let tb = self.measure_uncached(text, px);
        self.lock_cache().insert(key, tb);

        tb
    }

    pub fn cached_measurements(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, MeasureCache> {
        // 計測キャッシュは壊れても整合性に影響しない。
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn draw(
        &self,
        img: &mut RgbaImage,
        x: u32,
        y: u32,
        px: u32,
        color: Rgba<u8>,
        text: impl AsRef<str>,
    ) {
        imageproc::drawing::draw_text_mut(
            img,
            color,
            x,
            y,
            Self::scale(px),
            &self.inner,
            text.as_ref(),
        );
    }

    /// テキストのピクセル境界の中心を `center` に合わせて描く。
    /// canvas からはみ出した部分は切れる。
    pub fn draw_centered(
        &self,
        img: &mut RgbaImage,
        center: (u32, u32),
        px: u32,
        color: Rgba<u8>,
        text: &str,
    ) {
        let tb = self.measure(text, px);

        let x = center.0 as i32 - (tb.left + tb.right).div_euclid(2);
        let y = center.1 as i32 - (tb.top + tb.bottom).div_euclid(2);

        self.draw(img, x.max(0) as u32, y.max(0) as u32, px, color, text);
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("glyphs", &self.inner.glyph_count())
            .finish()
    }
}
