use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;
use std::path::{Path, PathBuf};

use eyre::{ensure, eyre, WrapErr};
use serde::Deserialize;

use crate::*;

/// プレイアブルキャラクターの ID はこの接頭辞を持つ。
pub const PLAYABLE_PREFIX: &str = "char_";

pub const RARITY_COUNT: usize = 6;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Rarity(u8);

impl Rarity {
    pub const MAX: u8 = RARITY_COUNT as u8 - 1;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then(|| Self(value))
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..=Self::MAX).map(Self)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// "TIER_1" ..= "TIER_6" 形式 (新しいゲームデータ) を解釈する。
    pub fn from_tier(s: &str) -> Option<Self> {
        let tier: u8 = s.strip_prefix("TIER_")?.parse().ok()?;
        tier.checked_sub(1).and_then(Self::new)
    }
}

impl TryFrom<u8> for Rarity {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| eyre!("rarity out of range: {}", value))
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum EliteLevel {
    Elite0,
    Elite1,
    Elite2,
}

impl EliteLevel {
    pub const ALL: [Self; 3] = [Self::Elite0, Self::Elite1, Self::Elite2];

    /// 出力するバリエーション。`None` はバッジなし。
    pub const VARIANTS: [Option<Self>; 4] = [
        None,
        Some(Self::Elite0),
        Some(Self::Elite1),
        Some(Self::Elite2),
    ];

    pub fn new(value: u8) -> Self {
        match value {
            0 => Self::Elite0,
            1 => Self::Elite1,
            2 => Self::Elite2,
            _ => panic!("invalid elite level: {}", value),
        }
    }

    pub fn value(self) -> u8 {
        match self {
            Self::Elite0 => 0,
            Self::Elite1 => 1,
            Self::Elite2 => 2,
        }
    }
}

impl fmt::Display for EliteLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CharacterRecord {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub profession: Profession,
}

impl CharacterRecord {
    pub fn is_playable_id(id: &str) -> bool {
        id.starts_with(PLAYABLE_PREFIX)
    }

    /// 昇進 0/1 (およびバッジなし) は素の立ち絵、昇進 2 は `_2` 付きの別画像。
    pub fn portrait_path(&self, dir: impl AsRef<Path>, elite: Option<EliteLevel>) -> PathBuf {
        let file_name = match elite {
            Some(EliteLevel::Elite2) => format!("{}_2.png", self.id),
            _ => format!("{}.png", self.id),
        };
        dir.as_ref().join(file_name)
    }

    pub fn output_file_name(&self, elite: Option<EliteLevel>) -> String {
        output_file_name(&self.name, elite)
    }
}

/// `avatar_<name>.png` または `avatar_<name>_<level>.png`。
pub fn output_file_name(name: &str, elite: Option<EliteLevel>) -> String {
    let name = name.replace(|c: char| c == '/' || c == '\\', "_");
    match elite {
        Some(level) => format!("avatar_{}_{}.png", name, level),
        None => format!("avatar_{}.png", name),
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRarity {
    Value(u8),
    Tier(String),
}

#[derive(Debug, Deserialize)]
struct RawCharacter {
    name: String,
    rarity: RawRarity,
    profession: String,
}

impl RawCharacter {
    fn into_record(self, id: String) -> eyre::Result<CharacterRecord> {
        let rarity = match self.rarity {
            RawRarity::Value(value) => Rarity::try_from(value)?,
            RawRarity::Tier(tier) => {
                Rarity::from_tier(&tier).ok_or_else(|| eyre!("invalid rarity tier: {:?}", tier))?
            }
        };
        let profession = self.profession.parse()?;

        Ok(CharacterRecord {
            id,
            name: self.name,
            rarity,
            profession,
        })
    }
}

/// キャラクターテーブル (ID -> レコードの JSON オブジェクト) を読む。
///
/// プレイアブルでないエントリは中身を見ずに捨てる。プレイアブルだが
/// 解釈できないエントリは警告を出して飛ばす。結果は ID 順。
pub fn parse_character_table(json: &str) -> eyre::Result<Vec<CharacterRecord>> {
    let table: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(json).wrap_err("malformed character table")?;

    let mut records = Vec::new();
    for (id, value) in table {
        if !CharacterRecord::is_playable_id(&id) {
            continue;
        }

        let record = serde_json::from_value::<RawCharacter>(value)
            .map_err(eyre::Report::from)
            .and_then(|raw| raw.into_record(id.clone()));
        match record {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(%id, "skipping character: {:#}", e),
        }
    }

    Ok(records)
}

pub fn load_character_table(path: impl AsRef<Path>) -> eyre::Result<Vec<CharacterRecord>> {
    let path = path.as_ref();
    ensure!(path.is_file(), "character table not found: {}", path.display());

    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read {}", path.display()))?;

    parse_character_table(&json).wrap_err_with(|| format!("in {}", path.display()))
}
