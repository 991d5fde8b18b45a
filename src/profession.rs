use std::fmt;
use std::str::FromStr;

use eyre::eyre;

pub const PROFESSION_COUNT: usize = 8;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Profession {
    Pioneer,
    Warrior,
    Tank,
    Sniper,
    Caster,
    Medic,
    Support,
    Special,
}

impl Profession {
    pub const ALL: [Self; PROFESSION_COUNT] = [
        Self::Pioneer,
        Self::Warrior,
        Self::Tank,
        Self::Sniper,
        Self::Caster,
        Self::Medic,
        Self::Support,
        Self::Special,
    ];

    /// キャラクターテーブル上の ID。
    pub fn id(self) -> &'static str {
        match self {
            Self::Pioneer => "PIONEER",
            Self::Warrior => "WARRIOR",
            Self::Tank => "TANK",
            Self::Sniper => "SNIPER",
            Self::Caster => "CASTER",
            Self::Medic => "MEDIC",
            Self::Support => "SUPPORT",
            Self::Special => "SPECIAL",
        }
    }

    /// wiki 上の表示名。バッジ画像のファイル名に使われる。
    pub fn wiki_name(self) -> &'static str {
        match self {
            Self::Pioneer => "先锋",
            Self::Warrior => "近卫",
            Self::Tank => "重装",
            Self::Sniper => "狙击",
            Self::Caster => "术师",
            Self::Medic => "医疗",
            Self::Support => "辅助",
            Self::Special => "特种",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Profession {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.id() == s)
            .ok_or_else(|| eyre!("unknown profession: {:?}", s))
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
