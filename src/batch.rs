use std::collections::HashSet;
use std::path::{Path, PathBuf};

use eyre::{ensure, WrapErr};
use image::ImageFormat;
use itertools::iproduct;
use rayon::prelude::*;

use crate::*;

#[derive(Clone, Debug)]
pub struct BatchConfig {
    pub portraits_dir: PathBuf,
    pub output_dir: PathBuf,
    /// 出力済みのファイルは作り直さない。
    pub skip_existing: bool,
    /// `None` ならホストの並列度。
    pub workers: Option<usize>,
}

impl BatchConfig {
    pub fn new(portraits_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            portraits_dir: portraits_dir.into(),
            output_dir: output_dir.into(),
            skip_existing: true,
            workers: None,
        }
    }

    fn worker_count(&self) -> eyre::Result<usize> {
        let n = match self.workers {
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };
        ensure!(n > 0, "worker count must be >= 1");

        Ok(n)
    }
}

/// (キャラクター, 昇進段階) 1 つ分の仕事。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkItem<'a> {
    pub character: &'a CharacterRecord,
    pub elite: Option<EliteLevel>,
    pub portrait: PathBuf,
    pub output: PathBuf,
}

/// 全キャラクター × 全バリエーションの仕事を列挙する。
///
/// 名前が重複して出力先が衝突する場合は、テーブル順で先のものだけ残す。
pub fn plan_work<'a>(
    characters: &'a [CharacterRecord],
    config: &BatchConfig,
) -> Vec<WorkItem<'a>> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for (character, &elite) in iproduct!(characters, &EliteLevel::VARIANTS) {
        if !CharacterRecord::is_playable_id(&character.id) {
            continue;
        }

        let output = config.output_dir.join(character.output_file_name(elite));
        if !seen.insert(output.clone()) {
            tracing::warn!(
                character = %character.id,
                output = %output.display(),
                "output name already taken by another character, skipping"
            );
            continue;
        }

        items.push(WorkItem {
            character,
            elite,
            portrait: character.portrait_path(&config.portraits_dir, elite),
            output,
        });
    }

    items
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UnitOutcome {
    Written,
    Skipped,
    MissingPortrait,
    Failed(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnitReport {
    pub character_id: String,
    pub elite: Option<EliteLevel>,
    pub portrait: PathBuf,
    pub output: PathBuf,
    pub outcome: UnitOutcome,
}

#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub units: Vec<UnitReport>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&UnitOutcome) -> bool) -> usize {
        self.units.iter().filter(|u| pred(&u.outcome)).count()
    }

    pub fn written(&self) -> usize {
        self.count(|o| *o == UnitOutcome::Written)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| *o == UnitOutcome::Skipped)
    }

    pub fn missing(&self) -> impl Iterator<Item = &UnitReport> {
        self.units
            .iter()
            .filter(|u| u.outcome == UnitOutcome::MissingPortrait)
    }

    pub fn failed(&self) -> impl Iterator<Item = &UnitReport> {
        self.units
            .iter()
            .filter(|u| matches!(u.outcome, UnitOutcome::Failed(_)))
    }
}

fn render_unit(assets: &AssetBundle, item: &WorkItem) -> eyre::Result<()> {
    let portrait = image::open(&item.portrait)
        .wrap_err_with(|| format!("cannot decode {}", item.portrait.display()))?
        .into_rgba8();

    let c = item.character;
    let img = compose(assets, &portrait, &c.name, item.elite, c.rarity, c.profession);

    img.save_with_format(&item.output, ImageFormat::Png)
        .wrap_err_with(|| format!("cannot write {}", item.output.display()))?;

    Ok(())
}

/// 1 単位分を処理する。失敗はここで止め、バッチ全体には波及させない。
pub fn process_unit(assets: &AssetBundle, item: &WorkItem, skip_existing: bool) -> UnitOutcome {
    let c = item.character;

    if skip_existing && item.output.exists() {
        tracing::debug!(output = %item.output.display(), "already exists, skipping");
        return UnitOutcome::Skipped;
    }

    if !item.portrait.is_file() {
        tracing::warn!(
            character = %c.id,
            name = %c.name,
            elite = ?item.elite.map(EliteLevel::value),
            path = %item.portrait.display(),
            "portrait not found"
        );
        return UnitOutcome::MissingPortrait;
    }

    match render_unit(assets, item) {
        Ok(()) => {
            tracing::debug!(output = %item.output.display(), "written");
            UnitOutcome::Written
        }
        Err(e) => {
            tracing::error!(
                character = %c.id,
                elite = ?item.elite.map(EliteLevel::value),
                "{:#}",
                e
            );
            UnitOutcome::Failed(format!("{:#}", e))
        }
    }
}

fn build_thread_pool(workers: usize) -> eyre::Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("avatar-worker-{}", i))
        .build()
        .wrap_err("failed to build worker pool")
}

fn ensure_dir(dir: &Path) -> eyre::Result<()> {
    std::fs::create_dir_all(dir).wrap_err_with(|| format!("cannot create {}", dir.display()))
}

/// 全キャラクターの頭像を生成する。
///
/// 素材は共有の読み取り専用。各単位は別々のファイルに書くので互いに待たない。
#[tracing::instrument(skip(assets, characters), fields(count = characters.len()))]
pub fn run_batch(
    assets: &AssetBundle,
    characters: &[CharacterRecord],
    config: &BatchConfig,
) -> eyre::Result<BatchReport> {
    ensure_dir(&config.output_dir)?;

    let workers = config.worker_count()?;
    let pool = build_thread_pool(workers)?;

    let items = plan_work(characters, config);
    tracing::info!(units = items.len(), workers, "starting batch");

    let units = pool.install(|| {
        items
            .par_iter()
            .map(|item| UnitReport {
                character_id: item.character.id.clone(),
                elite: item.elite,
                portrait: item.portrait.clone(),
                output: item.output.clone(),
                outcome: process_unit(assets, item, config.skip_existing),
            })
            .collect::<Vec<_>>()
    });

    let report = BatchReport { units };
    tracing::info!(
        written = report.written(),
        skipped = report.skipped(),
        missing = report.missing().count(),
        failed = report.failed().count(),
        "batch finished"
    );

    Ok(report)
}
