use std::path::PathBuf;

use structopt::StructOpt;
use tracing::Level;

use avatar_forge::*;

#[derive(Debug, StructOpt)]
struct Opt {
    /// 出力済みのファイルも作り直す
    #[structopt(long)]
    overwrite: bool,

    /// ワーカースレッド数 (既定はホストの並列度)
    #[structopt(long)]
    workers: Option<usize>,

    #[structopt(long, default_value = "360")]
    avatar_pixels: u32,

    #[structopt(short, long)]
    verbose: bool,

    #[structopt(parse(from_os_str))]
    path_character_table: PathBuf,

    #[structopt(parse(try_from_os_str = parse_directory))]
    dir_portrait: PathBuf,

    #[structopt(parse(try_from_os_str = parse_directory))]
    dir_asset: PathBuf,

    #[structopt(parse(from_os_str))]
    path_font: PathBuf,

    #[structopt(parse(from_os_str))]
    dir_out: PathBuf,
}

fn parse_directory(s: &std::ffi::OsStr) -> Result<PathBuf, std::ffi::OsString> {
    let dir = PathBuf::from(s);

    dir.is_dir().then(|| dir).ok_or_else(|| s.to_owned())
}

fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();

    tracing_subscriber::fmt()
        .with_max_level(if opt.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let characters = load_character_table(&opt.path_character_table)?;
    let assets = AssetBundle::load(
        &opt.dir_asset,
        &opt.path_font,
        opt.avatar_pixels,
        LayoutConstants::DEFAULT,
    )?;

    let config = BatchConfig {
        portraits_dir: opt.dir_portrait,
        output_dir: opt.dir_out,
        skip_existing: !opt.overwrite,
        workers: opt.workers,
    };

    let report = run_batch(&assets, &characters, &config)?;

    eyre::ensure!(
        report.failed().next().is_none(),
        "{} unit(s) failed",
        report.failed().count()
    );

    Ok(())
}
