use std::path::PathBuf;

use structopt::StructOpt;

use avatar_forge::*;

/// 生成済みの頭像を横一列に並べる。
#[derive(Debug, StructOpt)]
struct Opt {
    /// 画像の間隔 (画像幅に対する比率)
    #[structopt(long, default_value = "0")]
    gap: f64,

    #[structopt(long, parse(try_from_os_str = parse_directory), default_value = "output")]
    dir_avatar: PathBuf,

    #[structopt(short, long, parse(from_os_str), default_value = "combined_image.png")]
    output: PathBuf,

    /// 名前。末尾の数字は昇進段階 (例: "见行者2")
    #[structopt(required = true)]
    names: Vec<String>,
}

fn parse_directory(s: &std::ffi::OsStr) -> Result<PathBuf, std::ffi::OsString> {
    let dir = PathBuf::from(s);

    dir.is_dir().then(|| dir).ok_or_else(|| s.to_owned())
}

fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    eyre::ensure!(opt.gap >= 0.0, "gap must be non-negative");

    let paths = avatar_paths(&opt.dir_avatar, opt.names.iter().map(String::as_str));
    let images = open_existing(paths)?;
    eyre::ensure!(!images.is_empty(), "no valid images found");

    combine_strip(&images, opt.gap).save(&opt.output)?;
    tracing::info!(path = %opt.output.display(), count = images.len(), "combined image saved");

    Ok(())
}
