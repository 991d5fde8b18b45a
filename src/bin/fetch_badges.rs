use std::path::PathBuf;

use structopt::StructOpt;
use tracing::Level;

use avatar_forge::*;

#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(long, default_value = PRTS_HOST)]
    host: String,

    #[structopt(short, long)]
    verbose: bool,

    #[structopt(parse(try_from_os_str = parse_directory))]
    dir_out: PathBuf,
}

fn parse_directory(s: &std::ffi::OsStr) -> Result<PathBuf, std::ffi::OsString> {
    let dir = PathBuf::from(s);

    dir.is_dir().then(|| dir).ok_or_else(|| s.to_owned())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();

    tracing_subscriber::fmt()
        .with_max_level(if opt.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let client = reqwest::Client::new();
    let names = badge_asset_names();

    download_images(&client, &opt.host, &names, &opt.dir_out).await
}
