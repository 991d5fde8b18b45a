use std::path::Path;

use eyre::{ensure, WrapErr};
use md5::{Digest, Md5};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const PRTS_HOST: &str = "https://media.prts.wiki";

/// 英数字と `_.-~/` 以外はエスケープする。
const NAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// `<host>/<h0>/<h0h1>/<name>`。`h` は UTF-8 の名前の MD5 (小文字 16 進)。
pub fn image_url(host: &str, name: &str) -> String {
    let digest = format!("{:x}", Md5::digest(name.as_bytes()));

    format!(
        "{}/{}/{}/{}",
        host.trim_end_matches('/'),
        &digest[..1],
        &digest[..2],
        utf8_percent_encode(name, NAME_ENCODE_SET)
    )
}

pub fn prts_url(name: &str) -> String {
    image_url(PRTS_HOST, name)
}

pub async fn download_image(client: &reqwest::Client, url: &str, path: &Path) -> eyre::Result<()> {
    let bytes = client
        .get(url)
        .send()
        .await
        .wrap_err_with(|| format!("request failed: {}", url))?
        .error_for_status()?
        .bytes()
        .await
        .wrap_err_with(|| format!("cannot read body: {}", url))?;

    tokio::fs::write(path, &bytes)
        .await
        .wrap_err_with(|| format!("cannot write {}", path.display()))?;

    tracing::debug!(%url, path = %path.display(), bytes = bytes.len(), "downloaded");

    Ok(())
}

/// 全部まとめて並行に取得する。1 つでも失敗したらバッチ全体が失敗。
/// 再試行はしない。
pub async fn download_images(
    client: &reqwest::Client,
    host: &str,
    names: &[String],
    dir: &Path,
) -> eyre::Result<()> {
    ensure!(dir.is_dir(), "output directory not found: {}", dir.display());

    let tasks = names.iter().map(|name| {
        let url = image_url(host, name);
        let path = dir.join(name);
        async move { download_image(client, &url, &path).await }
    });

    futures::future::try_join_all(tasks).await?;

    tracing::info!(count = names.len(), dir = %dir.display(), "download finished");

    Ok(())
}
