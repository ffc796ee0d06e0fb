// wordlist.rs - Keyword and suffix list loading
// Purpose: Read newline-delimited lists and keep a cached copy of the
//          default suffix wordlist under the user's config directory

use anyhow::{Context, Result, bail};
use colored::*;
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_WORDLIST_URL: &str =
    "https://raw.githubusercontent.com/Vulnpire/gcpenum/refs/heads/main/utils/wordlist.txt";

/// Location of the cached wordlist relative to the home directory
const WORDLIST_CACHE_PATH: &str = ".config/gcsenum/words.txt";

/// Read one entry per line. Lines are trimmed and blank lines dropped, so a
/// stray empty line never becomes an empty suffix or keyword.
pub fn load_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Unable to read file: {}", path.display()))?;

    Ok(content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect())
}

pub fn default_wordlist_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Unable to locate home directory")?;
    Ok(cached_wordlist_path(&home))
}

fn cached_wordlist_path(home: &Path) -> PathBuf {
    home.join(WORDLIST_CACHE_PATH)
}

/// Make sure a wordlist exists at `path`, downloading it from `url` if not.
pub async fn ensure_wordlist(client: &Client, path: &Path, url: &str) -> Result<()> {
    if path.exists() {
        println!("{}", format!("[*] Using existing wordlist at {}", path.display()).cyan());
        return Ok(());
    }

    println!("{}", format!("[*] Wordlist not found. Downloading to {}...", path.display()).yellow());
    download_file(client, url, path)
        .await
        .context("Failed to download wordlist")?;
    println!("{}", "[+] Wordlist downloaded".green());
    Ok(())
}

async fn download_file(client: &Client, url: &str, path: &Path) -> Result<()> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        bail!("failed to download file: {} (status: {})", url, status.as_u16());
    }
    let data = response.bytes().await?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create directory {}", parent.display()))?;
    }
    fs::write(path, &data).with_context(|| format!("Could not write {}", path.display()))?;
    Ok(())
}
