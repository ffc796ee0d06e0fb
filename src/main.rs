// main.rs - gcsenum - Google Cloud Storage bucket enumeration
// Purpose: Generate candidate bucket names from keywords, probe them
//          concurrently and report existing and listable buckets
// License: MIT

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

// Module declarations
mod config;
mod lister;
mod logging;
mod permutations;
mod prober;
mod results;
mod scanner;
mod sink;
mod storage_api;
mod wordlist;

use config::{DEFAULT_API_BASE, DEFAULT_PUBLIC_BASE, ScanConfig};
use scanner::BucketScanner;
use sink::{ResultSink, ScanSummary};
use storage_api::GcsClient;
use wordlist::DEFAULT_WORDLIST_URL;

/// gcsenum - Google Cloud Storage bucket enumeration
#[derive(Parser, Debug)]
#[command(
    name = "gcsenum",
    version,
    about = "Enumerate Google Cloud Storage buckets derived from keywords",
    long_about = r#"
Builds candidate bucket names from one or more keywords and a suffix
wordlist, probes each candidate against the storage metadata API and lists
the objects of every bucket that allows anonymous listing.

Candidate templates per suffix:
  {kw}-{sfx}  {sfx}-{kw}  {kw}_{sfx}  {sfx}_{kw}  {kw}{sfx}  {sfx}{kw}
plus {kw}, {kw}.com, {kw}.net and {kw}.org.

EXAMPLES:

  Single keyword with the default wordlist:
    gcsenum -n acme

  Keyword list, custom wordlist, 50 concurrent probes, save results:
    gcsenum -l keywords.txt -w words.txt -c 50 -o results.txt

  Show unexpected status codes:
    gcsenum -n acme -v
"#,
    group(ArgGroup::new("target").required(true).args(["keyword", "keyword_list"]))
)]
struct Args {
    /// Keyword for bucket name permutations
    #[arg(short = 'n', long, value_name = "KEYWORD", help_heading = "Target Options")]
    keyword: Option<String>,

    /// File containing a list of keywords (one per line)
    #[arg(short = 'l', long, value_name = "FILE", help_heading = "Target Options")]
    keyword_list: Option<PathBuf>,

    /// Suffix wordlist (defaults to a cached download)
    #[arg(short, long, value_name = "FILE", help_heading = "Wordlist")]
    wordlist: Option<PathBuf>,

    /// Where the default wordlist is downloaded from when not cached
    #[arg(long, value_name = "URL", default_value = DEFAULT_WORDLIST_URL, help_heading = "Wordlist")]
    wordlist_url: String,

    /// Number of buckets probed concurrently
    #[arg(short, long, default_value_t = 10, value_name = "N",
          value_parser = clap::value_parser!(u32).range(1..), help_heading = "Scan Options")]
    concurrency: u32,

    /// Per-request timeout in seconds (0 = no timeout)
    #[arg(long, default_value_t = 0, value_name = "SECONDS", help_heading = "Scan Options")]
    timeout: u64,

    /// 403 body phrase meaning "treat as absent" (repeatable, replaces the defaults)
    #[arg(long = "deny-phrase", value_name = "TEXT", help_heading = "Scan Options")]
    deny_phrases: Vec<String>,

    /// Metadata API base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_BASE, help_heading = "Scan Options")]
    api_base: String,

    /// Public URL prefix used in reports
    #[arg(long, value_name = "URL", default_value = DEFAULT_PUBLIC_BASE, help_heading = "Scan Options")]
    public_base: String,

    /// Path to save the results
    #[arg(short, long, value_name = "FILE", help_heading = "Output")]
    output: Option<PathBuf>,

    /// Report unexpected status codes
    #[arg(short, long, help_heading = "Output")]
    verbose: bool,

    /// Do not print result lines to the console (summary is still shown)
    #[arg(short, long, help_heading = "Output")]
    quiet: bool,

    /// Hide the progress bar
    #[arg(long, help_heading = "Output")]
    no_progress: bool,

    /// Debug diagnostics on stderr (RUST_LOG overrides)
    #[arg(long, help_heading = "Output")]
    debug: bool,
}

impl Args {
    fn scan_config(&self) -> ScanConfig {
        let mut config = ScanConfig {
            concurrency: self.concurrency as usize,
            verbose: self.verbose,
            timeout_secs: self.timeout,
            api_base: self.api_base.clone(),
            public_base: self.public_base.clone(),
            ..ScanConfig::default()
        };
        if !self.deny_phrases.is_empty() {
            config.denial_phrases = self.deny_phrases.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("{}", format!("[ERROR] {:#}", e).red().bold());
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    logging::init_logging(args.debug)?;
    print_banner();

    let config = args.scan_config();
    config.validate()?;

    // ═══════════════════════════════════════════════════════════════════════════
    // SETUP: keywords, suffixes, output file (any failure here is fatal)
    // ═══════════════════════════════════════════════════════════════════════════
    let keywords = load_keywords(&args)?;
    let suffixes = load_suffixes(&args).await?;
    let sink = ResultSink::new(args.output.as_deref())?;

    let candidates = permutations::generate_all(&keywords, &suffixes);
    let total = candidates.len();
    println!(
        "{}",
        format!("\nGenerated {} bucket names from {} keyword(s).", total, keywords.len())
            .cyan()
            .bold()
    );
    if let Some(ref path) = args.output {
        println!("{}", format!("[*] Saving results to {}", path.display()).cyan());
    }
    println!();

    // ═══════════════════════════════════════════════════════════════════════════
    // SCAN
    // ═══════════════════════════════════════════════════════════════════════════
    let progress = build_progress(total as u64, args.no_progress);
    let client = GcsClient::new(&config)?;
    let scanner = BucketScanner::new(client, config).with_progress(progress.clone());
    let mut sink = sink.with_progress(progress);
    if args.quiet {
        sink = sink.silent();
    }

    let (tx, rx) = mpsc::unbounded_channel();
    let drain = tokio::spawn(sink.drain(rx));

    let start = Instant::now();
    scanner.scan(candidates, tx).await;
    let summary = drain.await.context("Result sink stopped unexpectedly")?;

    print_summary(start.elapsed(), total, &summary);
    Ok(())
}

fn load_keywords(args: &Args) -> Result<Vec<String>> {
    let keywords = match (&args.keyword_list, &args.keyword) {
        (Some(path), _) => {
            println!("{}", format!("[*] Reading keywords from: {}", path.display()).cyan());
            wordlist::load_lines(path)?
        }
        (None, Some(keyword)) => vec![keyword.trim().to_string()],
        (None, None) => bail!("Provide either a keyword (-n) or a keyword list file (-l)"),
    };

    let keywords: Vec<String> = keywords.into_iter().filter(|k| !k.is_empty()).collect();
    if keywords.is_empty() {
        bail!("No keywords to scan");
    }
    Ok(keywords)
}

async fn load_suffixes(args: &Args) -> Result<Vec<String>> {
    let path = match args.wordlist {
        Some(ref path) => path.clone(),
        None => {
            let path = wordlist::default_wordlist_path()?;
            let client = Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .context("Failed to create HTTP client")?;
            wordlist::ensure_wordlist(&client, &path, &args.wordlist_url).await?;
            path
        }
    };

    wordlist::load_lines(&path)
}

fn build_progress(total: u64, disabled: bool) -> ProgressBar {
    if disabled {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::with_template(
        "{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} buckets ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");

    ProgressBar::new(total).with_style(style)
}

fn print_banner() {
    println!("{}", "═══════════════════════════════════════════════════════════════".cyan().bold());
    println!("{}", "  gcsenum - Google Cloud Storage Bucket Enumeration".white().bold());
    println!("{}", "  Permutations | Existence probing | Object listing".white());
    println!("{}", "═══════════════════════════════════════════════════════════════".cyan().bold());
}

fn print_summary(elapsed: Duration, total: usize, summary: &ScanSummary) {
    println!();
    println!(
        "{}",
        format!("Scan completed in {:.2?}. Scanned {} buckets.", elapsed, total)
            .green()
            .bold()
    );
    println!("{}", "═══════════════════════════════════════════════════════════════".yellow().bold());
    println!("{}", format!("EXISTS:            {}", summary.exists).green());
    println!("{}", format!("LISTABLE:          {}", summary.listable).yellow());
    println!("{}", format!("Objects listed:    {}", summary.objects).white());
    println!("{}", format!("Errors:            {}", summary.errors).red());
    if summary.unknown > 0 {
        println!("{}", format!("Unknown responses: {}", summary.unknown).dimmed());
    }
    println!("{}", "═══════════════════════════════════════════════════════════════".yellow().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_require_target() {
        assert!(Args::try_parse_from(["gcsenum"]).is_err());
        assert!(Args::try_parse_from(["gcsenum", "-n", "acme", "-l", "k.txt"]).is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["gcsenum", "-n", "acme"]).unwrap();
        let config = args.scan_config();
        assert_eq!(config.concurrency, 10);
        assert!(!config.verbose);
        assert_eq!(config.denial_phrases, ScanConfig::default().denial_phrases);
    }

    #[test]
    fn test_concurrency_must_be_positive() {
        assert!(Args::try_parse_from(["gcsenum", "-n", "acme", "-c", "0"]).is_err());
        let args = Args::try_parse_from(["gcsenum", "-n", "acme", "-c", "50", "-v"]).unwrap();
        let config = args.scan_config();
        assert_eq!(config.concurrency, 50);
        assert!(config.verbose);
    }

    #[test]
    fn test_deny_phrases_replace_defaults() {
        let args = Args::try_parse_from([
            "gcsenum", "-n", "acme", "--deny-phrase", "Forbidden", "--deny-phrase", "nope",
        ])
        .unwrap();
        assert_eq!(args.scan_config().denial_phrases, vec!["Forbidden", "nope"]);
    }

    #[test]
    fn test_blank_keyword_is_rejected() {
        let args = Args::try_parse_from(["gcsenum", "-n", "  "]).unwrap();
        assert!(load_keywords(&args).is_err());
    }

    #[test]
    fn test_keywords_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.txt");
        std::fs::write(&path, "acme\n\nglobex\n").unwrap();

        let args = Args::try_parse_from(["gcsenum", "-l", path.to_str().unwrap()]).unwrap();
        assert_eq!(load_keywords(&args).unwrap(), vec!["acme", "globex"]);
    }
}
