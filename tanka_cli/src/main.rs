use std::{
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tanka_core::{Analyzer, ArticleScan, Engine};
use tanka_corpus::{DEFAULT_WIKI_BASE, load_articles};
use tanka_lexicon::TsvLexicon;
use tanka_vibrato::VibratoAnalyzer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod format;

const DEFAULT_INPUT: &str = "./wp2txt/jawiki-latest-pages-articles.xml-*.txt";

/// 在 wp2txt 语料中检出偶然出现的 5-7-5-7-7 短歌
#[derive(Parser, Debug)]
#[command(name = "tanka_cli")]
#[command(version)]
struct Args {
    /// 输入文件的 glob 模式
    #[arg(env = "TANKA_INPUT", default_value = DEFAULT_INPUT)]
    input: String,

    /// vibrato 系统词典（已解压）
    #[arg(long, env = "TANKA_DICT", conflicts_with = "lexicon", required_unless_present = "lexicon")]
    dict: Option<PathBuf>,

    /// TSV 词表（代替 vibrato 词典）
    #[arg(long, env = "TANKA_LEXICON")]
    lexicon: Option<PathBuf>,

    /// 文章链接前缀
    #[arg(long, env = "TANKA_WIKI_BASE", default_value = DEFAULT_WIKI_BASE)]
    wiki_base: String,

    /// 主输出每条记录追加文章链接
    #[arg(long)]
    url: bool,

    /// 不输出诊断信息
    #[arg(long)]
    no_diagnostics: bool,

    /// 并行线程数（0 = rayon 默认）
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

/// 单个文件的统计。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct FileSummary {
    articles: usize,
    matches: usize,
    failed_lines: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "tanka_cli=info,tanka_core=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("初始化线程池失败")?;
    }

    // 解析器只构造一次，之后所有文件/文章/行共用
    let engine = Engine::new(build_analyzer(&args)?);

    let paths = glob::glob(&args.input).with_context(|| format!("无效的输入模式：{}", args.input))?;
    let mut out = BufWriter::new(io::stdout().lock());
    let mut total = FileSummary::default();
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(error) => {
                warn!(%error, "skipping unreadable path");
                continue;
            }
        };
        info!(file = %path.display(), "scanning");
        match scan_file(&engine, &path, &args, &mut out) {
            Ok(summary) => {
                total.articles += summary.articles;
                total.matches += summary.matches;
                total.failed_lines += summary.failed_lines;
            }
            Err(error) => warn!(file = %path.display(), error = %format!("{error:#}"), "skipping file"),
        }
    }
    out.flush()?;

    info!(
        articles = total.articles,
        matches = total.matches,
        failed_lines = total.failed_lines,
        "done"
    );
    Ok(())
}

fn build_analyzer(args: &Args) -> Result<Box<dyn Analyzer>> {
    match (&args.dict, &args.lexicon) {
        (Some(dict), _) => {
            let analyzer = VibratoAnalyzer::from_path(dict).context("加载 vibrato 词典失败")?;
            Ok(Box::new(analyzer))
        }
        (None, Some(lexicon)) => {
            let analyzer = TsvLexicon::from_path(lexicon)
                .with_context(|| format!("加载词表失败：{}", lexicon.display()))?;
            info!(entries = analyzer.len(), "lexicon loaded");
            Ok(Box::new(analyzer))
        }
        (None, None) => anyhow::bail!("需要 --dict 或 --lexicon"),
    }
}

/// 扫描一个语料文件：文章之间并行，输出按文章原顺序写出。
fn scan_file<A, W>(engine: &Engine<A>, path: &Path, args: &Args, out: &mut W) -> Result<FileSummary>
where
    A: Analyzer,
    W: Write,
{
    let articles = load_articles(path, &args.wiki_base)?;
    let reports: Vec<ArticleScan> = articles
        .par_iter()
        .map(|article| engine.scan_article(&article.lines))
        .collect();

    let mut summary = FileSummary {
        articles: articles.len(),
        ..FileSummary::default()
    };
    // 扫描结束后才锁 stderr，避免与工作线程的日志互相等待
    let mut err = io::stderr().lock();
    for (article, report) in articles.iter().zip(&reports) {
        summary.matches += report.matches.len();
        summary.failed_lines += report.failures.len();
        let url = args.url.then_some(article.url.as_str());
        for found in &report.matches {
            format::write_record(out, found, &article.key, url)?;
            if !args.no_diagnostics {
                format::write_diagnostic(&mut err, found, &article.key)?;
            }
        }
    }
    Ok(summary)
}
