//! wp2txt 语料读取：把导出的纯文本切成文章。
//!
//! 格式约定：
//! - 单独一行的 `[[标题]]` 开始一篇新文章（标题含 `thumb` 的是图片说明，整行丢弃）
//! - `== 小节 ==` 形式的标题行、空行丢弃
//! - 其它行按顺序归入当前文章；第一篇文章之前的行丢弃

use std::{collections::HashMap, fs, io, path::Path};

use thiserror::Error;
use tracing::{debug, warn};

/// 默认的文章链接前缀。
pub const DEFAULT_WIKI_BASE: &str = "http://ja.wikipedia.org/wiki/";

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("读取语料失败 {path}：{source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// 一篇文章。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// 标题（输出时作为 key）
    pub key: String,
    /// 百分号转义后的文章链接
    pub url: String,
    /// 正文行（已去掉标题行与空行）
    pub lines: Vec<String>,
}

/// 文章链接：`base` + 百分号转义后的标题。
pub fn article_url(base: &str, key: &str) -> String {
    format!("{base}{}", urlencoding::encode(key))
}

fn is_section_heading(line: &str) -> bool {
    line.len() >= 4 && line.starts_with("==") && line.ends_with("==")
}

fn article_key(line: &str) -> Option<&str> {
    line.strip_prefix("[[")?.strip_suffix("]]")
}

/// 切分整份 wp2txt 文本。同名文章后出现的覆盖先出现的正文，位置保持不变。
pub fn parse_articles(text: &str, base: &str) -> Vec<Article> {
    let mut articles: Vec<Article> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut current: Option<usize> = None;
    let mut orphans = 0usize;

    for line in text.split('\n') {
        if line.is_empty() || is_section_heading(line) {
            continue;
        }
        if let Some(key) = article_key(line) {
            if key.contains("thumb") {
                continue;
            }
            let slot = match index.get(key) {
                Some(&i) => {
                    articles[i].lines.clear();
                    i
                }
                None => {
                    articles.push(Article {
                        key: key.to_owned(),
                        url: article_url(base, key),
                        lines: Vec::new(),
                    });
                    index.insert(key.to_owned(), articles.len() - 1);
                    articles.len() - 1
                }
            };
            current = Some(slot);
            continue;
        }
        match current {
            Some(i) => articles[i].lines.push(line.to_owned()),
            None => orphans += 1,
        }
    }

    if orphans > 0 {
        debug!(orphans, "dropped lines before the first article");
    }
    articles
}

/// 解码字节串，丢弃非法的 UTF-8 序列；返回文本与丢弃的段数。
fn scrub(bytes: &[u8]) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        if !chunk.invalid().is_empty() {
            dropped += 1;
        }
    }
    (text, dropped)
}

/// 读取一个 wp2txt 文件并切分。非法编码的字节被丢弃，不影响其它文章。
pub fn load_articles(path: impl AsRef<Path>, base: &str) -> Result<Vec<Article>, CorpusError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| CorpusError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let (text, dropped) = scrub(&bytes);
    if dropped > 0 {
        warn!(path = %path.display(), dropped, "dropped invalid UTF-8 sequences");
    }
    let articles = parse_articles(&text, base);
    debug!(path = %path.display(), articles = articles.len(), "corpus file parsed");
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DUMP: &str = "\
前置きの行
[[東京]]

東京は日本の首都である。
== 歴史 ==
江戸と呼ばれた。
[[ファイル:Tokyo.jpg|thumb|東京の風景]]
[[松尾芭蕉]]
== 生涯 ==
伊賀国の生まれ。
";

    #[test]
    fn splits_articles_and_drops_markup() {
        let articles = parse_articles(DUMP, DEFAULT_WIKI_BASE);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].key, "東京");
        assert_eq!(articles[0].lines, ["東京は日本の首都である。", "江戸と呼ばれた。"]);
        assert_eq!(articles[1].key, "松尾芭蕉");
        assert_eq!(articles[1].lines, ["伊賀国の生まれ。"]);
    }

    #[test]
    fn url_is_percent_escaped() {
        let articles = parse_articles(DUMP, DEFAULT_WIKI_BASE);
        assert_eq!(
            articles[0].url,
            "http://ja.wikipedia.org/wiki/%E6%9D%B1%E4%BA%AC"
        );
        assert_eq!(article_url("https://x/", "A B"), "https://x/A%20B");
    }

    #[test]
    fn thumb_lines_are_not_body_text() {
        let articles = parse_articles(DUMP, DEFAULT_WIKI_BASE);
        assert!(articles.iter().flat_map(|a| &a.lines).all(|l| !l.contains("thumb")));
    }

    #[test]
    fn repeated_key_replaces_body_in_place() {
        let text = "[[A]]\na1\n[[B]]\nb1\n[[A]]\na2\n";
        let articles = parse_articles(text, DEFAULT_WIKI_BASE);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].key, "A");
        assert_eq!(articles[0].lines, ["a2"]);
        assert_eq!(articles[1].lines, ["b1"]);
    }

    #[test]
    fn bracketed_text_inside_a_line_is_body() {
        let articles = parse_articles("[[A]]\n[[B]]の説明\n", DEFAULT_WIKI_BASE);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].lines, ["[[B]]の説明"]);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DUMP.as_bytes()).unwrap();
        let articles = load_articles(file.path(), DEFAULT_WIKI_BASE).unwrap();
        assert_eq!(articles.len(), 2);
    }

    #[test]
    fn invalid_bytes_do_not_lose_neighbouring_articles() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("[[A]]\n良い行\n[[B]]\n".as_bytes()).unwrap();
        file.write_all(b"\xff\xfe bad\n").unwrap();
        file.write_all("[[C]]\n別の行\n".as_bytes()).unwrap();
        let articles = load_articles(file.path(), DEFAULT_WIKI_BASE).unwrap();
        let keys: Vec<&str> = articles.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["A", "B", "C"]);
        assert_eq!(articles[0].lines, ["良い行"]);
        assert_eq!(articles[1].lines, [" bad"]);
        assert_eq!(articles[2].lines, ["別の行"]);
    }

    #[test]
    fn scrub_drops_only_invalid_sequences() {
        let mut bytes = "猫".as_bytes().to_vec();
        bytes.push(0x80);
        bytes.extend_from_slice("犬".as_bytes());
        let (text, dropped) = scrub(&bytes);
        assert_eq!(text, "猫犬");
        assert_eq!(dropped, 1);
        assert_eq!(scrub("普通".as_bytes()), ("普通".to_owned(), 0));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_articles("/nonexistent/wp2txt.txt", DEFAULT_WIKI_BASE).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/wp2txt.txt"));
    }
}
