//! 词表解析器：用 TSV 词表做最长匹配，输出 MeCab 风格的节点序列。
//!
//! 用于无外部词典的离线运行与端到端测试；正式语料建议用 `tanka_vibrato`。

use std::{collections::BTreeMap, fs, io, path::Path};

use tanka_core::{Analyzer, Node, NodeStatus};
use thiserror::Error;
use tracing::debug;

/// 与 MeCab 一样直接跳过的半角空白。
const SKIPPED_SPACES: [char; 2] = [' ', '\t'];

/// 行首/行尾标记节点的素性（与 MeCab 相同）。
const MARKER_FEATURE: &str = "BOS/EOS,*,*,*,*,*,*,*,*";
/// 未知词的素性：MeCab 对未知词只给 7 个字段。
const UNKNOWN_FEATURE: &str = "名詞,一般,*,*,*,*,*";

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("读取词表失败：{0}")]
    Io(#[from] io::Error),

    #[error("词表第 {line} 行缺少 surface/feature")]
    MissingField { line: usize },

    #[error("词表第 {line} 行权重不是整数：{weight}")]
    InvalidWeight { line: usize, weight: String },
}

#[derive(Debug, Clone)]
struct Entry {
    feature: String,
    weight: i32,
}

/// TSV 格式：
///
/// - `surface<TAB>feature<TAB>weight`
/// - weight 可省略，默认 0；同一 surface 有多条时取权重最大的
/// - 允许 `#` 开头注释行
///
/// feature 是 9 字段的 IPADIC 素性串，例如 `名詞,一般,*,*,*,*,猫,ネコ,ネコ`。
pub struct TsvLexicon {
    map: BTreeMap<String, Vec<Entry>>,
    /// 最长 surface 的字符数，限制最长匹配的探测长度
    max_len: usize,
}

impl TsvLexicon {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let s = fs::read_to_string(path)?;
        Self::from_tsv_str(&s)
    }

    pub fn from_tsv_str(s: &str) -> Result<Self, LexiconError> {
        let mut map: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
        let mut max_len = 0;

        for (idx, line) in s.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut it = line.split('\t');
            // surface 可能是全角空格，不做 trim
            let surface = it.next().unwrap_or("");
            let feature = it.next().unwrap_or("").trim();
            if surface.is_empty() || feature.is_empty() {
                return Err(LexiconError::MissingField { line: idx + 1 });
            }
            let weight = match it.next().map(str::trim).filter(|x| !x.is_empty()) {
                Some(w) => w.parse::<i32>().map_err(|_| LexiconError::InvalidWeight {
                    line: idx + 1,
                    weight: w.to_owned(),
                })?,
                None => 0,
            };
            max_len = max_len.max(surface.chars().count());
            map.entry(surface.to_owned()).or_default().push(Entry {
                feature: feature.to_owned(),
                weight,
            });
        }

        for v in map.values_mut() {
            v.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.feature.cmp(&b.feature)));
        }

        debug!(entries = map.len(), max_len, "lexicon loaded");
        Ok(Self { map, max_len })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// 从 `rest` 开头找最长的词条；返回（字节长度，最佳词条）。
    fn longest_prefix<'a>(&'a self, rest: &str) -> Option<(usize, &'a Entry)> {
        let ends: Vec<usize> = rest
            .char_indices()
            .map(|(i, ch)| i + ch.len_utf8())
            .take(self.max_len)
            .collect();
        ends.into_iter().rev().find_map(|end| {
            self.map
                .get(&rest[..end])
                .and_then(|entries| entries.first())
                .map(|entry| (end, entry))
        })
    }
}

/// 未知词按字符种类成组（与 MeCab 的未知词处理相近）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Hiragana,
    Katakana,
    Kanji,
    Alpha,
    Digit,
    Other,
}

fn char_class(ch: char) -> CharClass {
    match ch {
        'ぁ'..='ゖ' => CharClass::Hiragana,
        'ァ'..='ヺ' | 'ー' => CharClass::Katakana,
        '一'..='鿿' | '々' => CharClass::Kanji,
        'a'..='z' | 'A'..='Z' | 'ａ'..='ｚ' | 'Ａ'..='Ｚ' => CharClass::Alpha,
        '0'..='9' | '０'..='９' => CharClass::Digit,
        _ => CharClass::Other,
    }
}

impl Analyzer for TsvLexicon {
    fn analyze(&self, line: &str) -> tanka_core::Result<Vec<Node>> {
        let mut nodes = vec![Node::new(NodeStatus::LineStartMarker, "", MARKER_FEATURE)];
        // 正在累积的未知词：起始字节位置与字符种类
        let mut unknown: Option<(usize, CharClass)> = None;
        let mut pos = 0;

        while pos < line.len() {
            let rest = &line[pos..];
            if rest.starts_with(SKIPPED_SPACES) {
                if let Some((start, _)) = unknown.take() {
                    nodes.push(Node::new(NodeStatus::UnknownVocabulary, &line[start..pos], UNKNOWN_FEATURE));
                }
                pos += 1;
                continue;
            }
            if let Some((len, entry)) = self.longest_prefix(rest) {
                if let Some((start, _)) = unknown.take() {
                    nodes.push(Node::new(NodeStatus::UnknownVocabulary, &line[start..pos], UNKNOWN_FEATURE));
                }
                nodes.push(Node::new(NodeStatus::Regular, &rest[..len], entry.feature.as_str()));
                pos += len;
                continue;
            }

            let Some(ch) = rest.chars().next() else { break };
            let class = char_class(ch);
            match unknown {
                Some((_, current)) if current == class => {}
                Some((start, _)) => {
                    nodes.push(Node::new(NodeStatus::UnknownVocabulary, &line[start..pos], UNKNOWN_FEATURE));
                    unknown = Some((pos, class));
                }
                None => unknown = Some((pos, class)),
            }
            pos += ch.len_utf8();
        }
        if let Some((start, _)) = unknown {
            nodes.push(Node::new(NodeStatus::UnknownVocabulary, &line[start..], UNKNOWN_FEATURE));
        }

        nodes.push(Node::new(NodeStatus::LineEndMarker, "", MARKER_FEATURE));
        Ok(nodes)
    }
}
