//! vibrato（MeCab 兼容的形态素解析器）适配层。
//!
//! 约定：
//! - 词典为 IPADIC 系（9 字段素性）的 vibrato 系统词典，需先解压（`system.dic.zst` -> `system.dic`）
//! - `VibratoAnalyzer` 在进程内只构造一次，之后以 `&self` 在各线程间共享；每次 `analyze` 新建 worker

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use tanka_core::{Analyzer, Node, NodeStatus};
use thiserror::Error;
use tracing::info;
use vibrato::{Dictionary, Tokenizer, dictionary::LexType, errors::VibratoError};

/// MeCab 默认对未知词最多合并的字符数
const MAX_GROUPING_LEN: usize = 24;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("无法打开词典 {path}：{source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("词典格式错误：{0}")]
    Dictionary(#[from] VibratoError),
}

pub struct VibratoAnalyzer {
    tokenizer: Tokenizer,
}

impl VibratoAnalyzer {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let analyzer = Self::from_reader(BufReader::new(file))?;
        info!(dict = %path.display(), "vibrato dictionary loaded");
        Ok(analyzer)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let dict = Dictionary::read(reader)?;
        Self::from_dictionary(dict)
    }

    /// 半角空白按 MeCab 的方式忽略。
    pub fn from_dictionary(dict: Dictionary) -> Result<Self, LoadError> {
        let tokenizer = Tokenizer::new(dict)
            .ignore_space(true)?
            .max_grouping_len(MAX_GROUPING_LEN);
        Ok(Self { tokenizer })
    }
}

fn status_of(lex_type: LexType) -> NodeStatus {
    match lex_type {
        LexType::Unknown => NodeStatus::UnknownVocabulary,
        LexType::System | LexType::User => NodeStatus::Regular,
    }
}

impl Analyzer for VibratoAnalyzer {
    /// vibrato 不输出行首/行尾节点，只有词本身。
    fn analyze(&self, line: &str) -> tanka_core::Result<Vec<Node>> {
        let mut worker = self.tokenizer.new_worker();
        worker.reset_sentence(line);
        worker.tokenize();
        Ok(worker
            .token_iter()
            .map(|token| Node::new(status_of(token.lex_type()), token.surface(), token.feature()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_lex_type_maps_to_unknown_vocabulary() {
        assert_eq!(status_of(LexType::Unknown), NodeStatus::UnknownVocabulary);
        assert_eq!(status_of(LexType::System), NodeStatus::Regular);
        assert_eq!(status_of(LexType::User), NodeStatus::Regular);
    }

    #[test]
    fn missing_dictionary_is_an_io_error() {
        let err = VibratoAnalyzer::from_path("/nonexistent/system.dic").err();
        assert!(matches!(err, Some(LoadError::Io { .. })));
    }

    #[test]
    fn garbage_dictionary_is_rejected() {
        let err = VibratoAnalyzer::from_reader(&b"not a dictionary"[..]).err();
        assert!(matches!(err, Some(LoadError::Dictionary(_))));
    }
}
