//! `rules`：句界判定。三个纯谓词，规则不成立只返回 `false`。
//!
//! - `is_valid_segment_start`：该 token 能否作为一句的开头（或作为整首歌之后的下一个词）
//! - `is_valid_continuation`：该 token 能否被接受进当前候选
//! - `is_valid_poem`：凑满 5-7-5-7-7 后的整体检查（括号配对、句末词性、后续词）

use crate::model::{NodeStatus, Token};

/// 判定句首时的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// 第 n 句（0..=4）的开头
    Segment(usize),
    /// 整首歌之后紧跟的 token
    PostPoem,
}

impl Position {
    fn is_first_segment(self) -> bool {
        self == Position::Segment(0)
    }
}

/// 不能作为句首的品詞。
const NON_INITIAL_POS: [&str; 2] = ["助詞", "助動詞"];
/// 不能作为句首的品詞細分類1。
const NON_INITIAL_SUBCLASS: [&str; 2] = ["接尾", "非自立"];
/// 自立但不能作为句首的原形（轻动词）。
const LIGHT_VERBS: [&str; 2] = ["する", "できる"];
const INDEPENDENT: &str = "自立";
const FILLER: &str = "フィラー";
const ALPHABET: &str = "アルファベット";
const ADNOMINAL: &str = "連体詞";
const AUXILIARY_VERB: &str = "助動詞";
const COPULA: &str = "だ";

/// 单独出现时只能作为新句开头的标点（、・全角空格）。
const LONE_PUNCTUATION: [char; 3] = ['、', '・', '\u{3000}'];

/// 候选中不允许出现的字符。
const FORBIDDEN_CHARS: [char; 8] = ['（', '）', '。', '…', 'ゞ', '―', '：', '｜'];

/// 句末不能停留的品詞細分類1（意义未完结）。
const INCOMPLETE_ENDINGS: [&str; 8] = [
    "名詞接続",
    "格助詞",
    "係助詞",
    "連体化",
    "接続助詞",
    "並立助詞",
    "副詞化",
    "数接続",
];

/// 需要配对的括号：(开, 闭)。
const BRACKETS: [(&str, &str); 2] = [("「", "」"), ("『", "』")];

fn is_lone_punctuation(surface: &str) -> bool {
    let mut chars = surface.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => LONE_PUNCTUATION.contains(&ch),
        _ => false,
    }
}

fn has_forbidden_char(surface: &str) -> bool {
    surface.chars().any(|ch| FORBIDDEN_CHARS.contains(&ch))
}

pub fn is_valid_segment_start(token: &Token, position: Position) -> bool {
    let pos = &token.pos;
    if NON_INITIAL_POS.contains(&pos.pos.as_str()) {
        return false;
    }
    if NON_INITIAL_SUBCLASS.contains(&pos.subclass1.as_str()) {
        return false;
    }
    if pos.subclass1 == INDEPENDENT && LIGHT_VERBS.contains(&pos.base_form.as_str()) {
        return false;
    }
    if position.is_first_segment() && pos.pos == FILLER {
        return false;
    }
    if position.is_first_segment() && is_lone_punctuation(&token.surface) {
        return false;
    }
    true
}

/// `accumulated` 是当前句已累计的拍数；为 0 表示该 token 是新句的第一个。
pub fn is_valid_continuation(token: &Token, accumulated: usize) -> bool {
    if token.status == NodeStatus::UnknownVocabulary {
        return false;
    }
    if has_forbidden_char(&token.surface) {
        return false;
    }
    if token.pos.subclass1 == ALPHABET {
        return false;
    }
    if accumulated != 0 && is_lone_punctuation(&token.surface) {
        return false;
    }
    true
}

/// 括号配对：任一种括号的运行计数变负立即失败，结束时必须归零。
fn brackets_balanced(poem: &[Token]) -> bool {
    let mut balance = [0i32; BRACKETS.len()];
    for token in poem {
        for (i, (open, close)) in BRACKETS.iter().enumerate() {
            if token.surface == *open {
                balance[i] += 1;
            }
            if token.surface == *close {
                balance[i] -= 1;
                if balance[i] < 0 {
                    return false;
                }
            }
        }
    }
    balance.iter().all(|&b| b == 0)
}

pub fn is_valid_poem(poem: &[Token], trailing: Option<&Token>) -> bool {
    if !brackets_balanced(poem) {
        return false;
    }
    let Some(last) = poem.last() else {
        return false;
    };
    if last.pos.pos == ADNOMINAL {
        return false;
    }
    if INCOMPLETE_ENDINGS.contains(&last.pos.subclass1.as_str()) {
        return false;
    }
    if last.pos.pos == AUXILIARY_VERB && last.pos.base_form == COPULA {
        return false;
    }
    // 后续词必须本身能起一个新短语，否则视为截断了更长的分句
    if let Some(next) = trailing {
        if !is_valid_segment_start(next, Position::PostPoem) {
            return false;
        }
    }
    true
}
