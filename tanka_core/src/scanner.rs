//! `scanner`：在一行的 token 序列上做滑动窗口扫描。
//!
//! 对每个起点 i 运行一个小状态机（`Candidate`）：
//! - 每接受一个 token 就累加拍数
//! - 恰好凑满当前句的目标拍数 -> `SegmentComplete`，开始下一句
//! - 凑满第五句 -> `PoemComplete`，做整体检查后结束该起点
//! - 超出目标或规则不成立 -> `Abandoned`
//!
//! 不回溯：token 不可拆分，超拍即放弃该起点，也不尝试别的切分方式。
//! 每个起点最多产出一个 `Match`；不同起点之间可能重叠，这里不去重。

use crate::{
    model::{Match, SEGMENT_MORAE, Token},
    rules::{Position, is_valid_continuation, is_valid_poem, is_valid_segment_start},
};

/// 单个起点的扫描状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// 当前句尚未凑满
    ScanningSegment,
    /// 当前句刚好凑满，下一个 token 开始新句
    SegmentComplete,
    /// 五句全部凑满
    PoemComplete,
    /// 该起点放弃
    Abandoned,
}

/// 起点 `start` 的临时扫描状态，扫描结束即丢弃。
#[derive(Debug)]
struct Candidate {
    start: usize,
    segment: usize,
    accumulated: usize,
    accepted: usize,
}

impl Candidate {
    fn new(start: usize) -> Self {
        Self {
            start,
            segment: 0,
            accumulated: 0,
            accepted: 0,
        }
    }

    /// 状态转移：尝试接受下一个 token。
    fn step(&mut self, token: &Token) -> ScanState {
        if self.accumulated == 0 && !is_valid_segment_start(token, Position::Segment(self.segment)) {
            return ScanState::Abandoned;
        }
        if !is_valid_continuation(token, self.accumulated) {
            return ScanState::Abandoned;
        }
        self.accumulated += token.mora_count;
        self.accepted += 1;

        let target = SEGMENT_MORAE[self.segment];
        if self.accumulated == target {
            self.segment += 1;
            self.accumulated = 0;
            if self.segment == SEGMENT_MORAE.len() {
                ScanState::PoemComplete
            } else {
                ScanState::SegmentComplete
            }
        } else if self.accumulated > target {
            ScanState::Abandoned
        } else {
            ScanState::ScanningSegment
        }
    }

    /// 已接受的 token 区间（接受的 token 总是从起点开始连续的）。
    fn poem<'a>(&self, tokens: &'a [Token]) -> &'a [Token] {
        &tokens[self.start..self.start + self.accepted]
    }
}

/// 从起点 `start` 扫描；命中则返回该起点唯一的 `Match`。
pub fn scan_from(tokens: &[Token], start: usize) -> Option<Match> {
    let mut candidate = Candidate::new(start);
    for (j, token) in tokens.iter().enumerate().skip(start) {
        match candidate.step(token) {
            ScanState::ScanningSegment | ScanState::SegmentComplete => continue,
            ScanState::Abandoned => return None,
            ScanState::PoemComplete => {
                let poem = candidate.poem(tokens);
                let trailing = tokens.get(j + 1);
                if !is_valid_poem(poem, trailing) {
                    return None;
                }
                return Some(Match {
                    poem: poem.to_vec(),
                    trailing: trailing.cloned(),
                });
            }
        }
    }
    None
}

/// 逐个起点产出 `Match` 的惰性序列；有限，可对同一序列重新创建。
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    tokens: &'a [Token],
    next_start: usize,
}

impl Iterator for Matches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        while self.next_start < self.tokens.len() {
            let start = self.next_start;
            self.next_start += 1;
            if let Some(found) = scan_from(self.tokens, start) {
                return Some(found);
            }
        }
        None
    }
}

pub fn matches(tokens: &[Token]) -> Matches<'_> {
    Matches {
        tokens,
        next_start: 0,
    }
}

/// 扫描一行的全部起点，按起点顺序返回所有命中。
pub fn scan(tokens: &[Token]) -> Vec<Match> {
    matches(tokens).collect()
}
