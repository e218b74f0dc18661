use tracing::{debug, warn};

use crate::analyzer::Analyzer;
use crate::error::{Error, Result};
use crate::model::{Match, Token};
use crate::normalizer::TokenNormalizer;
use crate::scanner;

/// 单行失败记录（素性损坏或解析器失败），不影响同文章其它行。
#[derive(Debug)]
pub struct LineFailure {
    /// 行号（从 1 开始，相对于文章正文）
    pub line_no: usize,
    pub error: Error,
}

/// 一篇文章的扫描结果：命中按行序排列。
#[derive(Debug, Default)]
pub struct ArticleScan {
    pub matches: Vec<Match>,
    pub failures: Vec<LineFailure>,
}

/// 引擎：负责把一行文本变成 `Match` 列表。
///
/// 结构上对应流水线：
/// - engine（编排） -> analyzer（形态素解析） -> normalizer（规整） -> scanner/rules（检出） -> 输出 `Match`
///
/// 引擎本身无可变状态，`&Engine` 可以在多个线程间共享。
pub struct Engine<A> {
    normalizer: TokenNormalizer<A>,
}

impl<A> Engine<A>
where
    A: Analyzer,
{
    /// 解析器在这里注入一次，之后所有行复用同一个实例。
    pub fn new(analyzer: A) -> Self {
        Self {
            normalizer: TokenNormalizer::new(analyzer),
        }
    }

    /// 一行文本 -> 规整后的 token 序列。
    pub fn tokenize(&self, line: &str) -> Result<Vec<Token>> {
        self.normalizer.tokenize(line)
    }

    /// 扫描一行。没有命中是正常结果（空列表）。
    pub fn scan_line(&self, line: &str) -> Result<Vec<Match>> {
        let tokens = self.tokenize(line)?;
        Ok(scanner::scan(&tokens))
    }

    /// 逐行扫描一篇文章；失败的行记入 `failures` 后跳过。
    pub fn scan_article<I, S>(&self, lines: I) -> ArticleScan
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = ArticleScan::default();
        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            match self.scan_line(line) {
                Ok(mut found) => {
                    if !found.is_empty() {
                        debug!(line_no = idx + 1, count = found.len(), "tanka found");
                    }
                    out.matches.append(&mut found);
                }
                Err(error) => {
                    warn!(line_no = idx + 1, %error, "skipping line");
                    out.failures.push(LineFailure {
                        line_no: idx + 1,
                        error,
                    });
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Node, NodeStatus};

    /// 测试用解析器：按空白切分，每个词写成 `表层/発音`；`!` 模拟解析失败。
    struct FakeAnalyzer;

    impl Analyzer for FakeAnalyzer {
        fn analyze(&self, line: &str) -> Result<Vec<Node>> {
            if line.contains('!') {
                return Err(Error::analyzer("fake failure"));
            }
            let mut nodes = vec![Node::new(NodeStatus::LineStartMarker, "", "BOS/EOS,*,*,*,*,*,*,*,*")];
            for word in line.split_whitespace() {
                let (surface, pron) = word.split_once('/').unwrap_or((word, ""));
                let feature = if pron == "short" {
                    "名詞,一般".to_owned()
                } else {
                    format!("名詞,一般,*,*,*,*,{surface},{pron},{pron}")
                };
                nodes.push(Node::new(NodeStatus::Regular, surface, feature));
            }
            nodes.push(Node::new(NodeStatus::LineEndMarker, "", "BOS/EOS,*,*,*,*,*,*,*,*"));
            Ok(nodes)
        }
    }

    const POEM: &str = "あ/アイウエオ か/カキクケコサシ さ/サシスセソ た/タチツテトナニ な/ナニヌネノハヒ";

    #[test]
    fn scans_a_single_line() {
        let engine = Engine::new(FakeAnalyzer);
        let found = engine.scan_line(POEM).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text(), "あかさたな");
        assert!(found[0].trailing.is_none());
    }

    #[test]
    fn article_keeps_going_after_bad_lines() {
        let engine = Engine::new(FakeAnalyzer);
        let lines = [POEM, "壊/short", "失敗!", "何もない/ナニモナイ", POEM];
        let report = engine.scan_article(lines);
        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].line_no, 2);
        assert!(matches!(report.failures[0].error, Error::FeatureParse { .. }));
        assert_eq!(report.failures[1].line_no, 3);
        assert!(matches!(report.failures[1].error, Error::AnalyzerFailure(_)));
    }

    #[test]
    fn no_state_crosses_lines() {
        // 前三句和后两句分在两行：不能拼成一首
        let engine = Engine::new(FakeAnalyzer);
        let lines = [
            "あ/アイウエオ か/カキクケコサシ さ/サシスセソ",
            "た/タチツテトナニ な/ナニヌネノハヒ",
        ];
        assert!(engine.scan_article(lines).matches.is_empty());
    }

    #[test]
    fn boxed_analyzer_works() {
        let engine = Engine::new(Box::new(FakeAnalyzer) as Box<dyn Analyzer>);
        assert_eq!(engine.scan_line(POEM).unwrap().len(), 1);
    }
}
