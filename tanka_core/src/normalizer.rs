//! `normalizer`：把解析器节点规整成 `Token`。
//!
//! - 丢弃行首/行尾标记
//! - 素性串一次性解析成 `PosFields`，字段数不对就报 `Error::FeatureParse`
//! - 未知词与記号的拍数记为 0，其余按発音字段计数

use crate::{
    analyzer::{Analyzer, Node, NodeStatus},
    error::{Error, Result},
    model::{PosFields, Token},
    mora,
};

const FIELD_COUNT: usize = 9;
const SYMBOL: &str = "記号";
/// 未知词素性缺失字段的占位值
const PLACEHOLDER: &str = "*";

impl PosFields {
    /// 解析逗号分隔的素性串。
    ///
    /// 常规节点要求正好 9 个字段；未知词（MeCab 系解析器通常只给 7 个字段）缺的尾部字段补 `*`。
    pub fn parse(feature: &str, status: NodeStatus) -> Result<Self> {
        let mut fields: Vec<&str> = feature.split(',').collect();
        let found = fields.len();
        if status == NodeStatus::UnknownVocabulary && found < FIELD_COUNT {
            fields.resize(FIELD_COUNT, PLACEHOLDER);
        }
        let &[
            pos,
            subclass1,
            subclass2,
            subclass3,
            conjugation_form,
            conjugation_type,
            base_form,
            reading,
            pronunciation,
        ] = fields.as_slice()
        else {
            return Err(Error::FeatureParse {
                feature: feature.to_owned(),
                found,
            });
        };
        Ok(Self {
            pos: pos.to_owned(),
            subclass1: subclass1.to_owned(),
            subclass2: subclass2.to_owned(),
            subclass3: subclass3.to_owned(),
            conjugation_form: conjugation_form.to_owned(),
            conjugation_type: conjugation_type.to_owned(),
            base_form: base_form.to_owned(),
            reading: reading.to_owned(),
            pronunciation: pronunciation.to_owned(),
        })
    }
}

impl Token {
    /// 单个节点 -> token（调用方已过滤掉标记节点）。
    pub fn from_node(node: Node) -> Result<Self> {
        let pos = PosFields::parse(&node.feature, node.status)?;
        let mora_count = if node.status == NodeStatus::UnknownVocabulary || pos.pos == SYMBOL {
            0
        } else {
            mora::count(&pos.pronunciation)
        };
        Ok(Self {
            status: node.status,
            surface: node.surface,
            pos,
            mora_count,
        })
    }
}

/// 节点序列 -> token 序列，保持原有顺序。任一节点素性损坏则整行失败。
pub fn normalize<I>(nodes: I) -> Result<Vec<Token>>
where
    I: IntoIterator<Item = Node>,
{
    nodes
        .into_iter()
        .filter(|node| !node.status.is_marker())
        .map(Token::from_node)
        .collect()
}

/// 持有解析器句柄的规整器：构造时注入解析器，之后只读复用。
pub struct TokenNormalizer<A> {
    analyzer: A,
}

impl<A> TokenNormalizer<A>
where
    A: Analyzer,
{
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    /// 解析一行并规整。
    pub fn tokenize(&self, line: &str) -> Result<Vec<Token>> {
        let nodes = self.analyzer.analyze(line)?;
        normalize(nodes)
    }
}
