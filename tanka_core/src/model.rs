/// 短歌五句的目标拍数：5-7-5-7-7。
pub const SEGMENT_MORAE: [usize; 5] = [5, 7, 5, 7, 7];

/// 节点分类（与 MeCab 的 stat 对应）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Regular,
    /// 词典外的未知词：拍数强制为 0
    UnknownVocabulary,
    /// 行首标记（BOS），不会进入扫描
    LineStartMarker,
    /// 行尾标记（EOS），不会进入扫描
    LineEndMarker,
}

impl NodeStatus {
    pub fn is_marker(self) -> bool {
        matches!(self, NodeStatus::LineStartMarker | NodeStatus::LineEndMarker)
    }
}

/// 素性的 9 个固定字段（IPADIC 顺序）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosFields {
    /// 品詞
    pub pos: String,
    /// 品詞細分類1
    pub subclass1: String,
    /// 品詞細分類2
    pub subclass2: String,
    /// 品詞細分類3
    pub subclass3: String,
    /// 活用形
    pub conjugation_form: String,
    /// 活用型
    pub conjugation_type: String,
    /// 原形
    pub base_form: String,
    /// 読み
    pub reading: String,
    /// 発音（拍数按这个字段计算）
    pub pronunciation: String,
}

/// 规整后的 token：scanner 只看这个结构。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub status: NodeStatus,
    pub surface: String,
    pub pos: PosFields,
    pub mora_count: usize,
}

/// 一次命中：按接受顺序排列的 token，以及紧随其后的 token（若有）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub poem: Vec<Token>,
    pub trailing: Option<Token>,
}

impl Match {
    /// 各 token 表层拼接后的文本。
    pub fn text(&self) -> String {
        self.poem.iter().map(|t| t.surface.as_str()).collect()
    }

    /// 按接受顺序把 `poem` 重新切回五句。
    ///
    /// 零拍 token 跟在哪一句后面取决于它被接受的时机：句首的零拍 token 归入新句。
    pub fn segments(&self) -> Vec<&[Token]> {
        let mut out = Vec::with_capacity(SEGMENT_MORAE.len());
        let mut start = 0;
        let mut sum = 0;
        for (i, token) in self.poem.iter().enumerate() {
            sum += token.mora_count;
            if out.len() < SEGMENT_MORAE.len() && sum == SEGMENT_MORAE[out.len()] {
                out.push(&self.poem[start..=i]);
                start = i + 1;
                sum = 0;
            }
        }
        out
    }
}
