//! 形态素解析器抽象：core 不关心解析器来自 MeCab/vibrato/词表。
//!
//! 约定：
//! - `analyze` 对一行文本返回有序的 `Node` 序列，可以包含行首/行尾标记
//! - `feature` 是逗号分隔的素性串，常规节点必须正好 9 个字段
//! - 解析器实例构造一次后在所有调用间复用（只读共享）；不支持重复构造
pub use crate::model::NodeStatus;
use crate::error::Result;

/// 解析器输出的原始节点。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub status: NodeStatus,
    pub surface: String,
    pub feature: String,
}

impl Node {
    pub fn new(status: NodeStatus, surface: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            status,
            surface: surface.into(),
            feature: feature.into(),
        }
    }
}

/// 纯接口：一行文本 -> 节点序列。
pub trait Analyzer: Send + Sync {
    fn analyze(&self, line: &str) -> Result<Vec<Node>>;
}

impl<A> Analyzer for Box<A>
where
    A: Analyzer + ?Sized,
{
    fn analyze(&self, line: &str) -> Result<Vec<Node>> {
        (**self).analyze(line)
    }
}

impl<A> Analyzer for &A
where
    A: Analyzer + ?Sized,
{
    fn analyze(&self, line: &str) -> Result<Vec<Node>> {
        (**self).analyze(line)
    }
}
