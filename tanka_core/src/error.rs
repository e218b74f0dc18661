use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// core 层的错误。规则不成立不是错误（只是 `false`），这里只有输入本身坏掉的情况。
#[derive(Debug, Error)]
pub enum Error {
    /// 素性字符串字段数不对（常规节点必须正好 9 个）。
    #[error("素性字段数错误：期望 9 个，实际 {found} 个（{feature}）")]
    FeatureParse { feature: String, found: usize },

    /// 形态素解析器调用失败；只影响当前行。
    #[error("形态素解析失败：{0}")]
    AnalyzerFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// 包装任意解析器错误。
    pub fn analyzer<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::AnalyzerFailure(err.into())
    }
}
