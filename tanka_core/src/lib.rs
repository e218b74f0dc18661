//! `tanka_core`：短歌检出的纯逻辑层，不做任何 I/O。
//!
//! 设计目标：
//! - **核心可复用**：CLI/批处理/测试都复用同一套逻辑
//! - **分层清晰**：engine -> analyzer（形态素解析）-> normalizer -> scanner（+ rules）-> 输出（`Match`）
//! - **无共享可变状态**：按行扫描，行与行、文章与文章之间互不影响，可直接并行
pub mod analyzer;
pub mod engine;
pub mod error;
pub mod model;
pub mod mora;
pub mod normalizer;
pub mod rules;
pub mod scanner;

pub use analyzer::{Analyzer, Node, NodeStatus};
pub use engine::{ArticleScan, Engine, LineFailure};
pub use error::{Error, Result};
pub use model::{Match, PosFields, SEGMENT_MORAE, Token};
pub use rules::Position;
pub use scanner::{Matches, matches, scan};
