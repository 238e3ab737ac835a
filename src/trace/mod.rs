//! 输入边界（trace boundary）
//!
//! 此模块包含到达轨迹的解析与读取：到达记录、连接键、带单条前瞻的读取器。

// 子模块声明
mod arrival;
mod reader;

// 重新导出公共接口
pub use arrival::{Arrival, ConnKey, MAX_TOKEN_LEN};
pub use reader::{TraceError, TraceReader};
