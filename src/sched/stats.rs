//! 统计信息
//!
//! 定义每条连接的服务统计（运行结束后导出为摘要行或 JSON）。

use serde::{Deserialize, Serialize};

/// 每条连接的服务统计信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStats {
    /// 连接键（"src-addr src-port dst-addr dst-port"）
    pub conn: String,
    /// 通道下标（首次出现顺序）
    pub index: usize,
    /// 运行结束时的权重
    pub weight: f64,
    pub served_pkts: u64,
    pub served_bytes: u64,
    /// 首个包开始发送的 τ；一个包都没发过则为 None
    pub first_tx: Option<u64>,
    pub last_tx: Option<u64>,
}
