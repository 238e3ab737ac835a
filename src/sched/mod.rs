//! 调度引擎
//!
//! 此模块包含 WFQ 调度的核心组件：通道表、系统虚拟时间、就绪堆与主循环。

// 子模块声明
mod channel;
mod clock;
mod ready;
mod scheduler;
mod stats;

// 重新导出公共接口
pub use channel::{Channel, ChannelId, ChannelTable, QueuedPacket};
pub use clock::VirtClock;
pub use ready::{ReadyEntry, ReadyQueue};
pub use scheduler::Scheduler;
pub use stats::ChannelStats;
