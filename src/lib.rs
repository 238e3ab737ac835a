pub mod sched;
pub mod trace;

// 导出常用类型，供 bin 文件与集成测试使用
pub use sched::{ChannelStats, Scheduler};
pub use trace::{Arrival, ConnKey, TraceError, TraceReader};

#[cfg(test)]
mod test;
