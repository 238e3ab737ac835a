//! 就绪堆
//!
//! 定义就绪条目（完成标签 + 通道下标）及最小完成标签优先的队列。

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::channel::ChannelId;

/// 就绪堆条目：某个非空通道的队首完成标签。
///
/// 排序是调度器的协议：完成标签小者优先，相等时通道下标小者
/// （首次出现更早）优先。每个通道至多一个条目，(F, I) 不会完全相等。
#[derive(Debug, Clone, Copy)]
pub struct ReadyEntry {
    pub finish: f64,
    pub chan: ChannelId,
}

// BinaryHeap 是 max-heap；我们需要最小完成标签优先，因此反向比较。
// f64 用 total_cmp 保证全序（输入良构时不会出现 NaN，但也不依赖这一点）。
impl Ord for ReadyEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.finish.total_cmp(&other.finish) {
            Ordering::Equal => self.chan.cmp(&other.chan),
            ord => ord,
        }
        .reverse()
    }
}

impl PartialOrd for ReadyEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ReadyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.finish.total_cmp(&other.finish) == Ordering::Equal && self.chan == other.chan
    }
}

impl Eq for ReadyEntry {}

/// 最小完成标签优先的就绪队列。
///
/// 不需要 decrease-key 或按键删除：条目只在通道由空变非空时入堆、
/// 在被选中发送时出堆。
#[derive(Debug, Default)]
pub struct ReadyQueue {
    heap: BinaryHeap<ReadyEntry>,
}

impl ReadyQueue {
    pub fn push(&mut self, entry: ReadyEntry) {
        self.heap.push(entry);
    }

    pub fn pop(&mut self) -> Option<ReadyEntry> {
        self.heap.pop()
    }

    pub fn peek(&self) -> Option<&ReadyEntry> {
        self.heap.peek()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
