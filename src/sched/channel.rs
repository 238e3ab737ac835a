//! 通道（per-flow）状态与通道表
//!
//! 每条连接对应一个通道：权重、待发 FIFO、最近一次打标的完成标签。
//! 通道本体存放在可增长的 arena 里，键映射只保存整数下标，
//! 堆里携带同一下标，插入新通道不会使既有句柄失效。

use std::collections::{HashMap, VecDeque};

use crate::trace::ConnKey;

/// 通道标识符：按首次出现顺序分配（0, 1, 2, …），之后不变、不复用。
/// 同时充当完成标签相等时的决胜键。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub usize);

/// 排队中的数据包。完成标签在入队打标后不再变化。
#[derive(Debug, Clone)]
pub struct QueuedPacket {
    pub arrived: u64,
    pub length: u64,
    /// 输入行里显式给出的权重字面值；决定输出行是否带权重后缀。
    pub explicit_weight: Option<f64>,
    pub finish: f64,
}

/// 每条连接的调度状态。
#[derive(Debug)]
pub struct Channel {
    pub id: ChannelId,
    pub conn: ConnKey,
    /// 当前权重；默认 1.0，遇到显式权重的到达即更新。
    pub weight: f64,
    /// 本通道最近一次打标的完成标签；队列清空后仍保留。
    pub last_finish: f64,
    pub q: VecDeque<QueuedPacket>,
    pub served_pkts: u64,
    pub served_bytes: u64,
    pub first_tx: Option<u64>,
    pub last_tx: Option<u64>,
}

impl Channel {
    fn new(id: ChannelId, conn: ConnKey) -> Self {
        Channel {
            id,
            conn,
            weight: 1.0,
            last_finish: 0.0,
            q: VecDeque::new(),
            served_pkts: 0,
            served_bytes: 0,
            first_tx: None,
            last_tx: None,
        }
    }

    /// 记录一次发送（用于结束后的统计导出）。
    pub(crate) fn note_served(&mut self, at: u64, pkt: &QueuedPacket) {
        self.served_pkts = self.served_pkts.saturating_add(1);
        self.served_bytes = self.served_bytes.saturating_add(pkt.length);
        if self.first_tx.is_none() {
            self.first_tx = Some(at);
        }
        self.last_tx = Some(at);
    }
}

/// 连接键 → 通道 的映射表。
#[derive(Debug, Default)]
pub struct ChannelTable {
    index: HashMap<ConnKey, ChannelId>,
    arena: Vec<Channel>,
}

impl ChannelTable {
    /// 查找连接对应的通道；不存在则创建（index = 计数器自增，权重 1.0，
    /// 空队列，last_finish = 0）。
    pub fn lookup_or_create(&mut self, conn: &ConnKey) -> ChannelId {
        if let Some(id) = self.index.get(conn) {
            return *id;
        }
        let id = ChannelId(self.arena.len());
        self.index.insert(conn.clone(), id);
        self.arena.push(Channel::new(id, conn.clone()));
        id
    }

    pub fn get(&self, id: ChannelId) -> &Channel {
        &self.arena[id.0]
    }

    pub fn get_mut(&mut self, id: ChannelId) -> &mut Channel {
        &mut self.arena[id.0]
    }

    /// 按通道下标顺序迭代（即首次出现顺序）。
    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.arena.iter()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
