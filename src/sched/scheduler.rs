//! 调度主循环
//!
//! 在到达与发送之间交替的事件驱动循环：空闲快进、按 (F, I) 选包、
//! 推进虚拟时间、发射输出行、吸收发送期间的新到达。

use std::fmt;
use std::io::{BufRead, Write};

use tracing::{debug, info, trace};

use crate::trace::{Arrival, ConnKey, TraceError, TraceReader};

use super::channel::{ChannelTable, QueuedPacket};
use super::clock::VirtClock;
use super::ready::{ReadyEntry, ReadyQueue};
use super::stats::ChannelStats;

/// 一行调度输出：`τ: T conn L [W]`，权重后缀仅在输入显式给出时出现。
struct TxLine<'a> {
    at: u64,
    conn: &'a ConnKey,
    pkt: &'a QueuedPacket,
}

impl fmt::Display for TxLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} {}",
            self.at, self.pkt.arrived, self.conn, self.pkt.length
        )?;
        if let Some(w) = self.pkt.explicit_weight {
            write!(f, " {w:.2}")?;
        }
        Ok(())
    }
}

/// WFQ 调度器：独占持有读取器、通道表、就绪堆与两个时钟。
///
/// 模拟时刻 τ 只用于回显发送时间戳；虚拟时间 V 驱动公平性。
pub struct Scheduler<R> {
    reader: TraceReader<R>,
    channels: ChannelTable,
    ready: ReadyQueue,
    clock: VirtClock,
    now: u64,
}

impl<R: BufRead> Scheduler<R> {
    pub fn new(input: R) -> Self {
        Scheduler {
            reader: TraceReader::new(input),
            channels: ChannelTable::default(),
            ready: ReadyQueue::default(),
            clock: VirtClock::default(),
            now: 0,
        }
    }

    /// 当前模拟时刻 τ
    pub fn now(&self) -> u64 {
        self.now
    }

    /// 当前系统虚拟时间 V
    pub fn virtual_now(&self) -> f64 {
        self.clock.now()
    }

    /// 运行到输入耗尽、所有通道清空为止，把调度写入 `out`。
    #[tracing::instrument(skip(self, out))]
    pub fn run_to_completion<W: Write>(&mut self, out: &mut W) -> Result<(), TraceError> {
        info!("▶️  开始生成调度");
        let mut emitted = 0u64;

        loop {
            // 空闲快进：堆空则读下一批；没有更多输入就结束。
            // 空闲时间不计入任何通道。
            if self.ready.is_empty() {
                let Some(t0) = self.reader.peek()?.map(|a| a.time) else {
                    break;
                };
                self.read_batch()?;
                debug!(from = self.now, to = t0, "空闲快进");
                self.now = t0;
            }

            let entry = self.ready.pop().expect("ready queue non-empty");
            self.clock.advance_to(entry.finish);

            let ch = self.channels.get_mut(entry.chan);
            let pkt = ch.q.pop_front().expect("ready channel has a head packet");
            writeln!(
                out,
                "{}",
                TxLine {
                    at: self.now,
                    conn: &ch.conn,
                    pkt: &pkt,
                }
            )?;
            ch.note_served(self.now, &pkt);
            emitted = emitted.saturating_add(1);
            debug!(
                at = self.now,
                chan = entry.chan.0,
                finish = entry.finish,
                len = pkt.length,
                "发送"
            );

            // 计入服务时间，再为该通道补一个堆条目（若还有待发包）。
            self.now = self.now.saturating_add(pkt.length);
            if let Some(head) = ch.q.front() {
                let refill = ReadyEntry {
                    finish: head.finish,
                    chan: entry.chan,
                };
                self.ready.push(refill);
            }

            // 吸收发送期间（T ≤ τ）落入的所有到达；更晚的留在前瞻槽。
            self.read_all_up_to(self.now)?;
        }

        info!(total_pkts = emitted, final_time = self.now, "✅ 调度完成");
        Ok(())
    }

    /// 消费到达时间不超过 `t_max` 的最早一批同时到达。
    ///
    /// 消费第一条后把界收缩到它的 T，因此单次调用不会跨过批边界。
    /// 返回消费的条数（可能为 0）。
    fn read_until(&mut self, t_max: u64) -> Result<usize, TraceError> {
        let mut bound = t_max;
        let mut consumed = 0usize;
        loop {
            let Some(t) = self.reader.peek()?.map(|a| a.time) else {
                break;
            };
            if t > bound {
                break;
            }
            bound = bound.min(t);
            let arrival = self.reader.take().expect("peeked arrival");
            self.absorb(arrival);
            consumed += 1;
        }
        Ok(consumed)
    }

    /// 读取最早未消费时刻的一整批同时到达。
    fn read_batch(&mut self) -> Result<usize, TraceError> {
        self.read_until(u64::MAX)
    }

    /// 反复调用 `read_until` 直到不再有 T ≤ `t_max` 的到达，跨批吸收。
    fn read_all_up_to(&mut self, t_max: u64) -> Result<usize, TraceError> {
        let mut total = 0usize;
        loop {
            let n = self.read_until(t_max)?;
            if n == 0 {
                break;
            }
            total += n;
        }
        Ok(total)
    }

    /// 把一条到达并入其通道：先应用显式权重，再按当前 V 打标入队；
    /// 通道由空变非空时压入就绪堆。
    fn absorb(&mut self, arrival: Arrival) {
        let id = self.channels.lookup_or_create(&arrival.conn);
        let ch = self.channels.get_mut(id);
        if let Some(w) = arrival.weight {
            ch.weight = w;
        }
        let finish = self.clock.tag(ch, arrival.length);
        let was_empty = ch.q.is_empty();
        ch.q.push_back(QueuedPacket {
            arrived: arrival.time,
            length: arrival.length,
            explicit_weight: arrival.weight,
            finish,
        });
        trace!(
            t = arrival.time,
            chan = id.0,
            len = arrival.length,
            finish,
            was_empty,
            "吸收到达"
        );
        if was_empty {
            self.ready.push(ReadyEntry { finish, chan: id });
        }
    }

    /// 每条连接的服务统计，按通道下标（首次出现顺序）排列。
    pub fn channel_stats(&self) -> Vec<ChannelStats> {
        self.channels
            .iter()
            .map(|ch| ChannelStats {
                conn: ch.conn.as_str().to_string(),
                index: ch.id.0,
                weight: ch.weight,
                served_pkts: ch.served_pkts,
                served_bytes: ch.served_bytes,
                first_tx: ch.first_tx,
                last_tx: ch.last_tx,
            })
            .collect()
    }
}
