//! 轨迹读取器
//!
//! 从任意 `BufRead` 逐行读取到达，持有至多一条的前瞻（look-ahead）。

use std::io::BufRead;

use thiserror::Error;

use super::arrival::Arrival;

/// 读取/解析轨迹时可能发生的错误。均为致命错误：不重试、不跳过。
#[derive(Debug, Error)]
pub enum TraceError {
    /// 输入行不是 6 或 7 个期望形状的 token。
    #[error("bad input line {line_no}: {line:?}")]
    MalformedLine { line_no: u64, line: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// 到达轨迹读取器。
///
/// `peek` 补满前瞻槽位而不消费，`take` 取走它；尚未消费的前瞻在两次
/// 调用之间保留（至多一条到达的 push-back）。
pub struct TraceReader<R> {
    input: R,
    lookahead: Option<Arrival>,
    line_no: u64,
    buf: String,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(input: R) -> Self {
        TraceReader {
            input,
            lookahead: None,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// 窥视下一条到达而不消费。EOF 返回 `Ok(None)`。
    pub fn peek(&mut self) -> Result<Option<&Arrival>, TraceError> {
        if self.lookahead.is_none() {
            self.lookahead = self.read_arrival()?;
        }
        Ok(self.lookahead.as_ref())
    }

    /// 取走前瞻槽位中的到达（若有）。只在 `peek` 之后调用才有意义。
    pub fn take(&mut self) -> Option<Arrival> {
        self.lookahead.take()
    }

    fn read_arrival(&mut self) -> Result<Option<Arrival>, TraceError> {
        self.buf.clear();
        if self.input.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no = self.line_no.saturating_add(1);
        let line = self.buf.trim_end_matches(['\r', '\n']);
        match Arrival::parse(line) {
            Some(a) => Ok(Some(a)),
            None => Err(TraceError::MalformedLine {
                line_no: self.line_no,
                line: line.to_string(),
            }),
        }
    }
}
