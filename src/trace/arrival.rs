//! 到达记录
//!
//! 定义轨迹中的一条到达（packet arrival）及其连接键。

use std::fmt;

/// 地址/端口 token 的最大长度（超出即视为非法行）。
pub const MAX_TOKEN_LEN: usize = 31;

/// 连接四元组（src-addr src-port dst-addr dst-port）。
///
/// 以单空格拼接、保持输入顺序的字符串形式存放；字典序相等即同一连接。
/// token 本身视为不透明，不做地址语法校验。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnKey(String);

impl ConnKey {
    pub fn new(src_addr: &str, src_port: &str, dst_addr: &str, dst_port: &str) -> Self {
        ConnKey(format!("{src_addr} {src_port} {dst_addr} {dst_port}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 一条到达：时刻 T、连接键、长度 L、可选的显式权重 W。
///
/// 由解析器产生、批量读取器消费；显式权重除了更新通道权重外，
/// 还决定该包在输出行里是否带权重后缀。
#[derive(Debug, Clone)]
pub struct Arrival {
    pub time: u64,
    pub conn: ConnKey,
    pub length: u64,
    pub weight: Option<f64>,
}

impl Arrival {
    /// 解析一行轨迹：`<T> <src-addr> <src-port> <dst-addr> <dst-port> <L> [<W>]`。
    ///
    /// 6 或 7 个空白分隔的 token；其余任何形状（token 数不对、数字解析失败、
    /// 空行、超长 token）都返回 `None`，由调用方升级为致命错误。
    pub fn parse(line: &str) -> Option<Arrival> {
        let toks: Vec<&str> = line.split_whitespace().collect();
        if toks.len() != 6 && toks.len() != 7 {
            return None;
        }
        if toks[1..5].iter().any(|t| t.len() > MAX_TOKEN_LEN) {
            return None;
        }
        let time = toks[0].parse().ok()?;
        let length = toks[5].parse().ok()?;
        let weight = match toks.get(6) {
            Some(w) => Some(w.parse().ok()?),
            None => None,
        };
        Some(Arrival {
            time,
            conn: ConnKey::new(toks[1], toks[2], toks[3], toks[4]),
            length,
            weight,
        })
    }
}
