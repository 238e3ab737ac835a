//! WFQ 调度器命令行入口
//!
//! 从 stdin（或 `--trace` 指定的文件）读取到达轨迹，向 stdout 输出
//! 传输调度；诊断与统计走 stderr / JSON 文件。

use clap::Parser;
use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use wfq_rs::{Scheduler, TraceError};

#[derive(Debug, Parser)]
#[command(
    name = "wfq",
    about = "Weighted Fair Queueing schedule from an arrival trace"
)]
struct Args {
    /// 到达轨迹文件；省略则读取 stdin
    #[arg(long)]
    trace: Option<PathBuf>,

    /// 结束后在 stderr 打印每条连接的服务统计
    #[arg(long, default_value_t = false)]
    stats: bool,

    /// 结束后把每条连接的服务统计写成 JSON 文件
    #[arg(long)]
    stats_json: Option<PathBuf>,
}

fn run<R: BufRead>(input: R, out: &mut impl Write, args: &Args) -> Result<(), TraceError> {
    let mut sched = Scheduler::new(input);
    sched.run_to_completion(out)?;
    out.flush()?;

    let stats = sched.channel_stats();
    if args.stats {
        for s in &stats {
            eprintln!(
                "channel_stats conn={:?} index={} weight={:.2} pkts={} bytes={}",
                s.conn, s.index, s.weight, s.served_pkts, s.served_bytes
            );
        }
    }
    if let Some(path) = &args.stats_json {
        let json = serde_json::to_string_pretty(&stats).expect("serialize channel stats");
        fs::write(path, json)?;
        eprintln!("wrote channel stats to {}", path.display());
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = match &args.trace {
        Some(path) => match fs::File::open(path) {
            Ok(file) => run(BufReader::new(file), &mut out, &args),
            Err(err) => {
                eprintln!("open {}: {err}", path.display());
                process::exit(2);
            }
        },
        None => run(io::stdin().lock(), &mut out, &args),
    };

    if let Err(err) = result {
        // 出错前已发射的行仍要落到 stdout，再带着诊断退出。
        let _ = out.flush();
        eprintln!("{err}");
        process::exit(2);
    }
}
