use clap::Parser;

/// Prompt Optimizer - 调用大模型改写 prompt 并保存历史记录
#[derive(Parser, Debug)]
#[command(name = "prompt-optimizer", version, about)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<String>,

    /// SQLite 数据库路径（覆盖配置文件中的 databasePath）
    #[arg(long)]
    pub database: Option<String>,
}
