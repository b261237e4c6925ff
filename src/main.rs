// ==========================================
// 配送/库存管理系统 - 命令行入口
// ==========================================
// 子命令: preview (预览, 不落库) / import (提交导入)
// 输出: 预览/报告以 JSON 打印到 stdout, 日志写 stderr
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use delivery_import::db::default_db_path;
use delivery_import::importer::ProgressCallback;
use delivery_import::{logging, EntityKind, ImportApi};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "delivery-import")]
#[command(about = "Bulk import of work hours, materials and documents from CSV/Excel files")]
#[command(version)]
struct Cli {
    /// SQLite database path (default: user data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and validate the first rows without writing anything
    Preview {
        /// Source file (.csv, .xlsx, .xls)
        file: PathBuf,

        /// Target entity kind
        #[arg(short, long)]
        kind: EntityKind,

        /// Worksheet name (spreadsheets only)
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Import every row of a file
    Import {
        /// Source file (.csv, .xlsx, .xls)
        file: PathBuf,

        /// Target entity kind
        #[arg(short, long)]
        kind: EntityKind,

        /// Worksheet name (spreadsheets only)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Print row progress to stderr
        #[arg(long)]
        progress: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.json_logs);

    let db_path = cli.db.unwrap_or_else(default_db_path);
    info!(version = delivery_import::VERSION, db = %db_path.display(), "启动导入工具");

    let db_path = db_path
        .to_str()
        .context("database path is not valid UTF-8")?
        .to_string();
    let api = ImportApi::new(&db_path)
        .await
        .with_context(|| format!("failed to open database {}", db_path))?;

    match cli.command {
        Commands::Preview { file, kind, sheet } => {
            let preview = api
                .preview_import(&path_str(&file)?, kind.as_str(), sheet.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        Commands::Import {
            file,
            kind,
            sheet,
            progress,
        } => {
            let on_progress: Option<ProgressCallback> = if progress {
                Some(Arc::new(|done: usize, total: usize| {
                    eprint!("\rprocessed {}/{}", done, total);
                    if done == total {
                        eprintln!();
                    }
                }))
            } else {
                None
            };

            let response = api
                .import(&path_str(&file)?, kind.as_str(), sheet.as_deref(), on_progress)
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn path_str(path: &std::path::Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .with_context(|| format!("path is not valid UTF-8: {}", path.display()))
}
