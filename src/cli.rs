use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meditrend")]
#[command(about = "医療検査レポート解析クライアント（単一解析・トレンド比較）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 解析サービスのURL（設定ファイルより優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// レポート1件を解析（単一モード）
    Analyze {
        /// レポートファイル（PDF/JPG/PNG）
        #[arg(required = true)]
        file: PathBuf,

        /// 結果JSONの保存先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 結果をJSONで標準出力へ
        #[arg(long)]
        json: bool,
    },

    /// 複数レポートを比較（トレンドモード）
    Trends {
        /// レポートファイル（選択順に送信）
        #[arg(required_unless_present = "folder")]
        files: Vec<PathBuf>,

        /// フォルダ内のレポートを名前順で使用
        #[arg(short, long, conflicts_with = "files")]
        folder: Option<PathBuf>,

        /// 結果JSONの保存先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 結果をJSONで標準出力へ
        #[arg(long)]
        json: bool,
    },

    /// 送信せずにファイルを検証
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 解析サービスURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// タイムアウト秒数を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
