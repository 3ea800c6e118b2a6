use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use meditrend::{cli, config, error, logging, render, scanner, submission, validator};
use meditrend::{CandidateFile, Message, OperatingMode, Orchestrator, ViewState};
use cli::{Cli, Commands};
use config::Config;
use error::{MediTrendError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use submission::HttpAnalysisClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { file, output, json } => {
            let client = build_client(&config, cli.api_url.as_deref())?;
            let candidates = vec![scanner::load_candidate(&file)?];

            if !json {
                println!("📄 meditrend - レポート解析\n");
            }
            submit(client, OperatingMode::Single, candidates, output, json).await?;
        }

        Commands::Trends { files, folder, output, json } => {
            let client = build_client(&config, cli.api_url.as_deref())?;
            let candidates = match folder {
                Some(folder) => {
                    let found = scanner::scan_folder(&folder)?;
                    if found.is_empty() {
                        return Err(MediTrendError::NoDocumentsFound(
                            folder.display().to_string(),
                        ));
                    }
                    found
                }
                None => scanner::load_candidates(&files)?,
            };

            if !json {
                println!("📈 meditrend - トレンド比較\n");
            }
            submit(client, OperatingMode::Trend, candidates, output, json).await?;
        }

        Commands::Check { files } => {
            check(&files)?;
        }

        Commands::Config { set_api_url, set_timeout, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                changed = true;
                println!("✔ 解析サービスURLを設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                changed = true;
                println!("✔ タイムアウトを設定しました");
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                let client = build_client(&config, cli.api_url.as_deref())?;
                let reachable = client.health().await;

                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  解析サービスURL: {}", config.api_url);
                println!("  使用中のURL: {}", client.base_url());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  接続: {}", if reachable { "OK" } else { "応答なし" });
            }
        }
    }

    Ok(())
}

/// `--api-url` > 環境変数 > 設定ファイル の順でURLを決める
fn build_client(config: &Config, api_url: Option<&str>) -> Result<HttpAnalysisClient> {
    match api_url {
        Some(url) => HttpAnalysisClient::new(url, config.timeout()),
        None => HttpAnalysisClient::from_config(config),
    }
}

async fn submit(
    client: HttpAnalysisClient,
    mode: OperatingMode,
    candidates: Vec<CandidateFile>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut orchestrator = Orchestrator::new(client);

    orchestrator.dispatch(Message::SetMode(mode));
    orchestrator.dispatch(Message::AddFiles(candidates));

    if orchestrator.view().error().is_some() {
        eprintln!("{}", render::render_view(orchestrator.view()));
    }

    let pending = orchestrator.session().pending();
    tracing::debug!(
        %mode,
        files = pending.len(),
        bytes = pending.total_size(),
        url = orchestrator.backend().base_url(),
        "staged files ready"
    );

    let spinner = if json {
        ProgressBar::hidden()
    } else {
        spinner(&format!("{}件のレポートを解析中...", pending.len()))
    };
    let view = orchestrator.submit().await.clone();
    spinner.finish_and_clear();

    match view {
        ViewState::Committed { ref result } => {
            if let Some(path) = &output {
                write_json(path, result)?;
                if !json {
                    println!("✔ 結果を保存: {}", path.display());
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(result)?);
            } else {
                println!("{}", render::render_view(&view));
            }
            Ok(())
        }
        ViewState::Failed { message } => Err(MediTrendError::Analysis(message)),
        ViewState::Idle { error } => Err(MediTrendError::NotSubmitted(
            error.unwrap_or_else(|| "no file selected".to_string()),
        )),
        ViewState::Submitting { .. } => Err(MediTrendError::Analysis(
            "submission did not complete".to_string(),
        )),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn write_json(path: &Path, result: &meditrend_common::SubmissionResult) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(result)?)?;
    Ok(())
}

fn check(files: &[PathBuf]) -> Result<()> {
    let mut rejected = 0;

    for candidate in scanner::load_candidates(files)? {
        match validator::validate(&candidate) {
            validator::Verdict::Accepted(media) => {
                println!("✔ {} ({}, {} bytes)", candidate.name, media, candidate.size);
            }
            validator::Verdict::Rejected(reason) => {
                rejected += 1;
                let rejection = validator::FileRejection {
                    file_name: candidate.name,
                    reason,
                };
                println!("✖ {}", rejection);
            }
        }
    }

    if rejected > 0 {
        return Err(MediTrendError::NotSubmitted(format!(
            "{} file(s) rejected",
            rejected
        )));
    }
    Ok(())
}
