use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pii_mask::{cli, config, error, logging, scanner, service, session};
use cli::{Cli, Commands, OutputFormat};
use config::Config;
use error::Result;
use pii_mask_common::{preview, validate_file, DOWNLOAD_FILE_NAME};
use service::HttpMaskingService;
use std::path::PathBuf;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Upload { file, output, format } => {
            let endpoint = config.resolve_endpoint(cli.endpoint.as_deref());
            let service = HttpMaskingService::new(endpoint);
            let output = output.unwrap_or_else(|| PathBuf::from(DOWNLOAD_FILE_NAME));

            if format == OutputFormat::Text {
                println!("🛡 pii-mask - PII検出・マスク\n");
                println!("送信先: {}", service.endpoint());
            }

            let spinner = spinner(format, "Uploading...");
            let result = session::mask_file(&service, &file, &output).await;
            spinner.finish_and_clear();
            let report = result?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => {
                    println!("✔ マスク済み画像を保存: {}", report.result.output.display());
                    println!(
                        "  {} bytes{}",
                        report.result.bytes,
                        report
                            .result
                            .detected_format
                            .as_deref()
                            .map(|f| format!(" ({})", f))
                            .unwrap_or_default()
                    );
                }
            }
        }

        Commands::Batch { folder, output, recursive, format } => {
            let endpoint = config.resolve_endpoint(cli.endpoint.as_deref());
            let service = HttpMaskingService::new(endpoint);
            let output_dir = output.unwrap_or_else(|| folder.clone());

            let total = scanner::scan_folder(&folder, recursive)?.len() as u64;
            let progress = if format == OutputFormat::Text {
                println!("🛡 pii-mask - 一括処理\n");
                println!("送信先: {}", service.endpoint());
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar
            } else {
                ProgressBar::hidden()
            };

            let summary = session::mask_folder(&service, &folder, &output_dir, recursive, |path, failure| {
                let name = path.display().to_string();
                match failure {
                    None => progress.set_message(name),
                    Some(message) => progress.println(format!("✘ {}: {}", name, message)),
                }
                progress.inc(1);
            })
            .await?;
            progress.finish_and_clear();

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Text => {
                    for report in &summary.succeeded {
                        println!("✔ {} → {}", report.source.display(), report.result.output.display());
                    }
                    println!(
                        "\n✅ 完了: 成功 {} / 失敗 {}",
                        summary.succeeded.len(),
                        summary.failed.len()
                    );
                }
            }
        }

        Commands::Check { file } => {
            let meta = scanner::file_meta(&file)?;
            validate_file(&meta)?;
            let image = scanner::LocalImage::open(&file)?;

            let preview = preview::data_uri(&image.mime_type, &image.bytes);
            println!("✔ {} ({}, {} bytes)", meta.name, meta.mime_type, meta.size);
            if let Some((mime, payload)) = preview::split_data_uri(&preview) {
                println!("  プレビュー: {} (base64 {} chars)", mime, payload.len());
            }
        }

        Commands::Config { set_endpoint, show } => {
            let mut config = config;

            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                println!("✔ エンドポイントを設定しました");
            }

            if show {
                println!("設定:");
                println!("  エンドポイント: {}", config.endpoint);
                println!("  使用中: {}", config.resolve_endpoint(cli.endpoint.as_deref()));
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn spinner(format: OutputFormat, message: &'static str) -> ProgressBar {
    if format == OutputFormat::Json {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
