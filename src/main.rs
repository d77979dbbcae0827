use anyhow::Context;
use clap::Parser;
use yt_mashup::adapters::{FfmpegProcessor, SmtpNotifier, YouTubeSearch, YtDlpFetcher};
use yt_mashup::core::MashupRequest;
use yt_mashup::utils::{logger, validation::Validate};
use yt_mashup::{CliConfig, MashupConfig, MashupEngine, MashupPipeline, WorkDir};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_json);

    tracing::info!("Starting yt-mashup");
    tracing::debug!("CLI config: {:?}", cli);

    let config = MashupConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load config file '{}'", cli.config.display()))?;

    let request = cli.to_request();

    // 驗證配置
    if let Err(e) = config.validate().and_then(|_| request.validate()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let work_dir = cli.work_dir.clone().unwrap_or_else(|| config.work_dir());

    if cli.dry_run {
        display_plan(&config, &request, &work_dir);
        return Ok(());
    }

    let notifier = match SmtpNotifier::from_config(&config.smtp) {
        Ok(notifier) => notifier,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let pipeline = MashupPipeline::new(
        YouTubeSearch::new(config.endpoint(), config.youtube.api_key.clone()),
        YtDlpFetcher::new(config.tools.yt_dlp.clone()),
        FfmpegProcessor::new(config.tools.ffmpeg.clone(), config.tools.ffprobe.clone()),
        notifier,
        request,
        WorkDir::new(work_dir),
    );

    let engine = MashupEngine::new_with_monitoring(pipeline, cli.monitor);

    match engine.run().await {
        Ok(outcome) => {
            let elapsed = outcome.finished_at - outcome.started_at;
            tracing::info!(
                "✅ Mashup completed! {} clips merged, {} of {} downloads failed, took {}s",
                outcome.merged_clips,
                outcome.downloads.failed.len(),
                outcome.downloads.attempted,
                elapsed.num_seconds()
            );
            println!(
                "✅ Mashup completed! Output file: {}",
                outcome.output_file.display()
            );
        }
        Err(e) => {
            tracing::error!("❌ Mashup failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}

fn display_plan(config: &MashupConfig, request: &MashupRequest, work_dir: &std::path::Path) {
    let query = request.search_query();

    println!("🔍 Dry Run Plan:");
    println!("  Search: \"{}\" (max {} videos)", query.text, query.max_results);
    println!("  Endpoint: {}", config.endpoint());
    println!("  Clip length: {}s", request.clip_seconds);
    println!("  Working directory: {}", work_dir.display());
    println!("  Output: {}", request.output_file.display());
    println!(
        "  Notify: {} via {}:{} (from {})",
        request.recipient,
        config.smtp.host,
        config.smtp.port(),
        config.smtp.from
    );
    println!(
        "  Tools: {}, {}, {}",
        config.tools.yt_dlp, config.tools.ffmpeg, config.tools.ffprobe
    );
    println!();
    println!("✅ Dry run complete. Nothing was downloaded or sent.");
}
