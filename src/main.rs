use antiscam_blocklist::utils::{logger, validation::Validate};
use antiscam_blocklist::{BlocklistPipeline, CliConfig, EtlEngine};
use clap::Parser;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting antiscam-blocklist");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config.redacted());
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    let result = match BlocklistPipeline::from_config(&config) {
        Ok(pipeline) => EtlEngine::new(pipeline).run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => {
            for file in &summary.files {
                println!("📁 {} ({} entries)", file.path, file.entries);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Blocklist run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.severity().exit_code());
        }
    }
}
