use antiscam_blocklist::core::ConfigProvider;
use antiscam_blocklist::utils::{logger, validation::Validate};
use antiscam_blocklist::{BlocklistPipeline, EtlEngine, SourceMode, TomlConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-blocklist")]
#[command(about = "Blocklist scraper driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "blocklist.toml")]
    config: String,

    /// Enable verbose output (overrides [logging].verbose)
    #[arg(short, long)]
    verbose: bool,

    /// Dry run - show what would be fetched and written without doing it
    #[arg(long)]
    dry_run: bool,
}

fn print_plan(config: &TomlConfig) {
    println!("🔍 Dry run - nothing will be fetched or written");
    println!("  Source mode:  {}", config.source_mode());
    println!("  Source URL:   {}", config.source_url());
    if config.source_mode() == SourceMode::WixData {
        println!("  API endpoint: {}", config.api_endpoint());
        println!("  Collection:   {}", config.collection());
        println!("  Page limit:   {}", config.page_limit());
    } else {
        println!("  Selector:     {}", config.selector());
    }
    println!("  Output path:  {}", config.output_path());
    for output in config.outputs() {
        println!(
            "    - {} ({} / {})",
            output.filename, output.category, output.format
        );
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(args.verbose || config.verbose(), config.json_logs());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.severity().exit_code());
    }

    if args.dry_run {
        print_plan(&config);
        return;
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
            tracing::error!("❌ Blocklist run failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    }
}
