use anyhow::Context;
use clap::Parser;
use decl_scan::utils::{logger, validation::Validate};
use decl_scan::{LocalStorage, ScanEngine, ScanPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-scan")]
#[command(about = "Declaration scanner driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "scan-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON (for machine consumption)
    #[arg(long)]
    log_json: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be scanned without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based declaration scanner");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(3);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual scanning will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    if monitor_enabled {
        tracing::info!("🔍 Resource monitoring enabled");
    }

    // 創建存儲和掃描管道
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = ScanPipeline::new(storage, config);

    // 創建掃描引擎並運行
    let engine = ScanEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Scan completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Scan failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                decl_scan::utils::error::ErrorSeverity::Low => 0, // 警告，但成功
                decl_scan::utils::error::ErrorSeverity::Medium => 2, // 重試錯誤
                decl_scan::utils::error::ErrorSeverity::High => 1, // 處理錯誤
                decl_scan::utils::error::ErrorSeverity::Critical => 3, // 系統錯誤
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    use decl_scan::core::ConfigProvider;

    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );

    if config.is_remote() {
        println!(
            "  Source: {} (remote)",
            config.source.endpoint.as_deref().unwrap_or("-")
        );
    } else {
        println!("  Source: {} file(s)", config.source_paths().len());
    }

    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if let Some(filter) = config.name_filter() {
        println!("  Name filter: {}", filter);
    }

    if !config.kind_filter().is_empty() {
        println!("  Kinds: {}", config.kind_filter().join(", "));
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    use decl_scan::core::ConfigProvider;

    println!("🔍 Dry Run Analysis:");
    println!();

    // 來源分析
    println!("📡 Source Analysis:");
    if config.is_remote() {
        println!(
            "  Endpoint: {}",
            config.source.endpoint.as_deref().unwrap_or("-")
        );
    } else {
        for path in config.source_paths() {
            match std::fs::metadata(path) {
                Ok(meta) => println!("  {} ({} bytes)", path, meta.len()),
                Err(_) => println!("  {} (⚠️ not found)", path),
            }
        }
    }

    // 掃描設定分析
    println!();
    println!("⚙️ Scan Settings:");
    match config.name_filter() {
        Some(filter) => println!("  Name filter: {}", filter),
        None => println!("  Name filter: none (all entities reported)"),
    }
    if config.kind_filter().is_empty() {
        println!("  Kinds: function, function_template, method");
    } else {
        println!("  Kinds: {}", config.kind_filter().join(", "));
    }

    // 輸出分析
    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if let Some(archive) = config.archive_name() {
        println!("  Compression: {} (ZIP)", archive);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
