use clap::Parser;
use popuviz::config::cli::LogFormat;
use popuviz::domain::ports::InsightProvider;
use popuviz::utils::error::ErrorSeverity;
use popuviz::utils::{logger, validation::Validate};
use popuviz::{
    CliConfig, Explorer, FallbackInsightProvider, GeminiInsightClient, LocalStorage,
    StaticInsightProvider, TomlConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting popuviz");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.validate().and_then(|_| cli.resolve()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let settings = config.explorer_settings()?;
    let storage = LocalStorage::new(config.output.path.clone());
    let insight: Box<dyn InsightProvider> = if config.insight.enabled {
        Box::new(FallbackInsightProvider::new(GeminiInsightClient::new(
            config.gemini_settings(),
        )?))
    } else {
        tracing::info!("Offline mode: using the static insight");
        Box::new(StaticInsightProvider)
    };

    let explorer = Explorer::new(storage, insight, settings);
    let (year, archetype) = (config.explorer.year, config.explorer.archetype);

    match explorer.run(year, archetype).await {
        Ok(run) => {
            let summary = &run.report.summary;
            let insight = run.report.insight.insight();
            println!("{} • {}", run.report.archetype_label, run.report.year);
            println!(
                "Youth (0-14): {:.1}M | Working Age (15-64): {:.1}M | Elderly (65+): {:.1}M",
                summary.youth, summary.working_age, summary.elderly
            );
            println!();
            println!("{}", insight.title);
            println!("{}", insight.content);
            for stat in &insight.key_stats {
                println!("  • {}", stat);
            }
            println!();
            for path in &run.written {
                println!("📁 {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn print_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run");
    println!("  Year: {}", config.explorer.year);
    println!("  Archetype: {}", config.explorer.archetype);
    println!(
        "  Chart: {}x{} (half width {:.1})",
        config.chart.width,
        config.chart.height,
        config.chart.half_width()
    );
    println!(
        "  Scale ceilings: developed {}M, developing {}M",
        config.scale.developed, config.scale.developing
    );
    if config.insight.enabled {
        println!(
            "  Insight: {} ({}), API key {}",
            config.insight.endpoint,
            config.insight.model,
            if config.api_key().is_some() { "set" } else { "missing, fallback will be used" }
        );
    } else {
        println!("  Insight: static fallback");
    }
    println!("  Output: {} [{}]", config.output.path, config.output.formats.join(", "));
    if config.output.compression.enabled {
        println!("  Compression: {}", config.output.compression.filename);
    }
}
