use clap::Parser;
use std::sync::atomic::Ordering;
use table_search::core::similarity::format_percent;
use table_search::domain::model::SearchReport;
use table_search::utils::{logger, validation::Validate};
use table_search::{
    CliConfig, FileLoader, HomophoneMap, LocalStorage, SearchEngine, SearchSettings,
    TableSearchPipeline, TableSearcher, TomlConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 合併設定：預設值 → TOML → 命令列
    let mut settings = SearchSettings::default();
    if let Some(path) = &cli.config {
        match TomlConfig::from_file(path) {
            Ok(toml) => settings.apply_toml(toml),
            Err(e) => {
                eprintln!("❌ Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }
    cli.apply_to(&mut settings);

    // 初始化日誌
    logger::init_cli_logger(settings.verbose, settings.log_file.as_deref());

    tracing::info!("Starting TableSearchSystem");
    if settings.verbose {
        tracing::debug!("Settings: {:?}", settings);
    }

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code().max(1));
    }

    let monitor_enabled = settings.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let homophones = HomophoneMap::load(&settings.homophones_path);
    if homophones.is_empty() {
        tracing::warn!("Homophone table is empty, homophone variants are disabled");
    }
    let searcher = TableSearcher::new(FileLoader::new(settings.column_aliases.clone()), homophones);

    // 創建存儲和管道
    let limit = settings.limit;
    let storage = LocalStorage::new(settings.output_path.clone());
    let show_progress = settings.show_progress;
    let pipeline = TableSearchPipeline::new(storage, settings, searcher).with_progress(show_progress);

    // Ctrl+C 停止後續檔案，已完成的結果照常輸出
    let stop = pipeline.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("⏹ Stop requested, finishing files in progress");
            stop.store(true, Ordering::SeqCst);
        }
    });

    let engine = SearchEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(outcome) => {
            print_report(&outcome.report, limit);
            println!("📁 {}", outcome.exported);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Search failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn print_report(report: &SearchReport, limit: usize) {
    if report.hits.is_empty() {
        println!("No matches for '{}'", report.keyword);
        return;
    }

    println!(
        "✅ {} matches for '{}' ({} files searched, {} failed)",
        report.hits.len(),
        report.keyword,
        report.files_scanned,
        report.files_failed
    );
    if report.cancelled {
        println!("⚠️ Search was stopped early; results are partial");
    }

    for hit in report.hits.iter().take(limit) {
        let location = match &hit.sheet {
            Some(sheet) => format!("{} [{}] row {}", hit.file, sheet, hit.row),
            None => format!("{} row {}", hit.file, hit.row),
        };
        let field = hit
            .field
            .as_deref()
            .map(|f| format!(" ({})", f))
            .unwrap_or_default();

        println!(
            "{:>5}  {}  via '{}'{}",
            format_percent(hit.similarity),
            location,
            hit.pattern,
            field
        );
        println!("       {}", hit.display_content());
    }

    if report.hits.len() > limit {
        println!("… {} more not shown", report.hits.len() - limit);
    }
}
