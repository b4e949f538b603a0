use catalog_rotate::core::audit;
use catalog_rotate::utils::{logger, validation::Validate};
use catalog_rotate::{
    CatalogClient, CliConfig, ConfigStore, PasswordGenerator, PostgresAdmin, RotationEngine,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.log_json);

    tracing::info!("catalog-rotate starting, config file: {}", cli.config);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut store = match ConfigStore::from_file(&cli.config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to load config file {}: {}", cli.config, e);
            eprintln!("❌ Cannot read config file {}: {}", cli.config, e);
            std::process::exit(2);
        }
    };

    if let Err(e) = store.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(2);
    }

    let catalog = match CatalogClient::new(&store.main.catalog_server_url, store.request_timeout())
    {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to build catalog client: {}", e);
            std::process::exit(2);
        }
    };
    let database = PostgresAdmin::new(store.request_timeout());
    let generator = PasswordGenerator::new(store.password_length());
    let managed_type = store.managed_source_type().to_string();

    let engine = RotationEngine::new(catalog, database, generator, managed_type);
    let result = engine.run(&mut store).await;

    if let Ok(summary) = &result {
        if let Some(path) = store.audit_log_path() {
            if let Err(e) = audit::append_run(path, summary) {
                tracing::warn!("Could not append audit trail to {}: {}", path, e);
            }
        }
    }

    // 不管 run 的結果如何，記憶體中的設定都要寫回磁碟一次
    if let Err(e) = store.save(&cli.config) {
        tracing::error!("Failed to write config file {}: {}", cli.config, e);
        std::process::exit(2);
    }

    match result {
        Ok(summary) => {
            tracing::info!(
                "Run complete: {} rotated, {} skipped, {} failed",
                summary.succeeded(),
                summary.skipped(),
                summary.failed()
            );
            if summary.failed() > 0 {
                eprintln!(
                    "❌ {} source(s) failed to rotate, see the log for details",
                    summary.failed()
                );
                std::process::exit(1);
            }
            println!(
                "✅ Rotation run complete: {} rotated, {} skipped",
                summary.succeeded(),
                summary.skipped()
            );
        }
        Err(e) => {
            tracing::error!("Run aborted: {}", e);
            eprintln!("❌ Rotation run aborted: {}", e);
            std::process::exit(2);
        }
    }
}
