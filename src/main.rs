use clap::Parser;
use dose_flow::utils::{logger, validation::Validate};
use dose_flow::{
    CliConfig, DoseEngine, DoseFileReporter, JsonReporter, LocalStorage, OutputFormat,
    TableReporter,
};

fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting dose-flow");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    let mut engine = DoseEngine::new(config.parameter_source());

    // The dose file is written before anything is printed
    if !config.no_save {
        let storage = LocalStorage::new(config.output_dir.clone());
        engine = engine.with_reporter(DoseFileReporter::new(storage, config.output_file.clone()));
    }

    engine = match config.format {
        OutputFormat::Table => engine.with_reporter(TableReporter::new(std::io::stdout())),
        OutputFormat::Json => engine.with_reporter(JsonReporter::new(std::io::stdout())),
    };

    match engine.run() {
        Ok(report) => {
            tracing::info!(
                "Finished {} dose(s), {} above the volume limit",
                report.rows.len(),
                report.summary.over_limit
            );
        }
        Err(e) => {
            tracing::error!(
                "Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
