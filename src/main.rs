use capacity_util::core::{
    CapacitySource, ConfigProvider, ExamSource, GovernanceSource, SourceSettings, Storage,
};
use capacity_util::presentation::{console, email, ops};
use capacity_util::utils::error::ErrorSeverity;
use capacity_util::utils::{logger, validation::Validate};
use capacity_util::{
    Audience, CapacityEngine, CapacityError, CliConfig, CsvSource, HttpSource, LocalStorage,
    OpsDailyCapacityResult, ReportArchive, Result, TomlConfig,
};
use chrono::{Days, NaiveDate};
use clap::Parser;

/// Settings resolved from the CLI, optionally layered over a TOML file.
struct RunSettings {
    dos: NaiveDate,
    today: NaiveDate,
    days: usize,
    audience: Audience,
    output_path: Option<String>,
    archive: bool,
    json: bool,
    toml: Option<TomlConfig>,
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting capacity-util CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Capacity report failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
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

async fn run(config: CliConfig) -> Result<()> {
    config.validate()?;

    let toml = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let toml = TomlConfig::from_file(path)?;
            toml.validate()?;
            Some(toml)
        }
        None => None,
    };
    let provider: &dyn ConfigProvider = match &toml {
        Some(toml) => toml,
        None => &config,
    };

    let source_settings = provider.source_settings();
    let days = config.days.unwrap_or_else(|| provider.days());
    let audience = config.audience.unwrap_or_else(|| provider.audience());
    let output_path = config
        .output_path
        .clone()
        .or_else(|| provider.output_path().map(str::to_string));
    let archive = config.archive || toml.as_ref().is_some_and(|t| t.archive_enabled());

    let today = chrono::Local::now().date_naive();
    let settings = RunSettings {
        dos: config.target_dos(today)?,
        today,
        days,
        audience,
        output_path,
        archive,
        json: config.json,
        toml,
    };

    if settings.archive && settings.output_path.is_none() {
        return Err(CapacityError::MissingConfigError {
            field: "output.path (required by archive)".to_string(),
        });
    }

    match source_settings {
        SourceSettings::Csv { path } => {
            tracing::info!("📂 Reading CSV extracts from {}", path);
            let source = CsvSource::new(LocalStorage::new(path));
            report(CapacityEngine::from_source(source), &settings).await
        }
        SourceSettings::Http {
            endpoint,
            timeout_seconds,
        } => {
            tracing::info!("🌐 Reading from reporting API {}", endpoint);
            let source = HttpSource::new(&endpoint, timeout_seconds)?;
            report(CapacityEngine::from_source(source), &settings).await
        }
    }
}

async fn report<E, G, C>(engine: CapacityEngine<E, G, C>, settings: &RunSettings) -> Result<()>
where
    E: ExamSource,
    G: GovernanceSource,
    C: CapacitySource,
{
    if settings.days > 1 {
        let end = settings
            .dos
            .checked_add_days(Days::new(settings.days as u64 - 1))
            .ok_or_else(|| CapacityError::InvalidDateInput {
                message: format!("{} days after {} is out of range", settings.days, settings.dos),
            })?;
        let range = engine.run_range(settings.dos, end, settings.today).await?;

        if settings.json {
            println!("{}", serde_json::to_string_pretty(&range)?);
        } else {
            println!("{}", console::render_range_capacity(&range));
        }
        return Ok(());
    }

    let result = engine.run_daily(settings.dos, settings.today).await?;

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match settings.audience {
            Audience::Scheduling => println!("{}", console::render_daily_capacity(&result)),
            Audience::Ops => println!(
                "{}",
                ops::render_ops_capacity_text(&OpsDailyCapacityResult::from_daily(&result))
            ),
        }
    }

    if let Some(output_path) = &settings.output_path {
        let storage = LocalStorage::new(output_path.clone());
        let content = email::build_capacity_email(&result, settings.audience);
        let subject = match &settings.toml {
            Some(toml) => toml.email_subject(&content.subject),
            None => content.subject.clone(),
        };

        let file_name = format!("capacity_email_{}_{}.html", settings.audience, result.dos());
        storage.write_file(&file_name, content.html.as_bytes()).await?;
        tracing::info!("📧 Email body ready: \"{}\" -> {}/{}", subject, output_path, file_name);

        if settings.archive {
            let name = ReportArchive::new(storage).write(&result).await?;
            println!("📁 Archive saved to: {}/{}", output_path, name);
        }
    }

    Ok(())
}
