mod cli;

use streamtag::batch::{self, ReportLine};
use streamtag::config::{self, Config};
use streamtag_av::{add_attachment, plan_metadata, EditOutcome, FfprobeProber, ToolRegistry};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "streamtag=debug,streamtag_av=debug,streamtag_core=debug".to_string()
        } else {
            "streamtag=info,streamtag_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Probe { file, json } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            block_on(probe_file(&file, json, &config))
        }
        Commands::Retag {
            files,
            title,
            dry_run,
            jobs,
            json,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let jobs = jobs.unwrap_or(config.edit.jobs);
            if dry_run {
                block_on(preview_retag(&files, &title, &config))
            } else {
                block_on(retag(&files, &title, jobs, json, config))
            }
        }
        Commands::Attach { file, attachment } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            block_on(attach(&file, &attachment, &config))
        }
        Commands::CheckTools => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            block_on(check_tools(&config))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
    }
}

fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(future)
}

async fn probe_file(file: &Path, json: bool, config: &Config) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let tools = ToolRegistry::discover(&config.tools);
    let prober = FfprobeProber::from_registry(&tools)?;
    let streams = prober.probe(file).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&streams)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    println!("Streams: {}", streams.len());
    for stream in &streams {
        print!(
            "  [{}] {} {}",
            stream.index,
            stream.codec_type,
            stream.codec_name.as_deref().unwrap_or("unknown")
        );
        if let Some(ref lang) = stream.language {
            print!(" ({})", lang);
        }
        println!();
    }

    Ok(())
}

async fn preview_retag(files: &[PathBuf], title: &str, config: &Config) -> Result<()> {
    let tools = ToolRegistry::discover(&config.tools);
    let ffmpeg = tools.require("ffmpeg")?;
    let mut failures = 0;

    for file in batch::dedupe_paths(files) {
        match plan_metadata(&file, title, &tools, &config.edit).await {
            Ok(Some(plan)) => {
                println!("{}:", file.display());
                println!("  {} {}", ffmpeg.path.display(), plan.command_line());
                if !plan.skipped_streams().is_empty() {
                    println!("  dropped streams: {:?}", plan.skipped_streams());
                }
            }
            Ok(None) => println!("{}: nothing to do", file.display()),
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}", file.display(), e);
            }
        }
    }

    println!("\n[DRY RUN] No files were modified");
    if failures > 0 {
        anyhow::bail!("{} file(s) could not be planned", failures);
    }
    Ok(())
}

async fn retag(files: &[PathBuf], title: &str, jobs: usize, json: bool, config: Config) -> Result<()> {
    let tools = Arc::new(ToolRegistry::discover(&config.tools));
    let edit = Arc::new(config.edit);

    let reports = batch::retag_files(files, title, tools, edit, jobs).await;
    let failures = reports.iter().filter(|r| r.is_failure()).count();

    for report in &reports {
        if json {
            println!("{}", serde_json::to_string(&ReportLine::from(report))?);
            continue;
        }
        match &report.result {
            Ok(EditOutcome::Edited { skipped, .. }) if skipped.is_empty() => {
                println!("✓ {}", report.path.display());
            }
            Ok(EditOutcome::Edited { skipped, .. }) => {
                println!("✓ {} (dropped streams {:?})", report.path.display(), skipped);
            }
            Ok(EditOutcome::Skipped { reason }) => {
                println!("- {} skipped: {}", report.path.display(), reason);
            }
            Err(e) => println!("✗ {}: {}", report.path.display(), e),
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) failed", failures, reports.len());
    }
    Ok(())
}

async fn attach(file: &Path, attachment: &Path, config: &Config) -> Result<()> {
    let tools = ToolRegistry::discover(&config.tools);
    let path = add_attachment(file, attachment, &tools, &config.edit).await?;
    println!("Attached {} to {}", attachment.display(), path.display());
    Ok(())
}

async fn check_tools(config: &Config) -> Result<()> {
    println!("Checking external tools...\n");

    let tools = ToolRegistry::discover(&config.tools).check_all().await;
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to edit files.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    let show = |p: &Option<PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "PATH".to_string())
    };
    println!("  ffmpeg: {}", show(&config.tools.ffmpeg_path));
    println!("  ffprobe: {}", show(&config.tools.ffprobe_path));
    match config.tools.timeout_secs {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }
    println!("  Temp suffix: {}", config.edit.temp_suffix());
    println!(
        "  Backup extension: {}",
        config.edit.backup_extension().unwrap_or("none")
    );
    println!("  Jobs: {}", config.edit.jobs);

    for warning in config.validate() {
        println!("  warning: {}", warning);
    }

    Ok(())
}
