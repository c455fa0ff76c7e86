use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kcse_course_checker::catalog::{CourseCategory, CourseRegistry};
use kcse_course_checker::clusters::{ClusterCalculator, ClusterRegistry};
use kcse_course_checker::config::{Config, ConfigOverrides};
use kcse_course_checker::eligibility::{match_courses, MatchFilters};
use kcse_course_checker::grades::ProfileInput;
use kcse_course_checker::output::csv::{clusters_to_csv, courses_to_csv};
use kcse_course_checker::output::json::{render_json, to_payload};
use kcse_course_checker::output::table::{
    render_categories_table, render_cluster_summary, render_clusters_table,
    render_course_summary_table, render_courses_table, render_skipped_table,
    render_stored_result_header,
};
use kcse_course_checker::report::{
    build_cluster_report, build_course_report, ClusterReport, CourseReport,
};
use kcse_course_checker::results::{ResultKind, ResultStore, StoredResult};
use kcse_course_checker::server::run_server;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "kcse-course-checker",
    about = "KCSE cluster weights and course eligibility"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(long = "catalog-dir")]
    catalog_dir: Option<String>,
    #[arg(long = "catalog-url")]
    catalog_url: Option<String>,
    #[command(flatten)]
    profile: ProfileArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct ProfileArgs {
    /// JSON file with mean_grade and subjects
    #[arg(long = "profile", global = true)]
    profile_file: Option<PathBuf>,
    #[arg(long, global = true)]
    mean: Option<String>,
    /// Subject=Grade, repeatable
    #[arg(long = "grade", value_parser = parse_grade_pair, global = true)]
    grades: Vec<(String, String)>,
}

impl ProfileArgs {
    fn to_input(&self) -> Result<ProfileInput> {
        let mut input = match &self.profile_file {
            Some(path) => load_profile_file(path)?,
            None => ProfileInput::default(),
        };
        if let Some(mean) = &self.mean {
            input.mean_grade = mean.clone();
        }
        for (subject, grade) in &self.grades {
            input.subjects.insert(subject.clone(), grade.clone());
        }
        if input.mean_grade.trim().is_empty() {
            return Err(anyhow!("a mean grade is required (--mean or --profile)"));
        }
        Ok(input)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Cluster weights for all 20 clusters
    Clusters {
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        save: bool,
    },
    /// Courses the profile qualifies for in one category
    Match {
        category: String,
        #[arg(long)]
        county: Vec<String>,
        #[arg(long = "institution-type")]
        institution_type: Vec<String>,
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        save: bool,
    },
    /// List the cluster definitions
    Categories,
    /// Show a saved result
    Result { id: String },
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3001)]
        port: u16,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        catalog_dir: cli.catalog_dir.clone(),
        catalog_url: cli.catalog_url.clone(),
    });

    let calculator = ClusterCalculator::new(ClusterRegistry::with_defaults(), config.thresholds());

    match &cli.command {
        Commands::Clusters { top, save } => {
            let profile = cli.profile.to_input()?.to_profile()?;
            let top_n = top.unwrap_or(config.report.top_n);
            let report = build_cluster_report(&calculator, &profile, top_n)?;
            if *save {
                save_result(&config, ResultKind::Clusters, &report)?;
            }
            print_clusters(&report, cli.output)?;
        }
        Commands::Match {
            category,
            county,
            institution_type,
            top,
            save,
        } => {
            let category = CourseCategory::from_str(category)?;
            let input = cli.profile.to_input()?;
            let profile = input.to_profile()?;
            let mut counties = input.counties.clone();
            counties.extend(county.iter().cloned());
            let mut institution_types = input.institution_types.clone();
            institution_types.extend(institution_type.iter().cloned());
            let filters = MatchFilters::new(counties, institution_types);

            let registry = CourseRegistry::from_config(&config.catalog)?;
            let catalog = registry.courses_for_category(category).await?;
            let outcome = match_courses(&profile, &catalog, &filters);
            let report = build_course_report(outcome, *top, config.report.top_n);
            if *save {
                save_result(&config, ResultKind::Courses, &report)?;
            }
            print_courses(&report, cli.output)?;
        }
        Commands::Categories => {
            let categories = calculator.registry().list_categories();
            match cli.output {
                OutputFormat::Table => println!("{}", render_categories_table(categories)),
                OutputFormat::Json => println!("{}", render_json(categories)?),
                OutputFormat::Csv => {
                    warn!("CSV output for categories not implemented, using JSON");
                    println!("{}", render_json(categories)?);
                }
            }
        }
        Commands::Result { id } => {
            let store = ResultStore::open(&config.resolved_db_path())?;
            let stored = store
                .get(id)?
                .ok_or_else(|| anyhow!("no stored result with id {id}"))?;
            print_stored(&stored, cli.output)?;
        }
        Commands::Serve { host, port } => {
            let bind = format!("{host}:{port}");
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            run_server(config, addr).await?;
        }
        Commands::Config { init, show } => {
            handle_config_command(*init, *show, &config, &config_path)?;
        }
    }

    Ok(())
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &Path,
) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn parse_grade_pair(raw: &str) -> std::result::Result<(String, String), String> {
    let (subject, grade) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected Subject=Grade, got {raw}"))?;
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(format!("missing subject in {raw}"));
    }
    Ok((subject.to_string(), grade.trim().to_string()))
}

fn load_profile_file(path: &Path) -> Result<ProfileInput> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading profile: {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed parsing profile JSON: {}", path.display()))
}

fn save_result<T: Serialize>(config: &Config, kind: ResultKind, report: &T) -> Result<()> {
    let store = ResultStore::open(&config.resolved_db_path())?;
    let id = store.put(kind, &to_payload(report)?)?;
    info!("saved {kind} result {id}");
    eprintln!("Result id: {id}");
    Ok(())
}

fn print_clusters(report: &ClusterReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_clusters_table(&report.results));
            println!("{}", render_cluster_summary(&report.summary));
        }
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => println!("{}", clusters_to_csv(&report.results)?),
    }
    Ok(())
}

fn print_courses(report: &CourseReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if report.qualified.is_empty() {
                println!(
                    "No {} courses matched ({} evaluated).",
                    report.category, report.evaluated
                );
            } else {
                println!("{}", render_courses_table(&report.qualified));
                println!("{}", render_course_summary_table(&report.summary));
            }
            if !report.skipped.is_empty() {
                println!("Skipped malformed records:");
                println!("{}", render_skipped_table(&report.skipped));
            }
        }
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => println!("{}", courses_to_csv(&report.qualified)?),
    }
    Ok(())
}

fn print_stored(stored: &StoredResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_stored_result_header(stored));
            println!("{}", render_json(&stored.payload)?);
        }
        OutputFormat::Json => println!("{}", render_json(stored)?),
        OutputFormat::Csv => {
            warn!("CSV output for stored results not implemented, using JSON");
            println!("{}", render_json(stored)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subject_grade_pairs() {
        assert_eq!(
            parse_grade_pair("Mathematics=A-"),
            Ok(("Mathematics".to_string(), "A-".to_string()))
        );
        assert!(parse_grade_pair("Mathematics").is_err());
        assert!(parse_grade_pair("=B").is_err());
    }

    #[test]
    fn flags_override_profile_file_values() {
        let args = ProfileArgs {
            profile_file: None,
            mean: Some("B+".to_string()),
            grades: vec![("maths".to_string(), "A".to_string())],
        };
        let input = args.to_input().expect("input");
        assert_eq!(input.mean_grade, "B+");
        assert_eq!(input.subjects.get("maths").map(String::as_str), Some("A"));
        assert!(ProfileArgs::default().to_input().is_err());
    }

    #[test]
    fn config_init_writes_a_loadable_template() {
        let path = std::env::temp_dir()
            .join(format!("kcse-course-checker-cli-{}", std::process::id()))
            .join("config.toml");
        handle_config_command(true, false, &Config::default(), &path).expect("config init");
        assert!(path.exists());
        let loaded = Config::load(Some(&path)).expect("template loads");
        assert_eq!(loaded.report.top_n, Config::default().report.top_n);
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
