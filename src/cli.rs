// src/cli.rs
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::config_manager::CONFIG_FILE;
use crate::core::{
    generate_content, ConfigManager, ContentGenerator, Database, FsOps, ProfileStore,
    ServiceClient,
};
use crate::errors::AppError;
use crate::extraction::{HtmlPage, Lookup, PageContext, PageFetcher, PageSignalExtractor};
use crate::resume::ResumeSegmenter;
use crate::types::{ContentType, JobPosting, Profile};

#[derive(Parser)]
#[command(name = "apply-assist")]
#[command(about = "Scrape job pages, parse resumes and request application content")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, default_value = CONFIG_FILE)]
    pub config: PathBuf,
}

/// Where a page comes from: fetched from `--url`, or a saved `--html` file.
/// A saved file needs `--host`, or `--url` for its original address.
#[derive(Args, Debug, Clone)]
pub struct PageSource {
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub html: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a plain-text resume into a profile
    ParseResume {
        file: PathBuf,
        /// Overwrite the saved profile with the result
        #[arg(long)]
        save: bool,
    },
    /// Extract the job description from a posting
    ScrapeJob {
        #[command(flatten)]
        source: PageSource,
        #[arg(long)]
        save: bool,
    },
    /// Extract application questions from a posting
    ScrapeQuestions {
        #[command(flatten)]
        source: PageSource,
        #[arg(long)]
        save: bool,
    },
    /// Extract profile fields from a LinkedIn profile page
    ScrapeProfile {
        #[command(flatten)]
        source: PageSource,
        #[arg(long)]
        save: bool,
    },
    /// Print the saved profile
    ShowProfile,
    /// Save a profile from a JSON file (camelCase keys)
    SaveProfile { file: PathBuf },
    /// Generate a cover letter or question answers for the saved profile
    Generate {
        #[arg(long, default_value = "cover_letter")]
        content_type: ContentType,
        /// Job description text file; defaults to the last scraped job
        #[arg(long)]
        job_file: Option<PathBuf>,
        /// Questions text file, one per line; defaults to the last scraped questions
        #[arg(long)]
        questions_file: Option<PathBuf>,
        /// Also write the generated text here
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check the content generation service and the local database
    Health,
}

pub async fn handle_command(command: Command, config: &ConfigManager) -> Result<(), AppError> {
    let extractor = PageSignalExtractor::new(
        config.extraction.selectors.clone(),
        config.extraction.settle_delay_ms,
    );

    match command {
        Command::ParseResume { file, save } => {
            let text = FsOps::read_resume_text(&file).await?;
            let profile = ResumeSegmenter::parse(&text)?;
            let profile = if save {
                open_store(config).await?.save_profile(&profile).await?
            } else {
                profile
            };
            print_json(&profile)?;
        }

        Command::ScrapeJob { source, save } => {
            let (context, page) = load_page(&source, config).await?;
            match extractor.job_description(&context, &page).await? {
                Lookup::Found(description) => {
                    if save {
                        open_store(config)
                            .await?
                            .save_scraped_job(&description)
                            .await?;
                    }
                    println!("{}", description);
                }
                Lookup::NotFound => not_found("job description", &context),
            }
        }

        Command::ScrapeQuestions { source, save } => {
            let (context, page) = load_page(&source, config).await?;
            match extractor.questions(&context, &page).await? {
                Lookup::Found(questions) => {
                    if save {
                        open_store(config)
                            .await?
                            .save_scraped_questions(&questions)
                            .await?;
                    }
                    for question in &questions {
                        println!("{}", question);
                    }
                }
                Lookup::NotFound => not_found("application questions", &context),
            }
        }

        Command::ScrapeProfile { source, save } => {
            let (context, page) = load_page(&source, config).await?;
            let profile = extractor.linkedin_profile(&context, &page).await?;
            let profile = if save {
                open_store(config).await?.save_profile(&profile).await?
            } else {
                profile
            };
            print_json(&profile)?;
        }

        Command::ShowProfile => {
            let profile = open_store(config).await?.load_profile().await?;
            print_json(&profile)?;
        }

        Command::SaveProfile { file } => {
            let content = FsOps::read_file_safe(&file).await?;
            let profile: Profile = serde_json::from_str(&content).map_err(|e| {
                AppError::Validation(format!("{} is not a valid profile: {}", file.display(), e))
            })?;
            let saved = open_store(config).await?.save_profile(&profile).await?;
            print_json(&saved)?;
        }

        Command::Generate {
            content_type,
            job_file,
            questions_file,
            output,
        } => {
            let store = open_store(config).await?;
            let profile = store.load_profile().await?;
            let job = resolve_job(&store, job_file.as_deref(), questions_file.as_deref()).await?;

            let client = ServiceClient::new(
                &config.service.generation_url,
                config.service.timeout_seconds,
            )?;
            let response = generate_content(&client, &profile, &job, content_type).await?;

            if let Some(path) = output {
                FsOps::write_file_safe(&path, &response.generated_content).await?;
            }
            println!("{}", response.generated_content);
        }

        Command::Health => {
            let client = ServiceClient::new(
                &config.service.generation_url,
                config.service.timeout_seconds,
            )?;
            let health = client.health().await?;
            println!(
                "Generation service {}: {} (version {}, {})",
                client.base_url(),
                health.status,
                health.version,
                health.timestamp
            );

            Database::new(&config.paths.database_path)
                .await?
                .health_check()
                .await?;
            println!("Database {}: ok", config.paths.database_path.display());
        }
    }

    Ok(())
}

async fn open_store(config: &ConfigManager) -> Result<ProfileStore<Database>, AppError> {
    let db = Database::new(&config.paths.database_path).await?;
    Ok(ProfileStore::new(db))
}

async fn load_page(
    source: &PageSource,
    config: &ConfigManager,
) -> Result<(PageContext, HtmlPage), AppError> {
    let Some(path) = &source.html else {
        let url = source.url.as_deref().ok_or_else(|| {
            AppError::Validation("Provide --url, or --html <file> with --host".to_string())
        })?;
        let fetcher = PageFetcher::new(config.extraction.fetch_timeout_seconds)?;
        return Ok(fetcher.fetch(url).await?);
    };

    let context = match (&source.url, &source.host) {
        (Some(url), _) => PageContext::from_url(url)?,
        (None, Some(host)) => PageContext::new(host.clone()),
        (None, None) => {
            return Err(AppError::Validation(
                "--html needs --host (or --url) to pick site selectors".to_string(),
            ))
        }
    };

    let html = FsOps::read_html(path).await?;
    info!("Loaded {} bytes of HTML from {}", html.len(), path.display());
    Ok((context, HtmlPage::parse(&html)))
}

/// Job posting from files when given, otherwise the last scrape.
async fn resolve_job(
    store: &ProfileStore<Database>,
    job_file: Option<&Path>,
    questions_file: Option<&Path>,
) -> Result<JobPosting, AppError> {
    let job = match job_file {
        Some(path) => JobPosting::new(FsOps::read_file_safe(path).await?),
        None => store.job_posting().await?.ok_or_else(|| {
            AppError::Validation(
                "No job description: pass --job-file or run scrape-job --save first".to_string(),
            )
        })?,
    };

    match questions_file {
        Some(path) => {
            let text = FsOps::read_file_safe(path).await?;
            let questions: Vec<String> = text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            Ok(job.with_questions(&questions))
        }
        None if job.questions.is_none() => {
            let questions = store.load_scraped_questions().await?;
            Ok(job.with_questions(&questions))
        }
        None => Ok(job),
    }
}

fn not_found(what: &str, context: &PageContext) {
    warn!("No {} found on {}", what, context.hostname);
    eprintln!("No {} found on {}", what, context.hostname);
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}
