//! Console shell for the interview-practice client. All session logic lives in the
//! library; this binary only wires config, logging, and the HTTP gateway together and
//! walks the phase cycle over stdin.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interview_client::config::Config;
use interview_client::gateway::ResumeFile;
use interview_client::{HttpGateway, Job, SessionController, SessionPhase};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interview client v{}", env!("CARGO_PKG_VERSION"));
    info!("Backend: {}", config.api_base_url);

    let jobs = load_jobs(&config.jobs_file)?;
    info!("Loaded {} job listings from {}", jobs.len(), config.jobs_file);

    let gateway = Arc::new(HttpGateway::new(
        config.api_base_url.clone(),
        config.request_timeout_secs,
    )?);
    let controller = SessionController::new(gateway);

    run(&controller, &jobs).await
}

fn load_jobs(path: &str) -> Result<Vec<Job>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read jobs file '{path}'"))?;
    serde_json::from_str(&text).with_context(|| format!("jobs file '{path}' is not a job list"))
}

/// Drives the controller through the phase cycle until the user quits.
async fn run(controller: &SessionController, jobs: &[Job]) -> Result<()> {
    loop {
        match controller.phase() {
            SessionPhase::Browsing => {
                println!("\nOpen positions:");
                for (i, job) in jobs.iter().enumerate() {
                    println!("  {}. {} at {} ({})", i + 1, job.title, job.company, job.location);
                }
                let input = prompt("Select a job number (or 'q' to quit)")?;
                if input.eq_ignore_ascii_case("q") {
                    return Ok(());
                }
                match input.parse::<usize>() {
                    Ok(n) if (1..=jobs.len()).contains(&n) => {
                        controller.select_job(jobs[n - 1].clone())
                    }
                    _ => println!("Please enter a number between 1 and {}.", jobs.len()),
                }
            }
            SessionPhase::AwaitingUpload { job } => {
                println!("\nApplying for: {} at {}", job.title, job.company);
                let path = prompt("Path to your resume")?;
                let user_id = prompt("Your user ID")?;
                let file = match read_resume(&path) {
                    Ok(file) => file,
                    Err(e) => {
                        println!("{e:#}");
                        continue;
                    }
                };
                if let Err(e) = controller.submit_resume_and_user(file, &user_id).await {
                    println!("{e}");
                    if e.retryable() {
                        println!("You can try again.");
                    }
                }
            }
            SessionPhase::Interviewing { .. } => {
                if let (Some(question), Some((index, total))) =
                    (controller.current_question(), controller.progress())
                {
                    println!("\nQuestion {}/{} (time budget: {})", index + 1, total, question.time);
                    println!("{}", question.question);
                    let answer = prompt("Your answer")?;
                    if let Err(e) = controller.submit_answer(&answer) {
                        println!("{e}");
                    }
                }
            }
            SessionPhase::Complete { questions } => {
                println!("\nInterview complete. Your answers:");
                for (i, q) in questions.iter().enumerate() {
                    println!("  {}. {}", i + 1, q.question);
                    println!("     {}", q.answer.as_deref().unwrap_or(""));
                }
                controller.finish();
            }
        }
    }
}

fn read_resume(path: &str) -> Result<ResumeFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("could not read resume file '{path}'"))?;
    let file_name = std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("resume")
        .to_string();
    Ok(ResumeFile { file_name, bytes })
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        anyhow::bail!("stdin closed");
    }
    Ok(line.trim().to_string())
}
