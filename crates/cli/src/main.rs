//! Runner CLI - Submissions, official scores and output summaries

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use runner_client::{HttpOfficialSubmitter, HttpScoreEvaluator};
use runner_core::application::summary::summarize_file;
use runner_core::application::worker::constants::SUMMARY_BOUND;
use runner_core::application::{FinalSubmitRequest, SubmissionService, SubmitRequest};
use runner_core::domain::SubmitOutcome;
use runner_core::port::time_provider::SystemTimeProvider;
use runner_infra_sqlite::{create_pool, run_migrations, SqliteSubmissionRepository};

const DEFAULT_DB_PATH: &str = "~/.runner/submissions.db";
const DEFAULT_EVALUATOR_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_OFFICIAL_URL: &str = "https://poses.live";

#[derive(Parser)]
#[command(name = "runner")]
#[command(about = "Runner task worker CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Submission database path
    #[arg(long, env = "RUNNER_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db_path: String,

    /// Evaluation service base URL
    #[arg(long, env = "RUNNER_EVALUATOR_URL", default_value = DEFAULT_EVALUATOR_URL)]
    evaluator_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a solution and record it
    Submit {
        /// Problem ID
        #[arg(short, long)]
        problem_id: i64,

        /// Solution file ("-" for stdin)
        solution: PathBuf,

        /// Record even if a better official score is known
        #[arg(short, long)]
        force: bool,
    },

    /// Evaluate a solution, submit it to the official scoring service and record it
    FinalSubmit {
        /// Problem ID
        #[arg(short, long)]
        problem_id: i64,

        /// Solution file ("-" for stdin)
        solution: PathBuf,

        /// Official scoring service base URL
        #[arg(long, env = "RUNNER_OFFICIAL_URL", default_value = DEFAULT_OFFICIAL_URL)]
        official_url: String,

        /// Bearer token for the official scoring service
        #[arg(long, env = "RUNNER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Record the official score of a judged submission
    RecordScore {
        /// Submission ID
        #[arg(short, long)]
        submission_id: i64,

        /// Official score (negative if judged invalid)
        #[arg(long, allow_negative_numbers = true)]
        score: i64,
    },

    /// Show best known scores for a problem
    Best {
        /// Problem ID
        #[arg(short, long)]
        problem_id: i64,

        /// Bonus set hash
        #[arg(long, default_value = "")]
        bonuses_hash: String,
    },

    /// Print a file the way run output is summarized for the coordinator
    Summarize {
        file: PathBuf,

        /// Length above which output is truncated
        #[arg(long, default_value_t = SUMMARY_BOUND)]
        bound: usize,
    },
}

async fn submission_service(cli: &Cli) -> Result<SubmissionService> {
    let db_path = shellexpand::tilde(&cli.db_path).into_owned();
    if let Some(parent) = Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let pool = create_pool(&format!("sqlite://{}", db_path))
        .await
        .context("Failed to open submission database")?;
    run_migrations(&pool).await.context("Migration failed")?;

    Ok(SubmissionService::new(
        Arc::new(HttpScoreEvaluator::new(cli.evaluator_url.clone())),
        Arc::new(SqliteSubmissionRepository::new(pool)),
        Arc::new(SystemTimeProvider),
    ))
}

fn read_solution(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return std::io::read_to_string(std::io::stdin()).context("Failed to read stdin");
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn format_score(score: Option<i64>) -> String {
    score.map_or_else(|| "-".dimmed().to_string(), |s| s.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Submit {
            problem_id,
            solution,
            force,
        } => {
            let solution = read_solution(solution)?;
            // Reject malformed JSON before calling the evaluator
            serde_json::from_str::<serde_json::Value>(&solution)
                .context("Solution is not valid JSON")?;

            let service = submission_service(&cli).await?;
            let outcome = service
                .submit(SubmitRequest {
                    problem_id: *problem_id,
                    solution,
                    force: *force,
                })
                .await?;

            match outcome {
                SubmitOutcome::Recorded(id) => {
                    println!("{}", "✓ Submission recorded".green().bold());
                    println!("  {} {}", "Submission ID:".bold(), id);
                }
                SubmitOutcome::Skipped { estimated, best } => {
                    println!("{}", "○ Submission skipped".yellow().bold());
                    println!(
                        "  Official best {} is at least as good as {} (use --force to record anyway)",
                        best, estimated
                    );
                }
            }
        }

        Commands::FinalSubmit {
            problem_id,
            solution,
            official_url,
            api_key,
        } => {
            let solution = read_solution(solution)?;
            let official = HttpOfficialSubmitter::new(official_url.clone(), api_key.clone());
            let service = submission_service(&cli)
                .await?
                .with_official_submitter(Arc::new(official));

            let outcome = service
                .final_submit(FinalSubmitRequest {
                    problem_id: *problem_id,
                    solution,
                })
                .await?;

            println!("{}", "✓ Solution submitted".green().bold());
            println!("  {} {}", "Pose ID:".bold(), outcome.pose_id);
            println!("  {} {}", "Submission ID:".bold(), outcome.submission_id);
        }

        Commands::RecordScore {
            submission_id,
            score,
        } => {
            let service = submission_service(&cli).await?;
            service
                .record_official_score(*submission_id, *score)
                .await?;

            println!("{}", "✓ Official score recorded".green().bold());
            println!("  {} {}", "Submission ID:".bold(), submission_id);
            println!("  {} {}", "Score:".bold(), score);
        }

        Commands::Best {
            problem_id,
            bonuses_hash,
        } => {
            let service = submission_service(&cli).await?;
            let best = service.best_scores(*problem_id, bonuses_hash).await?;

            println!("{}", format!("Problem {}", problem_id).cyan().bold());
            println!("  {} {}", "Official:".bold(), format_score(best.official));
            println!("  {} {}", "Estimated:".bold(), format_score(best.estimated));
            println!(
                "  {} {}",
                "Estimated (any bonuses):".bold(),
                format_score(best.overall_estimated)
            );
        }

        Commands::Summarize { file, bound } => {
            let summary = summarize_file(file, *bound)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            print!("{}", summary);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit() {
        let cli = Cli::try_parse_from([
            "runner",
            "--db-path",
            "/tmp/x.db",
            "submit",
            "-p",
            "7",
            "--force",
            "solution.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Submit {
                problem_id,
                solution,
                force,
            } => {
                assert_eq!(problem_id, 7);
                assert_eq!(solution, PathBuf::from("solution.json"));
                assert!(force);
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn test_parse_final_submit() {
        let cli = Cli::try_parse_from([
            "runner",
            "final-submit",
            "-p",
            "12",
            "--official-url",
            "http://127.0.0.1:9000",
            "--api-key",
            "k",
            "pose.json",
        ])
        .unwrap();

        match cli.command {
            Commands::FinalSubmit {
                problem_id,
                solution,
                official_url,
                api_key,
            } => {
                assert_eq!(problem_id, 12);
                assert_eq!(solution, PathBuf::from("pose.json"));
                assert_eq!(official_url, "http://127.0.0.1:9000");
                assert_eq!(api_key.as_deref(), Some("k"));
            }
            _ => panic!("expected final-submit"),
        }
    }

    #[test]
    fn test_parse_record_score_accepts_negative() {
        let cli =
            Cli::try_parse_from(["runner", "record-score", "-s", "3", "--score", "-1"]).unwrap();

        match cli.command {
            Commands::RecordScore {
                submission_id,
                score,
            } => {
                assert_eq!(submission_id, 3);
                assert_eq!(score, -1);
            }
            _ => panic!("expected record-score"),
        }
    }
}
