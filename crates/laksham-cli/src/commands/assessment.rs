use clap::Subcommand;
use laksham_core::AttemptApi;

use crate::common;

#[derive(Subcommand)]
pub enum AssessmentAction {
    /// Show a shared assessment by its share token
    Show {
        /// Share token from the assessment link
        share_token: String,
        /// Print the raw assessment as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: AssessmentAction) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    match action {
        AssessmentAction::Show { share_token, json } => rt.block_on(show(&share_token, json)),
    }
}

async fn show(share_token: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, client) = common::portal_client()?;
    let mut assessment = client.fetch_shared_assessment(share_token).await?;
    assessment.sort_questions();

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
        return Ok(());
    }

    println!("{}", assessment.title);
    if !assessment.description.is_empty() {
        println!("{}", assessment.description);
    }
    println!();
    println!(
        "{} questions · {} minutes · {} points",
        assessment.question_count(),
        assessment.total_duration,
        assessment.max_score
    );
    println!();
    for q in &assessment.questions {
        let language = q
            .question
            .programming_language
            .as_deref()
            .map(|l| format!(" [{l}]"))
            .unwrap_or_default();
        println!(
            "  {}. {} ({} pts, {} min, {}){}",
            q.order,
            q.question.title,
            q.points,
            q.duration_min(),
            q.question.difficulty_level,
            language
        );
    }
    Ok(())
}
