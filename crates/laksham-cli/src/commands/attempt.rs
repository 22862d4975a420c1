use std::time::Duration;

use clap::Subcommand;
use laksham_core::{AttemptApi, AttemptSession, Event, PortalClient, SessionPhase};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::common;

#[derive(Subcommand)]
pub enum AttemptAction {
    /// Take a timed attempt at a shared assessment
    Take {
        /// Share token from the assessment link
        share_token: String,
        /// Candidate email (falls back to candidate.email in config)
        #[arg(long)]
        email: Option<String>,
        /// Candidate display name (falls back to candidate.name in config)
        #[arg(long)]
        name: Option<String>,
        /// Print session events as JSON lines instead of prose
        #[arg(long)]
        json_events: bool,
    },
    /// Fetch the result of a completed attempt
    Result {
        attempt_id: i64,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: AttemptAction) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    match action {
        AttemptAction::Take {
            share_token,
            email,
            name,
            json_events,
        } => rt.block_on(take(&share_token, email, name, json_events)),
        AttemptAction::Result { attempt_id, json } => rt.block_on(result(attempt_id, json)),
    }
}

async fn take(
    share_token: &str,
    email: Option<String>,
    name: Option<String>,
    json_events: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, client) = common::portal_client()?;
    let assessment = client.fetch_shared_assessment(share_token).await?;

    println!("{}", assessment.title);
    if !assessment.description.is_empty() {
        println!("{}", assessment.description);
    }
    println!(
        "{} questions · {} minutes · {} points",
        assessment.question_count(),
        assessment.total_duration,
        assessment.max_score
    );
    println!();

    let email = email
        .or(config.candidate.email)
        .ok_or("candidate email is required: pass --email or set candidate.email in config")?;
    let name = name.or(config.candidate.name);

    let mut session = AttemptSession::new(client, assessment)?;
    let started = session.start(&email, name.as_deref()).await?;
    emit(&started, json_events);

    println!("type your answer and press enter; :help lists commands");
    print_question(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = tokio::time::interval_at(
        tokio::time::Instant::now() + Duration::from_secs(1),
        Duration::from_secs(1),
    );
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                for event in session.tick().await {
                    emit(&event, json_events);
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        let before = session.cursor();
                        for event in handle_line(&mut session, &line).await {
                            emit(&event, json_events);
                        }
                        if session.cursor() != before
                            && session.phase() == SessionPhase::InProgress
                        {
                            print_question(&session);
                        }
                    }
                    // Input closed: keep running, the timer will submit.
                    None => stdin_open = false,
                }
            }
        }
        if session.phase() == SessionPhase::Completed {
            break;
        }
        // With input gone there is nobody left to type :retry.
        if !stdin_open && session.phase() == SessionPhase::Submitting {
            if let Some(error) = session.snapshot().last_submit_error {
                return Err(format!("submission failed and input is closed: {error}").into());
            }
        }
    }

    if let Some(attempt_id) = session.attempt_id() {
        println!();
        println!("attempt {attempt_id} submitted; fetch the result once grading has run:");
        println!("  laksham-cli attempt result {attempt_id}");
    }
    Ok(())
}

async fn result(attempt_id: i64, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, client) = common::portal_client()?;
    let result = client.fetch_attempt(attempt_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Attempt {} ({})", result.id, result.status);
    let name = result
        .candidate_name
        .as_deref()
        .map(|n| format!(" ({n})"))
        .unwrap_or_default();
    println!("Candidate: {}{name}", result.candidate_email);
    println!("Started:   {}", result.started_at.format("%Y-%m-%d %H:%M UTC"));
    if let Some(completed_at) = result.completed_at {
        println!("Completed: {}", completed_at.format("%Y-%m-%d %H:%M UTC"));
    }
    match (result.total_score, result.percentage()) {
        (Some(score), Some(pct)) => {
            println!("Score:     {score} / {} ({pct}%)", result.max_score);
        }
        _ => println!("Score:     pending grading"),
    }
    Ok(())
}

// ── Interactive input ────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum LineCommand {
    Empty,
    Answer(String),
    Next,
    Previous,
    Goto(usize),
    Expl(String),
    Save,
    Status,
    Submit { confirmed: bool },
    Retry,
    Help,
    Unknown(String),
}

/// Lines starting with ':' are commands; anything else replaces the answer
/// for the question currently shown.
fn parse_line(line: &str) -> LineCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineCommand::Empty;
    }
    let Some(command) = trimmed.strip_prefix(':') else {
        return LineCommand::Answer(trimmed.to_string());
    };

    let mut parts = command.splitn(2, ' ');
    let verb = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    match (verb, arg) {
        ("next", _) => LineCommand::Next,
        ("prev", _) | ("previous", _) => LineCommand::Previous,
        ("goto", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => LineCommand::Goto(n),
            _ => LineCommand::Unknown(command.to_string()),
        },
        ("expl", Some(text)) => LineCommand::Expl(text.to_string()),
        ("save", _) => LineCommand::Save,
        ("status", _) => LineCommand::Status,
        ("submit", Some("yes")) => LineCommand::Submit { confirmed: true },
        ("submit", _) => LineCommand::Submit { confirmed: false },
        ("retry", _) => LineCommand::Retry,
        ("help", _) => LineCommand::Help,
        _ => LineCommand::Unknown(command.to_string()),
    }
}

async fn handle_line(session: &mut AttemptSession<PortalClient>, line: &str) -> Vec<Event> {
    match parse_line(line) {
        LineCommand::Empty => Vec::new(),
        LineCommand::Answer(text) => {
            let question_id = session.current_question().question_id;
            session.set_answer(question_id, &text);
            Vec::new()
        }
        LineCommand::Expl(text) => {
            let question_id = session.current_question().question_id;
            session.set_explanation(question_id, &text);
            Vec::new()
        }
        LineCommand::Next => session.next().await,
        LineCommand::Previous => session.previous().await,
        LineCommand::Goto(n) => session.go_to(n - 1).await,
        LineCommand::Save => session.save_current().await,
        LineCommand::Status => {
            print_status(session);
            Vec::new()
        }
        LineCommand::Submit { confirmed: true } => session.request_submit().await,
        LineCommand::Submit { confirmed: false } => {
            println!("submitting ends the attempt and cannot be undone; type ':submit yes' to confirm");
            Vec::new()
        }
        LineCommand::Retry => session.retry_submit().await,
        LineCommand::Help => {
            print_help();
            Vec::new()
        }
        LineCommand::Unknown(command) => {
            eprintln!("unknown command: :{command} (try :help)");
            Vec::new()
        }
    }
}

// ── Rendering ────────────────────────────────────────────────────────

fn emit(event: &Event, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
        return;
    }
    match event {
        Event::AttemptStarted {
            attempt_id,
            total_secs,
            ..
        } => println!(
            "attempt {attempt_id} started; {} on the clock",
            common::format_clock(*total_secs)
        ),
        // A per-second ticker would drown the prompt; show round minutes
        // and the final stretch.
        Event::Tick { remaining_secs, .. } => {
            if *remaining_secs > 0 && (*remaining_secs % 60 == 0 || *remaining_secs <= 10) {
                println!("time remaining: {}", common::format_clock(*remaining_secs));
            }
        }
        Event::Expired { .. } => println!("time is up; submitting your answers"),
        Event::AnswerSaved { question_id, .. } => println!("answer saved (question {question_id})"),
        Event::AutosaveFailed { question_id, .. } => println!(
            "could not save question {question_id} right now; your answer is kept locally"
        ),
        Event::SubmissionStarted { .. } => println!("submitting..."),
        Event::SubmissionFailed { message, .. } => {
            println!("submission failed: {message}");
            println!("your answers are safe; type :retry to try again");
        }
        Event::AttemptCompleted { attempt_id, .. } => {
            println!("attempt {attempt_id} completed")
        }
    }
}

fn print_question(session: &AttemptSession<PortalClient>) {
    let q = session.current_question();
    let snapshot = session.snapshot();
    println!();
    println!(
        "Question {} of {} · {} · {} pts · {} remaining",
        q.order,
        snapshot.question_count,
        q.question.difficulty_level,
        q.points,
        common::format_clock(snapshot.remaining_secs)
    );
    println!("{}", q.question.title);
    if !q.question.description.is_empty() {
        println!("{}", q.question.description);
    }
    if let Some(language) = &q.question.programming_language {
        println!("(coding question: answer in {language}; add context with :expl)");
    }
    if let Some(draft) = session.draft_for_current() {
        if !draft.answer_text.trim().is_empty() {
            println!("current answer: {}", draft.answer_text);
        }
    }
}

fn print_status(session: &AttemptSession<PortalClient>) {
    let snapshot = session.snapshot();
    println!(
        "time remaining: {}",
        common::format_clock(snapshot.remaining_secs)
    );
    for (i, answered) in snapshot.answered.iter().enumerate() {
        let marker = if *answered { "x" } else { " " };
        let here = if i == snapshot.cursor { " <- current" } else { "" };
        println!("  [{marker}] question {}{here}", i + 1);
    }
    if let Some(error) = &snapshot.last_submit_error {
        println!("last submission error: {error}");
    }
}

fn print_help() {
    println!("commands:");
    println!("  <text>        replace your answer for the shown question");
    println!("  :expl <text>  add an explanation (coding questions)");
    println!("  :save         save the shown question's answer now");
    println!("  :next / :prev move between questions (autosaves on leave)");
    println!("  :goto <n>     jump to question n");
    println!("  :status       progress and time remaining");
    println!("  :submit       submit the attempt (asks for confirmation)");
    println!("  :retry        retry a failed submission");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_an_answer() {
        assert_eq!(
            parse_line("  the loop bound is wrong  "),
            LineCommand::Answer("the loop bound is wrong".into())
        );
        assert_eq!(parse_line("   "), LineCommand::Empty);
    }

    #[test]
    fn commands_parse() {
        assert_eq!(parse_line(":next"), LineCommand::Next);
        assert_eq!(parse_line(":prev"), LineCommand::Previous);
        assert_eq!(parse_line(":goto 3"), LineCommand::Goto(3));
        assert_eq!(
            parse_line(":expl assumed sorted input"),
            LineCommand::Expl("assumed sorted input".into())
        );
        assert_eq!(parse_line(":save"), LineCommand::Save);
        assert_eq!(parse_line(":retry"), LineCommand::Retry);
    }

    #[test]
    fn submit_requires_confirmation() {
        assert_eq!(
            parse_line(":submit"),
            LineCommand::Submit { confirmed: false }
        );
        assert_eq!(
            parse_line(":submit yes"),
            LineCommand::Submit { confirmed: true }
        );
    }

    #[test]
    fn bad_goto_is_unknown() {
        assert!(matches!(parse_line(":goto"), LineCommand::Unknown(_)));
        assert!(matches!(parse_line(":goto zero"), LineCommand::Unknown(_)));
        assert!(matches!(parse_line(":goto 0"), LineCommand::Unknown(_)));
    }
}
