use inquire::{Confirm, Text};

use crate::server::dto::CreateFeedbackRequest;
use crate::types::{Feedback, ReceivedFeedback, RequestsOverview, User};

use super::api_client;
use super::pickers::{format_relative_time, select};

pub fn run_feedback_leave(
    request: Option<String>,
    rating: Option<i64>,
    comment: Option<String>,
    no_swap_again: bool,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let client = api_client()?;

    let request_id = match request {
        Some(id) => id,
        None if non_interactive => anyhow::bail!("--request is required in non-interactive mode"),
        None => {
            let overview: RequestsOverview = client.get("/requests")?;
            let ids: Vec<String> = overview
                .completed
                .into_iter()
                .map(|d| d.request.id)
                .collect();
            if ids.is_empty() {
                println!("No completed swaps to rate.");
                return Ok(());
            }
            match select("Completed swap:", ids)? {
                Some(id) => id,
                None => return Ok(()),
            }
        }
    };

    let rating = match rating {
        Some(r) => r,
        None if non_interactive => anyhow::bail!("--rating is required in non-interactive mode"),
        None => match select("Rating:", vec![5i64, 4, 3, 2, 1])? {
            Some(r) => r,
            None => return Ok(()),
        },
    };

    let (comment, would_swap_again) = if non_interactive || comment.is_some() {
        (comment, !no_swap_again)
    } else {
        let comment = Text::new("Comment (optional):").prompt()?;
        let again = if no_swap_again {
            false
        } else {
            Confirm::new("Would you swap with them again?")
                .with_default(true)
                .prompt()?
        };
        (Some(comment), again)
    };

    let feedback: Feedback = client.post(
        &format!("/requests/{}/feedback", request_id),
        &CreateFeedbackRequest {
            rating,
            comment,
            would_swap_again,
        },
    )?;

    println!();
    println!("Thanks! You rated this swap {}/5.", feedback.rating);
    println!();
    Ok(())
}

pub fn run_feedback_list(user: Option<String>) -> anyhow::Result<()> {
    let client = api_client()?;

    let user_id = match user {
        Some(id) => id,
        None => client.get::<User>("/me")?.id,
    };

    let received: ReceivedFeedback =
        client.get(&format!("/users/{}/feedback", urlencoding::encode(&user_id)))?;

    println!();
    if received.summary.count == 0 {
        println!("No feedback yet.");
        println!();
        return Ok(());
    }

    println!(
        "Average {:.1}/5 from {} review(s); {} would swap again",
        received.summary.average, received.summary.count, received.summary.would_swap_again
    );
    println!();
    for feedback in &received.feedback {
        let again = if feedback.would_swap_again { "" } else { "  (would not swap again)" };
        println!(
            "  {}/5  {}{}",
            feedback.rating,
            format_relative_time(&feedback.created_at),
            again
        );
        if let Some(comment) = &feedback.comment {
            println!("      \"{comment}\"");
        }
    }
    println!();
    Ok(())
}
