use std::fmt;

use inquire::Text;

use crate::server::dto::CreateSwapRequest;
use crate::types::{
    Direction, ProfileWithSkills, RequestsOverview, Skill, SkillType, SwapRequestDetail,
};

use super::api_client;
use super::http_client::ApiClient;
use super::pickers::{format_relative_time, select, short_id};

struct DetailDisplay(SwapRequestDetail);

impl fmt::Display for DetailDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", describe(&self.0))
    }
}

struct SkillChoice(Skill);

impl fmt::Display for SkillChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0.skill_name, self.0.experience_level)
    }
}

/// One-line summary: who, which skills, and when.
fn describe(detail: &SwapRequestDetail) -> String {
    let who = detail
        .counterpart
        .as_ref()
        .map_or("<unknown user>", |p| p.full_name.as_str());
    let offered = detail
        .offered_skill
        .as_ref()
        .map_or("<deleted skill>", |s| s.skill_name.as_str());
    let wanted = detail
        .wanted_skill
        .as_ref()
        .map_or("<deleted skill>", |s| s.skill_name.as_str());

    let (mine, theirs) = match detail.direction {
        Direction::Outgoing => (offered, wanted),
        Direction::Incoming => (wanted, offered),
    };

    format!(
        "{}  {}: your {} for their {}  ({})",
        short_id(&detail.request.id),
        who,
        mine,
        theirs,
        format_relative_time(&detail.request.created_at)
    )
}

fn print_section(title: &str, details: &[SwapRequestDetail]) {
    println!("{title} ({})", details.len());
    for detail in details {
        println!("  {}", describe(detail));
        if let Some(message) = &detail.request.message {
            println!("      \"{message}\"");
        }
    }
    println!();
}

pub fn run_request_list(json: bool) -> anyhow::Result<()> {
    let client = api_client()?;
    let overview: RequestsOverview = client.get("/requests")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    println!();
    print_section("Incoming", &overview.incoming);
    print_section("Outgoing", &overview.outgoing);
    print_section("Active", &overview.active);
    print_section("Completed", &overview.completed);

    Ok(())
}

fn pick_skill(message: &str, skills: Vec<Skill>) -> anyhow::Result<Option<String>> {
    if skills.is_empty() {
        anyhow::bail!("No offering skills to choose from");
    }
    let options = skills.into_iter().map(SkillChoice).collect();
    Ok(select(message, options)?.map(|choice| choice.0.id))
}

pub fn run_request_send(
    to: Option<String>,
    offer: Option<String>,
    want: Option<String>,
    message: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let client = api_client()?;

    let to = match to {
        Some(id) => id,
        None if non_interactive => anyhow::bail!("--to is required in non-interactive mode"),
        None => Text::new("User ID to send the request to:").prompt()?,
    };

    let offer = match offer {
        Some(id) => id,
        None if non_interactive => anyhow::bail!("--offer is required in non-interactive mode"),
        None => {
            let mine: Vec<Skill> = client.get("/skills?skill_type=offering")?;
            match pick_skill("Skill you will teach:", mine)? {
                Some(id) => id,
                None => return Ok(()),
            }
        }
    };

    let want = match want {
        Some(id) => id,
        None if non_interactive => anyhow::bail!("--want is required in non-interactive mode"),
        None => {
            let theirs: ProfileWithSkills =
                client.get(&format!("/profiles/{}", urlencoding::encode(&to)))?;
            let offered = theirs.skills_of(SkillType::Offering).cloned().collect();
            match pick_skill("Skill you want to learn:", offered)? {
                Some(id) => id,
                None => return Ok(()),
            }
        }
    };

    let request = CreateSwapRequest {
        requested_user_id: to,
        offered_skill_id: offer,
        wanted_skill_id: want,
        message,
    };

    let detail: SwapRequestDetail = client.post("/requests", &request)?;

    println!();
    println!("Swap request sent: {}", describe(&detail));
    println!("  Request ID: {}", detail.request.id);
    println!();
    Ok(())
}

/// Resolves `--id` or offers the requests the action applies to.
fn resolve_request_id(
    client: &ApiClient,
    id: Option<String>,
    non_interactive: bool,
    candidates: impl FnOnce(RequestsOverview) -> Vec<SwapRequestDetail>,
) -> anyhow::Result<Option<String>> {
    if let Some(id) = id {
        return Ok(Some(id));
    }
    if non_interactive {
        anyhow::bail!("--id is required in non-interactive mode");
    }

    let overview: RequestsOverview = client.get("/requests")?;
    let options: Vec<DetailDisplay> = candidates(overview).into_iter().map(DetailDisplay).collect();
    if options.is_empty() {
        println!("No matching requests.");
        return Ok(None);
    }

    Ok(select("Select request:", options)?.map(|d| d.0.request.id))
}

fn run_transition(
    id: Option<String>,
    non_interactive: bool,
    verb: &str,
    done: &str,
    candidates: impl FnOnce(RequestsOverview) -> Vec<SwapRequestDetail>,
) -> anyhow::Result<()> {
    let client = api_client()?;

    let Some(id) = resolve_request_id(&client, id, non_interactive, candidates)? else {
        return Ok(());
    };

    let detail: SwapRequestDetail =
        client.post(&format!("/requests/{}/{}", id, verb), &serde_json::json!({}))?;

    println!();
    println!("Swap request {done}: {}", describe(&detail));
    println!();
    Ok(())
}

pub fn run_request_accept(id: Option<String>, non_interactive: bool) -> anyhow::Result<()> {
    run_transition(id, non_interactive, "accept", "accepted", |o| o.incoming)
}

pub fn run_request_reject(id: Option<String>, non_interactive: bool) -> anyhow::Result<()> {
    run_transition(id, non_interactive, "reject", "rejected", |o| o.incoming)
}

pub fn run_request_complete(id: Option<String>, non_interactive: bool) -> anyhow::Result<()> {
    run_transition(id, non_interactive, "complete", "completed", |o| o.active)
}
