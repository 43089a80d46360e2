use inquire::Text;

use crate::server::dto::CreateSkillRequest;
use crate::types::{ExperienceLevel, Skill, SkillType};

use super::api_client;
use super::commands::{LevelArg, SkillTypeArg};
use super::pickers::{confirm_action, select, short_id};

struct SkillDisplay(Skill);

impl std::fmt::Display for SkillDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}, {}]",
            self.0.skill_name, self.0.skill_type, self.0.experience_level
        )
    }
}

fn print_skills(skills: &[Skill]) {
    if skills.is_empty() {
        println!("No skills found.");
        return;
    }
    println!();
    for skill in skills {
        let star = if skill.is_priority { " *" } else { "" };
        println!(
            "  {}  {:<9} {} ({}){}",
            short_id(&skill.id),
            skill.skill_type,
            skill.skill_name,
            skill.experience_level,
            star
        );
        if let Some(description) = &skill.description {
            println!("            {description}");
        }
    }
    println!();
}

pub fn run_skill_list(skill_type: Option<SkillTypeArg>) -> anyhow::Result<()> {
    let client = api_client()?;

    let path = match skill_type.map(SkillType::from) {
        Some(t) => format!("/skills?skill_type={}", t.as_str()),
        None => "/skills".to_string(),
    };

    let skills: Vec<Skill> = client.get(&path)?;
    print_skills(&skills);
    Ok(())
}

pub fn run_skill_add(
    name: Option<String>,
    level: Option<LevelArg>,
    skill_type: Option<SkillTypeArg>,
    description: Option<String>,
    priority: bool,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let client = api_client()?;

    let skill_type = match skill_type {
        Some(t) => SkillType::from(t),
        None if non_interactive => anyhow::bail!("--type is required in non-interactive mode"),
        None => match select("Skill type:", vec![SkillType::Offering, SkillType::Wanted])? {
            Some(t) => t,
            None => return Ok(()),
        },
    };

    let skill_name = match name {
        Some(n) => n,
        None if non_interactive => anyhow::bail!("--name is required in non-interactive mode"),
        None => Text::new("Skill name:").prompt()?,
    };

    let experience_level = match level {
        Some(l) => ExperienceLevel::from(l),
        None if non_interactive => anyhow::bail!("--level is required in non-interactive mode"),
        None => match select("Experience level:", ExperienceLevel::ALL.to_vec())? {
            Some(l) => l,
            None => return Ok(()),
        },
    };

    let request = CreateSkillRequest {
        skill_name,
        description,
        experience_level,
        skill_type,
        is_priority: priority,
    };

    let skill: Skill = client.post("/skills", &request)?;

    println!();
    println!(
        "Added {} skill \"{}\" ({})",
        skill.skill_type, skill.skill_name, skill.id
    );
    println!();
    Ok(())
}

pub fn run_skill_remove(id: Option<String>, non_interactive: bool, yes: bool) -> anyhow::Result<()> {
    let client = api_client()?;
    let skills: Vec<Skill> = client.get("/skills")?;

    let skill = if let Some(id) = id {
        skills
            .into_iter()
            .find(|s| s.id == id || short_id(&s.id) == id)
            .ok_or_else(|| anyhow::anyhow!("Skill not found: {}", id))?
    } else if non_interactive {
        anyhow::bail!("--id is required in non-interactive mode");
    } else {
        if skills.is_empty() {
            println!("No skills found.");
            return Ok(());
        }
        let options = skills.into_iter().map(SkillDisplay).collect();
        match select("Select skill to remove:", options)? {
            Some(SkillDisplay(skill)) => skill,
            None => return Ok(()),
        }
    };

    let confirmed = confirm_action(
        &format!("Remove skill '{}'?", skill.skill_name),
        yes,
        non_interactive,
    )?;

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    client.delete(&format!("/skills/{}", skill.id))?;

    println!();
    println!("Removed skill '{}'", skill.skill_name);
    println!();
    Ok(())
}
