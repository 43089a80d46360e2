use crate::types::{ExperienceLevel, ProfileWithSkills, SkillType};

use super::api_client;
use super::commands::LevelArg;
use super::http_client::PaginatedResponse;

fn browse_path(
    search: Option<&str>,
    location: Option<&str>,
    experience: Option<ExperienceLevel>,
    cursor: Option<&str>,
) -> String {
    let mut params = Vec::new();
    if let Some(q) = search {
        params.push(format!("q={}", urlencoding::encode(q)));
    }
    if let Some(l) = location {
        params.push(format!("location={}", urlencoding::encode(l)));
    }
    if let Some(e) = experience {
        params.push(format!("experience={}", e.as_str()));
    }
    if let Some(c) = cursor {
        params.push(format!("cursor={}", urlencoding::encode(c)));
    }

    if params.is_empty() {
        "/profiles".to_string()
    } else {
        format!("/profiles?{}", params.join("&"))
    }
}

fn skill_names(entry: &ProfileWithSkills, skill_type: SkillType) -> String {
    let names: Vec<&str> = entry
        .skills_of(skill_type)
        .map(|s| s.skill_name.as_str())
        .collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

pub fn run_browse(
    search: Option<String>,
    location: Option<String>,
    experience: Option<LevelArg>,
) -> anyhow::Result<()> {
    let client = api_client()?;
    let experience = experience.map(ExperienceLevel::from);

    let mut profiles = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page: PaginatedResponse<ProfileWithSkills> = client.get_raw(&browse_path(
            search.as_deref(),
            location.as_deref(),
            experience,
            cursor.as_deref(),
        ))?;
        profiles.extend(page.data);
        if !page.has_more {
            break;
        }
        cursor = page.next_cursor;
        if cursor.is_none() {
            break;
        }
    }

    if profiles.is_empty() {
        println!("No profiles found. Try adjusting your search filters.");
        return Ok(());
    }

    println!();
    for entry in &profiles {
        let profile = &entry.profile;
        match &profile.location {
            Some(location) => println!("{}  ({})", profile.full_name, location),
            None => println!("{}", profile.full_name),
        }
        println!("  User ID: {}", profile.user_id);
        println!("  Offers:  {}", skill_names(entry, SkillType::Offering));
        println!("  Wants:   {}", skill_names(entry, SkillType::Wanted));
        println!();
    }
    println!("{} profile(s)", profiles.len());
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_path_encodes_filters() {
        assert_eq!(browse_path(None, None, None, None), "/profiles");
        assert_eq!(
            browse_path(
                Some("web dev"),
                Some("San Francisco"),
                Some(ExperienceLevel::Expert),
                None
            ),
            "/profiles?q=web%20dev&location=San%20Francisco&experience=Expert"
        );
        assert_eq!(browse_path(None, None, None, Some("abc")), "/profiles?cursor=abc");
    }
}
