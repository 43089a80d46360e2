use inquire::Text;

use crate::server::dto::UpsertProfileRequest;
use crate::types::{Profile, ProfileWithSkills, SkillType};

use super::api_client;
use super::availability::format_availability;
use super::pickers::short_id;

pub(super) fn print_profile(view: &ProfileWithSkills) {
    let profile = &view.profile;
    let visibility = if profile.is_public { "public" } else { "private" };

    println!();
    println!("{}  [{}]", profile.full_name, visibility);
    println!("  User ID:   {}", profile.user_id);
    if let Some(location) = &profile.location {
        println!("  Location:  {location}");
    }
    if let Some(photo) = &profile.profile_photo {
        println!("  Photo:     {photo}");
    }
    if let Some(bio) = &profile.bio {
        println!("  Bio:       {bio}");
    }
    if let Some(rating) = &view.rating {
        if rating.count > 0 {
            println!(
                "  Rating:    {:.1}/5 from {} swap(s), {} would swap again",
                rating.average, rating.count, rating.would_swap_again
            );
        }
    }
    if let Some(availability) = &view.availability {
        println!("  Available: {}", format_availability(availability));
    }

    for (label, skill_type) in [("Offers", SkillType::Offering), ("Wants", SkillType::Wanted)] {
        let skills: Vec<_> = view.skills_of(skill_type).collect();
        if skills.is_empty() {
            continue;
        }
        println!();
        println!("  {label}:");
        for skill in skills {
            let star = if skill.is_priority { " *" } else { "" };
            println!(
                "    {}  {} ({}){}",
                short_id(&skill.id),
                skill.skill_name,
                skill.experience_level,
                star
            );
        }
    }
    println!();
}

pub fn run_profile_show(user_id: Option<String>) -> anyhow::Result<()> {
    let client = api_client()?;

    let view: ProfileWithSkills = match user_id {
        Some(id) => client.get(&format!("/profiles/{}", urlencoding::encode(&id)))?,
        None => client.get("/profile")?,
    };

    print_profile(&view);
    Ok(())
}

/// Fields given on the command line. `None` keeps the saved value.
#[derive(Debug, Default)]
pub struct ProfileEdits {
    pub full_name: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub is_public: Option<bool>,
}

/// Builds the full upsert body from the saved profile and the edits.
/// A new profile starts public with no optional fields.
fn merge_profile(
    current: Option<&Profile>,
    full_name: String,
    edits: ProfileEdits,
) -> UpsertProfileRequest {
    UpsertProfileRequest {
        full_name,
        location: edits
            .location
            .or_else(|| current.and_then(|p| p.location.clone())),
        bio: edits.bio.or_else(|| current.and_then(|p| p.bio.clone())),
        is_public: edits
            .is_public
            .or(current.map(|p| p.is_public))
            .unwrap_or(true),
        profile_photo: edits
            .photo_url
            .or_else(|| current.and_then(|p| p.profile_photo.clone())),
    }
}

pub fn run_profile_set(mut edits: ProfileEdits, non_interactive: bool) -> anyhow::Result<()> {
    let client = api_client()?;

    let current: Option<ProfileWithSkills> = client.get_optional("/profile")?;
    let current = current.map(|view| view.profile);

    let full_name = match (edits.full_name.take(), &current) {
        (Some(name), _) => name,
        (None, Some(profile)) if non_interactive => profile.full_name.clone(),
        (None, None) if non_interactive => {
            anyhow::bail!("--full-name is required when creating a profile in non-interactive mode")
        }
        (None, saved) => {
            let prompt = Text::new("Full name:");
            match saved {
                Some(profile) => prompt.with_initial_value(&profile.full_name).prompt()?,
                None => prompt.prompt()?,
            }
        }
    };

    let request = merge_profile(current.as_ref(), full_name, edits);
    let view: ProfileWithSkills = client.put("/profile", &request)?;

    println!();
    println!("Profile saved.");
    print_profile(&view);

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn saved() -> Profile {
        Profile {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            full_name: "Marc Demo".to_string(),
            location: Some("Austin, TX".to_string()),
            bio: Some("Guitarist".to_string()),
            is_public: false,
            profile_photo: Some("https://example.com/marc.png".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let current = saved();
        let req = merge_profile(Some(&current), "Marc D.".to_string(), ProfileEdits::default());

        assert_eq!(req.full_name, "Marc D.");
        assert_eq!(req.location.as_deref(), Some("Austin, TX"));
        assert_eq!(req.bio.as_deref(), Some("Guitarist"));
        assert_eq!(req.profile_photo.as_deref(), Some("https://example.com/marc.png"));
        assert!(!req.is_public);
    }

    #[test]
    fn test_merge_applies_edits() {
        let current = saved();
        let edits = ProfileEdits {
            location: Some(String::new()),
            bio: Some("Drummer".to_string()),
            is_public: Some(true),
            ..Default::default()
        };
        let req = merge_profile(Some(&current), current.full_name.clone(), edits);

        // An empty string is sent through so the server clears the field.
        assert_eq!(req.location.as_deref(), Some(""));
        assert_eq!(req.bio.as_deref(), Some("Drummer"));
        assert!(req.is_public);
    }

    #[test]
    fn test_merge_new_profile_defaults_public() {
        let req = merge_profile(None, "Ana".to_string(), ProfileEdits::default());
        assert!(req.is_public);
        assert!(req.location.is_none());
        assert!(req.bio.is_none());
        assert!(req.profile_photo.is_none());
    }
}
