use inquire::MultiSelect;

use crate::server::dto::SetAvailabilityRequest;
use crate::types::{Availability, TimeSlot, Weekday};

use super::api_client;

#[must_use]
pub fn format_availability(availability: &Availability) -> String {
    let join = |items: Vec<&str>| {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join(", ")
        }
    };
    format!(
        "{} / {}",
        join(availability.days.iter().map(|d| d.as_str()).collect()),
        join(availability.time_slots.iter().map(|s| s.as_str()).collect())
    )
}

pub fn run_availability_show() -> anyhow::Result<()> {
    let client = api_client()?;
    let availability: Availability = client.get("/availability")?;

    println!();
    println!("Available: {}", format_availability(&availability));
    println!();
    Ok(())
}

pub fn run_availability_set(
    days: Vec<Weekday>,
    slots: Vec<TimeSlot>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let client = api_client()?;

    let (days, time_slots) = if !days.is_empty() || !slots.is_empty() || non_interactive {
        (days, slots)
    } else {
        let days = MultiSelect::new("Days you are available:", Weekday::ALL.to_vec()).prompt()?;
        let slots = MultiSelect::new("Time slots:", TimeSlot::ALL.to_vec()).prompt()?;
        (days, slots)
    };

    let saved: Availability = client.put(
        "/availability",
        &SetAvailabilityRequest { days, time_slots },
    )?;

    println!();
    println!("Availability saved: {}", format_availability(&saved));
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_availability() {
        let availability = Availability {
            id: "a".to_string(),
            user_id: "u".to_string(),
            days: vec![Weekday::Monday, Weekday::Friday],
            time_slots: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(format_availability(&availability), "Monday, Friday / -");
    }
}
