mod models;
mod skill;
mod swap;

pub use models::*;
pub use skill::{ExperienceLevel, SkillType, TimeSlot, Weekday, canonical_set};
pub use swap::{SwapAction, SwapRole, SwapStatus, TransitionError};
