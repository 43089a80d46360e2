use clap::{Subcommand, ValueEnum};

use crate::types::{ExperienceLevel, SkillType, TimeSlot, Weekday};

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Initialize the server (create database and admin token)
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage access tokens
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Show server status information
    Info {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a new user and optionally a token
    Add {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Username for the new user
        #[arg(long)]
        username: Option<String>,

        /// Create a token for the new user
        #[arg(long)]
        create_token: bool,

        /// Skip interactive prompts (requires --username)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Remove a user and everything they own
    Remove {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// User ID to remove
        #[arg(long)]
        user_id: Option<String>,

        /// Skip interactive prompts (requires --user-id)
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Create a new access token
    Create {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// User ID for the token
        #[arg(long)]
        user_id: Option<String>,

        /// Token expiration in days (omit for no expiration)
        #[arg(long)]
        expires_days: Option<i64>,

        /// Skip interactive prompts (requires --user-id)
        #[arg(long)]
        non_interactive: bool,

        /// List existing tokens instead of creating one
        #[arg(long)]
        list: bool,

        /// Output the token list as JSON
        #[arg(long, requires = "list")]
        json: bool,
    },

    /// Revoke an access token
    Revoke {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Token ID to revoke
        #[arg(long)]
        token_id: Option<String>,

        /// Skip interactive prompts (requires --token-id)
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Configure server URL and authentication token
    Login {
        /// Server URL
        #[arg(long)]
        server: Option<String>,

        /// Authentication token
        #[arg(long)]
        token: Option<String>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Clear stored credentials
    Logout,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show your profile, skills and availability
    Show {
        /// Show another user's public profile instead
        #[arg(long)]
        user_id: Option<String>,
    },

    /// Create or update your profile
    Set {
        /// Full name
        #[arg(long)]
        full_name: Option<String>,

        /// Location (e.g. "Austin, TX"); pass "" to clear
        #[arg(long)]
        location: Option<String>,

        /// Short bio; pass "" to clear
        #[arg(long)]
        bio: Option<String>,

        /// Hide the profile from browse
        #[arg(long, conflicts_with = "public")]
        private: bool,

        /// Show the profile in browse again
        #[arg(long)]
        public: bool,

        /// Profile photo URL; pass "" to clear
        #[arg(long)]
        photo_url: Option<String>,

        /// Skip interactive prompts (requires --full-name on first setup)
        #[arg(long)]
        non_interactive: bool,
    },
}

/// CLI spelling of [`SkillType`].
#[derive(Clone, Copy, ValueEnum)]
pub enum SkillTypeArg {
    Offering,
    Wanted,
}

impl From<SkillTypeArg> for SkillType {
    fn from(arg: SkillTypeArg) -> Self {
        match arg {
            SkillTypeArg::Offering => SkillType::Offering,
            SkillTypeArg::Wanted => SkillType::Wanted,
        }
    }
}

/// CLI spelling of [`ExperienceLevel`].
#[derive(Clone, Copy, ValueEnum)]
pub enum LevelArg {
    Beginner,
    Intermediate,
    Expert,
}

impl From<LevelArg> for ExperienceLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Beginner => ExperienceLevel::Beginner,
            LevelArg::Intermediate => ExperienceLevel::Intermediate,
            LevelArg::Expert => ExperienceLevel::Expert,
        }
    }
}

#[derive(Subcommand)]
pub enum SkillCommands {
    /// List your skills
    List {
        /// Only show skills of this type
        #[arg(long = "type", value_enum)]
        skill_type: Option<SkillTypeArg>,
    },

    /// Add a skill you offer or want
    Add {
        /// Skill name
        #[arg(long)]
        name: Option<String>,

        /// Experience level
        #[arg(long, value_enum)]
        level: Option<LevelArg>,

        /// Offering or wanted
        #[arg(long = "type", value_enum)]
        skill_type: Option<SkillTypeArg>,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Mark as a priority skill
        #[arg(long)]
        priority: bool,

        /// Skip interactive prompts (requires --name, --level, --type)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Remove one of your skills
    Remove {
        /// Skill ID to remove
        #[arg(long)]
        id: Option<String>,

        /// Skip interactive prompts (requires --id)
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AvailabilityCommands {
    /// Show your availability
    Show,

    /// Replace your availability
    Set {
        /// Day you are available (repeatable, e.g. --day Monday --day Friday)
        #[arg(long = "day")]
        days: Vec<Weekday>,

        /// Time slot you are available (repeatable: Morning, Afternoon, Evening)
        #[arg(long = "slot")]
        slots: Vec<TimeSlot>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
}

#[derive(Subcommand)]
pub enum RequestCommands {
    /// Show incoming, outgoing, active and completed swaps
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Propose a swap to another user
    Send {
        /// User ID to send the request to
        #[arg(long)]
        to: Option<String>,

        /// ID of your offering skill
        #[arg(long)]
        offer: Option<String>,

        /// ID of the skill they offer that you want
        #[arg(long)]
        want: Option<String>,

        /// Message to include
        #[arg(long)]
        message: Option<String>,

        /// Skip interactive prompts (requires --to, --offer, --want)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Accept a pending incoming request
    Accept {
        /// Request ID
        #[arg(long)]
        id: Option<String>,

        /// Skip interactive prompts (requires --id)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Reject a pending incoming request
    Reject {
        /// Request ID
        #[arg(long)]
        id: Option<String>,

        /// Skip interactive prompts (requires --id)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Mark an active swap as completed
    Complete {
        /// Request ID
        #[arg(long)]
        id: Option<String>,

        /// Skip interactive prompts (requires --id)
        #[arg(long)]
        non_interactive: bool,
    },
}

#[derive(Subcommand)]
pub enum FeedbackCommands {
    /// Rate a completed swap
    Leave {
        /// Swap request ID
        #[arg(long)]
        request: Option<String>,

        /// Rating from 1 to 5
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..=5))]
        rating: Option<i64>,

        /// Comment
        #[arg(long)]
        comment: Option<String>,

        /// Record that you would not swap with them again
        #[arg(long)]
        no_swap_again: bool,

        /// Skip interactive prompts (requires --request and --rating)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Show feedback a user has received
    List {
        /// User ID (defaults to yourself)
        #[arg(long)]
        user: Option<String>,
    },
}
