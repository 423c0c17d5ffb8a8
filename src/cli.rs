//! CLI definitions and dispatch for the `wellnest` binary.
//!
//! One subcommand group per subsystem, clap-derived, all routed through the
//! [`Dashboard`] facade so the CLI stays the same thin layer any other UI
//! would be.

use crate::core::error::WellnestError;
use crate::core::store::Store;
use crate::core::time;
use crate::subsystems::accounts::{ProfilePatch, UserProfile, bmi_category, get_profile};
use crate::subsystems::activity::ActivityEntry;
use crate::subsystems::notify::NotificationPort;
use crate::subsystems::session::Dashboard;
use crate::subsystems::verification::PendingRegistration;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[clap(
    name = "wellnest",
    version = env!("CARGO_PKG_VERSION"),
    about = "WellNest health tracker: verified accounts, a daily activity ledger, and achievement badges."
)]
pub struct Cli {
    /// Store root directory holding the database, audit log, and outbox.
    #[clap(long, global = true, default_value = ".wellnest")]
    pub root: String,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Registration, verification, login, and profile edits.
    Account(AccountCli),
    /// The daily activity ledger.
    Activity(ActivityCli),
    /// Achievement badges.
    Badges(BadgesCli),
}

#[derive(Parser, Debug)]
pub struct AccountCli {
    #[clap(subcommand)]
    pub command: AccountCommand,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Start a registration: validates the form and sends a 6-digit code.
    Register {
        #[clap(long)]
        email: String,
        #[clap(long)]
        username: String,
        #[clap(long)]
        password: String,
        #[clap(long)]
        age: i64,
        /// Height in centimeters.
        #[clap(long)]
        height: f64,
        /// Weight in kilograms.
        #[clap(long)]
        weight: f64,
    },
    /// Confirm the emailed code and create the account.
    Confirm {
        #[clap(long)]
        email: String,
        #[clap(long)]
        code: String,
    },
    /// Resend the verification code (60-second cooldown).
    Resend {
        #[clap(long)]
        email: String,
    },
    /// Abandon an in-flight registration.
    Abandon {
        #[clap(long)]
        email: String,
    },
    /// Check credentials and show the profile.
    Login {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    /// Edit profile fields; BMI is recomputed.
    Update {
        #[clap(long)]
        email: String,
        #[clap(long)]
        username: Option<String>,
        #[clap(long)]
        age: Option<i64>,
        #[clap(long)]
        height: Option<f64>,
        #[clap(long)]
        weight: Option<f64>,
    },
    /// Show a stored profile.
    Show {
        #[clap(long)]
        email: String,
    },
}

#[derive(Parser, Debug)]
pub struct ActivityCli {
    #[clap(subcommand)]
    pub command: ActivityCommand,
}

#[derive(Subcommand, Debug)]
pub enum ActivityCommand {
    /// Log one day's activity.
    Log {
        #[clap(long)]
        email: String,
        /// Calendar date, YYYY-MM-DD.
        #[clap(long)]
        date: NaiveDate,
        #[clap(long)]
        steps: i64,
        #[clap(long)]
        calories: i64,
        #[clap(long)]
        sleep: f64,
    },
    /// List every logged entry.
    List {
        #[clap(long)]
        email: String,
        #[clap(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Clear the whole ledger for a user.
    Reset {
        #[clap(long)]
        email: String,
    },
    /// Entry count and averages.
    Summary {
        #[clap(long)]
        email: String,
    },
}

#[derive(Parser, Debug)]
pub struct BadgesCli {
    #[clap(subcommand)]
    pub command: BadgesCommand,
}

#[derive(Subcommand, Debug)]
pub enum BadgesCommand {
    /// List the badges a user has earned.
    List {
        #[clap(long)]
        email: String,
    },
}

pub fn run<N: NotificationPort>(
    dashboard: &Dashboard<N>,
    command: Command,
) -> Result<(), WellnestError> {
    match command {
        Command::Account(cli) => run_account_cli(dashboard, cli),
        Command::Activity(cli) => run_activity_cli(dashboard, cli),
        Command::Badges(cli) => run_badges_cli(dashboard, cli),
    }
}

fn run_account_cli<N: NotificationPort>(
    dashboard: &Dashboard<N>,
    cli: AccountCli,
) -> Result<(), WellnestError> {
    match cli.command {
        AccountCommand::Register {
            email,
            username,
            password,
            age,
            height,
            weight,
        } => {
            let pending = PendingRegistration {
                email: email.clone(),
                username,
                password,
                age,
                height_cm: height,
                weight_kg: weight,
            };
            let session = dashboard.start_registration(&pending, time::now_epoch_secs())?;
            println!(
                "Verification code sent to {} (expires in {}s). Confirm with: wellnest account confirm --email {} --code <CODE>",
                email,
                session.seconds_until_expiry(time::now_epoch_secs()),
                email
            );
        }
        AccountCommand::Confirm { email, code } => {
            let profile = dashboard.confirm_code(&email, &code, time::now_epoch_secs())?;
            println!(
                "Account created for {}. You can now login.",
                profile.email
            );
        }
        AccountCommand::Resend { email } => {
            let session = dashboard.resend_code(&email, time::now_epoch_secs())?;
            println!(
                "New code sent to {} (expires in {}s).",
                email,
                session.seconds_until_expiry(time::now_epoch_secs())
            );
        }
        AccountCommand::Abandon { email } => {
            dashboard.abandon_registration(&email)?;
            println!("Registration for {} abandoned.", email);
        }
        AccountCommand::Login { email, password } => {
            let profile = dashboard.login(&email, &password)?;
            println!("Welcome back, {}!", profile.username);
            print_profile(&profile);
        }
        AccountCommand::Update {
            email,
            username,
            age,
            height,
            weight,
        } => {
            let patch = ProfilePatch {
                username,
                age,
                height_cm: height,
                weight_kg: weight,
            };
            let profile = dashboard.update_profile(&email, &patch)?;
            println!("Profile updated.");
            print_profile(&profile);
        }
        AccountCommand::Show { email } => {
            let profile = get_profile(dashboard.store(), &email)?;
            print_profile(&profile);
        }
    }
    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!("Email:    {}", profile.email);
    println!("Username: {}", profile.username);
    println!("Age:      {}", profile.age);
    println!("Height:   {} cm", profile.height_cm);
    println!("Weight:   {} kg", profile.weight_kg);
    println!(
        "BMI:      {:.1} ({})",
        profile.bmi,
        bmi_category(profile.bmi)
    );
}

fn run_activity_cli<N: NotificationPort>(
    dashboard: &Dashboard<N>,
    cli: ActivityCli,
) -> Result<(), WellnestError> {
    match cli.command {
        ActivityCommand::Log {
            email,
            date,
            steps,
            calories,
            sleep,
        } => {
            let entry = ActivityEntry {
                date,
                steps,
                calories,
                sleep_hours: sleep,
            };
            let earned = dashboard.log_activity(&email, &entry)?;
            println!("Activity logged for {}.", date);
            for badge in earned {
                println!("Achievement unlocked: {}", badge.label());
            }
        }
        ActivityCommand::List { email, format } => {
            let mut entries = dashboard.list_activity(&email)?;
            entries.sort_by_key(|e| e.date);
            match format {
                OutputFormat::Json => {
                    let rendered = serde_json::to_string_pretty(&entries)
                        .map_err(|e| WellnestError::CorruptRecord(e.to_string()))?;
                    println!("{}", rendered);
                }
                OutputFormat::Text => {
                    for e in entries {
                        println!(
                            "{}  steps={}  calories={}  sleep={}h",
                            e.date, e.steps, e.calories, e.sleep_hours
                        );
                    }
                }
            }
        }
        ActivityCommand::Reset { email } => {
            dashboard.reset_activity(&email)?;
            println!("Activity log cleared for {}.", email);
        }
        ActivityCommand::Summary { email } => {
            let s = dashboard.activity_summary(&email)?;
            println!("Entries:      {}", s.entries);
            println!("Avg steps:    {:.0}", s.avg_steps);
            println!("Avg calories: {:.0}", s.avg_calories);
            println!("Avg sleep:    {:.1}h", s.avg_sleep_hours);
        }
    }
    Ok(())
}

fn run_badges_cli<N: NotificationPort>(
    dashboard: &Dashboard<N>,
    cli: BadgesCli,
) -> Result<(), WellnestError> {
    match cli.command {
        BadgesCommand::List { email } => {
            let badges = dashboard.current_badges(&email)?;
            if badges.is_empty() {
                println!("No achievements yet. Start logging activities!");
            } else {
                for badge in badges {
                    println!("{}", badge.label());
                }
            }
        }
    }
    Ok(())
}
