mod commands;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "leadsync-cli")]
#[command(about = "HubSpot lead intake with a local Postgres mirror")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Create, update, look up or delete leads
    Lead {
        #[command(subcommand)]
        command: LeadCommands,
    },
    /// Create meetings
    Meeting {
        #[command(subcommand)]
        command: MeetingCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[derive(Debug, Subcommand)]
enum LeadCommands {
    /// Run the lead creation flow and print the tool result
    Create {
        /// Raw agent payload, `{"properties": {...}}` or flat; overrides the field flags
        #[arg(long, conflicts_with_all = ["email", "firstname", "lastname", "phone", "company", "website"])]
        payload: Option<String>,
        #[arg(long, required_unless_present = "payload")]
        email: Option<String>,
        #[arg(long)]
        firstname: Option<String>,
        #[arg(long)]
        lastname: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        website: Option<String>,
    },
    /// Update phone, state or lead status on a HubSpot contact
    Update {
        #[arg(long)]
        lead_id: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Look up the mirrored lead for an email
    Find {
        #[arg(long)]
        email: String,
    },
    /// Delete a HubSpot contact (the local mirror is not touched)
    Delete {
        #[arg(long)]
        hubspot_id: String,
    },
}

#[derive(Debug, Subcommand)]
enum MeetingCommands {
    /// Create a meeting linked to one contact
    Create {
        #[arg(long)]
        contact_id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        /// RFC 3339 or epoch milliseconds
        #[arg(long, value_parser = parse_timestamp)]
        start: DateTime<Utc>,
        #[arg(long, value_parser = parse_timestamp)]
        end: DateTime<Utc>,
    },
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    leadsync_core::meeting::parse_hubspot_timestamp(raw)
        .ok_or_else(|| format!("'{raw}' is neither RFC 3339 nor epoch milliseconds"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("leadsync-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = leadsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => commands::db_ping(&config).await,
            DbCommands::Migrate => commands::db_migrate(&config).await,
        },
        Commands::Lead { command } => match command {
            LeadCommands::Create {
                payload,
                email,
                firstname,
                lastname,
                phone,
                company,
                website,
            } => {
                let payload = match payload {
                    Some(raw) => serde_json::from_str(&raw)?,
                    None => commands::lead_payload(&[
                        ("email", email),
                        ("firstname", firstname),
                        ("lastname", lastname),
                        ("phone", phone),
                        ("company", company),
                        ("website", website),
                    ]),
                };
                commands::lead_create(config, &payload).await
            }
            LeadCommands::Update {
                lead_id,
                phone,
                state,
                status,
            } => {
                let update = leadsync_core::LeadUpdate::with_fields(
                    &lead_id,
                    phone.as_deref(),
                    state.as_deref(),
                    status.as_deref(),
                );
                commands::lead_update(config, &update).await
            }
            LeadCommands::Find { email } => commands::lead_find(&config, &email).await,
            LeadCommands::Delete { hubspot_id } => commands::lead_delete(&config, &hubspot_id).await,
        },
        Commands::Meeting { command } => match command {
            MeetingCommands::Create {
                contact_id,
                title,
                body,
                start,
                end,
            } => {
                let request = leadsync_core::MeetingRequest::for_contact(
                    &contact_id,
                    &title,
                    &body,
                    start,
                    end,
                );
                commands::meeting_create(config, &request).await
            }
        },
    }
}

#[cfg(test)]
mod tests;
