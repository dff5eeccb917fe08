// CLI module for administrative operations requiring server access

pub mod create_admin;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Loan tracker backend
#[derive(Parser, Debug)]
#[command(name = "loan-tracker")]
#[command(about = "Loan tracker backend server and administration CLI", long_about = None)]
pub struct Cli {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Create a verified administrator with a generated password
    CreateAdmin {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,
    },
}

/// Execute a non-server CLI command
///
/// Returns `Ok(false)` when the command is `serve` (or absent) and the caller
/// should start the HTTP server instead.
pub async fn execute_command(
    cli: &Cli,
    app_data: &AppData,
) -> Result<bool, Box<dyn std::error::Error>> {
    match &cli.command {
        None | Some(Commands::Serve) => Ok(false),
        Some(Commands::CreateAdmin { username, email }) => {
            let created = create_admin::create_admin(app_data, username, email).await?;
            create_admin::print_credentials(&created);
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["loan-tracker"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_create_admin_arguments() {
        let cli = Cli::try_parse_from([
            "loan-tracker",
            "create-admin",
            "--username",
            "root",
            "--email",
            "root@example.com",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Commands::CreateAdmin {
                username: "root".to_string(),
                email: "root@example.com".to_string(),
            })
        );
    }

    #[test]
    fn test_create_admin_requires_email() {
        assert!(Cli::try_parse_from(["loan-tracker", "create-admin", "--username", "root"]).is_err());
    }
}
