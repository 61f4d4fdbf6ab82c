//! Command-line argument parsing for the pokesocial CLI.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Print usage
    Help,
    /// List Pokédex entries, optionally filtered by a search term
    Pokedex {
        region: Option<String>,
        term: Option<String>,
    },
    /// Show the post feed
    Feed,
    /// Sign in and show the user's own profile
    Profile { email: String },
    /// Sign in and list all users (elevated access only)
    Users { email: String },
    /// Arguments that could not be understood
    Invalid(String),
}

pub const USAGE: &str = "\
usage: pokesocial <command>

commands:
  pokedex [--region R] [TERM]   list Pokédex entries matching TERM
  feed                          show the latest posts
  profile --email EMAIL         sign in and show your profile
  users --email EMAIL           sign in and list users (elevated access)
  --version, -V                 print the version
  --help, -h                    print this message";

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use pokesocial::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["pokesocial".to_string(), "feed".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Feed);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let mut args = args.skip(1);
    let Some(command) = args.next() else {
        return CliCommand::Help;
    };

    match command.as_str() {
        "--version" | "-V" => CliCommand::Version,
        "--help" | "-h" | "help" => CliCommand::Help,
        "feed" => CliCommand::Feed,
        "pokedex" => parse_pokedex(args),
        "profile" => match parse_email(args) {
            Ok(email) => CliCommand::Profile { email },
            Err(message) => CliCommand::Invalid(message),
        },
        "users" => match parse_email(args) {
            Ok(email) => CliCommand::Users { email },
            Err(message) => CliCommand::Invalid(message),
        },
        other => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}

fn parse_pokedex(mut args: impl Iterator<Item = String>) -> CliCommand {
    let mut region = None;
    let mut term: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--region" | "-r" => match args.next() {
                Some(value) => region = Some(value),
                None => return CliCommand::Invalid("--region needs a value".to_string()),
            },
            _ => {
                term = Some(match term {
                    Some(existing) => format!("{} {}", existing, arg),
                    None => arg,
                })
            }
        }
    }
    CliCommand::Pokedex { region, term }
}

fn parse_email(mut args: impl Iterator<Item = String>) -> Result<String, String> {
    while let Some(arg) = args.next() {
        if arg == "--email" || arg == "-e" {
            return args
                .next()
                .filter(|email| !email.is_empty())
                .ok_or_else(|| "--email needs a value".to_string());
        }
    }
    Err("missing --email".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let args: Vec<String> = std::iter::once("pokesocial")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse(&[]), CliCommand::Help);
    }

    #[test]
    fn test_parse_pokedex() {
        assert_eq!(
            parse(&["pokedex"]),
            CliCommand::Pokedex {
                region: None,
                term: None
            }
        );
        assert_eq!(
            parse(&["pokedex", "--region", "johto", "pika"]),
            CliCommand::Pokedex {
                region: Some("johto".to_string()),
                term: Some("pika".to_string())
            }
        );
        assert_eq!(
            parse(&["pokedex", "mr", "mime"]),
            CliCommand::Pokedex {
                region: None,
                term: Some("mr mime".to_string())
            }
        );
    }

    #[test]
    fn test_parse_region_without_value() {
        assert!(matches!(parse(&["pokedex", "--region"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_profile_requires_email() {
        assert_eq!(
            parse(&["profile", "--email", "ash@example.com"]),
            CliCommand::Profile {
                email: "ash@example.com".to_string()
            }
        );
        assert_eq!(
            parse(&["users"]),
            CliCommand::Invalid("missing --email".to_string())
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse(&["battle"]),
            CliCommand::Invalid("unknown command 'battle'".to_string())
        );
    }
}
