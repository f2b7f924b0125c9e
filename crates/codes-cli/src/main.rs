//! adityassarode.codes CLI - fetch official code projects by Aditya Sarode

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use template_core::tui::{Action, RunArgs};
use template_core::{
    CredentialVerifier, LockedVerifier, OsUserVerifier, ProductConfig, Sha256Verifier, SourceKind,
};

/// SHA-256 of the owner password
const OWNER_PASSWORD_HASH: &str =
    "eceefe24a6ad788bfe7ae23f015a5f20caf81fe8bbf2472d50afc05dcee7fc14";

/// Environment variable overriding the owner password digest
const OWNER_HASH_ENV: &str = "ADITYASSARODE_OWNER_HASH";

/// Environment variable switching owner checks to the OS login
const OWNER_LOGIN_ENV: &str = "ADITYASSARODE_OWNER_LOGIN";

/// adityassarode.codes product configuration
#[derive(Clone)]
pub struct CodesConfig;

impl ProductConfig for CodesConfig {
    fn name(&self) -> &'static str {
        "adityassarode-codes"
    }

    fn display_name(&self) -> &'static str {
        "adityassarode.codes"
    }

    fn author(&self) -> &'static str {
        "Aditya Sarode"
    }

    fn bundled_dir(&self) -> PathBuf {
        // Installed layout keeps the collections next to the binary
        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        match beside_exe {
            Some(dir) if dir.join("templates").is_dir() => dir,
            _ => PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        }
    }

    fn bundled_dir_env(&self) -> &'static str {
        "ADITYASSARODE_TEMPLATE_DIR"
    }

    fn default_remote_repo(&self) -> &'static str {
        "adityassarode/adityassarode.codes@main"
    }

    fn remote_repo_env(&self) -> &'static str {
        "ADITYASSARODE_REMOTE_REPO"
    }

    fn owner_verifier(&self) -> Box<dyn CredentialVerifier> {
        if let Ok(login) = std::env::var(OWNER_LOGIN_ENV) {
            return Box::new(OsUserVerifier::new(login));
        }

        let digest =
            std::env::var(OWNER_HASH_ENV).unwrap_or_else(|_| OWNER_PASSWORD_HASH.to_string());
        match Sha256Verifier::from_hex(&digest) {
            Some(verifier) => Box::new(verifier),
            None => Box::new(LockedVerifier),
        }
    }

    fn cli_description(&self) -> &'static str {
        "Official code projects by Aditya Sarode"
    }
}

#[derive(Parser, Debug)]
#[command(name = "adityassarode-codes")]
#[command(about = "Official code projects by Aditya Sarode")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    /// Project to download directly, skipping the picker
    pub project: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available projects
    List(SourceArgs),
    /// Download a whole project
    Init(ProjectArgs),
    /// Show a project's structure without downloading
    Preview(PreviewArgs),
    /// Browse a project and download selected files
    Get(ProjectArgs),
    /// Browse all projects and download selected files
    Browse(BrowseArgs),
    /// Owner-only commands (password protected)
    Owner(OwnerArgs),
}

#[derive(Subcommand, Debug)]
pub enum OwnerCommand {
    /// List owner projects
    List(SourceArgs),
    /// Show an owner project's structure
    View(PreviewArgs),
    /// Download a whole owner project
    Get(ProjectArgs),
    /// Browse an owner project and download selected files
    Select(ProjectArgs),
    /// Browse all owner projects and download selected files
    Browse(BrowseArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct SourceArgs {
    /// Where to read templates from
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    /// Local directory to use for templates instead of the bundled ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ProjectArgs {
    /// Project name
    pub project: String,

    /// Destination directory
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(clap::Args, Debug)]
pub struct PreviewArgs {
    /// Project name
    pub project: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(clap::Args, Debug)]
pub struct BrowseArgs {
    /// Destination directory
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(clap::Args, Debug)]
pub struct OwnerArgs {
    #[command(subcommand)]
    pub command: OwnerCommand,
}

impl Args {
    /// Translate parsed arguments into a run request
    pub fn into_run_args(self) -> RunArgs {
        let (action, owner, source) = match self.command {
            None => match self.project {
                Some(project) => (
                    Action::Init {
                        project,
                        directory: None,
                    },
                    false,
                    self.source,
                ),
                None => (Action::Interactive, false, self.source),
            },
            Some(Command::List(source)) => (Action::List, false, source),
            Some(Command::Init(args)) => (init(args.project, args.directory), false, args.source),
            Some(Command::Preview(args)) => (preview(args.project), false, args.source),
            Some(Command::Get(args)) => (get(args.project, args.directory), false, args.source),
            Some(Command::Browse(args)) => (browse(args.directory), false, args.source),
            Some(Command::Owner(owner)) => match owner.command {
                OwnerCommand::List(source) => (Action::List, true, source),
                OwnerCommand::View(args) => (preview(args.project), true, args.source),
                OwnerCommand::Get(args) => (init(args.project, args.directory), true, args.source),
                OwnerCommand::Select(args) => {
                    (get(args.project, args.directory), true, args.source)
                }
                OwnerCommand::Browse(args) => (browse(args.directory), true, args.source),
            },
        };

        RunArgs {
            action,
            owner,
            source: source.source.unwrap_or_default(),
            template_dir: source.template_dir,
        }
    }
}

fn init(project: String, directory: Option<PathBuf>) -> Action {
    Action::Init { project, directory }
}

fn preview(project: String) -> Action {
    Action::Preview { project }
}

fn get(project: String, directory: Option<PathBuf>) -> Action {
    Action::Get { project, directory }
}

fn browse(directory: Option<PathBuf>) -> Action {
    Action::Browse { directory }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = CodesConfig;

    let result = template_core::run(&config, args.into_run_args()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> RunArgs {
        Args::try_parse_from(argv).unwrap().into_run_args()
    }

    #[test]
    fn test_no_args_is_interactive() {
        let run = parse(&["adityassarode-codes"]);
        assert_eq!(run.action, Action::Interactive);
        assert!(!run.owner);
        assert_eq!(run.source, SourceKind::Local);
    }

    #[test]
    fn test_leading_project_downloads_directly() {
        let run = parse(&["adityassarode-codes", "flask-app"]);
        assert_eq!(
            run.action,
            Action::Init {
                project: "flask-app".to_string(),
                directory: None
            }
        );
    }

    #[test]
    fn test_subcommands_win_over_project_name() {
        let run = parse(&["adityassarode-codes", "preview", "flask-app"]);
        assert_eq!(
            run.action,
            Action::Preview {
                project: "flask-app".to_string()
            }
        );
    }

    #[test]
    fn test_get_with_remote_source_and_directory() {
        let run = parse(&[
            "adityassarode-codes",
            "get",
            "flask-app",
            "--source",
            "remote",
            "-d",
            "out",
        ]);
        assert_eq!(
            run.action,
            Action::Get {
                project: "flask-app".to_string(),
                directory: Some(PathBuf::from("out"))
            }
        );
        assert_eq!(run.source, SourceKind::Remote);
    }

    #[test]
    fn test_owner_commands_are_flagged() {
        let run = parse(&["adityassarode-codes", "owner", "select", "iot-dashboard"]);
        assert!(run.owner);
        assert_eq!(
            run.action,
            Action::Get {
                project: "iot-dashboard".to_string(),
                directory: None
            }
        );

        let run = parse(&["adityassarode-codes", "owner", "list"]);
        assert!(run.owner);
        assert_eq!(run.action, Action::List);
    }

    #[test]
    fn test_template_dir_flag() {
        let run = parse(&["adityassarode-codes", "browse", "--template-dir", "dev"]);
        assert_eq!(run.template_dir, Some(PathBuf::from("dev")));
        assert_eq!(run.action, Action::Browse { directory: None });
    }

    #[test]
    fn test_bundled_collections_ship_with_crate() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        assert!(dir.join("templates").is_dir());
        assert!(dir.join("owner_templates").is_dir());
    }

    #[test]
    fn test_default_owner_verifier_uses_digest() {
        let verifier = Sha256Verifier::from_hex(OWNER_PASSWORD_HASH).unwrap();
        assert!(!verifier.verify(""));
        assert!(verifier.requires_secret());
    }
}
