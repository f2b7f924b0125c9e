//! Charm-style CLI prompts using cliclack

use crate::auth;
use crate::browse::{self, NavigationCursor, SelectionInput, SelectionSet};
use crate::error::Error;
use crate::listing::{
    Collection, Entry, EntryKind, ListingProvider, LocalProvider, SourceKind, TemplateProvider,
    TemplateSource,
};
use crate::product::ProductConfig;
use crate::templates::{self, RootManifest, TreeLine, MANIFEST_FILE};
use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Pick a project from a numbered list, then copy it
    Interactive,
    /// Print the projects of the collection
    List,
    /// Copy a whole project
    Init {
        project: String,
        directory: Option<PathBuf>,
    },
    /// Print a project's tree without downloading
    Preview { project: String },
    /// Browse a project and download the picked files
    Get {
        project: String,
        directory: Option<PathBuf>,
    },
    /// Browse the whole collection and download the picked files
    Browse { directory: Option<PathBuf> },
}

/// Arguments for a run
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub action: Action,

    /// Operate on the owner collection (requires verification)
    pub owner: bool,

    /// Read collections from the bundled tree or the remote repository
    pub source: SourceKind,

    /// Local directory to use for collections instead of the bundled one
    pub template_dir: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            action: Action::Interactive,
            owner: false,
            source: SourceKind::Local,
            template_dir: None,
        }
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: RunArgs) -> Result<()> {
    cliclack::intro(format!("{} by {}", config.display_name(), config.author()))?;

    // Step 1: Owner verification
    let collection = if args.owner {
        authenticate(config)?;
        Collection::OwnerTemplates
    } else {
        Collection::Templates
    };

    // Step 2: Setup provider
    let provider = setup_provider(config, collection, &args)?;

    // Step 3: Dispatch
    match args.action {
        Action::Interactive => {
            let project = select_project(&provider).await?;
            init_project(config, &provider, &project, None).await
        }
        Action::List => list_projects(&provider, collection).await,
        Action::Init { project, directory } => {
            init_project(config, &provider, &project, directory).await
        }
        Action::Preview { project } => preview_project(&provider, &project).await,
        Action::Get { project, directory } => {
            let found = templates::ensure_project(&provider, &project).await;
            report_failures(&provider)?;
            found?;
            browse_and_download(&provider, &project, directory).await
        }
        Action::Browse { directory } => browse_and_download(&provider, "", directory).await,
    }
}

fn authenticate<C: ProductConfig>(config: &C) -> Result<()> {
    let verifier = config.owner_verifier();

    let secret = if verifier.requires_secret() {
        cliclack::password("Owner password").mask('▪').interact()?
    } else {
        String::new()
    };

    auth::authorize(verifier.as_ref(), &secret)?;
    cliclack::log::success("Owner mode")?;
    Ok(())
}

fn setup_provider<C: ProductConfig>(
    config: &C,
    collection: Collection,
    args: &RunArgs,
) -> Result<TemplateProvider> {
    // An explicit template directory always means local templates
    let kind = match &args.template_dir {
        Some(_) => SourceKind::Local,
        None => args.source,
    };
    let source =
        TemplateSource::from_config(config, collection, kind, args.template_dir.as_ref())?;

    if args.template_dir.is_some() || kind == SourceKind::Remote {
        cliclack::log::info(format!("Using templates from {}", source.describe()))?;
    }

    TemplateProvider::new(source, config.user_agent())
}

async fn select_project<P: ListingProvider>(provider: &P) -> Result<String> {
    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");

    let projects = templates::list_projects(provider).await;

    if projects.is_empty() {
        spinner.error("No templates found");
        report_failures(provider)?;
        anyhow::bail!("No templates found.");
    }
    spinner.stop(format!("{} templates available", projects.len()));
    report_failures(provider)?;

    let manifest = load_descriptions(provider).await?;

    let mut select = cliclack::select("Select a project");
    for name in &projects {
        let hint = manifest.description(name).unwrap_or_default();
        select = select.item(name.clone(), name, hint);
    }

    Ok(select.interact()?)
}

async fn list_projects<P: ListingProvider>(provider: &P, collection: Collection) -> Result<()> {
    let projects = templates::list_projects(provider).await;
    report_failures(provider)?;

    if projects.is_empty() {
        let message = match collection {
            Collection::Templates => "No projects found.",
            Collection::OwnerTemplates => "No owner projects found.",
        };
        cliclack::outro(message)?;
        return Ok(());
    }

    let manifest = load_descriptions(provider).await?;
    let lines: Vec<String> = projects
        .iter()
        .map(|name| match manifest.description(name) {
            Some(description) => format!("- {}  {}", name.cyan(), description.dimmed()),
            None => format!("- {}", name.cyan()),
        })
        .collect();

    let title = match collection {
        Collection::Templates => "Available projects",
        Collection::OwnerTemplates => "[OWNER] Available owner projects",
    };
    cliclack::note(title, lines.join("\n"))?;
    cliclack::outro(format!("{} project(s)", projects.len()))?;
    Ok(())
}

async fn preview_project<P: ListingProvider>(provider: &P, project: &str) -> Result<()> {
    let found = templates::ensure_project(provider, project).await;
    report_failures(provider)?;
    found?;

    let tree = templates::build_tree(provider, project).await;
    report_failures(provider)?;
    cliclack::note(format!("Previewing {}", project), render_tree(&tree))?;
    cliclack::outro(format!("Run `init {}` to download it", project))?;
    Ok(())
}

async fn init_project<C: ProductConfig, P: ListingProvider>(
    config: &C,
    provider: &P,
    project: &str,
    directory: Option<PathBuf>,
) -> Result<()> {
    let destination = match directory {
        Some(dir) => absolutize(dir),
        None => current_dir().join(project),
    };

    let spinner = cliclack::spinner();
    spinner.start(format!("Downloading {}", project));

    match templates::copy_project(provider, project, &destination).await {
        Ok(written) => {
            spinner.stop(format!("Project downloaded successfully ({} files)", written));
            report_failures(provider)?;
        }
        Err(e) => {
            spinner.error(match &e {
                Error::NotFound(_) => "Project not found.",
                Error::AlreadyExists(_) => "Folder already exists.",
                _ => "Download failed.",
            });
            report_failures(provider)?;
            return Err(e.into());
        }
    }

    cliclack::log::info(format!("Author: {}", config.author()))?;

    let tree = templates::build_tree(&LocalProvider::new(destination.clone()), "").await;
    cliclack::note("Project structure", render_tree(&tree))?;
    cliclack::log::info(open_hint(&destination))?;

    cliclack::outro(format!("Project ready in {}", destination.display()))?;
    Ok(())
}

async fn browse_and_download<P: ListingProvider>(
    provider: &P,
    root: &str,
    directory: Option<PathBuf>,
) -> Result<()> {
    let destination = directory.map(absolutize).unwrap_or_else(current_dir);

    let selection = browse::run_session(provider, root, &mut PromptInput { provider }).await?;

    if selection.is_empty() {
        cliclack::outro("Nothing selected")?;
        return Ok(());
    }

    let spinner = cliclack::spinner();
    spinner.start(format!("Downloading {} file(s)...", selection.len()));

    match templates::download_selection(&selection, provider, &destination).await {
        Ok(written) => spinner.stop(format!(
            "Downloaded {} of {} file(s) into {}",
            written,
            selection.len(),
            destination.display()
        )),
        Err(e) => {
            spinner.error("Download failed.");
            report_failures(provider)?;
            return Err(e.into());
        }
    }
    report_failures(provider)?;

    cliclack::outro("Happy coding!")?;
    Ok(())
}

/// Terminal-backed selection input: a numbered listing and a line prompt
struct PromptInput<'a, P> {
    provider: &'a P,
}

impl<P: ListingProvider> SelectionInput for PromptInput<'_, P> {
    fn read_selection(
        &mut self,
        cursor: &NavigationCursor,
        entries: &[Entry],
        selection: &SelectionSet,
    ) -> Result<String> {
        report_failures(self.provider)?;

        let title = format!("{} ({} selected)", cursor.display_path(), selection.len());
        cliclack::note(title, render_listing(cursor, entries, selection))?;

        let line: String = cliclack::input("Pick numbers (comma separated)")
            .placeholder("0 = up, Enter = download")
            .required(false)
            .interact()?;
        Ok(line)
    }

    fn on_selected(&mut self, added: usize, selection: &SelectionSet) -> Result<()> {
        if added > 0 {
            cliclack::log::info(format!(
                "Added {} file(s), {} selected",
                added,
                selection.len()
            ))?;
        }
        Ok(())
    }
}

/// Report provider failures once no spinner is drawing
fn report_failures<P: ListingProvider>(provider: &P) -> Result<()> {
    for failure in provider.take_failures() {
        cliclack::log::warning(failure.to_string())?;
    }
    Ok(())
}

/// Project descriptions for the picker; a broken manifest only costs the hints
async fn load_descriptions<P: ListingProvider>(provider: &P) -> Result<RootManifest> {
    let manifest = templates::load_manifest(provider).await;
    // Collections may ship without a manifest
    provider.take_failures();

    match manifest {
        Ok(manifest) => Ok(manifest),
        Err(e) => {
            cliclack::log::warning(format!("Failed to parse {}: {}", MANIFEST_FILE, e))?;
            Ok(RootManifest::default())
        }
    }
}

fn open_hint(destination: &Path) -> String {
    format!("Open with: code {}", destination.display())
}

fn render_listing(
    cursor: &NavigationCursor,
    entries: &[Entry],
    selection: &SelectionSet,
) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);

    if !cursor.is_at_root() {
        lines.push(format!("{:>3}. {}", 0, "..".dimmed()));
    }
    if entries.is_empty() {
        lines.push("     (empty)".dimmed().to_string());
    }

    for (i, entry) in entries.iter().enumerate() {
        let label = match entry.kind {
            EntryKind::Directory => format!("{}/", entry.name).cyan().to_string(),
            EntryKind::File if selection.contains(&entry.path) => {
                format!("{} ✔", entry.name).green().to_string()
            }
            EntryKind::File => entry.name.clone(),
        };
        lines.push(format!("{:>3}. {}", i + 1, label));
    }

    lines.join("\n")
}

fn render_tree(tree: &[TreeLine]) -> String {
    if tree.is_empty() {
        return "(empty)".dimmed().to_string();
    }

    tree.iter()
        .map(|line| match line.kind {
            EntryKind::Directory => line.render().cyan().to_string(),
            EntryKind::File => line.render().green().to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        current_dir().join(path)
    }
}
