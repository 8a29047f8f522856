use clap::{Args, Parser, Subcommand};
use copy_folder_content::clipboard::{ClipboardSink, StdoutSink, SystemClipboard};
use copy_folder_content::config::{CopierConfig, DEFAULT_MAX_PERSISTED_REFS, DEFAULT_MODEL};
use copy_folder_content::logger::initialize_logger;
use copy_folder_content::prompt::{Prompter, TerminalPrompter};
use copy_folder_content::state::{JsonFileState, StateStore};
use copy_folder_content::utils::{expand_patterns, normalize_path};
use copy_folder_content::walker::DEFAULT_MAX_FILES_WITHOUT_CONFIRMATION;
use copy_folder_content::workspace::{LocalWorkspace, Workspace};
use copy_folder_content::{ContentCopier, CopyError, CopyOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    cmd: SubCommands,
}

#[derive(Args, Debug, Clone)]
struct GlobalArgs {
    #[arg(short = 'w', long, global = true, env = "COPY_FOLDER_WORKSPACE", help = "Workspace root that headers are relative to (defaults to the current directory)")]
    workspace: Option<PathBuf>,
    #[arg(long, global = true, env = "COPY_FOLDER_STATE_FILE", help = "Where the collection and last selection are stored")]
    state_file: Option<PathBuf>,
    #[arg(short = 'y', long, global = true, help = "Answer yes to the large folder confirmation")]
    yes: bool,
    #[arg(long, global = true, env = "COPY_FOLDER_MAX_FILES", default_value_t = DEFAULT_MAX_FILES_WITHOUT_CONFIRMATION)]
    max_files: usize,
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_PERSISTED_REFS)]
    max_persisted: usize,
    #[arg(long, global = true, help = "Also strip `#` line comments")]
    hash_comments: bool,
    #[arg(short = 's', long, global = true, help = "Print token statistics after copying")]
    stats: bool,
    #[arg(short = 'M', long, global = true, default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long, global = true, help = "Write the output to stdout instead of the clipboard")]
    stdout: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum SubCommands {
    /// Copy the files directly inside a folder
    Folder(FolderArgs),
    /// Copy every file under a folder
    Recursive(RecursiveArgs),
    /// Copy the files under a folder with the chosen extensions
    ByExtension(ByExtensionArgs),
    /// Copy selected files and folders (folders contribute their direct files)
    Selected(SelectedArgs),
    /// Build up a collection of files across invocations
    #[command(subcommand)]
    Collection(CollectionCommands),
    /// Copy the files of the last copy again
    Last,
}

#[derive(Parser, Debug, Clone)]
struct FolderArgs {
    root: PathBuf,
    #[arg(short = 'p', long, conflicts_with = "ask_prompt")]
    prompt: Option<String>,
    #[arg(long, help = "Ask for the prompt interactively")]
    ask_prompt: bool,
    #[arg(short = 'c', long)]
    strip_comments: bool,
}

#[derive(Parser, Debug, Clone)]
struct RecursiveArgs {
    root: PathBuf,
    #[arg(short = 'c', long)]
    strip_comments: bool,
}

#[derive(Parser, Debug, Clone)]
struct ByExtensionArgs {
    root: PathBuf,
    #[arg(short = 'e', long = "extension", help = "Extensions to keep, skipping the interactive choice")]
    extensions: Option<Vec<String>>,
}

#[derive(Parser, Debug, Clone)]
struct SelectedArgs {
    #[arg(help = "Files, folders or glob patterns")]
    paths: Vec<String>,
}

#[derive(Subcommand, Debug, Clone)]
enum CollectionCommands {
    /// Add a file (or a folder's direct files) to the collection
    Add { path: PathBuf },
    /// Add to the collection and copy the whole collection
    AddAndCopy { path: PathBuf },
    /// Start a new collection
    New { path: PathBuf },
    /// Copy the collection, keeping it
    Copy,
    /// Copy the collection and clear it
    CopyAndClear,
    /// List the collected files
    Show,
}

#[tokio::main]
async fn main() {
    let cli_args = CliArgs::parse();
    initialize_logger();

    let operation = describe(&cli_args.cmd);
    if let Err(e) = run(cli_args).await {
        eprintln!("Error {}: {}", operation, e);
        std::process::exit(1);
    }
}

async fn run(cli_args: CliArgs) -> Result<(), CopyError> {
    let global = cli_args.global;
    let current_dir = std::env::current_dir()?;
    let workspace_root = match &global.workspace {
        Some(root) => current_dir.join(root),
        None => current_dir.clone(),
    };

    let config = CopierConfig {
        state_file: global.state_file.clone(),
        max_files_without_confirmation: global.max_files,
        max_persisted_refs: global.max_persisted,
        hash_comments: global.hash_comments,
        stats: global.stats,
        model: global.model.clone(),
    };

    let mut prompter = TerminalPrompter {
        assume_yes: global.yes,
        ..Default::default()
    };
    match &cli_args.cmd {
        SubCommands::Folder(args) => prompter.preset_prompt = args.prompt.clone(),
        SubCommands::ByExtension(args) => prompter.preset_extensions = args.extensions.clone(),
        _ => {}
    }

    let workspace: Arc<dyn Workspace> =
        Arc::new(LocalWorkspace::new(Some(workspace_root.clone())));
    let clipboard: Arc<dyn ClipboardSink> = if global.stdout {
        Arc::new(StdoutSink)
    } else {
        Arc::new(SystemClipboard)
    };
    let state: Arc<dyn StateStore> = Arc::new(JsonFileState::new(
        config.state_path(&workspace_root),
        normalize_path(&workspace_root),
    ));
    let prompter: Arc<dyn Prompter> = Arc::new(prompter);

    let copier =
        ContentCopier::restore(config, workspace.clone(), clipboard, prompter.clone(), state)
            .await;

    let outcome = match cli_args.cmd {
        SubCommands::Folder(args) => {
            let prompt = if args.ask_prompt {
                prompter.ask_prompt().await
            } else {
                args.prompt
            };
            copier
                .copy_folder_direct(&workspace.resolve(&args.root), prompt, args.strip_comments)
                .await?
        }
        SubCommands::Recursive(args) => {
            copier
                .copy_folder_recursive(&workspace.resolve(&args.root), args.strip_comments)
                .await?
        }
        SubCommands::ByExtension(args) => {
            copier
                .copy_folder_by_extension(&workspace.resolve(&args.root))
                .await?
        }
        SubCommands::Selected(args) => {
            let selection: Vec<_> = expand_patterns(&args.paths, &workspace_root)?
                .iter()
                .map(|path| workspace.resolve(path))
                .collect();
            copier.copy_selected(&selection).await?
        }
        SubCommands::Collection(CollectionCommands::Add { path }) => {
            copier.collection_add(&workspace.resolve(&path)).await?
        }
        SubCommands::Collection(CollectionCommands::AddAndCopy { path }) => {
            copier.collection_add_and_copy(&workspace.resolve(&path)).await?
        }
        SubCommands::Collection(CollectionCommands::New { path }) => {
            copier.collection_start_new(&workspace.resolve(&path)).await?
        }
        SubCommands::Collection(CollectionCommands::Copy) => copier.collection_copy().await?,
        SubCommands::Collection(CollectionCommands::CopyAndClear) => {
            copier.collection_copy_and_clear().await?
        }
        SubCommands::Collection(CollectionCommands::Show) => {
            for file in copier.collection_contents().await {
                println!("{}", copier.workspace().relative_path(&file));
            }
            return Ok(());
        }
        SubCommands::Last => copier.copy_last_selection().await?,
    };

    report(&outcome, global.stdout);
    Ok(())
}

fn report(outcome: &CopyOutcome, to_stdout: bool) {
    let target = if to_stdout { "stdout" } else { "clipboard" };
    match outcome {
        CopyOutcome::Copied(summary) => {
            info!(
                "Copied {} files ({} characters) to {}",
                summary.files, summary.chars, target
            );
            if summary.failed > 0 {
                info!("{} files could not be read", summary.failed);
            }
        }
        CopyOutcome::Updated { added, total } => {
            info!("Added {} files to the collection ({} total)", added, total);
        }
        CopyOutcome::Cancelled(reason) => info!("{}", reason),
    }
}

fn describe(cmd: &SubCommands) -> &'static str {
    match cmd {
        SubCommands::Folder(_) => "copying folder",
        SubCommands::Recursive(_) | SubCommands::ByExtension(_) => "copying folder recursively",
        SubCommands::Selected(_) => "copying selected items",
        SubCommands::Collection(CollectionCommands::Add { .. })
        | SubCommands::Collection(CollectionCommands::New { .. }) => "updating collection",
        SubCommands::Collection(_) => "copying collection",
        SubCommands::Last => "copying last selection",
    }
}
