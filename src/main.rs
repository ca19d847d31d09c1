//! Dartscope binary — thin CLI shell over the [`dartscope`] library crate.

use clap::{CommandFactory, Parser, Subcommand};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{error, info, warn};

use dartscope::render::{self, FileReport};
use dartscope::report::{sidecar_path, IndexReport};
use dartscope::types::ScanConfig;
use dartscope::{apply_dartscope_config, normalize_ext, outline, scan};

// ---------------------------------------------------------------------------
// CLI definition (clap derive)
// ---------------------------------------------------------------------------

/// Structural outliner for Dart/Flutter source trees — one navigable text
/// report of every class, member, and top-level symbol under lib/.
#[derive(Parser)]
#[command(name = "dartscope", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory to index (default: ./lib)
    #[arg(long)]
    lib: Option<PathBuf>,

    /// Assets directory shown in the report's tree section (default: ./assets)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Report output path (default: lib_outline.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extensions to include, with or without dot (repeatable; default: all text files)
    #[arg(long = "ext", value_name = "EXT")]
    ext: Vec<String>,

    /// Also index hidden files and directories
    #[arg(long)]
    no_skip_hidden: bool,

    /// Skip files larger than this many KiB
    #[arg(long, value_name = "KB")]
    max_size_kb: Option<u64>,

    /// Gitignore-style exclusion pattern (repeatable, e.g. "**/*.g.dart")
    #[arg(long = "exclude-glob", value_name = "GLOB")]
    exclude_globs: Vec<String>,

    /// Only include files tracked by the enclosing git repository
    #[arg(long)]
    git_only: bool,

    /// Print the numbered file index to stdout and exit
    #[arg(long)]
    list_only: bool,

    /// Restrict the outline to these index numbers (e.g. "1,4-7,12")
    #[arg(long, value_name = "RANGES")]
    select: Option<String>,

    /// Skip writing the <output>.index.json sidecar
    #[arg(long)]
    no_index_json: bool,

    /// Extract class members (constructors, getters, setters, operators, methods)
    #[arg(long)]
    methods_in_classes: bool,

    /// Also export the full text of the selected files
    #[arg(long)]
    export_content: bool,

    /// Content export path (default: <output>.content.txt)
    #[arg(long, value_name = "PATH")]
    content_output: Option<PathBuf>,

    /// Export content only; skip the outline report
    #[arg(long)]
    content_only: bool,

    /// Wrap each exported file in Markdown ```dart fences
    #[arg(long)]
    code_fences: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dartscope=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "dartscope", &mut std::io::stdout());
        return;
    }

    // ---------------------------------------------------------------------------
    // Configuration: defaults, then .dartscope.toml, then CLI flags
    // ---------------------------------------------------------------------------

    let mut config = ScanConfig::new(PathBuf::from("lib"), PathBuf::from("assets"));
    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        error!(error = %e, "Cannot determine current directory");
        std::process::exit(1);
    });
    apply_dartscope_config(&cwd, &mut config);

    if let Some(lib) = &cli.lib {
        config.lib_dir = lib.clone();
    }
    if let Some(assets) = &cli.assets {
        config.assets_dir = assets.clone();
    }
    if !cli.ext.is_empty() {
        config.extensions = cli.ext.iter().map(|e| normalize_ext(e)).collect();
    }
    config.exclude_globs.extend(cli.exclude_globs.iter().cloned());
    if cli.max_size_kb.is_some() {
        config.max_size_kb = cli.max_size_kb;
    }
    config.skip_hidden = !cli.no_skip_hidden;
    config.git_only = cli.git_only;

    if !config.lib_dir.is_dir() {
        error!(dir = %config.lib_dir.display(), "Directory not found");
        std::process::exit(1);
    }

    // ---------------------------------------------------------------------------
    // Index + selection
    // ---------------------------------------------------------------------------

    let tracked = if config.git_only { Some(dartscope::git::tracked_files(&config.lib_dir)) } else { None };
    let entries = scan::index_files(&config, tracked.as_ref());
    info!(indexed = entries.len(), dir = %config.lib_dir.display(), "Index built");

    if cli.list_only {
        print!("{}", render::render_index_listing(&entries));
        return;
    }

    let selected_nums: Vec<usize> = match &cli.select {
        Some(sel) => {
            let nums = scan::parse_select_ranges(sel, entries.len());
            if nums.is_empty() {
                info!("No valid numbers in --select; nothing to generate");
                return;
            }
            nums
        }
        None => entries.iter().map(|e| e.num).collect(),
    };

    let output = cli.output.clone().unwrap_or_else(|| PathBuf::from("lib_outline.txt"));
    let content_output =
        cli.content_output.clone().unwrap_or_else(|| sidecar_path(&output, ".content.txt"));

    // ---------------------------------------------------------------------------
    // Content-only export: skip the outline entirely
    // ---------------------------------------------------------------------------

    if cli.export_content && cli.content_only {
        let export =
            render::render_content_export(&config.lib_dir, &entries, &selected_nums, cli.code_fences);
        write_file(&content_output, &export);
        if !cli.no_index_json {
            write_index_json(&config, &output, Some(&content_output), &entries, &selected_nums);
        }
        info!(path = %content_output.display(), files = selected_nums.len(), "Content exported");
        return;
    }

    // ---------------------------------------------------------------------------
    // Outline report
    // ---------------------------------------------------------------------------

    let files: Vec<FileReport> = selected_nums
        .par_iter()
        .filter_map(|num| {
            let entry = entries.iter().find(|e| e.num == *num)?;
            let outcome = match scan::read_text(&config.lib_dir.join(&entry.path)) {
                Ok(text) => Ok(outline::outline_text(&text, cli.methods_in_classes)),
                Err(e) => Err(e.to_string()),
            };
            Some(FileReport { num: *num, path: entry.path.clone(), outcome })
        })
        .collect();

    let report = render::render_report(&config, &entries, &selected_nums, &files);
    write_file(&output, &report);

    if !cli.no_index_json {
        write_index_json(&config, &output, None, &entries, &selected_nums);
    }

    if cli.export_content {
        let export =
            render::render_content_export(&config.lib_dir, &entries, &selected_nums, cli.code_fences);
        write_file(&content_output, &export);
        info!(path = %content_output.display(), "Content exported");
    }

    info!(path = %output.display(), "Outline generated");
    info!(indexed = entries.len(), outlined = selected_nums.len(), "Done");
}

fn write_file(path: &std::path::Path, contents: &str) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!(path = %path.display(), error = %e, "Cannot create output directory");
                std::process::exit(1);
            }
        }
    }
    if let Err(e) = std::fs::write(path, contents) {
        error!(path = %path.display(), error = %e, "Cannot write output file");
        std::process::exit(1);
    }
}

fn write_index_json(
    config: &ScanConfig,
    output: &std::path::Path,
    content_output: Option<&std::path::Path>,
    entries: &[dartscope::types::IndexEntry],
    selected_nums: &[usize],
) {
    let report =
        IndexReport::build(&config.lib_dir, output, content_output, entries, selected_nums);
    let json = match report.to_pretty_json() {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "Could not serialize index JSON");
            return;
        }
    };
    let path = sidecar_path(output, ".index.json");
    if let Err(e) = std::fs::write(&path, json) {
        warn!(path = %path.display(), error = %e, "Could not write index JSON");
    }
}
