//! CLI tool for converting PhotoStory projects into multilingual Bloom books.

mod audio;
mod convert;
mod hydrate;

use anyhow::{Context, Result};
use bloom_photostory::PROJECT_FILE_NAME;
use clap::Parser;
use convert::{join_languages, ConversionOptions, Converter};
use hydrate::BloomHydrator;
use std::fs;
use std::path::{Path, PathBuf};

/// Convert PhotoStory projects into multilingual Bloom books.
#[derive(Parser, Debug)]
#[command(name = "ps2bloom")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// project.xml, a directory containing one, or a directory of project directories
    input: PathBuf,

    /// Word documents with the book text, one per language (default: the .docx files next to project.xml)
    #[arg(short, long)]
    docx: Vec<PathBuf>,

    /// Directory the book is created in
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Book name (default: the project name)
    #[arg(short, long)]
    name: Option<String>,

    /// Project code prefixed to titles
    #[arg(short, long)]
    code: Option<String>,

    /// Bloom executable used to hydrate the converted book
    #[arg(short, long)]
    bloom: Option<PathBuf>,

    /// Replace books that already exist
    #[arg(long)]
    overwrite: bool,

    /// Put the source reference above each page's text
    #[arg(short = 'r', long)]
    include_references: bool,

    /// Tag to write into meta.json (repeatable)
    #[arg(short, long)]
    tag: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let projects = find_projects(&args.input)?;
    if projects.is_empty() {
        anyhow::bail!("No {} found under {}", PROJECT_FILE_NAME, args.input.display());
    }
    if projects.len() > 1 && args.name.is_some() {
        log::warn!("Ignoring --name for a batch of {} projects", projects.len());
    }

    let mut converter = Converter::new();
    if let Some(bloom) = &args.bloom {
        converter = converter.with_hydrator(Box::new(BloomHydrator::new(bloom)));
    }

    let mut failures = 0;
    for project_xml in &projects {
        if args.verbose {
            eprintln!("Processing: {}", project_xml.display());
        }

        let result = build_options(&args, project_xml, projects.len() > 1)
            .and_then(|options| converter.convert(project_xml, &options).map_err(Into::into));

        match result {
            Ok(report) => {
                println!("Successfully converted {}", report.title);
                println!("   Directory: {}", report.directory.display());
                println!("   Languages: {}", join_languages(&report.languages));
                if !report.excluded.is_empty() {
                    println!("   Excluded (out of sync): {}", join_languages(&report.excluded));
                }
                if args.bloom.is_some() && !report.hydrated {
                    println!("   Warning: unable to hydrate {}", report.title);
                }
                println!();
            }
            Err(e) => {
                failures += 1;
                log::error!("Failed to convert {}: {:#}", project_xml.display(), e);
                eprintln!("Error: {:#}", e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} projects failed to convert", failures, projects.len());
    }

    Ok(())
}

/// Resolve the input argument to the project files to convert.
fn find_projects(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let direct = input.join(PROJECT_FILE_NAME);
    if direct.is_file() {
        return Ok(vec![direct]);
    }

    // Batch: every child directory holding a project file
    let mut projects = Vec::new();
    for entry in fs::read_dir(input)
        .with_context(|| format!("Failed to read directory {}", input.display()))?
    {
        let path = entry?.path().join(PROJECT_FILE_NAME);
        if path.is_file() {
            projects.push(path);
        }
    }
    projects.sort();
    Ok(projects)
}

/// Build the options for one project of the run.
fn build_options(args: &Args, project_xml: &Path, batch: bool) -> Result<ConversionOptions> {
    let documents = if args.docx.is_empty() || batch {
        let dir = project_xml.parent().unwrap_or_else(|| Path::new("."));
        find_documents(dir)?
    } else {
        args.docx.clone()
    };

    Ok(ConversionOptions {
        destination: args.output.clone(),
        project_name: if batch { None } else { args.name.clone() },
        project_code: args.code.clone(),
        documents,
        overwrite: args.overwrite,
        include_references: args.include_references,
        tags: args.tag.clone(),
    })
}

/// The .docx files in a directory, skipping Word's lock files.
fn find_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        let path = entry?.path();
        let is_docx = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
        let is_lock_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("~$"));
        if is_docx && !is_lock_file {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_projects_single_file_and_dir() {
        let dir = TempDir::new().unwrap();
        let xml = dir.path().join(PROJECT_FILE_NAME);
        fs::write(&xml, "<MSPhotoStoryProject/>").unwrap();

        assert_eq!(find_projects(&xml).unwrap(), vec![xml.clone()]);
        assert_eq!(find_projects(dir.path()).unwrap(), vec![xml]);
    }

    #[test]
    fn test_find_projects_batch() {
        let dir = TempDir::new().unwrap();
        for name in ["Noah", "Creation", "Empty"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("Noah").join(PROJECT_FILE_NAME), "").unwrap();
        fs::write(dir.path().join("Creation").join(PROJECT_FILE_NAME), "").unwrap();

        let projects = find_projects(dir.path()).unwrap();
        assert_eq!(
            projects,
            vec![
                dir.path().join("Creation").join(PROJECT_FILE_NAME),
                dir.path().join("Noah").join(PROJECT_FILE_NAME),
            ]
        );
    }

    #[test]
    fn test_find_documents_skips_lock_files() {
        let dir = TempDir::new().unwrap();
        for name in ["Creation English.docx", "~$eation English.docx", "notes.txt", "Creation Spanish.DOCX"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let documents = find_documents(dir.path()).unwrap();
        assert_eq!(
            documents,
            vec![
                dir.path().join("Creation English.docx"),
                dir.path().join("Creation Spanish.DOCX"),
            ]
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "ps2bloom",
            "Creation",
            "--docx",
            "a English.docx",
            "--docx",
            "a Spanish.docx",
            "-c",
            "ABC123",
            "-r",
            "--overwrite",
        ])
        .unwrap();

        assert_eq!(args.docx.len(), 2);
        assert_eq!(args.code.as_deref(), Some("ABC123"));
        assert!(args.include_references);
        assert!(args.overwrite);
        assert_eq!(args.output, PathBuf::from("."));
    }
}
