use std::env;
use std::path::{Path, PathBuf};

use crate::api::directory::{download_directories, DIRECTORY_CDN};
use crate::config::{load_settings, Settings, DEFAULT_SETTINGS_PATH};
use crate::merge::{merge_directory, SortMode, DEFAULT_MERGED_FILE};
use crate::runner::{render_export, run_batch};
use crate::session::BrowserLogin;

const USAGE: &str = "usage: exia <run|render|merge|directory>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Run,
    Render,
    Merge,
    Directory,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("run") => Some(Command::Run),
        Some("render") => Some(Command::Render),
        Some("merge") => Some(Command::Merge),
        Some("directory") => Some(Command::Directory),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Run) => handle_run(args),
        Some(Command::Render) => handle_render(args),
        Some(Command::Merge) => handle_merge(args),
        Some(Command::Directory) => handle_directory(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Value following `--name`, if any.
fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == name)
        .and_then(|idx| args.get(idx + 1))
        .map(String::as_str)
}

/// Arguments after the subcommand that are neither flags nor flag values.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args.iter().skip(2) {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            skip_next = true;
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

fn settings() -> Option<Settings> {
    let path = env::var("EXIA_CONFIG").unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
    match load_settings(&path) {
        Ok(settings) => Some(settings),
        Err(err) => {
            eprintln!("{err}");
            None
        }
    }
}

fn runtime() -> Option<tokio::runtime::Runtime> {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => Some(rt),
        Err(err) => {
            eprintln!("failed to start async runtime: {err}");
            None
        }
    }
}

fn handle_run(args: &[String]) -> i32 {
    let Some(mut settings) = settings() else {
        return 1;
    };
    if let Some(path) = positional(args).first() {
        settings.accounts_path = PathBuf::from(path);
    }
    let Some(rt) = runtime() else {
        return 1;
    };

    let login = BrowserLogin::from_settings(&settings);
    let report = match rt.block_on(run_batch(&settings, &login)) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("run failed: {err}");
            return 1;
        }
    };

    for path in report.written.iter().filter(|p| has_extension(p, "xlsx")) {
        println!("saved {}", path.display());
    }
    println!(
        "processed {} account(s), {} succeeded, {} failed",
        report.processed,
        report.succeeded,
        report.failures.len()
    );
    if report.failures.is_empty() {
        return 0;
    }
    for failure in &report.failures {
        eprintln!("{}: {} ({})", failure.index, failure.name, failure.reason);
    }
    eprintln!("error list written to {}", settings.error_list_path.display());
    1
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

fn handle_render(args: &[String]) -> i32 {
    let positional = positional(args);
    let Some(json_path) = positional.first() else {
        eprintln!("usage: exia render <account.json> [out_dir]");
        return 2;
    };
    let out_dir = match positional.get(1) {
        Some(dir) => PathBuf::from(dir),
        None => match settings() {
            Some(settings) => settings.output_dir,
            None => return 1,
        },
    };

    match render_export(Path::new(json_path), &out_dir) {
        Ok(files) => {
            for path in files {
                println!("saved {}", path.display());
            }
            0
        }
        Err(err) => {
            eprintln!("render failed: {err}");
            1
        }
    }
}

fn handle_merge(args: &[String]) -> i32 {
    let mode = match flag_value(args, "--sort") {
        None => SortMode::default(),
        Some(raw) => match SortMode::parse(raw) {
            Some(mode) => mode,
            None => {
                eprintln!("usage: exia merge [dir] [--sort 1|2|3|4] [--out merged.xlsx]");
                return 2;
            }
        },
    };
    let dir = positional(args)
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let output = flag_value(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| dir.join(DEFAULT_MERGED_FILE));

    match merge_directory(&dir, mode, &output) {
        Ok(report) => {
            println!(
                "merged {} file(s), {} rows, saved to {}",
                report.files.len(),
                report.rows,
                report.output.display()
            );
            0
        }
        Err(err) => {
            eprintln!("merge failed: {err}");
            1
        }
    }
}

fn handle_directory(args: &[String]) -> i32 {
    let out_dir = positional(args)
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let cdn = flag_value(args, "--cdn").unwrap_or(DIRECTORY_CDN);
    let Some(rt) = runtime() else {
        return 1;
    };

    match rt.block_on(download_directories(cdn, &out_dir)) {
        Ok(paths) => {
            for path in paths {
                println!("saved {}", path.display());
            }
            0
        }
        Err(err) => {
            eprintln!("directory download failed: {err}");
            1
        }
    }
}
