//! Stand-alone merger: `merge_sheets [dir] [1|2|3|4]` writes `<dir>/merged.xlsx`.

use std::env;
use std::path::PathBuf;

use exia::merge::{merge_directory, SortMode, DEFAULT_MERGED_FILE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let mode = match env::args().nth(2) {
        Some(raw) => SortMode::parse(&raw).ok_or_else(|| format!("unknown sort mode '{raw}'"))?,
        None => SortMode::default(),
    };

    let output = dir.join(DEFAULT_MERGED_FILE);
    let report = merge_directory(&dir, mode, &output)?;
    for (idx, file) in report.files.iter().enumerate() {
        println!("{}/{}: {}", idx + 1, report.files.len(), file);
    }
    println!("merged finished, saved to: {}", report.output.display());
    Ok(())
}
