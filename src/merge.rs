//! Merger: stacks per-account sheets from one directory into a single workbook.
//!
//! The first sheet is copied whole, header included; every later sheet
//! contributes its data rows only.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::sheet::{
    read_snapshot, read_xlsx_values, snapshot_path, write_snapshot, write_xlsx, CellValue, Grid,
    SheetError, FIRST_DATA_ROW,
};

pub const DEFAULT_MERGED_FILE: &str = "merged.xlsx";
const SKIP_MARKER: &str = "merged";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    NameAsc,
    NameDesc,
    SynchroAsc,
    SynchroDesc,
}

impl SortMode {
    /// Menu numbers `1`..`4` or the mode names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "name" | "name-asc" => Some(Self::NameAsc),
            "2" | "name-desc" => Some(Self::NameDesc),
            "3" | "synchro" | "synchro-asc" => Some(Self::SynchroAsc),
            "4" | "synchro-desc" => Some(Self::SynchroDesc),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("cannot list {path}: {source}")]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no .xlsx files found in {0}")]
    NoSheets(PathBuf),
    #[error("{path}: {source}")]
    Sheet { path: PathBuf, source: SheetError },
}

#[derive(Debug, Clone)]
pub struct SheetSource {
    pub file_name: String,
    pub grid: Grid,
}

impl SheetSource {
    /// Synchro level of the account, cell C4. Missing or non-numeric reads as 0.
    pub fn synchro_level(&self) -> f64 {
        self.grid.value(FIRST_DATA_ROW, 3).as_number().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct MergeReport {
    pub files: Vec<String>,
    pub rows: u32,
    pub output: PathBuf,
}

fn is_candidate(path: &Path) -> bool {
    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    is_xlsx && !name.contains(SKIP_MARKER)
}

/// Loads a sheet, preferring its snapshot sidecar over the workbook values.
pub fn load_sheet(path: &Path) -> Result<Grid, SheetError> {
    if snapshot_path(path).is_file() {
        match read_snapshot(path) {
            Ok(grid) => return Ok(grid),
            Err(err) => warn!("ignoring snapshot for {}: {err}", path.display()),
        }
    }
    read_xlsx_values(path)
}

/// Every `*.xlsx` in `dir` whose name does not contain `merged`, in file name order.
pub fn discover_sheets(dir: &Path) -> Result<Vec<SheetSource>, MergeError> {
    let entries = fs::read_dir(dir).map_err(|source| MergeError::List {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_candidate(path))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let grid = load_sheet(&path).map_err(|source| MergeError::Sheet {
                path: path.clone(),
                source,
            })?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(SheetSource { file_name, grid })
        })
        .collect()
}

pub fn sort_sources(sources: &mut [SheetSource], mode: SortMode) {
    match mode {
        SortMode::NameAsc => sources.sort_by(|a, b| a.file_name.cmp(&b.file_name)),
        SortMode::NameDesc => sources.sort_by(|a, b| b.file_name.cmp(&a.file_name)),
        SortMode::SynchroAsc => {
            sources.sort_by(|a, b| a.synchro_level().total_cmp(&b.synchro_level()))
        }
        SortMode::SynchroDesc => {
            sources.sort_by(|a, b| b.synchro_level().total_cmp(&a.synchro_level()))
        }
    }
}

/// Copies rows `min_row..` of `source` so that `min_row` lands on `target_row`.
/// Returns the number of rows copied.
fn copy_rows(
    target: &mut Grid,
    source: &Grid,
    target_row: u32,
    min_row: u32,
    with_widths: bool,
) -> u32 {
    let max_row = source.max_row();
    if max_row < min_row {
        return 0;
    }
    let shift = |row: u32| row - min_row + target_row;

    for ((row, col), cell) in source.cells().filter(|((row, _), _)| *row >= min_row) {
        target.insert_cell(shift(row), col, cell.clone());
    }
    for range in source.merges().iter().filter(|m| m.first_row >= min_row) {
        let mut moved = *range;
        moved.first_row = shift(range.first_row);
        moved.last_row = shift(range.last_row);
        target.merge(moved);
    }
    for (row, height) in source.row_heights().filter(|(row, _)| *row >= min_row) {
        target.set_row_height(shift(row), height);
    }
    if with_widths {
        for (col, width) in source.column_widths() {
            target.set_column_width(col, width);
        }
    }
    max_row - min_row + 1
}

/// Stacks the sources in order. `None` when there is nothing to merge.
pub fn merge_grids(sources: &[SheetSource]) -> Option<Grid> {
    let first = sources.first()?;
    let mut merged = Grid::new(first.grid.title.clone());
    let mut current_row = 1;

    for (idx, source) in sources.iter().enumerate() {
        let start_row = current_row;
        let (copied, account_row) = if idx == 0 {
            (copy_rows(&mut merged, &source.grid, current_row, 1, true), start_row + 3)
        } else {
            let min_row = FIRST_DATA_ROW;
            (copy_rows(&mut merged, &source.grid, current_row, min_row, false), start_row)
        };

        let cell = merged.set_value(account_row, 1, CellValue::Number((idx + 1) as f64));
        cell.style.centered = true;
        current_row += copied;
    }

    merged.set_freeze(FIRST_DATA_ROW, 3);
    Some(merged)
}

/// Discovers, sorts and merges the sheets of `dir`, writing `output` and its snapshot.
pub fn merge_directory(
    dir: &Path,
    mode: SortMode,
    output: &Path,
) -> Result<MergeReport, MergeError> {
    let mut sources = discover_sheets(dir)?;
    sort_sources(&mut sources, mode);
    let total = sources.len();
    for (idx, source) in sources.iter().enumerate() {
        info!("merging file {}/{}: {}", idx + 1, total, source.file_name);
    }

    let merged = merge_grids(&sources).ok_or_else(|| MergeError::NoSheets(dir.to_path_buf()))?;
    let sheet_err = |source| MergeError::Sheet {
        path: output.to_path_buf(),
        source,
    };
    write_xlsx(&merged, output).map_err(sheet_err)?;
    write_snapshot(&merged, output).map_err(sheet_err)?;

    Ok(MergeReport {
        files: sources.into_iter().map(|s| s.file_name).collect(),
        rows: merged.max_row(),
        output: output.to_path_buf(),
    })
}
