//! Sheet Renderer: account model → styled grid → xlsx workbook.

pub mod grid;
mod labels;
pub mod layout;
mod xlsx;

use std::path::PathBuf;

pub use grid::{BorderLine, Cell, CellRange, CellStyle, CellValue, Grid};
pub use labels::{labels, Labels};
pub use layout::{render_account, FIRST_DATA_ROW, HEADER_ROWS};
pub use xlsx::{read_snapshot, read_xlsx_values, snapshot_path, write_snapshot, write_xlsx};

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("xlsx write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("xlsx read failed: {0}")]
    Read(#[from] calamine::Error),
    #[error("{0} has no worksheet")]
    NoWorksheet(PathBuf),
    #[error("grid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
