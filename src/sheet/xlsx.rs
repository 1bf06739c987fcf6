//! Workbook IO: styled xlsx output, grid snapshot sidecars, value-only import.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::Reader;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook};

use super::grid::{BorderLine, CellStyle, CellValue, Col, Grid};
use super::SheetError;

const SNAPSHOT_EXTENSION: &str = "sheet.json";
const FALLBACK_SHEET_NAME: &str = "Sheet1";

/// `foo.xlsx` → `foo.sheet.json`.
pub fn snapshot_path(xlsx_path: &Path) -> PathBuf {
    xlsx_path.with_extension(SNAPSHOT_EXTENSION)
}

fn border(line: BorderLine) -> FormatBorder {
    match line {
        BorderLine::Thin => FormatBorder::Thin,
        BorderLine::Medium => FormatBorder::Medium,
    }
}

fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();
    if style.bold {
        format = format.set_bold();
    }
    if let Some(color) = style.font_color {
        format = format.set_font_color(Color::RGB(color));
    }
    if let Some(name) = &style.font_name {
        format = format.set_font_name(name);
    }
    if let Some(fill) = style.fill {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(fill));
    }
    let borders = &style.borders;
    if let Some(line) = borders.top {
        format = format.set_border_top(border(line)).set_border_top_color(Color::Black);
    }
    if let Some(line) = borders.bottom {
        format = format
            .set_border_bottom(border(line))
            .set_border_bottom_color(Color::Black);
    }
    if let Some(line) = borders.left {
        format = format.set_border_left(border(line)).set_border_left_color(Color::Black);
    }
    if let Some(line) = borders.right {
        format = format
            .set_border_right(border(line))
            .set_border_right_color(Color::Black);
    }
    if style.centered {
        format = format
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
    }
    if let Some(pattern) = &style.number_format {
        format = format.set_num_format(pattern);
    }
    format
}

/// Writes `grid` as a single-sheet workbook. Parent directories are created.
pub fn write_xlsx(grid: &Grid, path: &Path) -> Result<(), SheetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let name = if grid.title.is_empty() {
        FALLBACK_SHEET_NAME
    } else {
        grid.title.as_str()
    };
    worksheet.set_name(name)?;

    for (col, width) in grid.column_widths() {
        worksheet.set_column_width(col - 1, width)?;
    }
    for (row, height) in grid.row_heights() {
        worksheet.set_row_height(row - 1, height)?;
    }

    for range in grid.merges() {
        let anchor = grid
            .cell(range.first_row, range.first_col)
            .map(|c| to_format(&c.style))
            .unwrap_or_default();
        worksheet.merge_range(
            range.first_row - 1,
            range.first_col - 1,
            range.last_row - 1,
            range.last_col - 1,
            "",
            &anchor,
        )?;
    }

    for ((row, col), cell) in grid.cells() {
        let format = to_format(&cell.style);
        let (row, col) = (row - 1, col - 1);
        match &cell.value {
            CellValue::Blank => {
                worksheet.write_blank(row, col, &format)?;
            }
            CellValue::Text(text) => {
                worksheet.write_string_with_format(row, col, text, &format)?;
            }
            CellValue::Number(number) => {
                worksheet.write_number_with_format(row, col, *number, &format)?;
            }
        }
    }

    if let Some((row, col)) = grid.freeze() {
        worksheet.set_freeze_panes(row - 1, col - 1)?;
    }

    workbook.save(path)?;
    Ok(())
}

pub fn write_snapshot(grid: &Grid, xlsx_path: &Path) -> Result<PathBuf, SheetError> {
    let path = snapshot_path(xlsx_path);
    fs::write(&path, serde_json::to_string(grid)?)?;
    Ok(path)
}

pub fn read_snapshot(xlsx_path: &Path) -> Result<Grid, SheetError> {
    let path = snapshot_path(xlsx_path);
    let text = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&text)?)
}

fn import_value(data: &calamine::Data) -> CellValue {
    match data {
        calamine::Data::Empty => CellValue::Blank,
        calamine::Data::String(s) if s.is_empty() => CellValue::Blank,
        calamine::Data::String(s) => CellValue::Text(s.clone()),
        calamine::Data::Float(f) => CellValue::Number(*f),
        calamine::Data::Int(i) => CellValue::Number(*i as f64),
        calamine::Data::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(format!("{:?}", other)),
    }
}

/// Reads cell values of the first worksheet. Styles, merges and sizes are not recovered.
pub fn read_xlsx_values(path: &Path) -> Result<Grid, SheetError> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    let title = workbook.sheet_names().first().cloned().unwrap_or_default();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetError::NoWorksheet(path.to_path_buf()))??;

    let mut grid = Grid::new(title);
    let (row0, col0) = range.start().unwrap_or((0, 0));
    for (r, c, data) in range.used_cells() {
        let value = import_value(data);
        if value == CellValue::Blank {
            continue;
        }
        let row = row0 + r as u32 + 1;
        let col = (col0 as usize + c + 1) as Col;
        grid.set_value(row, col, value);
    }
    Ok(grid)
}
