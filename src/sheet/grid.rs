//! Library-independent spreadsheet model: styled cells on 1-based coordinates,
//! merged ranges, column widths and row heights.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub type Row = u32;
pub type Col = u16;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    #[default]
    Blank,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Numeric view of the value; numeric text is parsed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Blank => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderLine {
    Thin,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Borders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderLine>,
}

impl Borders {
    pub fn set(&mut self, side: Side, line: BorderLine) {
        match side {
            Side::Top => self.top = Some(line),
            Side::Bottom => self.bottom = Some(line),
            Side::Left => self.left = Some(line),
            Side::Right => self.right = Some(line),
        }
    }
}

/// RGB colours as `0xRRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellStyle {
    pub bold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<u32>,
    pub borders: Borders,
    pub centered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
}

impl CellStyle {
    pub fn centered() -> Self {
        Self {
            centered: true,
            ..Self::default()
        }
    }

    pub fn centered_bold() -> Self {
        Self {
            bold: true,
            centered: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default)]
    pub style: CellStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub first_row: Row,
    pub first_col: Col,
    pub last_row: Row,
    pub last_col: Col,
}

impl CellRange {
    pub fn new(first_row: Row, first_col: Col, last_row: Row, last_col: Col) -> Self {
        Self {
            first_row,
            first_col,
            last_row,
            last_col,
        }
    }

    pub fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_letter(self.first_col),
            self.first_row,
            column_letter(self.last_col),
            self.last_row
        )
    }
}

/// Spreadsheet column name for a 1-based index (1 → A, 27 → AA).
pub fn column_letter(col: Col) -> String {
    let mut n = u32::from(col);
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PlacedCell {
    row: Row,
    col: Col,
    #[serde(flatten)]
    cell: Cell,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
struct GridSnapshot {
    #[serde(default)]
    title: String,
    #[serde(default)]
    cells: Vec<PlacedCell>,
    #[serde(default)]
    merges: Vec<CellRange>,
    #[serde(default)]
    column_widths: Vec<(Col, f64)>,
    #[serde(default)]
    row_heights: Vec<(Row, f64)>,
    #[serde(default)]
    freeze: Option<(Row, Col)>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "GridSnapshot", into = "GridSnapshot")]
pub struct Grid {
    pub title: String,
    cells: BTreeMap<(Row, Col), Cell>,
    merges: Vec<CellRange>,
    column_widths: BTreeMap<Col, f64>,
    row_heights: BTreeMap<Row, f64>,
    /// Top-left scrolling cell; rows above and columns left of it stay frozen.
    freeze: Option<(Row, Col)>,
}

impl From<GridSnapshot> for Grid {
    fn from(snapshot: GridSnapshot) -> Self {
        Self {
            title: snapshot.title,
            cells: snapshot
                .cells
                .into_iter()
                .map(|placed| ((placed.row, placed.col), placed.cell))
                .collect(),
            merges: snapshot.merges,
            column_widths: snapshot.column_widths.into_iter().collect(),
            row_heights: snapshot.row_heights.into_iter().collect(),
            freeze: snapshot.freeze,
        }
    }
}

impl From<Grid> for GridSnapshot {
    fn from(grid: Grid) -> Self {
        Self {
            title: grid.title,
            cells: grid
                .cells
                .into_iter()
                .map(|((row, col), cell)| PlacedCell { row, col, cell })
                .collect(),
            merges: grid.merges,
            column_widths: grid.column_widths.into_iter().collect(),
            row_heights: grid.row_heights.into_iter().collect(),
            freeze: grid.freeze,
        }
    }
}

impl Grid {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn cell(&self, row: Row, col: Col) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn cell_mut(&mut self, row: Row, col: Col) -> &mut Cell {
        self.cells.entry((row, col)).or_default()
    }

    pub fn value(&self, row: Row, col: Col) -> &CellValue {
        static BLANK: CellValue = CellValue::Blank;
        self.cell(row, col).map(|c| &c.value).unwrap_or(&BLANK)
    }

    pub fn set_value(&mut self, row: Row, col: Col, value: CellValue) -> &mut Cell {
        let cell = self.cell_mut(row, col);
        cell.value = value;
        cell
    }

    /// Writes a value with a full style, replacing what was there.
    pub fn put(&mut self, row: Row, col: Col, value: CellValue, style: CellStyle) {
        let borders = self.cell(row, col).map(|c| c.style.borders).unwrap_or_default();
        let cell = self.cell_mut(row, col);
        cell.value = value;
        cell.style = CellStyle { borders, ..style };
    }

    pub fn style_mut(&mut self, row: Row, col: Col) -> &mut CellStyle {
        &mut self.cell_mut(row, col).style
    }

    pub fn cells(&self) -> impl Iterator<Item = ((Row, Col), &Cell)> {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    pub fn insert_cell(&mut self, row: Row, col: Col, cell: Cell) {
        self.cells.insert((row, col), cell);
    }

    pub fn merge(&mut self, range: CellRange) {
        if !range.is_single_cell() && !self.merges.contains(&range) {
            self.merges.push(range);
        }
    }

    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    pub fn set_column_width(&mut self, col: Col, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn column_width(&self, col: Col) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (Col, f64)> + '_ {
        self.column_widths.iter().map(|(c, w)| (*c, *w))
    }

    pub fn set_row_height(&mut self, row: Row, height: f64) {
        self.row_heights.insert(row, height);
    }

    pub fn row_height(&self, row: Row) -> Option<f64> {
        self.row_heights.get(&row).copied()
    }

    pub fn row_heights(&self) -> impl Iterator<Item = (Row, f64)> + '_ {
        self.row_heights.iter().map(|(r, h)| (*r, *h))
    }

    pub fn set_freeze(&mut self, row: Row, col: Col) {
        self.freeze = Some((row, col));
    }

    pub fn freeze(&self) -> Option<(Row, Col)> {
        self.freeze
    }

    /// Last used row, counting merged ranges. 0 for an empty grid.
    pub fn max_row(&self) -> Row {
        let cells = self.cells.keys().map(|(r, _)| *r).max().unwrap_or(0);
        let merges = self.merges.iter().map(|m| m.last_row).max().unwrap_or(0);
        cells.max(merges)
    }

    pub fn max_col(&self) -> Col {
        let cells = self.cells.keys().map(|(_, c)| *c).max().unwrap_or(0);
        let merges = self.merges.iter().map(|m| m.last_col).max().unwrap_or(0);
        cells.max(merges)
    }

    pub fn set_border(&mut self, row: Row, col: Col, side: Side, line: BorderLine) {
        self.style_mut(row, col).borders.set(side, line);
    }

    /// Outline around a rectangle; inner borders are left as they are.
    pub fn outline(&mut self, range: CellRange, line: BorderLine) {
        for col in range.first_col..=range.last_col {
            self.set_border(range.first_row, col, Side::Top, line);
            self.set_border(range.last_row, col, Side::Bottom, line);
        }
        for row in range.first_row..=range.last_row {
            self.set_border(row, range.first_col, Side::Left, line);
            self.set_border(row, range.last_col, Side::Right, line);
        }
    }

    pub fn vertical_border(&mut self, rows: (Row, Row), col: Col, side: Side, line: BorderLine) {
        for row in rows.0..=rows.1 {
            self.set_border(row, col, side, line);
        }
    }

    pub fn horizontal_border(&mut self, row: Row, cols: (Col, Col), side: Side, line: BorderLine) {
        for col in cols.0..=cols.1 {
            self.set_border(row, col, side, line);
        }
    }

    /// Replaces the font family of every cell, keeping the other font attributes.
    pub fn apply_font_name(&mut self, name: &str) {
        for cell in self.cells.values_mut() {
            cell.style.font_name = Some(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_roll_over() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(230), "HV");
        assert_eq!(CellRange::new(1, 1, 3, 2).to_string(), "A1:B3");
    }

    #[test]
    fn outline_only_touches_the_edges() {
        let mut grid = Grid::new("t");
        grid.outline(CellRange::new(2, 2, 4, 4), BorderLine::Medium);
        assert_eq!(grid.cell(2, 3).map(|c| c.style.borders.top), Some(Some(BorderLine::Medium)));
        assert_eq!(grid.cell(4, 4).map(|c| c.style.borders.right), Some(Some(BorderLine::Medium)));
        assert!(grid.cell(3, 3).is_none());
    }

    #[test]
    fn put_keeps_existing_borders() {
        let mut grid = Grid::new("t");
        grid.set_border(1, 1, Side::Left, BorderLine::Thin);
        grid.put(1, 1, CellValue::text("x"), CellStyle::centered_bold());
        let cell = grid.cell(1, 1).expect("cell exists");
        assert!(cell.style.bold);
        assert_eq!(cell.style.borders.left, Some(BorderLine::Thin));
    }

    #[test]
    fn single_cell_merges_are_ignored() {
        let mut grid = Grid::new("t");
        grid.merge(CellRange::new(1, 1, 1, 1));
        grid.merge(CellRange::new(1, 1, 1, 2));
        grid.merge(CellRange::new(1, 1, 1, 2));
        assert_eq!(grid.merges().len(), 1);
        assert_eq!(grid.max_col(), 2);
    }

    #[test]
    fn snapshot_json_restores_grid() {
        let mut grid = Grid::new("Member Info");
        grid.put(4, 3, CellValue::Number(240.0), CellStyle::centered());
        grid.merge(CellRange::new(4, 3, 8, 3));
        grid.set_column_width(3, 11.0);
        grid.set_row_height(1, 25.0);
        grid.set_freeze(4, 3);
        let json = serde_json::to_string(&grid).expect("serialize");
        let back: Grid = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, grid);
        assert_eq!(back.value(4, 3).as_number(), Some(240.0));
    }
}
