//! Account sheet layout: header block, one 16-column block per character grouped
//! by element, and a trailing cube band.

use crate::config::Language;
use crate::data::{
    AccountSheet, CharacterRecord, CubeLevel, ItemLevelDisplay, Priority, SLOT_COUNT,
    TRACKED_STATS,
};

use super::grid::{BorderLine, CellRange, CellStyle, CellValue, Col, Grid, Side};
use super::labels::{labels, Labels};

pub const HEADER_ROWS: u32 = 3;
pub const FIRST_DATA_ROW: u32 = 4;
pub const LAST_DATA_ROW: u32 = 8;
pub const FIRST_CHARACTER_COL: Col = 4;
pub const COLUMNS_PER_CHARACTER: Col = 16;
/// Offset of the first stat column inside a character block.
pub const FIRST_STAT_OFFSET: Col = 7;
pub const SHEET_FONT: &str = "Microsoft YaHei";
pub const PERCENT_FORMAT: &str = "0.00%";

const HEADER_ROW_HEIGHT: f64 = 25.0;
const WHITE: u32 = 0xFFFFFF;
const BLACK: u32 = 0x000000;

/// Fill and font colour for a stat line of the given upgrade level.
pub fn level_colors(level: u32) -> (Option<u32>, u32) {
    match level {
        1..=5 => (Some(0xFF7777), BLACK),
        6..=10 => (Some(0xFFFF77), BLACK),
        11..=14 => (Some(0x77AAFF), BLACK),
        15 => (Some(BLACK), WHITE),
        _ => (None, BLACK),
    }
}

fn priority_style(priority: Priority) -> CellStyle {
    let mut style = CellStyle::centered();
    match priority {
        Priority::Black => {
            style.fill = Some(BLACK);
            style.font_color = Some(WHITE);
            style.bold = true;
        }
        Priority::Blue => {
            style.fill = Some(0x99CCFF);
            style.bold = true;
        }
        Priority::Yellow => {
            style.fill = Some(0xFFFF88);
            style.bold = true;
        }
        Priority::None => {}
    }
    style
}

fn text_or_blank(text: &str) -> CellValue {
    if text.is_empty() {
        CellValue::Blank
    } else {
        CellValue::text(text)
    }
}

fn positive_or_blank(level: i64) -> CellValue {
    if level > 0 {
        CellValue::Number(level as f64)
    } else {
        CellValue::Blank
    }
}

pub fn render_account(sheet: &AccountSheet) -> Grid {
    let text = labels(sheet.language);
    let mut grid = Grid::new(text.sheet_title);

    for row in 1..=HEADER_ROWS {
        grid.set_row_height(row, HEADER_ROW_HEIGHT);
    }
    render_header(&mut grid, sheet, text);

    let mut start_col = FIRST_CHARACTER_COL;
    for element in sheet.elements.iter().filter(|e| !e.characters.is_empty()) {
        let width = element.characters.len() as Col * COLUMNS_PER_CHARACTER;
        let band = CellRange::new(1, start_col, 1, start_col + width - 1);
        grid.merge(band);
        grid.put(1, start_col, CellValue::text(&element.name), CellStyle::centered_bold());
        grid.outline(band, BorderLine::Medium);

        let mut col = start_col;
        for character in &element.characters {
            render_character(&mut grid, character, col, text);
            col += COLUMNS_PER_CHARACTER;
        }
        start_col += width;
    }

    set_character_widths(&mut grid, sheet.language, start_col);
    render_cubes(&mut grid, &sheet.cubes, sheet.language, start_col, text);
    grid.apply_font_name(SHEET_FONT);
    grid
}

fn render_header(grid: &mut Grid, sheet: &AccountSheet, text: &Labels) {
    grid.put(1, 1, CellValue::text(text.name), CellStyle::centered_bold());
    grid.put(1, 3, CellValue::text(text.synchro), CellStyle::centered_bold());
    grid.merge(CellRange::new(1, 1, HEADER_ROWS, 2));
    grid.merge(CellRange::new(1, 3, HEADER_ROWS, 3));
    for col in 1..=3 {
        grid.merge(CellRange::new(FIRST_DATA_ROW, col, LAST_DATA_ROW, col));
    }

    grid.put(FIRST_DATA_ROW, 1, CellValue::Blank, CellStyle::centered());
    grid.put(FIRST_DATA_ROW, 2, text_or_blank(&sheet.name), CellStyle::centered_bold());
    grid.put(
        FIRST_DATA_ROW,
        3,
        CellValue::Number(f64::from(sheet.synchro_level)),
        CellStyle::centered(),
    );
}

fn render_character(grid: &mut Grid, character: &CharacterRecord, col: Col, text: &Labels) {
    let last = col + COLUMNS_PER_CHARACTER - 1;

    grid.merge(CellRange::new(2, col, 2, last));
    grid.put(2, col, CellValue::text(&character.name), priority_style(character.priority));
    grid.horizontal_border(2, (col, last), Side::Bottom, BorderLine::Thin);

    for (offset, caption) in text.properties.iter().enumerate() {
        let Some(caption) = caption else { continue };
        let c = col + offset as Col;
        if offset == 4 {
            grid.merge(CellRange::new(3, c, 3, c + 1));
        }
        grid.put(3, c, CellValue::text(*caption), CellStyle::centered());
    }
    grid.outline(CellRange::new(2, col, 3, last), BorderLine::Medium);

    for offset in 0..6 {
        grid.merge(CellRange::new(FIRST_DATA_ROW, col + offset, LAST_DATA_ROW, col + offset));
    }
    let progress_cells = match &character.progress {
        Some(progress) => [
            text_or_blank(&progress.limit_break_display()),
            positive_or_blank(progress.skill1_level),
            positive_or_blank(progress.skill2_level),
            positive_or_blank(progress.skill_burst_level),
            text_or_blank(progress.item_rarity.label()),
            match progress.item_level_display() {
                ItemLevelDisplay::Blank => CellValue::Blank,
                ItemLevelDisplay::Number(n) => CellValue::Number(n as f64),
                ItemLevelDisplay::Text(s) => CellValue::Text(s),
            },
        ],
        None => Default::default(),
    };
    for (offset, value) in progress_cells.into_iter().enumerate() {
        grid.put(FIRST_DATA_ROW, col + offset as Col, value, CellStyle::centered());
    }

    for (idx, caption) in text.slots.iter().enumerate() {
        let row = FIRST_DATA_ROW + idx as u32;
        grid.put(row, col + 6, CellValue::text(*caption), CellStyle::centered());
    }

    render_stats(grid, character, col);

    grid.outline(CellRange::new(FIRST_DATA_ROW, col, LAST_DATA_ROW, last), BorderLine::Medium);
    let rows = (HEADER_ROWS, LAST_DATA_ROW);
    grid.vertical_border(rows, col, Side::Right, BorderLine::Thin);
    grid.vertical_border(rows, col + 4, Side::Left, BorderLine::Thin);
    grid.vertical_border(rows, col + 5, Side::Right, BorderLine::Thin);
    grid.vertical_border(rows, col + 6, Side::Right, BorderLine::Thin);

    grid.vertical_border((1, LAST_DATA_ROW), 1, Side::Left, BorderLine::Medium);
    grid.vertical_border((1, LAST_DATA_ROW), 2, Side::Right, BorderLine::Medium);
    grid.vertical_border((FIRST_DATA_ROW, LAST_DATA_ROW), 1, Side::Right, BorderLine::Thin);
    grid.horizontal_border(HEADER_ROWS, (1, 3), Side::Bottom, BorderLine::Medium);
    grid.horizontal_border(LAST_DATA_ROW, (1, 3), Side::Bottom, BorderLine::Medium);
    grid.horizontal_border(LAST_DATA_ROW, (col + 6, last), Side::Top, BorderLine::Thin);
}

fn render_stats(grid: &mut Grid, character: &CharacterRecord, col: Col) {
    let stat_col = |idx: usize| col + FIRST_STAT_OFFSET + idx as Col;

    for (slot_idx, lines) in character.equipment.slots.iter().enumerate() {
        let row = FIRST_DATA_ROW + slot_idx as u32;
        for idx in 0..TRACKED_STATS.len() {
            grid.put(row, stat_col(idx), CellValue::Blank, CellStyle::centered());
        }
        for line in lines {
            let Some(idx) = TRACKED_STATS.iter().position(|s| *s == line.stat) else {
                continue;
            };
            let (fill, font_color) = level_colors(line.level);
            let style = CellStyle {
                fill,
                font_color: Some(font_color),
                number_format: Some(PERCENT_FORMAT.to_string()),
                ..CellStyle::centered()
            };
            grid.put(row, stat_col(idx), CellValue::Number(line.value / 100.0), style);
        }
    }

    let total_row = FIRST_DATA_ROW + SLOT_COUNT as u32;
    for (idx, total) in character.equipment.totals().iter().enumerate() {
        let style = CellStyle {
            number_format: Some(PERCENT_FORMAT.to_string()),
            ..CellStyle::centered()
        };
        grid.put(total_row, stat_col(idx), CellValue::Number(total / 100.0), style);
    }
}

fn set_character_widths(grid: &mut Grid, language: Language, end_col: Col) {
    grid.set_column_width(1, 5.0);
    grid.set_column_width(2, 20.0);
    grid.set_column_width(
        3,
        match language {
            Language::English => 11.0,
            Language::Chinese => 8.0,
        },
    );
    for col in FIRST_CHARACTER_COL..end_col {
        let offset = (col - FIRST_CHARACTER_COL) % COLUMNS_PER_CHARACTER;
        let width = match (language, offset) {
            (Language::English, 0..=6) => 6.0,
            (Language::Chinese, 0..=5) => 6.0,
            (Language::Chinese, 6) => 5.0,
            _ => 10.0,
        };
        grid.set_column_width(col, width);
    }
}

fn render_cubes(grid: &mut Grid, cubes: &[CubeLevel], language: Language, start: Col, text: &Labels) {
    if cubes.is_empty() {
        return;
    }
    let last = start + cubes.len() as Col - 1;
    let band = CellRange::new(1, start, 1, last);
    grid.merge(band);
    grid.put(1, start, CellValue::text(text.cube), CellStyle::centered_bold());
    grid.outline(band, BorderLine::Medium);

    for (i, cube) in cubes.iter().enumerate() {
        let col = start + i as Col;
        grid.merge(CellRange::new(2, col, HEADER_ROWS, col));
        grid.put(2, col, CellValue::text(cube.name(language)), CellStyle::centered_bold());
        if col < last {
            grid.vertical_border((2, LAST_DATA_ROW), col, Side::Right, BorderLine::Thin);
        }
    }
    grid.outline(CellRange::new(2, start, HEADER_ROWS, last), BorderLine::Medium);

    for (i, cube) in cubes.iter().enumerate() {
        let col = start + i as Col;
        grid.merge(CellRange::new(FIRST_DATA_ROW, col, LAST_DATA_ROW, col));
        let value = if cube.level == 0 {
            CellValue::text(text.cube_missing)
        } else {
            CellValue::Number(f64::from(cube.level))
        };
        grid.put(FIRST_DATA_ROW, col, value, CellStyle::centered());
    }
    grid.outline(CellRange::new(FIRST_DATA_ROW, start, LAST_DATA_ROW, last), BorderLine::Medium);

    let width = match language {
        Language::English => 19.0,
        Language::Chinese => 14.0,
    };
    for col in start..=last {
        grid.set_column_width(col, width);
    }
}
