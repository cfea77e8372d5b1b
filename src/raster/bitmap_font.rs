//! Built-in 5×7 bitmap font, the last entry of every font chain.
//!
//! Each glyph is five column bytes; bit 0 is the top row. Only `' '..='_'` is covered:
//! lowercase maps to uppercase and anything else renders as `?`.

/// Glyph width in cells.
pub const GLYPH_WIDTH: u32 = 5;
/// Glyph height in cells.
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance in cells, glyph plus one blank column.
pub const ADVANCE: u32 = GLYPH_WIDTH + 1;

const FIRST: u8 = 0x20;

#[rustfmt::skip]
const GLYPHS: [[u8; 5]; 64] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x56, 0x20, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x2A, 0x1C, 0x7F, 0x1C, 0x2A], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
];

/// Column bytes for `ch`.
pub fn glyph_columns(ch: char) -> [u8; 5] {
    let ch = ch.to_ascii_uppercase();
    let code = if (' '..='_').contains(&ch) { ch as u8 } else { b'?' };
    GLYPHS[usize::from(code - FIRST)]
}

/// Whether the glyph cell at column `col`, row `row` is lit.
pub fn is_set(columns: [u8; 5], col: u32, row: u32) -> bool {
    col < GLYPH_WIDTH && row < GLYPH_HEIGHT && (columns[col as usize] >> row) & 1 == 1
}

/// Cell edge length in pixels for a requested font size, never below one pixel.
pub fn cell_px(size_px: f32) -> u32 {
    ((size_px / GLYPH_HEIGHT as f32).round() as u32).max(1)
}

/// Rasterize `text` into a single-line coverage grid (0 or 255).
///
/// Returns `(width, height, coverage)`; the grid spans every advance, so blank columns and
/// spaces are included.
pub fn rasterize(text: &str, size_px: f32) -> (u32, u32, Vec<u8>) {
    let cell = cell_px(size_px);
    let count = text.chars().count() as u32;
    let width = (count * ADVANCE * cell).max(1);
    let height = GLYPH_HEIGHT * cell;
    let mut out = vec![0u8; width as usize * height as usize];

    for (i, ch) in text.chars().enumerate() {
        let columns = glyph_columns(ch);
        let x0 = i as u32 * ADVANCE * cell;
        for col in 0..GLYPH_WIDTH {
            for row in 0..GLYPH_HEIGHT {
                if !is_set(columns, col, row) {
                    continue;
                }
                for dy in 0..cell {
                    let y = row * cell + dy;
                    let start = y as usize * width as usize + (x0 + col * cell) as usize;
                    out[start..start + cell as usize].fill(255);
                }
            }
        }
    }
    (width, height, out)
}
