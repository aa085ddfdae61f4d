//! Colour palette: the classic 2048 beige and orange ramp in RGB.

use twenty48_ui::Color;

// -- Board --

/// Board frame and gaps between cells.
pub const BOARD_BG: Color = Color::hex(0xBBADA0);
/// An empty cell.
pub const CELL_BG: Color = Color::hex(0xCDC1B4);
/// Dots marking empty cells.
pub const CELL_FG: Color = Color::hex(0xB4A699);

// -- Text --

pub const TITLE_FG: Color = Color::hex(0xEDC22E);
pub const TEXT_FG: Color = Color::Default;
pub const SCORE_ADDITION_FG: Color = Color::hex(0x8BC34A);
pub const WIN_FG: Color = Color::hex(0xEDC22E);
pub const LOSE_FG: Color = Color::hex(0xF65E3B);
pub const HELP_FG: Color = Color::hex(0x9E948A);

// -- Tiles --

/// Digits on the two lightest tiles.
const DARK_DIGITS: Color = Color::hex(0x776E65);
/// Digits on everything from 8 upward.
const LIGHT_DIGITS: Color = Color::hex(0xF9F6F2);

/// Background of tiles beyond the winning value or 2048.
pub const SUPER_BG: Color = Color::hex(0x3C3A32);
pub const SUPER_FG: Color = LIGHT_DIGITS;

/// Background and digit colours for a tile value.
pub fn tile_colors(value: u32) -> (Color, Color) {
    let bg = match value {
        2 => Color::hex(0xEEE4DA),
        4 => Color::hex(0xEDE0C8),
        8 => Color::hex(0xF2B179),
        16 => Color::hex(0xF59563),
        32 => Color::hex(0xF67C5F),
        64 => Color::hex(0xF65E3B),
        128 => Color::hex(0xEDCF72),
        256 => Color::hex(0xEDCC61),
        512 => Color::hex(0xEDC850),
        1024 => Color::hex(0xEDC53F),
        2048 => Color::hex(0xEDC22E),
        _ => SUPER_BG,
    };
    let fg = if value <= 4 { DARK_DIGITS } else { LIGHT_DIGITS };
    (bg, fg)
}
