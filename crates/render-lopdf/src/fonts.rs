//! Helvetica, one of the standard 14 fonts, so nothing is embedded.
//!
//! Widths are the AFM advance widths in thousandths of an em, indexed by
//! WinAnsi code.

use lopdf::{dictionary, Dictionary};

/// Resource name the renderer registers the font under on every page.
pub const FONT_RESOURCE: &str = "PlHelv";

/// Distance from the top of a line box to the baseline, in em.
pub const BASELINE_FACTOR: f32 = 0.8;

const REPLACEMENT: u8 = b'?';

#[rustfmt::skip]
const ASCII_WIDTHS: [u16; 95] = [
    // ' ' to '/'
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // '0' to '9'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // ':' to '@'
    278, 278, 584, 584, 584, 556, 1015,
    // 'A' to 'Z'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // '[' to '`'
    278, 278, 278, 469, 556, 333,
    // 'a' to 'z'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // '{' to '~'
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HIGH_WIDTHS: [u16; 128] = [
    556,    0,  222,  556,  333, 1000,  556,  556,  333, 1000,  667,  333, 1000,    0,  611,    0,
      0,  222,  222,  333,  333,  350,  556, 1000,  333, 1000,  500,  333,  944,    0,  500,  667,
    278,  333,  556,  556,  556,  556,  260,  556,  333,  737,  370,  556,  584,  333,  737,  333,
    400,  584,  333,  333,  333,  556,  537,  278,  333,  333,  365,  556,  834,  834,  834,  611,
    667,  667,  667,  667,  667,  667, 1000,  722,  667,  667,  667,  667,  278,  278,  278,  278,
    722,  722,  778,  778,  778,  778,  778,  584,  778,  722,  722,  722,  722,  667,  667,  611,
    556,  556,  556,  556,  556,  556,  889,  500,  556,  556,  556,  556,  278,  278,  278,  278,
    556,  556,  556,  556,  556,  556,  556,  584,  611,  556,  556,  556,  556,  500,  556,  500,
];

pub fn font_dictionary() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Maps a character to its WinAnsi code. Characters outside the encoding
/// become `?`; tabs become spaces.
pub fn win_ansi_code(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => REPLACEMENT,
    }
}

pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(win_ansi_code).collect()
}

fn code_width(code: u8) -> u16 {
    match code {
        32..=126 => ASCII_WIDTHS[(code - 32) as usize],
        128..=255 => HIGH_WIDTHS[(code - 128) as usize],
        _ => ASCII_WIDTHS[(REPLACEMENT - 32) as usize],
    }
}

/// Advance width of `s` in points, including character spacing after
/// every glyph.
pub fn text_width(s: &str, font_size: f32, character_spacing: f32) -> f32 {
    let (units, glyphs) = s.chars().fold((0u32, 0u32), |(units, glyphs), c| {
        (units + code_width(win_ansi_code(c)) as u32, glyphs + 1)
    });
    units as f32 * font_size / 1000.0 + character_spacing * glyphs as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_mapping() {
        assert_eq!(to_win_ansi("Tart"), b"Tart".to_vec());
        assert_eq!(to_win_ansi("crème brûlée"), b"cr\xe8me br\xfbl\xe9e".to_vec());
        assert_eq!(to_win_ansi("€5 – “ok”"), b"\x805 \x96 \x93ok\x94".to_vec());
        assert_eq!(to_win_ansi("日本"), b"??".to_vec());
        assert_eq!(to_win_ansi("a\tb"), b"a b".to_vec());
    }

    #[test]
    fn test_widths() {
        assert_eq!(code_width(b' '), 278);
        assert_eq!(code_width(b'W'), 944);
        assert_eq!(code_width(b'i'), 222);
        assert_eq!(code_width(b'~'), 584);
        assert_eq!(code_width(0xE9), 556);

        // "Mix" = 833 + 222 + 500
        let width = text_width("Mix", 10.0, 0.0);
        assert!((width - 15.55).abs() < 1e-3);
        let spaced = text_width("Mix", 10.0, 1.0);
        assert!((spaced - 18.55).abs() < 1e-3);
    }

    #[test]
    fn test_empty_string_has_no_width() {
        assert_eq!(text_width("", 12.0, 2.0), 0.0);
    }
}
