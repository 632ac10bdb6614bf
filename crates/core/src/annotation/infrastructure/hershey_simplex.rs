//! Glyph outlines from the Hershey "simplex" stroke font.
//!
//! Coordinates are in font units with y pointing up and the baseline at 0;
//! capitals and digits are 21 units tall. `PEN_UP` separates strokes.

pub const PEN_UP: (i8, i8) = (-1, -1);

/// Advance used for spaces and characters without a glyph.
const SPACE_ADVANCE: i32 = 16;

pub struct Glyph {
    pub advance: i32,
    pub points: &'static [(i8, i8)],
}

const ZERO: &[(i8, i8)] = &[
    (9, 21), (6, 20), (4, 17), (3, 12), (3, 9), (4, 4), (6, 1), (9, 0), (11, 0),
    (14, 1), (16, 4), (17, 9), (17, 12), (16, 17), (14, 20), (11, 21), (9, 21),
];
const ONE: &[(i8, i8)] = &[(6, 17), (8, 18), (11, 21), (11, 0)];
const TWO: &[(i8, i8)] = &[
    (4, 16), (4, 17), (5, 19), (6, 20), (8, 21), (12, 21), (14, 20), (15, 19),
    (16, 17), (16, 15), (15, 13), (13, 10), (3, 0), (17, 0),
];
const THREE: &[(i8, i8)] = &[
    (5, 21), (16, 21), (10, 13), (13, 13), (15, 12), (16, 11), (17, 8), (17, 6),
    (16, 3), (14, 1), (11, 0), (8, 0), (5, 1), (4, 2), (3, 4),
];
const FOUR: &[(i8, i8)] = &[(13, 21), (3, 7), (18, 7), PEN_UP, (13, 21), (13, 0)];
const FIVE: &[(i8, i8)] = &[
    (15, 21), (5, 21), (4, 12), (5, 13), (8, 14), (11, 14), (14, 13), (16, 11),
    (17, 8), (17, 6), (16, 3), (14, 1), (11, 0), (8, 0), (5, 1), (4, 2), (3, 4),
];
const SIX: &[(i8, i8)] = &[
    (16, 18), (15, 20), (12, 21), (10, 21), (7, 20), (5, 17), (4, 12), (4, 7),
    (5, 3), (7, 1), (10, 0), (11, 0), (14, 1), (16, 3), (17, 6), (17, 7),
    (16, 10), (14, 12), (11, 13), (10, 13), (7, 12), (5, 10), (4, 7),
];
const SEVEN: &[(i8, i8)] = &[(17, 21), (7, 0), PEN_UP, (3, 21), (17, 21)];
const EIGHT: &[(i8, i8)] = &[
    (8, 21), (5, 20), (4, 18), (4, 16), (5, 14), (7, 13), (11, 12), (14, 11),
    (16, 9), (17, 7), (17, 4), (16, 2), (15, 1), (12, 0), (8, 0), (5, 1),
    (4, 2), (3, 4), (3, 7), (4, 9), (6, 11), (9, 12), (13, 13), (15, 14),
    (16, 16), (16, 18), (15, 20), (12, 21), (8, 21),
];
const NINE: &[(i8, i8)] = &[
    (16, 14), (15, 11), (13, 9), (10, 8), (9, 8), (6, 9), (4, 11), (3, 14),
    (3, 15), (4, 18), (6, 20), (9, 21), (10, 21), (13, 20), (15, 18), (16, 14),
    (16, 9), (15, 4), (13, 1), (10, 0), (8, 0), (5, 1), (4, 3),
];
const PERIOD: &[(i8, i8)] = &[(5, 2), (4, 1), (5, 0), (6, 1), (5, 2)];
const HYPHEN: &[(i8, i8)] = &[(4, 9), (22, 9)];

pub fn glyph(c: char) -> Glyph {
    let (advance, points) = match c {
        '0' => (20, ZERO),
        '1' => (20, ONE),
        '2' => (20, TWO),
        '3' => (20, THREE),
        '4' => (20, FOUR),
        '5' => (20, FIVE),
        '6' => (20, SIX),
        '7' => (20, SEVEN),
        '8' => (20, EIGHT),
        '9' => (20, NINE),
        '.' => (10, PERIOD),
        '-' => (26, HYPHEN),
        _ => (SPACE_ADVANCE, &[][..]),
    };
    Glyph { advance, points }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nominal cap height in font units.
    const CAP_HEIGHT: i32 = 21;

    #[test]
    fn test_digits_fit_cap_height() {
        for c in '0'..='9' {
            let g = glyph(c);
            assert!(!g.points.is_empty(), "missing glyph for {c}");
            for &(x, y) in g.points.iter().filter(|&&p| p != PEN_UP) {
                assert!((0..=CAP_HEIGHT as i8).contains(&y), "{c}: y={y}");
                assert!((0..=g.advance as i8).contains(&x), "{c}: x={x}");
            }
        }
    }

    #[test]
    fn test_unknown_char_is_blank_space() {
        let g = glyph('x');
        assert!(g.points.is_empty());
        assert_eq!(g.advance, SPACE_ADVANCE);
    }
}
