// Compiled-in keyboard layout adjacency tables. Layouts never need a
// network refresh, so unlike `disposable`/`free`/`tld` this table is
// `&'static` data loaded once, the same style as
// `workers/fingerprint.rs`'s reference header orderings.

pub struct Layout {
    pub name: &'static str,
    pub rows: &'static [&'static str],
    /// Horizontal offset applied per row, modelling the physical
    /// rightward stagger of each successive keyboard row. Zero for
    /// grid layouts (numpad) where rows line up exactly.
    pub stagger: f64,
}

pub const QWERTY: Layout =
    Layout { name: "qwerty", rows: &["qwertyuiop", "asdfghjkl", "zxcvbnm"], stagger: 0.5 };

pub const AZERTY: Layout =
    Layout { name: "azerty", rows: &["azertyuiop", "qsdfghjklm", "wxcvbn"], stagger: 0.5 };

pub const QWERTZ: Layout =
    Layout { name: "qwertz", rows: &["qwertzuiop", "asdfghjkl", "yxcvbnm"], stagger: 0.5 };

pub const DVORAK: Layout =
    Layout { name: "dvorak", rows: &["pyfgcrl", "aoeuidhtns", "qjkxbmwvz"], stagger: 0.5 };

pub const COLEMAK: Layout =
    Layout { name: "colemak", rows: &["qwfpgjluy", "arstdhneio", "zxcvbkm"], stagger: 0.5 };

pub const NUMPAD: Layout = Layout { name: "numpad", rows: &["789", "456", "123"], stagger: 0.0 };

pub const ALL_LAYOUTS: &[&Layout] = &[&QWERTY, &AZERTY, &QWERTZ, &DVORAK, &COLEMAK, &NUMPAD];

/// `(row, column)` of `c` on `layout`, with `column` already carrying
/// the row's stagger offset so two keys' physical distance is just
/// the row/column delta.
fn position(layout: &Layout, c: char) -> Option<(usize, f64)> {
    for (row_idx, row) in layout.rows.iter().enumerate() {
        if let Some(idx) = row.find(c) {
            return Some((row_idx, idx as f64 + row_idx as f64 * layout.stagger));
        }
    }
    None
}

/// True if `a` and `b` are physically neighbouring keys on `layout`:
/// same row one column apart (horizontal), or adjacent rows within
/// half a key of each other (vertical for grid layouts, diagonal for
/// staggered ones).
fn adjacent(layout: &Layout, a: (usize, f64), b: (usize, f64)) -> bool {
    let row_diff = (a.0 as i64 - b.0 as i64).unsigned_abs();
    if row_diff > 1 {
        return false;
    }
    let col_diff = (a.1 - b.1).abs();
    if row_diff == 0 {
        col_diff > 0.0 && col_diff <= 1.0
    } else {
        let threshold = if layout.stagger > 0.0 { 0.5 } else { 1.0 };
        col_diff <= threshold
    }
}

/// True if `window` is a contiguous run of `min_len`+ physically
/// adjacent keys on any known layout — horizontal, vertical, or
/// diagonal, in either direction.
pub fn walk(window: &str, min_len: usize) -> Option<&'static str> {
    let chars: Vec<char> = window.chars().collect();
    if chars.len() < min_len {
        return None;
    }

    'layout: for layout in ALL_LAYOUTS {
        let mut positions = Vec::with_capacity(chars.len());
        for &c in &chars {
            match position(layout, c) {
                Some(p) => positions.push(p),
                None => continue 'layout,
            }
        }
        if positions.windows(2).all(|pair| adjacent(layout, pair[0], pair[1])) {
            return Some(layout.name);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_qwerty_row_walk() {
        assert_eq!(walk("qwer", 4), Some("qwerty"));
    }

    #[test]
    fn detects_reversed_row_walk() {
        assert_eq!(walk("trewq", 4), Some("qwerty"));
    }

    #[test]
    fn detects_diagonal_zigzag() {
        assert_eq!(walk("qaws", 4), Some("qwerty"));
    }

    #[test]
    fn detects_numpad_vertical_and_turn() {
        assert_eq!(walk("7412", 4), Some("numpad"));
    }

    #[test]
    fn rejects_non_adjacent_letters() {
        assert_eq!(walk("qutz", 4), None);
    }

    #[test]
    fn rejects_below_min_len() {
        assert_eq!(walk("qaz", 4), None);
    }
}
