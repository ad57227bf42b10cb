//! Fold level encoding and fold-region derivation.
//!
//! A fold level packs a nesting depth (offset by [`FOLD_LEVEL_BASE`]) with a
//! white-line flag and a header flag. Folders that compute the following
//! line's level while scanning (Rust, R, SQL) additionally store that level
//! in bits 16 and up so the next pass can resume from it.

/// Depth of a line at the top level.
pub const FOLD_LEVEL_BASE: i32 = 0x400;
/// Line contains no visible characters.
pub const FOLD_LEVEL_WHITE_FLAG: i32 = 0x1000;
/// Line opens a foldable block.
pub const FOLD_LEVEL_HEADER_FLAG: i32 = 0x2000;
/// Mask for the depth number.
pub const FOLD_LEVEL_NUMBER_MASK: i32 = 0x0FFF;

/// Depth number of `level`, ignoring flags and multiplexed high bits.
pub fn level_number(level: i32) -> i32 {
    level & FOLD_LEVEL_NUMBER_MASK
}

/// Returns `true` if `level` carries the header flag.
pub fn is_header(level: i32) -> bool {
    level & FOLD_LEVEL_HEADER_FLAG != 0
}

/// Returns `true` if `level` carries the white-line flag.
pub fn is_white(level: i32) -> bool {
    level & FOLD_LEVEL_WHITE_FLAG != 0
}

/// The following line's starting level stored in the high bits by
/// [`compose_level`].
pub fn packed_next_level(level: i32) -> i32 {
    level >> 16
}

/// Build the level for a finished line from its effective level and the level
/// the next line starts at.
///
/// The next level is stored in the high bits, the white flag is set for blank
/// lines when `fold_compact` is on, and the header flag is set when the level
/// rises.
pub fn compose_level(level_use: i32, level_next: i32, visible_chars: usize, fold_compact: bool) -> i32 {
    let mut level = level_use | (level_next << 16);
    if visible_chars == 0 && fold_compact {
        level |= FOLD_LEVEL_WHITE_FLAG;
    }
    if level_use < level_next {
        level |= FOLD_LEVEL_HEADER_FLAG;
    }
    level
}

/// A collapsible block: a header line and the last line subordinate to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FoldRegion {
    /// Header line (0-based).
    pub start_line: usize,
    /// Last line of the block (inclusive).
    pub end_line: usize,
}

/// Derive fold regions from per-line levels.
///
/// A line belongs to a header's block while its depth is greater than the
/// header's or it is flagged white; trailing white lines are not included.
pub fn fold_regions(levels: &[i32]) -> Vec<FoldRegion> {
    let mut regions = Vec::new();
    for (line, &level) in levels.iter().enumerate() {
        if !is_header(level) {
            continue;
        }
        let depth = level_number(level);
        let mut last = line;
        while let Some(&next) = levels.get(last + 1) {
            if !is_white(next) && level_number(next) <= depth {
                break;
            }
            last += 1;
        }
        while last > line && is_white(levels[last]) {
            last -= 1;
        }
        if last > line {
            regions.push(FoldRegion {
                start_line: line,
                end_line: last,
            });
        }
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const B: i32 = FOLD_LEVEL_BASE;
    const H: i32 = FOLD_LEVEL_HEADER_FLAG;
    const W: i32 = FOLD_LEVEL_WHITE_FLAG;

    #[test]
    fn test_compose_level() {
        let level = compose_level(B, B + 1, 3, true);
        assert!(is_header(level));
        assert!(!is_white(level));
        assert_eq!(level_number(level), B);
        assert_eq!(packed_next_level(level), B + 1);

        let blank = compose_level(B + 1, B + 1, 0, true);
        assert!(is_white(blank));
        assert!(!is_header(blank));
        assert!(!is_white(compose_level(B, B, 0, false)));
    }

    #[test]
    fn test_nested_regions() {
        let levels = [B | H, (B + 1) | H, B + 2, B + 1, B];
        assert_eq!(
            fold_regions(&levels),
            vec![
                FoldRegion {
                    start_line: 0,
                    end_line: 3
                },
                FoldRegion {
                    start_line: 1,
                    end_line: 2
                },
            ]
        );
    }

    #[test]
    fn test_trailing_white_lines_excluded() {
        let levels = [B | H, B + 1, (B + 1) | W, B];
        assert_eq!(
            fold_regions(&levels),
            vec![FoldRegion {
                start_line: 0,
                end_line: 1
            }]
        );
    }

    #[test]
    fn test_header_without_body_has_no_region() {
        assert!(fold_regions(&[B | H]).is_empty());
    }
}
