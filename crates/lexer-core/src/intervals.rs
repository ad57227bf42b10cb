//! Style runs: half-open byte ranges sharing one style id.

/// A maximal run of equal style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleRun {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Lexer style id.
    pub style: u8,
}

impl StyleRun {
    /// Create a run.
    pub fn new(start: usize, end: usize, style: u8) -> Self {
        Self { start, end, style }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-length run.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` when `pos` falls inside this run.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// Collapse a per-byte style array into runs.
pub fn style_runs(styles: &[u8]) -> Vec<StyleRun> {
    let mut runs: Vec<StyleRun> = Vec::new();
    for (pos, &style) in styles.iter().enumerate() {
        match runs.last_mut() {
            Some(run) if run.style == style => run.end = pos + 1,
            _ => runs.push(StyleRun::new(pos, pos + 1, style)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_runs_merge() {
        let runs = style_runs(&[1, 1, 2, 2, 2, 0]);
        assert_eq!(
            runs,
            vec![
                StyleRun::new(0, 2, 1),
                StyleRun::new(2, 5, 2),
                StyleRun::new(5, 6, 0)
            ]
        );
        assert!(runs[1].contains(4));
        assert_eq!(runs[1].len(), 3);
        assert!(style_runs(&[]).is_empty());
    }
}
