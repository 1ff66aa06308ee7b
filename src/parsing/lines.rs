//! Mapping from byte offsets to human line and column numbers

/// Offsets of the start of every line in a source text, computed once so
/// that any number of error locations can be resolved cheaply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex<'i> {
    source: &'i str,
    starts: Vec<usize>,
}

impl<'i> LineIndex<'i> {
    pub fn new(source: &'i str) -> LineIndex<'i> {
        let mut starts = vec![0];
        for (i, b) in source
            .bytes()
            .enumerate()
        {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        LineIndex { source, starts }
    }

    pub fn line_count(&self) -> usize {
        self.starts
            .len()
    }

    /// Resolve an offset into a 1-origin (row, column) pair. The column
    /// counts characters, not bytes. Offsets past the end of the source are
    /// clamped to it, since errors about missing closing delimiters point
    /// just beyond the last character.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let offset = self.floor(offset);

        // index of the last line starting at or before offset
        let i = match self
            .starts
            .binary_search(&offset)
        {
            Ok(i) => i,
            Err(i) => i - 1,
        };

        let start = self.starts[i];
        let column = self.source[start..offset]
            .chars()
            .count();

        (i + 1, column + 1)
    }

    /// The text of the given 1-origin line, without its line ending.
    pub fn line(&self, row: usize) -> Option<&'i str> {
        let start = *self
            .starts
            .get(row.checked_sub(1)?)?;
        let end = self
            .starts
            .get(row)
            .copied()
            .unwrap_or(
                self.source
                    .len(),
            );

        let text = &self.source[start..end];
        Some(text.trim_end_matches(['\n', '\r']))
    }

    fn floor(&self, offset: usize) -> usize {
        let mut offset = offset.min(
            self.source
                .len(),
        );
        while !self
            .source
            .is_char_boundary(offset)
        {
            offset -= 1;
        }
        offset
    }
}
