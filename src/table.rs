//! Tabular text codec for pricing snapshots.
//!
//! Snapshots arrive as comma-delimited text: the first line carries the column
//! headers, every following non-blank line carries positional values. There is
//! no quoting/escaping support for embedded commas; exports from the TCGplayer
//! seller tools do not produce them.

/// An ordered table of string cells decoded from delimited text.
///
/// Rows are always padded/truncated to the header width, so `RowView::get`
/// never sees a ragged row.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Borrowed view of a single row, resolving cells by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    values: &'a [String],
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Decode delimited text into a table.
    ///
    /// Header cells are trimmed and stripped of quote characters; a UTF-8 BOM
    /// (present in `utf-8-sig` exports) is stripped from the first header.
    /// Blank lines are skipped. Missing trailing values become empty strings,
    /// surplus values are dropped.
    pub fn decode(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines();

        let columns: Vec<String> = match lines.next() {
            Some(header) => header
                .split(',')
                .map(|h| h.trim().replace('"', ""))
                .collect(),
            None => return Self::default(),
        };

        let width = columns.len();
        let rows = lines
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let mut values: Vec<String> = line
                    .split(',')
                    .take(width)
                    .map(|v| v.trim().replace('"', ""))
                    .collect();
                values.resize(width, String::new());
                values
            })
            .collect();

        Self { columns, rows }
    }

    /// Encode back to delimited text: unquoted header line, every value
    /// wrapped in quotes, lines joined with `\n`.
    pub fn encode(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let mut out = self.columns.join(",");
        for row in &self.rows {
            out.push('\n');
            let mut first = true;
            for value in row {
                if !first {
                    out.push(',');
                }
                first = false;
                out.push('"');
                out.push_str(value);
                out.push('"');
            }
        }
        out
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of `name`, appending a new column (and an empty cell in every
    /// existing row) when it is not present yet.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.columns.len() - 1
            }
        }
    }

    pub fn push_row(&mut self, mut values: Vec<String>) {
        values.resize(self.columns.len(), String::new());
        self.rows.push(values);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(move |values| RowView {
            table: self,
            values,
        })
    }

    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|values| RowView {
            table: self,
            values,
        })
    }
}

impl<'a> RowView<'a> {
    /// Cell under `column`, or `None` when the table has no such column.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column_index(column)?;
        self.values.get(idx).map(String::as_str)
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }
}
