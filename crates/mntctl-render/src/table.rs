use console::measure_text_width;

const COLUMN_GAP: &str = "  ";

/// Borderless table with left-aligned columns.
///
/// Cells may span several lines and may carry ANSI color codes; widths are
/// measured on the visible text only.
#[derive(Debug, Clone, Default)]
pub struct PlainTable {
    headers: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl PlainTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_headers(headers: &[&str]) -> Self {
        Self {
            headers: Some(headers.iter().map(|header| header.to_string()).collect()),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let all_rows: Vec<&Vec<String>> = self.headers.iter().chain(self.rows.iter()).collect();
        let columns = all_rows.iter().map(|row| row.len()).max().unwrap_or(0);

        let mut widths = vec![0; columns];
        for row in &all_rows {
            for (index, cell) in row.iter().enumerate() {
                let widest = cell.lines().map(measure_text_width).max().unwrap_or(0);
                widths[index] = widths[index].max(widest);
            }
        }

        let mut lines = Vec::new();
        for row in &all_rows {
            let height = row
                .iter()
                .map(|cell| cell.lines().count().max(1))
                .max()
                .unwrap_or(1);
            for line_index in 0..height {
                let mut line = String::new();
                for (index, width) in widths.iter().enumerate() {
                    let fragment = row
                        .get(index)
                        .and_then(|cell| cell.lines().nth(line_index))
                        .unwrap_or("");
                    if index > 0 {
                        line.push_str(COLUMN_GAP);
                    }
                    line.push_str(fragment);
                    let padding = width.saturating_sub(measure_text_width(fragment));
                    line.push_str(&" ".repeat(padding));
                }
                lines.push(line.trim_end().to_string());
            }
        }

        lines.join("\n")
    }
}

/// Prefixes every non-blank line of `text`.
pub fn indent(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapses whitespace and truncates at a word boundary so the result,
/// placeholder included, fits in `width` characters. A first word that is
/// longer than the budget is cut mid-word.
pub fn shorten(text: &str, width: usize, placeholder: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(placeholder.chars().count());
    let mut kept = String::new();
    for word in collapsed.split(' ') {
        let separator = usize::from(!kept.is_empty());
        if kept.chars().count() + separator + word.chars().count() > budget {
            if kept.is_empty() {
                kept = word.chars().take(budget).collect();
            }
            break;
        }
        if separator == 1 {
            kept.push(' ');
        }
        kept.push_str(word);
    }

    format!("{kept}{placeholder}")
}
