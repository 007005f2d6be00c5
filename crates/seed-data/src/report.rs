//! Console report: table counts and the popular-book table.

use std::fmt;

use serde::Serialize;

use bookshelf::models::PopularBook;

/// Row counts of every seeded table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub authors: i64,
    pub books: i64,
    pub publishers: i64,
    pub genres: i64,
    pub users: i64,
    pub reviews: i64,
}

impl fmt::Display for TableCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "authors:    {}", self.authors)?;
        writeln!(f, "books:      {}", self.books)?;
        writeln!(f, "publishers: {}", self.publishers)?;
        writeln!(f, "genres:     {}", self.genres)?;
        writeln!(f, "users:      {}", self.users)?;
        write!(f, "reviews:    {}", self.reviews)
    }
}

/// Outcome of a full seeding run.
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub summary: TableCounts,
    pub popular: Vec<PopularBook>,
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary")?;
        writeln!(f, "{}", self.summary)?;
        writeln!(f)?;
        writeln!(f, "Popular books")?;
        write!(f, "{}", render_popular_table(&self.popular))
    }
}

const HEADERS: [&str; 6] = [
    "bookId",
    "title",
    "authorName",
    "publisherName",
    "avgRating",
    "reviewCount",
];

/// Renders popular-book rows as a plain-text table with fitted column widths.
pub fn render_popular_table(rows: &[PopularBook]) -> String {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.book_id.to_string(),
                row.title.clone(),
                row.author_name.clone(),
                row.publisher_name.clone(),
                format!("{:.2}", row.avg_rating),
                row.review_count.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');

    if cells.is_empty() {
        out.push_str("(no rows)\n");
    }
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(book_id: i32, title: &str, avg_rating: f64, review_count: i64) -> PopularBook {
        PopularBook {
            book_id,
            title: title.into(),
            author_name: "Ada Lovelace".into(),
            publisher_name: "Acme".into(),
            avg_rating,
            review_count,
        }
    }

    #[test]
    fn test_table_has_header_and_rows() {
        let table = render_popular_table(&[
            row(1, "The Analytical Engine", 4.857, 7),
            row(12, "Notes", 4.5, 4),
        ]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("bookId | title"));
        assert!(lines[1].starts_with("------"));
        assert!(lines[2].contains("The Analytical Engine"));
        assert!(lines[2].contains("4.86"));
        assert!(lines[3].starts_with("12 "));

        // Columns line up on the separators
        let first_bar = lines[0].find('|').unwrap();
        assert_eq!(lines[2].find('|').unwrap(), first_bar);
        assert_eq!(lines[3].find('|').unwrap(), first_bar);
    }

    #[test]
    fn test_empty_table() {
        let table = render_popular_table(&[]);
        assert!(table.contains("(no rows)"));
        assert_eq!(table.lines().count(), 3);
    }

    #[test]
    fn test_summary_lists_all_counts() {
        let counts = TableCounts {
            authors: 8,
            books: 24,
            publishers: 5,
            genres: 9,
            users: 15,
            reviews: 130,
        };
        let text = counts.to_string();

        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("books:      24"));
        assert!(text.contains("reviews:    130"));

        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["genres"], 9);
    }
}
