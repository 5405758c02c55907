//! Table metric normalization.
//!
//! Turns each table row into atomic, unit-annotated natural-language
//! statements. Tables are authoritative for numeric facts, so every cell
//! becomes its own statement rather than one blob per table.

use docint_config::IngestConfig;
use docint_extract::Table;

/// Cell values treated as "no data".
const PLACEHOLDERS: [&str; 5] = ["", "-", "n/a", "na", "null"];

/// Unit annotations stripped from headers when deriving the metric name.
const UNIT_ANNOTATIONS: [&str; 3] = ["(%)", "(bn)", "(billion)"];

/// Converts raw table grids into metric statements.
#[derive(Debug, Clone)]
pub struct TableNormalizer {
    entity: String,
    currency_unit: String,
}

impl TableNormalizer {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            entity: config.entity.clone(),
            currency_unit: config.currency_unit.clone(),
        }
    }

    /// Normalize one table into statements, one per data cell.
    ///
    /// Row 0 is the header row. A table with no data rows yields nothing.
    pub fn normalize(&self, table: &Table, page: u32) -> Vec<String> {
        if table.len() < 2 {
            return Vec::new();
        }

        let headers: Vec<String> = table[0].iter().map(|h| h.trim().to_string()).collect();
        let year_col = detect_year_column(&headers);

        let mut statements = Vec::new();

        for row in &table[1..] {
            if row.is_empty() {
                continue;
            }

            let row: Vec<String> = row.iter().map(|c| c.trim().to_string()).collect();

            let year = year_col
                .and_then(|i| row.get(i))
                .filter(|y| !y.is_empty())
                .cloned();

            for (col_idx, (header, value)) in headers.iter().zip(row.iter()).enumerate() {
                if header.is_empty() || value.is_empty() || Some(col_idx) == year_col {
                    continue;
                }
                if PLACEHOLDERS.contains(&value.to_lowercase().as_str()) {
                    continue;
                }

                let unit = self.infer_unit(header);
                let metric = strip_unit_annotations(header);

                let mut statement = match &year {
                    Some(year) => {
                        format!("In {}, {}'s {} was {}", year, self.entity, metric, value)
                    }
                    None => format!("{}'s {} was {}", self.entity, metric, value),
                };

                if !unit.is_empty() {
                    statement.push(' ');
                    statement.push_str(&unit);
                }
                statement.push_str(&format!(" (Page {}, Table)", page));

                statements.push(statement);
            }
        }

        statements
    }

    /// Infer the unit for a column header.
    ///
    /// The rules form a priority table and are applied first-match-wins; a
    /// header matching several rules takes the unit of the earliest one.
    /// Reordering these silently changes output units.
    fn infer_unit(&self, header: &str) -> String {
        let h = header.to_lowercase();

        if h.contains("growth") || h.contains("percent") || header.contains('%') || h.contains("change") {
            "%".to_string()
        } else if h.contains("inflation") || h.contains("unemployment") {
            "%".to_string()
        } else if h.contains("gdp") || h.contains("revenue") || h.contains("expenditure") {
            self.currency_unit.clone()
        } else if h.contains("debt") || h.contains("deficit") || h.contains("surplus") {
            self.currency_unit.clone()
        } else {
            String::new()
        }
    }
}

/// The first header containing "year" (case-insensitive) or consisting only
/// of digits. May be absent.
fn detect_year_column(headers: &[String]) -> Option<usize> {
    headers.iter().position(|h| {
        h.to_lowercase().contains("year") || (!h.is_empty() && h.chars().all(|c| c.is_ascii_digit()))
    })
}

/// Strip unit annotations like "(%)" or "(billion)" from a header.
fn strip_unit_annotations(header: &str) -> String {
    let mut metric = header.to_string();
    for annotation in UNIT_ANNOTATIONS {
        metric = metric.replace(annotation, "");
    }
    metric.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TableNormalizer {
        TableNormalizer::new(&IngestConfig::default())
    }

    fn grid(rows: &[&[&str]]) -> Table {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_gdp_growth_row_statement() {
        let table = grid(&[&["Year", "GDP growth (%)"], &["2022", "3.5"]]);
        let statements = normalizer().normalize(&table, 4);

        assert_eq!(
            statements,
            vec!["In 2022, Qatar's GDP growth was 3.5 % (Page 4, Table)"]
        );
    }

    #[test]
    fn test_unit_rules_are_first_match_wins() {
        let n = normalizer();

        // Matches both the growth rule and the gdp rule; growth wins.
        assert_eq!(n.infer_unit("GDP growth (%)"), "%");
        assert_eq!(n.infer_unit("GDP (bn)"), "billion QAR");
        assert_eq!(n.infer_unit("Inflation rate"), "%");
        assert_eq!(n.infer_unit("Public debt"), "billion QAR");
        assert_eq!(n.infer_unit("Fiscal surplus"), "billion QAR");
        assert_eq!(n.infer_unit("Population"), "");
        // Literal % matches on the raw header, not the lowercased copy.
        assert_eq!(n.infer_unit("Share %"), "%");
    }

    #[test]
    fn test_placeholders_skipped() {
        let table = grid(&[
            &["Year", "Revenue (bn)", "Debt"],
            &["2021", "-", "120"],
            &["2022", "n/a", "NULL"],
        ]);
        let statements = normalizer().normalize(&table, 2);

        assert_eq!(
            statements,
            vec!["In 2021, Qatar's Debt was 120 billion QAR (Page 2, Table)"]
        );
    }

    #[test]
    fn test_no_year_column() {
        let table = grid(&[&["Inflation (%)"], &["2.1"]]);
        let statements = normalizer().normalize(&table, 9);

        assert_eq!(statements, vec!["Qatar's Inflation was 2.1 % (Page 9, Table)"]);
    }

    #[test]
    fn test_digit_header_is_year_column() {
        let table = grid(&[&["2023", "Unemployment"], &["2023", "0.1"]]);
        let statements = normalizer().normalize(&table, 1);

        assert_eq!(
            statements,
            vec!["In 2023, Qatar's Unemployment was 0.1 % (Page 1, Table)"]
        );
    }

    #[test]
    fn test_year_cell_missing_drops_year_clause() {
        let table = grid(&[&["Year", "Expenditure"], &["", "88"]]);
        let statements = normalizer().normalize(&table, 3);

        assert_eq!(
            statements,
            vec!["Qatar's Expenditure was 88 billion QAR (Page 3, Table)"]
        );
    }

    #[test]
    fn test_header_only_table_yields_nothing() {
        let table = grid(&[&["Year", "GDP"]]);
        assert!(normalizer().normalize(&table, 1).is_empty());
    }

    #[test]
    fn test_configured_entity_and_currency() {
        let config = IngestConfig {
            entity: "Norway".to_string(),
            currency_unit: "billion NOK".to_string(),
        };
        let n = TableNormalizer::new(&config);
        let table = grid(&[&["Year", "Revenue"], &["2020", "1500"]]);

        assert_eq!(
            n.normalize(&table, 1),
            vec!["In 2020, Norway's Revenue was 1500 billion NOK (Page 1, Table)"]
        );
    }
}
