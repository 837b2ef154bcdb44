use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Table")]
    pub metric: String,
    #[tabled(rename = "Rows")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, String)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_is_blank() {
        assert_eq!(TableBuilder::new().build(), "");
    }

    #[test]
    fn test_table_contains_rows() {
        let table = stats_table(&[("genome", "1".to_string()), ("record", "2".to_string())]);
        assert!(table.contains("genome"));
        assert!(table.contains("record"));
        assert!(table.contains("Rows"));
    }
}
