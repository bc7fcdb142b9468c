/// One roster row. Field values line up with the roster header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    /// Position of the row in the source roster (0-based, header excluded)
    pub position: usize,
    pub fields: Vec<String>,
}

impl Record {
    pub fn new(position: usize, fields: Vec<String>) -> Self {
        Self { position, fields }
    }

    /// Get the value of the field at `column`, if the row has one
    pub fn field(&self, column: usize) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// A fully materialized table: a header row plus its records.
///
/// Used both for the input roster and for every output table, which keep
/// the input header and field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Roster {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            records: Vec::new(),
        }
    }

    /// Build a roster from raw rows, numbering them in order
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(position, fields)| Record::new(position, fields))
            .collect();
        Self { headers, records }
    }

    /// Append a row, assigning it the next position
    pub fn push_row(&mut self, fields: Vec<String>) {
        let position = self.records.len();
        self.records.push(Record::new(position, fields));
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the column named `name`, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_from_rows_assigns_positions() {
        let roster = Roster::from_rows(
            strings(&["Roll", "Name"]),
            vec![strings(&["2101CS01", "Asha"]), strings(&["2101EE02", "Ravi"])],
        );
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.records()[0].position, 0);
        assert_eq!(roster.records()[1].position, 1);
        assert_eq!(roster.records()[1].field(1), Some("Ravi"));
        assert_eq!(roster.records()[1].field(2), None);
    }

    #[test]
    fn test_push_row_continues_numbering() {
        let mut roster = Roster::new(strings(&["Roll"]));
        roster.push_row(strings(&["2101CS01"]));
        roster.push_row(strings(&["2101CS02"]));
        assert_eq!(roster.records()[1].position, 1);
    }

    #[test]
    fn test_column_index() {
        let roster = Roster::new(strings(&["Name", "Roll"]));
        assert_eq!(roster.column_index("Roll"), Some(1));
        assert_eq!(roster.column_index("roll"), None);
    }
}
