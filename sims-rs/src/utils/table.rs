//! Table output for the listing commands

use prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE;
use prettytable::{Cell, Row, Table};

/// Table with bold column titles and no separators between rows
pub fn titled_table(titles: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        titles
            .iter()
            .map(|title| Cell::new(title).style_spec("b"))
            .collect(),
    ));
    table
}

/// Append one row of already formatted values
pub fn push_row<I>(table: &mut Table, values: I)
where
    I: IntoIterator<Item = String>,
{
    table.add_row(Row::new(
        values.into_iter().map(|value| Cell::new(&value)).collect(),
    ));
}
