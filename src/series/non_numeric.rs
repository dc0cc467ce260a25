use crate::types::series::SeriesTable;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

// A literal pattern; `test_numeric_pattern` asserts it compiles.
static NUMERIC: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?$").ok());

/// Whether `cell` is a signed decimal, optionally in scientific notation.
pub(crate) fn is_numeric(cell: &str) -> bool {
    NUMERIC.as_ref().is_some_and(|re| re.is_match(cell))
}

/// Collects the distinct cell values of every column that are not numbers,
/// such as the portal's placeholders for missing or pending readings.
///
/// Empty cells count as non-numeric.
///
/// # Examples
///
/// ```
/// use wis_scraper::{scan_non_numeric, SeriesColumn, SeriesTable};
///
/// let table = SeriesTable {
///     index: Vec::new(),
///     columns: vec![
///         SeriesColumn::new("inflow", vec!["1.5".into(), "欠測".into()]),
///         SeriesColumn::new("outflow", vec!["欠測".into(), "-2e3".into()]),
///     ],
/// };
/// let found = scan_non_numeric(&table);
/// assert_eq!(found.into_iter().collect::<Vec<_>>(), ["欠測"]);
/// ```
pub fn scan_non_numeric(table: &SeriesTable) -> BTreeSet<String> {
    table
        .columns
        .iter()
        .flat_map(|c| c.values.iter())
        .filter(|v| !is_numeric(v))
        .cloned()
        .collect()
}

/// Replaces every cell equal to one of `literals` with `sentinel`. Cells stay
/// text; converting to numbers is [`SeriesTable::to_float_dataframe`].
pub fn replace_non_numeric(
    mut table: SeriesTable,
    literals: &BTreeSet<String>,
    sentinel: &str,
) -> SeriesTable {
    table.map_cells(|cell| {
        if literals.contains(cell.as_str()) {
            *cell = sentinel.to_string();
        }
    });
    table
}

/// The optional scan and substitution shared by both series fetchers.
pub(crate) fn apply(
    table: SeriesTable,
    sentinel: Option<&str>,
    report: bool,
) -> (SeriesTable, Option<BTreeSet<String>>) {
    if sentinel.is_none() && !report {
        return (table, None);
    }
    let literals = scan_non_numeric(&table);
    let table = match sentinel {
        Some(sentinel) => replace_non_numeric(table, &literals, sentinel),
        None => table,
    };
    (table, report.then_some(literals))
}
