//! Key/value row extraction from the portal's result page

use super::form::selector;
use crate::domain::{SourceError, SourceRecord};
use scraper::{ElementRef, Html};

/// Read `<tr>` rows with at least two `<td>` cells inside the element whose
/// id is `container_id`
///
/// The first cell is the field name and the second its value, both with
/// whitespace collapsed. Rows with a blank name or value are skipped; a later
/// row with the same name replaces an earlier one.
pub fn extract_rows(document: &str, container_id: &str) -> Result<SourceRecord, SourceError> {
    let html = Html::parse_document(document);
    let with_id = selector("[id]")?;
    let rows = selector("tr")?;
    let cells = selector("td")?;

    let container = html
        .select(&with_id)
        .find(|el| el.value().id() == Some(container_id))
        .ok_or_else(|| SourceError::ContainerMissing(container_id.to_string()))?;

    let mut record = SourceRecord::new();
    for row in container.select(&rows) {
        let mut row_cells = row.select(&cells);
        let (Some(key), Some(value)) = (row_cells.next(), row_cells.next()) else {
            continue;
        };
        record.insert(cell_text(key), cell_text(value));
    }
    Ok(record)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: &str = "ctl00_MainContentPlaceHolder_VehicleDataContainer";

    fn page(rows: &str) -> String {
        format!(
            r#"<html><body>
<table><tr><td>Outside</td><td>ignored</td></tr></table>
<div id="{CONTAINER}"><table>{rows}</table></div>
</body></html>"#
        )
    }

    #[test]
    fn test_extracts_two_cell_rows() {
        let html = page(
            "<tr><td>Make</td><td>FORD</td></tr>\
             <tr><td>Combined  Engine\n Size</td><td> 1596 <span>cc</span></td></tr>\
             <tr><th>Header</th></tr>\
             <tr><td>Only one cell</td></tr>\
             <tr><td>Colour</td><td>   </td></tr>\
             <tr><td>Model</td><td>FOCUS</td><td>extra</td></tr>",
        );
        let record = extract_rows(&html, CONTAINER).unwrap();

        assert_eq!(record.len(), 3);
        assert_eq!(record.get("Make"), Some("FORD"));
        assert_eq!(record.get("Combined Engine Size"), Some("1596 cc"));
        assert_eq!(record.get("Model"), Some("FOCUS"));
        assert_eq!(record.get("Outside"), None);
    }

    #[test]
    fn test_missing_container() {
        let err = extract_rows("<html><body><table></table></body></html>", CONTAINER);
        assert!(matches!(err, Err(SourceError::ContainerMissing(_))));
    }

    #[test]
    fn test_empty_container_yields_empty_record() {
        let record = extract_rows(&page(""), CONTAINER).unwrap();
        assert!(record.is_empty());
    }
}
