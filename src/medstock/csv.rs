//! # CSV Codec
//!
//! Exports the inventory as a spreadsheet-friendly CSV file and reads such files back.
//!
//! The header row is the compatibility contract: a file is only accepted when its first
//! line matches [`CSV_HEADER`] exactly.
//!
//! ## Known asymmetry
//!
//! The encoder quotes fields the standard way, but the decoder splits every row naively
//! on `,`. A name that contains a comma is exported correctly yet shifts the columns of
//! its row on import. Quotes around a field and doubled quotes inside it are undone;
//! embedded separators are not. The same holds for line breaks: a quoted `\n` would
//! split the row, which is why product names may not contain control characters.

use crate::error::{Result, StockError};
use crate::model::{Category, Product, ProductId, DATE_FORMAT, DEFAULT_KIND};
use chrono::NaiveDate;

pub const CSV_HEADER: [&str; 6] = [
    "ID",
    "Nome do Medicamento",
    "Categoria",
    "Tipo",
    "Quantidade",
    "Data de Validade",
];

/// Byte-order mark prepended to exported files so spreadsheet tools pick UTF-8.
pub const UTF8_BOM: char = '\u{feff}';

const SEPARATOR: char = ',';

/// Encode products as CSV text (no BOM), one row per product in collection order.
pub fn to_csv(products: &[Product]) -> String {
    let mut lines = Vec::with_capacity(products.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for p in products {
        let expiry = p
            .expiry_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        let fields = [
            escape(p.id.as_str()),
            quote(&p.name),
            escape(p.category.label()),
            escape(&p.kind),
            p.quantity.to_string(),
            expiry,
        ];
        lines.push(fields.join(","));
    }

    lines.join("\n")
}

/// Full export file contents: BOM followed by [`to_csv`].
pub fn to_csv_file(products: &[Product]) -> String {
    format!("{}{}", UTF8_BOM, to_csv(products))
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("inventario_medicamentos_{}.csv", date.format(DATE_FORMAT))
}

/// Decode CSV text into fresh products.
///
/// Only the header can fail the whole decode. Rows are never rejected for bad cells:
/// missing or unreadable values fall back to defaults. The one exception is a row whose
/// name cell is blank: it is skipped with a warning instead of becoming a nameless
/// product. The id column is ignored and every row gets a newly minted id.
pub fn from_csv(text: &str) -> Result<Vec<Product>> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text).trim();
    let mut lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));

    check_header(lines.next().unwrap_or_default())?;

    Ok(lines
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(n, line)| decode_row(n + 2, line))
        .collect())
}

fn check_header(line: &str) -> Result<()> {
    let cells: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();
    if cells != CSV_HEADER {
        return Err(StockError::InvalidFormat(format!(
            "expected header \"{}\", found \"{}\"",
            CSV_HEADER.join(","),
            line
        )));
    }
    Ok(())
}

fn decode_row(line_no: usize, line: &str) -> Option<Product> {
    let values: Vec<&str> = line.split(SEPARATOR).collect();
    let cell = |i: usize| values.get(i).copied().unwrap_or_default();

    let name = unquote(cell(1));
    if name.trim().is_empty() {
        tracing::warn!(line = line_no, "skipping CSV row without a name");
        return None;
    }

    let kind = match unquote(cell(3)) {
        k if k.is_empty() => DEFAULT_KIND.to_string(),
        k => k,
    };

    Some(Product {
        id: ProductId::mint(),
        name,
        category: decode_category(line_no, cell(2)),
        kind,
        quantity: decode_quantity(cell(4)),
        expiry_date: decode_expiry(line_no, cell(5)),
    })
}

fn decode_category(line_no: usize, raw: &str) -> Category {
    let raw = unquote(raw);
    if raw.trim().is_empty() {
        return Category::default();
    }
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(line = line_no, value = %raw, "unknown category, using Both");
        Category::default()
    })
}

fn decode_quantity(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.trunc().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

fn decode_expiry(line_no: usize, raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::warn!(line = line_no, value = raw, "unreadable expiry date dropped");
            None
        }
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn escape(field: &str) -> String {
    if field.contains([SEPARATOR, '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}

/// Drop one surrounding quote on each side and collapse doubled quotes.
fn unquote(field: &str) -> String {
    let field = field.strip_prefix('"').unwrap_or(field);
    let field = field.strip_suffix('"').unwrap_or(field);
    field.replace("\"\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductDraft;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Product> {
        vec![
            ProductDraft::new("Paracetamol", Category::Adult, "Tablet", 5)
                .with_expiry(date(2026, 3, 1))
                .into_product(ProductId::new("med_1")),
            ProductDraft::new("Ben-u-ron \"infantil\"", Category::Child, "Syrup", 0)
                .into_product(ProductId::new("med_2")),
        ]
    }

    fn header() -> String {
        CSV_HEADER.join(",")
    }

    #[test]
    fn encodes_header_and_rows_in_order() {
        let csv = to_csv(&sample());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "ID,Nome do Medicamento,Categoria,Tipo,Quantidade,Data de Validade"
        );
        assert_eq!(lines[1], "med_1,\"Paracetamol\",Adult,Tablet,5,2026-03-01");
        assert_eq!(
            lines[2],
            "med_2,\"Ben-u-ron \"\"infantil\"\"\",Child,Syrup,0,"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn quotes_other_fields_only_when_needed() {
        let product = ProductDraft::new("X", Category::Both, "Pill, coated", 1)
            .into_product(ProductId::new("a"));
        let csv = to_csv(&[product]);
        assert!(csv.ends_with("a,\"X\",Both,\"Pill, coated\",1,"));
    }

    #[test]
    fn export_file_starts_with_bom() {
        let file = to_csv_file(&sample());
        assert!(file.starts_with(UTF8_BOM));
        assert_eq!(&file[UTF8_BOM.len_utf8()..], to_csv(&sample()));
    }

    #[test]
    fn export_filename_carries_date() {
        assert_eq!(
            export_filename(date(2025, 7, 4)),
            "inventario_medicamentos_2025-07-04.csv"
        );
    }

    #[test]
    fn decode_reproduces_everything_but_ids() {
        let original = sample();
        let decoded = from_csv(&to_csv_file(&original)).unwrap();

        assert_eq!(decoded.len(), original.len());
        for (a, b) in original.iter().zip(&decoded) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.name, b.name);
            assert_eq!(a.category, b.category);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.quantity, b.quantity);
            assert_eq!(a.expiry_date, b.expiry_date);
        }
    }

    #[test]
    fn wrong_header_is_invalid_format() {
        let text = "A,B,C,D,E,F\n1,\"X\",Adult,Tablet,1,";
        assert!(matches!(from_csv(text), Err(StockError::InvalidFormat(_))));
    }

    #[test]
    fn header_with_extra_column_is_invalid_format() {
        let text = format!("{},Notas\n", header());
        assert!(matches!(from_csv(&text), Err(StockError::InvalidFormat(_))));
    }

    #[test]
    fn empty_input_is_invalid_format() {
        assert!(matches!(from_csv(""), Err(StockError::InvalidFormat(_))));
    }

    #[test]
    fn header_cells_are_trimmed() {
        let text = "ID, Nome do Medicamento ,Categoria,Tipo,Quantidade,Data de Validade\r\n";
        assert!(from_csv(text).unwrap().is_empty());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = format!("{}\n\n1,\"A\",Adult,Tablet,1,\n   \n2,\"B\",Child,Syrup,2,\n", header());
        let products = from_csv(&text).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].name, "B");
    }

    #[test]
    fn missing_cells_fall_back_to_defaults() {
        let text = format!("{}\n1,\"Soro\",,,abc\n2,Gaze", header());
        let products = from_csv(&text).unwrap();

        assert_eq!(products[0].category, Category::Both);
        assert_eq!(products[0].kind, DEFAULT_KIND);
        assert_eq!(products[0].quantity, 0);
        assert_eq!(products[0].expiry_date, None);

        assert_eq!(products[1].name, "Gaze");
        assert_eq!(products[1].quantity, 0);
    }

    #[test]
    fn decodes_legacy_labels_and_decimal_quantities() {
        let text = format!("{}\nx,\"Xarope\",Criança,Xarope,2.9,2024-12-31", header());
        let product = &from_csv(&text).unwrap()[0];
        assert_eq!(product.category, Category::Child);
        assert_eq!(product.quantity, 2);
        assert_eq!(product.expiry_date, Some(date(2024, 12, 31)));
    }

    #[test]
    fn unreadable_cells_do_not_fail_the_row() {
        let text = format!("{}\nx,\"Y\",Elderly,Tablet,-4,31/12/2024", header());
        let product = &from_csv(&text).unwrap()[0];
        assert_eq!(product.category, Category::Both);
        assert_eq!(product.quantity, 0);
        assert_eq!(product.expiry_date, None);
    }

    #[test]
    fn rows_without_name_are_skipped() {
        let text = format!("{}\nx,\"\",Adult,Tablet,1,\ny,\"Kept\",Adult,Tablet,1,", header());
        let products = from_csv(&text).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Kept");
    }

    #[test]
    fn import_ignores_id_column() {
        let text = format!("{}\nmed_1,\"A\",Adult,Tablet,1,\nmed_1,\"B\",Adult,Tablet,1,", header());
        let products = from_csv(&text).unwrap();
        assert_ne!(products[0].id, ProductId::new("med_1"));
        assert_ne!(products[0].id, products[1].id);
    }

    #[test]
    fn comma_in_name_shifts_columns_on_import() {
        let product = ProductDraft::new("Soro, fisiológico", Category::Adult, "Solution", 7)
            .with_expiry(date(2027, 1, 1))
            .into_product(ProductId::new("a"));
        let decoded = &from_csv(&to_csv(&[product])).unwrap()[0];

        assert_eq!(decoded.name, "Soro");
        // " fisiológico\"" lands in the category column.
        assert_eq!(decoded.category, Category::Both);
        assert_eq!(decoded.kind, "Adult");
        assert_eq!(decoded.quantity, 0);
        assert_eq!(decoded.expiry_date, None);
    }
}
