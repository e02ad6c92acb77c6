//! # Rendering
//!
//! Turns command results into terminal text. Every `render_*` function returns a
//! `String` so output can be tested without a terminal; color is decided by the caller.

use chrono::NaiveDate;
use colored::Colorize;
use medstock::api::{CmdMessage, MessageLevel};
use medstock::view::{Projection, ProjectedProduct, Summary, VisualState};
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const CATEGORY_WIDTH: usize = 6;
const KIND_WIDTH: usize = 12;
const QUANTITY_WIDTH: usize = 6;
const EXPIRY_WIDTH: usize = 28;
const SECONDS_PER_DAY: u64 = 86_400;

pub fn use_color() -> bool {
    console::colors_enabled()
}

/// Usable width of stdout, capped at [`LINE_WIDTH`].
pub fn line_width() -> usize {
    console::Term::stdout()
        .size_checked()
        .map(|(_, cols)| usize::from(cols))
        .unwrap_or(LINE_WIDTH)
        .min(LINE_WIDTH)
}

pub fn render_product_list(
    projection: &Projection,
    today: NaiveDate,
    date_format: &str,
    width: usize,
    use_color: bool,
) -> String {
    let mut out = String::new();
    for pp in projection.items() {
        out.push_str(&render_line(pp, today, date_format, width, use_color));
        out.push('\n');
    }
    out
}

fn render_line(
    pp: &ProjectedProduct,
    today: NaiveDate,
    date_format: &str,
    width: usize,
    use_color: bool,
) -> String {
    let p = &pp.product;
    let marker = match pp.state {
        VisualState::Expired => "✗",
        VisualState::Critical => "!",
        VisualState::Normal => " ",
    };

    let fixed = 2 + CATEGORY_WIDTH + 1 + KIND_WIDTH + 1 + QUANTITY_WIDTH + 2 + EXPIRY_WIDTH;
    let name_width = width.saturating_sub(fixed).max(12);

    let line = format!(
        "{} {} {} {} {:>qw$}  {}",
        marker,
        pad_to_width(&truncate_to_width(&p.name, name_width), name_width),
        pad_to_width(p.category.label(), CATEGORY_WIDTH),
        pad_to_width(&truncate_to_width(&p.kind, KIND_WIDTH), KIND_WIDTH),
        p.quantity,
        pad_to_width(&format_expiry(p.expiry_date, today, date_format), EXPIRY_WIDTH),
        qw = QUANTITY_WIDTH,
    );

    if !use_color {
        return format!("{}  {}", line.trim_end(), p.id);
    }
    let line = match pp.state {
        VisualState::Expired => line.red().to_string(),
        VisualState::Critical => line.yellow().to_string(),
        VisualState::Normal => line,
    };
    format!("{}  {}", line, p.id.to_string().dimmed())
}

pub fn render_summary(summary: &Summary, use_color: bool) -> String {
    let text = format!(
        "{} products, {} units ({} expired, {} out of stock)",
        summary.products, summary.units, summary.expired, summary.critical
    );
    if use_color {
        format!("{}\n", text.dimmed())
    } else {
        format!("{}\n", text)
    }
}

pub fn render_messages(messages: &[CmdMessage], use_color: bool) -> String {
    let mut out = String::new();
    for message in messages {
        let line = if use_color {
            match message.level {
                MessageLevel::Info => message.content.dimmed().to_string(),
                MessageLevel::Success => message.content.green().to_string(),
                MessageLevel::Warning => message.content.yellow().to_string(),
                MessageLevel::Error => message.content.red().to_string(),
            }
        } else {
            message.content.clone()
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn print_messages(messages: &[CmdMessage]) {
    print!("{}", render_messages(messages, use_color()));
}

fn format_expiry(expiry: Option<NaiveDate>, today: NaiveDate, date_format: &str) -> String {
    match expiry {
        None => "Expiry: N/A".to_string(),
        Some(date) => format!(
            "{} ({})",
            date.format(date_format),
            relative_days((date - today).num_days())
        ),
    }
}

fn relative_days(days: i64) -> String {
    if days == 0 {
        return "today".to_string();
    }
    let formatter = timeago::Formatter::new();
    let span = formatter.convert(Duration::from_secs(days.unsigned_abs() * SECONDS_PER_DAY));
    if days < 0 {
        span
    } else {
        format!("in {}", span.trim_end_matches(" ago"))
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medstock::model::{Category, ProductDraft, ProductId};
    use medstock::view::{project, CategoryFilter};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn projection() -> Projection {
        let products = vec![
            ProductDraft::new("Paracetamol", Category::Adult, "Tablet", 5)
                .with_expiry(date(2020, 1, 1))
                .into_product(ProductId::new("med_1")),
            ProductDraft::new("Ben-u-ron", Category::Child, "Syrup", 0)
                .into_product(ProductId::new("med_2")),
        ];
        project(&products, &CategoryFilter::All, "", date(2025, 1, 1))
    }

    #[test]
    fn renders_one_line_per_product_with_markers() {
        let output = render_product_list(&projection(), date(2025, 1, 1), "%d/%m/%Y", 100, false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("✗ Paracetamol"));
        assert!(lines[0].contains("01/01/2020"));
        assert!(lines[0].ends_with("med_1"));
        assert!(lines[1].starts_with("! Ben-u-ron"));
        assert!(lines[1].contains("Expiry: N/A"));
    }

    #[test]
    fn empty_projection_renders_nothing() {
        let output = render_product_list(&Projection::Empty, date(2025, 1, 1), "%d/%m/%Y", 100, false);
        assert!(output.is_empty());
    }

    #[test]
    fn relative_days_reads_naturally() {
        assert_eq!(relative_days(0), "today");
        assert!(relative_days(-3).ends_with("ago"));
        assert!(relative_days(3).starts_with("in "));
        assert!(!relative_days(3).ends_with("ago"));
    }

    #[test]
    fn truncates_long_names() {
        let t = truncate_to_width("Paracetamol 1000mg comprimidos", 12);
        assert_eq!(t.width(), 12);
        assert!(t.ends_with('…'));
        assert_eq!(truncate_to_width("Short", 12), "Short");
    }

    #[test]
    fn plain_messages_have_no_escape_codes() {
        let output = render_messages(&[CmdMessage::success("Saved")], false);
        assert_eq!(output, "Saved\n");
    }

    #[test]
    fn summary_line() {
        let output = render_summary(&projection().summary(), false);
        assert_eq!(output, "2 products, 5 units (1 expired, 1 out of stock)\n");
    }
}
