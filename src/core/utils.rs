use chrono::NaiveDate;

/// Case-insensitive substring match used by the list search box.
pub fn text_matches_search(text: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    text.to_lowercase().contains(&query.to_lowercase())
}

/// Format a `YYYY-MM-DD` date as `YYYY/MM/DD` for display.
/// Anything unparseable is shown as-is.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%Y/%m/%d").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_case_insensitive_and_empty_matches_all() {
        assert!(text_matches_search("Daring Tact", "daring"));
        assert!(text_matches_search("Daring Tact", "TACT"));
        assert!(text_matches_search("anything", ""));
        assert!(!text_matches_search("Daring Tact", "oguri"));
    }

    #[test]
    fn formats_iso_dates_and_passes_through_the_rest() {
        assert_eq!(format_date("2026-08-06"), "2026/08/06");
        assert_eq!(format_date("2026/08/06"), "2026/08/06");
        assert_eq!(format_date("last week"), "last week");
    }
}
