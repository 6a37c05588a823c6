use chrono::{Datelike, Days, NaiveDate};
use ratatui::{
    layout::Flex,
    prelude::{Constraint, Layout, Rect},
};

pub fn month_to_str(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown month",
    }
}

/// `May 2024`
pub fn month_title(date: NaiveDate) -> String {
    format!("{} {}", month_to_str(date.month()), date.year())
}

/// The Monday on or before the first of `date`'s month, where the month grid starts
pub fn grid_start(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    first - Days::new(first.weekday().num_days_from_monday().into())
}

/// helper function to create a centered rect using up certain percentage of the available rect `r`
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_title_names_month_and_year() {
        assert_eq!(month_title(date(2024, 5, 17)), "May 2024");
        assert_eq!(month_to_str(13), "Unknown month");
    }

    #[test]
    fn grid_starts_on_a_monday() {
        // 2024-05-01 is a Wednesday
        assert_eq!(grid_start(date(2024, 5, 20)), date(2024, 4, 29));
        // 2024-04-01 is a Monday
        assert_eq!(grid_start(date(2024, 4, 30)), date(2024, 4, 1));
    }

    #[test]
    fn popup_is_centered() {
        let area = popup_area(Rect::new(0, 0, 100, 50), 80, 60);
        assert_eq!(area, Rect::new(10, 10, 80, 30));
    }
}
