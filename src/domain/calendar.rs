use chrono::{NaiveDate, Weekday};

/// Date format used everywhere a date is persisted or displayed.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Localized weekday display names, injected into the service as configuration.
/// Orders and payments are stamped with one of these at creation and the
/// stamped value is never recomputed afterwards.
#[derive(Debug, Clone)]
pub struct WeekdayNames {
    // Monday first, matching chrono's days_from_monday indexing.
    names: [&'static str; 7],
}

impl WeekdayNames {
    /// Arabic day names, the shipped default.
    pub fn arabic() -> Self {
        Self {
            names: [
                "الاثنين",
                "الثلاثاء",
                "الأربعاء",
                "الخميس",
                "الجمعة",
                "السبت",
                "الأحد",
            ],
        }
    }

    pub fn english() -> Self {
        Self {
            names: [
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday",
            ],
        }
    }

    pub fn name_for(&self, weekday: Weekday) -> &'static str {
        self.names[weekday.num_days_from_monday() as usize]
    }
}

impl Default for WeekdayNames {
    fn default() -> Self {
        Self::arabic()
    }
}
