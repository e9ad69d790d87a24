//! Locale format conventions.
//!
//! Each locale carries a set of format strings (date, time, separators)
//! in the template date-format syntax: `j F Y` renders as `16 June
//! 2006`. Locales override only what differs from the defaults; the
//! Ukrainian conventions, for example, keep the default datetime format
//! but change the date formats and number separators.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Format conventions of one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFormats {
	/// Locale code, e.g. `"uk"`.
	pub locale: String,
	/// Long date format.
	pub date_format: String,
	/// Time format.
	pub time_format: String,
	/// Long date-and-time format.
	pub datetime_format: String,
	/// Year and month, for archive headings.
	pub year_month_format: String,
	/// Month and day, for date headings within a year.
	pub month_day_format: String,
	/// Compact date format.
	pub short_date_format: String,
	/// Compact date-and-time format.
	pub short_datetime_format: String,
	/// First day of the week, 0 is Sunday.
	pub first_day_of_week: u8,
	/// Decimal separator for localized numbers.
	pub decimal_separator: String,
	/// Separator between digit groups.
	pub thousand_separator: String,
	/// Digits per group, 0 disables grouping.
	pub number_grouping: usize,
}

impl Default for LocaleFormats {
	fn default() -> Self {
		Self {
			locale: "en".to_string(),
			date_format: "N j, Y".to_string(),
			time_format: "P".to_string(),
			datetime_format: "N j, Y, P".to_string(),
			year_month_format: "F Y".to_string(),
			month_day_format: "F j".to_string(),
			short_date_format: "m/d/Y".to_string(),
			short_datetime_format: "m/d/Y P".to_string(),
			first_day_of_week: 0,
			decimal_separator: ".".to_string(),
			thousand_separator: ",".to_string(),
			number_grouping: 0,
		}
	}
}

impl LocaleFormats {
	/// The Ukrainian conventions.
	fn uk() -> Self {
		Self {
			locale: "uk".to_string(),
			date_format: "j F Y р.".to_string(),
			time_format: "H:i:s".to_string(),
			year_month_format: "F Y".to_string(),
			month_day_format: "j F".to_string(),
			short_date_format: "j M Y".to_string(),
			decimal_separator: ",".to_string(),
			thousand_separator: " ".to_string(),
			..Self::default()
		}
	}

	/// Resolves the conventions for a locale code.
	///
	/// Falls back from the full code to its language part (`uk-UA` to
	/// `uk`), then to the defaults.
	pub fn for_locale(locale: &str) -> Arc<LocaleFormats> {
		let registry = REGISTRY.read();
		if let Some(formats) = registry.get(locale) {
			return Arc::clone(formats);
		}
		if let Some((language, _)) = locale.split_once('-') {
			if let Some(formats) = registry.get(language) {
				return Arc::clone(formats);
			}
		}
		Arc::new(LocaleFormats::default())
	}

	/// Renders a date with this locale's long date format.
	pub fn format_date(&self, date: NaiveDate) -> String {
		format_with(&self.date_format, date.and_time(NaiveTime::default()))
	}

	/// Renders a time with this locale's time format.
	pub fn format_time(&self, time: NaiveTime) -> String {
		format_with(
			&self.time_format,
			NaiveDate::default().and_time(time),
		)
	}

	/// Renders a date with this locale's compact date format.
	pub fn format_short_date(&self, date: NaiveDate) -> String {
		format_with(&self.short_date_format, date.and_time(NaiveTime::default()))
	}

	/// Localizes a plain number rendering: the decimal point becomes the
	/// locale's separator, and with `grouping` the integer digits split
	/// into groups.
	pub fn localize_number(&self, value: &str, grouping: bool) -> String {
		let (sign, rest) = match value.strip_prefix('-') {
			Some(rest) => ("-", rest),
			None => ("", value),
		};
		let (int_part, dec_part) = match rest.split_once('.') {
			Some((i, d)) => (i, Some(d)),
			None => (rest, None),
		};

		let int_part = if grouping && self.number_grouping > 0 {
			group_digits(int_part, self.number_grouping, &self.thousand_separator)
		} else {
			int_part.to_string()
		};

		match dec_part {
			Some(dec) => format!("{sign}{int_part}{}{dec}", self.decimal_separator),
			None => format!("{sign}{int_part}"),
		}
	}
}

static REGISTRY: Lazy<RwLock<HashMap<String, Arc<LocaleFormats>>>> = Lazy::new(|| {
	let mut map = HashMap::new();
	map.insert("en".to_string(), Arc::new(LocaleFormats::default()));
	map.insert("uk".to_string(), Arc::new(LocaleFormats::uk()));
	RwLock::new(map)
});

/// Registers (or replaces) the conventions for a locale code.
pub fn register_locale_formats(formats: LocaleFormats) {
	REGISTRY
		.write()
		.insert(formats.locale.clone(), Arc::new(formats));
}

const MONTHS: [&str; 12] = [
	"January",
	"February",
	"March",
	"April",
	"May",
	"June",
	"July",
	"August",
	"September",
	"October",
	"November",
	"December",
];

const MONTHS_AP: [&str; 12] = [
	"Jan.", "Feb.", "March", "April", "May", "June", "July", "Aug.", "Sept.", "Oct.", "Nov.",
	"Dec.",
];

const WEEKDAYS: [&str; 7] = [
	"Monday",
	"Tuesday",
	"Wednesday",
	"Thursday",
	"Friday",
	"Saturday",
	"Sunday",
];

/// Renders a datetime with a template-syntax format string.
///
/// Supported specifiers are the common subset: `d j D l m n M N F y Y
/// H G i s A P`. A backslash escapes the next character; anything else
/// passes through as literal text.
pub fn format_with(format: &str, dt: NaiveDateTime) -> String {
	let month = dt.month() as usize - 1;
	let weekday = dt.weekday().num_days_from_monday() as usize;
	let mut out = String::with_capacity(format.len() * 2);
	let mut chars = format.chars();

	while let Some(ch) = chars.next() {
		match ch {
			'\\' => {
				if let Some(escaped) = chars.next() {
					out.push(escaped);
				}
			}
			'd' => out.push_str(&format!("{:02}", dt.day())),
			'j' => out.push_str(&dt.day().to_string()),
			'D' => out.push_str(&WEEKDAYS[weekday][..3]),
			'l' => out.push_str(WEEKDAYS[weekday]),
			'm' => out.push_str(&format!("{:02}", dt.month())),
			'n' => out.push_str(&dt.month().to_string()),
			'M' => out.push_str(&MONTHS[month][..3]),
			'N' => out.push_str(MONTHS_AP[month]),
			'F' => out.push_str(MONTHS[month]),
			'y' => out.push_str(&format!("{:02}", dt.year() % 100)),
			'Y' => out.push_str(&dt.year().to_string()),
			'H' => out.push_str(&format!("{:02}", dt.hour())),
			'G' => out.push_str(&dt.hour().to_string()),
			'i' => out.push_str(&format!("{:02}", dt.minute())),
			's' => out.push_str(&format!("{:02}", dt.second())),
			'A' => out.push_str(if dt.hour() < 12 { "AM" } else { "PM" }),
			'P' => out.push_str(&twelve_hour(dt)),
			other => out.push(other),
		}
	}
	out
}

// '1:30 p.m.', with 'midnight' and 'noon' special-cased.
fn twelve_hour(dt: NaiveDateTime) -> String {
	match (dt.hour(), dt.minute()) {
		(0, 0) => return "midnight".to_string(),
		(12, 0) => return "noon".to_string(),
		_ => {}
	}
	let (hour, suffix) = match dt.hour() {
		0 => (12, "a.m."),
		h @ 1..=11 => (h, "a.m."),
		12 => (12, "p.m."),
		h => (h - 12, "p.m."),
	};
	if dt.minute() == 0 {
		format!("{hour} {suffix}")
	} else {
		format!("{hour}:{:02} {suffix}", dt.minute())
	}
}

fn group_digits(digits: &str, group: usize, separator: &str) -> String {
	let chars: Vec<char> = digits.chars().collect();
	let mut out = String::new();
	for (idx, ch) in chars.iter().enumerate() {
		if idx > 0 && (chars.len() - idx) % group == 0 {
			out.push_str(separator);
		}
		out.push(*ch);
	}
	out
}
