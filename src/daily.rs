use chrono::{FixedOffset, NaiveDate};

use crate::owm::forecast::Entry;

/// Collapses a 3-hour forecast feed into one entry per calendar day, keeping
/// the most recent entry seen for each day.
///
/// Days are keyed by the calendar date of `dt` at the given UTC offset.
/// Output order is the order in which each date was first seen while scanning
/// the input left to right; the input itself does not need to be sorted.
/// On equal timestamps the later-scanned entry wins.
pub fn latest_per_day(entries: &[Entry], offset: FixedOffset) -> Vec<Entry> {
    let mut buckets: Vec<(NaiveDate, Entry)> = Vec::new();

    for entry in entries {
        let Some(date) = entry.local_date(offset) else {
            continue;
        };
        match buckets.iter_mut().find(|(day, _)| *day == date) {
            Some((_, kept)) => {
                if entry.dt >= kept.dt {
                    *kept = entry.clone();
                }
            }
            None => buckets.push((date, entry.clone())),
        }
    }

    buckets.into_iter().map(|(_, entry)| entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owm::forecast::{Clouds, Main, Weather, Wind};

    const DAY: i64 = 86_400;

    fn entry(dt: i64, humidity: u8) -> Entry {
        Entry {
            dt,
            main: Main {
                temp: 290.0,
                humidity,
            },
            wind: Wind { speed: 2.0 },
            clouds: Clouds { all: 25 },
            weather: vec![Weather {
                description: "few clouds".to_string(),
            }],
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn dts(entries: &[Entry]) -> Vec<i64> {
        entries.iter().map(|e| e.dt).collect()
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(latest_per_day(&[], utc()).is_empty());
    }

    #[test]
    fn keeps_max_timestamp_per_day() {
        // Two entries on day zero, one on day one.
        let input = vec![entry(100, 0), entry(200, 0), entry(DAY + 50, 0)];
        let out = latest_per_day(&input, utc());
        assert_eq!(dts(&out), vec![200, DAY + 50]);
    }

    #[test]
    fn single_day_collapses_to_one_entry() {
        let input = vec![entry(300, 0), entry(100, 0), entry(200, 0)];
        let out = latest_per_day(&input, utc());
        assert_eq!(dts(&out), vec![300]);
    }

    #[test]
    fn equal_timestamps_last_scanned_wins() {
        let input = vec![entry(500, 1), entry(500, 2)];
        let out = latest_per_day(&input, utc());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].main.humidity, 2);
    }

    #[test]
    fn two_days_four_entries_each() {
        let mut input = Vec::new();
        for h in 0..4 {
            input.push(entry(h * 3 * 3600, 0));
            input.push(entry(DAY + h * 3 * 3600, 0));
        }
        let out = latest_per_day(&input, utc());
        assert_eq!(dts(&out), vec![9 * 3600, DAY + 9 * 3600]);
    }

    #[test]
    fn output_order_follows_first_occurrence() {
        // Day one appears first in the scan even though day zero holds the
        // smaller timestamps.
        let input = vec![entry(DAY + 100, 0), entry(50, 0), entry(DAY + 200, 0)];
        let out = latest_per_day(&input, utc());
        assert_eq!(dts(&out), vec![DAY + 200, 50]);
    }

    #[test]
    fn idempotent_on_own_output() {
        let input = vec![
            entry(100, 0),
            entry(200, 0),
            entry(DAY + 300, 0),
            entry(2 * DAY + 10, 0),
        ];
        let once = latest_per_day(&input, utc());
        let twice = latest_per_day(&once, utc());
        assert_eq!(dts(&once), dts(&twice));
    }

    #[test]
    fn selection_is_permutation_independent() {
        let input = vec![
            entry(100, 0),
            entry(200, 0),
            entry(DAY + 50, 0),
            entry(DAY + 150, 0),
        ];
        let mut reversed = input.clone();
        reversed.reverse();

        let mut a = dts(&latest_per_day(&input, utc()));
        let mut b = dts(&latest_per_day(&reversed, utc()));
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn offset_shifts_the_day_boundary() {
        // 23:00 UTC rolls over to the next day at UTC+2, so these two entries
        // land on the same local date and collapse.
        let east2 = FixedOffset::east_opt(2 * 3600).unwrap();
        let input = vec![entry(23 * 3600, 0), entry(DAY + 3600, 0)];
        let out = latest_per_day(&input, east2);
        assert_eq!(dts(&out), vec![DAY + 3600]);

        // At UTC they stay on separate dates.
        assert_eq!(latest_per_day(&input, utc()).len(), 2);
    }
}
