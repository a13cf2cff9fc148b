use chrono::{Months, NaiveDate};

/// A calendar window, both days included. Search queries derived from it
/// treat `end` as the exclusive `before:` bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One sub-range of the requested period, processed and reported
/// independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub seq: u32,
    pub range: DateRange,
}

/// Splits `range` into consecutive sub-ranges of `months` length.
///
/// Each sub-range starts the day after the previous one ends, and the
/// last one is clipped to `range.end`. The caller guarantees
/// `range.start < range.end` and `months >= 1`.
pub fn partition(range: &DateRange, months: u32) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut cursor = range.start;
    while cursor < range.end {
        let batch_end = cursor
            .checked_add_months(Months::new(months))
            .map_or(range.end, |date| date.min(range.end));
        batches.push(Batch {
            seq: batches.len() as u32 + 1,
            range: DateRange {
                start: cursor,
                end: batch_end,
            },
        });
        cursor = match batch_end.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_partition_covers_range() {
        let range = DateRange {
            start: date(2020, 1, 1),
            end: date(2021, 3, 15),
        };
        for months in 1..=15 {
            let batches = partition(&range, months);
            assert!(!batches.is_empty());
            assert_eq!(batches[0].range.start, range.start);
            assert_eq!(batches.last().unwrap().range.end, range.end);
            for pair in batches.windows(2) {
                assert_eq!(
                    pair[0].range.end.succ_opt().unwrap(),
                    pair[1].range.start,
                    "batches must be gap-free at day granularity",
                );
            }
            for (i, batch) in batches.iter().enumerate() {
                assert_eq!(batch.seq as usize, i + 1);
                assert!(batch.range.start <= batch.range.end);
            }
        }
    }

    #[test]
    fn test_partition_step_length() {
        let range = DateRange {
            start: date(2020, 1, 1),
            end: date(2021, 1, 1),
        };
        let batches = partition(&range, 6);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].range.end, date(2020, 7, 1));
        assert_eq!(batches[1].range.start, date(2020, 7, 2));
        assert_eq!(batches[1].range.end, date(2021, 1, 1));
    }

    #[test]
    fn test_partition_single_batch_when_range_is_short() {
        let range = DateRange {
            start: date(2023, 3, 10),
            end: date(2023, 4, 2),
        };
        let batches = partition(&range, 6);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].range, range);
    }

    #[test]
    fn test_partition_month_boundary_exact() {
        // A range that is an exact multiple of the batch length still
        // ends on the requested end date.
        let range = DateRange {
            start: date(2022, 1, 1),
            end: date(2022, 3, 1),
        };
        let batches = partition(&range, 1);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].range.end, date(2022, 2, 1));
        assert_eq!(batches[1].range.start, date(2022, 2, 2));
        assert_eq!(batches[1].range.end, date(2022, 3, 1));
    }
}
