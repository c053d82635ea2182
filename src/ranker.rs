use crate::structs;

/// The `n` soonest arrivals, soonest first. Arrivals due at the same time
/// keep the order the API listed them in.
pub fn select(records: &[structs::ArrivalRecord], n: usize) -> Vec<structs::ArrivalRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.time_to_station);
    sorted.truncate(n);
    return sorted;
}

/// Width of the line name column, taken over every arrival (not just the
/// ones that get displayed) so the columns line up between refreshes.
pub fn longest_line_name_length(records: &[structs::ArrivalRecord]) -> Option<usize> {
    return records.iter()
        .map(|r| r.line_name.chars().count())
        .max();
}

#[cfg(test)]
mod tests {
    use crate::structs::ArrivalRecord;

    fn sample() -> Vec<ArrivalRecord> {
        return vec![
            ArrivalRecord::new("A", "Highbury", 90),
            ArrivalRecord::new("BB", "Oxford Circus", 30),
            ArrivalRecord::new("C", "Waterloo", 600),
        ];
    }

    #[test]
    fn orders_by_time_to_station() {
        let selected = super::select(&sample(), 3);
        let lines: Vec<&str> = selected.iter().map(|r| r.line_name.as_str()).collect();
        assert_eq!(vec!["BB", "A", "C"], lines);
    }

    #[test]
    fn takes_at_most_n() {
        assert_eq!(2, super::select(&sample(), 2).len());
        assert_eq!(3, super::select(&sample(), 10).len());
        assert_eq!(0, super::select(&sample(), 0).len());
    }

    #[test]
    fn ties_keep_input_order() {
        let records = vec![
            ArrivalRecord::new("1", "First", 120),
            ArrivalRecord::new("2", "Second", 60),
            ArrivalRecord::new("3", "Third", 120),
            ArrivalRecord::new("4", "Fourth", 120),
        ];
        let selected = super::select(&records, 3);
        let lines: Vec<&str> = selected.iter().map(|r| r.line_name.as_str()).collect();
        assert_eq!(vec!["2", "1", "3"], lines);
    }

    #[test]
    fn input_is_untouched() {
        let records = sample();
        let _ = super::select(&records, 1);
        assert_eq!(sample(), records);
    }

    #[test]
    fn empty_input() {
        assert!(super::select(&[], 3).is_empty());
        assert_eq!(None, super::longest_line_name_length(&[]));
    }

    #[test]
    fn longest_name_covers_unselected_records() {
        let mut records = sample();
        records.push(ArrivalRecord::new("N207", "Uxbridge", 3000));
        assert_eq!(Some(4), super::longest_line_name_length(&records));
        assert_eq!(3, super::select(&records, 3).len());
    }
}
