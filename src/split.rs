use chrono::NaiveDate;

use crate::dataset::MatchRecord;

/// Calendar-cutoff partition: train is strictly before the cutoff, test is
/// everything on or after it. One boundary rule so every record lands in
/// exactly one side.
pub fn split_at(records: &[MatchRecord], cutoff: NaiveDate) -> (Vec<MatchRecord>, Vec<MatchRecord>) {
    let mut train = Vec::new();
    let mut test = Vec::new();
    for record in records {
        if record.date < cutoff {
            train.push(record.clone());
        } else {
            test.push(record.clone());
        }
    }
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MatchOutcome;

    fn record(date: &str, result: MatchOutcome) -> MatchRecord {
        MatchRecord {
            date: date.parse().unwrap(),
            team: "Manchester City".to_string(),
            opponent: "Arsenal".to_string(),
            venue: "Home".to_string(),
            result,
            hour: 15,
            day_code: 5,
        }
    }

    #[test]
    fn three_row_scenario_partitions_at_2022() {
        let records = vec![
            record("2021-12-01", MatchOutcome::Win),
            record("2022-01-02", MatchOutcome::Loss),
            record("2022-02-10", MatchOutcome::Win),
        ];
        let cutoff = "2022-01-01".parse().unwrap();
        let (train, test) = split_at(&records, cutoff);
        assert_eq!(train.len(), 1);
        assert_eq!(train[0].date, records[0].date);
        assert_eq!(test.len(), 2);
    }

    #[test]
    fn cutoff_day_itself_lands_in_test_only() {
        let records = vec![record("2022-01-01", MatchOutcome::Draw)];
        let cutoff = "2022-01-01".parse().unwrap();
        let (train, test) = split_at(&records, cutoff);
        assert!(train.is_empty());
        assert_eq!(test.len(), 1);
    }

    #[test]
    fn every_record_lands_in_exactly_one_partition() {
        let records: Vec<MatchRecord> = (1..=28)
            .map(|day| record(&format!("2022-01-{day:02}"), MatchOutcome::Draw))
            .collect();
        let cutoff = "2022-01-15".parse().unwrap();
        let (train, test) = split_at(&records, cutoff);
        assert_eq!(train.len() + test.len(), records.len());
        assert!(train.iter().all(|m| m.date < cutoff));
        assert!(test.iter().all(|m| m.date >= cutoff));
    }
}
