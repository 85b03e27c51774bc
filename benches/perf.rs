use std::hint::black_box;

use chrono::{Datelike, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};

use matchday_terminal::codec::CodecSet;
use matchday_terminal::dataset::{MatchOutcome, MatchRecord};
use matchday_terminal::features::{QuerySelection, assemble_query, assemble_training};
use matchday_terminal::forest::{ForestConfig, MatchForest};

const OPPONENTS: [&str; 8] = [
    "Arsenal",
    "Chelsea",
    "Liverpool",
    "Everton",
    "Leeds United",
    "Southampton",
    "West Ham",
    "Wolves",
];

fn sample_corpus(n: usize) -> Vec<MatchRecord> {
    (0..n)
        .map(|i| {
            let date = NaiveDate::from_ymd_opt(2021, 8, 1)
                .expect("valid date")
                .checked_add_days(chrono::Days::new((i * 3) as u64))
                .expect("date in range");
            MatchRecord {
                date,
                team: "Manchester City".to_string(),
                opponent: OPPONENTS[i % OPPONENTS.len()].to_string(),
                venue: if i % 2 == 0 { "Home" } else { "Away" }.to_string(),
                result: match i % 3 {
                    0 => MatchOutcome::Win,
                    1 => MatchOutcome::Draw,
                    _ => MatchOutcome::Loss,
                },
                hour: 12 + (i % 9) as u8,
                day_code: date.weekday().num_days_from_monday() as u8,
            }
        })
        .collect()
}

fn bench_assemble_training(c: &mut Criterion) {
    let corpus = sample_corpus(500);
    let codecs = CodecSet::fit(&corpus).expect("fit codecs");

    c.bench_function("assemble_training_500", |b| {
        b.iter(|| {
            let (matrix, labels) =
                assemble_training(black_box(&corpus), black_box(&codecs)).unwrap();
            black_box((matrix.len(), labels.len()));
        })
    });
}

fn bench_query_predict(c: &mut Criterion) {
    let corpus = sample_corpus(500);
    let codecs = CodecSet::fit(&corpus).expect("fit codecs");
    let (matrix, labels) = assemble_training(&corpus, &codecs).expect("assemble");
    let forest = MatchForest::fit(&matrix, &labels, &ForestConfig::default()).expect("fit forest");

    let query = QuerySelection {
        team: "Manchester City".to_string(),
        opponent: "Arsenal".to_string(),
        venue: "Home".to_string(),
        hour: 15,
        weekday: "Saturday".to_string(),
    };

    c.bench_function("assemble_and_predict", |b| {
        b.iter(|| {
            let vector = assemble_query(black_box(&query), &codecs).unwrap();
            black_box(forest.win_probability(&vector));
        })
    });
}

criterion_group!(benches, bench_assemble_training, bench_query_predict);
criterion_main!(benches);
