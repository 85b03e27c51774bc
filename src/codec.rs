use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Fitted bijection between one column's category strings and small integer
/// codes. Codes are assigned in sorted order of the distinct values, so
/// refitting the same corpus always reproduces the same mapping. Fitted once
/// at startup (or loaded from artifacts) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCodec {
    column: String,
    values: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, i64>,
}

impl CategoryCodec {
    pub fn fit<'a, I>(column: &'static str, raw: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut values: Vec<String> = raw.into_iter().map(|v| v.trim().to_string()).collect();
        values.sort();
        values.dedup();
        if values.is_empty() {
            return Err(PipelineError::EmptyDomain { column });
        }
        Ok(Self::from_values(column.to_string(), values))
    }

    fn from_values(column: String, values: Vec<String>) -> Self {
        let index = values
            .iter()
            .enumerate()
            .map(|(code, v)| (v.clone(), code as i64))
            .collect();
        Self {
            column,
            values,
            index,
        }
    }

    /// Restores the lookup index after deserialization. Artifacts only carry
    /// the ordered value list.
    pub fn rebuild_index(&mut self) {
        self.index = self
            .values
            .iter()
            .enumerate()
            .map(|(code, v)| (v.clone(), code as i64))
            .collect();
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The fitted categories in code order; the UI uses this as its option
    /// list so form selections can never be out of domain.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn encode(&self, value: &str) -> Result<i64, PipelineError> {
        self.index
            .get(value.trim())
            .copied()
            .ok_or_else(|| PipelineError::UnknownCategory {
                column: column_tag(&self.column),
                value: value.to_string(),
            })
    }

    pub fn decode(&self, code: i64) -> Result<&str, PipelineError> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
            .ok_or(PipelineError::InvalidCode {
                column: column_tag(&self.column),
                code,
                len: self.values.len(),
            })
    }
}

/// The two codecs the feature contract needs, fitted from the same corpus
/// snapshot (or loaded together from one artifact file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecSet {
    pub venue: CategoryCodec,
    pub opponent: CategoryCodec,
}

impl CodecSet {
    pub fn fit(records: &[crate::dataset::MatchRecord]) -> Result<Self, PipelineError> {
        Ok(Self {
            venue: CategoryCodec::fit("venue", records.iter().map(|m| m.venue.as_str()))?,
            opponent: CategoryCodec::fit("opponent", records.iter().map(|m| m.opponent.as_str()))?,
        })
    }

    pub fn rebuild_indexes(&mut self) {
        self.venue.rebuild_index();
        self.opponent.rebuild_index();
    }
}

// PipelineError carries &'static str column names so variants stay cheap to
// clone into the UI log. Codec columns come from a tiny fixed set, so a
// match table is enough.
fn column_tag(column: &str) -> &'static str {
    match column {
        "venue" => "venue",
        "opponent" => "opponent",
        "team" => "team",
        "weekday" => "weekday",
        _ => "category",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_fitted_value() {
        let codec = CategoryCodec::fit("venue", ["Home", "Away", "Home"]).unwrap();
        for value in codec.values().to_vec() {
            let code = codec.encode(&value).unwrap();
            assert_eq!(codec.decode(code).unwrap(), value);
        }
    }

    #[test]
    fn refit_reproduces_the_same_mapping() {
        let domain = ["Leeds United", "Arsenal", "Norwich City", "Arsenal"];
        let a = CategoryCodec::fit("opponent", domain).unwrap();
        let b = CategoryCodec::fit("opponent", domain).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn home_away_get_distinct_small_codes() {
        let codec = CategoryCodec::fit("venue", ["Home", "Away"]).unwrap();
        let home = codec.encode("Home").unwrap();
        let away = codec.encode("Away").unwrap();
        assert_ne!(home, away);
        assert!((0..=1).contains(&home));
        assert!((0..=1).contains(&away));
        assert!(matches!(
            codec.encode("Neutral"),
            Err(PipelineError::UnknownCategory { column: "venue", .. })
        ));
    }

    #[test]
    fn empty_domain_fails_explicitly() {
        let err = CategoryCodec::fit("venue", std::iter::empty::<&str>()).unwrap_err();
        assert_eq!(err, PipelineError::EmptyDomain { column: "venue" });
    }

    #[test]
    fn decode_out_of_range_fails() {
        let codec = CategoryCodec::fit("venue", ["Home", "Away"]).unwrap();
        assert!(matches!(
            codec.decode(2),
            Err(PipelineError::InvalidCode { code: 2, len: 2, .. })
        ));
        assert!(codec.decode(-1).is_err());
    }

    #[test]
    fn serde_round_trip_preserves_lookup() {
        let codec = CategoryCodec::fit("opponent", ["Arsenal", "Chelsea"]).unwrap();
        let json = serde_json::to_string(&codec).unwrap();
        let mut back: CategoryCodec = serde_json::from_str(&json).unwrap();
        back.rebuild_index();
        assert_eq!(back, codec);
        assert_eq!(back.encode("Chelsea").unwrap(), codec.encode("Chelsea").unwrap());
    }
}
