//! Marker-anchored field extraction over normalized text.

use tracing::{debug, trace};

use crate::models::config::ExtractionConfig;
use crate::models::record::{FieldKey, FieldRecord};

use super::rules::{
    clean_name, clean_place, extract_license_number, scan_markers, DateResolver, ExtractionMatch,
    FieldPattern, Marker, MarkerHit, PayloadKind, FIELD_TABLE,
};

/// A value found for one field.
pub type FieldMatch = (FieldKey, ExtractionMatch<String>);

const NAME_CONFIDENCE: f32 = 0.85;
const PLACE_CONFIDENCE: f32 = 0.75;

/// Applies the pattern table to normalized text.
///
/// Every field is extracted independently: a missing marker or a payload
/// that fails its checks leaves only that field empty.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    table: Vec<FieldPattern>,
    dates: DateResolver,
    number_fallback: bool,
}

impl FieldExtractor {
    /// Create an extractor with the default table and system clock.
    pub fn new() -> Self {
        Self {
            table: FIELD_TABLE.to_vec(),
            dates: DateResolver::new(),
            number_fallback: true,
        }
    }

    /// Use a specific date resolver.
    pub fn with_date_resolver(mut self, dates: DateResolver) -> Self {
        self.dates = dates;
        self
    }

    /// Apply the tunables from configuration.
    pub fn with_config(mut self, config: &ExtractionConfig) -> Self {
        for field in &mut self.table {
            match field.kind {
                PayloadKind::Name | PayloadKind::DateAndPlace => {
                    field.min_len = config.min_name_length
                }
                PayloadKind::LicenseNumber => field.min_len = config.min_license_number_length,
                PayloadKind::Date => {}
            }
        }
        self.dates = self.dates.with_window(config.year_window);
        self.number_fallback = config.license_number_fallback;
        self
    }

    /// Extract the field record from normalized text.
    pub fn extract(&self, normalized: &str) -> FieldRecord {
        self.extract_matches(normalized).0
    }

    /// Extract the field record together with what matched where.
    pub fn extract_matches(&self, normalized: &str) -> (FieldRecord, Vec<FieldMatch>) {
        let hits = scan_markers(normalized);
        trace!("found {} markers", hits.len());

        let mut record = FieldRecord::default();
        let mut matches = Vec::new();

        for field in &self.table {
            let found = self.extract_field(field, normalized, &hits);
            if found.is_empty() {
                debug!("no value for marker {}", field.marker.label());
            }
            for (key, m) in found {
                *record.get_mut(key) = m.value.clone();
                matches.push((key, m));
            }
        }

        (record, matches)
    }

    /// Try every occurrence of the marker; the first one yielding a value
    /// wins, per field.
    fn extract_field(
        &self,
        field: &FieldPattern,
        text: &str,
        hits: &[MarkerHit],
    ) -> Vec<FieldMatch> {
        let mut found: Vec<FieldMatch> = Vec::new();

        for (start, end) in field.payloads(hits, text.len()) {
            let payload = &text[start..end];

            for (key, m) in self.read_payload(field, payload) {
                if !found.iter().any(|(k, _)| *k == key) {
                    found.push((key, m.offset_by(start)));
                }
            }

            if found.len() == fields_of(field.marker).len() {
                break;
            }
        }

        found
    }

    fn read_payload(&self, field: &FieldPattern, payload: &str) -> Vec<FieldMatch> {
        let mut out = Vec::new();

        match field.kind {
            PayloadKind::Name => {
                let key = fields_of(field.marker)[0];
                if let Some(name) = clean_name(payload, field.min_len) {
                    out.push((key, ExtractionMatch::new(name, NAME_CONFIDENCE, payload.trim())
                        .with_position(0, payload.len())));
                }
            }
            PayloadKind::DateAndPlace => {
                let date = self.dates.find(payload);
                let rest = match &date {
                    Some(m) => {
                        let (s, e) = m.position.unwrap_or((0, 0));
                        format!("{} {}", &payload[..s], &payload[e..])
                    }
                    None => payload.to_string(),
                };

                if let Some(place) = clean_place(&rest, field.min_len) {
                    out.push((FieldKey::BirthPlace, ExtractionMatch::new(place, PLACE_CONFIDENCE, rest.trim())
                        .with_position(0, payload.len())));
                }
                if let Some(date) = date {
                    out.push((FieldKey::BirthDate, date));
                }
            }
            PayloadKind::Date => {
                let key = fields_of(field.marker)[0];
                if let Some(date) = self.dates.find(payload) {
                    out.push((key, date));
                }
            }
            PayloadKind::LicenseNumber => {
                if let Some(m) = extract_license_number(payload, field.min_len, self.number_fallback) {
                    out.push((FieldKey::LicenseNumber, m));
                }
            }
        }

        out
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Record fields filled from a marker's payload.
fn fields_of(marker: Marker) -> &'static [FieldKey] {
    match marker {
        Marker::Surname => &[FieldKey::Surname],
        Marker::GivenName => &[FieldKey::GivenName],
        Marker::Birth => &[FieldKey::BirthDate, FieldKey::BirthPlace],
        Marker::IssueDate => &[FieldKey::IssueDate],
        Marker::ExpiryDate => &[FieldKey::ExpiryDate],
        Marker::Authority => &[],
        Marker::LicenseNumber => &[FieldKey::LicenseNumber],
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clock::FixedClock;
    use pretty_assertions::assert_eq;

    fn extractor() -> FieldExtractor {
        let clock = Arc::new(FixedClock::on(2025, 6, 15).unwrap());
        FieldExtractor::new().with_date_resolver(DateResolver::new().with_clock(clock))
    }

    #[test]
    fn test_full_license() {
        let text = "1. ROSSI 2. MARIO 3. 01/02/85 ROMA 4A. 01/01/2020 4B. 01/01/2030 5. AB1234567CD";
        let record = extractor().extract(text);

        assert_eq!(
            record,
            FieldRecord {
                surname: "ROSSI".into(),
                given_name: "MARIO".into(),
                birth_date: "01.02.1985".into(),
                birth_place: "ROMA".into(),
                issue_date: "01.01.2020".into(),
                expiry_date: "01.01.2030".into(),
                license_number: "AB1234567CD".into(),
            }
        );
    }

    #[test]
    fn test_empty_surname_does_not_block_given_name() {
        let record = extractor().extract("1. 2. MARIO");
        assert_eq!(record.surname, "");
        assert_eq!(record.given_name, "MARIO");
    }

    #[test]
    fn test_missing_marker_stops_at_later_one() {
        let record = extractor().extract("1. ROSSI 4B. 01/01/30 5. AB1234567CD");
        assert_eq!(record.surname, "ROSSI");
        assert_eq!(record.given_name, "");
        assert_eq!(record.expiry_date, "01.01.2030");
    }

    #[test]
    fn test_authority_payload_is_not_captured() {
        let record = extractor().extract("4B. 01.01.2030 4C. MIT-UCO 5. U1AB23456C");
        assert_eq!(record.expiry_date, "01.01.2030");
        assert_eq!(record.license_number, "U1AB23456C");
    }

    #[test]
    fn test_malformed_birth_date_keeps_place() {
        let record = extractor().extract("3. 01/0285 MILANO MI 4A. 02/03/2015");
        assert_eq!(record.birth_date, "");
        assert_eq!(record.birth_place, "MILANO MI");
        assert_eq!(record.issue_date, "02.03.2015");
    }

    #[test]
    fn test_place_drops_duplicated_date() {
        let record = extractor().extract("3. 01.02.1985 TORINO 01.02.1985");
        assert_eq!(record.birth_date, "01.02.1985");
        assert_eq!(record.birth_place, "TORINO");
    }

    #[test]
    fn test_out_of_order_markers() {
        let record = extractor().extract("2. MARIO 1. ROSSI");
        assert_eq!(record.surname, "ROSSI");
        assert_eq!(record.given_name, "MARIO");
    }

    #[test]
    fn test_repeated_marker_uses_first_valid_occurrence() {
        let record = extractor().extract("1. X 2. MARIO 1. ROSSI");
        assert_eq!(record.surname, "ROSSI");
    }

    #[test]
    fn test_license_number_fallback() {
        let record = extractor().extract("5. AB12");
        assert_eq!(record.license_number, "AB12");

        let strict = extractor().with_config(&ExtractionConfig {
            license_number_fallback: false,
            ..Default::default()
        });
        assert_eq!(strict.extract("5. AB12").license_number, "");
    }

    #[test]
    fn test_match_positions_point_into_text() {
        let text = "1. ROSSI 5. AB1234567CD";
        let (_, matches) = extractor().extract_matches(text);
        let (_, number) = matches
            .iter()
            .find(|(k, _)| *k == FieldKey::LicenseNumber)
            .unwrap();
        let (s, e) = number.position.unwrap();
        assert_eq!(&text[s..e], "AB1234567CD");
    }

    #[test]
    fn test_noise_only() {
        assert_eq!(extractor().extract("XX -- // :: 12"), FieldRecord::default());
        assert_eq!(extractor().extract(""), FieldRecord::default());
    }
}
