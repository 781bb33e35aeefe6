//! Field markers and the canonical pattern table.

use serde::Serialize;

use super::patterns::MARKER;

/// Literal field index printed on a driving license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Marker {
    /// `1.` surname
    Surname,
    /// `2.` given name
    GivenName,
    /// `3.` birth date and place
    Birth,
    /// `4A.` issue date
    IssueDate,
    /// `4B.` expiry date
    ExpiryDate,
    /// `4C.` issuing authority
    Authority,
    /// `5.` license number
    LicenseNumber,
}

impl Marker {
    /// Markers in the order they are printed.
    pub const ALL: [Marker; 7] = [
        Marker::Surname,
        Marker::GivenName,
        Marker::Birth,
        Marker::IssueDate,
        Marker::ExpiryDate,
        Marker::Authority,
        Marker::LicenseNumber,
    ];

    /// Printed label, including the trailing dot.
    pub fn label(&self) -> &'static str {
        match self {
            Marker::Surname => "1.",
            Marker::GivenName => "2.",
            Marker::Birth => "3.",
            Marker::IssueDate => "4A.",
            Marker::ExpiryDate => "4B.",
            Marker::Authority => "4C.",
            Marker::LicenseNumber => "5.",
        }
    }

    fn from_index(index: &str) -> Option<Self> {
        match index {
            "1" => Some(Marker::Surname),
            "2" => Some(Marker::GivenName),
            "3" => Some(Marker::Birth),
            "4A" => Some(Marker::IssueDate),
            "4B" => Some(Marker::ExpiryDate),
            "4C" => Some(Marker::Authority),
            "5" => Some(Marker::LicenseNumber),
            _ => None,
        }
    }
}

/// A marker occurrence; `start..end` spans the label itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerHit {
    pub marker: Marker,
    pub start: usize,
    pub end: usize,
}

/// Find every marker occurrence in text order.
pub fn scan_markers(text: &str) -> Vec<MarkerHit> {
    MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let index = caps.get(1)?;
            let marker = Marker::from_index(index.as_str())?;
            // index + the dot
            Some(MarkerHit {
                marker,
                start: index.start(),
                end: index.end() + 1,
            })
        })
        .collect()
}

/// How a payload is turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Letters, spaces, apostrophes, hyphens.
    Name,
    /// Date token followed by a place name.
    DateAndPlace,
    /// Date token only.
    Date,
    /// Alphanumeric run with `/` and `-`.
    LicenseNumber,
}

/// One row of the pattern table.
#[derive(Debug, Clone, Copy)]
pub struct FieldPattern {
    pub marker: Marker,
    pub kind: PayloadKind,
    /// Minimum accepted payload length after filtering.
    pub min_len: usize,
    /// Markers ending the payload: the later ones in print order first,
    /// then the earlier ones and the marker itself, since OCR may
    /// reorder or repeat lines.
    pub stops: &'static [Marker],
}

use Marker::*;

/// Canonical pattern table. `4C.` is only ever a stop.
pub const FIELD_TABLE: [FieldPattern; 6] = [
    FieldPattern {
        marker: Surname,
        kind: PayloadKind::Name,
        min_len: 2,
        stops: &[GivenName, Birth, IssueDate, ExpiryDate, Authority, LicenseNumber, Surname],
    },
    FieldPattern {
        marker: GivenName,
        kind: PayloadKind::Name,
        min_len: 2,
        stops: &[Birth, IssueDate, ExpiryDate, Authority, LicenseNumber, Surname, GivenName],
    },
    FieldPattern {
        marker: Birth,
        kind: PayloadKind::DateAndPlace,
        min_len: 2,
        stops: &[IssueDate, ExpiryDate, Authority, LicenseNumber, Surname, GivenName, Birth],
    },
    FieldPattern {
        marker: IssueDate,
        kind: PayloadKind::Date,
        min_len: 0,
        stops: &[ExpiryDate, Authority, LicenseNumber, Surname, GivenName, Birth, IssueDate],
    },
    FieldPattern {
        marker: ExpiryDate,
        kind: PayloadKind::Date,
        min_len: 0,
        stops: &[Authority, LicenseNumber, Surname, GivenName, Birth, IssueDate, ExpiryDate],
    },
    FieldPattern {
        marker: LicenseNumber,
        kind: PayloadKind::LicenseNumber,
        min_len: 8,
        stops: &[Surname, GivenName, Birth, IssueDate, ExpiryDate, Authority, LicenseNumber],
    },
];

impl FieldPattern {
    /// Payload ranges for every occurrence of this field's marker.
    ///
    /// A payload runs from the end of the marker to the start of the first
    /// later stop marker, or to the end of the text.
    pub fn payloads(&self, hits: &[MarkerHit], text_len: usize) -> Vec<(usize, usize)> {
        hits.iter()
            .enumerate()
            .filter(|(_, hit)| hit.marker == self.marker)
            .map(|(i, hit)| {
                let end = hits[i + 1..]
                    .iter()
                    .find(|next| self.stops.contains(&next.marker))
                    .map(|next| next.start)
                    .unwrap_or(text_len);
                (hit.end, end)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_markers() {
        let text = "1. ROSSI 2. MARIO 4A. 01.01.2020 5. AB1234567CD";
        let hits = scan_markers(text);
        let markers: Vec<Marker> = hits.iter().map(|h| h.marker).collect();
        assert_eq!(markers, vec![Surname, GivenName, IssueDate, LicenseNumber]);
        assert_eq!(&text[hits[2].start..hits[2].end], "4A.");
    }

    #[test]
    fn test_every_extracted_marker_has_one_pattern() {
        for marker in Marker::ALL {
            let count = FIELD_TABLE.iter().filter(|s| s.marker == marker).count();
            let expected = if marker == Authority { 0 } else { 1 };
            assert_eq!(count, expected, "{}", marker.label());
        }
    }

    #[test]
    fn test_every_pattern_stops_on_every_marker() {
        for field in &FIELD_TABLE {
            for marker in Marker::ALL {
                assert!(field.stops.contains(&marker), "{} misses {}", field.marker.label(), marker.label());
            }
        }
    }

    #[test]
    fn test_payload_stops_at_any_later_marker() {
        // 2. is missing, 3. must still end the surname
        let text = "1. ROSSI 3. 01/02/85 ROMA";
        let hits = scan_markers(text);
        let payloads = FIELD_TABLE[0].payloads(&hits, text.len());
        assert_eq!(payloads.len(), 1);
        let (s, e) = payloads[0];
        assert_eq!(&text[s..e], " ROSSI ");
    }

    #[test]
    fn test_payload_runs_to_end_of_text() {
        let text = "5. AB1234567CD";
        let hits = scan_markers(text);
        let (s, e) = FIELD_TABLE[5].payloads(&hits, text.len())[0];
        assert_eq!(&text[s..e], " AB1234567CD");
    }
}
