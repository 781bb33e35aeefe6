//! License field records and roadside check rows.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Column schema of the check store, in append order.
pub const COLUMNS: [&str; 12] = [
    "DATA_ORA",
    "COMUNE",
    "VEICOLO",
    "TARGA",
    "COGNOME",
    "NOME",
    "LUOGO_NASCITA",
    "DATA_NASCITA",
    "COMMERCIALE",
    "COPE",
    "RILIEVI",
    "CINOFILI",
];

/// Column used to locate the header row in a store.
pub const TIMESTAMP_COLUMN: &str = "DATA_ORA";

/// Format of the `DATA_ORA` cell.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Day prefix of the `DATA_ORA` cell.
pub const DAY_FORMAT: &str = "%d/%m/%Y";

const YES: &str = "SI";
const NO: &str = "NO";

/// Whether a flag cell reads as "yes".
pub fn is_yes(cell: &str) -> bool {
    matches!(
        cell.trim().to_uppercase().as_str(),
        "SI" | "SÌ" | "SÍ" | "YES" | "S"
    )
}

fn flag(value: bool) -> &'static str {
    if value { YES } else { NO }
}

/// Identity fields of a driving license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Surname,
    GivenName,
    BirthDate,
    BirthPlace,
    IssueDate,
    ExpiryDate,
    LicenseNumber,
}

impl FieldKey {
    /// All keys, in record order.
    pub const ALL: [FieldKey; 7] = [
        FieldKey::Surname,
        FieldKey::GivenName,
        FieldKey::BirthDate,
        FieldKey::BirthPlace,
        FieldKey::IssueDate,
        FieldKey::ExpiryDate,
        FieldKey::LicenseNumber,
    ];

    /// Serialized key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Surname => "surname",
            FieldKey::GivenName => "given_name",
            FieldKey::BirthDate => "birth_date",
            FieldKey::BirthPlace => "birth_place",
            FieldKey::IssueDate => "issue_date",
            FieldKey::ExpiryDate => "expiry_date",
            FieldKey::LicenseNumber => "license_number",
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured output of license extraction.
///
/// Every field is always present; an empty string means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldRecord {
    /// Surname (field `1.`).
    pub surname: String,
    /// Given name (field `2.`).
    pub given_name: String,
    /// Birth date as `DD.MM.YYYY` (field `3.`).
    pub birth_date: String,
    /// Birth place (field `3.`).
    pub birth_place: String,
    /// Issue date as `DD.MM.YYYY` (field `4A.`).
    pub issue_date: String,
    /// Expiry date as `DD.MM.YYYY` (field `4B.`).
    pub expiry_date: String,
    /// License number (field `5.`).
    pub license_number: String,
}

impl FieldRecord {
    /// Value of a field.
    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Surname => &self.surname,
            FieldKey::GivenName => &self.given_name,
            FieldKey::BirthDate => &self.birth_date,
            FieldKey::BirthPlace => &self.birth_place,
            FieldKey::IssueDate => &self.issue_date,
            FieldKey::ExpiryDate => &self.expiry_date,
            FieldKey::LicenseNumber => &self.license_number,
        }
    }

    /// Mutable access to a field, used for operator edits.
    pub fn get_mut(&mut self, key: FieldKey) -> &mut String {
        match key {
            FieldKey::Surname => &mut self.surname,
            FieldKey::GivenName => &mut self.given_name,
            FieldKey::BirthDate => &mut self.birth_date,
            FieldKey::BirthPlace => &mut self.birth_place,
            FieldKey::IssueDate => &mut self.issue_date,
            FieldKey::ExpiryDate => &mut self.expiry_date,
            FieldKey::LicenseNumber => &mut self.license_number,
        }
    }

    /// Iterate `(key, value)` pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        FieldKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// True when no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, v)| v.is_empty())
    }

    /// Number of non-empty fields.
    pub fn found_count(&self) -> usize {
        self.iter().filter(|(_, v)| !v.is_empty()).count()
    }

    /// Birth date as a calendar date, if it is one.
    pub fn birth_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.birth_date, "%d.%m.%Y").ok()
    }
}

/// One roadside check: license identity plus operator-entered data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRecord {
    /// When the check was saved.
    pub timestamp: NaiveDateTime,
    /// Municipality where the checkpoint stands.
    pub municipality: String,
    /// Vehicle make and model.
    pub vehicle: String,
    /// Plate number.
    pub plate: String,
    pub surname: String,
    pub given_name: String,
    pub birth_place: String,
    pub birth_date: String,
    /// Commercial vehicle.
    pub commercial: bool,
    /// Special-unit (COPE) intervention.
    pub cope: bool,
    /// Contested findings; `Some` when findings were contested.
    pub findings: Option<String>,
    /// Dog-unit intervention.
    pub dog_unit: bool,
}

impl CheckRecord {
    /// Start a record from the (operator-confirmed) license fields.
    pub fn new(timestamp: NaiveDateTime, municipality: &str, identity: &FieldRecord) -> Self {
        Self {
            timestamp,
            municipality: clean(municipality),
            vehicle: String::new(),
            plate: String::new(),
            surname: clean(&identity.surname),
            given_name: clean(&identity.given_name),
            birth_place: clean(&identity.birth_place),
            birth_date: identity.birth_date.trim().to_string(),
            commercial: false,
            cope: false,
            findings: None,
            dog_unit: false,
        }
    }

    /// Set vehicle description and plate.
    pub fn with_vehicle(mut self, vehicle: &str, plate: &str) -> Self {
        self.vehicle = clean(vehicle);
        self.plate = clean(plate);
        self
    }

    /// Mark as commercial vehicle.
    pub fn with_commercial(mut self, commercial: bool) -> Self {
        self.commercial = commercial;
        self
    }

    /// Mark COPE intervention.
    pub fn with_cope(mut self, cope: bool) -> Self {
        self.cope = cope;
        self
    }

    /// Mark dog-unit intervention.
    pub fn with_dog_unit(mut self, dog_unit: bool) -> Self {
        self.dog_unit = dog_unit;
        self
    }

    /// Record contested findings.
    pub fn with_findings(mut self, findings: &str) -> Self {
        self.findings = Some(clean(findings));
        self
    }

    /// Whether findings were contested.
    pub fn contested(&self) -> bool {
        self.findings.is_some()
    }

    /// Row values in [`COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        let findings = match &self.findings {
            Some(text) if !text.is_empty() => text.clone(),
            Some(_) => YES.to_string(),
            None => String::new(),
        };

        vec![
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.municipality.clone(),
            self.vehicle.clone(),
            self.plate.clone(),
            self.surname.clone(),
            self.given_name.clone(),
            self.birth_place.clone(),
            self.birth_date.clone(),
            flag(self.commercial).to_string(),
            flag(self.cope).to_string(),
            findings,
            flag(self.dog_unit).to_string(),
        ]
    }

    /// Rebuild a record from a stored row.
    ///
    /// `header` holds the column names as found in the store (any order).
    /// Returns `None` when the timestamp is missing or unparsable.
    pub fn from_row(header: &[String], row: &[String]) -> Option<Self> {
        let cell = |name: &str| -> &str {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .and_then(|i| row.get(i))
                .map(|s| s.trim())
                .unwrap_or("")
        };

        let timestamp = parse_timestamp(cell("DATA_ORA"))?;
        let findings = match cell("RILIEVI") {
            "" => None,
            c if c.eq_ignore_ascii_case(NO) => None,
            c if is_yes(c) => Some(String::new()),
            c => Some(c.to_string()),
        };

        Some(Self {
            timestamp,
            municipality: cell("COMUNE").to_string(),
            vehicle: cell("VEICOLO").to_string(),
            plate: cell("TARGA").to_string(),
            surname: cell("COGNOME").to_string(),
            given_name: cell("NOME").to_string(),
            birth_place: cell("LUOGO_NASCITA").to_string(),
            birth_date: cell("DATA_NASCITA").to_string(),
            commercial: is_yes(cell("COMMERCIALE")),
            cope: is_yes(cell("COPE")),
            findings,
            dog_unit: is_yes(cell("CINOFILI")),
        })
    }
}

/// Parse a `DATA_ORA` cell.
pub fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(cell.trim(), TIMESTAMP_FORMAT).ok()
}

fn clean(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
