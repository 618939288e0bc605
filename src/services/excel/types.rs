use calamine::Data;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const HEADER_PLACEHOLDER_PREFIX: &str = "Column_";

/// The kind of a raw spreadsheet cell, as seen by normalization.
///
/// Formula cells wrap the cached result the workbook stored for them; a
/// missing or error result means the formula could not be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum CellKind<'a> {
    Blank,
    Text(&'a str),
    Integer(i64),
    Number(f64),
    Date(NaiveDate),
    Boolean(bool),
    Formula {
        expression: &'a str,
        result: Box<CellKind<'a>>,
    },
    Error(String),
    Other(String),
}

impl<'a> CellKind<'a> {
    pub fn with_formula(self, expression: Option<&'a str>) -> Self {
        match expression {
            Some(expression) if !expression.is_empty() => CellKind::Formula {
                expression,
                result: Box::new(self),
            },
            _ => self,
        }
    }

    /// Returns the formula text when this is a formula whose result can't be used.
    pub fn formula_failure(&self) -> Option<&'a str> {
        match self {
            CellKind::Formula { expression, result } if !result.is_evaluated_value() => {
                Some(*expression)
            }
            _ => None,
        }
    }

    fn is_evaluated_value(&self) -> bool {
        matches!(
            self,
            CellKind::Text(_)
                | CellKind::Integer(_)
                | CellKind::Number(_)
                | CellKind::Date(_)
                | CellKind::Boolean(_)
        )
    }
}

impl<'a> From<&'a Data> for CellKind<'a> {
    fn from(value: &'a Data) -> Self {
        match value {
            Data::Empty => CellKind::Blank,
            Data::String(s) => CellKind::Text(s),
            Data::Int(i) => CellKind::Integer(*i),
            Data::Float(f) => CellKind::Number(*f),
            Data::Bool(b) => CellKind::Boolean(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(datetime) => CellKind::Date(datetime.date()),
                None => CellKind::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => match parse_iso_date(s) {
                Some(date) => CellKind::Date(date),
                None => CellKind::Other(s.clone()),
            },
            Data::DurationIso(s) => CellKind::Other(s.clone()),
            Data::Error(e) => CellKind::Error(e.to_string()),
        }
    }
}

/// ISO values carry either a bare date or a date followed by a time part.
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let date_part = s.get(..10)?;
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}
