use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A student on a transport route, as stored and as returned over HTTP.
///
/// Field names on the wire match the stored document keys. Records written by
/// the administrative path are loosely typed: a field may be missing, null, a
/// number where text is expected or the other way round. Decoding never fails
/// on those; text fields fall back to an empty string and numeric fields to
/// `None`. Records without coordinates are still returned; hiding them from
/// the map is the consumer's call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentRecord {
    #[serde(rename = "Name", default, deserialize_with = "deserialize_text")]
    pub name: String,

    /// Two letters followed by two digits, e.g. `AB12`.
    #[serde(rename = "StudentId", default, deserialize_with = "deserialize_text")]
    pub student_id: String,

    #[serde(
        rename = "RouteNo",
        default,
        deserialize_with = "deserialize_route_no",
        skip_serializing_if = "Option::is_none"
    )]
    pub route_no: Option<i64>,

    #[serde(rename = "Area", default, deserialize_with = "deserialize_text")]
    pub area: String,

    #[serde(rename = "Address", default, deserialize_with = "deserialize_text")]
    pub address: String,

    #[serde(rename = "Pickup", default, deserialize_with = "deserialize_text")]
    pub pickup: String,

    #[serde(rename = "Drop", default, deserialize_with = "deserialize_text")]
    pub drop: String,

    #[serde(rename = "Grade", default, deserialize_with = "deserialize_text")]
    pub grade: String,

    #[serde(
        default,
        deserialize_with = "deserialize_coordinate",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,

    #[serde(
        default,
        deserialize_with = "deserialize_coordinate",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,
}

/// Any stored scalar. Arrays, sub-documents and other exotic values land in
/// `Other` and are discarded.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Other(IgnoredAny),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(f) if f.fract() == 0.0 && f.is_finite() => (f as i64).to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Text(s) => s,
            Scalar::Other(_) => String::new(),
        }
    }

    fn into_float(self) -> Option<f64> {
        match self {
            Scalar::Integer(n) => Some(n as f64),
            Scalar::Float(f) if f.is_finite() => Some(f),
            Scalar::Text(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
            _ => None,
        }
    }

    fn into_integer(self) -> Option<i64> {
        match self {
            Scalar::Integer(n) => Some(n),
            Scalar::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(f as i64),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

fn deserialize_scalar<'de, D>(deserializer: D) -> Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Scalar>::deserialize(deserializer)
}

/// Strings pass through, numbers and booleans are stringified, null is empty.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_scalar(deserializer)?
        .map(Scalar::into_text)
        .unwrap_or_default())
}

/// Route numbers arrive as whatever numeric type the writer used, occasionally
/// as text. Anything that is not a whole number is dropped.
fn deserialize_route_no<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_scalar(deserializer)?.and_then(Scalar::into_integer))
}

fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_scalar(deserializer)?.and_then(Scalar::into_float))
}

/// Search criteria for one lookup call.
///
/// Each field is the raw text supplied by the caller. `None` and empty strings
/// both mean "no constraint on this field".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub name: Option<String>,
    pub student_id: Option<String>,
    pub route_no: Option<String>,
    pub address: Option<String>,
    pub area: Option<String>,
}

impl Criteria {
    /// Builds criteria from decoded query-string pairs. Unrecognised keys are
    /// ignored; when a key repeats, the last value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut criteria = Criteria::default();

        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "Name" => &mut criteria.name,
                "StudentId" => &mut criteria.student_id,
                "RouteNo" => &mut criteria.route_no,
                "Address" => &mut criteria.address,
                "Area" => &mut criteria.area,
                _ => continue,
            };
            *slot = Some(value.into());
        }

        criteria
    }
}
