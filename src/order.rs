//! Wire-level order document.
//!
//! The order arrives from project requirements that users edit by hand, so
//! every field is optional and every value is coerced leniently. Nothing in
//! here decides what a missing value means; that happens in [`crate::demand`].

use crate::error::CpResult;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub urunler: Vec<Product>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        rename = "hesaplananGereksinimler",
        alias = "hesaplanan_gereksinimler",
        default,
        deserialize_with = "lenient"
    )]
    pub hesaplanan_gereksinimler: Requirements,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub profiller: Vec<ProfileLine>,
}

/// One demand line: a profile and a single `(kesim_olcusu, kesim_adedi)` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileLine {
    #[serde(
        default,
        deserialize_with = "loose_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub profil_id: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub profil: ProfileMeta,

    #[serde(default, deserialize_with = "lenient")]
    pub hesaplanan_degerler: CutValues,

    #[serde(
        default,
        deserialize_with = "loose_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub boyali: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileMeta {
    #[serde(
        default,
        deserialize_with = "loose_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub profil_isim: Option<String>,

    #[serde(
        default,
        deserialize_with = "loose_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub boy_uzunluk: Option<f64>,

    #[serde(
        default,
        deserialize_with = "loose_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub birim_agirlik: Option<f64>,

    #[serde(
        default,
        deserialize_with = "loose_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub boyali: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CutValues {
    #[serde(
        default,
        deserialize_with = "loose_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub kesim_olcusu: Option<f64>,

    #[serde(
        default,
        deserialize_with = "loose_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub kesim_adedi: Option<f64>,
}

impl ProfileLine {
    pub fn new(id: &str, name: &str, stock_length: f64, cut_length: f64, count: f64) -> Self {
        Self {
            profil_id: Some(id.to_string()),
            profil: ProfileMeta {
                profil_isim: Some(name.to_string()),
                boy_uzunluk: Some(stock_length),
                birim_agirlik: None,
                boyali: None,
            },
            hesaplanan_degerler: CutValues {
                kesim_olcusu: Some(cut_length),
                kesim_adedi: Some(count),
            },
            boyali: None,
        }
    }

    pub fn painted(mut self, painted: bool) -> Self {
        self.boyali = Some(painted);
        self
    }

    pub fn with_unit_weight(mut self, kg_per_m: f64) -> Self {
        self.profil.birim_agirlik = Some(kg_per_m);
        self
    }
}

impl Order {
    /// Single-product order, handy for callers that already hold flat lines.
    pub fn from_lines(lines: Vec<ProfileLine>) -> Self {
        Self {
            urunler: vec![Product {
                hesaplanan_gereksinimler: Requirements { profiller: lines },
            }],
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &ProfileLine> {
        self.urunler
            .iter()
            .flat_map(|p| p.hesaplanan_gereksinimler.profiller.iter())
    }

    pub fn from_json_str(s: &str) -> CpResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CpResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn load_csv<P: AsRef<Path>>(path: P) -> CpResult<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Reads flat demand rows. Header:
    /// `profil_id,profil_isim,boy_uzunluk,birim_agirlik,kesim_olcusu,kesim_adedi,boyali`.
    /// Unknown columns are ignored, missing ones are empty.
    pub fn from_csv_reader<R: Read>(reader: R) -> CpResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut lines = Vec::new();
        for (row_idx, result) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = result?;
            debug!("CSV row {}: {:?}", row_idx + 1, row);
            lines.push(row.into_line());
        }

        Ok(Self::from_lines(lines))
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    profil_id: Option<String>,
    #[serde(default)]
    profil_isim: Option<String>,
    #[serde(default)]
    boy_uzunluk: Option<String>,
    #[serde(default)]
    birim_agirlik: Option<String>,
    #[serde(default)]
    kesim_olcusu: Option<String>,
    #[serde(default)]
    kesim_adedi: Option<String>,
    #[serde(default)]
    boyali: Option<String>,
}

impl CsvRow {
    fn into_line(self) -> ProfileLine {
        let text = |v: Option<String>| v.and_then(|s| non_empty(&s));
        let number = |v: Option<String>| v.as_deref().and_then(parse_number);
        ProfileLine {
            profil_id: text(self.profil_id),
            profil: ProfileMeta {
                profil_isim: text(self.profil_isim),
                boy_uzunluk: number(self.boy_uzunluk),
                birim_agirlik: number(self.birim_agirlik),
                boyali: None,
            },
            hesaplanan_degerler: CutValues {
                kesim_olcusu: number(self.kesim_olcusu),
                kesim_adedi: number(self.kesim_adedi),
            },
            boyali: self.boyali.as_deref().and_then(parse_flag),
        }
    }
}

// --- Lenient value coercion ---

/// Accepts `1200`, `"1200"`, `" 1200,5 "`. Anything else is `None`.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".").parse::<f64>().ok()
}

pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "evet" | "e" => Some(true),
        "false" | "0" | "no" | "hayir" | "hayır" | "h" => Some(false),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

fn value_to_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn loose_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(value_to_f64))
}

fn loose_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) => non_empty(&s),
        _ => None,
    })
}

fn loose_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::String(s)) => non_empty(&s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn loose_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_f64().map(|x| x != 0.0),
        Some(Value::String(s)) => parse_flag(&s),
        _ => None,
    })
}

/// A sub-object of the wrong shape becomes its default instead of failing the document.
fn lenient<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

/// Keeps the array elements that have a usable shape and drops the rest.
fn lenient_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
