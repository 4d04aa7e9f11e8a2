use crate::error::MixError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Energy source tracked by the mix simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fossil,
    Nuclear,
    Renewable,
    Hydro,
    Other,
}

/// The four-slider layout: fossil, nuclear, renewable, hydro.
pub const FOUR_CATEGORIES: [Category; 4] = [
    Category::Fossil,
    Category::Nuclear,
    Category::Renewable,
    Category::Hydro,
];

/// The five-slider layout used by the Korea budget panel.
pub const FIVE_CATEGORIES: [Category; 5] = [
    Category::Nuclear,
    Category::Fossil,
    Category::Renewable,
    Category::Hydro,
    Category::Other,
];

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Fossil,
        Category::Nuclear,
        Category::Renewable,
        Category::Hydro,
        Category::Other,
    ];

    /// Stable lowercase key used in files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Category::Fossil => "fossil",
            Category::Nuclear => "nuclear",
            Category::Renewable => "renewable",
            Category::Hydro => "hydro",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Fossil => "Fossil fuels",
            Category::Nuclear => "Nuclear",
            Category::Renewable => "Renewables",
            Category::Hydro => "Hydro",
            Category::Other => "Other",
        }
    }

    /// Korean label, as used by the source datasets (e.g. the unit price table).
    pub fn label_ko(self) -> &'static str {
        match self {
            Category::Fossil => "화석연료",
            Category::Nuclear => "원자력",
            Category::Renewable => "신재생",
            Category::Hydro => "수력",
            Category::Other => "기타",
        }
    }

    /// Dashboard color as `(r, g, b)`.
    pub fn color_rgb(self) -> (u8, u8, u8) {
        match self {
            Category::Nuclear => (0x1f, 0x77, 0xb4),
            Category::Fossil => (0xff, 0x7f, 0x0e),
            Category::Renewable => (0x2c, 0xa0, 0x2c),
            Category::Hydro => (0x17, 0xa2, 0xb8),
            Category::Other => (0x94, 0x67, 0xbd),
        }
    }

    pub fn color_hex(self) -> String {
        let (r, g, b) = self.color_rgb();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = MixError;

    /// Accepts the key, the English label or the Korean label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.key().eq_ignore_ascii_case(t)
                    || c.label().eq_ignore_ascii_case(t)
                    || c.label_ko() == t
            })
            .ok_or_else(|| MixError::InvalidCategory(t.to_string()))
    }
}

/// Per-country metric available in the electricity dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    NetGeneration,
    NetConsumption,
    TradeBalance,
    Imports,
    SelfSufficiency,
}

impl Metric {
    pub fn key(self) -> &'static str {
        match self {
            Metric::NetGeneration => "net_generation",
            Metric::NetConsumption => "net_consumption",
            Metric::TradeBalance => "trade_balance",
            Metric::Imports => "imports",
            Metric::SelfSufficiency => "self_sufficiency_rate",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One country of the global electricity dataset (values in TWh, rate in %).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CountryRecord {
    /// Filled from the map key when loading; not part of the per-country object.
    #[serde(default, skip_serializing)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, deserialize_with = "de_year_series")]
    pub net_generation: BTreeMap<i32, f64>,
    #[serde(default, deserialize_with = "de_year_series")]
    pub net_consumption: BTreeMap<i32, f64>,
    #[serde(default, deserialize_with = "de_year_series")]
    pub trade_balance: BTreeMap<i32, f64>,
    #[serde(default, deserialize_with = "de_year_series")]
    pub imports: BTreeMap<i32, f64>,
    #[serde(default, deserialize_with = "de_year_series")]
    pub self_sufficiency_rate: BTreeMap<i32, f64>,
}

impl CountryRecord {
    /// Value of `metric` in `year`.
    ///
    /// The self-sufficiency rate falls back to `generation / consumption * 100`
    /// when the dataset carries no explicit rate for that year.
    pub fn value(&self, metric: Metric, year: i32) -> Option<f64> {
        match metric {
            Metric::NetGeneration => self.net_generation.get(&year).copied(),
            Metric::NetConsumption => self.net_consumption.get(&year).copied(),
            Metric::TradeBalance => self.trade_balance.get(&year).copied(),
            Metric::Imports => self.imports.get(&year).copied(),
            Metric::SelfSufficiency => self
                .self_sufficiency_rate
                .get(&year)
                .copied()
                .or_else(|| {
                    let generation = self.net_generation.get(&year)?;
                    let consumption = self.net_consumption.get(&year)?;
                    (*consumption > 0.0).then(|| generation / consumption * 100.0)
                }),
        }
    }

    /// Every year that appears in any series.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.net_generation
            .keys()
            .chain(self.net_consumption.keys())
            .chain(self.trade_balance.keys())
            .chain(self.imports.keys())
            .chain(self.self_sufficiency_rate.keys())
            .copied()
    }
}

/// Grouping key used in stats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub region: String,
    pub metric: Metric,
}

/// Serde helper: year-keyed series whose values may be numbers, numeric strings,
/// `null`, or placeholders such as `"--"`. Unparseable entries are dropped.
fn de_year_series<'de, D>(deserializer: D) -> Result<BTreeMap<i32, f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, LenientNumber>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(year, v)| {
            let year = year.trim().parse::<i32>().ok()?;
            v.0.filter(|x| x.is_finite()).map(|x| (year, x))
        })
        .collect())
}

struct LenientNumber(Option<f64>);

impl<'de> Deserialize<'de> for LenientNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        struct LenientVisitor;

        impl<'de> Visitor<'de> for LenientVisitor {
            type Value = LenientNumber;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a number, a numeric string, or null")
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(LenientNumber(Some(v)))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(LenientNumber(Some(v as f64)))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(LenientNumber(Some(v as f64)))
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(LenientNumber(s.trim().parse::<f64>().ok()))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(LenientNumber(None))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(LenientNumber(None))
            }
        }

        deserializer.deserialize_any(LenientVisitor)
    }
}

/// Serde helper: a single lenient number; placeholders and `null` become `None`.
pub(crate) fn de_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(LenientNumber::deserialize(deserializer)?
        .0
        .filter(|x| x.is_finite()))
}

/// Serde helper: a whole number given as a number or a numeric string (`2018`, `"2018"`).
pub(crate) fn de_whole<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    LenientNumber::deserialize(deserializer)?
        .0
        .filter(|x| x.is_finite() && x.fract() == 0.0)
        .map(|x| x as i32)
        .ok_or_else(|| D::Error::custom("expected a whole number"))
}
