use lazy_static::lazy_static;
use tracing::debug;

use crate::errors::*;

/// How units of a category relate to each other
#[derive(Clone, Debug, PartialEq)]
pub enum CategoryKind {
    /// every unit has a factor: how many base units one unit is
    Linear(Vec<f64>),
    /// Celsius, Fahrenheit and Kelvin: affine formulas through Celsius
    Temperature,
}

/// A named group of comparable units. Units keep declaration order
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    name: String,
    units: Vec<String>,
    kind: CategoryKind,
}

impl Category {
    /// Builds a linear category from `(unit, factor to base unit)` pairs
    pub fn linear(name: &str, units: &[(&str, f64)]) -> Self {
        Category {
            name: name.to_owned(),
            units: units.iter().map(|(u, _)| (*u).to_owned()).collect(),
            kind: CategoryKind::Linear(units.iter().map(|(_, f)| *f).collect()),
        }
    }

    fn temperature() -> Self {
        Category {
            name: "Temperature".to_owned(),
            units: vec!["Celsius".to_owned(), "Fahrenheit".to_owned(), "Kelvin".to_owned()],
            kind: CategoryKind::Temperature,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> Vec<&str> {
        self.units.iter().map(String::as_str).collect()
    }

    pub fn kind(&self) -> &CategoryKind {
        &self.kind
    }

    fn unit_index(&self, unit: &str) -> Result<usize, CalcError> {
        self.units
            .iter()
            .position(|u| u == unit)
            .ok_or_else(|| CalcError::UnknownUnit(self.name.clone(), unit.to_owned()))
    }

    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, CalcError> {
        let fi = self.unit_index(from)?;
        let ti = self.unit_index(to)?;
        match &self.kind {
            CategoryKind::Linear(factors) => Ok(value * factors[fi] / factors[ti]),
            CategoryKind::Temperature => {
                let celsius = match from {
                    "Fahrenheit" => (value - 32.0) * 5.0 / 9.0,
                    "Kelvin" => value - 273.15,
                    _ => value,
                };
                Ok(match to {
                    "Fahrenheit" => celsius * 9.0 / 5.0 + 32.0,
                    "Kelvin" => celsius + 273.15,
                    _ => celsius,
                })
            }
        }
    }
}

lazy_static! {
    static ref BUILTIN: Catalog = Catalog {
        categories: vec![
            Category::linear(
                "Length",
                &[
                    ("Meters", 1.0),
                    ("Kilometers", 1000.0),
                    ("Centimeters", 0.01),
                    ("Millimeters", 0.001),
                    ("Miles", 1609.344),
                    ("Yards", 0.9144),
                    ("Feet", 0.3048),
                    ("Inches", 0.0254),
                ],
            ),
            Category::linear(
                "Weight",
                &[
                    ("Kilograms", 1.0),
                    ("Grams", 0.001),
                    ("Milligrams", 0.000001),
                    ("Pounds", 0.453592),
                    ("Ounces", 0.0283495),
                    ("Tons", 1000.0),
                ],
            ),
            Category::temperature(),
            Category::linear(
                "Volume",
                &[
                    ("Liters", 1.0),
                    ("Milliliters", 0.001),
                    ("Gallons", 3.78541),
                    ("Quarts", 0.946353),
                    ("Pints", 0.473176),
                    ("Cups", 0.236588),
                    ("Fluid Ounces", 0.0295735),
                ],
            ),
            Category::linear(
                "Time",
                &[
                    ("Seconds", 1.0),
                    ("Minutes", 60.0),
                    ("Hours", 3600.0),
                    ("Days", 86400.0),
                    ("Weeks", 604800.0),
                    ("Years", 31536000.0),
                ],
            ),
            Category::linear(
                "Speed",
                &[
                    ("Meters/second", 1.0),
                    ("Kilometers/hour", 0.277778),
                    ("Miles/hour", 0.44704),
                    ("Feet/second", 0.3048),
                    ("Knots", 0.514444),
                ],
            ),
            Category::linear(
                "Data",
                &[
                    ("Bits", 0.125),
                    ("Bytes", 1.0),
                    ("Kilobytes", 1024.0),
                    ("Megabytes", 1048576.0),
                    ("Gigabytes", 1073741824.0),
                    ("Terabytes", 1099511627776.0),
                ],
            ),
        ],
    };
}

/// Immutable table of conversion categories
#[derive(Clone, Debug)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// The built-in catalog: Length, Weight, Temperature, Volume, Time,
    /// Speed and Data
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn category(&self, name: &str) -> Result<&Category, CalcError> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CalcError::UnknownCategory(name.to_owned()))
    }

    pub fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name()).collect()
    }

    pub fn units(&self, category: &str) -> Result<Vec<&str>, CalcError> {
        Ok(self.category(category)?.units())
    }

    pub fn convert(&self, value: f64, category: &str, from: &str, to: &str) -> Result<f64, CalcError> {
        let res = self.category(category)?.convert(value, from, to);
        match &res {
            Ok(v) => debug!(value, category, from, to, result = v, "converted"),
            Err(e) => debug!(value, category, from, to, error = %e, "conversion failed"),
        }
        res
    }
}
