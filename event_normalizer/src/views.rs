use crate::aggregate::CountryAggregate;

// Approximate centre of each country, as (latitude, longitude).
const COUNTRY_COORDS: [(&str, (f64, f64)); 11] = [
    ("poland", (51.9194, 19.1451)),
    ("bolivia", (-16.4897, -68.1193)),
    ("venezuela", (6.4238, -66.5897)),
    ("paraguay", (-23.4425, -58.4438)),
    ("colombia", (4.5709, -74.2973)),
    ("cuba", (21.5218, -77.7812)),
    ("germany", (51.1657, 10.4515)),
    ("united states", (37.0902, -95.7129)),
    ("spain", (40.4637, -3.7492)),
    ("france", (46.2276, 2.2137)),
    ("italy", (41.8719, 12.5674)),
];

pub fn country_coordinates(country: &str) -> Option<(f64, f64)> {
    COUNTRY_COORDS
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, coords)| *coords)
}

/// The label shown for a normalized country: `"Unknown"` for the empty
/// bucket, otherwise the name with an upper-case first letter.
pub fn display_country(country: &str) -> String {
    let mut chars = country.chars();
    match chars.next() {
        None => "Unknown".to_string(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Maps amounts onto a green (low) to red (high) colour ramp.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct FundsScale {
    pub min: f64,
    pub max: f64,
}

impl FundsScale {
    /// The scale of a set of amounts. The lower bound never exceeds 0 and the
    /// upper bound is never below 1, so an empty set still gives a usable
    /// scale.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> FundsScale {
        values.into_iter().fold(
            FundsScale { min: 0.0, max: 1.0 },
            |scale, v| FundsScale {
                min: scale.min.min(v),
                max: scale.max.max(v),
            },
        )
    }

    /// Position of `value` on the scale, in `[0, 1]`.
    pub fn ratio(&self, value: f64) -> f64 {
        if self.max == self.min {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// An HSL colour whose hue goes from 120 (green) at the bottom of the
    /// scale to 0 (red) at the top.
    pub fn color(&self, value: f64) -> String {
        if self.max == self.min {
            return "hsl(10 80% 50%)".to_string();
        }
        let hue = ((1.0 - self.ratio(value)) * 120.0).round() as i64;
        format!("hsl({} 75% 45%)", hue)
    }
}

/// A circle to draw on the map for one country.
#[derive(PartialEq, Debug, Clone)]
pub struct MapMarker {
    pub country: String,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub total_funds: f64,
    pub event_count: usize,
    pub radius: f64,
    pub color: String,
}

/// One marker per country bucket with known coordinates. The radius grows
/// from 6 with the share of the largest bucket total.
pub fn map_markers(aggregates: &[CountryAggregate<'_>]) -> Vec<MapMarker> {
    let scale = FundsScale::from_values(aggregates.iter().map(|a| a.total_funds));
    aggregates
        .iter()
        .filter_map(|agg| {
            let (latitude, longitude) = country_coordinates(agg.country)?;
            Some(MapMarker {
                country: agg.country.to_string(),
                label: display_country(agg.country),
                latitude,
                longitude,
                total_funds: agg.total_funds,
                event_count: agg.events.len(),
                radius: 6.0 + (agg.total_funds / scale.max) * 30.0,
                color: scale.color(agg.total_funds),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(display_country(""), "Unknown");
        assert_eq!(display_country("poland"), "Poland");
        assert_eq!(display_country("united states"), "United states");
        assert_eq!(display_country("ñu"), "Ñu");
    }

    #[test]
    fn scale_bounds() {
        let s = FundsScale::from_values(vec![]);
        assert_eq!(s, FundsScale { min: 0.0, max: 1.0 });
        let s = FundsScale::from_values(vec![50.0, 200.0]);
        assert_eq!(s, FundsScale { min: 0.0, max: 200.0 });
        assert_eq!(s.ratio(100.0), 0.5);
        assert_eq!(s.ratio(500.0), 1.0);
    }

    #[test]
    fn colors() {
        let s = FundsScale { min: 0.0, max: 100.0 };
        assert_eq!(s.color(0.0), "hsl(120 75% 45%)");
        assert_eq!(s.color(100.0), "hsl(0 75% 45%)");
        assert_eq!(s.color(50.0), "hsl(60 75% 45%)");
        let flat = FundsScale { min: 3.0, max: 3.0 };
        assert_eq!(flat.color(3.0), "hsl(10 80% 50%)");
    }

    #[test]
    fn coordinates() {
        assert_eq!(country_coordinates("poland"), Some((51.9194, 19.1451)));
        assert_eq!(country_coordinates("Poland"), None);
        assert_eq!(country_coordinates(""), None);
    }
}
