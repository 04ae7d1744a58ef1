use chrono::{DateTime, FixedOffset, NaiveDate};
use log::{info, warn};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BASE_URL: &str = "https://api.openweathermap.org/";

#[derive(Debug, Error)]
pub enum OwmError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no match for location {0:?}")]
    UnknownLocation(String),
}

/// One resolved search: the geocoded place plus the forecast for its
/// coordinates. The forecast call is only issued once geocoding succeeds.
pub struct WeatherReport {
    pub place: geocoding::Place,
    pub forecast: forecast::Forecast,
}

impl WeatherReport {
    pub fn for_place(query: &str, api_key: &str) -> Result<Self, OwmError> {
        let place = geocoding::Place::lookup(query, api_key)?;
        let forecast = forecast::Forecast::from_coord(place.lat, place.lon, api_key)?;
        Ok(Self { place, forecast })
    }
}

pub mod geocoding {
    use super::*;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Place {
        pub name: String,
        pub lat: f64,
        pub lon: f64,
        pub country: Option<String>,
    }

    impl Place {
        /// Resolves a district name to coordinates, keeping the best match.
        pub fn lookup(query: &str, api_key: &str) -> Result<Self, OwmError> {
            info!("geocoding {query:?}");
            let url = format!("{BASE_URL}geo/1.0/direct");
            let places: Vec<Place> =
                get_web_json(&url, &[("q", query), ("limit", "1"), ("appid", api_key)])?
                    .error_for_status()?
                    .json()?;
            let place = places
                .into_iter()
                .next()
                .ok_or_else(|| OwmError::UnknownLocation(query.to_string()))?;
            info!(
                "matched {} at ({:.4}, {:.4})",
                place.name, place.lat, place.lon
            );
            Ok(place)
        }
    }
}

pub mod forecast {
    use super::*;

    #[derive(Deserialize, Debug, Default)]
    pub struct Forecast {
        pub city: City,
        pub list: Vec<Entry>,
    }

    impl Forecast {
        /// Fetches the 5-day/3-hour forecast for a coordinate. Entries with a
        /// timestamp that cannot be represented are dropped here so that the
        /// rest of the app never sees them.
        pub fn from_coord(lat: f64, lon: f64, api_key: &str) -> Result<Self, OwmError> {
            info!("fetching forecast for ({lat:.4}, {lon:.4})");
            let url = format!("{BASE_URL}data/2.5/forecast");
            let query = [
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
            ];
            let mut fc: Forecast = get_web_json(&url, &query)?.error_for_status()?.json()?;

            let before = fc.list.len();
            fc.list
                .retain(|e| DateTime::from_timestamp(e.dt, 0).is_some());
            if fc.list.len() < before {
                warn!(
                    "dropped {} forecast entries with out-of-range timestamps",
                    before - fc.list.len()
                );
            }
            Ok(fc)
        }

        /// UTC offset of the forecast location, as reported by the feed.
        pub fn utc_offset(&self) -> FixedOffset {
            FixedOffset::east_opt(self.city.timezone)
                .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
        }
    }

    #[derive(Deserialize, Debug, Default)]
    pub struct City {
        pub name: String,

        /// Seconds east of UTC.
        #[serde(default)]
        pub timezone: i32,
    }

    /// One 3-hour forecast sample.
    #[derive(Deserialize, Debug, Clone)]
    pub struct Entry {
        pub dt: i64,

        pub main: Main,

        pub wind: Wind,

        pub clouds: Clouds,

        pub weather: Vec<Weather>,
    }

    impl Entry {
        pub fn local_datetime(&self, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
            DateTime::from_timestamp(self.dt, 0).map(|utc| utc.with_timezone(&offset))
        }

        pub fn local_date(&self, offset: FixedOffset) -> Option<NaiveDate> {
            self.local_datetime(offset).map(|dt| dt.date_naive())
        }

        pub fn description(&self) -> Option<&str> {
            self.weather.first().map(|w| w.description.as_str())
        }
    }

    #[derive(Deserialize, Debug, Clone)]
    pub struct Main {
        /// Kelvin. The request sends no `units` parameter.
        pub temp: f64,

        pub humidity: u8,
    }

    #[derive(Deserialize, Debug, Clone)]
    pub struct Wind {
        /// Meters per second.
        pub speed: f64,
    }

    #[derive(Deserialize, Debug, Clone)]
    pub struct Clouds {
        /// Coverage, 0-100.
        pub all: u8,
    }

    #[derive(Deserialize, Debug, Clone)]
    pub struct Weather {
        pub description: String,
    }
}

fn get_web_json<Q: Serialize + ?Sized>(url: &str, query: &Q) -> Result<Response, reqwest::Error> {
    let client = Client::builder().user_agent("wxcast").build()?;
    client.get(url).query(query).send()
}

#[cfg(test)]
mod tests {
    use super::forecast::Forecast;
    use super::geocoding::Place;

    #[test]
    fn parse_geocoding_response() {
        let json = r#"[{"name":"Dhaka","lat":23.7644,"lon":90.389,"country":"BD"}]"#;
        let places: Vec<Place> = serde_json::from_str(json).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Dhaka");
        assert_eq!(places[0].country.as_deref(), Some("BD"));
    }

    #[test]
    fn parse_forecast_response() {
        let json = r#"{
            "city": {"name": "Dhaka", "timezone": 21600},
            "list": [{
                "dt": 1700000000,
                "main": {"temp": 301.2, "humidity": 78},
                "wind": {"speed": 3.6},
                "clouds": {"all": 40},
                "weather": [{"description": "scattered clouds"}]
            }]
        }"#;
        let fc: Forecast = serde_json::from_str(json).unwrap();
        assert_eq!(fc.city.name, "Dhaka");
        assert_eq!(fc.list.len(), 1);
        assert_eq!(fc.list[0].main.humidity, 78);
        assert_eq!(fc.list[0].description(), Some("scattered clouds"));
        assert_eq!(fc.utc_offset().local_minus_utc(), 21600);
    }

    #[test]
    fn missing_weather_array_entry() {
        let json = r#"{
            "city": {"name": "Nowhere"},
            "list": [{
                "dt": 1700000000,
                "main": {"temp": 280.0, "humidity": 50},
                "wind": {"speed": 0.0},
                "clouds": {"all": 0},
                "weather": []
            }]
        }"#;
        let fc: Forecast = serde_json::from_str(json).unwrap();
        assert_eq!(fc.list[0].description(), None);
        assert_eq!(fc.utc_offset().local_minus_utc(), 0);
    }
}
