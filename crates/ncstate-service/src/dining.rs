// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// University Dining API: menus, hours, and locations.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use ncstate_core::config::{DiningSettings, HttpSettings};
use ncstate_core::error::{NcstateError, Result};
use ncstate_core::types::ResponseFormat;
use serde_json::Value;
use tracing::instrument;

use crate::query::QueryClient;

/// Meal filter for menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meal {
    All,
    Breakfast,
    Lunch,
    Brunch,
    Dinner,
}

impl Meal {
    pub const ALL: [Meal; 5] = [Self::All, Self::Breakfast, Self::Lunch, Self::Brunch, Self::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Brunch => "brunch",
            Self::Dinner => "dinner",
        }
    }
}

impl FromStr for Meal {
    type Err = NcstateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| invalid_choice("Meal", Self::ALL.iter().map(Meal::as_str)))
    }
}

/// Dietary filter for menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diet {
    Iron,
    WeightGain,
    LoseBodyFat,
    Calcium,
    Vegetarian,
    InactiveDay,
}

impl Diet {
    pub const ALL: [Diet; 6] = [
        Self::Iron,
        Self::WeightGain,
        Self::LoseBodyFat,
        Self::Calcium,
        Self::Vegetarian,
        Self::InactiveDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iron => "iron",
            Self::WeightGain => "weightGain",
            Self::LoseBodyFat => "loseBodyFat",
            Self::Calcium => "calcium",
            Self::Vegetarian => "vegetarian",
            Self::InactiveDay => "inactiveDay",
        }
    }
}

impl FromStr for Diet {
    type Err = NcstateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| invalid_choice("Diet", Self::ALL.iter().map(Diet::as_str)))
    }
}

fn invalid_choice<'a>(kind: &str, valid: impl Iterator<Item = &'a str>) -> NcstateError {
    let valid: Vec<_> = valid.collect();
    NcstateError::InvalidArgument(format!("{kind} type must be one of \"{}\"", valid.join(", ")))
}

/// Day a menu or opening hours apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuDate {
    Today,
    Tomorrow,
    On(NaiveDate),
}

impl fmt::Display for MenuDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => f.write_str("today"),
            Self::Tomorrow => f.write_str("tomorrow"),
            Self::On(date) => write!(f, "{}", date.format("%Y-%-m-%-d")),
        }
    }
}

impl FromStr for MenuDate {
    type Err = NcstateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
                .map(Self::On)
                .map_err(|_| {
                    NcstateError::InvalidArgument(format!(
                        "date must be \"today\", \"tomorrow\", or YYYY-M-D, got \"{s}\""
                    ))
                }),
        }
    }
}

/// Client for the Dining API.
#[derive(Debug, Clone)]
pub struct DiningClient {
    query: QueryClient,
    version: u32,
}

impl DiningClient {
    pub fn new(settings: &DiningSettings, http: &HttpSettings) -> Result<Self> {
        let client = ncstate_core::http::build_client(http)?;
        let mut query = QueryClient::new("Dining", settings.base_url.clone(), client);
        query.set_fixed_param("v", settings.api_version.to_string());
        Ok(Self {
            query,
            version: settings.api_version,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn set_version(&mut self, version: u32) -> &mut Self {
        self.version = version;
        self.query.set_fixed_param("v", version.to_string());
        self
    }

    pub fn format(&self) -> ResponseFormat {
        self.query.format()
    }

    pub fn set_format(&mut self, format: ResponseFormat) -> &mut Self {
        self.query.set_format(format);
        self
    }

    /// Underlying query client, for the last request/response.
    pub fn query(&self) -> &QueryClient {
        &self.query
    }

    /// Menu for a location, optionally narrowed by meal, day, and diet.
    #[instrument(skip(self))]
    pub async fn get_menu(
        &mut self,
        location: &str,
        meal: Option<Meal>,
        date: Option<MenuDate>,
        diet: Option<Diet>,
    ) -> Result<Value> {
        let mut args = vec![("location", location.to_owned())];
        if let Some(meal) = meal {
            args.push(("meal", meal.as_str().to_owned()));
        }
        if let Some(date) = date {
            args.push(("date", date.to_string()));
        }
        if let Some(diet) = diet {
            args.push(("diet", diet.as_str().to_owned()));
        }
        self.query.request("getMenu", &args).await
    }

    #[instrument(skip(self))]
    pub async fn get_hours(&mut self, location: &str, date: Option<MenuDate>) -> Result<Value> {
        let mut args = vec![("location", location.to_owned())];
        if let Some(date) = date {
            args.push(("date", date.to_string()));
        }
        self.query.request("getHours", &args).await
    }

    /// All locations, or only those of `location_type`.
    #[instrument(skip(self))]
    pub async fn get_locations(&mut self, location_type: Option<&str>) -> Result<Value> {
        let args: Vec<_> = location_type
            .map(|t| ("type", t.to_owned()))
            .into_iter()
            .collect();
        self.query.request("getLocations", &args).await
    }

    #[instrument(skip(self))]
    pub async fn get_location_types(&mut self) -> Result<Value> {
        self.query.request("getLocationTypes", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncstate_core::http::testing::serve_once;

    #[test]
    fn meal_parse_ignores_case() {
        assert_eq!("Lunch".parse::<Meal>().expect("meal"), Meal::Lunch);
        let err = "supper".parse::<Meal>().expect_err("invalid");
        assert_eq!(
            err.to_string(),
            "invalid argument: Meal type must be one of \"all, breakfast, lunch, brunch, dinner\""
        );
    }

    #[test]
    fn diet_parse_accepts_any_case() {
        assert_eq!("weightgain".parse::<Diet>().expect("diet"), Diet::WeightGain);
        assert_eq!("INACTIVEDAY".parse::<Diet>().expect("diet"), Diet::InactiveDay);
        assert!(matches!("keto".parse::<Diet>(), Err(NcstateError::InvalidArgument(_))));
    }

    #[test]
    fn menu_dates() {
        assert_eq!("Today".parse::<MenuDate>().expect("date"), MenuDate::Today);
        let date: MenuDate = "2026-03-07".parse().expect("date");
        assert_eq!(date.to_string(), "2026-3-7");
        assert!("next week".parse::<MenuDate>().is_err());
    }

    #[tokio::test]
    async fn menu_request_carries_version() {
        let body = r#"{"v2":{"getMenu":{"status":"success","items":[]}}}"#;
        let (base, server) = serve_once(200, "application/json", body).await;
        let settings = DiningSettings {
            base_url: format!("{base}/diningapi/"),
            ..DiningSettings::default()
        };
        let mut dining = DiningClient::new(&settings, &HttpSettings::default()).expect("client");

        dining
            .get_menu("fountain", Some(Meal::Dinner), None, Some(Diet::LoseBodyFat))
            .await
            .expect("menu");

        let request = server.await.expect("server");
        assert!(
            request.starts_with(
                "GET /diningapi/?location=fountain&meal=dinner&diet=loseBodyFat&method=getMenu&v=2&format=json "
            ),
            "{request}"
        );
    }

    #[tokio::test]
    async fn version_change_is_sent() {
        let body = r#"{"v3":{"getLocationTypes":{"status":"success"}}}"#;
        let (base, server) = serve_once(200, "application/json", body).await;
        let settings = DiningSettings {
            base_url: format!("{base}/"),
            ..DiningSettings::default()
        };
        let mut dining = DiningClient::new(&settings, &HttpSettings::default()).expect("client");
        dining.set_version(3);
        assert_eq!(dining.version(), 3);

        dining.get_location_types().await.expect("types");
        let request = server.await.expect("server");
        assert!(request.contains("&v=3&"), "{request}");
    }
}
