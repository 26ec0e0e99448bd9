// src/selection.rs
//! UI selection state: which country (and year) the charts focus on.

use serde::{Deserialize, Serialize};

/// Selection shared by the economic charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySelection {
    pub selected_country: String,
    pub active_year: i32,
}

impl Default for CountrySelection {
    fn default() -> Self {
        Self {
            selected_country: "United States".to_string(),
            active_year: 2008,
        }
    }
}

impl CountrySelection {
    pub fn set_selected_country(&mut self, country: impl Into<String>) {
        self.selected_country = country.into();
    }

    pub fn set_active_year(&mut self, year: i32) {
        self.active_year = year;
    }
}

/// Selection on the introduction page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroSelection {
    pub selected_country: String,
}

impl Default for IntroSelection {
    fn default() -> Self {
        Self {
            selected_country: "China".to_string(),
        }
    }
}

impl IntroSelection {
    pub fn set_selected_country(&mut self, country: impl Into<String>) {
        self.selected_country = country.into();
    }
}
