//! Dashboard navigation state: which view is showing, for which year and country.

use crate::dataset::{DEFAULT_TOP_N, Dataset};
use serde::{Deserialize, Serialize};

/// Country that opens the Korea view instead of the detail panel.
pub const KOREA: &str = "South Korea";

/// Year shown on first load.
pub const DEFAULT_YEAR: i32 = 2018;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum View {
    #[default]
    World,
    Korea,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub view: View,
    pub year: i32,
    pub selected_country: Option<String>,
    /// Country shown in the detail panel (world view only).
    pub detail_country: Option<String>,
    pub show_all_countries: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view: View::World,
            year: DEFAULT_YEAR,
            selected_country: None,
            detail_country: None,
            show_all_countries: false,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Country picker: Korea opens its view, the empty entry returns to the world map.
    pub fn select_country(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.selected_country = None;
            self.view = View::World;
            return;
        }
        self.selected_country = Some(name.to_string());
        if name == KOREA {
            self.view = View::Korea;
            self.detail_country = None;
        }
    }

    /// Map click: Korea opens its view, other known countries open the detail panel.
    /// Returns whether anything changed.
    pub fn click_country(&mut self, name: &str, ds: &Dataset) -> bool {
        if name == KOREA {
            self.view = View::Korea;
            self.selected_country = Some(KOREA.to_string());
            self.detail_country = None;
            return true;
        }
        match ds.get(name) {
            Some(record) => {
                self.detail_country = Some(record.name.clone());
                true
            }
            None => false,
        }
    }

    pub fn close_detail(&mut self) {
        self.detail_country = None;
    }

    /// Back to the world map, keeping year and ranking toggle.
    pub fn show_world(&mut self) {
        self.view = View::World;
        self.selected_country = None;
    }

    /// Set the year, clamped to `bounds` when given.
    pub fn set_year(&mut self, year: i32, bounds: Option<(i32, i32)>) {
        self.year = match bounds {
            Some((lo, hi)) => year.clamp(lo, hi),
            None => year,
        };
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all_countries = !self.show_all_countries;
    }

    /// Row limit for the consumption ranking.
    pub fn ranking_limit(&self) -> Option<usize> {
        if self.show_all_countries {
            None
        } else {
            Some(DEFAULT_TOP_N)
        }
    }

    /// Whether hovering `name` should point at the show-all toggle because the
    /// country is hidden from the current ranking.
    pub fn hidden_from_ranking(&self, name: &str, ds: &Dataset) -> bool {
        !self.show_all_countries
            && ds.get(name).is_some()
            && !ds.in_top(name, self.year, DEFAULT_TOP_N)
    }
}
