pub mod bar_chart;
pub mod bubble_chart;
pub mod bubble_map;
pub mod bubbles;
pub mod choropleth;
pub mod color;
pub mod marks;
pub mod scale;
pub mod selection;
pub mod slope_chart;
pub mod surface;
pub mod tooltip;
pub mod world;

use scale::DomainPolicy;

/// Every chart the page can switch between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
	Bar,
	Bubble,
	Choropleth,
	BubbleMap,
	Slope,
}

impl ChartKind {
	pub const ALL: [ChartKind; 5] = [
		ChartKind::Bar,
		ChartKind::Bubble,
		ChartKind::Choropleth,
		ChartKind::BubbleMap,
		ChartKind::Slope,
	];

	pub fn id(self) -> &'static str {
		match self {
			ChartKind::Bar => "bar",
			ChartKind::Bubble => "bubble",
			ChartKind::Choropleth => "choropleth",
			ChartKind::BubbleMap => "bubble-map",
			ChartKind::Slope => "slope",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			ChartKind::Bar => "Bar chart",
			ChartKind::Bubble => "Bubble chart",
			ChartKind::Choropleth => "World map",
			ChartKind::BubbleMap => "Bubble map",
			ChartKind::Slope => "Slope chart",
		}
	}

	pub fn from_id(id: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.id() == id)
	}

	/// Whether the chart shows a single year, and so whether playback makes sense.
	pub fn uses_year(self) -> bool {
		!matches!(self, ChartKind::Slope)
	}

	pub fn domain_policy(self) -> DomainPolicy {
		match self {
			ChartKind::Bar | ChartKind::Choropleth | ChartKind::BubbleMap => {
				DomainPolicy::DatasetGlobal
			}
			ChartKind::Bubble | ChartKind::Slope => DomainPolicy::YearLocal,
		}
	}

	/// Map charts need the world topology before they can draw.
	pub fn needs_world(self) -> bool {
		matches!(self, ChartKind::Choropleth | ChartKind::BubbleMap)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_round_trip() {
		for kind in ChartKind::ALL {
			assert_eq!(ChartKind::from_id(kind.id()), Some(kind));
		}
		assert_eq!(ChartKind::from_id("pie"), None);
	}

	#[test]
	fn only_slope_ignores_the_year() {
		let without: Vec<_> = ChartKind::ALL.into_iter().filter(|k| !k.uses_year()).collect();
		assert_eq!(without, [ChartKind::Slope]);
	}

	#[test]
	fn stable_domains_for_bars_and_maps() {
		assert_eq!(ChartKind::Bar.domain_policy(), DomainPolicy::DatasetGlobal);
		assert_eq!(ChartKind::Choropleth.domain_policy(), DomainPolicy::DatasetGlobal);
		assert_eq!(ChartKind::BubbleMap.domain_policy(), DomainPolicy::DatasetGlobal);
		assert_eq!(ChartKind::Bubble.domain_policy(), DomainPolicy::YearLocal);
		assert_eq!(ChartKind::Slope.domain_policy(), DomainPolicy::YearLocal);
	}
}
