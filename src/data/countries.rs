//! Country code resolution between the map's numeric ids and the datasets'
//! alpha-3 codes, including fallbacks for countries that no longer exist.

use std::collections::HashMap;

/// ISO 3166-1 numeric id and alpha-3 code pairs.
const ISO_3166: &[(u16, &str)] = &[
	(4, "AFG"), (248, "ALA"), (8, "ALB"), (12, "DZA"), (16, "ASM"), (20, "AND"), (24, "AGO"),
	(660, "AIA"), (10, "ATA"), (28, "ATG"), (32, "ARG"), (51, "ARM"), (533, "ABW"), (36, "AUS"),
	(40, "AUT"), (31, "AZE"), (44, "BHS"), (48, "BHR"), (50, "BGD"), (52, "BRB"), (112, "BLR"),
	(56, "BEL"), (84, "BLZ"), (204, "BEN"), (60, "BMU"), (64, "BTN"), (68, "BOL"), (535, "BES"),
	(70, "BIH"), (72, "BWA"), (74, "BVT"), (76, "BRA"), (86, "IOT"), (96, "BRN"), (100, "BGR"),
	(854, "BFA"), (108, "BDI"), (132, "CPV"), (116, "KHM"), (120, "CMR"), (124, "CAN"),
	(136, "CYM"), (140, "CAF"), (148, "TCD"), (152, "CHL"), (156, "CHN"), (162, "CXR"),
	(166, "CCK"), (170, "COL"), (174, "COM"), (178, "COG"), (180, "COD"), (184, "COK"),
	(188, "CRI"), (384, "CIV"), (191, "HRV"), (192, "CUB"), (531, "CUW"), (196, "CYP"),
	(203, "CZE"), (208, "DNK"), (262, "DJI"), (212, "DMA"), (214, "DOM"), (218, "ECU"),
	(818, "EGY"), (222, "SLV"), (226, "GNQ"), (232, "ERI"), (233, "EST"), (748, "SWZ"),
	(231, "ETH"), (238, "FLK"), (234, "FRO"), (242, "FJI"), (246, "FIN"), (250, "FRA"),
	(254, "GUF"), (258, "PYF"), (260, "ATF"), (266, "GAB"), (270, "GMB"), (268, "GEO"),
	(276, "DEU"), (288, "GHA"), (292, "GIB"), (300, "GRC"), (304, "GRL"), (308, "GRD"),
	(312, "GLP"), (316, "GUM"), (320, "GTM"), (831, "GGY"), (324, "GIN"), (624, "GNB"),
	(328, "GUY"), (332, "HTI"), (334, "HMD"), (336, "VAT"), (340, "HND"), (344, "HKG"),
	(348, "HUN"), (352, "ISL"), (356, "IND"), (360, "IDN"), (364, "IRN"), (368, "IRQ"),
	(372, "IRL"), (833, "IMN"), (376, "ISR"), (380, "ITA"), (388, "JAM"), (392, "JPN"),
	(832, "JEY"), (400, "JOR"), (398, "KAZ"), (404, "KEN"), (296, "KIR"), (408, "PRK"),
	(410, "KOR"), (414, "KWT"), (417, "KGZ"), (418, "LAO"), (428, "LVA"), (422, "LBN"),
	(426, "LSO"), (430, "LBR"), (434, "LBY"), (438, "LIE"), (440, "LTU"), (442, "LUX"),
	(446, "MAC"), (450, "MDG"), (454, "MWI"), (458, "MYS"), (462, "MDV"), (466, "MLI"),
	(470, "MLT"), (584, "MHL"), (474, "MTQ"), (478, "MRT"), (480, "MUS"), (175, "MYT"),
	(484, "MEX"), (583, "FSM"), (498, "MDA"), (492, "MCO"), (496, "MNG"), (499, "MNE"),
	(500, "MSR"), (504, "MAR"), (508, "MOZ"), (104, "MMR"), (516, "NAM"), (520, "NRU"),
	(524, "NPL"), (528, "NLD"), (540, "NCL"), (554, "NZL"), (558, "NIC"), (562, "NER"),
	(566, "NGA"), (570, "NIU"), (574, "NFK"), (807, "MKD"), (580, "MNP"), (578, "NOR"),
	(512, "OMN"), (586, "PAK"), (585, "PLW"), (275, "PSE"), (591, "PAN"), (598, "PNG"),
	(600, "PRY"), (604, "PER"), (608, "PHL"), (612, "PCN"), (616, "POL"), (620, "PRT"),
	(630, "PRI"), (634, "QAT"), (638, "REU"), (642, "ROU"), (643, "RUS"), (646, "RWA"),
	(652, "BLM"), (654, "SHN"), (659, "KNA"), (662, "LCA"), (663, "MAF"), (666, "SPM"),
	(670, "VCT"), (882, "WSM"), (674, "SMR"), (678, "STP"), (682, "SAU"), (686, "SEN"),
	(688, "SRB"), (690, "SYC"), (694, "SLE"), (702, "SGP"), (534, "SXM"), (703, "SVK"),
	(705, "SVN"), (90, "SLB"), (706, "SOM"), (710, "ZAF"), (239, "SGS"), (728, "SSD"),
	(724, "ESP"), (144, "LKA"), (729, "SDN"), (740, "SUR"), (744, "SJM"), (752, "SWE"),
	(756, "CHE"), (760, "SYR"), (158, "TWN"), (762, "TJK"), (834, "TZA"), (764, "THA"),
	(626, "TLS"), (768, "TGO"), (772, "TKL"), (776, "TON"), (780, "TTO"), (788, "TUN"),
	(792, "TUR"), (795, "TKM"), (796, "TCA"), (798, "TUV"), (800, "UGA"), (804, "UKR"),
	(784, "ARE"), (826, "GBR"), (840, "USA"), (581, "UMI"), (858, "URY"), (860, "UZB"),
	(548, "VUT"), (862, "VEN"), (704, "VNM"), (92, "VGB"), (850, "VIR"), (876, "WLF"),
	(732, "ESH"), (887, "YEM"), (894, "ZMB"), (716, "ZWE"),
];

/// Sovereign states plus the historical entities the datasets still report.
/// Everything else in a dataset (regions, income groups, "World") is an aggregate.
const REAL_COUNTRY_CODES: &[&str] = &[
	"AFG", "ALB", "DZA", "AND", "AGO", "ATG", "ARG", "ARM", "AUS", "AUT", "AZE", "BHS", "BHR",
	"BGD", "BRB", "BLR", "BEL", "BLZ", "BEN", "BTN", "BOL", "BIH", "BWA", "BRA", "BRN", "BGR",
	"BFA", "BDI", "CPV", "KHM", "CMR", "CAN", "CAF", "TCD", "CHL", "CHN", "COL", "COM", "COG",
	"COD", "CRI", "CIV", "HRV", "CUB", "CYP", "CZE", "DNK", "DJI", "DMA", "DOM", "ECU", "EGY",
	"SLV", "GNQ", "ERI", "EST", "SWZ", "ETH", "FJI", "FIN", "FRA", "GAB", "GMB", "GEO", "DEU",
	"GHA", "GRC", "GRD", "GTM", "GIN", "GNB", "GUY", "HTI", "HND", "HUN", "ISL", "IND", "IDN",
	"IRN", "IRQ", "IRL", "ISR", "ITA", "JAM", "JPN", "JOR", "KAZ", "KEN", "KIR", "KWT", "KGZ",
	"LAO", "LVA", "LBN", "LSO", "LBR", "LBY", "LIE", "LTU", "LUX", "MDG", "MWI", "MYS", "MDV",
	"MLI", "MLT", "MHL", "MRT", "MUS", "MEX", "FSM", "MDA", "MCO", "MNG", "MNE", "MAR", "MOZ",
	"MMR", "NAM", "NRU", "NPL", "NLD", "NZL", "NIC", "NER", "NGA", "PRK", "MKD", "NOR", "OMN",
	"PAK", "PLW", "PAN", "PNG", "PRY", "PER", "PHL", "POL", "PRT", "QAT", "ROU", "RUS", "RWA",
	"KNA", "LCA", "VCT", "WSM", "SMR", "STP", "SAU", "SEN", "SRB", "SYC", "SLE", "SGP", "SVK",
	"SVN", "SLB", "SOM", "ZAF", "KOR", "SSD", "ESP", "LKA", "SDN", "SUR", "SWE", "CHE", "SYR",
	"TJK", "TZA", "THA", "TLS", "TGO", "TON", "TTO", "TUN", "TUR", "TKM", "TUV", "UGA", "UKR",
	"ARE", "GBR", "USA", "URY", "UZB", "VUT", "VEN", "VNM", "YEM", "ZMB", "ZWE",
	// historical
	"SUN", "YUG", "CSK", "DDR", "SCG", "ANT", "TMP", "ROM", "ZAR", "BUR", "BOH", "SUH",
];

pub fn is_real_country(code: &str) -> bool {
	REAL_COUNTRY_CODES.contains(&code)
}

/// A dissolved or renamed entity and the codes that replaced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormerCountry {
	pub code: &'static str,
	pub name: &'static str,
	/// Year the entity stopped existing.
	pub breakup_year: i32,
	pub successors: &'static [&'static str],
}

/// Scanned in order; more recent predecessors come first so Serbia resolves to
/// Serbia and Montenegro before Yugoslavia.
pub const FORMER_COUNTRIES: &[FormerCountry] = &[
	FormerCountry {
		code: "ANT",
		name: "Netherlands Antilles",
		breakup_year: 2010,
		successors: &["CUW", "SXM", "BES"],
	},
	FormerCountry {
		code: "SCG",
		name: "Serbia and Montenegro",
		breakup_year: 2006,
		successors: &["SRB", "MNE"],
	},
	FormerCountry {
		code: "ROM",
		name: "Romania",
		breakup_year: 2002,
		successors: &["ROU"],
	},
	FormerCountry {
		code: "TMP",
		name: "East Timor",
		breakup_year: 2002,
		successors: &["TLS"],
	},
	FormerCountry {
		code: "ZAR",
		name: "Zaire",
		breakup_year: 1997,
		successors: &["COD"],
	},
	FormerCountry {
		code: "CSK",
		name: "Czechoslovakia",
		breakup_year: 1993,
		successors: &["CZE", "SVK"],
	},
	FormerCountry {
		code: "YUG",
		name: "Yugoslavia",
		breakup_year: 1992,
		successors: &["SVN", "HRV", "BIH", "MKD", "SRB", "MNE", "XKX"],
	},
	FormerCountry {
		code: "SUN",
		name: "Soviet Union",
		breakup_year: 1991,
		successors: &[
			"RUS", "UKR", "BLR", "EST", "LVA", "LTU", "MDA", "GEO", "ARM", "AZE", "KAZ", "KGZ",
			"TJK", "TKM", "UZB",
		],
	},
	FormerCountry {
		code: "DDR",
		name: "East Germany",
		breakup_year: 1990,
		successors: &["DEU"],
	},
	FormerCountry {
		code: "BUR",
		name: "Burma",
		breakup_year: 1989,
		successors: &["MMR"],
	},
];

/// Bridges the map topology's numeric ids to alpha-3 codes and resolves values for
/// codes that have no entry of their own.
///
/// Built once and shared by reference; lookups are O(1) for ids and O(n) over the
/// short succession table for fallbacks.
#[derive(Debug)]
pub struct CountryCodeResolver {
	by_numeric: HashMap<u16, &'static str>,
	former: &'static [FormerCountry],
}

impl Default for CountryCodeResolver {
	fn default() -> Self {
		Self::new()
	}
}

impl CountryCodeResolver {
	pub fn new() -> Self {
		Self::with_former_countries(FORMER_COUNTRIES)
	}

	pub fn with_former_countries(former: &'static [FormerCountry]) -> Self {
		let by_numeric = ISO_3166.iter().copied().collect();
		Self { by_numeric, former }
	}

	pub fn resolve_code(&self, numeric_id: u16) -> Option<&'static str> {
		self.by_numeric.get(&numeric_id).copied()
	}

	/// The value recorded for `code`, else the value of the first defunct predecessor
	/// listing `code` as a successor, else `None`.
	///
	/// The fallback applies in any year, even after the breakup.
	pub fn value_for(&self, code: &str, year_values: &HashMap<String, f64>) -> Option<f64> {
		if let Some(value) = year_values.get(code) {
			return Some(*value);
		}
		self.former
			.iter()
			.filter(|f| f.successors.contains(&code))
			.find_map(|f| year_values.get(f.code).copied())
	}

	/// Like [`value_for`](Self::value_for), but a predecessor is only consulted for
	/// years before its breakup.
	pub fn value_for_year(
		&self,
		code: &str,
		year: i32,
		year_values: &HashMap<String, f64>,
	) -> Option<f64> {
		if let Some(value) = year_values.get(code) {
			return Some(*value);
		}
		self.former
			.iter()
			.filter(|f| year < f.breakup_year && f.successors.contains(&code))
			.find_map(|f| year_values.get(f.code).copied())
	}

	/// Value a map shows for `code` in `year`. `gated` selects
	/// [`value_for_year`](Self::value_for_year).
	pub fn resolve_value(
		&self,
		code: &str,
		year: i32,
		year_values: &HashMap<String, f64>,
		gated: bool,
	) -> Option<f64> {
		if gated {
			self.value_for_year(code, year, year_values)
		} else {
			self.value_for(code, year_values)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn year_map(entries: &[(&str, f64)]) -> HashMap<String, f64> {
		entries.iter().map(|(c, v)| (c.to_string(), *v)).collect()
	}

	#[test]
	fn resolves_numeric_ids() {
		let resolver = CountryCodeResolver::new();
		assert_eq!(resolver.resolve_code(840), Some("USA"));
		assert_eq!(resolver.resolve_code(643), Some("RUS"));
		assert_eq!(resolver.resolve_code(10), Some("ATA"));
		assert_eq!(resolver.resolve_code(999), None);
	}

	#[test]
	fn iso_table_has_unique_ids_and_codes() {
		let resolver = CountryCodeResolver::new();
		assert_eq!(resolver.by_numeric.len(), ISO_3166.len());
		let mut codes: Vec<_> = ISO_3166.iter().map(|(_, c)| *c).collect();
		codes.sort_unstable();
		codes.dedup();
		assert_eq!(codes.len(), ISO_3166.len());
	}

	#[test]
	fn own_value_wins() {
		let resolver = CountryCodeResolver::new();
		let map = year_map(&[("RUS", 42.0), ("SUN", 500.0)]);
		assert_eq!(resolver.value_for("RUS", &map), Some(42.0));
	}

	#[test]
	fn successor_inherits_predecessor_value() {
		let resolver = CountryCodeResolver::new();
		let map = year_map(&[("SUN", 500.0)]);
		assert_eq!(resolver.value_for("RUS", &map), Some(500.0));
		assert_eq!(resolver.value_for("UZB", &map), Some(500.0));
	}

	#[test]
	fn most_recent_predecessor_is_preferred() {
		let resolver = CountryCodeResolver::new();
		let map = year_map(&[("SCG", 3.0), ("YUG", 9.0)]);
		assert_eq!(resolver.value_for("SRB", &map), Some(3.0));
		let map = year_map(&[("YUG", 9.0)]);
		assert_eq!(resolver.value_for("SRB", &map), Some(9.0));
	}

	#[test]
	fn unrelated_code_has_no_value() {
		let resolver = CountryCodeResolver::new();
		let map = year_map(&[("SUN", 500.0)]);
		assert_eq!(resolver.value_for("FRA", &map), None);
		assert_eq!(resolver.value_for("RUS", &HashMap::new()), None);
	}

	#[test]
	fn fallback_is_not_gated_by_year() {
		let resolver = CountryCodeResolver::new();
		let map = year_map(&[("SUN", 500.0)]);
		assert_eq!(resolver.value_for("RUS", &map), Some(500.0));
		assert_eq!(resolver.value_for_year("RUS", 2010, &map), None);
		assert_eq!(resolver.value_for_year("RUS", 1980, &map), Some(500.0));
	}

	#[test]
	fn resolve_value_switches_on_gate() {
		let resolver = CountryCodeResolver::new();
		let map = year_map(&[("SUN", 500.0)]);
		assert_eq!(resolver.resolve_value("RUS", 2010, &map, false), Some(500.0));
		assert_eq!(resolver.resolve_value("RUS", 2010, &map, true), None);
	}

	#[test]
	fn custom_succession_table() {
		static TABLE: &[FormerCountry] = &[FormerCountry {
			code: "OLD",
			name: "Old Country",
			breakup_year: 2000,
			successors: &["NEW"],
		}];
		let resolver = CountryCodeResolver::with_former_countries(TABLE);
		let map = year_map(&[("OLD", 1.5)]);
		assert_eq!(resolver.value_for("NEW", &map), Some(1.5));
		assert_eq!(resolver.value_for("RUS", &map), None);
	}

	#[test]
	fn historical_codes_count_as_countries() {
		assert!(is_real_country("SUN"));
		assert!(is_real_country("FRA"));
		assert!(!is_real_country("WLD"));
		assert!(!is_real_country("EUU"));
	}
}
