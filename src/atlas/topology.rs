//! Decoding of world-atlas style TopoJSON into per-country lon/lat polygons.

use std::collections::HashMap;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::Value;

use crate::data::CountryCodeResolver;
use crate::error::{ChartError, Result};

/// Numeric id and alpha-3 code excluded from every map.
const ANTARCTICA_ID: u16 = 10;
const ANTARCTICA_CODE: &str = "ATA";

type ArcLine = Vec<Coord<f64>>;

#[derive(Debug, Deserialize)]
struct Topology {
	#[serde(default)]
	transform: Option<Transform>,
	arcs: Vec<Vec<Vec<f64>>>,
	objects: HashMap<String, RawGeometry>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct Transform {
	scale: [f64; 2],
	translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
	#[serde(rename = "type")]
	kind: Option<String>,
	#[serde(default)]
	id: Option<Value>,
	#[serde(default)]
	properties: Option<HashMap<String, Value>>,
	#[serde(default)]
	arcs: Option<Value>,
	#[serde(default)]
	geometries: Vec<RawGeometry>,
}

/// One country's outline in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryShape {
	pub numeric_id: Option<u16>,
	/// Alpha-3 code, when the numeric id is known.
	pub code: Option<String>,
	pub name: String,
	pub polygons: MultiPolygon<f64>,
}

/// Immutable world geometry shared by the map charts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldMap {
	pub countries: Vec<CountryShape>,
}

impl WorldMap {
	pub fn from_topojson(text: &str, object: &str, resolver: &CountryCodeResolver) -> Result<Self> {
		let topology: Topology =
			serde_json::from_str(text).map_err(|e| ChartError::decode("topology", e))?;
		let arcs = decode_arcs(&topology.arcs, topology.transform);
		let root = topology
			.objects
			.get(object)
			.ok_or_else(|| ChartError::Topology(format!("missing object {object}")))?;

		let mut countries = Vec::new();
		collect_shapes(root, &arcs, resolver, &mut countries)?;
		Ok(Self { countries })
	}

	pub fn len(&self) -> usize {
		self.countries.len()
	}
}

fn collect_shapes(
	geometry: &RawGeometry,
	arcs: &[ArcLine],
	resolver: &CountryCodeResolver,
	out: &mut Vec<CountryShape>,
) -> Result<()> {
	let polygons = match geometry.kind.as_deref() {
		Some("GeometryCollection") => {
			for child in &geometry.geometries {
				collect_shapes(child, arcs, resolver, out)?;
			}
			return Ok(());
		}
		Some("Polygon") => {
			let rings: Vec<Vec<i64>> = parse_arcs(geometry)?;
			MultiPolygon::new(vec![polygon(&rings, arcs)?])
		}
		Some("MultiPolygon") => {
			let parts: Vec<Vec<Vec<i64>>> = parse_arcs(geometry)?;
			MultiPolygon::new(
				parts
					.iter()
					.map(|rings| polygon(rings, arcs))
					.collect::<Result<_>>()?,
			)
		}
		// null geometries and points carry no area to draw
		_ => return Ok(()),
	};

	let numeric_id = geometry.id.as_ref().and_then(numeric_id);
	let code = numeric_id
		.and_then(|id| resolver.resolve_code(id))
		.map(str::to_owned);
	if numeric_id == Some(ANTARCTICA_ID) || code.as_deref() == Some(ANTARCTICA_CODE) {
		return Ok(());
	}
	let name = geometry
		.properties
		.as_ref()
		.and_then(|p| p.get("name"))
		.and_then(Value::as_str)
		.unwrap_or_default()
		.to_owned();

	out.push(CountryShape {
		numeric_id,
		code,
		name,
		polygons,
	});
	Ok(())
}

fn parse_arcs<T: serde::de::DeserializeOwned>(geometry: &RawGeometry) -> Result<T> {
	let arcs = geometry
		.arcs
		.clone()
		.ok_or_else(|| ChartError::Topology("polygon without arcs".into()))?;
	serde_json::from_value(arcs).map_err(|e| ChartError::Topology(e.to_string()))
}

/// Ids are usually zero-padded strings ("004") but some files use numbers.
fn numeric_id(id: &Value) -> Option<u16> {
	match id {
		Value::String(s) => s.trim().parse().ok(),
		Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
		_ => None,
	}
}

/// Applies the quantization transform, undoing delta encoding.
fn decode_arcs(raw: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Vec<ArcLine> {
	raw.iter()
		.map(|arc| {
			let (mut x, mut y) = (0.0, 0.0);
			arc.iter()
				.filter(|p| p.len() >= 2)
				.map(|p| match transform {
					Some(t) => {
						x += p[0];
						y += p[1];
						Coord {
							x: x * t.scale[0] + t.translate[0],
							y: y * t.scale[1] + t.translate[1],
						}
					}
					None => Coord { x: p[0], y: p[1] },
				})
				.collect()
		})
		.collect()
}

/// First ring is the exterior, the rest are holes.
fn polygon(rings: &[Vec<i64>], arcs: &[ArcLine]) -> Result<Polygon<f64>> {
	let mut rings = rings
		.iter()
		.map(|ring| stitch(ring, arcs).map(LineString::new));
	let exterior = match rings.next() {
		Some(ring) => ring?,
		None => return Err(ChartError::Topology("polygon without rings".into())),
	};
	let interiors = rings.collect::<Result<Vec<_>>>()?;
	Ok(Polygon::new(exterior, interiors))
}

/// Joins arcs into one ring; a negative index `i` means arc `!i` reversed. Consecutive
/// arcs share an endpoint, which is kept once.
fn stitch(indices: &[i64], arcs: &[ArcLine]) -> Result<ArcLine> {
	let mut ring: ArcLine = Vec::new();
	for &index in indices {
		let (arc_index, reversed) = if index < 0 { (!index, true) } else { (index, false) };
		let arc = usize::try_from(arc_index)
			.ok()
			.and_then(|i| arcs.get(i))
			.ok_or_else(|| ChartError::Topology(format!("arc {index} out of range")))?;
		if !ring.is_empty() {
			ring.pop();
		}
		if reversed {
			ring.extend(arc.iter().rev());
		} else {
			ring.extend(arc.iter());
		}
	}
	Ok(ring)
}

#[cfg(test)]
mod tests {
	use super::*;

	// Two unit squares sharing an edge (arc 0), plus Antarctica and a null geometry.
	const TOPO: &str = r#"{
		"type": "Topology",
		"transform": {"scale": [1, 1], "translate": [0, 0]},
		"arcs": [
			[[1, 0], [0, 1]],
			[[1, 1], [-1, 0], [0, -1], [1, 0]],
			[[1, 0], [1, 0], [0, 1], [-1, 0]],
			[[0, -80], [10, 0], [0, -5], [-10, 0], [0, 5]]
		],
		"objects": {
			"countries": {
				"type": "GeometryCollection",
				"geometries": [
					{"type": "Polygon", "id": "250", "properties": {"name": "France"}, "arcs": [[0, 1]]},
					{"type": "MultiPolygon", "id": 276, "properties": {"name": "Germany"}, "arcs": [[[-1, 2]]]},
					{"type": "Polygon", "id": "010", "properties": {"name": "Antarctica"}, "arcs": [[3]]},
					{"type": null, "id": "999"},
					{"type": "Polygon", "properties": {"name": "Kosovo"}, "arcs": [[0, 1]]}
				]
			}
		}
	}"#;

	fn world() -> WorldMap {
		WorldMap::from_topojson(TOPO, "countries", &CountryCodeResolver::new()).unwrap()
	}

	#[test]
	fn decodes_countries_and_skips_antarctica() {
		let map = world();
		let names: Vec<_> = map.countries.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, ["France", "Germany", "Kosovo"]);
		assert_eq!(map.countries[0].code.as_deref(), Some("FRA"));
		assert_eq!(map.countries[1].code.as_deref(), Some("DEU"));
		assert_eq!(map.countries[2].numeric_id, None);
		assert_eq!(map.countries[2].code, None);
	}

	#[test]
	fn stitches_delta_decoded_arcs_into_closed_rings() {
		let map = world();
		let ring = map.countries[0].polygons.0[0].exterior();
		assert_eq!(
			ring,
			&LineString::from(vec![(1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0), (1.0, 0.0)])
		);
		assert!(ring.is_closed());
	}

	#[test]
	fn negative_indices_reverse_arcs() {
		let map = world();
		let ring = map.countries[1].polygons.0[0].exterior();
		assert_eq!(
			ring,
			&LineString::from(vec![(1.0, 1.0), (1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0)])
		);
	}

	#[test]
	fn extra_rings_become_holes() {
		let text = r#"{
			"arcs": [
				[[0, 0], [4, 0], [4, 4], [0, 4], [0, 0]],
				[[1, 1], [1, 2], [2, 2], [2, 1], [1, 1]]
			],
			"objects": {"countries": {"type": "Polygon", "id": "250", "arcs": [[0], [1]]}}
		}"#;
		let map = WorldMap::from_topojson(text, "countries", &CountryCodeResolver::new()).unwrap();
		let polygon = &map.countries[0].polygons.0[0];
		assert_eq!(polygon.exterior().0.len(), 5);
		assert_eq!(polygon.interiors().len(), 1);
	}

	#[test]
	fn missing_object_is_an_error() {
		let err = WorldMap::from_topojson(TOPO, "land", &CountryCodeResolver::new()).unwrap_err();
		assert!(matches!(err, ChartError::Topology(_)));
	}

	#[test]
	fn out_of_range_arc_is_an_error() {
		let text = r#"{"arcs": [], "objects": {"countries": {"type": "Polygon", "arcs": [[4]]}}}"#;
		let resolver = CountryCodeResolver::new();
		let err = WorldMap::from_topojson(text, "countries", &resolver).unwrap_err();
		assert!(matches!(err, ChartError::Topology(_)));
	}
}
