//! Natural Earth projection and the screen fit applied to projected outlines.

use geo::{
	Area, BoundingRect, Centroid, Contains, Coord, Intersects, MapCoords, MultiPolygon, Point, Rect,
};

use super::topology::WorldMap;

/// Projects lon/lat degrees to unscaled Natural Earth I coordinates (y up).
pub fn natural_earth(lon: f64, lat: f64) -> Coord<f64> {
	let lambda = lon.to_radians();
	let phi = lat.to_radians();
	let phi2 = phi * phi;
	let phi4 = phi2 * phi2;
	Coord {
		x: lambda
			* (0.8707 - 0.131979 * phi2
				+ phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4))),
		y: phi
			* (1.007226
				+ phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4))),
	}
}

/// Screen transform applied on top of the raw projection; only this changes on resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
	pub scale: f64,
	pub translate: [f64; 2],
}

impl Default for Fit {
	fn default() -> Self {
		Self {
			scale: 1.0,
			translate: [0.0, 0.0],
		}
	}
}

impl Fit {
	/// Centers `bounds` inside a `width` x `height` box with `padding` on every side.
	pub fn to_size(bounds: Rect<f64>, width: f64, height: f64, padding: f64) -> Self {
		let span_x = bounds.width().max(f64::EPSILON);
		let span_y = bounds.height().max(f64::EPSILON);
		let inner_w = (width - 2.0 * padding).max(1.0);
		let inner_h = (height - 2.0 * padding).max(1.0);
		let scale = (inner_w / span_x).min(inner_h / span_y);
		let center = bounds.center();
		Self {
			scale,
			translate: [width / 2.0 - center.x * scale, height / 2.0 + center.y * scale],
		}
	}

	pub fn apply(&self, p: Coord<f64>) -> Coord<f64> {
		Coord {
			x: self.translate[0] + p.x * self.scale,
			y: self.translate[1] - p.y * self.scale,
		}
	}

	pub fn invert(&self, screen: Coord<f64>) -> Coord<f64> {
		Coord {
			x: (screen.x - self.translate[0]) / self.scale,
			y: (self.translate[1] - screen.y) / self.scale,
		}
	}
}

/// A country's outline run through the raw projection once; resizing only changes the
/// [`Fit`] used to read it back in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedShape {
	pub code: Option<String>,
	pub name: String,
	pub polygons: MultiPolygon<f64>,
	pub bounds: Option<Rect<f64>>,
}

impl ProjectedShape {
	/// Screen-space rings under `fit`, exteriors followed by their holes.
	pub fn screen_rings<'a>(&'a self, fit: &'a Fit) -> impl Iterator<Item = Vec<Coord<f64>>> + 'a {
		self.polygons
			.iter()
			.flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
			.map(move |ring| ring.coords().map(|c| fit.apply(*c)).collect())
	}

	/// Screen-space centroid of the largest polygon by area.
	pub fn centroid(&self, fit: &Fit) -> Option<[f64; 2]> {
		let largest = self
			.polygons
			.iter()
			.max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))?;
		let c = fit.apply(largest.centroid()?.0);
		Some([c.x, c.y])
	}

	/// Hit test in projected space; points inside holes miss.
	pub fn contains(&self, fit: &Fit, screen: [f64; 2]) -> bool {
		let p = fit.invert(Coord {
			x: screen[0],
			y: screen[1],
		});
		self.bounds.is_some_and(|b| b.intersects(&p)) && self.polygons.contains(&Point(p))
	}
}

fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
	Rect::new(
		Coord {
			x: a.min().x.min(b.min().x),
			y: a.min().y.min(b.min().y),
		},
		Coord {
			x: a.max().x.max(b.max().x),
			y: a.max().y.max(b.max().y),
		},
	)
}

/// Raw-projects every country, returning the shapes and their combined bounds.
pub fn project_world(world: &WorldMap) -> (Vec<ProjectedShape>, Option<Rect<f64>>) {
	let shapes: Vec<ProjectedShape> = world
		.countries
		.iter()
		.map(|country| {
			let polygons = country.polygons.map_coords(|c| natural_earth(c.x, c.y));
			ProjectedShape {
				code: country.code.clone(),
				name: country.name.clone(),
				bounds: polygons.bounding_rect(),
				polygons,
			}
		})
		.collect();
	let bounds = shapes
		.iter()
		.filter_map(|shape| shape.bounds)
		.reduce(union);
	(shapes, bounds)
}

#[cfg(test)]
mod tests {
	use geo::Polygon;

	use super::*;
	use crate::atlas::topology::CountryShape;

	fn square(x: f64, y: f64, size: f64) -> Rect<f64> {
		Rect::new(Coord { x, y }, Coord {
			x: x + size,
			y: y + size,
		})
	}

	#[test]
	fn origin_projects_to_origin() {
		assert_eq!(natural_earth(0.0, 0.0), Coord { x: 0.0, y: 0.0 });
		let edge = natural_earth(180.0, 0.0);
		assert!((edge.x - std::f64::consts::PI * 0.8707).abs() < 1e-12);
		assert_eq!(edge.y, 0.0);
		assert!(natural_earth(0.0, 45.0).y > 0.0);
	}

	#[test]
	fn fit_centers_bounds_in_box() {
		let bounds = Rect::new(Coord { x: -2.0, y: -1.0 }, Coord { x: 2.0, y: 1.0 });
		let fit = Fit::to_size(bounds, 400.0, 400.0, 0.0);
		assert_eq!(fit.scale, 100.0);
		assert_eq!(fit.apply(Coord { x: 0.0, y: 0.0 }), Coord { x: 200.0, y: 200.0 });
		assert_eq!(fit.apply(Coord { x: -2.0, y: 1.0 }), Coord { x: 0.0, y: 100.0 });
		assert_eq!(fit.invert(Coord { x: 0.0, y: 100.0 }), Coord { x: -2.0, y: 1.0 });
	}

	#[test]
	fn degenerate_bounds_do_not_produce_nan() {
		let bounds = Rect::new(Coord { x: 1.0, y: 1.0 }, Coord { x: 1.0, y: 1.0 });
		let fit = Fit::to_size(bounds, 0.0, 0.0, 10.0);
		assert!(fit.scale.is_finite());
		let p = fit.apply(Coord { x: 1.0, y: 1.0 });
		assert!(p.x.is_finite() && p.y.is_finite());
	}

	#[test]
	fn centroid_uses_largest_polygon_and_holes_are_excluded() {
		let small = square(10.0, 10.0, 1.0).to_polygon();
		let holed = Polygon::new(
			square(0.0, 0.0, 4.0).to_polygon().exterior().clone(),
			vec![square(1.0, 1.0, 2.0).to_polygon().exterior().clone()],
		);
		let polygons = MultiPolygon::new(vec![small, holed]);
		let shape = ProjectedShape {
			code: Some("FRA".into()),
			name: "France".into(),
			bounds: polygons.bounding_rect(),
			polygons,
		};
		let fit = Fit::default();
		let [cx, cy] = shape.centroid(&fit).unwrap();
		assert!((cx - 2.0).abs() < 1e-9 && (cy + 2.0).abs() < 1e-9);
		// y is flipped by the fit, so (0.5, 0.5) in projected space is (0.5, -0.5) on screen
		assert!(shape.contains(&fit, [0.5, -0.5]));
		assert!(!shape.contains(&fit, [2.0, -2.0]));
		assert!(shape.contains(&fit, [10.5, -10.5]));
		assert!(!shape.contains(&fit, [20.0, -20.0]));
		assert_eq!(shape.screen_rings(&fit).count(), 3);
	}

	#[test]
	fn project_world_collects_bounds() {
		let world = WorldMap {
			countries: vec![
				CountryShape {
					numeric_id: Some(250),
					code: Some("FRA".into()),
					name: "France".into(),
					polygons: square(-5.0, 42.0, 13.0).to_polygon().into(),
				},
				CountryShape {
					numeric_id: None,
					code: None,
					name: "Nowhere".into(),
					polygons: MultiPolygon::new(Vec::new()),
				},
			],
		};
		let (shapes, bounds) = project_world(&world);
		assert_eq!(shapes.len(), 2);
		let bounds = bounds.unwrap();
		assert!(bounds.min().x < 0.0 && bounds.max().x > 0.0);
		assert_eq!(shapes[0].bounds, Some(bounds));
		assert_eq!(shapes[1].bounds, None);
	}
}
