use super::marks::Lerp;

/// Category palette shared by every chart.
const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

const RAMP_LOW: Rgb = Rgb(222, 235, 247);
const RAMP_HIGH: Rgb = Rgb(8, 81, 156);

/// Fill for map regions without a value.
pub const NO_DATA: Rgb = Rgb(214, 214, 214);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
	pub fn from_hex(hex: &str) -> Option<Self> {
		let hex = hex.strip_prefix('#').unwrap_or(hex);
		if hex.len() != 6 {
			return None;
		}
		let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
		Some(Self(channel(0)?, channel(2)?, channel(4)?))
	}

	pub fn css(&self) -> String {
		format!("rgb({}, {}, {})", self.0, self.1, self.2)
	}

	pub fn css_alpha(&self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {})", self.0, self.1, self.2, alpha.clamp(0.0, 1.0))
	}
}

impl Lerp for Rgb {
	fn lerp(&self, to: &Self, t: f64) -> Self {
		let mix = |a: u8, b: u8| {
			(a as f64 + (b as f64 - a as f64) * t)
				.round()
				.clamp(0.0, 255.0) as u8
		};
		Rgb(mix(self.0, to.0), mix(self.1, to.1), mix(self.2, to.2))
	}
}

fn palette(i: usize) -> Rgb {
	Rgb::from_hex(COLORS[i % COLORS.len()]).unwrap_or_default()
}

/// Hue by rank; shifts when the ranking changes between years.
pub fn color_for_rank(rank: usize) -> Rgb {
	palette(rank)
}

/// Hue by country code; stable for a country across years.
pub fn color_for_code(code: &str) -> Rgb {
	let h = code
		.bytes()
		.fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
	palette(h as usize)
}

/// Sequential ramp for `t` in `[0, 1]`.
pub fn ramp(t: f64) -> Rgb {
	let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
	RAMP_LOW.lerp(&RAMP_HIGH, t)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_palette() {
		assert_eq!(Rgb::from_hex("#1f77b4"), Some(Rgb(31, 119, 180)));
		assert_eq!(Rgb::from_hex("nope"), None);
		assert_eq!(Rgb::from_hex("#zzzzzz"), None);
		assert_eq!(color_for_rank(0), color_for_rank(COLORS.len()));
	}

	#[test]
	fn code_colors_are_stable() {
		assert_eq!(color_for_code("USA"), color_for_code("USA"));
		assert_eq!(Rgb(10, 20, 30).css(), "rgb(10, 20, 30)");
	}

	#[test]
	fn ramp_clamps_and_interpolates() {
		assert_eq!(ramp(-1.0), RAMP_LOW);
		assert_eq!(ramp(2.0), RAMP_HIGH);
		assert_eq!(ramp(f64::NAN), RAMP_LOW);
		let mid = ramp(0.5);
		assert!(mid.0 < RAMP_LOW.0 && mid.0 > RAMP_HIGH.0);
	}
}
