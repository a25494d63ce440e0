//! Year scrubbing: a bounded counter advanced by a fixed-cadence timer.

/// Playback position between two inclusive year bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearPlayback {
	pub min: i32,
	pub max: i32,
	pub year: i32,
	pub playing: bool,
}

impl YearPlayback {
	/// Starts paused at `max`, the most recent year.
	pub fn new(min: i32, max: i32) -> Self {
		let (min, max) = if min <= max { (min, max) } else { (max, min) };
		Self {
			min,
			max,
			year: max,
			playing: false,
		}
	}

	/// Begins playing. From the last year, playback restarts at the first.
	pub fn start(&mut self) {
		if self.year >= self.max {
			self.year = self.min;
		}
		self.playing = true;
	}

	/// Advances exactly one year and stops on reaching the upper bound. Returns
	/// whether playback continues.
	pub fn tick(&mut self) -> bool {
		if !self.playing {
			return false;
		}
		if self.year < self.max {
			self.year += 1;
		}
		if self.year >= self.max {
			self.playing = false;
		}
		self.playing
	}

	pub fn stop(&mut self) {
		self.playing = false;
	}

	/// Scrubbing pauses playback.
	pub fn set_year(&mut self, year: i32) {
		self.year = year.clamp(self.min, self.max);
		self.playing = false;
	}
}
