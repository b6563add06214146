//! Earth and Mars clock readings
//!
//! Mars time follows the Mars Sol Date convention: sols since the
//! 29 December 1873 epoch, from the Julian date scaled by the ratio of a sol
//! to an Earth day.
//! Coordinated Mars Time (MTC) is the fractional sol expressed as 24 Mars
//! hours.

/// Unix timestamp taken as the J2000.0 reference
pub const J2000_EPOCH_UNIX: f64 = 946_727_941.816;
/// Julian date of J2000.0
pub const J2000_JD: f64 = 2_451_545.0;
/// Length of a Mars solar day in Earth seconds
pub const MARS_SOL_SECONDS: f64 = 88_775.244;

const SECONDS_PER_DAY: f64 = 86_400.0;
const MSD_JD_OFFSET: f64 = 2_405_522.002_877_9;
const SOL_PER_DAY: f64 = 1.027_491_251_7;

/// Time of day on a 24-hour clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Sol number for Mars readings
    pub sol: Option<i64>,
}

/// Clock-face hand angles in degrees, clockwise from 12 o'clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandAngles {
    /// Degrees clockwise from 12 → radians in surface space (0 = +x, y down)
    #[inline]
    pub fn to_surface_radians(degrees: f32) -> f32 {
        degrees.to_radians() - std::f32::consts::FRAC_PI_2
    }
}

impl ClockReading {
    pub fn hand_angles(&self) -> HandAngles {
        let (h, m, s) = (self.hours as f32, self.minutes as f32, self.seconds as f32);
        HandAngles {
            hour: (h % 12.0) * 30.0 + m * 0.5,
            minute: m * 6.0 + s * 0.1,
            second: s * 6.0,
        }
    }

    /// `HH:MM:SS`
    pub fn display(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }

    fn from_day_fraction(fraction: f64, sol: Option<i64>) -> Self {
        let total = (fraction.rem_euclid(1.0) * SECONDS_PER_DAY).floor() as u32;
        Self {
            hours: (total / 3600).min(23),
            minutes: (total / 60) % 60,
            seconds: total % 60,
            sol,
        }
    }
}

/// Julian date for a Unix timestamp (seconds)
pub fn julian_date(unix: f64) -> f64 {
    (unix - J2000_EPOCH_UNIX) / SECONDS_PER_DAY + J2000_JD
}

/// Mars Sol Date for a Unix timestamp
pub fn mars_sol_date(unix: f64) -> f64 {
    (julian_date(unix) - MSD_JD_OFFSET) / SOL_PER_DAY
}

/// UTC time of day on Earth
pub fn earth_utc(unix: f64) -> ClockReading {
    ClockReading::from_day_fraction(unix / SECONDS_PER_DAY, None)
}

/// Coordinated Mars Time, with the current sol number
pub fn mars_coordinated(unix: f64) -> ClockReading {
    let msd = mars_sol_date(unix);
    // MTC is offset half a sol from the MSD fraction
    ClockReading::from_day_fraction(msd + 0.5, Some(msd.floor() as i64))
}

/// Current Unix time in seconds
#[cfg(not(target_arch = "wasm32"))]
pub fn unix_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64())
}

/// Current Unix time in seconds
#[cfg(target_arch = "wasm32")]
pub fn unix_now() -> f64 {
    js_sys::Date::now() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_julian_date_at_j2000() {
        assert!((julian_date(J2000_EPOCH_UNIX) - J2000_JD).abs() < 1e-9);
    }

    #[test]
    fn test_earth_utc() {
        // 2024-01-01T13:45:30Z
        let reading = earth_utc(1_704_116_730.0);
        assert_eq!((reading.hours, reading.minutes, reading.seconds), (13, 45, 30));
        assert_eq!(reading.display(), "13:45:30");
        assert_eq!(reading.sol, None);
    }

    #[test]
    fn test_mars_sol_advances_slower_than_earth_days() {
        let t0 = 1_704_067_200.0;
        let msd0 = mars_sol_date(t0);
        let msd1 = mars_sol_date(t0 + SECONDS_PER_DAY * 100.0);
        assert!((msd1 - msd0 - 100.0 / SOL_PER_DAY).abs() < 1e-6);
        // A full sol later, MTC reads the same
        let a = mars_coordinated(t0);
        let b = mars_coordinated(t0 + MARS_SOL_SECONDS);
        assert_eq!(a.sol.map(|s| s + 1), b.sol);
        assert!((a.hours * 3600 + a.minutes * 60 + a.seconds).abs_diff(b.hours * 3600 + b.minutes * 60 + b.seconds) <= 1);
    }

    #[test]
    fn test_mars_sol_number_in_modern_era() {
        // 2024-01-01 falls in sol 53322, early on 02:13 MTC
        let reading = mars_coordinated(1_704_067_200.0);
        assert_eq!(reading.sol, Some(53_322));
        assert_eq!((reading.hours, reading.minutes), (2, 13));
    }

    #[test]
    fn test_hand_angles() {
        let reading = ClockReading {
            hours: 15,
            minutes: 30,
            seconds: 45,
            sol: None,
        };
        let hands = reading.hand_angles();
        assert_eq!(hands.hour, 105.0);
        assert_eq!(hands.minute, 184.5);
        assert_eq!(hands.second, 270.0);
        assert!((HandAngles::to_surface_radians(90.0)).abs() < 1e-6);
    }
}
