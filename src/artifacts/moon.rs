//! Moon phase segment
//!
//! Port of John Walker's moontool phase computation. The age of the moon
//! is a fraction of the synodic month in `[0, 1)`; the glyph alphabet
//! has eight buckets, two of which (new and full) carry a face variant
//! picked at random. The random source is injected by the caller so the
//! selection stays deterministic under test.

use chrono::{Datelike, NaiveDate};
use fake::rand::Rng;

/// 1980 January 0.0 as a Julian Day Number
const EPOCH: f64 = 2_444_238.5;
/// Ecliptic longitude of the Sun at epoch 1980.0, degrees
const ECLIPTIC_LONGITUDE_EPOCH: f64 = 278.833_540;
/// Ecliptic longitude of the Sun at perigee, degrees
const ECLIPTIC_LONGITUDE_PERIGEE: f64 = 282.596_403;
/// Eccentricity of Earth's orbit
const ECCENTRICITY: f64 = 0.016_718;
/// Moon's mean longitude at the epoch, degrees
const MOON_MEAN_LONGITUDE_EPOCH: f64 = 64.975_464;
/// Mean longitude of the Moon's perigee at the epoch, degrees
const MOON_MEAN_PERIGEE_EPOCH: f64 = 349.383_063;

/// Glyph alphabet indexed by phase bucket, new moon first
///
/// The new and full buckets carry an inverted-face variant alongside the
/// plain disc.
const PHASE_GLYPHS: [&[&str]; 8] = [
    &["🌝", "🌕"],
    &["🌖"],
    &["🌗"],
    &["🌘"],
    &["🌚", "🌑"],
    &["🌒"],
    &["🌓"],
    &["🌔"],
];

fn fixangle(a: f64) -> f64 {
    a - 360.0 * (a / 360.0).floor()
}

fn torad(d: f64) -> f64 {
    d.to_radians()
}

fn todeg(r: f64) -> f64 {
    r.to_degrees()
}

/// Solve Kepler's equation for the eccentric anomaly
fn kepler(m: f64, ecc: f64) -> f64 {
    const EPSILON: f64 = 1e-6;

    let m = torad(m);
    let mut e = m;
    loop {
        let delta = e - ecc * e.sin() - m;
        e -= delta / (1.0 - ecc * e.cos());
        if delta.abs() <= EPSILON {
            return e;
        }
    }
}

/// Julian Day Number of a calendar date (noon-based, integral)
pub fn julian_day_number(date: NaiveDate) -> f64 {
    let a = (14 - date.month() as i64) / 12;
    let y = date.year() as i64 + 4800 - a;
    let m = date.month() as i64 + 12 * a - 3;

    (date.day() as i64 + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045) as f64
}

/// Age of the moon on `date` as a fraction of the synodic month, `[0, 1)`
pub fn moon_age(date: NaiveDate) -> f64 {
    let day = julian_day_number(date) - EPOCH;

    let mean_sun_anomaly = fixangle((360.0 / 365.2422) * day);
    // from perigee coordinates to epoch 1980
    let m = fixangle(mean_sun_anomaly + ECLIPTIC_LONGITUDE_EPOCH - ECLIPTIC_LONGITUDE_PERIGEE);

    let mut ec = kepler(m, ECCENTRICITY);
    ec = ((1.0 + ECCENTRICITY) / (1.0 - ECCENTRICITY)).sqrt() * (ec / 2.0).tan();
    // true anomaly
    ec = 2.0 * todeg(ec.atan());

    // Sun's geometric ecliptic longitude
    let lambda_sun = fixangle(ec + ECLIPTIC_LONGITUDE_PERIGEE);

    let moon_longitude = fixangle(13.176_396_6 * day + MOON_MEAN_LONGITUDE_EPOCH);
    let mean_moon_anomaly = fixangle(moon_longitude - 0.111_404_1 * day - MOON_MEAN_PERIGEE_EPOCH);

    let evection = 1.2739 * torad(2.0 * (moon_longitude - lambda_sun) - mean_moon_anomaly).sin();
    let annual_equation = 0.1858 * torad(m).sin();
    let a3 = 0.37 * torad(m).sin();
    let corrected_anomaly = mean_moon_anomaly + evection - annual_equation - a3;

    // equation of the centre
    let m_ec = 6.2886 * torad(corrected_anomaly).sin();
    let a4 = 0.214 * torad(2.0 * corrected_anomaly).sin();
    let corrected_longitude = moon_longitude + evection + m_ec - annual_equation + a4;

    let variation = 0.6583 * torad(2.0 * (corrected_longitude - lambda_sun)).sin();
    let true_longitude = corrected_longitude + variation;

    fixangle(true_longitude - lambda_sun) / 360.0
}

/// One glyph for `date`'s phase, picking a variant where the bucket has
/// more than one
pub fn phase_glyph(date: NaiveDate, rng: &mut impl Rng) -> &'static str {
    let bucket = (moon_age(date) * PHASE_GLYPHS.len() as f64) as usize;
    // age < 1.0 keeps the bucket in range; clamp guards the boundary
    let variants = PHASE_GLYPHS[bucket.min(PHASE_GLYPHS.len() - 1)];
    variants[rng.random_range(0..variants.len())]
}

/// The moon segment with its color span
///
/// The color is left to the shell through the `$MOON_COLOR` variable
/// rather than fixed by the palette.
pub fn segment(date: NaiveDate, rng: &mut impl Rng) -> String {
    format!("%F{{$MOON_COLOR}}{}%f", phase_glyph(date, rng))
}
