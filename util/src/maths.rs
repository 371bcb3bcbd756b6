//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Get the shortest signed angular distance from angle `a` to angle `b`.
///
/// Angles may be supplied in any real range, the result is always the
/// shortest signed arc in the range (-pi, pi]. Positive results indicate that
/// `b` is reached from `a` by a positive (counter-clockwise) rotation.
pub fn get_ang_dist<T>(a: T, b: T) -> T
where
    T: Float + std::ops::Mul + std::ops::Add + std::ops::Sub
{
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    let c = rem_euclid(a - b, tau_t);
    let d = rem_euclid(b - a, tau_t);

    if c < d {
        return -c
    }
    else {
        return d
    }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
/// This result is not an element of the function's codomain, but it is the
/// closest floating point number in the real numbers and thus fulfills the
/// property `self == self.div_euclid(rhs) * rhs + self.rem_euclid(rhs)`
/// approximatively.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float + std::ops::Mul + std::ops::Add + std::ops::Sub + std::ops::Rem
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() { r + rhs.abs() } else { r }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_ang_dist() {
        const TAU: f64 = std::f64::consts::TAU;
        const PI: f64 = std::f64::consts::PI;

        assert_eq!(get_ang_dist(1f64, 2f64), 1f64);
        assert_eq!(get_ang_dist(2f64, 1f64), -1f64);
        assert_eq!(get_ang_dist(0f64, TAU), 0f64);
        assert_eq!(get_ang_dist(TAU, 0f64), 0f64);
        assert_eq!(get_ang_dist(1f64, TAU), -1f64);
        assert_eq!(get_ang_dist(0f64, TAU - 1f64), -1f64);
        assert_eq!(get_ang_dist(TAU - 1f64, 1f64), 2f64);

        // Antipodal angles must give pi, not -pi
        assert_eq!(get_ang_dist(0f64, PI), PI);

        // Wrap through the +/-pi discontinuity: the distance from 3.0 rad to
        // -3.0 rad is a short hop over the branch cut, not -6.0
        assert!((get_ang_dist(3f64, -3f64) - (TAU - 6f64)).abs() < 1e-12);

        // Inputs outside [0, 2pi] are accepted
        assert!((get_ang_dist(TAU + 1f64, -TAU + 2f64) - 1f64).abs() < 1e-12);
    }

    #[test]
    fn test_rem_euclid() {
        assert_eq!(rem_euclid(3f64, 2f64), 1f64);
        assert_eq!(rem_euclid(-1f64, 2f64), 1f64);
        assert_eq!(rem_euclid(-3f64, 2f64), 1f64);
    }
}
