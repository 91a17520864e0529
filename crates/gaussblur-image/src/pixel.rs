/// Accumulated sums closer than this to an integer are taken to be that integer
/// before truncation.
///
/// A weighted sum of a constant neighbourhood is only equal to the constant up to a
/// few ulps, and plain truncation would turn `99.99999999999999` into `99`. The window
/// is kept far below any difference a real neighbourhood can produce, so sums such as
/// `0.9999999` still truncate to `0`.
pub const TRUNCATION_EPSILON: f64 = 1e-9;

/// Conversion between a pixel channel value and the `f64` accumulator used by the filters.
///
/// Integer implementations truncate toward zero and then clamp to the range of the type,
/// so a weighted sum that drifts slightly outside the range due to rounding still maps
/// to a valid value.
pub trait PixelValue: Copy + Send + Sync {
    /// Convert the value to f64.
    fn to_f64(self) -> f64;

    /// Convert the value from f64.
    fn from_f64(val: f64) -> Self;
}

macro_rules! impl_pixel_value_int {
    ($($t:ty),*) => {
        $(
            impl PixelValue for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(val: f64) -> Self {
                    let nearest = val.round();
                    let val = if (val - nearest).abs() < TRUNCATION_EPSILON {
                        nearest
                    } else {
                        val.trunc()
                    };
                    val.clamp(<$t>::MIN as f64, <$t>::MAX as f64) as $t
                }
            }
        )*
    };
}

impl_pixel_value_int!(u8, u16);

impl PixelValue for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        val as f32
    }
}

impl PixelValue for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        val
    }
}

#[cfg(test)]
mod tests {
    use super::PixelValue;

    #[test]
    fn u8_truncates() {
        assert_eq!(u8::from_f64(99.999), 99);
        assert_eq!(u8::from_f64(100.0), 100);
        assert_eq!(u8::from_f64(0.7), 0);
    }

    #[test]
    fn u8_snaps_rounding_noise() {
        assert_eq!(u8::from_f64(99.99999999999999), 100);
        assert_eq!(u8::from_f64(100.00000000000001), 100);
        assert_eq!(u8::from_f64(99.9999), 99);
    }

    #[test]
    fn u8_truncates_close_sums() {
        assert_eq!(u8::from_f64(1.0 - 1e-7), 0);
        assert_eq!(u8::from_f64(0.999999902316123), 0);
        assert_eq!(u8::from_f64(200.0 - 1e-8), 199);
        assert_eq!(u16::from_f64(1000.0 - 1e-7), 999);
    }

    #[test]
    fn u8_clamps() {
        assert_eq!(u8::from_f64(255.0000001), 255);
        assert_eq!(u8::from_f64(300.0), 255);
        assert_eq!(u8::from_f64(-3.5), 0);
    }

    #[test]
    fn u16_clamps() {
        assert_eq!(u16::from_f64(70000.0), u16::MAX);
        assert_eq!(u16::from_f64(1234.9), 1234);
    }

    #[test]
    fn float_passthrough() {
        assert_eq!(f32::from_f64(0.25), 0.25f32);
        assert_eq!(0.5f32.to_f64(), 0.5);
        assert_eq!(f64::from_f64(-1.5), -1.5);
    }
}
