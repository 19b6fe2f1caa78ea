/// An extension trait for floating point types to convert to and from DB.
///
/// ```IGNORE
/// use hrtf_dsp::DbExt;
/// 6.0.db_to_gain();
/// ```
pub trait DbExt: Sized {
    fn db_to_gain(self) -> Self;
    fn gain_to_db(self) -> Self;

    /// Like [DbExt::gain_to_db], but `None` where the result would not be finite (zero, negative, or non-finite
    /// gains).
    fn checked_gain_to_db(self) -> Option<Self>;
}

macro_rules! db_impl {
    ($t:ty) => {
        impl DbExt for $t {
            fn db_to_gain(self) -> Self {
                (10.0 as $t).powf(self / 20.0)
            }

            fn gain_to_db(self) -> Self {
                20.0 * self.log10()
            }

            fn checked_gain_to_db(self) -> Option<Self> {
                let db = self.gain_to_db();
                db.is_finite().then_some(db)
            }
        }
    };
}

db_impl!(f32);
db_impl!(f64);

#[cfg(test)]
mod tests {
    use super::DbExt;
    use crate::close_floats::*;

    #[test]
    fn test_conversions() {
        close_floats32(0.5f32.gain_to_db(), -6.0, 0.03);
        close_floats64(0.5f64.gain_to_db(), -6.0, 0.03);
        close_floats64((-6.0f64).db_to_gain(), 0.5, 0.03);
        close_floats64(6.0f64.db_to_gain(), 1.9953, 0.0001);
    }

    #[test]
    fn test_checked() {
        assert_eq!(1.0f64.checked_gain_to_db(), Some(0.0));
        assert_eq!(0.0f64.checked_gain_to_db(), None);
        assert_eq!((-1.0f64).checked_gain_to_db(), None);
        assert_eq!(f64::NAN.checked_gain_to_db(), None);
    }
}
