use crate::algebra::FloatT;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error type returned by settings validation.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// An error attributable to one of the fields
    #[error("Bad value for field {0}")]
    BadFieldValue(&'static str),
}

/// Assembly configuration.
///
/// All fields have workable defaults; construct with
/// `AssemblySettings::default()` or through
/// [`AssemblySettingsBuilder`](AssemblySettingsBuilder):
///
/// ```no_run
/// use arrowhead::assembly::AssemblySettingsBuilder;
///
/// let settings = AssemblySettingsBuilder::<f64>::default()
///     .verbose(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct AssemblySettings<T: FloatT> {
    /// uniform rescaling factor applied to all objective coefficients
    #[builder(default = "T::one()")]
    pub objective_rescale: T,

    /// print a one-line summary of the scenario distribution on rank 0
    #[builder(default = "false")]
    pub verbose: bool,
}

impl<T> Default for AssemblySettings<T>
where
    T: FloatT,
{
    fn default() -> AssemblySettings<T> {
        AssemblySettingsBuilder::<T>::default().build().unwrap()
    }
}

impl From<SettingsError> for AssemblySettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        AssemblySettingsBuilderError::ValidationError(format!("{:?}", e))
    }
}

impl<T> AssemblySettingsBuilder<T>
where
    T: FloatT,
{
    fn validate(&self) -> Result<(), SettingsError> {
        // rescaling by zero or a non-finite factor would silently destroy
        // the objective
        if let Some(scale) = self.objective_rescale {
            if !scale.is_finite() || scale == T::zero() {
                return Err(SettingsError::BadFieldValue("objective_rescale"));
            }
        }
        Ok(())
    }
}

// ------------------
// testing

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = AssemblySettings::<f64>::default();
        assert_eq!(settings.objective_rescale, 1.0);
        assert!(!settings.verbose);
    }

    #[test]
    fn test_settings_validation() {
        assert!(AssemblySettingsBuilder::<f64>::default()
            .objective_rescale(0.5)
            .build()
            .is_ok());
        assert!(AssemblySettingsBuilder::<f64>::default()
            .objective_rescale(0.0)
            .build()
            .is_err());
        assert!(AssemblySettingsBuilder::<f64>::default()
            .objective_rescale(f64::NAN)
            .build()
            .is_err());
    }
}
