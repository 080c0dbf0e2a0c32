//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que una coordenada geográfica sea utilizable
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !lng.is_finite() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("coordinates");
        error.add_param("lat".into(), &lat);
        error.add_param("lng".into(), &lng);
        return Err(error);
    }
    Ok(())
}

/// Validar que un nivel de llenado esté en el rango 0-100
pub fn validate_fill_level(value: i32) -> Result<(), ValidationError> {
    if !(0..=100).contains(&value) {
        let mut error = ValidationError::new("fill_level");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("camión 3").is_ok());
        assert!(validate_not_empty("   ").is_err());
        assert!(validate_not_empty("").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(48.8566, 2.3522).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, 181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 2.0).is_err());
    }

    #[test]
    fn test_validate_fill_level() {
        assert!(validate_fill_level(0).is_ok());
        assert!(validate_fill_level(100).is_ok());
        assert!(validate_fill_level(101).is_err());
        assert!(validate_fill_level(-1).is_err());
    }
}
