use crate::domain::errors::{SerenityError, SerenityResult};

/// Convert a zero curve into flat forward rates between consecutive pillars.
///
/// `durations` are year fractions and must be strictly increasing.
pub fn flat_forward(rates: &[f64], durations: &[f64]) -> SerenityResult<Vec<f64>> {
    if rates.len() != durations.len() {
        return Err(SerenityError::invalid_input(format!(
            "{} rates but {} durations",
            rates.len(),
            durations.len()
        )));
    }
    let Some(&first) = rates.first() else {
        return Ok(Vec::new());
    };

    let mut forwards = Vec::with_capacity(rates.len());
    forwards.push(first);
    for i in 1..rates.len() {
        let dt = durations[i] - durations[i - 1];
        if dt <= 0.0 {
            return Err(SerenityError::invalid_input(format!(
                "durations must be strictly increasing (index {})",
                i
            )));
        }
        forwards.push((rates[i] * durations[i] - rates[i - 1] * durations[i - 1]) / dt);
    }
    Ok(forwards)
}
