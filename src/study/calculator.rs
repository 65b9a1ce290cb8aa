//! Clinical calculators from the pharmacology section.
//!
//! A form is a fixed list of numeric fields per calculator. Values are typed
//! as text and parsed once at submit; anything non-numeric or non-positive
//! blocks the request with the server's own wording instead of a request.
//! Result rows come back as an open-ended key/value object and are shown as
//! returned, with keys reformatted for display and the internal `color` hint
//! dropped.

use std::collections::BTreeMap;

use serde_json::Value;

pub const CALCULATOR_INPUT_WARNING: &str = "Please enter valid numeric values";
pub const CALCULATOR_FAILED: &str = "Calculation failed";

/// Which calculator the form currently shows. The platform has more
/// (creatinine clearance, unit conversion); those need choice-typed fields
/// and stay on the web.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorKind {
    Dose,
    Drip,
    Bmi,
}

impl CalculatorKind {
    /// Path segment under `/pharmacology/calculators/`.
    pub fn slug(self) -> &'static str {
        match self {
            CalculatorKind::Dose => "dose",
            CalculatorKind::Drip => "drip",
            CalculatorKind::Bmi => "bmi",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CalculatorKind::Dose => "Dose Calculator",
            CalculatorKind::Drip => "Drip Rate Calculator",
            CalculatorKind::Bmi => "BMI Calculator",
        }
    }

    fn next(self) -> Self {
        match self {
            CalculatorKind::Dose => CalculatorKind::Drip,
            CalculatorKind::Drip => CalculatorKind::Bmi,
            CalculatorKind::Bmi => CalculatorKind::Dose,
        }
    }

    /// Field key, display label, and initial value.
    fn fields(self) -> &'static [(&'static str, &'static str, &'static str)] {
        match self {
            CalculatorKind::Dose => &[
                ("weight", "Weight (kg)", ""),
                ("dose_per_kg", "Dose (mg/kg)", ""),
                ("frequency", "Doses per day", ""),
            ],
            CalculatorKind::Drip => &[
                ("volume", "Volume (mL)", ""),
                ("time_hours", "Time (hours)", ""),
                ("drop_factor", "Drop factor (gtt/mL)", "20"),
            ],
            CalculatorKind::Bmi => &[
                ("weight", "Weight (kg)", ""),
                ("height", "Height (cm)", ""),
            ],
        }
    }
}

#[derive(Debug)]
pub struct CalculatorField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// One open calculator form: its fields, the active field, and the rows of
/// the last result.
#[derive(Debug)]
pub struct CalculatorForm {
    kind: CalculatorKind,
    fields: Vec<CalculatorField>,
    cursor: usize,
    result: Vec<(String, String)>,
}

impl CalculatorForm {
    pub fn new(kind: CalculatorKind) -> Self {
        let fields = kind
            .fields()
            .iter()
            .map(|(key, label, initial)| CalculatorField {
                key,
                label,
                value: (*initial).to_string(),
            })
            .collect();
        Self { kind, fields, cursor: 0, result: Vec::new() }
    }

    pub fn kind(&self) -> CalculatorKind {
        self.kind
    }

    pub fn fields(&self) -> &[CalculatorField] {
        &self.fields
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn result(&self) -> &[(String, String)] {
        &self.result
    }

    pub fn previous_field(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn next_field(&mut self) {
        if self.cursor + 1 < self.fields.len() {
            self.cursor += 1;
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.cursor) {
            field.value.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.cursor) {
            field.value.pop();
        }
    }

    /// Switch to the next calculator, dropping typed values and the result.
    pub fn cycle_kind(&mut self) {
        *self = Self::new(self.kind.next());
    }

    /// Build the submission body, or `None` when any field is not a
    /// positive number. The server re-validates with the same rule.
    pub fn payload(&self) -> Option<BTreeMap<String, f64>> {
        let mut inputs = BTreeMap::new();
        for field in &self.fields {
            let value: f64 = field.value.trim().parse().ok()?;
            if value <= 0.0 {
                return None;
            }
            inputs.insert(field.key.to_string(), value);
        }
        Some(inputs)
    }

    /// Fill the result rows from the server's key/value object.
    pub fn apply_result(&mut self, result: serde_json::Map<String, Value>) {
        self.result = result
            .iter()
            .filter(|(key, _)| key.as_str() != "color")
            .map(|(key, value)| (format_key(key), format_value(value)))
            .collect();
    }
}

/// `snake_case` server keys into display labels, e.g. `ml_per_hour` into
/// `Ml Per Hour`.
fn format_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn filled_dose_form() -> CalculatorForm {
        let mut form = CalculatorForm::new(CalculatorKind::Dose);
        for value in ["70", "5", "3"] {
            for c in value.chars() {
                form.push_char(c);
            }
            form.next_field();
        }
        form
    }

    #[test]
    fn test_payload_parses_all_fields() {
        let form = filled_dose_form();
        let inputs = form.payload().unwrap();
        assert_eq!(inputs.get("weight"), Some(&70.0));
        assert_eq!(inputs.get("dose_per_kg"), Some(&5.0));
        assert_eq!(inputs.get("frequency"), Some(&3.0));
    }

    #[test]
    fn test_non_numeric_value_blocks_payload() {
        let mut form = CalculatorForm::new(CalculatorKind::Bmi);
        for c in "heavy".chars() {
            form.push_char(c);
        }
        assert!(form.payload().is_none());
    }

    #[test]
    fn test_non_positive_value_blocks_payload() {
        let mut form = CalculatorForm::new(CalculatorKind::Bmi);
        form.push_char('0');
        form.next_field();
        form.push_char('8');
        form.push_char('0');
        assert!(form.payload().is_none());
    }

    #[test]
    fn test_drip_form_prefills_drop_factor() {
        let form = CalculatorForm::new(CalculatorKind::Drip);
        assert_eq!(form.fields()[2].key, "drop_factor");
        assert_eq!(form.fields()[2].value, "20");
    }

    #[test]
    fn test_cycle_resets_fields_and_result() {
        let mut form = filled_dose_form();
        form.apply_result(json!({"single_dose": 350.0}).as_object().unwrap().clone());
        form.cycle_kind();

        assert_eq!(form.kind(), CalculatorKind::Drip);
        assert_eq!(form.cursor(), 0);
        assert!(form.result().is_empty());
        assert_eq!(form.fields()[0].value, "");
    }

    #[test]
    fn test_cycle_walks_all_calculators_and_wraps() {
        let mut form = CalculatorForm::new(CalculatorKind::Dose);
        form.cycle_kind();
        assert_eq!(form.kind(), CalculatorKind::Drip);
        form.cycle_kind();
        assert_eq!(form.kind(), CalculatorKind::Bmi);
        form.cycle_kind();
        assert_eq!(form.kind(), CalculatorKind::Dose);
    }

    #[test]
    fn test_result_rows_reformat_keys_and_drop_color() {
        let mut form = CalculatorForm::new(CalculatorKind::Bmi);
        form.apply_result(
            json!({
                "bmi": 24.2,
                "category": "Normal weight",
                "color": "#28a745"
            })
            .as_object()
            .unwrap()
            .clone(),
        );

        assert_eq!(
            form.result(),
            [
                ("Bmi".to_string(), "24.2".to_string()),
                ("Category".to_string(), "Normal weight".to_string()),
            ]
        );
    }

    #[test]
    fn test_cursor_stays_within_fields() {
        let mut form = CalculatorForm::new(CalculatorKind::Bmi);
        form.previous_field();
        assert_eq!(form.cursor(), 0);
        form.next_field();
        form.next_field();
        assert_eq!(form.cursor(), 1);
    }
}
