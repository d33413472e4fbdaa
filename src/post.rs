use crate::global_variables::*;

#[derive(Clone, Debug)]
pub struct PostResult {
    pub name: String,
    pub label: String,
    pub value: Float,
    pub unit: Option<String>,
}

impl PostResult {
    pub fn new(name: String, label: String, value: Float, unit: Option<String>) -> Self {
        Self {
            name,
            label,
            value,
            unit,
        }
    }
}

impl std::fmt::Display for PostResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{}: {:.8e} {}", self.label, self.value, unit),
            None => write!(f, "{}: {:.8e}", self.label, self.value),
        }
    }
}
