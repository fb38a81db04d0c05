use serde::{Deserialize, Serialize};

/// One entrant of the draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Sequence number from the roster, unique within a load
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Participant {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            group: None,
            department: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// "group - department", whichever parts are present
    pub fn affiliation(&self) -> Option<String> {
        match (self.group.as_deref(), self.department.as_deref()) {
            (Some(g), Some(d)) => Some(format!("{} - {}", g, d)),
            (Some(g), None) => Some(g.to_string()),
            (None, Some(d)) => Some(d.to_string()),
            (None, None) => None,
        }
    }

    /// Name on the first line, affiliation on the second
    pub fn display_text(&self) -> String {
        match self.affiliation() {
            Some(affiliation) => format!("{}\n{}", self.name, affiliation),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_includes_present_parts_only() {
        let full = Participant::new(1, "Alice")
            .with_group("G1")
            .with_department("Sales");
        assert_eq!(full.display_text(), "Alice\nG1 - Sales");

        let dept_only = Participant::new(2, "Bob").with_department("Ops");
        assert_eq!(dept_only.display_text(), "Bob\nOps");

        assert_eq!(Participant::new(3, "Cy").display_text(), "Cy");
    }

    #[test]
    fn test_optional_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&Participant::new(7, "Dee")).unwrap();
        assert_eq!(json, r#"{"id":7,"name":"Dee"}"#);
    }
}
