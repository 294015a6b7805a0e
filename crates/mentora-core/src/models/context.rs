//! Context document builder.
//!
//! The conversational context sent to the avatar API is plain text, but it
//! is assembled as an ordered list of labeled sections rather than ad-hoc
//! string concatenation, so the rendered layout is defined in exactly one
//! place and downstream consumers can rely on the section labels.

const NAME_HEADER: &str = "User Name: ";

/// One block of the context: an optional label and a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: Option<String>,
    pub body: String,
}

/// The assembled context handed to the conversation session API.
///
/// Rendering layout: a `User Name: {name}` header line, then each section in
/// insertion order. Labeled sections render as `{label}:` followed by the
/// body; unlabeled sections render the body verbatim. Every block is
/// newline-terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDocument {
    display_name: String,
    sections: Vec<Section>,
}

impl ContextDocument {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            sections: Vec::new(),
        }
    }

    /// Append a labeled section (e.g. "Document Summary").
    pub fn push_section(&mut self, label: impl Into<String>, body: impl Into<String>) {
        self.sections.push(Section {
            label: Some(label.into()),
            body: body.into(),
        });
    }

    /// Append an unlabeled section, rendered verbatim.
    pub fn push_raw(&mut self, body: impl Into<String>) {
        self.sections.push(Section {
            label: None,
            body: body.into(),
        });
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render the final context string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(NAME_HEADER);
        out.push_str(&self.display_name);
        out.push('\n');

        for section in &self.sections {
            if let Some(label) = &section.label {
                out.push_str(label);
                out.push_str(":\n");
            }
            out.push_str(&section.body);
            if !section.body.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}
